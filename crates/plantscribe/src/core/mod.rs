//! Core abstractions shared by the indexer and the diagram pipeline
//!
//! The provider traits describe what plantscribe consumes; the model types
//! describe the immutable snapshot it builds from them.

mod config;
mod error;
pub mod logging;
mod model;
mod provider;
mod semantic;
mod syntax;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use model::*;
pub use provider::*;
pub use semantic::*;
pub use syntax::*;
