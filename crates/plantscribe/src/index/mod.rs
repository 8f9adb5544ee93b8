//! Solution indexing
//!
//! Builds immutable snapshots of a codebase and manages which snapshot is
//! current.

mod builder;
mod layer;
mod session;

pub use builder::*;
pub use layer::*;
pub use session::*;
