//! Diagram pipeline stages
//!
//! Relationship resolution and member classification feed the PlantUML
//! renderer; [`DiagramPipeline`] runs all three for one type.

mod classifier;
mod pipeline;
mod relationships;
mod renderer;

pub use classifier::*;
pub use pipeline::*;
pub use relationships::*;
pub use renderer::*;
