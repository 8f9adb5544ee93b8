//! Codebase provider traits
//!
//! These traits are the seam between plantscribe and whatever loads and
//! compiles a solution. A provider hands out projects, each project hands out
//! documents, and each document may or may not have a syntax tree and a
//! semantic model. Missing pieces are reported as `None`, never as errors.

use std::sync::Arc;

use super::{ScribeError, SemanticModel, SyntaxTree};

/// Source of a whole loaded codebase
pub trait CodebaseProvider {
    /// All projects, in provider order
    ///
    /// Returns an error only when the codebase itself is unavailable.
    fn projects(&self) -> Result<Vec<&dyn ProjectSource>, ScribeError>;
}

/// One project (assembly) of a codebase
pub trait ProjectSource {
    fn name(&self) -> &str;

    fn documents(&self) -> Vec<&dyn DocumentSource>;
}

/// One source document of a project
pub trait DocumentSource {
    fn name(&self) -> &str;

    /// The semantic model for this document's compilation
    fn semantic_model(&self) -> Option<Arc<dyn SemanticModel>>;

    fn syntax_tree(&self) -> Option<&SyntaxTree>;
}
