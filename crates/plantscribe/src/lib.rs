//! Plantscribe - PlantUML class diagrams from a resolved codebase
//!
//! Indexes the projects, documents and type declarations a codebase provider
//! exposes, resolves each type's base class and interfaces through a semantic
//! layer, and renders one type at a time as PlantUML text.
//!
//! # Quick Start
//!
//! ```rust
//! use plantscribe::render_manifest_class;
//!
//! let manifest = r#"{ "projects": [{ "name": "Zoo", "documents": [{
//!     "name": "Dog.cs",
//!     "tree": { "root": { "declarations": [{
//!         "kind": "class", "identifier": "Dog", "base_list": ["Animal"],
//!         "members": [{ "property": { "identifier": "Age", "type": "int" } }]
//!     }] } }
//! }] }] }"#;
//!
//! let diagram = render_manifest_class(manifest, "Zoo", "Dog").unwrap().unwrap();
//! assert!(diagram.contains("Dog --|> Animal"));
//! assert!(diagram.contains("{field} +Age : int"));
//! ```
//!
//! # Advanced Usage
//!
//! For browsing, drive a [`controller::SelectionController`] with snapshots
//! loaded through an [`index::Session`]:
//!
//! ```rust
//! use plantscribe::prelude::*;
//!
//! let codebase = ManifestCodebase::from_json_str(r#"{ "projects": [{ "name": "Zoo" }] }"#).unwrap();
//! let session = Session::new();
//! let clipboard = MemoryClipboard::new();
//!
//! let mut controller = SelectionController::new(&DiagramConfig::default())
//!     .with_clipboard(clipboard.clone());
//! let updates = controller.subscribe();
//! controller.request_load(&session, &codebase).unwrap();
//!
//! assert_eq!(
//!     updates.try_recv().unwrap(),
//!     Notification::AssembliesListed(vec!["Zoo".to_string()])
//! );
//! assert!(controller.select_assembly("Zoo"));
//! assert!(controller.select_class("Ghost").is_none());
//! assert!(clipboard.entries().is_empty());
//! ```

pub mod controller;
pub mod core;
pub mod diagram;
pub mod index;
pub mod manifest;

pub use core::*;

use std::path::Path;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::controller::{
        ClipboardSink, MemoryClipboard, Notification, NullClipboard, SelectionController,
        SelectionEvent, SelectionState,
    };
    pub use crate::core::{
        Assembly, CodebaseProvider, DiagramConfig, DocumentSource, MemberRecord, NameQualifier,
        ProjectSource, ScribeError, SemanticModel, TypeKind, TypeRecord, TypeSymbol, Visibility,
    };
    pub use crate::diagram::{
        DiagramPipeline, MemberClassifier, PlantUmlRenderer, RelationshipFacts,
        TypeRelationshipResolver,
    };
    pub use crate::index::{IndexBuilder, Session, SolutionIndex};
    pub use crate::manifest::ManifestCodebase;
}

/// Index `provider` and render one class
///
/// Returns `Ok(None)` when the assembly or class is not in the index.
///
/// # Example
/// ```rust
/// use plantscribe::{manifest::ManifestCodebase, render_class};
///
/// let codebase = ManifestCodebase::from_json_str(r#"{ "projects": [{ "name": "Zoo" }] }"#).unwrap();
/// assert!(render_class(&codebase, "Zoo", "Dog").unwrap().is_none());
/// ```
pub fn render_class(
    provider: &dyn CodebaseProvider,
    assembly: &str,
    class: &str,
) -> Result<Option<String>, ScribeError> {
    render_class_with_config(provider, assembly, class, &DiagramConfig::default())
}

/// Like [`render_class`], with an explicit configuration
pub fn render_class_with_config(
    provider: &dyn CodebaseProvider,
    assembly: &str,
    class: &str,
    config: &DiagramConfig,
) -> Result<Option<String>, ScribeError> {
    let index = index::IndexBuilder::from_config(config).build(provider)?;
    diagram::DiagramPipeline::from_config(config).render_class(&index, assembly, class)
}

/// Parse a JSON manifest and render one class from it
pub fn render_manifest_class(
    json: &str,
    assembly: &str,
    class: &str,
) -> Result<Option<String>, ScribeError> {
    let codebase = manifest::ManifestCodebase::from_json_str(json)?;
    render_class(&codebase, assembly, class)
}

/// Read a JSON manifest from disk
pub fn load_manifest(path: impl AsRef<Path>) -> Result<manifest::ManifestCodebase, ScribeError> {
    manifest::ManifestCodebase::from_path(path)
}
