//! JSON manifest codebase provider
//!
//! A manifest describes projects, their documents and each document's syntax
//! tree as JSON:
//!
//! ```json
//! {
//!   "projects": [{
//!     "name": "Zoo",
//!     "documents": [{
//!       "name": "Dog.cs",
//!       "tree": { "path": "src/Dog.cs", "root": { "declarations": [
//!         { "kind": "class", "identifier": "Dog", "base_list": ["Animal"],
//!           "members": [{ "method": { "modifiers": ["public"],
//!             "identifier": "Bark", "return_type": "void" } }] }
//!       ] } }
//!     }]
//!   }]
//! }
//! ```
//!
//! Each project gets one [`InferredModel`] shared by all of its documents. A
//! document marked `"semantic": false`, or without a tree or root, is handed
//! out without the missing piece.

mod inference;

pub use inference::*;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, Level};

use crate::core::{
    CodebaseProvider, DocumentSource, ProjectSource, ScribeError, SemanticModel, SyntaxTree,
};

/// Top-level manifest document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub projects: Vec<ManifestProject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestProject {
    pub name: String,
    /// Symbol facts keyed by qualified type name, replacing inference
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub symbols: BTreeMap<String, SymbolOverride>,
    #[serde(default)]
    pub documents: Vec<ManifestDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocument {
    pub name: String,
    /// Whether the document takes part in the project's semantic model
    #[serde(default = "default_semantic")]
    pub semantic: bool,
    #[serde(default)]
    pub tree: Option<SyntaxTree>,
}

fn default_semantic() -> bool {
    true
}

/// A codebase backed by a parsed manifest
#[derive(Debug, Clone, Default)]
pub struct ManifestCodebase {
    projects: Vec<LoadedProject>,
}

#[derive(Debug, Clone)]
struct LoadedProject {
    name: String,
    documents: Vec<LoadedDocument>,
}

#[derive(Debug, Clone)]
struct LoadedDocument {
    name: String,
    model: Option<Arc<dyn SemanticModel>>,
    tree: Option<SyntaxTree>,
}

impl ManifestCodebase {
    /// Build the provider and each project's semantic model
    pub fn from_manifest(manifest: Manifest) -> Self {
        let load_span = span!(Level::DEBUG, "load_manifest", project_count = manifest.projects.len());
        let _enter = load_span.enter();

        let projects = manifest
            .projects
            .into_iter()
            .map(|project| {
                let mut model = InferredModel::new();
                for document in &project.documents {
                    if let Some(root) = document.tree.as_ref().and_then(SyntaxTree::root) {
                        model.register_root(root);
                    }
                }
                for (name, symbol) in project.symbols {
                    model.register_override(name, symbol);
                }
                debug!(
                    project = project.name.as_str(),
                    declared_types = model.len(),
                    "Inferred project model"
                );

                let model: Arc<dyn SemanticModel> = Arc::new(model);
                let documents = project
                    .documents
                    .into_iter()
                    .map(|document| LoadedDocument {
                        name: document.name,
                        model: document.semantic.then(|| Arc::clone(&model)),
                        tree: document.tree,
                    })
                    .collect();
                LoadedProject {
                    name: project.name,
                    documents,
                }
            })
            .collect();

        Self { projects }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScribeError> {
        let manifest: Manifest = serde_json::from_str(json)
            .map_err(|e| ScribeError::load_failure_with("Invalid manifest", e))?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ScribeError> {
        let manifest: Manifest = serde_json::from_reader(reader)
            .map_err(|e| ScribeError::load_failure_with("Invalid manifest", e))?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScribeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ScribeError::load_failure_with(format!("Cannot open manifest {}", path.display()), e)
        })?;
        let codebase = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), project_count = codebase.project_count(), "Loaded manifest");
        Ok(codebase)
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

impl CodebaseProvider for ManifestCodebase {
    fn projects(&self) -> Result<Vec<&dyn ProjectSource>, ScribeError> {
        Ok(self
            .projects
            .iter()
            .map(|p| p as &dyn ProjectSource)
            .collect())
    }
}

impl ProjectSource for LoadedProject {
    fn name(&self) -> &str {
        &self.name
    }

    fn documents(&self) -> Vec<&dyn DocumentSource> {
        self.documents
            .iter()
            .map(|d| d as &dyn DocumentSource)
            .collect()
    }
}

impl DocumentSource for LoadedDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn semantic_model(&self) -> Option<Arc<dyn SemanticModel>> {
        self.model.clone()
    }

    fn syntax_tree(&self) -> Option<&SyntaxTree> {
        self.tree.as_ref()
    }
}
