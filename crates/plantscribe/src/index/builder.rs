//! Solution index construction
//!
//! Walks every project and document a provider exposes and produces an
//! immutable [`SolutionIndex`]. Documents that cannot be fully resolved are
//! skipped; only an unavailable codebase fails the build.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, span, trace, warn, Level};

use super::SemanticLayer;
use crate::core::{
    Assembly, CodebaseProvider, DeclarationRef, DiagramConfig, DocumentSource, MemberRecord,
    ScribeError, SemanticModel, TypeKind, TypeRecord,
};
use crate::diagram::{MemberClassifier, TypeRelationshipResolver};

/// Immutable snapshot of a loaded codebase
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolutionIndex {
    assemblies: Vec<Assembly>,
    #[serde(skip)]
    semantic: SemanticLayer,
    #[serde(skip)]
    skipped_documents: usize,
}

impl SolutionIndex {
    /// Build an index with the default configuration
    pub fn build(provider: &dyn CodebaseProvider) -> Result<Self, ScribeError> {
        IndexBuilder::new().build(provider)
    }

    /// Assemblies in ordinal name order
    pub fn assemblies(&self) -> &[Assembly] {
        &self.assemblies
    }

    pub fn assembly(&self, name: &str) -> Option<&Assembly> {
        self.assemblies.iter().find(|a| a.name == name)
    }

    pub fn assembly_names(&self) -> Vec<String> {
        self.assemblies.iter().map(|a| a.name.clone()).collect()
    }

    /// Sorted class names of an assembly, or `None` if it is not indexed
    pub fn class_names(&self, assembly: &str) -> Option<Vec<String>> {
        self.assembly(assembly).map(Assembly::class_names)
    }

    pub fn find_type(&self, assembly: &str, name: &str) -> Option<&TypeRecord> {
        self.assembly(assembly)?.find_type(name)
    }

    pub fn semantic_layer(&self) -> &SemanticLayer {
        &self.semantic
    }

    pub fn assembly_count(&self) -> usize {
        self.assemblies.len()
    }

    pub fn type_count(&self) -> usize {
        self.assemblies.iter().map(Assembly::type_count).sum()
    }

    /// Documents left out because they lacked a semantic model, tree or root
    pub fn skipped_documents(&self) -> usize {
        self.skipped_documents
    }
}

/// Builds [`SolutionIndex`] snapshots from a codebase provider
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    classifier: MemberClassifier,
    resolver: TypeRelationshipResolver,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            classifier: MemberClassifier::new(),
            resolver: TypeRelationshipResolver::from_config(config),
        }
    }

    /// Build a complete snapshot
    ///
    /// Fails only when the provider cannot hand out its projects.
    pub fn build(&self, provider: &dyn CodebaseProvider) -> Result<SolutionIndex, ScribeError> {
        let build_span = span!(Level::INFO, "build_index");
        let _enter = build_span.enter();

        let mut projects = provider.projects()?;
        projects.sort_by(|a, b| a.name().cmp(b.name()));
        debug!(project_count = projects.len(), "Indexing projects");

        let mut index = SolutionIndex::default();
        for project in projects {
            let name = project.name();
            if name.is_empty() {
                warn!("Skipping project without a name");
                continue;
            }
            if index.assembly(name).is_some() {
                warn!(assembly = name, "Skipping duplicate project name");
                continue;
            }

            let project_span = span!(Level::DEBUG, "index_assembly", assembly = name);
            let _project_enter = project_span.enter();

            let mut assembly = Assembly::new(name);
            let mut documents = project.documents();
            documents.sort_by(|a, b| a.name().cmp(b.name()));

            for document in documents {
                if !self.index_document(&mut assembly, &mut index.semantic, document) {
                    index.skipped_documents += 1;
                }
            }

            for record in &mut assembly.types {
                self.classifier.order(&mut record.members);
            }
            debug!(type_count = assembly.type_count(), "Indexed assembly");
            index.assemblies.push(assembly);
        }

        info!(
            assembly_count = index.assembly_count(),
            type_count = index.type_count(),
            skipped_documents = index.skipped_documents,
            "Index built"
        );
        Ok(index)
    }

    /// Index one document; returns `false` when it had to be skipped
    fn index_document(
        &self,
        assembly: &mut Assembly,
        layer: &mut SemanticLayer,
        document: &dyn DocumentSource,
    ) -> bool {
        let Some(model) = document.semantic_model() else {
            debug!(document = document.name(), "Skipping document without semantic model");
            return false;
        };
        let Some(tree) = document.syntax_tree() else {
            debug!(document = document.name(), "Skipping document without syntax tree");
            return false;
        };
        let Some(root) = tree.root() else {
            debug!(document = document.name(), "Skipping document without root node");
            return false;
        };

        for declaration in root.descendant_types() {
            self.index_declaration(assembly, layer, declaration, &model);
        }
        true
    }

    fn index_declaration(
        &self,
        assembly: &mut Assembly,
        layer: &mut SemanticLayer,
        declaration: DeclarationRef<'_>,
        model: &Arc<dyn SemanticModel>,
    ) {
        let syntax = declaration.declaration;
        let qualified_name = declaration.qualified_name();
        let members: Vec<MemberRecord> = syntax
            .members
            .iter()
            .filter_map(|m| self.classifier.lower(m))
            .collect();

        // Relationship lookups are keyed off declarations that have members
        if !syntax.members.is_empty() {
            layer.register(&assembly.name, &qualified_name, Arc::clone(model));
        }

        let record = match assembly
            .types
            .iter()
            .position(|t| t.qualified_name == qualified_name)
        {
            Some(pos) => {
                trace!(type_name = qualified_name.as_str(), "Merging partial declaration");
                &mut assembly.types[pos]
            }
            None => {
                let mut record = TypeRecord::new(
                    qualified_name.as_str(),
                    TypeKind::from_declaration(syntax.kind, &syntax.modifiers),
                );
                record.identifier = syntax.identifier.clone();
                record.namespace = declaration.namespace.map(str::to_string);
                assembly.types.push(record);
                let last = assembly.types.len() - 1;
                &mut assembly.types[last]
            }
        };

        record.members.extend(members);
        for base in &syntax.base_list {
            if !record.declared_bases.contains(base) {
                record.declared_bases.push(base.clone());
            }
        }

        // Refs mirror what the diagram will show for this record
        let facts = self.resolver.resolve(&assembly.name, record, layer);
        record.base_type_ref = facts.base_name;
        record.interface_refs = facts.interface_names;
    }
}
