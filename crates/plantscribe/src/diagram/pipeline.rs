//! Diagram pipeline
//!
//! Runs relationship resolution, member classification and rendering in
//! sequence for one type of a loaded index:
//! Resolver → Classifier → Renderer

use tracing::{debug, info, span, Level};

use super::{MemberClassifier, PlantUmlRenderer, TypeRelationshipResolver};
use crate::core::{DiagramConfig, ScribeError, TypeRecord};
use crate::index::SolutionIndex;

/// Wires the three diagram stages together
#[derive(Debug, Clone, Default)]
pub struct DiagramPipeline {
    resolver: TypeRelationshipResolver,
    classifier: MemberClassifier,
    renderer: PlantUmlRenderer,
}

impl DiagramPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            resolver: TypeRelationshipResolver::from_config(config),
            classifier: MemberClassifier::new(),
            renderer: PlantUmlRenderer::from_config(config),
        }
    }

    /// Render `record`, declared in `assembly` of `index`
    pub fn render_type(
        &self,
        index: &SolutionIndex,
        assembly: &str,
        record: &TypeRecord,
    ) -> Result<String, ScribeError> {
        let pipeline_span = span!(
            Level::INFO,
            "render_type",
            assembly,
            type_name = record.qualified_name.as_str()
        );
        let _enter = pipeline_span.enter();

        let facts = self.resolver.resolve(assembly, record, index.semantic_layer());
        let classified = self.classifier.classify(record);
        debug!(
            relationship_count = facts.interface_names.len() + usize::from(facts.base_name.is_some()),
            member_count = classified.len(),
            "Collected diagram inputs"
        );

        let diagram = self.renderer.render(assembly, record, &facts, &classified)?;
        info!(output_len = diagram.len(), "Diagram ready");
        Ok(diagram)
    }

    /// Look a class up by name and render it; `Ok(None)` when it is not indexed
    pub fn render_class(
        &self,
        index: &SolutionIndex,
        assembly: &str,
        class: &str,
    ) -> Result<Option<String>, ScribeError> {
        match index.find_type(assembly, class) {
            Some(record) => self.render_type(index, assembly, record).map(Some),
            None => {
                debug!(assembly, class, "Class not found");
                Ok(None)
            }
        }
    }
}
