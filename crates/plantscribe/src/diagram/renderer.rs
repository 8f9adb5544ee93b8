//! PlantUML renderer
//!
//! Renders one type, its relationship facts and its classified members into
//! PlantUML class-diagram text. The frame is fixed so the output can be
//! compared byte for byte.

use std::fmt::Write;

use tracing::{debug, span, Level};

use super::{ClassifiedMembers, RelationshipFacts};
use crate::core::{DiagramConfig, NameQualifier, ScribeError, TypeRecord};

/// Renders a single type as a PlantUML class diagram
#[derive(Debug, Clone, Copy, Default)]
pub struct PlantUmlRenderer {
    qualifier: NameQualifier,
}

impl PlantUmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_qualifier(qualifier: NameQualifier) -> Self {
        Self { qualifier }
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        Self::with_qualifier(config.qualifier)
    }

    /// Node label used for `record` declared in `assembly`
    pub fn label(&self, assembly: &str, record: &TypeRecord) -> String {
        self.qualifier.label(assembly, record)
    }

    /// Render the diagram text for `record`
    pub fn render(
        &self,
        assembly: &str,
        record: &TypeRecord,
        facts: &RelationshipFacts,
        classified: &ClassifiedMembers,
    ) -> Result<String, ScribeError> {
        let render_span = span!(
            Level::DEBUG,
            "render_plantuml",
            type_name = record.qualified_name.as_str(),
            member_count = classified.len()
        );
        let _enter = render_span.enter();

        let label = self.label(assembly, record);
        let mut out = String::new();
        self.write_diagram(&mut out, &label, record, facts, classified)
            .map_err(|e| ScribeError::render_error(format!("Failed to write diagram: {}", e)))?;

        debug!(output_len = out.len(), "Rendered diagram");
        Ok(out)
    }

    fn write_diagram(
        &self,
        out: &mut String,
        label: &str,
        record: &TypeRecord,
        facts: &RelationshipFacts,
        classified: &ClassifiedMembers,
    ) -> std::fmt::Result {
        writeln!(out, "@startuml")?;
        writeln!(out)?;

        if let Some(base) = &facts.base_name {
            writeln!(out, "{} --|> {}", label, base)?;
        }
        for interface in &facts.interface_names {
            writeln!(out, "interface {}", interface)?;
            writeln!(out, "{} ..|> {}", label, interface)?;
        }
        writeln!(out)?;

        writeln!(out, "{} {} {{", record.kind.keyword(), label)?;
        for field in &classified.fields {
            writeln!(out, "    {{field}} -{} : {}", field.name, field.type_name)?;
        }
        for property in &classified.properties {
            writeln!(out, "    {{field}} +{} : {}", property.name, property.type_name)?;
        }
        for method in &classified.methods {
            writeln!(
                out,
                "    {{method}} {}{}({}) : {}",
                method.marker, method.name, method.signature, method.return_type
            )?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "@enduml")
    }
}
