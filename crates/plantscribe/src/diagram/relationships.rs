//! Relationship resolution
//!
//! Looks a type up in the semantic layer and turns its base type and
//! interface set into name-only facts ready for rendering.

use tracing::{debug, span, trace, Level};

use crate::core::{strip_generics, DiagramConfig, TypeRecord, TypeSymbol, DEFAULT_ROOT_TYPES};
use crate::index::SemanticLayer;

/// Resolved relationships of one type, generic arguments already stripped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipFacts {
    pub base_name: Option<String>,
    pub interface_names: Vec<String>,
}

impl RelationshipFacts {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.base_name.is_none() && self.interface_names.is_empty()
    }
}

/// Resolves base types and implemented interfaces through the semantic layer
#[derive(Debug, Clone)]
pub struct TypeRelationshipResolver {
    root_types: Vec<String>,
}

impl TypeRelationshipResolver {
    pub fn new() -> Self {
        Self {
            root_types: DEFAULT_ROOT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            root_types: config.root_types.clone(),
        }
    }

    /// Resolve the relationship facts of `record`, declared in `assembly`
    ///
    /// Only class and abstract class declarations with a base list are
    /// resolved. A type the semantic layer does not know yields no facts.
    pub fn resolve(
        &self,
        assembly: &str,
        record: &TypeRecord,
        layer: &SemanticLayer,
    ) -> RelationshipFacts {
        let resolve_span = span!(
            Level::DEBUG,
            "resolve_relationships",
            assembly,
            type_name = record.qualified_name.as_str()
        );
        let _enter = resolve_span.enter();

        if !record.kind.is_class_like() || !record.has_declared_bases() {
            trace!(kind = ?record.kind, "Nothing to resolve");
            return RelationshipFacts::none();
        }

        let Some(symbol) = layer.type_symbol(assembly, &record.qualified_name) else {
            trace!("Type symbol not resolvable, omitting relationships");
            return RelationshipFacts::none();
        };

        let facts = self.facts_from_symbol(&symbol);
        debug!(
            base = facts.base_name.as_deref().unwrap_or(""),
            interface_count = facts.interface_names.len(),
            "Resolved relationships"
        );
        facts
    }

    /// Build facts from an already resolved symbol
    pub fn facts_from_symbol(&self, symbol: &TypeSymbol) -> RelationshipFacts {
        RelationshipFacts {
            base_name: self.base_name(symbol),
            interface_names: unique_stripped(symbol.all_interfaces.iter().map(String::as_str)),
        }
    }

    /// The symbol's base type without generic arguments, unless it is a root type
    pub fn base_name(&self, symbol: &TypeSymbol) -> Option<String> {
        let base = strip_generics(symbol.base_type.as_deref()?.trim());
        if base.is_empty() || self.is_root_type(base) {
            return None;
        }
        Some(base.to_string())
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        self.root_types.iter().any(|r| r == name)
    }
}

impl Default for TypeRelationshipResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip generic arguments and drop repeats, keeping first-seen order
pub fn unique_stripped<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let stripped = strip_generics(name.trim());
        if stripped.is_empty() || out.iter().any(|seen| seen == stripped) {
            continue;
        }
        out.push(stripped.to_string());
    }
    out
}
