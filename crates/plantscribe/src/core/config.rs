//! Diagram configuration

use std::str::FromStr;

use super::TypeRecord;

/// How a type's diagram node is labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameQualifier {
    /// `Namespace.Identifier`, or the identifier alone outside a namespace
    #[default]
    Namespace,
    /// `Assembly.Identifier`
    Assembly,
    /// The identifier alone
    Bare,
}

impl NameQualifier {
    /// Label for `record` as declared in `assembly`
    pub fn label(self, assembly: &str, record: &TypeRecord) -> String {
        match self {
            NameQualifier::Namespace => record.qualified_name.clone(),
            NameQualifier::Assembly if assembly.is_empty() => record.identifier.clone(),
            NameQualifier::Assembly => format!("{}.{}", assembly, record.identifier),
            NameQualifier::Bare => record.identifier.clone(),
        }
    }
}

impl FromStr for NameQualifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "namespace" => Ok(NameQualifier::Namespace),
            "assembly" => Ok(NameQualifier::Assembly),
            "bare" => Ok(NameQualifier::Bare),
            _ => Err(format!("Unknown name qualifier: {}", s)),
        }
    }
}

/// Names treated as the universal root type; a base resolving to one of
/// these produces no inheritance line
pub const DEFAULT_ROOT_TYPES: &[&str] = &["object", "Object", "System.Object"];

/// Configuration shared by the relationship resolver and the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramConfig {
    pub qualifier: NameQualifier,
    pub root_types: Vec<String>,
}

impl DiagramConfig {
    pub fn new() -> Self {
        Self {
            qualifier: NameQualifier::default(),
            root_types: DEFAULT_ROOT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_qualifier(mut self, qualifier: NameQualifier) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// Add a root type name on top of the defaults
    pub fn with_root_type(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.root_types.contains(&name) {
            self.root_types.push(name);
        }
        self
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        self.root_types.iter().any(|r| r == name)
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self::new()
    }
}
