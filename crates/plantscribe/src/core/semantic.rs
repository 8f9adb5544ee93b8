//! Semantic layer abstraction
//!
//! A semantic model answers questions syntax alone cannot: which base-list
//! entry is the base class, and which interfaces a type implements once
//! inheritance is taken into account.

use std::fmt;

/// Resolved view of a declared type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSymbol {
    /// Display name of the type itself
    pub name: String,
    /// Display name of the base type, generic arguments included
    pub base_type: Option<String>,
    /// Every implemented interface, inherited ones included, in discovery order
    pub all_interfaces: Vec<String>,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_type: None,
            all_interfaces: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.all_interfaces.push(interface.into());
        self
    }
}

/// Symbol lookup for the documents of one compilation
pub trait SemanticModel: Send + Sync {
    /// Resolve the symbol declared under `qualified_name`, if the model knows it
    fn type_symbol(&self, qualified_name: &str) -> Option<TypeSymbol>;
}

impl fmt::Debug for dyn SemanticModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SemanticModel")
    }
}

/// Drop generic arguments from a type name: `Animal<T>` becomes `Animal`
pub fn strip_generics(name: &str) -> &str {
    match name.find('<') {
        Some(pos) => &name[..pos],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_generics() {
        assert_eq!(strip_generics("Animal<T>"), "Animal");
        assert_eq!(strip_generics("IDictionary<string, List<int>>"), "IDictionary");
        assert_eq!(strip_generics("Animal"), "Animal");
        assert_eq!(strip_generics(""), "");
    }

    #[test]
    fn test_type_symbol_builder() {
        let symbol = TypeSymbol::new("Dog")
            .with_base("Animal")
            .with_interface("IBarkable");
        assert_eq!(symbol.base_type.as_deref(), Some("Animal"));
        assert_eq!(symbol.all_interfaces, vec!["IBarkable"]);
    }
}
