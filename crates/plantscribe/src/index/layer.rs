//! Name-keyed lookup from indexed types to the semantic model that can resolve them

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::{SemanticModel, TypeSymbol};

/// Maps `(assembly, qualified name)` to a semantic model
///
/// Only types that declared at least one member are registered.
#[derive(Clone, Default)]
pub struct SemanticLayer {
    models: HashMap<String, HashMap<String, Arc<dyn SemanticModel>>>,
}

impl SemanticLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model for a type; the first registration wins
    pub fn register(&mut self, assembly: &str, qualified_name: &str, model: Arc<dyn SemanticModel>) {
        self.models
            .entry(assembly.to_string())
            .or_default()
            .entry(qualified_name.to_string())
            .or_insert(model);
    }

    pub fn model_for(&self, assembly: &str, qualified_name: &str) -> Option<&Arc<dyn SemanticModel>> {
        self.models.get(assembly)?.get(qualified_name)
    }

    pub fn contains(&self, assembly: &str, qualified_name: &str) -> bool {
        self.model_for(assembly, qualified_name).is_some()
    }

    /// Resolve a type's symbol through its registered model
    pub fn type_symbol(&self, assembly: &str, qualified_name: &str) -> Option<TypeSymbol> {
        self.model_for(assembly, qualified_name)?
            .type_symbol(qualified_name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.models.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SemanticLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticLayer")
            .field("registered", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl SemanticModel for Named {
        fn type_symbol(&self, qualified_name: &str) -> Option<TypeSymbol> {
            Some(TypeSymbol::new(qualified_name).with_base(self.0))
        }
    }

    #[test]
    fn test_first_registration_wins() {
        let mut layer = SemanticLayer::new();
        layer.register("Zoo", "Dog", Arc::new(Named("First")));
        layer.register("Zoo", "Dog", Arc::new(Named("Second")));

        let symbol = layer.type_symbol("Zoo", "Dog").unwrap();
        assert_eq!(symbol.base_type.as_deref(), Some("First"));
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_lookup_is_scoped_by_assembly() {
        let mut layer = SemanticLayer::new();
        layer.register("Zoo", "Dog", Arc::new(Named("Animal")));

        assert!(layer.contains("Zoo", "Dog"));
        assert!(!layer.contains("Farm", "Dog"));
        assert!(layer.type_symbol("Farm", "Dog").is_none());
    }

    #[test]
    fn test_empty_layer() {
        let layer = SemanticLayer::new();
        assert!(layer.is_empty());
        assert_eq!(format!("{:?}", layer), "SemanticLayer { registered: 0 }");
    }
}
