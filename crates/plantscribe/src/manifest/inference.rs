//! Name-based semantic model for manifest codebases
//!
//! A manifest only carries syntax, so base types and interface sets are
//! inferred by looking base-list entries up among the project's own
//! declarations.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::{qualify, strip_generics, SemanticModel, SyntaxRoot, TypeKind, TypeSymbol};

/// Explicit symbol facts that replace inference for one type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolOverride {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

/// What the model remembers about a declared type
#[derive(Debug, Clone)]
struct DeclaredType {
    kind: TypeKind,
    namespace: Option<String>,
    bases: Vec<String>,
}

/// Registry of a project's declarations, answering symbol queries by name
#[derive(Debug, Default, Clone)]
pub struct InferredModel {
    types: HashMap<String, DeclaredType>,
    by_identifier: HashMap<String, Vec<String>>,
    overrides: HashMap<String, SymbolOverride>,
}

impl InferredModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every declaration under `root`, merging partial declarations
    pub fn register_root(&mut self, root: &SyntaxRoot) {
        for declaration in root.descendant_types() {
            let syntax = declaration.declaration;
            let qualified_name = declaration.qualified_name();
            let entry = self
                .types
                .entry(qualified_name.clone())
                .or_insert_with(|| DeclaredType {
                    kind: TypeKind::from_declaration(syntax.kind, &syntax.modifiers),
                    namespace: declaration.namespace.map(str::to_string),
                    bases: Vec::new(),
                });
            for base in &syntax.base_list {
                if !entry.bases.contains(base) {
                    entry.bases.push(base.clone());
                }
            }

            let names = self
                .by_identifier
                .entry(syntax.identifier.clone())
                .or_default();
            if !names.contains(&qualified_name) {
                names.push(qualified_name);
            }
        }
    }

    pub fn register_override(&mut self, qualified_name: impl Into<String>, symbol: SymbolOverride) {
        self.overrides.insert(qualified_name.into(), symbol);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve a base-list entry to the qualified name of a declared type
    ///
    /// Looks in the enclosing namespaces from the innermost outwards, then at
    /// the global namespace, then falls back to the first type declared with
    /// that identifier.
    fn resolve(&self, entry: &str, namespace: Option<&str>) -> Option<String> {
        let name = strip_generics(entry.trim());
        if name.is_empty() {
            return None;
        }

        let mut scope = namespace;
        while let Some(ns) = scope {
            let candidate = qualify(Some(ns), name);
            if self.types.contains_key(&candidate) {
                return Some(candidate);
            }
            scope = ns.rfind('.').map(|pos| &ns[..pos]);
        }
        if self.types.contains_key(name) {
            return Some(name.to_string());
        }

        let identifier = name.rsplit('.').next().unwrap_or(name);
        self.by_identifier.get(identifier)?.first().cloned()
    }

    /// Qualified name of a resolved entry with its written generic suffix kept
    fn display_name(&self, entry: &str, namespace: Option<&str>) -> String {
        let entry = entry.trim();
        match self.resolve(entry, namespace) {
            Some(qualified) => match entry.find('<') {
                Some(pos) => format!("{}{}", qualified, &entry[pos..]),
                None => qualified,
            },
            None => entry.to_string(),
        }
    }

    fn declared_kind(&self, entry: &str, namespace: Option<&str>) -> Option<TypeKind> {
        let qualified = self.resolve(entry, namespace)?;
        self.types.get(&qualified).map(|t| t.kind)
    }

    fn names_interface(&self, entry: &str, namespace: Option<&str>) -> bool {
        match self.declared_kind(entry, namespace) {
            Some(kind) => kind == TypeKind::Interface,
            None => follows_interface_convention(entry),
        }
    }

    /// The base-list entry acting as base type, if any
    ///
    /// An entry naming a declared class wins; otherwise the first entry is
    /// the base unless it looks like an interface.
    fn base_entry<'a>(&self, declared: &'a DeclaredType) -> Option<&'a str> {
        if declared.kind == TypeKind::Interface {
            return None;
        }
        let namespace = declared.namespace.as_deref();
        declared
            .bases
            .iter()
            .find(|entry| {
                matches!(
                    self.declared_kind(entry, namespace),
                    Some(TypeKind::Class | TypeKind::AbstractClass | TypeKind::Record)
                )
            })
            .or_else(|| {
                declared
                    .bases
                    .first()
                    .filter(|entry| !self.names_interface(entry, namespace))
            })
            .map(String::as_str)
    }

    /// Append every interface of `declared`, inherited ones included
    fn collect_interfaces(
        &self,
        declared: &DeclaredType,
        out: &mut Vec<String>,
        visited: &mut HashSet<String>,
    ) {
        let namespace = declared.namespace.as_deref();
        let base = self.base_entry(declared);

        for entry in &declared.bases {
            if Some(entry.as_str()) == base {
                continue;
            }
            let name = self.display_name(entry, namespace);
            if !out.contains(&name) {
                out.push(name);
            }
            self.collect_from(entry, namespace, out, visited);
        }
        if let Some(entry) = base {
            self.collect_from(entry, namespace, out, visited);
        }
    }

    fn collect_from(
        &self,
        entry: &str,
        namespace: Option<&str>,
        out: &mut Vec<String>,
        visited: &mut HashSet<String>,
    ) {
        let Some(qualified) = self.resolve(entry, namespace) else {
            return;
        };
        if !visited.insert(qualified.clone()) {
            return;
        }
        if let Some(parent) = self.types.get(&qualified) {
            self.collect_interfaces(parent, out, visited);
        }
    }
}

impl SemanticModel for InferredModel {
    fn type_symbol(&self, qualified_name: &str) -> Option<TypeSymbol> {
        if let Some(symbol) = self.overrides.get(qualified_name) {
            return Some(TypeSymbol {
                name: qualified_name.to_string(),
                base_type: symbol.base.clone(),
                all_interfaces: symbol.interfaces.clone(),
            });
        }

        let declared = self.types.get(qualified_name)?;
        let namespace = declared.namespace.as_deref();
        let mut symbol = TypeSymbol::new(qualified_name);
        symbol.base_type = match self.base_entry(declared) {
            Some(entry) => Some(self.display_name(entry, namespace)),
            None if declared.kind == TypeKind::Interface => None,
            None => Some("object".to_string()),
        };

        let mut visited = HashSet::from([qualified_name.to_string()]);
        self.collect_interfaces(declared, &mut symbol.all_interfaces, &mut visited);
        Some(symbol)
    }
}

/// `IName`: a capital `I` followed by another capital letter
fn follows_interface_convention(entry: &str) -> bool {
    let name = strip_generics(entry.trim());
    let identifier = name.rsplit('.').next().unwrap_or(name);
    let mut chars = identifier.chars();
    chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
}
