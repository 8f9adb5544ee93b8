//! Syntax-level view of a codebase, as handed over by a codebase provider
//!
//! Providers own parsing. They describe each document as a tree of type
//! declarations carrying raw modifiers, base lists and member declarations;
//! nothing here is resolved yet.

use serde::{Deserialize, Serialize};

/// The syntactic kind of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Interface,
    Struct,
    Record,
}

/// A parameter in a method's parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub identifier: String,
    /// Missing when the provider could not resolve a type (e.g. `__arglist`)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl ParameterDeclaration {
    pub fn new(identifier: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            type_name: Some(type_name.into()),
        }
    }

    pub fn untyped(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            type_name: None,
        }
    }
}

/// A field declaration; one declaration may introduce several variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub identifier: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub identifier: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: String,
}

/// A member declared in a type body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberDeclaration {
    Field(FieldDeclaration),
    Property(PropertyDeclaration),
    Method(MethodDeclaration),
    /// Constructors, events, indexers, operators and anything else
    Other { kind: String },
}

impl MemberDeclaration {
    pub fn field(type_name: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::Field(FieldDeclaration {
            modifiers: Vec::new(),
            type_name: type_name.into(),
            variables: vec![variable.into()],
        })
    }

    pub fn property(identifier: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::Property(PropertyDeclaration {
            modifiers: vec!["public".to_string()],
            identifier: identifier.into(),
            type_name: type_name.into(),
        })
    }

    pub fn method(identifier: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self::Method(MethodDeclaration {
            modifiers: Vec::new(),
            identifier: identifier.into(),
            parameters: Vec::new(),
            return_type: return_type.into(),
        })
    }

    /// Replace the modifier list (fields, properties and methods only)
    pub fn with_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let modifiers: Vec<String> = modifiers.into_iter().map(Into::into).collect();
        match &mut self {
            Self::Field(f) => f.modifiers = modifiers,
            Self::Property(p) => p.modifiers = modifiers,
            Self::Method(m) => m.modifiers = modifiers,
            Self::Other { .. } => {}
        }
        self
    }

    /// Append a parameter (methods only)
    pub fn with_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        if let Self::Method(m) = &mut self {
            m.parameters.push(parameter);
        }
        self
    }
}

/// A class, interface, struct or record declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub kind: DeclarationKind,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Base class and interfaces exactly as written, generics included
    #[serde(default)]
    pub base_list: Vec<String>,
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
    #[serde(default)]
    pub nested: Vec<TypeDeclaration>,
}

impl TypeDeclaration {
    pub fn new(kind: DeclarationKind, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            modifiers: Vec::new(),
            identifier: identifier.into(),
            namespace: None,
            base_list: Vec::new(),
            members: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn class(identifier: impl Into<String>) -> Self {
        Self::new(DeclarationKind::Class, identifier)
    }

    pub fn interface(identifier: impl Into<String>) -> Self {
        Self::new(DeclarationKind::Interface, identifier)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_list.push(base.into());
        self
    }

    pub fn with_member(mut self, member: MemberDeclaration) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_nested(mut self, nested: TypeDeclaration) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }
}

/// A declaration reached while walking a syntax root, with its effective namespace
#[derive(Debug, Clone, Copy)]
pub struct DeclarationRef<'a> {
    pub declaration: &'a TypeDeclaration,
    pub namespace: Option<&'a str>,
}

impl DeclarationRef<'_> {
    /// Namespace-qualified name, or the bare identifier outside any namespace
    pub fn qualified_name(&self) -> String {
        qualify(self.namespace, &self.declaration.identifier)
    }
}

/// Join a namespace and an identifier
pub fn qualify(namespace: Option<&str>, identifier: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}.{}", ns, identifier),
        _ => identifier.to_string(),
    }
}

/// Root node of a document's syntax tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxRoot {
    #[serde(default)]
    pub declarations: Vec<TypeDeclaration>,
}

impl SyntaxRoot {
    pub fn new(declarations: Vec<TypeDeclaration>) -> Self {
        Self { declarations }
    }

    /// Every type declaration in the tree, nested ones included, in source order
    ///
    /// Nested declarations follow their parent and inherit its namespace when
    /// they declare none.
    pub fn descendant_types(&self) -> Vec<DeclarationRef<'_>> {
        let mut out = Vec::new();
        for declaration in &self.declarations {
            collect(declaration, None, &mut out);
        }
        out
    }
}

fn collect<'a>(
    declaration: &'a TypeDeclaration,
    inherited: Option<&'a str>,
    out: &mut Vec<DeclarationRef<'a>>,
) {
    let namespace = declaration.namespace.as_deref().or(inherited);
    out.push(DeclarationRef {
        declaration,
        namespace,
    });
    for nested in &declaration.nested {
        collect(nested, namespace, out);
    }
}

/// A parsed document; the root may be missing if parsing did not finish
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub root: Option<SyntaxRoot>,
}

impl SyntaxTree {
    pub fn new(path: impl Into<String>, root: SyntaxRoot) -> Self {
        Self {
            path: path.into(),
            root: Some(root),
        }
    }

    pub fn root(&self) -> Option<&SyntaxRoot> {
        self.root.as_ref()
    }
}
