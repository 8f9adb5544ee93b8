//! Indexed data model: assemblies, type records and member records
//!
//! Records refer to each other by name only. A derived type stores the name of
//! its base, never a reference to the base's record.

use std::cmp::Ordering;

use serde::Serialize;

use super::DeclarationKind;

/// The diagram kind of an indexed type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    AbstractClass,
    Interface,
    Struct,
    Record,
}

impl TypeKind {
    /// Derive the kind from a declaration's syntactic kind and modifiers
    pub fn from_declaration(kind: DeclarationKind, modifiers: &[String]) -> Self {
        match kind {
            DeclarationKind::Class if modifiers.iter().any(|m| m == "abstract") => {
                TypeKind::AbstractClass
            }
            DeclarationKind::Class => TypeKind::Class,
            DeclarationKind::Interface => TypeKind::Interface,
            DeclarationKind::Struct => TypeKind::Struct,
            DeclarationKind::Record => TypeKind::Record,
        }
    }

    /// PlantUML keyword introducing a node of this kind
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::AbstractClass => "abstract class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
        }
    }

    /// Class and abstract class; the only kinds whose relationships are resolved
    pub fn is_class_like(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::AbstractClass)
    }
}

/// Declared accessibility of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    Protected,
    Internal,
    Public,
    None,
}

impl Visibility {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            "internal" => Some(Visibility::Internal),
            "public" => Some(Visibility::Public),
            _ => None,
        }
    }

    /// First access modifier in the list, or `None` when there is none
    pub fn from_modifiers(modifiers: &[String]) -> Self {
        modifiers
            .iter()
            .find_map(|m| Self::from_keyword(m))
            .unwrap_or(Visibility::None)
    }

    /// PlantUML marker for a method on a type of the given kind
    ///
    /// Members without an access modifier are private on class-like types and
    /// carry no marker on interfaces.
    pub fn marker(self, kind: TypeKind) -> &'static str {
        match self {
            Visibility::Private => "-",
            Visibility::Protected => "#",
            Visibility::Internal => "~",
            Visibility::Public => "+",
            Visibility::None if kind == TypeKind::Interface => "",
            Visibility::None => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
}

/// An indexed member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum MemberRecord {
    Field {
        name: String,
        #[serde(rename = "type")]
        type_name: String,
    },
    Property {
        name: String,
        #[serde(rename = "type")]
        type_name: String,
    },
    Method {
        name: String,
        visibility: Visibility,
        params: Vec<Parameter>,
        return_type: String,
    },
}

impl MemberRecord {
    pub fn name(&self) -> &str {
        match self {
            MemberRecord::Field { name, .. }
            | MemberRecord::Property { name, .. }
            | MemberRecord::Method { name, .. } => name,
        }
    }

    /// 0 for fields, 1 for properties, 2 for methods
    pub fn group(&self) -> u8 {
        match self {
            MemberRecord::Field { .. } => 0,
            MemberRecord::Property { .. } => 1,
            MemberRecord::Method { .. } => 2,
        }
    }
}

/// An indexed type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRecord {
    pub qualified_name: String,
    pub identifier: String,
    pub kind: TypeKind,
    pub namespace: Option<String>,
    /// Base-list entries as written, generic arguments included
    pub declared_bases: Vec<String>,
    pub base_type_ref: Option<String>,
    pub interface_refs: Vec<String>,
    pub members: Vec<MemberRecord>,
}

impl TypeRecord {
    pub fn new(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        let qualified_name = qualified_name.into();
        let identifier = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&qualified_name)
            .to_string();
        Self {
            qualified_name,
            identifier,
            kind,
            namespace: None,
            declared_bases: Vec::new(),
            base_type_ref: None,
            interface_refs: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: MemberRecord) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_declared_base(mut self, base: impl Into<String>) -> Self {
        self.declared_bases.push(base.into());
        self
    }

    pub fn has_declared_bases(&self) -> bool {
        !self.declared_bases.is_empty()
    }

    /// Whether `name` selects this record, by qualified name or bare identifier
    pub fn answers_to(&self, name: &str) -> bool {
        self.qualified_name == name || self.identifier == name
    }
}

/// Alphabetical order for type and member names
///
/// Case is ignored first; byte order only breaks ties, so `apple` sorts
/// before `Banana` and `Name` before `name`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// An indexed project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assembly {
    pub name: String,
    pub types: Vec<TypeRecord>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Qualified names of every type, sorted alphabetically
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|t| t.qualified_name.clone()).collect();
        names.sort_by(|a, b| compare_names(a, b));
        names
    }

    /// Find a type by qualified name, falling back to the first bare-identifier match
    pub fn find_type(&self, name: &str) -> Option<&TypeRecord> {
        self.types
            .iter()
            .find(|t| t.qualified_name == name)
            .or_else(|| self.types.iter().find(|t| t.answers_to(name)))
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
