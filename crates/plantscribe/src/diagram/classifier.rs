//! Member classification
//!
//! Turns raw member declarations into [`MemberRecord`]s and groups a type's
//! members into fields, properties and methods, each sorted by name.

use tracing::{span, trace, Level};

use crate::core::{
    compare_names, MemberDeclaration, MemberRecord, Parameter, TypeRecord, Visibility,
};

/// A field or property row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    pub name: String,
    pub type_name: String,
}

/// A method row with its marker and parameter signature already computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLine {
    pub marker: &'static str,
    pub name: String,
    pub signature: String,
    pub return_type: String,
}

/// A type's members split into the three rendered groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedMembers {
    pub fields: Vec<FieldLine>,
    pub properties: Vec<FieldLine>,
    pub methods: Vec<MethodLine>,
}

impl ClassifiedMembers {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.properties.is_empty() && self.methods.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len() + self.properties.len() + self.methods.len()
    }
}

/// Groups and orders members, computes visibility markers and signatures
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberClassifier;

impl MemberClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Convert a raw declaration into a member record
    ///
    /// Only the first variable of a multi-variable field is kept. Declarations
    /// other than fields, properties and methods yield `None`.
    pub fn lower(&self, declaration: &MemberDeclaration) -> Option<MemberRecord> {
        match declaration {
            MemberDeclaration::Field(field) => {
                let name = field.variables.first()?;
                Some(MemberRecord::Field {
                    name: name.clone(),
                    type_name: field.type_name.clone(),
                })
            }
            MemberDeclaration::Property(property) => Some(MemberRecord::Property {
                name: property.identifier.clone(),
                type_name: property.type_name.clone(),
            }),
            MemberDeclaration::Method(method) => Some(MemberRecord::Method {
                name: method.identifier.clone(),
                visibility: Visibility::from_modifiers(&method.modifiers),
                params: method
                    .parameters
                    .iter()
                    .map(|p| Parameter {
                        name: p.identifier.clone(),
                        type_name: p.type_name.clone(),
                    })
                    .collect(),
                return_type: method.return_type.clone(),
            }),
            MemberDeclaration::Other { .. } => None,
        }
    }

    /// Reorder members in place: fields, then properties, then methods, each by name
    ///
    /// Names compare case-insensitively. The sort is stable, so overloads keep
    /// their source order.
    pub fn order(&self, members: &mut [MemberRecord]) {
        members.sort_by(|a, b| {
            a.group()
                .cmp(&b.group())
                .then_with(|| compare_names(a.name(), b.name()))
        });
    }

    /// Classify the members of `record`
    pub fn classify(&self, record: &TypeRecord) -> ClassifiedMembers {
        let classify_span = span!(
            Level::DEBUG,
            "classify_members",
            type_name = record.qualified_name.as_str(),
            member_count = record.members.len()
        );
        let _enter = classify_span.enter();

        let mut members = record.members.clone();
        self.order(&mut members);

        let mut classified = ClassifiedMembers::default();
        for member in members {
            match member {
                MemberRecord::Field { name, type_name } => {
                    classified.fields.push(FieldLine { name, type_name });
                }
                MemberRecord::Property { name, type_name } => {
                    classified.properties.push(FieldLine { name, type_name });
                }
                MemberRecord::Method {
                    name,
                    visibility,
                    params,
                    return_type,
                } => {
                    let line = MethodLine {
                        marker: visibility.marker(record.kind),
                        signature: signature(&params),
                        name,
                        return_type,
                    };
                    trace!(method = line.name.as_str(), marker = line.marker, "Classified method");
                    classified.methods.push(line);
                }
            }
        }
        classified
    }
}

/// `name : type` pairs joined by `, `; untyped parameters are left out
fn signature(params: &[Parameter]) -> String {
    params
        .iter()
        .filter_map(|p| {
            p.type_name
                .as_deref()
                .map(|type_name| format!("{} : {}", p.name, type_name))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
