//! End-to-end rendering through the public API

use std::sync::Arc;

use plantscribe::prelude::*;
use plantscribe::{render_class, render_class_with_config, SyntaxRoot, SyntaxTree};
use plantscribe::{MemberDeclaration, ParameterDeclaration, TypeDeclaration};

struct DogModel;

impl SemanticModel for DogModel {
    fn type_symbol(&self, qualified_name: &str) -> Option<TypeSymbol> {
        match qualified_name {
            "Dog" => Some(
                TypeSymbol::new("Dog")
                    .with_base("Animal")
                    .with_interface("IBarkable"),
            ),
            "Kennel" => Some(
                TypeSymbol::new("Kennel")
                    .with_base("Building<Dog>")
                    .with_interface("IFoo")
                    .with_interface("IBar")
                    .with_interface("IFoo")
                    .with_interface("IBar<int>"),
            ),
            "Plain" => Some(TypeSymbol::new("Plain").with_base("System.Object")),
            _ => None,
        }
    }
}

struct Document(SyntaxTree);

impl DocumentSource for Document {
    fn name(&self) -> &str {
        &self.0.path
    }

    fn semantic_model(&self) -> Option<Arc<dyn SemanticModel>> {
        Some(Arc::new(DogModel))
    }

    fn syntax_tree(&self) -> Option<&SyntaxTree> {
        Some(&self.0)
    }
}

struct Project(Vec<Document>);

impl ProjectSource for Project {
    fn name(&self) -> &str {
        "Zoo"
    }

    fn documents(&self) -> Vec<&dyn DocumentSource> {
        self.0.iter().map(|d| d as &dyn DocumentSource).collect()
    }
}

struct Codebase(Project);

impl CodebaseProvider for Codebase {
    fn projects(&self) -> Result<Vec<&dyn ProjectSource>, ScribeError> {
        Ok(vec![&self.0 as &dyn ProjectSource])
    }
}

fn codebase() -> Codebase {
    let dog = TypeDeclaration::class("Dog")
        .with_base("Animal")
        .with_base("IBarkable")
        .with_member(MemberDeclaration::method("Bark", "void").with_modifiers(["public"]))
        .with_member(MemberDeclaration::property("Age", "int"))
        .with_member(MemberDeclaration::field("string", "Name").with_modifiers(["private"]));

    let kennel = TypeDeclaration::class("Kennel")
        .with_base("Building<Dog>")
        .with_base("IFoo")
        .with_base("IBar")
        .with_member(
            MemberDeclaration::method("House", "bool")
                .with_modifiers(["internal"])
                .with_parameter(ParameterDeclaration::new("dog", "Dog"))
                .with_parameter(ParameterDeclaration::untyped("__arglist")),
        );

    let plain = TypeDeclaration::class("Plain")
        .with_base("object")
        .with_member(MemberDeclaration::field("int", "count"));

    Codebase(Project(vec![Document(SyntaxTree::new(
        "Zoo.cs",
        SyntaxRoot::new(vec![dog, kennel, plain]),
    ))]))
}

#[test]
fn test_dog_renders_exactly() {
    let diagram = render_class(&codebase(), "Zoo", "Dog").unwrap().unwrap();
    assert_eq!(
        diagram,
        "@startuml\n\nDog --|> Animal\ninterface IBarkable\nDog ..|> IBarkable\n\nclass Dog {\n    {field} -Name : string\n    {field} +Age : int\n    {method} +Bark() : void\n}\n\n@enduml\n"
    );
}

#[test]
fn test_generic_base_and_duplicate_interfaces() {
    let diagram = render_class(&codebase(), "Zoo", "Kennel").unwrap().unwrap();
    assert!(diagram.contains("Kennel --|> Building\n"));
    assert!(!diagram.contains('<'));
    assert_eq!(diagram.matches("interface ").count(), 2);
    assert_eq!(diagram.matches("..|>").count(), 2);
    assert!(diagram.contains("interface IFoo\nKennel ..|> IFoo\ninterface IBar\nKennel ..|> IBar\n"));
    assert!(diagram.contains("    {method} ~House(dog : Dog) : bool\n"));
}

#[test]
fn test_root_base_has_no_relationship_lines() {
    let diagram = render_class(&codebase(), "Zoo", "Plain").unwrap().unwrap();
    assert_eq!(
        diagram,
        "@startuml\n\n\nclass Plain {\n    {field} -count : int\n}\n\n@enduml\n"
    );
}

#[test]
fn test_missing_class_and_assembly() {
    assert!(render_class(&codebase(), "Zoo", "Ghost").unwrap().is_none());
    assert!(render_class(&codebase(), "Farm", "Dog").unwrap().is_none());
}

#[test]
fn test_assembly_qualifier() {
    let config = DiagramConfig::default().with_qualifier(NameQualifier::Assembly);
    let diagram = render_class_with_config(&codebase(), "Zoo", "Dog", &config)
        .unwrap()
        .unwrap();
    assert!(diagram.contains("Zoo.Dog --|> Animal\n"));
    assert!(diagram.contains("Zoo.Dog ..|> IBarkable\n"));
    assert!(diagram.contains("class Zoo.Dog {\n"));
}

#[test]
fn test_configured_root_type_suppresses_base() {
    let config = DiagramConfig::default().with_root_type("Animal");
    let diagram = render_class_with_config(&codebase(), "Zoo", "Dog", &config)
        .unwrap()
        .unwrap();
    assert!(!diagram.contains("--|>"));
    assert!(diagram.contains("Dog ..|> IBarkable\n"));
}

#[test]
fn test_mixed_case_members_sort_alphabetically() {
    let manifest = r#"{ "projects": [{ "name": "Market", "documents": [{ "name": "Fruit.cs",
        "tree": { "root": { "declarations": [{ "kind": "class", "identifier": "Fruit",
            "members": [
                { "method": { "modifiers": ["public"], "identifier": "zest", "return_type": "void" } },
                { "field": { "type": "int", "variables": ["apple"] } },
                { "method": { "modifiers": ["public"], "identifier": "Peel", "return_type": "void" } },
                { "field": { "type": "int", "variables": ["Banana"] } }
            ] }] } } }] }] }"#;
    let diagram = plantscribe::render_manifest_class(manifest, "Market", "Fruit")
        .unwrap()
        .unwrap();
    assert_eq!(
        diagram,
        "@startuml\n\n\nclass Fruit {\n    {field} -apple : int\n    {field} -Banana : int\n    {method} +Peel() : void\n    {method} +zest() : void\n}\n\n@enduml\n"
    );
}
