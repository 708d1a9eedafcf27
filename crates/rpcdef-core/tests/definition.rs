// crates/rpcdef-core/tests/definition.rs
// ============================================================================
// Module: Definition Model Tests
// Description: Serialization, lookup, and type-string coverage.
// Purpose: Pin the document shape renderers depend on.
// Dependencies: rpcdef-core, serde_json
// ============================================================================

//! ## Overview
//! Checks the lower-camel serialized keys, object lookups, type-string
//! rendering, and canonical hashing of definitions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rpcdef_core::Definition;
use rpcdef_core::DefinitionError;
use rpcdef_core::FieldDecl;
use rpcdef_core::Method;
use rpcdef_core::Object;
use rpcdef_core::PackageRef;
use rpcdef_core::Service;
use rpcdef_core::SourcePosition;
use rpcdef_core::Type;
use rpcdef_core::TypeRef;
use rpcdef_core::hashing::canonical_json_bytes;
use rpcdef_core::hashing::hash_canonical_json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn object_type(name: &str) -> Type {
    Type {
        type_id: format!("example.com/greeter.{name}"),
        type_name: name.to_string(),
        object_name: name.to_string(),
        clean_object_name: name.to_string(),
        is_object: true,
        ..Type::default()
    }
}

fn sample_definition() -> Definition {
    Definition {
        package_name: "greeter".to_string(),
        services: vec![Service {
            name: "GreeterService".to_string(),
            methods: vec![Method {
                name: "Greet".to_string(),
                name_lower_camel: "greet".to_string(),
                input_object: object_type("GreetRequest"),
                output_object: object_type("GreetResponse"),
                ..Method::default()
            }],
            ..Service::default()
        }],
        objects: vec![
            Object {
                type_id: "example.com/greeter.GreetRequest".to_string(),
                name: "GreetRequest".to_string(),
                ..Object::default()
            },
            Object {
                type_id: "example.com/greeter.GreetResponse".to_string(),
                name: "GreetResponse".to_string(),
                ..Object::default()
            },
        ],
        ..Definition::default()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn object_lookup_reports_not_found() {
    let definition = sample_definition();
    assert!(definition.object("GreetRequest").is_ok());
    assert_eq!(
        definition.object("Missing").err(),
        Some(DefinitionError::NotFound("Missing".to_string()))
    );
}

#[test]
fn input_and_output_roles_follow_methods() {
    let definition = sample_definition();
    assert!(definition.object_is_input("GreetRequest"));
    assert!(!definition.object_is_output("GreetRequest"));
    assert!(definition.object_is_output("GreetResponse"));
    assert!(!definition.object_is_input("GreetResponse"));
    assert_eq!(definition.methods().count(), 1);
}

#[test]
fn serialized_keys_are_lower_camel() -> Result<(), serde_json::Error> {
    let value = serde_json::to_value(sample_definition())?;
    assert!(value.get("packageName").is_some());
    let method = &value["services"][0]["methods"][0];
    assert_eq!(method["nameLowerCamel"], "greet");
    assert_eq!(method["inputObject"]["typeID"], "example.com/greeter.GreetRequest");
    assert_eq!(method["inputObject"]["cleanObjectName"], "GreetRequest");
    assert_eq!(method["inputObject"]["isObject"], true);
    assert!(method["inputObject"].get("jsType").is_some());
    assert!(method["inputObject"].get("isOptional").is_some());
    assert_eq!(value["objects"][0]["typeID"], "example.com/greeter.GreetRequest");
    Ok(())
}

#[test]
fn type_strings_follow_source_notation() {
    let greeter = PackageRef::new("example.com/greeter", "greeter");
    let shared = PackageRef::new("example.com/shared", "shared");
    let ty = TypeRef::slice_of(TypeRef::pointer_to(TypeRef::named(greeter.clone(), "Thing")));
    assert_eq!(ty.unqualified(), "[]*Thing");
    assert_eq!(ty.qualified(), "[]*example.com/greeter.Thing");

    let map = TypeRef::map_of(TypeRef::builtin("string"), TypeRef::Any);
    assert_eq!(map.unqualified(), "map[string]interface{}");

    let mut seen = Vec::new();
    let mixed = TypeRef::map_of(TypeRef::builtin("string"), TypeRef::named(shared, "Item"));
    let rendered = mixed.type_string(&mut |package| {
        seen.push(package.path.clone());
        if package.path == greeter.path { String::new() } else { package.name.clone() }
    });
    assert_eq!(rendered, "map[string]shared.Item");
    assert_eq!(seen, vec!["example.com/shared".to_string()]);

    let array = TypeRef::Array {
        len: 4,
        elem: Box::new(TypeRef::builtin("byte")),
    };
    assert_eq!(array.unqualified(), "[4]byte");

    let nested = TypeRef::Struct(vec![FieldDecl {
        name: "Inner".to_string(),
        ty: TypeRef::builtin("int"),
        tag: String::new(),
        position: SourcePosition::default(),
    }]);
    assert_eq!(nested.unqualified(), "struct{Inner int}");
}

#[test]
fn canonical_hash_is_stable() -> Result<(), Box<dyn std::error::Error>> {
    let first = hash_canonical_json(&sample_definition())?;
    let second = hash_canonical_json(&sample_definition())?;
    assert_eq!(first, second);
    assert_eq!(first.value.len(), 64);

    let mut changed = sample_definition();
    changed.package_name = "other".to_string();
    assert_ne!(hash_canonical_json(&changed)?, first);

    let bytes = canonical_json_bytes(&sample_definition())?;
    assert!(bytes.starts_with(b"{\"imports\":{}"));
    Ok(())
}

#[test]
fn source_position_renders_diagnostic_prefix() {
    assert_eq!(SourcePosition::new("greeter.go", 12, 3).to_string(), "greeter.go:12:3");
    assert_eq!(SourcePosition::new("greeter.go", 12, 0).to_string(), "greeter.go:12");
    assert_eq!(SourcePosition::default().to_string(), "-");
}
