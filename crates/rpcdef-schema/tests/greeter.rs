// crates/rpcdef-schema/tests/greeter.rs
// ============================================================================
// Module: Greeter Scenario Tests
// Description: End-to-end build of a one-service, one-method package.
// Purpose: Validate the assembled definition, comments, and determinism.
// Dependencies: rpcdef-core, rpcdef-schema, serde_json
// ============================================================================

//! ## Overview
//! Builds the greeter catalog and checks every part of the resulting
//! definition a renderer relies on: services, methods, objects, field naming,
//! hints, comment metadata, and the injected response field.

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use rpcdef_core::hashing::canonical_json_bytes;
use rpcdef_schema::SchemaBuilder;
use serde_json::json;

use crate::common::greeter_catalog;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn greeter_builds_expected_shape() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = greeter_catalog();
    let definition = SchemaBuilder::for_source(&catalog).build()?;

    assert_eq!(definition.package_name, "greeter");
    assert_eq!(definition.services.len(), 1);
    assert_eq!(definition.services[0].name, "GreeterService");
    assert_eq!(definition.services[0].methods.len(), 1);
    let names: Vec<&str> = definition.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["GreetRequest", "GreetResponse"]);

    let method = &definition.services[0].methods[0];
    assert_eq!(method.name, "Greet");
    assert_eq!(method.name_lower_camel, "greet");
    assert_eq!(method.input_object.clean_object_name, "GreetRequest");
    assert_eq!(method.input_object.object_name, "*GreetRequest");
    assert!(method.input_object.is_optional);
    assert!(method.input_object.is_object);
    assert_eq!(method.output_object.type_id, "example.com/greeter.GreetResponse");

    let response = definition.object("GreetResponse")?;
    assert_eq!(response.fields.len(), 2);
    assert_eq!(response.fields[0].name, "Acclamation");
    assert_eq!(response.fields[0].name_json, "acclamation");
    assert_eq!(response.fields[0].name_lower_camel, "acclamation");
    assert!(response.fields[0].omit_empty);
    assert_eq!(response.fields[0].parsed_tags["json"].options, vec!["omitempty".to_string()]);
    assert_eq!(response.fields[1].name, "Error");
    assert!(response.fields[1].omit_empty);
    assert_eq!(response.fields[1].ty.js_type, "string");

    let request = definition.object("GreetRequest")?;
    assert_eq!(request.fields.len(), 3);
    let enthusiasm = &request.fields[2];
    assert_eq!(enthusiasm.name, "Enthusiasm");
    assert_eq!(enthusiasm.name_json, "Enthusiasm");
    assert_eq!(enthusiasm.name_lower_camel, "enthusiasm");
    assert_eq!(enthusiasm.ty.js_type, "number");
    assert_eq!(enthusiasm.ty.ts_type, "number");
    assert_eq!(enthusiasm.ty.swift_type, "Double");
    assert!(!request.imported);
    assert!(request.package.is_empty());

    assert!(definition.object_is_input("GreetRequest"));
    assert!(definition.object_is_output("GreetResponse"));
    assert!(definition.imports.is_empty());
    Ok(())
}

#[test]
fn comments_are_split_into_metadata_and_prose() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = greeter_catalog();
    let definition = SchemaBuilder::for_source(&catalog).build()?;

    let service = &definition.services[0];
    assert_eq!(service.comment, "GreeterService makes nice greetings.");
    assert_eq!(service.metadata["featured"], json!(true));
    assert_eq!(service.methods[0].comment, "Greet makes a greeting.");
    assert!(service.methods[0].metadata.is_empty());

    let request = definition.object("GreetRequest")?;
    assert_eq!(request.comment, "GreetRequest is the request object.");
    let name = &request.fields[0];
    assert_eq!(name.comment, "Name is the person to greet.");
    assert_eq!(name.metadata["example"], json!("Mat"));
    assert_eq!(name.example, json!("Mat"));
    assert_eq!(request.fields[1].example, serde_json::Value::Null);
    Ok(())
}

#[test]
fn repeated_builds_are_byte_identical() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = greeter_catalog();
    let builder = SchemaBuilder::for_source(&catalog);
    let first = serde_json::to_vec_pretty(&builder.build()?)?;
    let second = serde_json::to_vec_pretty(&builder.build()?)?;
    assert_eq!(first, second);

    let fresh = SchemaBuilder::for_source(&greeter_catalog()).build()?;
    assert_eq!(canonical_json_bytes(&fresh)?, canonical_json_bytes(&builder.build()?)?);
    Ok(())
}

#[test]
fn serialized_definition_uses_renderer_keys() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = greeter_catalog();
    let value = serde_json::to_value(SchemaBuilder::for_source(&catalog).build()?)?;
    let field = &value["objects"][1]["fields"][0];
    assert_eq!(field["nameJSON"], "acclamation");
    assert_eq!(field["omitEmpty"], true);
    assert_eq!(field["type"]["typeName"], "string");
    assert_eq!(field["parsedTags"]["json"]["value"], "acclamation");
    assert_eq!(value["services"][0]["methods"][0]["outputObject"]["cleanObjectName"], "GreetResponse");
    Ok(())
}
