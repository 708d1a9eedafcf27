// crates/rpcdef-schema/tests/filtering.rs
// ============================================================================
// Module: Filtering and Options Tests
// Description: Include/exclude lists, pruning, and designated type options.
// Purpose: Validate how builder options shape the finished definition.
// Dependencies: rpcdef-core, rpcdef-schema
// ============================================================================

//! ## Overview
//! Builds a package with public, admin, and internal services, then checks
//! which services and objects survive each combination of options.

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use rpcdef_core::CatalogPackage;
use rpcdef_core::Definition;
use rpcdef_core::PackageRef;
use rpcdef_core::TypeRef;
use rpcdef_schema::BuilderOptions;
use rpcdef_schema::DesignatedTypes;
use rpcdef_schema::SchemaBuilder;
use rpcdef_schema::SchemaError;

use crate::common::catalog;
use crate::common::catalog_of;
use crate::common::field;
use crate::common::greeter;
use crate::common::interface;
use crate::common::method;
use crate::common::named;
use crate::common::ptr;
use crate::common::record;
use crate::common::rpc;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Three services sharing one record (`Shared`) between public and admin.
fn services_package() -> CatalogPackage {
    CatalogPackage::new(greeter())
        .with_declaration("PublicService", interface(vec![rpc("Read", "ReadRequest", "Shared")]))
        .with_declaration(
            "AdminService",
            interface(vec![
                rpc("Reset", "ResetRequest", "ResetResponse"),
                rpc("Inspect", "ResetRequest", "Shared"),
            ]),
        )
        .with_declaration("InternalService", interface(vec![rpc("Poke", "Poke", "Poke")]))
        .with_declaration("ReadRequest", record(vec![field("Key", TypeRef::builtin("string"))]))
        .with_declaration("ResetRequest", record(vec![field("Detail", ptr("Detail"))]))
        .with_declaration("ResetResponse", record(Vec::new()))
        .with_declaration("Detail", record(Vec::new()))
        .with_declaration("Shared", record(vec![field("Value", TypeRef::builtin("string"))]))
        .with_declaration("Poke", record(Vec::new()))
}

/// Builds the services package with `options`.
fn build(options: BuilderOptions) -> Result<Definition, SchemaError> {
    let source = catalog(services_package());
    SchemaBuilder::for_source(&source).with_options(options).build()
}

/// Service names in definition order.
fn service_names(definition: &Definition) -> Vec<&str> {
    definition.services.iter().map(|service| service.name.as_str()).collect()
}

/// Object names in definition order.
fn object_names(definition: &Definition) -> Vec<&str> {
    definition.objects.iter().map(|object| object.name.as_str()).collect()
}

// ============================================================================
// SECTION: Include / Exclude
// ============================================================================

#[test]
fn all_services_build_sorted_by_default() -> Result<(), SchemaError> {
    let definition = build(BuilderOptions::default())?;
    assert_eq!(service_names(&definition), vec!["AdminService", "InternalService", "PublicService"]);
    assert_eq!(object_names(&definition), vec![
        "Detail",
        "Poke",
        "ReadRequest",
        "ResetRequest",
        "ResetResponse",
        "Shared"
    ]);
    Ok(())
}

#[test]
fn include_list_limits_services() -> Result<(), SchemaError> {
    let definition = build(BuilderOptions::default().with_include(["PublicService"]))?;
    assert_eq!(service_names(&definition), vec!["PublicService"]);
    assert_eq!(object_names(&definition), vec!["ReadRequest", "Shared"]);
    Ok(())
}

#[test]
fn exclude_prunes_objects_only_the_excluded_service_reaches() -> Result<(), SchemaError> {
    let definition = build(BuilderOptions::default().with_exclude(["InternalService"]))?;
    assert_eq!(service_names(&definition), vec!["AdminService", "PublicService"]);
    assert!(definition.object("Poke").is_err());
    Ok(())
}

#[test]
fn exclude_keeps_objects_still_reachable_from_retained_services() -> Result<(), SchemaError> {
    let definition = build(BuilderOptions::default().with_exclude(["AdminService"]))?;
    assert_eq!(service_names(&definition), vec!["InternalService", "PublicService"]);
    let names = object_names(&definition);
    assert!(names.contains(&"Shared"));
    assert!(!names.contains(&"ResetRequest"));
    assert!(!names.contains(&"ResetResponse"));
    // Only request and response identities are excluded; Detail is a field type.
    assert!(names.contains(&"Detail"));

    let shared = definition.object("Shared")?;
    let error_fields = shared.fields.iter().filter(|field| field.name == "Error").count();
    assert_eq!(error_fields, 1);
    Ok(())
}

#[test]
fn excluded_record_reached_through_retained_fields_survives() -> Result<(), SchemaError> {
    let package = CatalogPackage::new(greeter())
        .with_declaration("AuditService", interface(vec![rpc("Log", "Entry", "Entry")]))
        .with_declaration("ViewService", interface(vec![rpc("Show", "View", "View")]))
        .with_declaration("Entry", record(vec![field("Text", TypeRef::builtin("string"))]))
        .with_declaration("View", record(vec![field("Entries", TypeRef::slice_of(named("Entry")))]));
    let source = catalog(package);
    let options = BuilderOptions::default().with_exclude(["AuditService"]);
    let definition = SchemaBuilder::for_source(&source).with_options(options).build()?;
    assert_eq!(service_names(&definition), vec!["ViewService"]);
    assert_eq!(object_names(&definition), vec!["Entry", "View"]);
    Ok(())
}

// ============================================================================
// SECTION: Other Options
// ============================================================================

#[test]
fn package_name_override_wins() -> Result<(), SchemaError> {
    let definition = build(BuilderOptions::default().with_package_name("api"))?;
    assert_eq!(definition.package_name, "api");
    Ok(())
}

#[test]
fn designated_types_are_configurable() -> Result<(), SchemaError> {
    let runtime = PackageRef::new("example.com/runtime", "runtime");
    let package = CatalogPackage::new(greeter())
        .with_declaration(
            "ClockService",
            interface(vec![method(
                "Now",
                vec![TypeRef::named(runtime.clone(), "Ctx"), ptr("NowRequest")],
                vec![ptr("NowResponse"), TypeRef::named(runtime.clone(), "Failure")],
            )]),
        )
        .with_declaration("NowRequest", record(Vec::new()))
        .with_declaration(
            "NowResponse",
            record(vec![field("At", TypeRef::named(runtime.clone(), "Instant"))]),
        );
    let dependency = CatalogPackage::dependency(runtime)
        .with_declaration("Ctx", interface(Vec::new()))
        .with_declaration("Failure", interface(Vec::new()))
        .with_declaration("Instant", record(vec![field("Nanos", TypeRef::builtin("int64"))]));
    let source = catalog_of(vec![package, dependency]);

    let types = DesignatedTypes {
        context: "example.com/runtime.Ctx".to_string(),
        error: "example.com/runtime.Failure".to_string(),
        timestamps: BTreeSet::from(["example.com/runtime.Instant".to_string()]),
    };
    let definition =
        SchemaBuilder::for_source(&source).with_options(BuilderOptions::default().with_types(types)).build()?;
    let response = definition.object("NowResponse")?;
    assert_eq!(response.fields[0].ty.underlying_type_name, "string");
    assert!(definition.object("Instant").is_err());

    let rejected = SchemaBuilder::for_source(&source).build();
    assert!(matches!(rejected, Err(SchemaError::InvalidSignature { .. })));
    Ok(())
}
