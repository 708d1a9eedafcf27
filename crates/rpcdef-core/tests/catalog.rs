// crates/rpcdef-core/tests/catalog.rs
// ============================================================================
// Module: Source Catalog Tests
// Description: Integration tests for catalog loading and oracle queries.
// Purpose: Validate JSON/RON authoring, fail-closed loading, and lookups.
// Dependencies: rpcdef-core, tempfile
// ============================================================================

//! ## Overview
//! Loads catalogs from disk in both authoring formats and checks that the
//! oracle and documentation index answer queries deterministically.

#![allow(clippy::panic, reason = "Test-only assertions are permitted.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use rpcdef_core::CatalogError;
use rpcdef_core::CatalogFormat;
use rpcdef_core::CatalogPackage;
use rpcdef_core::DeclarationShape;
use rpcdef_core::DocIndex;
use rpcdef_core::PackageRef;
use rpcdef_core::SourceCatalog;
use rpcdef_core::SourcePosition;
use rpcdef_core::StructDecl;
use rpcdef_core::TypeOracle;
use rpcdef_core::TypeRef;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

const GREETER_RON: &str = r#"(packages: [
    (
        package: (path: "example.com/greeter", name: "greeter"),
        declarations: [
            (
                name: "GreeterService",
                position: (file: "greeter.go", line: 10, column: 6),
                shape: Interface((methods: [
                    (
                        name: "Greet",
                        params: [
                            Named(package: (path: "context", name: "context"), name: "Context"),
                            Named(package: (path: "example.com/greeter", name: "greeter"), name: "GreetRequest"),
                        ],
                        results: [
                            Pointer(Named(package: (path: "example.com/greeter", name: "greeter"), name: "GreetResponse")),
                            Builtin("error"),
                        ],
                    ),
                ])),
            ),
            (
                name: "GreetRequest",
                shape: Struct((fields: [
                    (name: "Name", type: Builtin("string"), tag: "json:\"name\""),
                ])),
            ),
            (
                name: "GreetResponse",
                shape: Struct((fields: [])),
            ),
        ],
        docs: {
            "GreeterService": "GreeterService makes greetings.",
            "GreeterService.Greet": "Greet says hello.",
            "GreetRequest.Name": "Name of the person.",
        },
    ),
    (
        package: (path: "context", name: "context"),
        primary: false,
        declarations: [
            (name: "Context", shape: Interface((methods: []))),
        ],
    ),
])"#;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn ron_catalog_answers_oracle_queries() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = SourceCatalog::parse(GREETER_RON, CatalogFormat::Ron)?;
    let packages = catalog.packages();
    assert_eq!(packages, vec![PackageRef::new("example.com/greeter", "greeter")]);

    let names = catalog.scope_names(&packages[0]);
    assert_eq!(names, vec!["GreetRequest", "GreetResponse", "GreeterService"]);

    let service =
        catalog.declaration("example.com/greeter", "GreeterService").ok_or("missing service")?;
    assert_eq!(service.position, SourcePosition::new("greeter.go", 10, 6));
    assert_eq!(service.package, packages[0]);
    let interface = service.as_interface().ok_or("expected interface")?;
    assert_eq!(interface.methods[0].params.len(), 2);
    assert_eq!(interface.methods[0].params[0].qualified(), "context.Context");
    assert_eq!(interface.methods[0].results[0].unqualified(), "*GreetResponse");

    assert!(catalog.declaration("context", "Context").is_some());
    assert!(catalog.declaration("context", "Missing").is_none());
    Ok(())
}

#[test]
fn ron_catalog_answers_doc_queries() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = SourceCatalog::parse(GREETER_RON, CatalogFormat::Ron)?;
    let path = "example.com/greeter";
    assert_eq!(catalog.type_doc(path, "GreeterService"), Some("GreeterService makes greetings."));
    assert_eq!(catalog.method_doc(path, "GreeterService", "Greet"), Some("Greet says hello."));
    assert_eq!(catalog.field_doc(path, "GreetRequest", "Name"), Some("Name of the person."));
    assert_eq!(catalog.type_doc(path, "GreetRequest"), None);
    assert_eq!(catalog.type_doc("unknown", "GreeterService"), None);
    Ok(())
}

#[test]
fn json_catalog_loads_from_disk() -> Result<(), Box<dyn std::error::Error>> {
    let ron_catalog = SourceCatalog::parse(GREETER_RON, CatalogFormat::Ron)?;
    let declaration = ron_catalog
        .declaration("example.com/greeter", "GreetRequest")
        .ok_or("missing request")?
        .clone();
    let document = serde_json::json!({
        "packages": [{
            "package": {"path": "example.com/greeter", "name": "greeter"},
            "declarations": [{"name": "GreetRequest", "shape": declaration.shape}],
        }]
    });
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("catalog.json");
    fs::write(&path, serde_json::to_vec_pretty(&document)?)?;

    let catalog = SourceCatalog::load(&path)?;
    let loaded = catalog.declaration("example.com/greeter", "GreetRequest").ok_or("missing")?;
    let fields = &loaded.as_struct().ok_or("expected struct")?.fields;
    assert_eq!(fields[0].name, "Name");
    assert_eq!(fields[0].ty, TypeRef::builtin("string"));
    assert_eq!(fields[0].tag, "json:\"name\"");
    Ok(())
}

#[test]
fn load_rejects_unknown_extension() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("catalog.yaml");
    fs::write(&path, "packages: []")?;
    let Err(err) = SourceCatalog::load(&path) else {
        return Err("expected unknown format to be rejected".into());
    };
    assert!(matches!(err, CatalogError::UnknownFormat(_)));
    Ok(())
}

#[test]
fn parse_reports_format_on_failure() {
    let Err(err) = SourceCatalog::parse("{not json", CatalogFormat::Json) else {
        panic!("expected parse failure");
    };
    assert!(matches!(err, CatalogError::Parse {
        format: CatalogFormat::Json,
        ..
    }));
}

#[test]
fn duplicate_declarations_are_rejected() {
    let package = CatalogPackage::new(PackageRef::new("example.com/dup", "dup"))
        .with_declaration("Thing", DeclarationShape::Struct(StructDecl::default()))
        .with_declaration("Thing", DeclarationShape::Alias(TypeRef::builtin("string")));
    let Err(err) = SourceCatalog::from_packages(vec![package]) else {
        panic!("expected duplicate declaration to be rejected");
    };
    assert!(matches!(err, CatalogError::Invalid(message) if message.contains("Thing")));
}

#[test]
fn duplicate_packages_are_rejected() {
    let first = CatalogPackage::new(PackageRef::new("example.com/dup", "dup"));
    let second = CatalogPackage::dependency(PackageRef::new("example.com/dup", "other"));
    assert!(matches!(
        SourceCatalog::from_packages(vec![first, second]),
        Err(CatalogError::Invalid(_))
    ));
}

#[test]
fn format_detection_uses_extension() {
    assert_eq!(CatalogFormat::detect(std::path::Path::new("a/b.RON")), Some(CatalogFormat::Ron));
    assert_eq!(CatalogFormat::detect(std::path::Path::new("b.json")), Some(CatalogFormat::Json));
    assert_eq!(CatalogFormat::detect(std::path::Path::new("b")), None);
}
