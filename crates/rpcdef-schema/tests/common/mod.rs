// crates/rpcdef-schema/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared catalog fixtures for rpcdef-schema tests.
// Purpose: Provide reusable declaration builders for integration tests.
// Dependencies: rpcdef-core
// ============================================================================

//! ## Overview
//! Provides shorthand constructors for packages, records, interfaces, and
//! fields, plus the canonical greeter catalog used across scenarios.

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Shared helpers are not used by every test binary."
)]

use rpcdef_core::CatalogPackage;
use rpcdef_core::DeclarationShape;
use rpcdef_core::FieldDecl;
use rpcdef_core::InterfaceDecl;
use rpcdef_core::MethodDecl;
use rpcdef_core::PackageRef;
use rpcdef_core::SourceCatalog;
use rpcdef_core::SourcePosition;
use rpcdef_core::StructDecl;
use rpcdef_core::TypeRef;

// ============================================================================
// SECTION: Packages
// ============================================================================

/// Primary package used by most fixtures.
pub fn greeter() -> PackageRef {
    PackageRef::new("example.com/greeter", "greeter")
}

/// Context dependency package.
pub fn context_pkg() -> PackageRef {
    PackageRef::new("context", "context")
}

/// Timestamp dependency package.
pub fn time_pkg() -> PackageRef {
    PackageRef::new("time", "time")
}

/// Dependency package holding shared records.
pub fn shared() -> PackageRef {
    PackageRef::new("example.com/shared", "shared")
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Named type in the greeter package.
pub fn named(name: &str) -> TypeRef {
    TypeRef::named(greeter(), name)
}

/// Pointer to a named type in the greeter package.
pub fn ptr(name: &str) -> TypeRef {
    TypeRef::pointer_to(named(name))
}

/// The designated context parameter.
pub fn context_param() -> TypeRef {
    TypeRef::named(context_pkg(), "Context")
}

/// The designated error result.
pub fn error_result() -> TypeRef {
    TypeRef::builtin("error")
}

// ============================================================================
// SECTION: Declarations
// ============================================================================

/// Untagged field declared at `greeter.go:line`.
pub fn field(name: &str, ty: TypeRef) -> FieldDecl {
    tagged(name, ty, "")
}

/// Tagged field.
pub fn tagged(name: &str, ty: TypeRef, tag: &str) -> FieldDecl {
    FieldDecl {
        name: name.to_string(),
        ty,
        tag: tag.to_string(),
        position: SourcePosition::new("greeter.go", 20, 2),
    }
}

/// Record declaration.
pub fn record(fields: Vec<FieldDecl>) -> DeclarationShape {
    DeclarationShape::Struct(StructDecl {
        fields,
    })
}

/// Method declared at `greeter.go:12:2`.
pub fn method(name: &str, params: Vec<TypeRef>, results: Vec<TypeRef>) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        position: SourcePosition::new("greeter.go", 12, 2),
        params,
        results,
    }
}

/// Conventional `Name(context.Context, *NameRequest) (*NameResponse, error)` method.
pub fn rpc(name: &str, request: &str, response: &str) -> MethodDecl {
    method(name, vec![context_param(), ptr(request)], vec![ptr(response), error_result()])
}

/// Interface declaration.
pub fn interface(methods: Vec<MethodDecl>) -> DeclarationShape {
    DeclarationShape::Interface(InterfaceDecl {
        methods,
    })
}

// ============================================================================
// SECTION: Catalogs
// ============================================================================

/// Standard dependency packages (context, time).
pub fn dependencies() -> Vec<CatalogPackage> {
    vec![
        CatalogPackage::dependency(context_pkg())
            .with_declaration("Context", interface(Vec::new())),
        CatalogPackage::dependency(time_pkg()).with_declaration(
            "Time",
            record(vec![field("wall", TypeRef::builtin("uint64"))]),
        ),
    ]
}

/// Catalog with one primary package plus the standard dependencies.
pub fn catalog(primary: CatalogPackage) -> SourceCatalog {
    catalog_of(vec![primary])
}

/// Catalog with several packages plus the standard dependencies.
pub fn catalog_of(mut packages: Vec<CatalogPackage>) -> SourceCatalog {
    packages.extend(dependencies());
    SourceCatalog::from_packages(packages).expect("fixture catalog should be valid")
}

/// The greeter package: one service, one method, request and response records.
pub fn greeter_package() -> CatalogPackage {
    CatalogPackage::new(greeter())
        .with_declaration_at(
            "GreeterService",
            SourcePosition::new("greeter.go", 10, 6),
            interface(vec![rpc("Greet", "GreetRequest", "GreetResponse")]),
        )
        .with_declaration(
            "GreetRequest",
            record(vec![
                field("Name", TypeRef::builtin("string")),
                field("Reason", TypeRef::builtin("string")),
                field("Enthusiasm", TypeRef::builtin("int")),
            ]),
        )
        .with_declaration(
            "GreetResponse",
            record(vec![tagged(
                "Acclamation",
                TypeRef::builtin("string"),
                r#"json:"acclamation,omitempty""#,
            )]),
        )
        .with_doc("GreeterService", "GreeterService makes nice greetings.\nfeatured: true")
        .with_doc("GreeterService.Greet", "Greet makes a greeting.")
        .with_doc("GreetRequest", "GreetRequest is the request object.")
        .with_doc("GreetRequest.Name", "example: \"Mat\"\n\nName is the person to greet.")
}

/// Catalog holding only the greeter package.
pub fn greeter_catalog() -> SourceCatalog {
    catalog(greeter_package())
}
