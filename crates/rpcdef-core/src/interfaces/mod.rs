// crates/rpcdef-core/src/interfaces/mod.rs
// ============================================================================
// Module: rpcdef Interfaces
// Description: Query surfaces of the type oracle and documentation index.
// Purpose: Decouple the schema builder from any particular compiler front-end.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The schema builder never reads source text. It asks a [`TypeOracle`] for
//! package scopes and declarations, and a [`DocIndex`] for the comments
//! attached to them. Implementations must be deterministic: scope names are
//! reported sorted and methods/fields in declaration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::PackageRef;
use crate::core::SourcePosition;
use crate::core::TypeRef;
use crate::core::naming::is_exported;

// ============================================================================
// SECTION: Declarations
// ============================================================================

/// A top-level named declaration.
///
/// # Invariants
/// - `name` is unique within `package`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declaration name.
    pub name: String,
    /// Declaring package.
    pub package: PackageRef,
    /// Location of the declaration.
    #[serde(default)]
    pub position: SourcePosition,
    /// Underlying shape.
    pub shape: DeclarationShape,
}

impl Declaration {
    /// Returns true when the declaration is externally visible.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    /// Returns the interface body when the declaration is interface-shaped.
    #[must_use]
    pub const fn as_interface(&self) -> Option<&InterfaceDecl> {
        match &self.shape {
            DeclarationShape::Interface(interface) => Some(interface),
            _ => None,
        }
    }

    /// Returns the struct body when the declaration is struct-shaped.
    #[must_use]
    pub const fn as_struct(&self) -> Option<&StructDecl> {
        match &self.shape {
            DeclarationShape::Struct(record) => Some(record),
            _ => None,
        }
    }
}

/// Underlying shape of a named declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationShape {
    /// Method set.
    Interface(InterfaceDecl),
    /// Record.
    Struct(StructDecl),
    /// Named type over any other type (`type Status string`).
    Alias(TypeRef),
}

/// Interface body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// One interface method signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// Location of the method.
    #[serde(default)]
    pub position: SourcePosition,
    /// Parameter types in order.
    #[serde(default)]
    pub params: Vec<TypeRef>,
    /// Result types in order.
    #[serde(default)]
    pub results: Vec<TypeRef>,
}

/// Struct body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDecl {
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// One struct member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Raw annotation string, without surrounding backquotes.
    #[serde(default)]
    pub tag: String,
    /// Location of the field.
    #[serde(default)]
    pub position: SourcePosition,
}

impl FieldDecl {
    /// Returns true when the field is externally visible.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

// ============================================================================
// SECTION: Type Oracle
// ============================================================================

/// Compiler-provided introspection over loaded packages.
pub trait TypeOracle {
    /// Packages matched by the load patterns, in load order.
    fn packages(&self) -> Vec<PackageRef>;

    /// Top-level declaration names in a package scope, sorted ascending.
    fn scope_names(&self, package: &PackageRef) -> Vec<String>;

    /// Resolves a declaration in any loaded or dependency package.
    fn declaration(&self, package_path: &str, name: &str) -> Option<&Declaration>;

    /// Resolves the declaration a named type reference points at.
    fn resolve(&self, ty: &TypeRef) -> Option<&Declaration> {
        match ty {
            TypeRef::Named {
                package,
                name,
            } => self.declaration(&package.path, name),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Documentation Index
// ============================================================================

/// Raw comment text attached to declarations.
///
/// Implementations return the comment verbatim; trimming and metadata
/// extraction happen in the builder.
pub trait DocIndex {
    /// Comment on a top-level declaration.
    fn type_doc(&self, package_path: &str, type_name: &str) -> Option<&str>;

    /// Comment on an interface method.
    fn method_doc(&self, package_path: &str, interface: &str, method: &str) -> Option<&str>;

    /// Comment on a struct field.
    fn field_doc(&self, package_path: &str, type_name: &str, field: &str) -> Option<&str>;
}
