// crates/rpcdef-core/src/core/type_ref.rs
// ============================================================================
// Module: Type Handles
// Description: Structural type references reported by the type oracle.
// Purpose: Describe declared parameter, result, and field types without source text.
// Dependencies: serde, crate::interfaces
// ============================================================================

//! ## Overview
//! A [`TypeRef`] is the handle the type oracle hands out for any declared
//! type: a builtin, the empty interface, a named declaration, or a composite
//! (slice, array, pointer, map, anonymous struct). Named references are
//! resolved lazily through [`crate::TypeOracle::declaration`].
//!
//! Type strings follow the source language's notation (`[]*pkg.Name`,
//! `map[string]interface{}`), with package prefixes decided by a qualifier
//! callback so callers can record imports while rendering.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write;

use serde::Deserialize;
use serde::Serialize;

use crate::interfaces::FieldDecl;

// ============================================================================
// SECTION: Packages
// ============================================================================

/// Package identity: import path plus declared package name.
///
/// # Invariants
/// - `path` is unique per package; `name` is the local identifier used in qualified type strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageRef {
    /// Full import path.
    pub path: String,
    /// Declared package name.
    pub name: String,
}

impl PackageRef {
    /// Creates a package reference.
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

// ============================================================================
// SECTION: Type References
// ============================================================================

/// Structural type handle.
///
/// # Invariants
/// - `Named` references must resolve through the oracle that produced them.
/// - `Struct` is an anonymous record; the schema builder rejects it wherever a value type is
///   classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// Predeclared type such as `string`, `bool`, `int64`, or `error`.
    Builtin(String),
    /// The empty interface (`interface{}` / `any`).
    Any,
    /// Reference to a named declaration.
    Named {
        /// Declaring package.
        package: PackageRef,
        /// Declaration name.
        name: String,
    },
    /// Variable-length sequence.
    Slice(Box<TypeRef>),
    /// Fixed-length sequence.
    Array {
        /// Declared length.
        len: u64,
        /// Element type.
        elem: Box<TypeRef>,
    },
    /// Optional / pointer-like wrapper.
    Pointer(Box<TypeRef>),
    /// Key to value mapping.
    Map {
        /// Key type.
        key: Box<TypeRef>,
        /// Value type.
        value: Box<TypeRef>,
    },
    /// Anonymous record type.
    Struct(Vec<FieldDecl>),
}

impl TypeRef {
    /// Shorthand for a builtin type.
    #[must_use]
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::Builtin(name.into())
    }

    /// Shorthand for a named type reference.
    #[must_use]
    pub fn named(package: PackageRef, name: impl Into<String>) -> Self {
        Self::Named {
            package,
            name: name.into(),
        }
    }

    /// Wraps a type in a slice.
    #[must_use]
    pub fn slice_of(elem: Self) -> Self {
        Self::Slice(Box::new(elem))
    }

    /// Wraps a type in a pointer.
    #[must_use]
    pub fn pointer_to(elem: Self) -> Self {
        Self::Pointer(Box::new(elem))
    }

    /// Builds a map type.
    #[must_use]
    pub fn map_of(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Returns the element type when this is a slice or array.
    #[must_use]
    pub fn sequence_element(&self) -> Option<&Self> {
        match self {
            Self::Slice(elem)
            | Self::Array {
                elem, ..
            } => Some(elem),
            _ => None,
        }
    }

    /// Returns the pointee when this is a pointer.
    #[must_use]
    pub fn pointee(&self) -> Option<&Self> {
        match self {
            Self::Pointer(elem) => Some(elem),
            _ => None,
        }
    }

    /// Renders the type string, asking `qualifier` for each package prefix.
    ///
    /// An empty prefix renders the bare declaration name.
    pub fn type_string(&self, qualifier: &mut dyn FnMut(&PackageRef) -> String) -> String {
        let mut out = String::new();
        self.write_type(&mut out, qualifier);
        out
    }

    /// Renders the type string without any package prefixes.
    #[must_use]
    pub fn unqualified(&self) -> String {
        self.type_string(&mut |_| String::new())
    }

    /// Renders the type string with full import paths as prefixes.
    #[must_use]
    pub fn qualified(&self) -> String {
        self.type_string(&mut |package| package.path.clone())
    }

    /// Appends the rendered type string to `out`.
    fn write_type(&self, out: &mut String, qualifier: &mut dyn FnMut(&PackageRef) -> String) {
        match self {
            Self::Builtin(name) => out.push_str(name),
            Self::Any => out.push_str("interface{}"),
            Self::Named {
                package,
                name,
            } => {
                let prefix = qualifier(package);
                if !prefix.is_empty() {
                    out.push_str(&prefix);
                    out.push('.');
                }
                out.push_str(name);
            }
            Self::Slice(elem) => {
                out.push_str("[]");
                elem.write_type(out, qualifier);
            }
            Self::Array {
                len,
                elem,
            } => {
                let _ = write!(out, "[{len}]");
                elem.write_type(out, qualifier);
            }
            Self::Pointer(elem) => {
                out.push('*');
                elem.write_type(out, qualifier);
            }
            Self::Map {
                key,
                value,
            } => {
                out.push_str("map[");
                key.write_type(out, qualifier);
                out.push(']');
                value.write_type(out, qualifier);
            }
            Self::Struct(fields) => {
                out.push_str("struct{");
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(&field.name);
                    out.push(' ');
                    field.ty.write_type(out, qualifier);
                }
                out.push('}');
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}
