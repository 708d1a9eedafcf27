// crates/rpcdef-core/src/core/definition.rs
// ============================================================================
// Module: Definition Model
// Description: Serializable schema of services, methods, objects, and fields.
// Purpose: Provide the canonical shape consumed by downstream renderers.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Definition`] is the normalized result of walking a package's interface
//! and struct declarations. Renderers consume it as a structured document;
//! every key is serialized in lower camel case.
//!
//! Objects are referenced by name: a [`Type`] with `is_object` set points at
//! the [`Object`] whose `name` equals its `clean_object_name`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Structured key/value metadata mined from documentation comments.
pub type Metadata = BTreeMap<String, Value>;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Lookup failures against an assembled definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// No object with the requested name exists.
    #[error("object not found: {0}")]
    NotFound(String),
}

// ============================================================================
// SECTION: Definition
// ============================================================================

/// Root aggregate handed to renderers.
///
/// # Invariants
/// - Service names are unique; object names are unique.
/// - When produced by the schema builder, `services` and `objects` are sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// Name of the scanned package.
    pub package_name: String,
    /// Services described by this definition.
    pub services: Vec<Service>,
    /// Record types used throughout this definition.
    pub objects: Vec<Object>,
    /// External package path to local alias.
    pub imports: BTreeMap<String, String>,
}

impl Definition {
    /// Looks up an object by name.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NotFound`] when no object has that name.
    pub fn object(&self, name: &str) -> Result<&Object, DefinitionError> {
        self.objects
            .iter()
            .find(|object| object.name == name)
            .ok_or_else(|| DefinitionError::NotFound(name.to_string()))
    }

    /// Looks up an object by name for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NotFound`] when no object has that name.
    pub fn object_mut(&mut self, name: &str) -> Result<&mut Object, DefinitionError> {
        self.objects
            .iter_mut()
            .find(|object| object.name == name)
            .ok_or_else(|| DefinitionError::NotFound(name.to_string()))
    }

    /// Returns true when any method takes the named object as its request.
    #[must_use]
    pub fn object_is_input(&self, name: &str) -> bool {
        self.methods().any(|method| method.input_object.clean_object_name == name)
    }

    /// Returns true when any method returns the named object as its response.
    #[must_use]
    pub fn object_is_output(&self, name: &str) -> bool {
        self.methods().any(|method| method.output_object.clean_object_name == name)
    }

    /// Iterates every method across all services, in service order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.services.iter().flat_map(|service| service.methods.iter())
    }
}

// ============================================================================
// SECTION: Services
// ============================================================================

/// A named group of methods built from one interface declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Interface name.
    pub name: String,
    /// Methods in declaration order.
    pub methods: Vec<Method>,
    /// Human-readable comment with metadata lines removed.
    pub comment: String,
    /// Metadata extracted from the comment.
    pub metadata: Metadata,
}

/// One operation of a service.
///
/// # Invariants
/// - Exactly one request type and one response type, regardless of auxiliary context or error
///   slots in the source signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Lower camel variant of the name.
    pub name_lower_camel: String,
    /// Request type.
    pub input_object: Type,
    /// Response type.
    pub output_object: Type,
    /// Human-readable comment with metadata lines removed.
    pub comment: String,
    /// Metadata extracted from the comment.
    pub metadata: Metadata,
}

// ============================================================================
// SECTION: Objects
// ============================================================================

/// A named record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    /// Declaring package path plus name.
    #[serde(rename = "typeID")]
    pub type_id: String,
    /// Declaration name.
    pub name: String,
    /// True when declared outside the scanned package.
    pub imported: bool,
    /// Declaring package path; empty for objects of the scanned package.
    pub package: String,
    /// Emitted fields in declaration order.
    pub fields: Vec<Field>,
    /// Human-readable comment with metadata lines removed.
    pub comment: String,
    /// Metadata extracted from the comment.
    pub metadata: Metadata,
}

/// One member of an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Declared field name.
    pub name: String,
    /// Lower camel display name (overridden by the serialization tag).
    pub name_lower_camel: String,
    /// Serialized name.
    #[serde(rename = "nameJSON")]
    pub name_json: String,
    /// Field type; default when `skip` is set.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Omit from the payload when empty.
    pub omit_empty: bool,
    /// Human-readable comment with metadata lines removed.
    pub comment: String,
    /// Raw annotation string.
    pub tag: String,
    /// Parsed annotations keyed by namespace.
    pub parsed_tags: BTreeMap<String, FieldTag>,
    /// Example value promoted from the `example` metadata key.
    pub example: Value,
    /// Metadata extracted from the comment.
    pub metadata: Metadata,
    /// Excluded from the object's field list.
    pub skip: bool,
}

/// One parsed annotation namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTag {
    /// Primary value (the serialized name for the `json` namespace).
    pub value: String,
    /// Option tokens in declared order.
    pub options: Vec<String>,
}

impl FieldTag {
    /// Returns true when the option token is present.
    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Normalized description of a value's shape.
///
/// # Invariants
/// - `clean_object_name` is `object_name` without the optionality marker.
/// - `type_id` is the owning package path, a dot, and `clean_object_name`.
/// - Hints default to `clean_object_name` when the underlying kind is not recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    /// Globally unique identity.
    #[serde(rename = "typeID")]
    pub type_id: String,
    /// Display name with package alias prefixes.
    pub type_name: String,
    /// Display name without package prefixes.
    pub object_name: String,
    /// `object_name` with the optionality marker stripped.
    pub clean_object_name: String,
    /// Underlying primitive kind name.
    pub underlying_type_name: String,
    /// Lower camel variant of `object_name`.
    pub object_name_lower_camel: String,
    /// True when the value is a sequence of this type.
    pub multiple: bool,
    /// True when the value is optional (pointer-like).
    pub is_optional: bool,
    /// Package path of any external type referenced.
    pub package: String,
    /// True when the type denotes an object.
    pub is_object: bool,
    /// True when the type is a key to value mapping.
    pub is_map: bool,
    /// Dynamic-language hint.
    pub js_type: String,
    /// Statically typed hint.
    pub ts_type: String,
    /// Third ecosystem hint.
    pub swift_type: String,
}

impl Type {
    /// Returns true for optional (pointer-like) types.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.is_optional
    }
}
