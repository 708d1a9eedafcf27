// crates/rpcdef-schema/src/builder/classify.rs
// ============================================================================
// Module: Type Classifier
// Description: Normalizes a type handle into a Type record.
// Purpose: Compute identity, multiplicity, optionality, and cross-language hints.
// Dependencies: rpcdef-core, tracing
// ============================================================================

//! ## Overview
//! Classification order matters:
//! 1. A sequence is unwrapped first and sets `multiple`.
//! 2. A pointer is unwrapped next and sets `is_optional`.
//! 3. Designated timestamp types are string-typed leaves, checked before named
//!    records because they are records underneath.
//! 4. Named records trigger object construction; maps register named record
//!    keys and values; anonymous records are rejected.
//!
//! Package prefixes are rendered through a qualifier that records every
//! package outside the one being scanned into the definition's imports.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use rpcdef_core::Declaration;
use rpcdef_core::DeclarationShape;
use rpcdef_core::FieldDecl;
use rpcdef_core::InterfaceDecl;
use rpcdef_core::SourcePosition;
use rpcdef_core::Type;
use rpcdef_core::TypeRef;
use rpcdef_core::naming::camelize_down;
use tracing::trace;

use super::BuildSession;
use crate::error::SchemaError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum alias hops followed while resolving an underlying shape.
const MAX_ALIAS_DEPTH: usize = 32;

/// Underlying kind names mapped to the `number` hint.
const NUMERIC_KINDS: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr", "byte", "rune", "float32", "float64",
];

// ============================================================================
// SECTION: Underlying Shapes
// ============================================================================

/// Resolved shape behind a named declaration.
enum Underlying<'a> {
    /// Record with its fields.
    Record(&'a [FieldDecl]),
    /// Interface body.
    Interface(&'a InterfaceDecl),
    /// Any other type expression.
    Other(&'a TypeRef),
}

// ============================================================================
// SECTION: Classification
// ============================================================================

impl<'a> BuildSession<'a> {
    /// Classifies `ty`, constructing any objects it references.
    ///
    /// Identities of referenced objects are added to `references`.
    pub(super) fn classify(
        &mut self,
        ty: &'a TypeRef,
        position: &SourcePosition,
        references: &mut BTreeSet<String>,
    ) -> Result<Type, SchemaError> {
        let mut out = Type::default();
        let mut display = ty;
        if let Some(elem) = display.sequence_element() {
            display = elem;
            out.multiple = true;
        }
        let mut base = display;
        if let Some(pointee) = base.pointee() {
            base = pointee;
            out.is_optional = true;
        }

        let underlying = if self.is_timestamp(base) {
            "string".to_string()
        } else {
            match base {
                TypeRef::Named {
                    ..
                } => {
                    let declaration = self.resolve(base, position)?;
                    match self.underlying(declaration, position)? {
                        Underlying::Record(fields) => {
                            references.insert(self.ensure_object(declaration, fields)?);
                            out.is_object = true;
                            record_type_string(fields)
                        }
                        Underlying::Interface(interface) => interface_type_string(interface),
                        Underlying::Other(inner) => {
                            if let TypeRef::Map {
                                key,
                                value,
                            } = inner
                            {
                                out.is_map = true;
                                self.register_map_entry(key, position, references)?;
                                self.register_map_entry(value, position, references)?;
                            }
                            let rendered = inner.unqualified();
                            rendered.strip_prefix('*').map_or(rendered.clone(), str::to_string)
                        }
                    }
                }
                TypeRef::Map {
                    key,
                    value,
                } => {
                    out.is_map = true;
                    self.register_map_entry(key, position, references)?;
                    self.register_map_entry(value, position, references)?;
                    base.unqualified()
                }
                TypeRef::Struct(_) => {
                    return Err(SchemaError::NestedStructure {
                        position: position.clone(),
                    });
                }
                other => other.unqualified(),
            }
        };

        self.fill_identity(&mut out, display);
        out.underlying_type_name = underlying;
        fill_hints(&mut out);
        debug_type(ty, &out);
        Ok(out)
    }

    /// Constructs the object for a named record used as a map key or value.
    fn register_map_entry(
        &mut self,
        ty: &'a TypeRef,
        position: &SourcePosition,
        references: &mut BTreeSet<String>,
    ) -> Result<(), SchemaError> {
        if !matches!(ty, TypeRef::Named { .. }) || self.is_timestamp(ty) {
            return Ok(());
        }
        let declaration = self.resolve(ty, position)?;
        if let Underlying::Record(fields) = self.underlying(declaration, position)? {
            references.insert(self.ensure_object(declaration, fields)?);
        }
        Ok(())
    }

    /// Returns true for designated timestamp types.
    fn is_timestamp(&self, ty: &TypeRef) -> bool {
        matches!(ty, TypeRef::Named { .. })
            && self.options.types.timestamps.contains(&ty.qualified())
    }

    /// Resolves a named reference through the oracle.
    fn resolve(
        &self,
        ty: &TypeRef,
        position: &SourcePosition,
    ) -> Result<&'a Declaration, SchemaError> {
        let oracle = self.oracle;
        oracle.resolve(ty).ok_or_else(|| SchemaError::InvalidStructure {
            position: position.clone(),
            message: format!("cannot resolve type {}", ty.qualified()),
        })
    }

    /// Follows alias declarations to the first non-alias shape.
    fn underlying(
        &self,
        declaration: &'a Declaration,
        position: &SourcePosition,
    ) -> Result<Underlying<'a>, SchemaError> {
        let mut current = declaration;
        for _ in 0..MAX_ALIAS_DEPTH {
            match &current.shape {
                DeclarationShape::Struct(record) => return Ok(Underlying::Record(&record.fields)),
                DeclarationShape::Interface(interface) => {
                    return Ok(Underlying::Interface(interface));
                }
                DeclarationShape::Alias(TypeRef::Struct(fields)) => {
                    return Ok(Underlying::Record(fields));
                }
                DeclarationShape::Alias(
                    target @ TypeRef::Named {
                        ..
                    },
                ) => current = self.resolve(target, position)?,
                DeclarationShape::Alias(other) => return Ok(Underlying::Other(other)),
            }
        }
        Err(SchemaError::InvalidStructure {
            position: position.clone(),
            message: format!(
                "{}.{} does not resolve to an underlying type",
                declaration.package.path, declaration.name
            ),
        })
    }

    /// Sets names and identity from the display type, recording imports.
    fn fill_identity(&mut self, out: &mut Type, display: &TypeRef) {
        let scanned = &self.package.path;
        let imports = &mut self.imports;
        let mut owner = scanned.clone();
        let mut external = String::new();
        out.type_name = display.type_string(&mut |package| {
            if package.path == *scanned {
                return String::new();
            }
            imports.insert(package.path.clone(), package.name.clone());
            external.clone_from(&package.path);
            owner.clone_from(&package.path);
            package.name.clone()
        });
        out.package = external;
        out.object_name = display.unqualified();
        out.object_name_lower_camel = camelize_down(&out.object_name);
        out.clean_object_name =
            out.object_name.strip_prefix('*').unwrap_or(&out.object_name).to_string();
        out.type_id = format!("{owner}.{}", out.clean_object_name);
    }
}

// ============================================================================
// SECTION: Hints
// ============================================================================

/// Populates cross-language hints from the underlying kind.
///
/// Objects and maps always carry the `object` dynamic hint; their static
/// hints still come from the kind table when the kind is recognized.
fn fill_hints(out: &mut Type) {
    out.js_type.clone_from(&out.clean_object_name);
    out.ts_type.clone_from(&out.clean_object_name);
    out.swift_type.clone_from(&out.clean_object_name);
    if let Some((js, ts, swift)) = kind_hints(&out.underlying_type_name) {
        out.js_type = js.to_string();
        out.ts_type = ts.to_string();
        out.swift_type = swift.to_string();
    }
    if out.is_object || out.is_map {
        out.js_type = "object".to_string();
    }
}

/// Returns the (dynamic, static, swift) hints for a recognized kind.
fn kind_hints(kind: &str) -> Option<(&'static str, &'static str, &'static str)> {
    match kind {
        "interface{}" => Some(("any", "object", "Any")),
        "map[string]interface{}" => Some(("object", "object", "Any")),
        "string" => Some(("string", "string", "String")),
        "bool" => Some(("boolean", "boolean", "Bool")),
        kind if NUMERIC_KINDS.contains(&kind) => Some(("number", "number", "Double")),
        _ => None,
    }
}

// ============================================================================
// SECTION: Rendering Helpers
// ============================================================================

/// Renders a record's unqualified type string.
fn record_type_string(fields: &[FieldDecl]) -> String {
    let body: Vec<String> =
        fields.iter().map(|field| format!("{} {}", field.name, field.ty.unqualified())).collect();
    format!("struct{{{}}}", body.join("; "))
}

/// Renders an interface's unqualified type string.
fn interface_type_string(interface: &InterfaceDecl) -> String {
    let body: Vec<String> =
        interface.methods.iter().map(|method| format!("{}()", method.name)).collect();
    format!("interface{{{}}}", body.join("; "))
}

/// Traces one classification.
fn debug_type(ty: &TypeRef, out: &Type) {
    trace!(
        source = %ty,
        type_id = %out.type_id,
        underlying = %out.underlying_type_name,
        multiple = out.multiple,
        optional = out.is_optional,
        "classified type"
    );
}
