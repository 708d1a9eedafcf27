// crates/rpcdef-core/src/core/mod.rs
// ============================================================================
// Module: rpcdef Core Types
// Description: Definition model, type handles, positions, and naming helpers.
// Purpose: Provide stable, serializable types shared by the builder and CLI.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types describe both sides of the schema build: the type handles and
//! positions reported by the type oracle, and the normalized [`Definition`]
//! handed to renderers.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod definition;
pub mod hashing;
pub mod naming;
pub mod position;
pub mod type_ref;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use definition::Definition;
pub use definition::DefinitionError;
pub use definition::Field;
pub use definition::FieldTag;
pub use definition::Metadata;
pub use definition::Method;
pub use definition::Object;
pub use definition::Service;
pub use definition::Type;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use position::SourcePosition;
pub use type_ref::PackageRef;
pub use type_ref::TypeRef;
