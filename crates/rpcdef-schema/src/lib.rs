// crates/rpcdef-schema/src/lib.rs
// ============================================================================
// Module: rpcdef Schema Library
// Description: Schema builder, type classifier, and post-traversal pipeline.
// Purpose: Turn oracle declarations into a normalized Definition.
// Dependencies: rpcdef-core, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`SchemaBuilder`] walks the interfaces and structs reported by a
//! [`rpcdef_core::TypeOracle`] and produces a [`rpcdef_core::Definition`]:
//! services with validated method signatures, a deduplicated pool of
//! objects, classified field types, and the synthetic response `Error` field.
//!
//! Builds are synchronous and deterministic. The first hard failure aborts the
//! build with a positioned [`SchemaError`].
//!
//! ## Index
//! - Builder: [`SchemaBuilder`], [`BuilderOptions`], [`DesignatedTypes`]
//! - Errors: [`SchemaError`]
//! - Pipeline: [`pipeline::prune_excluded`], [`pipeline::sort_definition`],
//!   [`pipeline::inject_output_fields`]

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod builder;
pub mod error;
pub mod options;
pub mod pipeline;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::EXAMPLE_METADATA_KEY;
pub use builder::SchemaBuilder;
pub use error::SchemaError;
pub use options::BuilderOptions;
pub use options::DEFAULT_CONTEXT_TYPE;
pub use options::DEFAULT_ERROR_TYPE;
pub use options::DEFAULT_TIMESTAMP_TYPE;
pub use options::DesignatedTypes;
pub use pipeline::ObjectGraph;
