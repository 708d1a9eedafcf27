// crates/rpcdef-config/src/lib.rs
// ============================================================================
// Module: rpcdef Config Library
// Description: Configuration model and validation for rpcdef.toml.
// Purpose: Single source of truth for builder settings read from disk.
// Dependencies: rpcdef-schema, serde, toml
// ============================================================================

//! ## Overview
//! `rpcdef-config` loads `rpcdef.toml`, validates it fail-closed, and converts
//! it into the [`rpcdef_schema::BuilderOptions`] consumed by the schema
//! builder.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
