// crates/rpcdef-core/src/annotations/mod.rs
// ============================================================================
// Module: Annotations
// Description: Field tag and comment metadata parsers.
// Purpose: Mine serialization rules and structured hints from declarations.
// Dependencies: crate::core, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! Two leaf parsers with no dependency on the type graph: [`parse_tags`] for
//! field annotation strings and [`CommentExtractor`] for documentation
//! comments.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod comments;
pub mod tags;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use comments::CommentExtractor;
pub use comments::ExtractedComment;
pub use comments::MetadataError;
pub use tags::JSON_NAMESPACE;
pub use tags::JsonDirective;
pub use tags::OMIT_EMPTY_OPTION;
pub use tags::SKIP_VALUE;
pub use tags::TagParseError;
pub use tags::parse_tags;
