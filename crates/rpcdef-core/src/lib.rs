// crates/rpcdef-core/src/lib.rs
// ============================================================================
// Module: rpcdef Core Library
// Description: Public API surface for the rpcdef core.
// Purpose: Expose the definition model, collaborator interfaces, and parsers.
// Dependencies: crate::{annotations, catalog, core, interfaces}
// ============================================================================

//! ## Overview
//! rpcdef turns interface and struct declarations into a normalized,
//! serializable [`Definition`] that template renderers use to emit clients and
//! servers in other languages. This crate holds everything the schema builder
//! consumes or produces: the definition model, the [`TypeOracle`] and
//! [`DocIndex`] query surfaces, the field tag and comment metadata parsers,
//! and an in-memory [`SourceCatalog`] front-end.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod annotations;
pub mod catalog;
pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use annotations::CommentExtractor;
pub use annotations::ExtractedComment;
pub use annotations::JsonDirective;
pub use annotations::MetadataError;
pub use annotations::TagParseError;
pub use annotations::parse_tags;
pub use catalog::CatalogDocument;
pub use catalog::CatalogError;
pub use catalog::CatalogFormat;
pub use catalog::CatalogPackage;
pub use catalog::SourceCatalog;
pub use interfaces::Declaration;
pub use interfaces::DeclarationShape;
pub use interfaces::DocIndex;
pub use interfaces::FieldDecl;
pub use interfaces::InterfaceDecl;
pub use interfaces::MethodDecl;
pub use interfaces::StructDecl;
pub use interfaces::TypeOracle;
