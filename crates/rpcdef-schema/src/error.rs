// crates/rpcdef-schema/src/error.rs
// ============================================================================
// Module: Schema Errors
// Description: Hard failures raised while building a definition.
// Purpose: Abort builds with a precise source position for diagnostics.
// Dependencies: rpcdef-core, thiserror
// ============================================================================

//! ## Overview
//! Every hard failure aborts the whole build; no partial definition is
//! returned. Positional variants render as `file:line:col: message` so the
//! caller can print them verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rpcdef_core::DefinitionError;
use rpcdef_core::MetadataError;
use rpcdef_core::SourcePosition;
use rpcdef_core::TagParseError;
use thiserror::Error;

// ============================================================================
// SECTION: Schema Error
// ============================================================================

/// Schema build failures.
///
/// # Invariants
/// - Every variant except [`SchemaError::NotFound`] carries the originating source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A method violates the one/two-parameter or one/two-result contract.
    #[error("{position}: invalid method signature: {message}")]
    InvalidSignature {
        /// Method location.
        position: SourcePosition,
        /// Shape violation.
        message: String,
    },
    /// A referenced declaration cannot be classified.
    #[error("{position}: {message}")]
    InvalidStructure {
        /// Location of the reference.
        position: SourcePosition,
        /// Classification failure.
        message: String,
    },
    /// An anonymous record type appeared where a value type was expected.
    #[error("{position}: nested structs not supported (create another type instead)")]
    NestedStructure {
        /// Location of the offending field or parameter.
        position: SourcePosition,
    },
    /// A referenced field or parameter type is not externally visible.
    #[error("{position}: {name} must be exported")]
    UnexportedMember {
        /// Location of the member.
        position: SourcePosition,
        /// Member name.
        name: String,
    },
    /// A field annotation string is malformed.
    #[error("{position}: parse field tag: {source}")]
    TagParse {
        /// Field location.
        position: SourcePosition,
        /// Parser failure.
        source: TagParseError,
    },
    /// Comment metadata is malformed and strict parsing is enabled.
    #[error("{position}: extract comment metadata: {source}")]
    MetadataParse {
        /// Location of the commented declaration.
        position: SourcePosition,
        /// Extractor failure.
        source: MetadataError,
    },
    /// Internal lookup miss.
    #[error(transparent)]
    NotFound(#[from] DefinitionError),
}

impl SchemaError {
    /// Returns the source position attached to the failure, if any.
    #[must_use]
    pub const fn position(&self) -> Option<&SourcePosition> {
        match self {
            Self::InvalidSignature {
                position, ..
            }
            | Self::InvalidStructure {
                position, ..
            }
            | Self::NestedStructure {
                position,
            }
            | Self::UnexportedMember {
                position, ..
            }
            | Self::TagParse {
                position, ..
            }
            | Self::MetadataParse {
                position, ..
            } => Some(position),
            Self::NotFound(_) => None,
        }
    }
}
