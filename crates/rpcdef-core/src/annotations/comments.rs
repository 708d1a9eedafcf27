// crates/rpcdef-core/src/annotations/comments.rs
// ============================================================================
// Module: Comment Metadata Extractor
// Description: Splits documentation comments into prose and key/value metadata.
// Purpose: Let authors embed machine-readable hints inside ordinary comments.
// Dependencies: serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! Comments are scanned line by line. A line containing `": "` is a metadata
//! candidate: the text before the first `": "` is the key and the rest is
//! parsed as a JSON literal. Every other non-blank line is kept, in order, as
//! the human-readable remainder.
//!
//! Candidates whose value is not valid JSON are dropped with a warning. In
//! strict mode they fail extraction instead.
//!
//! ```
//! use rpcdef_core::annotations::CommentExtractor;
//!
//! let extracted = CommentExtractor::lenient()
//!     .extract("Greeting to send.\nexample: \"hello\"\nfeatured: true")?;
//! assert_eq!(extracted.comment, "Greeting to send.");
//! assert_eq!(extracted.metadata["example"], "hello");
//! assert_eq!(extracted.metadata["featured"], true);
//! # Ok::<(), rpcdef_core::annotations::MetadataError>(())
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::core::Metadata;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator marking a metadata line.
const METADATA_SEPARATOR: &str = ": ";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Malformed metadata, raised only by strict extractors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// A metadata value was not a valid literal.
    #[error("metadata `{key}` has invalid value `{value}`: {message}")]
    InvalidValue {
        /// Metadata key.
        key: String,
        /// Raw value text.
        value: String,
        /// Parser message.
        message: String,
    },
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Result of splitting a comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedComment {
    /// Parsed metadata entries.
    pub metadata: Metadata,
    /// Remaining prose lines, trimmed and joined with newlines.
    pub comment: String,
}

/// Comment metadata extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentExtractor {
    /// Fail on unparseable values instead of skipping them.
    strict: bool,
}

impl CommentExtractor {
    /// Creates an extractor.
    #[must_use]
    pub const fn new(strict: bool) -> Self {
        Self {
            strict,
        }
    }

    /// Extractor that skips malformed metadata with a warning.
    #[must_use]
    pub const fn lenient() -> Self {
        Self::new(false)
    }

    /// Extractor that rejects malformed metadata.
    #[must_use]
    pub const fn strict() -> Self {
        Self::new(true)
    }

    /// Splits a raw comment into metadata and remainder.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] in strict mode when a candidate value does
    /// not parse. Lenient extractors never fail.
    pub fn extract(&self, raw: &str) -> Result<ExtractedComment, MetadataError> {
        let mut extracted = ExtractedComment::default();
        let mut lines: Vec<&str> = Vec::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = split_metadata(line) else {
                lines.push(line);
                continue;
            };
            match serde_json::from_str::<Value>(value) {
                Ok(parsed) => {
                    extracted.metadata.insert(key.to_string(), parsed);
                }
                Err(err) if self.strict => {
                    return Err(MetadataError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        message: err.to_string(),
                    });
                }
                Err(err) => {
                    warn!(key, value, error = %err, "skipping comment metadata with unparseable value");
                }
            }
        }
        extracted.comment = lines.join("\n");
        Ok(extracted)
    }
}

/// Splits a trimmed line on the first separator, requiring a non-empty key.
fn split_metadata(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(METADATA_SEPARATOR)?;
    let key = key.trim_end();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}
