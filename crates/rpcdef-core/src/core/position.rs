// crates/rpcdef-core/src/core/position.rs
// ============================================================================
// Module: Source Positions
// Description: File/line/column locations attached to declarations.
// Purpose: Give every build failure a precise diagnostic anchor.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Source positions are reported by the type oracle for declarations, methods,
//! parameters, and fields. The schema builder never computes them; it only
//! carries them into errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Source Position
// ============================================================================

/// Location of a declaration in source text.
///
/// # Invariants
/// - `line` and `column` are 1-based; zero means "unknown".
/// - Display renders `file:line:column`, matching compiler diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Source file path as reported by the oracle.
    #[serde(default)]
    pub file: String,
    /// 1-based line number.
    #[serde(default)]
    pub line: u32,
    /// 1-based column number.
    #[serde(default)]
    pub column: u32,
}

impl SourcePosition {
    /// Creates a position from its parts.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Returns true when the oracle supplied no location.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line == 0
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str("-");
        }
        let file = if self.file.is_empty() { "<unknown>" } else { self.file.as_str() };
        match (self.line, self.column) {
            (0, _) => write!(f, "{file}"),
            (line, 0) => write!(f, "{file}:{line}"),
            (line, column) => write!(f, "{file}:{line}:{column}"),
        }
    }
}
