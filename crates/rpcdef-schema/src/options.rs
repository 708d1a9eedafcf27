// crates/rpcdef-schema/src/options.rs
// ============================================================================
// Module: Builder Options
// Description: Interface filters and designated type names for a schema build.
// Purpose: Configure a SchemaBuilder before invocation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Options are fixed before [`crate::SchemaBuilder::build`] runs. Interface
//! filters match declaration names exactly (case-sensitive). Designated type
//! names use the fully qualified `path.Name` form produced by
//! [`rpcdef_core::TypeRef::qualified`], or a bare builtin name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default cancellation/context parameter type.
pub const DEFAULT_CONTEXT_TYPE: &str = "context.Context";
/// Default trailing error result type.
pub const DEFAULT_ERROR_TYPE: &str = "error";
/// Default opaque timestamp type.
pub const DEFAULT_TIMESTAMP_TYPE: &str = "time.Time";

// ============================================================================
// SECTION: Designated Types
// ============================================================================

/// Type names with special meaning in method signatures and fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignatedTypes {
    /// Optional leading parameter of a two-parameter method.
    pub context: String,
    /// Required trailing result of a two-result method.
    pub error: String,
    /// Named record types treated as string-typed leaves.
    pub timestamps: BTreeSet<String>,
}

impl Default for DesignatedTypes {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT_TYPE.to_string(),
            error: DEFAULT_ERROR_TYPE.to_string(),
            timestamps: BTreeSet::from([DEFAULT_TIMESTAMP_TYPE.to_string()]),
        }
    }
}

// ============================================================================
// SECTION: Builder Options
// ============================================================================

/// Settings applied to one schema build.
///
/// # Invariants
/// - An empty include-list admits every interface.
/// - Exclusion is applied after the service is built, so its objects are pooled until pruning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Interfaces to build; empty means all.
    pub include: BTreeSet<String>,
    /// Interfaces to drop from the definition.
    pub exclude: BTreeSet<String>,
    /// Fail the build on malformed comment metadata.
    pub strict_metadata: bool,
    /// Overrides the package name reported by the oracle.
    pub package_name: Option<String>,
    /// Designated type names.
    pub types: DesignatedTypes,
}

impl BuilderOptions {
    /// Sets the interface include-list.
    #[must_use]
    pub fn with_include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the interface exclude-list.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables strict metadata parsing.
    #[must_use]
    pub fn with_strict_metadata(mut self, strict: bool) -> Self {
        self.strict_metadata = strict;
        self
    }

    /// Overrides the definition package name.
    #[must_use]
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Replaces the designated type names.
    #[must_use]
    pub fn with_types(mut self, types: DesignatedTypes) -> Self {
        self.types = types;
        self
    }

    /// Returns true when the interface passes the include-list.
    #[must_use]
    pub fn includes(&self, name: &str) -> bool {
        self.include.is_empty() || self.include.contains(name)
    }

    /// Returns true when the interface is on the exclude-list.
    #[must_use]
    pub fn excludes(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }
}
