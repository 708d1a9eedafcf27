// crates/rpcdef-config/src/config.rs
// ============================================================================
// Module: rpcdef Configuration
// Description: Configuration loading and validation for rpcdef.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: rpcdef-schema, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys, oversized files, and inconsistent filters fail the load
//! rather than falling back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use rpcdef_schema::BuilderOptions;
use rpcdef_schema::DEFAULT_CONTEXT_TYPE;
use rpcdef_schema::DEFAULT_ERROR_TYPE;
use rpcdef_schema::DEFAULT_TIMESTAMP_TYPE;
use rpcdef_schema::DesignatedTypes;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "rpcdef.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "RPCDEF_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of entries in an interface or timestamp list.
pub const MAX_LIST_ENTRIES: usize = 1024;
/// Maximum length of an interface or type name.
pub const MAX_NAME_LENGTH: usize = 512;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// rpcdef configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RpcdefConfig {
    /// Interface filters and output naming.
    #[serde(default)]
    pub schema: SchemaConfig,
    /// Designated type names.
    #[serde(default)]
    pub types: TypesConfig,
}

impl RpcdefConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: `path`, then the `RPCDEF_CONFIG` environment
    /// variable, then `rpcdef.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schema.validate()?;
        self.types.validate()?;
        Ok(())
    }

    /// Converts the configuration into builder options.
    #[must_use]
    pub fn to_builder_options(&self) -> BuilderOptions {
        let mut options = BuilderOptions::default()
            .with_include(self.schema.include.iter().map(|name| name.trim()))
            .with_exclude(self.schema.exclude.iter().map(|name| name.trim()))
            .with_strict_metadata(self.schema.strict_metadata)
            .with_types(self.types.to_designated_types());
        if let Some(name) = &self.schema.package_name {
            options = options.with_package_name(name.trim());
        }
        options
    }
}

/// `[schema]` section: interface filters and output naming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Interfaces to build; empty means all.
    #[serde(default)]
    pub include: Vec<String>,
    /// Interfaces to drop from the definition.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Fail the build on malformed comment metadata.
    #[serde(default)]
    pub strict_metadata: bool,
    /// Overrides the definition package name.
    #[serde(default)]
    pub package_name: Option<String>,
}

impl SchemaConfig {
    /// Validates filter lists and the package name override.
    fn validate(&self) -> Result<(), ConfigError> {
        let include = validate_name_list("schema.include", &self.include)?;
        let exclude = validate_name_list("schema.exclude", &self.exclude)?;
        if let Some(both) = include.intersection(&exclude).next() {
            return Err(ConfigError::Invalid(format!(
                "interface {both} is both included and excluded"
            )));
        }
        if let Some(name) = &self.package_name {
            validate_name("schema.package_name", name)?;
        }
        Ok(())
    }
}

/// `[types]` section: designated type names.
///
/// # Invariants
/// - Names use the fully qualified `path.Name` form or a bare builtin name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypesConfig {
    /// Optional leading parameter of a two-parameter method.
    #[serde(default = "default_context_type")]
    pub context: String,
    /// Required trailing result of a two-result method.
    #[serde(default = "default_error_type")]
    pub error: String,
    /// Named record types treated as string-typed leaves.
    #[serde(default = "default_timestamp_types")]
    pub timestamps: Vec<String>,
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            context: default_context_type(),
            error: default_error_type(),
            timestamps: default_timestamp_types(),
        }
    }
}

impl TypesConfig {
    /// Validates designated type names.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("types.context", &self.context)?;
        validate_name("types.error", &self.error)?;
        validate_name_list("types.timestamps", &self.timestamps)?;
        Ok(())
    }

    /// Converts to the builder's designated type set.
    fn to_designated_types(&self) -> DesignatedTypes {
        DesignatedTypes {
            context: self.context.trim().to_string(),
            error: self.error.trim().to_string(),
            timestamps: self.timestamps.iter().map(|name| name.trim().to_string()).collect(),
        }
    }
}

/// Default context type name.
fn default_context_type() -> String {
    DEFAULT_CONTEXT_TYPE.to_string()
}

/// Default error type name.
fn default_error_type() -> String {
    DEFAULT_ERROR_TYPE.to_string()
}

/// Default timestamp type names.
fn default_timestamp_types() -> Vec<String> {
    vec![DEFAULT_TIMESTAMP_TYPE.to_string()]
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a single name field.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Validates a list of names and returns the trimmed, deduplicated set.
fn validate_name_list(field: &str, values: &[String]) -> Result<BTreeSet<String>, ConfigError> {
    if values.len() > MAX_LIST_ENTRIES {
        return Err(ConfigError::Invalid(format!(
            "{field} exceeds max entries ({MAX_LIST_ENTRIES})"
        )));
    }
    let mut seen = BTreeSet::new();
    for value in values {
        validate_name(field, value)?;
        let trimmed = value.trim().to_string();
        if !seen.insert(trimmed) {
            return Err(ConfigError::Invalid(format!(
                "{field} contains duplicate entry {}",
                value.trim()
            )));
        }
    }
    Ok(seen)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
