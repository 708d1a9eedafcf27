// crates/rpcdef-core/src/catalog/mod.rs
// ============================================================================
// Module: Source Catalog
// Description: In-memory type oracle and documentation index.
// Purpose: Describe packages, declarations, and comments as JSON or RON data.
// Dependencies: crate::{core, interfaces}, ron, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`SourceCatalog`] holds the declarations and comments of one or more
//! packages and answers both [`TypeOracle`] and [`DocIndex`] queries. It is
//! the front-end used by the CLI and by tests; compiler-backed oracles can
//! implement the same traits directly.
//!
//! Catalogs are authored in JSON (canonical) or RON (human-friendly):
//!
//! ```ron
//! (packages: [(
//!     package: (path: "example.com/greeter", name: "greeter"),
//!     declarations: [
//!         (name: "GreetRequest", shape: Struct((fields: [
//!             (name: "Name", type: Builtin("string"), tag: "json:\"name\""),
//!         ]))),
//!     ],
//!     docs: {"GreetRequest": "GreetRequest is the request.", "GreetRequest.Name": "Who to greet."},
//! )])
//! ```
//!
//! Docs are keyed by declaration name, or `Declaration.Member` for methods
//! and fields. Packages marked `primary: false` are dependencies: their
//! declarations resolve but their scopes are not scanned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::PackageRef;
use crate::core::SourcePosition;
use crate::interfaces::Declaration;
use crate::interfaces::DeclarationShape;
use crate::interfaces::DocIndex;
use crate::interfaces::TypeOracle;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum catalog file size accepted by [`SourceCatalog::load`].
pub const MAX_CATALOG_BYTES: u64 = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Supported catalog authoring formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// Canonical JSON format.
    Json,
    /// Human-friendly RON format.
    Ron,
}

impl CatalogFormat {
    /// Returns the lowercase label for the format.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ron => "ron",
        }
    }

    /// Parses a format from a file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "ron" => Some(Self::Ron),
            _ => None,
        }
    }

    /// Detects the format from a file path.
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        path.extension().and_then(|extension| extension.to_str()).and_then(Self::from_extension)
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO failure while reading the catalog.
    #[error("catalog io error: {0}")]
    Io(String),
    /// Catalog file exceeds [`MAX_CATALOG_BYTES`].
    #[error("catalog input exceeds {MAX_CATALOG_BYTES} bytes")]
    TooLarge,
    /// File extension does not name a supported format.
    #[error("unsupported catalog format: {0}")]
    UnknownFormat(String),
    /// Catalog text failed to parse.
    #[error("failed to parse {format} catalog: {error}")]
    Parse {
        /// Format that failed to parse.
        format: CatalogFormat,
        /// Underlying parse error message.
        error: String,
    },
    /// Catalog content is inconsistent.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Authoring Shapes
// ============================================================================

/// One package in a catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPackage {
    /// Package identity.
    pub package: PackageRef,
    /// True when the package was matched by the load patterns.
    #[serde(default = "default_primary")]
    pub primary: bool,
    /// Top-level declarations; each declaration's package is filled in on load.
    #[serde(default)]
    pub declarations: Vec<CatalogDeclaration>,
    /// Comments keyed by `Name` or `Name.Member`.
    #[serde(default)]
    pub docs: BTreeMap<String, String>,
}

/// Declaration as authored inside a [`CatalogPackage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDeclaration {
    /// Declaration name.
    pub name: String,
    /// Location of the declaration.
    #[serde(default)]
    pub position: SourcePosition,
    /// Underlying shape.
    pub shape: DeclarationShape,
}

/// Serde default for [`CatalogPackage::primary`].
const fn default_primary() -> bool {
    true
}

impl CatalogPackage {
    /// Creates an empty primary package.
    #[must_use]
    pub const fn new(package: PackageRef) -> Self {
        Self {
            package,
            primary: true,
            declarations: Vec::new(),
            docs: BTreeMap::new(),
        }
    }

    /// Creates an empty dependency package.
    #[must_use]
    pub const fn dependency(package: PackageRef) -> Self {
        Self {
            package,
            primary: false,
            declarations: Vec::new(),
            docs: BTreeMap::new(),
        }
    }

    /// Adds a declaration without a source position.
    #[must_use]
    pub fn with_declaration(self, name: impl Into<String>, shape: DeclarationShape) -> Self {
        self.with_declaration_at(name, SourcePosition::default(), shape)
    }

    /// Adds a declaration located at `position`.
    #[must_use]
    pub fn with_declaration_at(
        mut self,
        name: impl Into<String>,
        position: SourcePosition,
        shape: DeclarationShape,
    ) -> Self {
        self.declarations.push(CatalogDeclaration {
            name: name.into(),
            position,
            shape,
        });
        self
    }

    /// Adds a comment for a declaration (`Name`) or member (`Name.Member`).
    #[must_use]
    pub fn with_doc(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.docs.insert(key.into(), text.into());
        self
    }
}

/// Top-level catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Packages in load order.
    pub packages: Vec<CatalogPackage>,
}

// ============================================================================
// SECTION: Source Catalog
// ============================================================================

/// Resolved catalog entry for one package.
#[derive(Debug, Clone)]
struct PackageEntry {
    /// Package identity.
    package: PackageRef,
    /// True when the package scope is scanned.
    primary: bool,
    /// Declarations keyed by name.
    declarations: BTreeMap<String, Declaration>,
    /// Comments keyed by `Name` or `Name.Member`.
    docs: BTreeMap<String, String>,
}

/// In-memory [`TypeOracle`] and [`DocIndex`].
///
/// # Invariants
/// - Package paths are unique; declaration names are unique per package.
/// - Scope names are reported in ascending order.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    /// Packages in load order.
    packages: Vec<PackageEntry>,
    /// Package path to index in `packages`.
    by_path: BTreeMap<String, usize>,
}

impl SourceCatalog {
    /// Builds a catalog from authored packages.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] for duplicate package paths or
    /// duplicate declaration names within a package.
    pub fn from_packages(packages: Vec<CatalogPackage>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for authored in packages {
            if catalog.by_path.contains_key(&authored.package.path) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate package path `{}`",
                    authored.package.path
                )));
            }
            let mut declarations = BTreeMap::new();
            for declaration in authored.declarations {
                if declarations.contains_key(&declaration.name) {
                    return Err(CatalogError::Invalid(format!(
                        "duplicate declaration `{}` in package `{}`",
                        declaration.name, authored.package.path
                    )));
                }
                declarations.insert(declaration.name.clone(), Declaration {
                    name: declaration.name,
                    package: authored.package.clone(),
                    position: declaration.position,
                    shape: declaration.shape,
                });
            }
            catalog.by_path.insert(authored.package.path.clone(), catalog.packages.len());
            catalog.packages.push(PackageEntry {
                package: authored.package,
                primary: authored.primary,
                declarations,
                docs: authored.docs,
            });
        }
        Ok(catalog)
    }

    /// Parses catalog text in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] on malformed input and
    /// [`CatalogError::Invalid`] on inconsistent content.
    pub fn parse(input: &str, format: CatalogFormat) -> Result<Self, CatalogError> {
        let document: CatalogDocument = match format {
            CatalogFormat::Json => serde_json::from_str(input).map_err(|err| CatalogError::Parse {
                format,
                error: err.to_string(),
            })?,
            CatalogFormat::Ron => ron::from_str(input).map_err(|err| CatalogError::Parse {
                format,
                error: err.to_string(),
            })?,
        };
        Self::from_packages(document.packages)
    }

    /// Loads a catalog file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be read, exceeds
    /// [`MAX_CATALOG_BYTES`], has an unknown extension, or fails to parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let format = CatalogFormat::detect(path)
            .ok_or_else(|| CatalogError::UnknownFormat(path.display().to_string()))?;
        let bytes = read_catalog_bytes(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| CatalogError::Invalid("catalog must be utf-8".to_string()))?;
        Self::parse(&text, format)
    }

    /// Returns the entry for a package path.
    fn entry(&self, package_path: &str) -> Option<&PackageEntry> {
        self.by_path.get(package_path).and_then(|index| self.packages.get(*index))
    }

    /// Returns a member comment keyed `Name.Member`.
    fn member_doc(&self, package_path: &str, owner: &str, member: &str) -> Option<&str> {
        let key = format!("{owner}.{member}");
        self.entry(package_path)?.docs.get(&key).map(String::as_str)
    }
}

impl TypeOracle for SourceCatalog {
    fn packages(&self) -> Vec<PackageRef> {
        self.packages
            .iter()
            .filter(|entry| entry.primary)
            .map(|entry| entry.package.clone())
            .collect()
    }

    fn scope_names(&self, package: &PackageRef) -> Vec<String> {
        self.entry(&package.path)
            .map(|entry| entry.declarations.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn declaration(&self, package_path: &str, name: &str) -> Option<&Declaration> {
        self.entry(package_path)?.declarations.get(name)
    }
}

impl DocIndex for SourceCatalog {
    fn type_doc(&self, package_path: &str, type_name: &str) -> Option<&str> {
        self.entry(package_path)?.docs.get(type_name).map(String::as_str)
    }

    fn method_doc(&self, package_path: &str, interface: &str, method: &str) -> Option<&str> {
        self.member_doc(package_path, interface, method)
    }

    fn field_doc(&self, package_path: &str, type_name: &str, field: &str) -> Option<&str> {
        self.member_doc(package_path, type_name, field)
    }
}

// ============================================================================
// SECTION: Catalog Input
// ============================================================================

/// Reads a catalog file with a hard size limit.
fn read_catalog_bytes(path: &Path) -> Result<Vec<u8>, CatalogError> {
    let file = fs::File::open(path).map_err(|err| CatalogError::Io(err.to_string()))?;
    let metadata = file.metadata().map_err(|err| CatalogError::Io(err.to_string()))?;
    if metadata.len() > MAX_CATALOG_BYTES {
        return Err(CatalogError::TooLarge);
    }
    let mut bytes = Vec::new();
    let mut limited = file.take(MAX_CATALOG_BYTES + 1);
    limited.read_to_end(&mut bytes).map_err(|err| CatalogError::Io(err.to_string()))?;
    let size = u64::try_from(bytes.len()).map_err(|_| CatalogError::TooLarge)?;
    if size > MAX_CATALOG_BYTES {
        return Err(CatalogError::TooLarge);
    }
    Ok(bytes)
}
