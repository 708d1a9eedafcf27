// crates/rpcdef-cli/src/main.rs
// ============================================================================
// Module: rpcdef CLI Entry Point
// Description: Command dispatcher for building and checking definitions.
// Purpose: Load a source catalog, run the schema builder, and emit JSON.
// Dependencies: clap, rpcdef-config, rpcdef-core, rpcdef-schema, tracing-subscriber
// ============================================================================

//! ## Overview
//! `rpcdef build` loads a source catalog, applies `rpcdef.toml` and flag
//! overrides, and writes the pretty-printed definition to stdout or a file.
//! `rpcdef check` rebuilds the definition and compares its canonical digest
//! against a previously generated file, failing on drift. Diagnostics go to
//! stderr through a `tracing` subscriber; only the definition goes to stdout.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use rpcdef_config::CONFIG_ENV_VAR;
use rpcdef_config::DEFAULT_CONFIG_NAME;
use rpcdef_config::RpcdefConfig;
use rpcdef_core::Definition;
use rpcdef_core::SourceCatalog;
use rpcdef_core::hashing::hash_canonical_json;
use rpcdef_schema::BuilderOptions;
use rpcdef_schema::SchemaBuilder;
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a previously generated definition read by `check`.
const MAX_DEFINITION_BYTES: usize = 16 * 1024 * 1024;
/// Log filter applied when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Log filter applied with `--verbose` when `RUST_LOG` is unset.
const VERBOSE_LOG_FILTER: &str = "debug";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "rpcdef", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a definition and print or write it as JSON.
    Build(BuildCommand),
    /// Rebuild a definition and fail when it differs from a generated file.
    Check(CheckCommand),
}

/// Arguments shared by every command that runs the schema builder.
#[derive(Args, Debug, Clone, Default)]
struct SourceArgs {
    /// Source catalog file (`.json` or `.ron`).
    #[arg(long, value_name = "PATH")]
    catalog: PathBuf,
    /// Optional config file path (defaults to rpcdef.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the definition package name.
    #[arg(long = "pkg", value_name = "NAME")]
    package_name: Option<String>,
    /// Comma-separated interfaces to build (replaces the config include-list).
    #[arg(long = "match", value_name = "NAMES", value_delimiter = ',')]
    include: Vec<String>,
    /// Comma-separated interfaces to drop (replaces the config exclude-list).
    #[arg(long = "ignore", value_name = "NAMES", value_delimiter = ',')]
    exclude: Vec<String>,
    /// Fail on malformed comment metadata instead of skipping it.
    #[arg(long, action = ArgAction::SetTrue)]
    strict_metadata: bool,
    /// Log builder traversal at debug level.
    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Arguments for `build`.
#[derive(Args, Debug)]
struct BuildCommand {
    /// Catalog, config, and override flags.
    #[command(flatten)]
    source: SourceArgs,
    /// Output file (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Catalog, config, and override flags.
    #[command(flatten)]
    source: SourceArgs,
    /// Previously generated definition JSON.
    #[arg(long, value_name = "PATH")]
    expected: PathBuf,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build(command) => command_build(&command),
        Commands::Check(command) => command_check(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `build`.
fn command_build(command: &BuildCommand) -> CliResult<ExitCode> {
    init_logging(command.source.verbose);
    let definition = build_definition(&command.source)?;
    let mut bytes = serde_json::to_vec_pretty(&definition)
        .map_err(|err| CliError::new(format!("failed to serialize definition: {err}")))?;
    bytes.push(b'\n');
    match &command.out {
        Some(path) => {
            fs::write(path, &bytes).map_err(|err| {
                CliError::new(format!("failed to write {}: {err}", path.display()))
            })?;
            info!(path = %path.display(), bytes = bytes.len(), "definition written");
        }
        None => {
            write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))?;
            info!(bytes = bytes.len(), "definition written to stdout");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `check`.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    init_logging(command.source.verbose);
    let definition = build_definition(&command.source)?;
    let bytes = read_bytes_with_limit(&command.expected, MAX_DEFINITION_BYTES).map_err(|err| {
        CliError::new(format!("failed to read {}: {err}", command.expected.display()))
    })?;
    let expected: Value = serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(format!("{} is not valid JSON: {err}", command.expected.display()))
    })?;
    let actual = hash_canonical_json(&definition)
        .map_err(|err| CliError::new(format!("failed to hash definition: {err}")))?;
    let recorded = hash_canonical_json(&expected)
        .map_err(|err| CliError::new(format!("failed to hash expected definition: {err}")))?;
    if actual != recorded {
        warn!(actual = %actual.value, expected = %recorded.value, "definition drift detected");
        return Err(CliError::new(format!(
            "definition differs from {} (expected sha256 {}, built sha256 {})",
            command.expected.display(),
            recorded.value,
            actual.value
        )));
    }
    let message =
        format!("definition matches {} (sha256 {})", command.expected.display(), actual.value);
    write_stdout_line(&message).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Build Helpers
// ============================================================================

/// Loads the catalog and configuration, then runs the schema builder.
fn build_definition(args: &SourceArgs) -> CliResult<Definition> {
    let config = load_config(args.config.as_deref())?;
    let options = apply_overrides(config.to_builder_options(), args);
    let catalog = SourceCatalog::load(&args.catalog).map_err(|err| {
        CliError::new(format!("failed to load catalog {}: {err}", args.catalog.display()))
    })?;
    SchemaBuilder::for_source(&catalog)
        .with_options(options)
        .build()
        .map_err(|err| CliError::new(err.to_string()))
}

/// Loads configuration, falling back to defaults when no file is present.
///
/// An explicit path or environment override must exist; only the implicit
/// working-directory default may be absent.
fn load_config(path: Option<&Path>) -> CliResult<RpcdefConfig> {
    let implicit = path.is_none() && env::var_os(CONFIG_ENV_VAR).is_none();
    if implicit && !Path::new(DEFAULT_CONFIG_NAME).exists() {
        return Ok(RpcdefConfig::default());
    }
    RpcdefConfig::load(path).map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Applies command-line overrides on top of config-derived options.
fn apply_overrides(mut options: BuilderOptions, args: &SourceArgs) -> BuilderOptions {
    if !args.include.is_empty() {
        options = options.with_include(args.include.iter().map(|name| name.trim()));
    }
    if !args.exclude.is_empty() {
        options = options.with_exclude(args.exclude.iter().map(|name| name.trim()));
    }
    if let Some(name) = &args.package_name {
        options = options.with_package_name(name.clone());
    }
    if args.strict_metadata {
        options = options.with_strict_metadata(true);
    }
    options
}

/// Installs the stderr log subscriber.
fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_LOG_FILTER } else { DEFAULT_LOG_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ============================================================================
// SECTION: I/O Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug, Error)]
enum ReadLimitError {
    /// File I/O failure.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// File size exceeds the configured limit.
    #[error("file size {size} exceeds limit {limit}")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
