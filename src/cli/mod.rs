//! CLI module for kmgen
//!
//! ## Usage
//!
//! - `kmgen [--config km.toml]` - Generate every `km_gen.go` described by the config
//! - `kmgen --dry-run` - Print generated files instead of writing them
//! - `kmgen schema [--out FILE]` - Print the JSON Schema of the config file
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::version::KMGEN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate Go struct-to-struct mappers from a declarative config
#[derive(Parser, Debug)]
#[command(name = "kmgen")]
#[command(version = KMGEN_VERSION)]
#[command(about = "Generate Go struct-to-struct mapping functions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file; generated files are placed relative to its directory
    #[arg(short, long, value_name = "FILE", default_value = "km.toml")]
    pub config: PathBuf,

    /// Verbose logging; also prints generated files instead of writing them
    #[arg(long)]
    pub debug: bool,

    /// Print generated files instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Number of parallel workers
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub routines: usize,

    /// Leave out the "do not edit" header (byte-stable output)
    #[arg(long)]
    pub no_header: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the JSON Schema of the configuration file
    Schema {
        /// Write the schema to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Schema { out }) => commands::export_schema(out.as_deref()),
        None => commands::generate(&commands::GenerateOptions {
            config: cli.config,
            print_only: cli.dry_run || cli.debug,
            routines: cli.routines,
            header: !cli.no_header,
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["kmgen"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("km.toml"));
        assert_eq!(cli.routines, 1);
        assert!(!cli.debug && !cli.dry_run && !cli.no_header);
    }

    #[test]
    fn test_cli_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "kmgen",
            "--config",
            "gen/km.toml",
            "--routines",
            "4",
            "--dry-run",
            "--no-header",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("gen/km.toml"));
        assert_eq!(cli.routines, 4);
        assert!(cli.dry_run);
        assert!(cli.no_header);
    }

    #[test]
    fn test_cli_parse_schema() {
        let cli = Cli::try_parse_from(["kmgen", "schema", "--out", "km.schema.json"]).unwrap();
        if let Some(Command::Schema { out }) = cli.command {
            assert_eq!(out, Some(PathBuf::from("km.schema.json")));
        } else {
            panic!("Expected Schema command");
        }
    }

    #[test]
    fn test_cli_rejects_bad_routines() {
        assert!(Cli::try_parse_from(["kmgen", "--routines", "many"]).is_err());
    }
}
