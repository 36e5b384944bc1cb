#![forbid(unsafe_code)]
//! kmgen: declarative struct-to-struct mapper generator for Go
//!
//! A `km.toml` names source and destination struct types in Go files. kmgen reads those files,
//! matches fields by name, alias and type, and writes one `km_gen.go` per destination directory
//! holding the conversion functions.
//!
//! Pipeline: [`config`] → [`jobs`] (work groups per output directory) → [`scheduler`] (worker
//! pool) → [`generator`] ([`extract`] → [`matcher`] → [`emit`] → [`format`]) → [`persist`].
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Worker threads**: a group error is reported on the scheduler's error channel, never by unwinding.

pub mod cli;
pub mod config;
pub mod conversions;
pub mod emit;
pub mod extract;
pub mod format;
pub mod generator;
pub mod jobs;
pub mod loader;
pub mod matcher;
pub mod model;
pub mod persist;
pub mod qualify;
pub mod scheduler;
pub mod schema;
pub mod version;

pub use config::{Config, ConfigError};
pub use emit::{FileHeader, Plugin, Style};
pub use format::{FormatConfig, check_formatted, format_go_source, format_go_source_with_config};
pub use generator::{GENERATED_FILE_NAME, GenerateError, GeneratedArtifact, GeneratorSettings, process_group};
pub use jobs::{Job, WorkGroup, plan_groups};
pub use scheduler::{BatchReport, Scheduler};
