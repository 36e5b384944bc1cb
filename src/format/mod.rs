//! Canonical layout for generated Go source
//!
//! The emitter builds text with a [`FormatWriter`]; before it is written out the whole file goes
//! through [`format_go_source`], which normalizes it to gofmt conventions for the statement subset
//! kmgen produces:
//! - tab indentation by block depth, one statement per line
//! - at most one blank line, none at the start or end of a block
//! - one blank line between top-level declarations
//! - import specs sorted and de-duplicated, single trailing newline

mod config;
mod formatter;
mod writer;

pub use config::FormatConfig;
pub use formatter::Formatter;
pub use writer::FormatWriter;

use thiserror::Error;

/// The text could not be laid out; callers fall back to the unformatted text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("cannot format generated source: {message} at {line}:{column}")]
    Lex { message: String, line: usize, column: usize },
    #[error("cannot format generated source: unbalanced '{delimiter}' at {line}:{column}")]
    Unbalanced { delimiter: String, line: usize, column: usize },
}

/// Format Go source with default settings
pub fn format_go_source(source: &str) -> Result<String, FormatError> {
    format_go_source_with_config(source, FormatConfig::default())
}

/// Format Go source with custom configuration
pub fn format_go_source_with_config(source: &str, config: FormatConfig) -> Result<String, FormatError> {
    Formatter::new(source, config).format()
}

/// Check if source is already in canonical layout
pub fn check_formatted(source: &str) -> Result<bool, FormatError> {
    Ok(format_go_source(source)? == source)
}
