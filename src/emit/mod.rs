//! Go code emission.
//!
//! Functions are rendered one at a time into strings ([`functions`], [`plugins`]); a
//! [`GoFile`] then stitches them under one header, package clause and import block, and the
//! result goes through the canonical formatter.
//!
//! ## Output styles
//!
//! | style        | mapping signature                                   |
//! |--------------|-----------------------------------------------------|
//! | `pointer`    | `func (dest *D) FromS(src S)`                       |
//! | `value`      | `func (dest D) FromS(src S) D`                      |
//! | `standalone` | `func DFromS(dest D, src S) D`                      |

pub mod functions;
pub mod plugins;

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format::{self, FormatError, FormatWriter};

/// Calling convention of generated functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Mutate a pointer receiver, return nothing.
    Pointer,
    /// Value receiver, returns the updated copy.
    #[default]
    #[serde(alias = "")]
    Value,
    /// Free function taking the destination and returning it.
    Standalone,
}

impl Style {
    /// `true` when generated mutators end with `return dest`.
    pub fn returns_dest(self) -> bool {
        !matches!(self, Style::Pointer)
    }
}

/// Struct↔map helpers generated for a single type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Plugin {
    /// `ToMap() map[string]any` over exported fields.
    ToMap,
    /// `FromMap(src map[string]any)` with guarded assertions per exported field.
    FromMap,
}

impl Plugin {
    pub fn method_name(self) -> &'static str {
        match self {
            Plugin::ToMap => "ToMap",
            Plugin::FromMap => "FromMap",
        }
    }
}

/// The "do not edit" banner at the top of every generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// RFC 3339 timestamp, captured once per batch.
    pub generated_at: String,
    pub version: String,
}

impl FileHeader {
    pub fn new(generated_at: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            generated_at: generated_at.into(),
            version: version.into(),
        }
    }

    pub fn at(time: DateTime<Utc>, version: impl Into<String>) -> Self {
        Self::new(time.to_rfc3339_opts(SecondsFormat::Secs, true), version)
    }

    pub fn now(version: impl Into<String>) -> Self {
        Self::at(Utc::now(), version)
    }

    fn write(&self, w: &mut FormatWriter) {
        w.writeln("// Code generated by kmgen; DO NOT EDIT.");
        w.writeln(&format!("// Generated at: {}", self.generated_at));
        w.writeln(&format!("// kmgen version: {}", self.version));
    }
}

/// An import spec of a generated file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GoImport {
    pub path: String,
    pub alias: Option<String>,
}

impl GoImport {
    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    fn spec(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias} {}", quote(&self.path)),
            None => quote(&self.path),
        }
    }
}

impl From<String> for GoImport {
    fn from(path: String) -> Self {
        Self { path, alias: None }
    }
}

impl From<&str> for GoImport {
    fn from(path: &str) -> Self {
        Self::from(path.to_string())
    }
}

/// One output file before layout.
#[derive(Debug, Default)]
pub struct GoFile {
    pub package: String,
    pub imports: BTreeSet<GoImport>,
    pub functions: Vec<String>,
}

/// Final text of a file and whether the formatter accepted it.
#[derive(Debug)]
pub struct RenderedSource {
    pub text: String,
    /// Set when layout failed and `text` is the raw emitter output.
    pub format_error: Option<FormatError>,
}

impl GoFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    /// Raw text: header, package clause, import block, then each function.
    pub fn render_raw(&self, header: Option<&FileHeader>) -> String {
        let mut w = FormatWriter::default();
        if let Some(header) = header {
            header.write(&mut w);
            w.blank_lines(1);
        }
        w.writeln(&format!("package {}", self.package));

        if !self.imports.is_empty() {
            w.blank_lines(1);
            w.writeln("import (");
            w.indent();
            for import in &self.imports {
                w.writeln(&import.spec());
            }
            w.dedent();
            w.writeln(")");
        }

        for function in &self.functions {
            w.blank_lines(1);
            w.write(function);
        }
        w.finish()
    }

    /// Render and lay out the file, falling back to the raw text when layout fails.
    pub fn render(&self, header: Option<&FileHeader>) -> RenderedSource {
        let raw = self.render_raw(header);
        match format::format_go_source(&raw) {
            Ok(text) => RenderedSource {
                text,
                format_error: None,
            },
            Err(err) => RenderedSource {
                text: raw,
                format_error: Some(err),
            },
        }
    }
}

/// Go interpreted string literal for `s`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
