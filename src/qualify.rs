//! Cross-package qualification.
//!
//! Mapping jobs name files by path relative to the configuration file. Two endpoints are in the
//! same package when their files share a directory; otherwise the source type has to be written as
//! `pkg.Type` and its directory imported. Import paths are built from the configured module name, an
//! optional path from the module root, and the endpoint's directory.
//!
//! Path handling follows Go's `path/filepath` on slash-separated paths: backslashes are normalised
//! to `/` first, so configurations written on Windows produce the same imports.

use std::collections::BTreeSet;

use kmgen_syntax::ast::ImportSpec;

use crate::emit::GoImport;
use crate::model::TypeSignature;

/// Go `path.Clean`: collapse repeated separators, `.` and `..` elements.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Go `filepath.Dir`: everything before the last separator, cleaned (`p.go` is in `.`).
pub fn dir_of(path: &str) -> String {
    let path = normalize(path);
    match path.rfind('/') {
        Some(idx) => clean(&path[..=idx]),
        None => ".".to_string(),
    }
}

/// `true` when both files live in the same directory, and so in the same package.
pub fn same_directory(a: &str, b: &str) -> bool {
    dir_of(a) == dir_of(b)
}

/// Go `path.Join` of module, path-from-module and a directory; empty parts are ignored.
pub fn join_module_path(module: &str, path_from_module: &str, dir: &str) -> String {
    let parts: Vec<String> = [module, path_from_module, dir]
        .iter()
        .map(|p| normalize(p))
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join("/"))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Remove every `package.` qualifier that starts at an identifier boundary.
///
/// `strip_qualifier("map[string]p.Meta", "p")` is `map[string]Meta`; `xp.Meta` and `a.p.Meta` are left
/// alone.
pub fn strip_qualifier(signature: &str, package: &str) -> String {
    if package.is_empty() {
        return signature.to_string();
    }
    let needle = format!("{package}.");
    let mut out = String::with_capacity(signature.len());
    let mut rest = signature;
    let mut prev: Option<char> = None;

    while let Some(idx) = rest.find(&needle) {
        let before = &rest[..idx];
        let boundary_char = before.chars().next_back().or(prev);
        out.push_str(before);
        if boundary_char.is_some_and(|c| is_ident_char(c) || c == '.') {
            out.push_str(&needle);
            prev = Some('.');
        } else {
            prev = boundary_char;
        }
        rest = &rest[idx + needle.len()..];
    }
    out.push_str(rest);
    out
}

/// Package names used as qualifiers in `signature`: `time` and `uuid` in `map[uuid.UUID]time.Time`.
pub fn qualifiers(signature: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut ident = String::new();
    // The identifier being read follows a `.`, so it is a selector, not a package.
    let mut selected = false;
    let mut prev = None;
    for c in signature.chars() {
        if is_ident_char(c) {
            if ident.is_empty() {
                selected = prev == Some('.');
            }
            ident.push(c);
        } else {
            if c == '.' && !selected && ident.starts_with(|f: char| f.is_alphabetic() || f == '_') {
                found.insert(ident.clone());
            }
            ident.clear();
        }
        prev = Some(c);
    }
    found
}

/// Name that refers to an import inside the importing file: the alias, else the last path element
/// (`/vN` major-version suffixes are skipped).
pub fn package_name(import: &ImportSpec) -> &str {
    if let Some(alias) = &import.alias {
        return alias;
    }
    let mut elements = import.path.rsplit('/');
    let last = elements.next().unwrap_or_default();
    let versioned = last.len() > 1 && last.starts_with('v') && last[1..].chars().all(|c| c.is_ascii_digit());
    match (versioned, elements.next()) {
        (true, Some(parent)) => parent,
        _ => last,
    }
}

/// Imports of a declaring file needed to spell `signature` in another file.
///
/// Qualifiers with no matching import (struct tag text, unresolved names) are left out.
pub fn imports_for(signature: &str, imports: &[&ImportSpec]) -> Vec<GoImport> {
    qualifiers(signature)
        .iter()
        .filter_map(|qualifier| imports.iter().find(|i| package_name(i) == qualifier))
        .map(|import| match &import.alias {
            Some(alias) if alias != "_" && alias != "." => GoImport::aliased(&import.path, alias),
            _ => GoImport::from(import.path.as_str()),
        })
        .collect()
}

/// Decides whether a destination field and a source field hold the same type.
///
/// The matcher asks this before trying conversions; implementations decide how package qualifiers
/// are accounted for.
pub trait TypeEquivalence {
    fn equivalent(&self, destination: &TypeSignature, source: &TypeSignature) -> bool;
}

/// Spelling equality only. Used when both types live in the same package.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimEquivalence;

impl TypeEquivalence for VerbatimEquivalence {
    fn equivalent(&self, destination: &TypeSignature, source: &TypeSignature) -> bool {
        destination == source
    }
}

/// Equivalence across two packages.
///
/// A destination field typed `p.Meta` matches a source field typed `Meta` when `p` is the source
/// package and the destination file imports the source directory; the mirrored rule applies to
/// source fields that qualify the destination package.
#[derive(Debug, Clone, Default)]
pub struct QualifiedEquivalence {
    pub source_package: String,
    pub destination_package: String,
    /// The destination file imports the source file's directory.
    pub destination_imports_source: bool,
    /// The source file imports the destination file's directory.
    pub source_imports_destination: bool,
}

impl TypeEquivalence for QualifiedEquivalence {
    fn equivalent(&self, destination: &TypeSignature, source: &TypeSignature) -> bool {
        if destination == source {
            return true;
        }
        if self.destination_imports_source && destination.strip_qualifier(&self.source_package) == *source {
            return true;
        }
        self.source_imports_destination && source.strip_qualifier(&self.destination_package) == *destination
    }
}

/// Module coordinates used to turn directories into import paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePath {
    pub module: String,
    pub path_from_module: String,
}

impl ModulePath {
    pub fn new(module: impl Into<String>, path_from_module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            path_from_module: path_from_module.into(),
        }
    }

    /// Import path of the package that `file_path` belongs to.
    pub fn import_path(&self, file_path: &str) -> String {
        join_module_path(&self.module, &self.path_from_module, &dir_of(file_path))
    }

    /// `true` when `imports` contains the package of `file_path`.
    pub fn is_imported(&self, imports: &[&str], file_path: &str) -> bool {
        let wanted = self.import_path(file_path);
        imports.iter().any(|i| *i == wanted)
    }
}

/// How the source type is spelled inside the destination package.
pub fn qualified_name(source_package: &str, source_name: &str, same_package: bool) -> String {
    if same_package {
        source_name.to_string()
    } else {
        format!("{source_package}.{source_name}")
    }
}
