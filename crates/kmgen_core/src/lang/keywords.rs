//! Define the reserved keyword vocabulary of the Go language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings and
//! categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**; Go has no keyword aliases.
//! - Predeclared identifiers such as `int`, `any` or `error` are *not* keywords; see
//!   [`crate::lang::basic_types`].
//!
//! ## Examples
//! ```rust
//! use kmgen_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("chan"), Some(KeywordId::Chan));
//! assert_eq!(keywords::category(KeywordId::Chan), KeywordCategory::TypeConstructor);
//! assert_eq!(keywords::from_str("int"), None);
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Package,
    Import,
    Type,
    Func,
    Var,
    Const,

    // Type constructors
    Struct,
    Interface,
    Map,
    Chan,

    // Control flow / statements
    Break,
    Case,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Go,
    Goto,
    If,
    Range,
    Return,
    Select,
    Switch,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Keywords that start a top-level declaration.
    Declaration,
    /// Keywords that begin a composite type expression.
    TypeConstructor,
    /// Statement keywords (only ever skipped by the declaration parser).
    Statement,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Declarations
    info(KeywordId::Package, "package", KeywordCategory::Declaration),
    info(KeywordId::Import, "import", KeywordCategory::Declaration),
    info(KeywordId::Type, "type", KeywordCategory::Declaration),
    info(KeywordId::Func, "func", KeywordCategory::Declaration),
    info(KeywordId::Var, "var", KeywordCategory::Declaration),
    info(KeywordId::Const, "const", KeywordCategory::Declaration),
    // Type constructors
    info(KeywordId::Struct, "struct", KeywordCategory::TypeConstructor),
    info(KeywordId::Interface, "interface", KeywordCategory::TypeConstructor),
    info(KeywordId::Map, "map", KeywordCategory::TypeConstructor),
    info(KeywordId::Chan, "chan", KeywordCategory::TypeConstructor),
    // Statements
    info(KeywordId::Break, "break", KeywordCategory::Statement),
    info(KeywordId::Case, "case", KeywordCategory::Statement),
    info(KeywordId::Continue, "continue", KeywordCategory::Statement),
    info(KeywordId::Default, "default", KeywordCategory::Statement),
    info(KeywordId::Defer, "defer", KeywordCategory::Statement),
    info(KeywordId::Else, "else", KeywordCategory::Statement),
    info(KeywordId::Fallthrough, "fallthrough", KeywordCategory::Statement),
    info(KeywordId::For, "for", KeywordCategory::Statement),
    info(KeywordId::Go, "go", KeywordCategory::Statement),
    info(KeywordId::Goto, "goto", KeywordCategory::Statement),
    info(KeywordId::If, "if", KeywordCategory::Statement),
    info(KeywordId::Range, "range", KeywordCategory::Statement),
    info(KeywordId::Return, "return", KeywordCategory::Statement),
    info(KeywordId::Select, "select", KeywordCategory::Statement),
    info(KeywordId::Switch, "switch", KeywordCategory::Statement),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is a reserved word.
/// - `None` otherwise (including predeclared identifiers like `int`).
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo { id, canonical, category }
}
