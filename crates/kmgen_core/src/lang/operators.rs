//! Operator vocabulary.
//!
//! This module defines every Go operator spelling together with a coarse category. The declaration
//! parser only interprets a handful of them (`*`, `<-`, `=`, `~`); the rest exist so the lexer can
//! tokenize function bodies and initializers it skips over, and so the formatter can re-lex
//! generated code.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - [`MAX_SPELLING_LEN`] bounds the longest-match scan in the lexer.
//!
//! ## Examples
//! ```rust
//! use kmgen_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str(":="), Some(OperatorId::Define));
//! assert_eq!(operators::from_str("&^="), Some(OperatorId::AndNotEq));
//! ```

/// Coarse operator grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Bitwise,
    Comparison,
    Logical,
    Assignment,
    Channel,
    /// `~` in type constraints.
    Constraint,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Inc,
    Dec,

    // Bitwise
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AndNot,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    AndAnd,
    OrOr,
    Not,

    // Assignment
    Assign,
    Define,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    AndNotEq,

    // Channel
    Arrow,

    // Constraint
    Tilde,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub category: OperatorCategory,
}

/// Length in bytes of the longest operator spelling.
pub const MAX_SPELLING_LEN: usize = 3;

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    op(OperatorId::Plus, "+", OperatorCategory::Arithmetic),
    op(OperatorId::Minus, "-", OperatorCategory::Arithmetic),
    op(OperatorId::Star, "*", OperatorCategory::Arithmetic),
    op(OperatorId::Slash, "/", OperatorCategory::Arithmetic),
    op(OperatorId::Percent, "%", OperatorCategory::Arithmetic),
    op(OperatorId::Inc, "++", OperatorCategory::Arithmetic),
    op(OperatorId::Dec, "--", OperatorCategory::Arithmetic),
    op(OperatorId::Amp, "&", OperatorCategory::Bitwise),
    op(OperatorId::Pipe, "|", OperatorCategory::Bitwise),
    op(OperatorId::Caret, "^", OperatorCategory::Bitwise),
    op(OperatorId::Shl, "<<", OperatorCategory::Bitwise),
    op(OperatorId::Shr, ">>", OperatorCategory::Bitwise),
    op(OperatorId::AndNot, "&^", OperatorCategory::Bitwise),
    op(OperatorId::EqEq, "==", OperatorCategory::Comparison),
    op(OperatorId::NotEq, "!=", OperatorCategory::Comparison),
    op(OperatorId::Lt, "<", OperatorCategory::Comparison),
    op(OperatorId::LtEq, "<=", OperatorCategory::Comparison),
    op(OperatorId::Gt, ">", OperatorCategory::Comparison),
    op(OperatorId::GtEq, ">=", OperatorCategory::Comparison),
    op(OperatorId::AndAnd, "&&", OperatorCategory::Logical),
    op(OperatorId::OrOr, "||", OperatorCategory::Logical),
    op(OperatorId::Not, "!", OperatorCategory::Logical),
    op(OperatorId::Assign, "=", OperatorCategory::Assignment),
    op(OperatorId::Define, ":=", OperatorCategory::Assignment),
    op(OperatorId::PlusEq, "+=", OperatorCategory::Assignment),
    op(OperatorId::MinusEq, "-=", OperatorCategory::Assignment),
    op(OperatorId::StarEq, "*=", OperatorCategory::Assignment),
    op(OperatorId::SlashEq, "/=", OperatorCategory::Assignment),
    op(OperatorId::PercentEq, "%=", OperatorCategory::Assignment),
    op(OperatorId::AmpEq, "&=", OperatorCategory::Assignment),
    op(OperatorId::PipeEq, "|=", OperatorCategory::Assignment),
    op(OperatorId::CaretEq, "^=", OperatorCategory::Assignment),
    op(OperatorId::ShlEq, "<<=", OperatorCategory::Assignment),
    op(OperatorId::ShrEq, ">>=", OperatorCategory::Assignment),
    op(OperatorId::AndNotEq, "&^=", OperatorCategory::Assignment),
    op(OperatorId::Arrow, "<-", OperatorCategory::Channel),
    op(OperatorId::Tilde, "~", OperatorCategory::Constraint),
];

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Lookup by spelling.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

const fn op(id: OperatorId, spelling: &'static str, category: OperatorCategory) -> OperatorInfo {
    OperatorInfo { id, spelling, category }
}
