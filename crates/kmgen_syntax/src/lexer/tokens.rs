//! Token types for the Go lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for delimiters and separators
//!
//! ## Notes
//! - Literals keep their raw spelling (quotes, prefixes, underscores) so the formatter can
//!   reproduce them byte for byte.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use kmgen_core::lang::keywords::{self, KeywordId};
use kmgen_core::lang::operators::OperatorId;
use kmgen_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals (raw spelling) ==========
    Ident(String),
    Int(String),
    Float(String),
    Imaginary(String),
    /// `"..."`
    String(String),
    /// `` `...` ``
    RawString(String),
    /// `'x'`
    Rune(String),

    // ========== Trivia ==========
    /// `// ...` or `/* ... */`, only with `lex_with_comments`.
    Comment(String),
    /// Statement terminator inserted at a line break (Go's automatic semicolon rule).
    Newline,

    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
