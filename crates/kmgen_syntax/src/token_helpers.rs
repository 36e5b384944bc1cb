//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy
//! to work with ID-based tokens.

use std::borrow::Cow;

use crate::lexer::{Token, TokenKind};
use kmgen_core::lang::keywords::{self, KeywordId};
use kmgen_core::lang::operators::{self, OperatorId};
use kmgen_core::lang::punctuation::{self, PunctuationId};

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for statement terminators (`;` or an inserted newline).
    pub fn is_terminator(&self) -> bool {
        matches!(self, TokenKind::Newline) || self.is_punctuation(PunctuationId::Semicolon)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::Comment(_))
    }

    /// Return `true` for string literal tokens (interpreted or raw).
    pub fn is_string(&self) -> bool {
        matches!(self, TokenKind::String(_) | TokenKind::RawString(_))
    }

    /// Source spelling of this token.
    ///
    /// ## Notes
    /// - `Newline` renders as `"\n"` and `Eof` as the empty string.
    pub fn spelling(&self) -> Cow<'_, str> {
        match self {
            TokenKind::Keyword(id) => Cow::Borrowed(keywords::as_str(*id)),
            TokenKind::Operator(id) => Cow::Borrowed(operators::as_str(*id)),
            TokenKind::Punctuation(id) => Cow::Borrowed(punctuation::as_str(*id)),
            TokenKind::Ident(s)
            | TokenKind::Int(s)
            | TokenKind::Float(s)
            | TokenKind::Imaginary(s)
            | TokenKind::String(s)
            | TokenKind::RawString(s)
            | TokenKind::Rune(s)
            | TokenKind::Comment(s) => Cow::Borrowed(s.as_str()),
            TokenKind::Newline => Cow::Borrowed("\n"),
            TokenKind::Eof => Cow::Borrowed(""),
        }
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    /// Convenience wrapper for `self.kind.spelling()`.
    pub fn spelling(&self) -> Cow<'_, str> {
        self.kind.spelling()
    }
}
