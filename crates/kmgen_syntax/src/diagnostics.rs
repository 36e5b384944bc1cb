//! Spanned syntax errors.
//!
//! [`SyntaxError`] is a `thiserror` error that also implements [`miette::Diagnostic`], so callers
//! holding the source text can render it with a labelled snippet:
//!
//! ```rust
//! use kmgen_syntax::lexer;
//!
//! let source = "package p\n\ntype T struct { A \"oops }\n";
//! let errors = lexer::lex(source).unwrap_err();
//! let report = miette::Report::new(errors[0].clone())
//!     .with_source_code(miette::NamedSource::new("t.go", source.to_string()));
//! assert!(format!("{report:?}").contains("unterminated"));
//! ```

use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};

use crate::ast::Span;

/// Which stage produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    Lex,
    Parse,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::Lex => write!(f, "lex error"),
            SyntaxErrorKind::Parse => write!(f, "syntax error"),
        }
    }
}

/// A lexing or parsing error with location information.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    pub kind: SyntaxErrorKind,
    pub hint: Option<String>,
}

impl SyntaxError {
    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind: SyntaxErrorKind::Lex,
            hint: None,
        }
    }

    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind: SyntaxErrorKind::Parse,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::from((span.start, span.len()))
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.kind {
            SyntaxErrorKind::Lex => "kmgen::lex",
            SyntaxErrorKind::Parse => "kmgen::parse",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.hint.as_ref().map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some("here".to_string()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Compute 1-based line and column for a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..floor_char_boundary(source, offset)];
    let line = before.matches('\n').count() + 1;
    let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, col)
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
