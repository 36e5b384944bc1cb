//! Lexer for Go source files.
//!
//! Handles tokenization including:
//! - Keywords, identifiers and the predeclared-type names (as plain identifiers)
//! - Numeric, string, raw string and rune literals (raw spelling preserved)
//! - Operators and punctuation via longest match against the `kmgen_core` registries
//! - Go's automatic semicolon insertion, surfaced as [`TokenKind::Newline`]
//! - Comments, dropped by [`lex`] and kept by [`lex_with_comments`]
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `literals` - Number/string/rune scanning and string unquoting

mod literals;
pub mod tokens;

pub use literals::unquote;
pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::SyntaxError;
use kmgen_core::lang::keywords::KeywordId;
use kmgen_core::lang::operators::{self, OperatorId};
use kmgen_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// A line break becomes a Newline token only when the last significant token
// could end a statement (identifier, literal, `)`, `]`, `}`, `++`, `--`,
// `return`, `break`, `continue`, `fallthrough`). This mirrors the semicolon
// rule of the Go spec, so the parser never has to reason about layout.
// ============================================================================

/// Lexer for Go source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    keep_comments: bool,
    /// The previous significant token permits an inserted terminator.
    terminator_pending: bool,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            keep_comments: false,
            terminator_pending: false,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Emit comment tokens instead of discarding them.
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Tokenize the entire source code.
    ///
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<SyntaxError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        if self.terminator_pending {
            self.push_newline(self.current_pos, self.current_pos);
        }
        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
        ));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors
            .push(SyntaxError::lex(message, Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;
        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '\n' => {
                if self.terminator_pending {
                    self.push_newline(start, self.current_pos);
                }
            }

            '/' if self.peek() == Some('/') => self.scan_line_comment(start),
            '/' if self.peek() == Some('*') => self.scan_block_comment(start),

            '"' => self.scan_string(start),
            '`' => self.scan_raw_string(start),
            '\'' => self.scan_rune(start),

            '0'..='9' => self.scan_number(start, c),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start, c),

            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => {
                if !self.scan_symbol(start) {
                    self.error(format!("unexpected character '{}'", c), start);
                }
            }
        }
    }

    // ========================================================================
    // Token emission
    // ========================================================================

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.terminator_pending = ends_statement(&kind);
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn push_newline(&mut self, start: usize, end: usize) {
        self.terminator_pending = false;
        self.tokens.push(Token::new(TokenKind::Newline, Span::new(start, end)));
    }

    /// Comments do not affect terminator insertion.
    fn add_comment(&mut self, start: usize) {
        if self.keep_comments {
            let text = self.source[start..self.current_pos].to_string();
            self.tokens
                .push(Token::new(TokenKind::Comment(text), Span::new(start, self.current_pos)));
        }
    }

    // ========================================================================
    // Operators and punctuation
    // ========================================================================

    /// Longest match against the operator and punctuation registries.
    ///
    /// The first character has already been consumed.
    fn scan_symbol(&mut self, start: usize) -> bool {
        for len in (1..=operators::MAX_SPELLING_LEN).rev() {
            let end = start + len;
            if end > self.source.len() || !self.source.is_char_boundary(end) {
                continue;
            }
            let text = &self.source[start..end];
            let kind = if let Some(id) = operators::from_str(text) {
                TokenKind::Operator(id)
            } else if let Some(id) = punctuation::from_str(text) {
                TokenKind::Punctuation(id)
            } else {
                continue;
            };
            while self.current_pos < end {
                self.advance();
            }
            self.add_token(kind, start);
            return true;
        }
        false
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn scan_line_comment(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        self.add_comment(start);
    }

    fn scan_block_comment(&mut self, start: usize) {
        self.advance(); // '*'
        let mut spans_lines = false;
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    break;
                }
                Some('\n') => spans_lines = true,
                Some(_) => {}
                None => {
                    self.error("unterminated block comment", start);
                    return;
                }
            }
        }
        self.add_comment(start);
        // A block comment containing a line break acts like a newline.
        if spans_lines && self.terminator_pending {
            self.push_newline(self.current_pos, self.current_pos);
        }
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a line break after `kind` terminates the statement.
fn ends_statement(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Ident(_)
        | TokenKind::Int(_)
        | TokenKind::Float(_)
        | TokenKind::Imaginary(_)
        | TokenKind::String(_)
        | TokenKind::RawString(_)
        | TokenKind::Rune(_) => true,
        TokenKind::Keyword(id) => matches!(
            id,
            KeywordId::Break | KeywordId::Continue | KeywordId::Fallthrough | KeywordId::Return
        ),
        TokenKind::Operator(id) => matches!(id, OperatorId::Inc | OperatorId::Dec),
        TokenKind::Punctuation(id) => matches!(
            id,
            PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace
        ),
        TokenKind::Comment(_) | TokenKind::Newline | TokenKind::Eof => false,
    }
}

/// Lex a source string, dropping comments.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<SyntaxError>> {
    Lexer::new(source).tokenize()
}

/// Lex a source string, keeping comments as [`TokenKind::Comment`] tokens.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex_with_comments(source: &str) -> Result<Vec<Token>, Vec<SyntaxError>> {
    Lexer::new(source).keep_comments(true).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================
