//! Core layout logic for generated Go source
//!
//! Re-lexes the text (comments kept) and lays it out line by line. Block structure comes from
//! braces and grouped declarations; line breaks come from the lexer's inserted terminators.
//! Spacing between tokens on the same line is taken from the input, collapsed to one space.

use kmgen_core::lang::keywords::KeywordId;
use kmgen_core::lang::punctuation::PunctuationId;
use kmgen_syntax::diagnostics::line_col;
use kmgen_syntax::lexer::{self, Token, TokenKind};

use super::FormatError;
use super::config::FormatConfig;
use super::writer::FormatWriter;

enum Line {
    Code { depth: usize, text: String },
    Blank,
}

impl Line {
    fn is_comment(&self) -> bool {
        matches!(self, Line::Code { text, .. } if text.starts_with("//") || text.starts_with("/*"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Block,
    /// `import (`, `type (`, ...; import groups remember their first line for sorting.
    Group { imports_from: Option<usize> },
    Paren,
    Bracket,
    /// Braces of a type literal (`struct{X int}`) or of any `{` inside parentheses; kept on one line.
    Literal,
}

/// Formatter that lays out Go source text
pub struct Formatter<'s> {
    source: &'s str,
    config: FormatConfig,
    lines: Vec<Line>,
    current: String,
    line_depth: usize,
    frames: Vec<(Frame, usize)>,
    /// Between `if`/`for`/`switch` and the `{` that opens its body.
    in_header: bool,
    /// The last finished line opened a block.
    block_opened: bool,
}

impl<'s> Formatter<'s> {
    /// Create a new formatter for `source`
    pub fn new(source: &'s str, config: FormatConfig) -> Self {
        Self {
            source,
            config,
            lines: Vec::new(),
            current: String::new(),
            line_depth: 0,
            frames: Vec::new(),
            in_header: false,
            block_opened: false,
        }
    }

    /// Format the source and return the laid out text
    pub fn format(mut self) -> Result<String, FormatError> {
        let source = self.source;
        let tokens = lexer::lex_with_comments(source).map_err(|errors| {
            let (message, offset) = errors
                .first()
                .map(|e| (e.message.clone(), e.span.start))
                .unwrap_or_else(|| ("invalid token".to_string(), 0));
            let (line, column) = line_col(source, offset);
            FormatError::Lex { message, line, column }
        })?;
        let tokens: Vec<&Token> = tokens.iter().filter(|t| t.kind != TokenKind::Eof).collect();

        let mut last_end = 0;
        let mut prev: Option<&TokenKind> = None;
        let mut i = 0;
        while i < tokens.len() {
            let tok = tokens[i];
            i += 1;
            if tok.kind == TokenKind::Newline {
                if !self.in_inline_frame() {
                    self.end_line();
                }
                continue;
            }

            let gap = &source[last_end..tok.span.start];
            let breaks = gap.matches('\n').count();
            let spaced = !gap.is_empty();
            last_end = tok.span.end;

            match &tok.kind {
                TokenKind::Comment(text) => {
                    if breaks > 0 {
                        self.end_line();
                    }
                    self.place(text, spaced, breaks);
                    if text.starts_with("//") {
                        self.end_line();
                    }
                    continue;
                }
                TokenKind::Keyword(id) => {
                    if self.current.is_empty() && self.depth() == 0 && starts_top_level_decl(*id) {
                        self.separate_top_level();
                    }
                    if matches!(id, KeywordId::If | KeywordId::For | KeywordId::Switch | KeywordId::Select)
                        && !self.in_inline_frame()
                    {
                        self.in_header = true;
                    }
                    self.place(&tok.spelling(), spaced, breaks);
                }
                TokenKind::Punctuation(PunctuationId::LBrace) => {
                    let next = tokens.get(i).map(|t| &t.kind);
                    let single_line = tokens
                        .get(i)
                        .is_some_and(|t| !source[tok.span.end..t.span.start].contains('\n'));
                    let after_type_keyword =
                        matches!(prev, Some(TokenKind::Keyword(KeywordId::Struct | KeywordId::Interface)));
                    if self.in_inline_frame() || (after_type_keyword && single_line) {
                        self.place("{", spaced, breaks);
                        self.frames.push((Frame::Literal, tok.span.start));
                    } else if next == Some(&TokenKind::Punctuation(PunctuationId::RBrace)) {
                        self.in_header = false;
                        self.place("{", spaced, breaks);
                        self.current.push('}');
                        last_end = tokens[i].span.end;
                        i += 1;
                    } else {
                        self.in_header = false;
                        self.place("{", spaced, breaks);
                        self.frames.push((Frame::Block, tok.span.start));
                        self.end_line();
                        self.block_opened = true;
                    }
                }
                TokenKind::Punctuation(PunctuationId::RBrace) => {
                    if matches!(self.frames.last(), Some((Frame::Literal, _))) {
                        self.frames.pop();
                        self.place("}", spaced, breaks);
                    } else {
                        self.end_line();
                        self.pop(Frame::Block, "}", tok.span.start)?;
                        self.trim_trailing_blank();
                        self.place("}", false, 0);
                    }
                }
                TokenKind::Punctuation(PunctuationId::LParen) => {
                    let grouped = matches!(
                        prev,
                        Some(TokenKind::Keyword(
                            KeywordId::Import | KeywordId::Const | KeywordId::Var | KeywordId::Type
                        ))
                    );
                    self.place("(", spaced, breaks);
                    if grouped {
                        self.end_line();
                        let imports = matches!(prev, Some(TokenKind::Keyword(KeywordId::Import)));
                        let imports_from = imports.then_some(self.lines.len());
                        self.frames.push((Frame::Group { imports_from }, tok.span.start));
                        self.block_opened = true;
                    } else {
                        self.frames.push((Frame::Paren, tok.span.start));
                    }
                }
                TokenKind::Punctuation(PunctuationId::RParen) => match self.frames.last() {
                    Some((Frame::Group { imports_from }, _)) => {
                        let imports_from = *imports_from;
                        self.frames.pop();
                        self.end_line();
                        if let Some(start) = imports_from {
                            self.sort_imports(start);
                        }
                        self.trim_trailing_blank();
                        self.place(")", false, 0);
                    }
                    _ => {
                        self.pop(Frame::Paren, ")", tok.span.start)?;
                        self.place(")", spaced, breaks);
                    }
                },
                TokenKind::Punctuation(PunctuationId::LBracket) => {
                    self.place("[", spaced, breaks);
                    self.frames.push((Frame::Bracket, tok.span.start));
                }
                TokenKind::Punctuation(PunctuationId::RBracket) => {
                    self.pop(Frame::Bracket, "]", tok.span.start)?;
                    self.place("]", spaced, breaks);
                }
                TokenKind::Punctuation(PunctuationId::Semicolon) => {
                    if self.in_header || self.in_inline_frame() {
                        self.place(";", spaced, breaks);
                    } else {
                        self.end_line();
                    }
                }
                _ => self.place(&tok.spelling(), spaced, breaks),
            }
            prev = Some(&tok.kind);
        }

        self.end_line();
        if let Some((frame, offset)) = self.frames.last() {
            let delimiter = match frame {
                Frame::Block | Frame::Literal => "{",
                Frame::Group { .. } | Frame::Paren => "(",
                Frame::Bracket => "[",
            };
            return Err(self.unbalanced(delimiter, *offset));
        }
        self.trim_trailing_blank();
        Ok(self.render())
    }

    // ========================================================================
    // Line assembly
    // ========================================================================

    fn depth(&self) -> usize {
        self.frames
            .iter()
            .filter(|(f, _)| matches!(f, Frame::Block | Frame::Group { .. }))
            .count()
    }

    fn in_inline_frame(&self) -> bool {
        matches!(self.frames.last(), Some((Frame::Paren | Frame::Bracket | Frame::Literal, _)))
    }

    fn place(&mut self, text: &str, spaced: bool, breaks: usize) {
        if self.current.is_empty() {
            if breaks >= 2 {
                self.request_blank();
            }
            self.line_depth = self.depth();
        } else if spaced {
            self.current.push(' ');
        }
        self.current.push_str(text);
    }

    fn end_line(&mut self) {
        if !self.current.is_empty() {
            let text = std::mem::take(&mut self.current);
            self.lines.push(Line::Code {
                depth: self.line_depth,
                text,
            });
            self.block_opened = false;
        }
    }

    /// Keep one blank line from the input, except at the start of the file or a block.
    fn request_blank(&mut self) {
        if self.block_opened || matches!(self.lines.last(), None | Some(Line::Blank)) {
            return;
        }
        self.lines.push(Line::Blank);
    }

    fn separate_top_level(&mut self) {
        let Some(last) = self.lines.last() else {
            return;
        };
        if last.is_comment() {
            return;
        }
        let trailing = self.lines.iter().rev().take_while(|l| matches!(l, Line::Blank)).count();
        for _ in trailing..self.config.blank_lines_top_level {
            self.lines.push(Line::Blank);
        }
    }

    fn trim_trailing_blank(&mut self) {
        while matches!(self.lines.last(), Some(Line::Blank)) {
            self.lines.pop();
        }
    }

    fn sort_imports(&mut self, start: usize) {
        let mut specs: Vec<(usize, String)> = self
            .lines
            .drain(start..)
            .filter_map(|line| match line {
                Line::Code { depth, text } => Some((depth, text)),
                Line::Blank => None,
            })
            .collect();
        specs.sort_by(|a, b| import_key(&a.1).cmp(import_key(&b.1)).then_with(|| a.1.cmp(&b.1)));
        specs.dedup_by(|a, b| a.1 == b.1);
        self.lines
            .extend(specs.into_iter().map(|(depth, text)| Line::Code { depth, text }));
    }

    fn pop(&mut self, expected: Frame, closing: &str, offset: usize) -> Result<(), FormatError> {
        match self.frames.last() {
            Some((frame, _)) if *frame == expected => {
                self.frames.pop();
                Ok(())
            }
            _ => Err(self.unbalanced(closing, offset)),
        }
    }

    fn unbalanced(&self, delimiter: &str, offset: usize) -> FormatError {
        let (line, column) = line_col(self.source, offset);
        FormatError::Unbalanced {
            delimiter: delimiter.to_string(),
            line,
            column,
        }
    }

    fn render(self) -> String {
        let mut writer = FormatWriter::new(self.config);
        for line in &self.lines {
            match line {
                Line::Blank => writer.newline(),
                Line::Code { depth, text } => {
                    writer.set_indent(*depth);
                    writer.writeln(text);
                }
            }
        }
        writer.finish()
    }
}

fn starts_top_level_decl(id: KeywordId) -> bool {
    matches!(
        id,
        KeywordId::Func | KeywordId::Type | KeywordId::Var | KeywordId::Const | KeywordId::Import
    )
}

/// Sort key of an import spec line: the quoted path, ignoring any alias.
fn import_key(spec: &str) -> &str {
    spec.find('"').map_or(spec, |idx| &spec[idx..])
}
