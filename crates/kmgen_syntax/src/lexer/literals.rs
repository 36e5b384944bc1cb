//! Numeric, string and rune literal scanning.

use super::{Lexer, TokenKind};

impl<'a> Lexer<'a> {
    /// Scan a number; `first` has been consumed (a digit or a leading `.`).
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        let mut hex = false;
        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            hex = true;
        }

        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.') {
                break;
            }
            self.advance();
            let exponent = if hex { matches!(c, 'p' | 'P') } else { matches!(c, 'e' | 'E') };
            if exponent && matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
        }

        let text = self.source[start..self.current_pos].to_string();
        let is_float = text.contains('.')
            || (hex && text[2..].contains(['p', 'P']))
            || (!hex && text.contains(['e', 'E']));

        let kind = if text.ends_with('i') {
            TokenKind::Imaginary(text)
        } else if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        };
        self.add_token(kind, start);
    }

    /// Scan an interpreted string; the opening quote has been consumed.
    pub(super) fn scan_string(&mut self, start: usize) {
        if self.scan_quoted('"') {
            let text = self.source[start..self.current_pos].to_string();
            self.add_token(TokenKind::String(text), start);
        } else {
            self.error("unterminated string literal", start);
        }
    }

    /// Scan a rune literal; the opening quote has been consumed.
    pub(super) fn scan_rune(&mut self, start: usize) {
        if self.scan_quoted('\'') {
            let text = self.source[start..self.current_pos].to_string();
            self.add_token(TokenKind::Rune(text), start);
        } else {
            self.error("unterminated rune literal", start);
        }
    }

    /// Scan a raw string; may span lines.
    pub(super) fn scan_raw_string(&mut self, start: usize) {
        loop {
            match self.advance() {
                Some('`') => break,
                Some(_) => {}
                None => {
                    self.error("unterminated raw string literal", start);
                    return;
                }
            }
        }
        let text = self.source[start..self.current_pos].to_string();
        self.add_token(TokenKind::RawString(text), start);
    }

    /// Consume up to and including the closing `quote`. Returns `false` at a line break or EOF.
    fn scan_quoted(&mut self, quote: char) -> bool {
        loop {
            match self.peek() {
                None | Some('\n') => return false,
                Some('\\') => {
                    self.advance();
                    if self.peek_is_line_end() {
                        return false;
                    }
                    self.advance();
                }
                Some(c) => {
                    self.advance();
                    if c == quote {
                        return true;
                    }
                }
            }
        }
    }

    fn peek_is_line_end(&mut self) -> bool {
        matches!(self.peek(), None | Some('\n'))
    }
}

/// Decode a string literal's raw spelling into its value.
///
/// ## Returns
/// - `None` when `raw` is not a well-formed interpreted or raw string literal.
pub fn unquote(raw: &str) -> Option<String> {
    if let Some(inner) = raw.strip_prefix('`').and_then(|r| r.strip_suffix('`')) {
        return Some(inner.replace('\r', ""));
    }
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next()?;
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'x' => out.push(char::from(read_radix(&mut chars, 2, 16)? as u8)),
            'u' => out.push(char::from_u32(read_radix(&mut chars, 4, 16)?)?),
            'U' => out.push(char::from_u32(read_radix(&mut chars, 8, 16)?)?),
            '0'..='7' => {
                let rest = read_radix(&mut chars, 2, 8)?;
                let value = esc.to_digit(8)? * 64 + rest;
                out.push(char::from(u8::try_from(value).ok()?));
            }
            _ => return None,
        }
    }
    Some(out)
}

fn read_radix(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, count: usize, radix: u32) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars.next()?.to_digit(radix)?;
        value = value * radix + digit;
    }
    Some(value)
}
