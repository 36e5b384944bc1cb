/// Skipping of declarations kmgen does not model.
///
/// Function bodies, `var` and `const` blocks can contain arbitrary expressions. They are consumed
/// by delimiter balancing rather than parsed.
impl<'a> Parser<'a> {
    // ========================================================================
    // Skipped declarations
    // ========================================================================

    /// `func (recv) Name[T any](params) results { body }`
    fn skip_func_decl(&mut self) -> Result<(), SyntaxError> {
        self.expect_keyword(KeywordId::Func, "expected 'func'")?;
        if self.check_punct(PunctuationId::LParen) {
            self.skip_balanced()?;
        }
        self.identifier()?;
        if self.check_punct(PunctuationId::LBracket) {
            self.skip_balanced()?;
        }
        // The signature may mention struct or interface literals, so parse it for real.
        self.signature()?;
        if self.check_punct(PunctuationId::LBrace) {
            self.skip_balanced()?;
        }
        self.expect_terminator()
    }

    /// `var ...` / `const ...`, single or grouped.
    fn skip_value_decl(&mut self) -> Result<(), SyntaxError> {
        self.advance();
        let mut depth = 0usize;
        loop {
            let kind = &self.peek().kind;
            if matches!(kind, TokenKind::Eof) || (depth == 0 && kind.is_terminator()) {
                break;
            }
            match kind.punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    if depth == 0 {
                        return Err(self.error_here("unbalanced delimiter"));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
        if depth > 0 {
            return Err(self.error_here("unterminated declaration"));
        }
        self.expect_terminator()
    }

    /// Consume an opening delimiter and everything through its matching closer.
    fn skip_balanced(&mut self) -> Result<(), SyntaxError> {
        let open_span = self.current_span();
        let mut stack = Vec::new();
        loop {
            let kind = &self.peek().kind;
            if matches!(kind, TokenKind::Eof) {
                return Err(SyntaxError::parse("unclosed delimiter", open_span));
            }
            if let Some(id) = kind.punctuation_id() {
                if let Some(close) = kmgen_core::lang::punctuation::closing_delimiter(id) {
                    stack.push(close);
                } else if matches!(id, PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace)
                    && stack.pop() != Some(id)
                {
                    return Err(self.error_here("mismatched closing delimiter"));
                }
            }
            self.advance();
            if stack.is_empty() {
                return Ok(());
            }
        }
    }
}
