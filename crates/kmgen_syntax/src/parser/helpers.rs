/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `peek_at`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Statement terminators (`skip_terminators`, `expect_terminator`)
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Look `offset` tokens ahead, clamped to the trailing `Eof`.
    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos - 1]
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<Span, SyntaxError> {
        if self.check_keyword(id) {
            Ok(self.advance().span)
        } else {
            Err(self.error_here(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<Span, SyntaxError> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.error_here(msg))
        }
    }

    fn identifier(&mut self) -> Result<Spanned<Ident>, SyntaxError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.error_here("expected identifier")),
        }
    }

    /// Build an error at the current token that names what was found.
    fn error_here(&self, msg: &str) -> SyntaxError {
        let found = match &self.peek().kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Newline => "newline".to_string(),
            other => format!("'{}'", other.spelling()),
        };
        SyntaxError::parse(format!("{msg}, found {found}"), self.current_span())
    }

    // ========================================================================
    // Terminators
    // ========================================================================

    fn skip_terminators(&mut self) {
        while self.peek().kind.is_terminator() {
            self.advance();
        }
    }

    /// Consume a `;`/newline, or accept a closing `)`/`}` or EOF without consuming it.
    fn expect_terminator(&mut self) -> Result<(), SyntaxError> {
        if self.peek().kind.is_terminator() {
            self.advance();
            return Ok(());
        }
        if self.is_at_end() || self.check_punct(PunctuationId::RParen) || self.check_punct(PunctuationId::RBrace) {
            return Ok(());
        }
        Err(self.error_here("expected ';' or newline"))
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Skip to the next top-level declaration keyword that starts a line.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        let mut line_start = false;
        while !self.is_at_end() {
            let kind = &self.peek().kind;
            if depth == 0
                && line_start
                && matches!(
                    kind.keyword_id(),
                    Some(KeywordId::Import | KeywordId::Type | KeywordId::Func | KeywordId::Var | KeywordId::Const)
                )
            {
                return;
            }
            match kind.punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            line_start = kind.is_terminator();
            self.advance();
        }
    }
}
