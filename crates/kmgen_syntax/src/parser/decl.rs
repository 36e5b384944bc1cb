/// Declaration parsing methods.
///
/// This chunk parses top-level declarations:
/// - The `package` clause
/// - `import` specs (single or grouped, optionally aliased)
/// - `type` specs (single or grouped, generic, alias)
///
/// `func`, `var` and `const` declarations are skipped (see `parser/skip.rs`).
impl<'a> Parser<'a> {
    // ========================================================================
    // Package and imports
    // ========================================================================

    fn package_clause(&mut self) -> Result<Spanned<Ident>, SyntaxError> {
        self.expect_keyword(KeywordId::Package, "expected 'package' clause")?;
        let name = self.identifier()?;
        self.expect_terminator()?;
        Ok(name)
    }

    fn import_decl(&mut self) -> Result<Vec<Spanned<ImportSpec>>, SyntaxError> {
        self.expect_keyword(KeywordId::Import, "expected 'import'")?;
        let specs = self.grouped(Self::import_spec)?;
        self.expect_terminator()?;
        Ok(specs)
    }

    fn import_spec(&mut self) -> Result<Spanned<ImportSpec>, SyntaxError> {
        let start = self.current_span();
        let alias = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            TokenKind::Punctuation(PunctuationId::Dot) => {
                self.advance();
                Some(".".to_string())
            }
            _ => None,
        };

        let raw = match &self.peek().kind {
            TokenKind::String(raw) | TokenKind::RawString(raw) => raw.clone(),
            _ => return Err(self.error_here("expected import path")),
        };
        let path_span = self.advance().span;
        let path = crate::lexer::unquote(&raw)
            .ok_or_else(|| SyntaxError::parse("malformed import path", path_span))?;

        Ok(Spanned::new(ImportSpec { alias, path }, start.merge(path_span)))
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn type_decl(&mut self) -> Result<Vec<Spanned<TypeDecl>>, SyntaxError> {
        self.expect_keyword(KeywordId::Type, "expected 'type'")?;
        let decls = self.grouped(Self::type_spec)?;
        self.expect_terminator()?;
        Ok(decls)
    }

    fn type_spec(&mut self) -> Result<Spanned<TypeDecl>, SyntaxError> {
        let name = self.identifier()?;
        tracing::trace!(name = %name.node, "type spec");

        let type_params = if self.looks_like_type_params() {
            self.type_params()?
        } else {
            Vec::new()
        };
        let alias = self.match_op(OperatorId::Assign);
        let ty = self.type_expr()?;
        let span = name.span.merge(self.previous_span());

        Ok(Spanned::new(
            TypeDecl {
                name: name.node,
                type_params,
                alias,
                ty,
            },
            span,
        ))
    }

    /// `type A[T any] ...` versus `type A [N]T`.
    ///
    /// ## Notes
    /// - Like the Go parser this is a syntactic guess: `[` Ident followed by something that can
    ///   start a constraint is a parameter list; `[N]`, `[pkg.N]` and `[N+1]` are array lengths.
    fn looks_like_type_params(&self) -> bool {
        if !self.check_punct(PunctuationId::LBracket) || !matches!(self.peek_at(1).kind, TokenKind::Ident(_)) {
            return false;
        }
        match &self.peek_at(2).kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(id) => matches!(
                id,
                KeywordId::Interface | KeywordId::Map | KeywordId::Chan | KeywordId::Func | KeywordId::Struct
            ),
            TokenKind::Punctuation(id) => matches!(id, PunctuationId::Comma | PunctuationId::LBracket),
            TokenKind::Operator(id) => matches!(id, OperatorId::Star | OperatorId::Tilde),
            _ => false,
        }
    }

    /// `[K comparable, V any]` or `[K, V any]`
    fn type_params(&mut self) -> Result<Vec<TypeParam>, SyntaxError> {
        self.expect_punct(PunctuationId::LBracket, "expected '['")?;
        let mut params = Vec::new();
        let mut pending = Vec::new();
        loop {
            pending.push(self.identifier()?.node);
            if self.match_punct(PunctuationId::Comma) {
                continue;
            }
            let constraint = self.union_terms()?;
            params.extend(pending.drain(..).map(|name| TypeParam {
                name,
                constraint: constraint.clone(),
            }));
            if !self.match_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::RBracket) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBracket, "expected ']' after type parameters")?;
        Ok(params)
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    /// Parse `spec` or `( spec; spec; ... )`.
    fn grouped<T>(&mut self, mut spec: impl FnMut(&mut Self) -> Result<T, SyntaxError>) -> Result<Vec<T>, SyntaxError> {
        if !self.match_punct(PunctuationId::LParen) {
            return Ok(vec![spec(self)?]);
        }
        let mut items = Vec::new();
        loop {
            self.skip_terminators();
            if self.match_punct(PunctuationId::RParen) {
                break;
            }
            items.push(spec(self)?);
            self.expect_terminator()?;
        }
        Ok(items)
    }
}
