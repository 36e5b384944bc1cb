/// Type-expression parsing methods.
///
/// This chunk parses Go type expressions:
/// - Named types (`int`, `pkg.T`, `G[A, B]`)
/// - Pointer, slice, array, map and channel types
/// - Function signatures (parameter names are discarded)
/// - Struct and interface literals
///
/// ## Notes
/// - `G[x]` is only read as a generic instantiation when the bracket contents parse as types and
///   no type follows the closing `]`; otherwise `x [N]T` is a name followed by an array type.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    /// Return `true` if the current token can begin a type expression.
    fn starts_type(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(id) => matches!(
                id,
                KeywordId::Map | KeywordId::Chan | KeywordId::Func | KeywordId::Struct | KeywordId::Interface
            ),
            TokenKind::Operator(id) => matches!(id, OperatorId::Star | OperatorId::Arrow),
            TokenKind::Punctuation(id) => matches!(id, PunctuationId::LBracket | PunctuationId::LParen),
            _ => false,
        }
    }

    fn type_expr(&mut self) -> Result<TypeExpr, SyntaxError> {
        let kind = self.peek().kind.clone();
        match kind {
            TokenKind::Ident(_) => self.named_type(),
            TokenKind::Operator(OperatorId::Star) => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.type_expr()?)))
            }
            TokenKind::Operator(OperatorId::Arrow) => {
                self.advance();
                self.expect_keyword(KeywordId::Chan, "expected 'chan' after '<-'")?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.type_expr()?),
                })
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                if self.match_punct(PunctuationId::RBracket) {
                    return Ok(TypeExpr::Slice(Box::new(self.type_expr()?)));
                }
                let len = self.array_len()?;
                self.expect_punct(PunctuationId::RBracket, "expected ']' after array length")?;
                Ok(TypeExpr::Array {
                    len,
                    elem: Box::new(self.type_expr()?),
                })
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.type_expr()?;
                self.expect_punct(PunctuationId::RParen, "expected ')' after type")?;
                Ok(inner)
            }
            TokenKind::Keyword(KeywordId::Map) => {
                self.advance();
                self.expect_punct(PunctuationId::LBracket, "expected '[' after 'map'")?;
                let key = self.type_expr()?;
                self.expect_punct(PunctuationId::RBracket, "expected ']' after map key")?;
                let value = self.type_expr()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TokenKind::Keyword(KeywordId::Chan) => {
                self.advance();
                let dir = if self.match_op(OperatorId::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.type_expr()?),
                })
            }
            TokenKind::Keyword(KeywordId::Func) => {
                self.advance();
                Ok(TypeExpr::Func(self.signature()?))
            }
            TokenKind::Keyword(KeywordId::Struct) => Ok(TypeExpr::Struct(self.struct_type()?)),
            TokenKind::Keyword(KeywordId::Interface) => Ok(TypeExpr::Interface(self.interface_type()?)),
            _ => Err(self.error_here("expected type")),
        }
    }

    fn named_type(&mut self) -> Result<TypeExpr, SyntaxError> {
        let first = self.identifier()?.node;
        let (package, name) = if self.match_punct(PunctuationId::Dot) {
            (Some(first), self.identifier()?.node)
        } else {
            (None, first)
        };
        let args = self.try_type_args().unwrap_or_default();
        Ok(TypeExpr::Named { package, name, args })
    }

    /// Speculatively parse `[A, B]` after a type name, restoring the position on failure.
    fn try_type_args(&mut self) -> Option<Vec<TypeExpr>> {
        if !self.check_punct(PunctuationId::LBracket) || self.peek_at(1).kind.is_punctuation(PunctuationId::RBracket) {
            return None;
        }
        let saved = self.pos;
        let parsed = (|| {
            self.advance();
            let mut args = vec![self.type_expr()?];
            while self.match_punct(PunctuationId::Comma) {
                if self.check_punct(PunctuationId::RBracket) {
                    break;
                }
                args.push(self.type_expr()?);
            }
            self.expect_punct(PunctuationId::RBracket, "expected ']' after type arguments")?;
            Ok::<_, SyntaxError>(args)
        })();
        match parsed {
            Ok(args) if !self.starts_type() => Some(args),
            _ => {
                self.pos = saved;
                None
            }
        }
    }

    /// Array length tokens up to the matching `]`, kept as written.
    fn array_len(&mut self) -> Result<String, SyntaxError> {
        let mut depth = 0usize;
        let mut text = String::new();
        loop {
            let tok = self.peek();
            match &tok.kind {
                TokenKind::Eof | TokenKind::Newline => return Err(self.error_here("unterminated array length")),
                TokenKind::Punctuation(PunctuationId::RBracket) if depth == 0 => break,
                TokenKind::Punctuation(PunctuationId::LBracket | PunctuationId::LParen) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RBracket | PunctuationId::RParen) => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            text.push_str(&tok.spelling());
            self.advance();
        }
        if text.is_empty() {
            return Err(self.error_here("expected array length"));
        }
        Ok(text)
    }

    // ========================================================================
    // Signatures
    // ========================================================================

    /// `(params) results` after `func` or a method name.
    fn signature(&mut self) -> Result<FuncType, SyntaxError> {
        let (params, variadic) = self.parameters()?;
        let results = if self.check_punct(PunctuationId::LParen) {
            self.parameters()?.0
        } else if self.starts_type() {
            vec![self.type_expr()?]
        } else {
            Vec::new()
        };
        Ok(FuncType {
            params,
            results,
            variadic,
        })
    }

    /// Parameter types of `( ... )`; names are resolved away.
    fn parameters(&mut self) -> Result<(Vec<TypeExpr>, bool), SyntaxError> {
        self.expect_punct(PunctuationId::LParen, "expected '('")?;

        // (has a name, type, variadic)
        let mut entries: Vec<(bool, TypeExpr, bool)> = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RParen) {
                break;
            }
            entries.push(self.parameter_entry()?);
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RParen, "expected ',' or ')' in parameter list")?;
                break;
            }
        }

        let variadic = entries.last().is_some_and(|e| e.2);
        if !entries.iter().any(|e| e.0) {
            return Ok((entries.into_iter().map(|e| e.1).collect(), variadic));
        }

        // `(a, b int, c string)`: bare entries are names sharing the next declared type.
        let mut types = Vec::with_capacity(entries.len());
        let mut current: Option<TypeExpr> = None;
        for (named, ty, _) in entries.into_iter().rev() {
            if named {
                current = Some(ty.clone());
                types.push(ty);
            } else {
                match &current {
                    Some(shared) => types.push(shared.clone()),
                    None => return Err(self.error_here("mixed named and unnamed parameters")),
                }
            }
        }
        types.reverse();
        Ok((types, variadic))
    }

    fn parameter_entry(&mut self) -> Result<(bool, TypeExpr, bool), SyntaxError> {
        if self.match_punct(PunctuationId::Ellipsis) {
            return Ok((false, self.type_expr()?, true));
        }
        let first = self.type_expr()?;
        if self.check_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::RParen) {
            return Ok((false, first, false));
        }
        if first.local_name().is_none() {
            return Err(self.error_here("expected ',' or ')' after parameter"));
        }
        let variadic = self.match_punct(PunctuationId::Ellipsis);
        Ok((true, self.type_expr()?, variadic))
    }

    // ========================================================================
    // Struct and interface literals
    // ========================================================================

    fn struct_type(&mut self) -> Result<StructType, SyntaxError> {
        self.expect_keyword(KeywordId::Struct, "expected 'struct'")?;
        self.expect_punct(PunctuationId::LBrace, "expected '{' after 'struct'")?;
        let mut fields = Vec::new();
        loop {
            self.skip_terminators();
            if self.match_punct(PunctuationId::RBrace) {
                break;
            }
            fields.push(self.field_decl()?);
            self.expect_terminator()?;
        }
        Ok(StructType { fields })
    }

    fn field_decl(&mut self) -> Result<Spanned<FieldDecl>, SyntaxError> {
        let start = self.current_span();
        let names = if self.is_embedded_field() {
            Vec::new()
        } else {
            let mut names = vec![self.identifier()?.node];
            while self.match_punct(PunctuationId::Comma) {
                names.push(self.identifier()?.node);
            }
            names
        };
        let ty = self.type_expr()?;
        if names.is_empty() && ty.embedded_name().is_none() {
            return Err(SyntaxError::parse(
                "embedded field must be a type name or pointer to a type name",
                start.merge(self.previous_span()),
            ));
        }

        let tag = match &self.peek().kind {
            TokenKind::String(raw) | TokenKind::RawString(raw) => {
                let raw = raw.clone();
                self.advance();
                Some(raw)
            }
            _ => None,
        };

        Ok(Spanned::new(FieldDecl { names, ty, tag }, start.merge(self.previous_span())))
    }

    /// Decide between `Name Type` and an embedded `T`, `*T`, `pkg.T` or `G[A]`.
    fn is_embedded_field(&mut self) -> bool {
        if self.check_op(OperatorId::Star) {
            return true;
        }
        if !matches!(self.peek().kind, TokenKind::Ident(_)) {
            return false;
        }
        let next = &self.peek_at(1).kind;
        if next.is_punctuation(PunctuationId::Dot) || self.field_ends_at(1) {
            return true;
        }
        if !next.is_punctuation(PunctuationId::LBracket) {
            return false;
        }

        let saved = self.pos;
        let embedded = match self.named_type() {
            Ok(TypeExpr::Named { args, .. }) => !args.is_empty() && self.field_ends_at(0),
            _ => false,
        };
        self.pos = saved;
        embedded
    }

    /// The token at `offset` ends a field declaration (terminator, `}` or a tag).
    fn field_ends_at(&self, offset: usize) -> bool {
        let kind = &self.peek_at(offset).kind;
        kind.is_terminator() || kind.is_punctuation(PunctuationId::RBrace) || kind.is_string()
    }

    fn interface_type(&mut self) -> Result<InterfaceType, SyntaxError> {
        self.expect_keyword(KeywordId::Interface, "expected 'interface'")?;
        self.expect_punct(PunctuationId::LBrace, "expected '{' after 'interface'")?;
        let mut elements = Vec::new();
        loop {
            self.skip_terminators();
            if self.match_punct(PunctuationId::RBrace) {
                break;
            }
            let is_method = matches!(self.peek().kind, TokenKind::Ident(_))
                && self.peek_at(1).kind.is_punctuation(PunctuationId::LParen);
            if is_method {
                let name = self.identifier()?.node;
                let sig = self.signature()?;
                elements.push(InterfaceElem::Method { name, sig });
            } else {
                elements.push(InterfaceElem::Union(self.union_terms()?));
            }
            self.expect_terminator()?;
        }
        Ok(InterfaceType { elements })
    }

    /// `~int | ~string | fmt.Stringer`
    fn union_terms(&mut self) -> Result<Vec<UnionTerm>, SyntaxError> {
        let mut terms = Vec::new();
        loop {
            let tilde = self.match_op(OperatorId::Tilde);
            let ty = self.type_expr()?;
            terms.push(UnionTerm { tilde, ty });
            if !self.match_op(OperatorId::Pipe) {
                break;
            }
        }
        Ok(terms)
    }
}
