/// Parse a token stream into a [`SourceFile`].
///
/// This is the main public entrypoint for parsing. Comment tokens (from
/// `lexer::lex_with_comments`) are ignored.
///
/// ## Errors
/// Returns `Err(Vec<SyntaxError>)` if parsing fails or the stream does not end with `Eof`.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<SourceFile, Vec<SyntaxError>> {
    if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
        return Err(vec![SyntaxError::parse(
            "token stream must end with EOF",
            tokens.last().map(|t| t.span).unwrap_or_default(),
        )]);
    }
    if tokens.iter().any(|t| t.kind.is_comment()) {
        let significant: Vec<Token> = tokens.iter().filter(|t| !t.kind.is_comment()).cloned().collect();
        return Parser::new(&significant).parse();
    }
    Parser::new(tokens).parse()
}

/// Lex and parse a source string in one step.
pub fn parse_source(source: &str) -> Result<SourceFile, Vec<SyntaxError>> {
    let tokens = crate::lexer::lex(source)?;
    parse(&tokens)
}
