/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Parser state.
///
/// ## Notes
/// - The parser recovers from errors in a top-level declaration by synchronizing at the next
///   declaration keyword, so one pass can report several problems.
/// - The token stream must not contain comment tokens; [`parse`] filters them.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream ending in `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`SourceFile`].
    ///
    /// ## Errors
    /// Returns every [`SyntaxError`] collected during the pass. A missing package clause stops
    /// parsing immediately.
    pub fn parse(mut self) -> Result<SourceFile, Vec<SyntaxError>> {
        self.skip_terminators();
        let package = match self.package_clause() {
            Ok(package) => package,
            Err(e) => return Err(vec![e]),
        };

        let mut imports = Vec::new();
        let mut types = Vec::new();

        self.skip_terminators();
        while !self.is_at_end() {
            let result = match self.peek().keyword_id() {
                Some(KeywordId::Import) => self.import_decl().map(|specs| imports.extend(specs)),
                Some(KeywordId::Type) => self.type_decl().map(|decls| types.extend(decls)),
                Some(KeywordId::Func) => self.skip_func_decl(),
                Some(KeywordId::Var | KeywordId::Const) => self.skip_value_decl(),
                _ => Err(self.error_here("expected declaration")),
            };
            if let Err(e) = result {
                self.errors.push(e);
                self.synchronize();
            }
            self.skip_terminators();
        }

        if self.errors.is_empty() {
            Ok(SourceFile {
                package,
                imports,
                types,
            })
        } else {
            Err(self.errors)
        }
    }
}
