//! Declaration-level parser for Go source files.
//!
//! Converts a token stream into a [`SourceFile`]: the package clause, import specs and every
//! top-level type declaration. Function declarations, `var` and `const` are consumed without
//! building an AST.
//!
//! ## Examples
//!
//! ```rust
//! use kmgen_syntax::{lexer, parser};
//!
//! let source = "package p\n\ntype Pair map[string][]int\n\nfunc f() { if true { return } }\n";
//! let tokens = lexer::lex(source).unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! assert_eq!(file.types[0].node.ty.to_string(), "map[string][]int");
//! ```

use crate::ast::*;
use crate::diagnostics::SyntaxError;
use crate::lexer::{Token, TokenKind};
use kmgen_core::lang::keywords::KeywordId;
use kmgen_core::lang::operators::OperatorId;
use kmgen_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/skip.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
