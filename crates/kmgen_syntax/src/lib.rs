//! Declaration-level Go frontend for kmgen: lexer, parser, AST, diagnostics.
//!
//! kmgen only needs to know what a Go file *declares*: its package name, its imports, and the
//! shape of every named type. Function bodies, `var` and `const` declarations are tokenized and
//! skipped.
//!
//! ## Notes
//! - This crate is “syntax-only”: no name resolution across files and no type checking.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `kmgen_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use kmgen_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("package p\n\ntype P struct {\n\tA int\n}\n").unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! assert_eq!(file.package.node, "p");
//! assert!(file.find_type("P").is_some());
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
