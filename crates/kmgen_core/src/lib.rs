//! Provide the canonical Go vocabulary used by the kmgen frontend and emitter.
//!
//! This crate is intentionally small and dependency-free. It holds registry tables for the parts of
//! the Go language that kmgen reads (type declarations) and writes (conversion functions):
//! reserved keywords, operator and punctuation spellings, and the predeclared basic types.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, no AST types.
//! - The lexer and parser in `kmgen_syntax` enforce syntax; registries only provide spellings and metadata.

pub mod lang;
