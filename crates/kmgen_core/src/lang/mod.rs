//! Go language vocabulary registries.
//!
//! Callers work with **stable IDs** (`KeywordId`, `OperatorId`, `PunctuationId`, `BasicTypeId`) and look
//! up spellings/metadata via const registry tables instead of scattering string comparisons through
//! the lexer, matcher and emitter.
//!
//! ## Examples
//! ```rust
//! use kmgen_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("struct"), Some(KeywordId::Struct));
//! assert_eq!(keywords::as_str(KeywordId::Map), "map");
//! ```

pub mod basic_types;
pub mod keywords;
pub mod operators;
pub mod punctuation;
