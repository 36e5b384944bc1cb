//! Predeclared Go types.
//!
//! The matcher consults this registry when deciding whether two differently-typed fields can be
//! bridged with an explicit conversion expression (`T(src.X)`). Which kinds participate is a policy
//! choice; [`DEFAULT_CONVERTIBLE`] is the stock membership and callers may supply their own.
//!
//! ## Examples
//! ```rust
//! use kmgen_core::lang::basic_types::{self, BasicTypeId};
//!
//! assert_eq!(basic_types::from_str("float64"), Some(BasicTypeId::Float64));
//! assert!(basic_types::info_for(BasicTypeId::Uint8).numeric);
//! assert_eq!(basic_types::from_str("Time"), None);
//! ```

/// Stable identifier for each predeclared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasicTypeId {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Byte,
    Rune,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Any,
    Error,
}

/// Metadata for a predeclared type.
#[derive(Debug, Clone, Copy)]
pub struct BasicTypeInfo {
    pub id: BasicTypeId,
    pub canonical: &'static str,
    /// Integer, floating point or complex kind.
    pub numeric: bool,
}

/// Registry of predeclared types.
pub const BASIC_TYPES: &[BasicTypeInfo] = &[
    basic(BasicTypeId::Bool, "bool", false),
    basic(BasicTypeId::String, "string", false),
    basic(BasicTypeId::Int, "int", true),
    basic(BasicTypeId::Int8, "int8", true),
    basic(BasicTypeId::Int16, "int16", true),
    basic(BasicTypeId::Int32, "int32", true),
    basic(BasicTypeId::Int64, "int64", true),
    basic(BasicTypeId::Uint, "uint", true),
    basic(BasicTypeId::Uint8, "uint8", true),
    basic(BasicTypeId::Uint16, "uint16", true),
    basic(BasicTypeId::Uint32, "uint32", true),
    basic(BasicTypeId::Uint64, "uint64", true),
    basic(BasicTypeId::Uintptr, "uintptr", true),
    basic(BasicTypeId::Byte, "byte", true),
    basic(BasicTypeId::Rune, "rune", true),
    basic(BasicTypeId::Float32, "float32", true),
    basic(BasicTypeId::Float64, "float64", true),
    basic(BasicTypeId::Complex64, "complex64", true),
    basic(BasicTypeId::Complex128, "complex128", true),
    basic(BasicTypeId::Any, "any", false),
    basic(BasicTypeId::Error, "error", false),
];

/// Kinds that are mutually convertible unless configuration says otherwise.
pub const DEFAULT_CONVERTIBLE: &[BasicTypeId] = &[
    BasicTypeId::Int,
    BasicTypeId::Int32,
    BasicTypeId::Int64,
    BasicTypeId::Float64,
    BasicTypeId::String,
];

/// Canonical spelling.
pub fn as_str(id: BasicTypeId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: BasicTypeId) -> &'static BasicTypeInfo {
    BASIC_TYPES.iter().find(|b| b.id == id).expect("basic type info missing")
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<BasicTypeId> {
    BASIC_TYPES.iter().find(|b| b.canonical == s).map(|b| b.id)
}

const fn basic(id: BasicTypeId, canonical: &'static str, numeric: bool) -> BasicTypeInfo {
    BasicTypeInfo { id, canonical, numeric }
}
