//! Normalized field model shared by the extractor, matcher and emitter.
//!
//! A [`TypeModel`] is what kmgen knows about one named Go type once its declaration has been read:
//! the package it lives in, its fields in declaration order, and whether it is a record, a map or
//! something opaque. Nothing here refers back to the syntax tree, so matching and emission can be
//! tested with hand-built field lists.

use std::fmt;

use kmgen_core::lang::basic_types::{self, BasicTypeId};
use kmgen_syntax::ast::TypeExpr;

use crate::qualify;

/// Normalized spelling of a Go type expression (`int`, `*T`, `map[string]any`, `p.Meta`, ...).
///
/// Two signatures are the same type, for kmgen's purposes, when their spellings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeSignature(String);

impl TypeSignature {
    pub fn new(spelling: impl Into<String>) -> Self {
        Self(spelling.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for an anonymous struct literal such as `struct{Value string}`.
    pub fn is_anonymous_struct(&self) -> bool {
        self.0.starts_with("struct{")
    }

    /// The predeclared basic type this signature names, if any.
    pub fn basic_kind(&self) -> Option<BasicTypeId> {
        basic_types::from_str(&self.0)
    }

    /// Remove every `pkg.` qualifier from the signature (`[]p.Meta` becomes `[]Meta` for `p`).
    pub fn strip_qualifier(&self, package: &str) -> TypeSignature {
        TypeSignature(qualify::strip_qualifier(&self.0, package))
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&TypeExpr> for TypeSignature {
    fn from(ty: &TypeExpr) -> Self {
        TypeSignature(ty.to_string())
    }
}

impl From<&str> for TypeSignature {
    fn from(s: &str) -> Self {
        TypeSignature(s.to_string())
    }
}

/// One field of a record (or a `key`/`value` pseudo field of a map).
///
/// ## Notes
/// - `children` is `Some` when the field's type is a record kmgen could see into: an embedded
///   same-file struct, a named same-file struct, or an anonymous struct literal.
/// - An embedded field is named after its type (`*pkg.Base` is named `Base`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeSignature,
    pub children: Option<Vec<Field>>,
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeSignature>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            children: None,
            embedded: false,
        }
    }

    pub fn with_children(mut self, children: Vec<Field>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Go visibility: an identifier is exported when it starts with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    pub fn is_record(&self) -> bool {
        self.children.is_some()
    }
}

impl From<String> for TypeSignature {
    fn from(s: String) -> Self {
        TypeSignature(s)
    }
}

pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// What a named type turned out to be once aliases were followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Record,
    /// A map type; the model carries `key` and `value` pseudo fields.
    Map,
    /// Anything else (`type ID int`, a type declared in another file, ...). No fields.
    Opaque,
}

/// The extracted model of one named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeModel {
    pub package: String,
    pub name: String,
    pub fields: Vec<Field>,
    pub shape: TypeShape,
}

impl TypeModel {
    pub fn is_map_type(&self) -> bool {
        self.shape == TypeShape::Map
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_follows_first_letter() {
        assert!(Field::new("Name", "string").is_exported());
        assert!(!Field::new("name", "string").is_exported());
        assert!(!Field::new("_", "int").is_exported());
        assert!(Field::new("Ünicode", "int").is_exported());
    }

    #[test]
    fn test_signature_helpers() {
        assert!(TypeSignature::from("struct{Value string}").is_anonymous_struct());
        assert!(!TypeSignature::from("*struct{}").is_anonymous_struct());
        assert_eq!(TypeSignature::from("int64").basic_kind(), Some(BasicTypeId::Int64));
        assert_eq!(TypeSignature::from("p.Meta").basic_kind(), None);
        assert_eq!(
            TypeSignature::from("map[string]p.Meta").strip_qualifier("p").as_str(),
            "map[string]Meta"
        );
    }
}
