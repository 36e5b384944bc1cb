//! Type model extraction.
//!
//! [`extract`] looks a type up by name in one parsed file and turns its declaration into a
//! [`TypeModel`]. Declarations are classified once into a closed set of kinds and handled by a
//! single exhaustive match:
//!
//! - **Record**: a struct; one field per declared name, embedded members named after their type.
//! - **Map**: a map type; two pseudo fields, `key` and `value`.
//! - **Alias**: `type A = B` or `type A B` where `B` is another type in the same file; resolved
//!   through `B`.
//! - **Opaque**: everything else; a model with no fields.
//!
//! Nested records are only looked up in the same file. Recursion tracks the chain of type names
//! being expanded, and a name that is already on the chain yields an opaque field instead of
//! recursing again.

use kmgen_syntax::ast::{SourceFile, StructType, TypeDecl, TypeExpr};
use thiserror::Error;

use crate::model::{Field, TypeModel, TypeShape, TypeSignature};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("type({0}): specified type not found")]
    TypeNotFound(String),
}

/// Declaration kinds the extractor distinguishes.
enum DeclKind<'a> {
    Record(&'a StructType),
    Map { key: &'a TypeExpr, value: &'a TypeExpr },
    Alias(&'a str),
    Opaque,
}

fn classify<'a>(file: &'a SourceFile, ty: &'a TypeExpr) -> DeclKind<'a> {
    match ty {
        TypeExpr::Struct(st) => DeclKind::Record(st),
        TypeExpr::Map { key, value } => DeclKind::Map { key, value },
        TypeExpr::Named {
            package: None,
            name,
            args,
        } if args.is_empty() && file.find_type(name).is_some() => DeclKind::Alias(name.as_str()),
        _ => DeclKind::Opaque,
    }
}

/// Build the model of `type_name` as declared in `file`.
///
/// ## Errors
/// - [`ExtractError::TypeNotFound`] when the file has no type declaration with that name.
pub fn extract(file: &SourceFile, type_name: &str) -> Result<TypeModel, ExtractError> {
    let decl = file
        .find_type(type_name)
        .ok_or_else(|| ExtractError::TypeNotFound(type_name.to_string()))?;

    let mut chain = vec![type_name];
    let (fields, shape) = model_decl(file, decl, &mut chain);

    Ok(TypeModel {
        package: file.package.node.clone(),
        name: type_name.to_string(),
        fields,
        shape,
    })
}

fn model_decl<'a>(file: &'a SourceFile, decl: &'a TypeDecl, chain: &mut Vec<&'a str>) -> (Vec<Field>, TypeShape) {
    match classify(file, &decl.ty) {
        DeclKind::Record(st) => (struct_fields(file, st, chain), TypeShape::Record),
        DeclKind::Map { key, value } => (
            vec![Field::new("key", TypeSignature::from(key)), Field::new("value", TypeSignature::from(value))],
            TypeShape::Map,
        ),
        DeclKind::Alias(target) => {
            if chain.contains(&target) {
                return (Vec::new(), TypeShape::Opaque);
            }
            let Some(next) = file.find_type(target) else {
                return (Vec::new(), TypeShape::Opaque);
            };
            chain.push(target);
            let resolved = model_decl(file, next, chain);
            chain.pop();
            resolved
        }
        DeclKind::Opaque => (Vec::new(), TypeShape::Opaque),
    }
}

fn struct_fields<'a>(file: &'a SourceFile, st: &'a StructType, chain: &mut Vec<&'a str>) -> Vec<Field> {
    let mut fields = Vec::new();
    for decl in &st.fields {
        let decl = &decl.node;
        let ty = TypeSignature::from(&decl.ty);

        if let Some(name) = decl.embedded_name() {
            let mut field = Field::new(name, ty).embedded();
            field.children = record_children(file, &decl.ty, chain);
            fields.push(field);
            continue;
        }

        let children = record_children(file, &decl.ty, chain);
        for name in &decl.names {
            let mut field = Field::new(name.clone(), ty.clone());
            field.children = children.clone();
            fields.push(field);
        }
    }
    fields
}

/// Children for a field of type `ty`, when `ty` is a record kmgen can see into.
///
/// Pointers, qualified names and anything that does not resolve to a struct in this file stay
/// opaque.
fn record_children<'a>(file: &'a SourceFile, ty: &'a TypeExpr, chain: &mut Vec<&'a str>) -> Option<Vec<Field>> {
    match ty {
        TypeExpr::Struct(st) => Some(struct_fields(file, st, chain)),
        TypeExpr::Named {
            package: None,
            name,
            args,
        } if args.is_empty() => {
            if chain.contains(&name.as_str()) {
                return None;
            }
            let decl = file.find_type(name)?;
            chain.push(name.as_str());
            let (fields, shape) = model_decl(file, decl, chain);
            chain.pop();
            (shape == TypeShape::Record).then_some(fields)
        }
        _ => None,
    }
}
