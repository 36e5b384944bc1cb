//! Abstract syntax tree for Go declarations.
//!
//! Only the declaration surface kmgen cares about is modelled: the package clause, import specs
//! and type declarations. Type expressions are kept structurally so they can be inspected
//! (map key/value, embedded base names) and rendered back to a normalized signature string via
//! [`fmt::Display`].

use std::fmt;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

// ============================================================================
// File level
// ============================================================================

/// A parsed Go source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: Spanned<Ident>,
    pub imports: Vec<Spanned<ImportSpec>>,
    pub types: Vec<Spanned<TypeDecl>>,
}

impl SourceFile {
    /// Look up a type declaration by name.
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().map(|t| &t.node).find(|t| t.name == name)
    }

    /// Import paths in declaration order, without quotes.
    pub fn import_paths(&self) -> Vec<&str> {
        self.imports.iter().map(|i| i.node.path.as_str()).collect()
    }
}

/// `import alias "path"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name, including `_` and `.`.
    pub alias: Option<Ident>,
    pub path: String,
}

/// `type Name[Params] Type` or `type Name = Type`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    /// `true` for alias declarations (`type A = B`).
    pub alias: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Ident,
    pub constraint: Vec<UnionTerm>,
}

// ============================================================================
// Type expressions
// ============================================================================

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A syntactic Go type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `T`, `pkg.T`, `G[A, B]`
    Named {
        package: Option<Ident>,
        name: Ident,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    /// `[N]T`; the length is kept as written (`...` for `[...]T`).
    Array { len: String, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Func(FuncType),
    Struct(StructType),
    Interface(InterfaceType),
}

impl TypeExpr {
    /// Unqualified named type without arguments.
    pub fn simple(name: impl Into<Ident>) -> Self {
        TypeExpr::Named {
            package: None,
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// The bare identifier this expression names, if it is an unqualified named type.
    pub fn local_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named {
                package: None, name, ..
            } => Some(name),
            _ => None,
        }
    }

    /// The name an embedded field of this type is known by (`*pkg.T` and `G[X]` become `T`/`G`).
    pub fn embedded_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { name, .. } => Some(name),
            TypeExpr::Pointer(inner) => match inner.as_ref() {
                TypeExpr::Named { name, .. } => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeExpr::Pointer(_))
    }
}

/// `func(params) results`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuncType {
    pub params: Vec<TypeExpr>,
    pub results: Vec<TypeExpr>,
    /// The last parameter is `...T`.
    pub variadic: bool,
}

/// `struct { ... }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructType {
    pub fields: Vec<Spanned<FieldDecl>>,
}

/// One line of a struct body.
///
/// ## Notes
/// - `names` is empty for embedded fields; use [`FieldDecl::embedded_name`] to get the promoted name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    /// Raw tag literal including its quotes.
    pub tag: Option<String>,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }

    pub fn embedded_name(&self) -> Option<&str> {
        if self.is_embedded() {
            self.ty.embedded_name()
        } else {
            None
        }
    }
}

/// `interface { ... }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterfaceType {
    pub elements: Vec<InterfaceElem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: Ident, sig: FuncType },
    /// Embedded interface or type-set union (`~int | ~string`).
    Union(Vec<UnionTerm>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionTerm {
    pub tilde: bool,
    pub ty: TypeExpr,
}

// ============================================================================
// Rendering
// ============================================================================

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_union(f: &mut fmt::Formatter<'_>, terms: &[UnionTerm]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            write!(f, " | ")?;
        }
        if term.tilde {
            write!(f, "~")?;
        }
        write!(f, "{}", term.ty)?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named { package, name, args } => {
                if let Some(pkg) = package {
                    write!(f, "{pkg}.")?;
                }
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "[")?;
                    write_list(f, args)?;
                    write!(f, "]")?;
                }
                Ok(())
            }
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExpr::Func(sig) => write!(f, "func{sig}"),
            TypeExpr::Struct(st) => write!(f, "{st}"),
            TypeExpr::Interface(it) => write!(f, "{it}"),
        }
    }
}

impl fmt::Display for FuncType {
    /// Renders the signature without the `func` keyword: `(A, ...B) (C, error)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if self.variadic && i + 1 == self.params.len() {
                write!(f, "...")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, ")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " {single}"),
            many => {
                write!(f, " (")?;
                write_list(f, many)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "struct{{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            let field = &field.node;
            if !field.names.is_empty() {
                write!(f, "{} ", field.names.join(", "))?;
            }
            write!(f, "{}", field.ty)?;
            if let Some(tag) = &field.tag {
                write!(f, " {tag}")?;
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface{{")?;
        for (i, elem) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            match elem {
                InterfaceElem::Method { name, sig } => write!(f, "{name}{sig}")?,
                InterfaceElem::Union(terms) => write_union(f, terms)?,
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.name)?;
        write_union(f, &self.constraint)
    }
}
