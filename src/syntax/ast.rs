//! Syntax tree for the declaration-level subset of Go.
//!
//! Every syntactic category is a closed enum so consumers match
//! exhaustively. Type expressions the scanner does not model in detail are
//! kept as [`TypeExpr::Unsupported`] instead of being rejected.

use super::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub position: Position,
}

/// A single `//` or `/* */` comment, leader included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub position: Position,
}

/// Comments on adjacent lines with no code between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.comments.iter().map(|c| c.text.as_str())
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

impl File {
    /// Top-level function and method declarations, in source order.
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            Decl::Type(_) | Decl::Value(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit alias, including `_` and `.`.
    pub name: Option<Ident>,
    /// Import path without quotes.
    pub path: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Type(TypeDecl),
    Func(FuncDecl),
    /// `var` or `const`; skipped by the scanner.
    Value(Position),
}

/// `type X ...` or a grouped `type ( ... )` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub doc: Option<CommentGroup>,
    pub specs: Vec<TypeSpec>,
    pub grouped: bool,
}

impl TypeDecl {
    /// The doc comment that applies to `spec`: its own inside a group,
    /// otherwise the declaration's.
    pub fn doc_for<'a>(&'a self, spec: &'a TypeSpec) -> Option<&'a CommentGroup> {
        if spec.doc.is_some() {
            return spec.doc.as_ref();
        }
        if !self.grouped || self.specs.len() == 1 {
            self.doc.as_ref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub doc: Option<CommentGroup>,
    pub name: Ident,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    /// Receiver list; `None` for plain functions.
    pub recv: Option<Vec<Field>>,
    pub name: Ident,
    pub signature: FuncType,
    pub has_body: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// One entry of a parameter, result, receiver, struct field or interface
/// element list: zero or more names bound to one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedKind {
    /// Parenthesised type such as `(*T)`.
    Paren,
    /// Constraint union or approximation element such as `~int | string`.
    Union,
}

impl UnsupportedKind {
    pub fn tag(self) -> &'static str {
        match self {
            UnsupportedKind::Paren => "ParenExpr",
            UnsupportedKind::Union => "UnionExpr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Ident(String),
    Qualified {
        package: String,
        name: String,
    },
    Pointer(Box<TypeExpr>),
    /// Slice when `len` is `None`, array otherwise.
    Array {
        len: Option<String>,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Struct(Vec<Field>),
    /// Methods carry one name and a `Func` type; embedded elements no name.
    Interface(Vec<Field>),
    Func(FuncType),
    Variadic(Box<TypeExpr>),
    /// Generic instantiation such as `List[int]`; arguments are not kept.
    Instance(Box<TypeExpr>),
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Unsupported(UnsupportedKind),
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    pub fn slice(elem: TypeExpr) -> Self {
        TypeExpr::Array {
            len: None,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }
}
