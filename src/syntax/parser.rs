//! Recursive-descent parser over the token stream.
//!
//! Builds nodes for the package clause, imports, type declarations and
//! function signatures. Function bodies, generic type parameter lists and
//! `var`/`const` declarations are skipped by bracket matching.

use super::ast::{
    ChanDir, CommentGroup, Decl, Field, File, FuncDecl, FuncType, Ident, ImportSpec, TypeDecl,
    TypeExpr, TypeSpec, UnsupportedKind,
};
use super::lexer::{self, Token};
use super::token::TokenKind;
use super::{Position, SyntaxError, SyntaxErrorKind};
use tracing::trace;

type PResult<T> = Result<T, SyntaxError>;

/// Parse Go source text into a [`File`].
pub fn parse(source: &str) -> PResult<File> {
    let lexed = lexer::tokenize(source)?;
    Parser {
        tokens: lexed.tokens,
        comments: lexed.comments,
        pos: 0,
    }
    .file()
}

/// Whether a token of this kind can begin a type expression.
fn starts_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Star
            | TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Func
            | TokenKind::Struct
            | TokenKind::Interface
            | TokenKind::Arrow
            | TokenKind::LParen
    )
}

fn unquote(literal: &str) -> String {
    literal[1..literal.len() - 1].to_string()
}

struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    comments: Vec<CommentGroup>,
    pos: usize,
}

impl<'src> Parser<'src> {
    // -- Cursor ---------------------------------------------------------------

    fn peek(&self) -> Token<'src> {
        // The lexer always terminates the stream with `Eof`.
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn bump(&mut self) -> Token<'src> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> PResult<Token<'src>> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> SyntaxError {
        let token = self.peek();
        let kind = match token.kind {
            TokenKind::Eof => SyntaxErrorKind::UnexpectedEof,
            TokenKind::Semicolon if token.text == "\n" => SyntaxErrorKind::UnexpectedToken {
                found: "newline".to_string(),
                expected,
            },
            _ => SyntaxErrorKind::UnexpectedToken {
                found: format!("`{}`", token.text),
                expected,
            },
        };
        SyntaxError::new(kind, token.position)
    }

    fn ident(&mut self) -> PResult<Ident> {
        let token = self.expect(TokenKind::Ident, "identifier")?;
        Ok(Ident {
            name: token.text.to_string(),
            position: token.position,
        })
    }

    fn doc(&self, token: &Token<'_>) -> Option<CommentGroup> {
        token.doc.and_then(|i| self.comments.get(i)).cloned()
    }

    fn skip_semicolons(&mut self) {
        while self.eat(TokenKind::Semicolon) {}
    }

    /// A statement ends with `;`, which may be omitted before `closing`.
    fn expect_terminator(&mut self, closing: TokenKind) -> PResult<()> {
        if self.eat(TokenKind::Semicolon) || self.at(closing) {
            Ok(())
        } else {
            Err(self.unexpected("`;` or newline"))
        }
    }

    /// Skip from the current `open` token past its matching `close`.
    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) -> PResult<()> {
        debug_assert!(self.at(open));
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.bump();
            match token.kind {
                TokenKind::Eof => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnexpectedEof,
                        token.position,
                    ))
                }
                kind if kind == open => depth += 1,
                kind if kind == close => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    /// With `[` at `offset`, decide whether the brackets belong to an array
    /// or slice type (`name [4]int`, `name []int`) rather than a generic
    /// instantiation (`List[int]`).
    fn bracket_then_type(&self, offset: usize) -> bool {
        if self.nth_kind(offset + 1) == TokenKind::RBracket {
            return true;
        }
        let mut depth = 0usize;
        let mut i = offset;
        loop {
            match self.nth_kind(i) {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        return starts_type(self.nth_kind(i + 1));
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
    }

    // -- Declarations ---------------------------------------------------------

    fn file(mut self) -> PResult<File> {
        self.skip_semicolons();
        self.expect(TokenKind::Package, "`package`")?;
        let package = self.ident()?;
        self.expect_terminator(TokenKind::Eof)?;

        let mut imports = Vec::new();
        let mut decls = Vec::new();
        loop {
            self.skip_semicolons();
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Import if decls.is_empty() => self.import_decl(&mut imports)?,
                TokenKind::Type => decls.push(Decl::Type(self.type_decl()?)),
                TokenKind::Func => decls.push(Decl::Func(self.func_decl()?)),
                TokenKind::Var | TokenKind::Const => decls.push(Decl::Value(self.value_decl()?)),
                _ => return Err(self.unexpected("declaration")),
            }
            self.expect_terminator(TokenKind::Eof)?;
        }

        Ok(File {
            package,
            imports,
            decls,
        })
    }

    fn import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> PResult<()> {
        self.bump();
        if !self.eat(TokenKind::LParen) {
            imports.push(self.import_spec()?);
            return Ok(());
        }
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RParen) {
                return Ok(());
            }
            imports.push(self.import_spec()?);
            self.expect_terminator(TokenKind::RParen)?;
        }
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let position = self.peek().position;
        let name = match self.peek_kind() {
            TokenKind::Ident => Some(self.ident()?),
            TokenKind::Dot => {
                let dot = self.bump();
                Some(Ident {
                    name: ".".to_string(),
                    position: dot.position,
                })
            }
            _ => None,
        };
        let path = match self.peek_kind() {
            TokenKind::String | TokenKind::RawString => unquote(self.bump().text),
            _ => return Err(self.unexpected("import path")),
        };
        Ok(ImportSpec {
            name,
            path,
            position,
        })
    }

    fn type_decl(&mut self) -> PResult<TypeDecl> {
        let keyword = self.bump();
        let doc = self.doc(&keyword);

        if !self.eat(TokenKind::LParen) {
            let spec = self.type_spec(None)?;
            return Ok(TypeDecl {
                doc,
                specs: vec![spec],
                grouped: false,
            });
        }

        let mut specs = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RParen) {
                break;
            }
            let spec_doc = self.doc(&self.peek());
            specs.push(self.type_spec(spec_doc)?);
            self.expect_terminator(TokenKind::RParen)?;
        }
        Ok(TypeDecl {
            doc,
            specs,
            grouped: true,
        })
    }

    fn type_spec(&mut self, doc: Option<CommentGroup>) -> PResult<TypeSpec> {
        let name = self.ident()?;
        if self.at(TokenKind::LBracket) && self.at_type_params() {
            self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket)?;
        }
        let alias = self.eat(TokenKind::Assign);
        let ty = self.parse_type()?;
        trace!(name = %name.name, "parsed type spec");
        Ok(TypeSpec {
            doc,
            name,
            alias,
            ty,
        })
    }

    /// `type List[T any]` versus `type Buf [N]byte`.
    fn at_type_params(&self) -> bool {
        self.nth_kind(1) == TokenKind::Ident
            && matches!(
                self.nth_kind(2),
                TokenKind::Ident
                    | TokenKind::Comma
                    | TokenKind::Interface
                    | TokenKind::Tilde
                    | TokenKind::LBracket
                    | TokenKind::Func
                    | TokenKind::Map
                    | TokenKind::Chan
                    | TokenKind::Struct
            )
    }

    fn func_decl(&mut self) -> PResult<FuncDecl> {
        let keyword = self.bump();
        let doc = self.doc(&keyword);
        let recv = if self.at(TokenKind::LParen) {
            Some(self.param_list()?)
        } else {
            None
        };
        let name = self.ident()?;
        if self.at(TokenKind::LBracket) {
            self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket)?;
        }
        let signature = self.signature()?;
        let has_body = self.at(TokenKind::LBrace);
        if has_body {
            self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace)?;
        }
        trace!(name = %name.name, method = recv.is_some(), "parsed func declaration");
        Ok(FuncDecl {
            doc,
            recv,
            name,
            signature,
            has_body,
        })
    }

    fn value_decl(&mut self) -> PResult<Position> {
        let keyword = self.bump();
        if self.at(TokenKind::LParen) {
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
            return Ok(keyword.position);
        }
        // Newlines inside a func literal body insert semicolons too, so only
        // a semicolon at depth zero ends the declaration.
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return Ok(keyword.position),
                TokenKind::Semicolon if depth == 0 => return Ok(keyword.position),
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        return Err(self.unexpected("end of declaration"));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
        }
    }

    // -- Signatures -----------------------------------------------------------

    fn signature(&mut self) -> PResult<FuncType> {
        let params = self.param_list()?;
        let results = self.results()?;
        Ok(FuncType { params, results })
    }

    fn results(&mut self) -> PResult<Vec<Field>> {
        if self.at(TokenKind::LParen) {
            return self.param_list();
        }
        if starts_type(self.peek_kind()) {
            let position = self.peek().position;
            let ty = self.parse_type()?;
            return Ok(vec![Field {
                doc: None,
                names: Vec::new(),
                ty,
                position,
            }]);
        }
        Ok(Vec::new())
    }

    fn param_list(&mut self) -> PResult<Vec<Field>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut entries = Vec::new();
        while !self.at(TokenKind::RParen) {
            entries.push(self.param_entry()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        group_params(entries)
    }

    /// One comma-separated entry: `Type`, `name Type` or `name ...Type`.
    fn param_entry(&mut self) -> PResult<(Option<Ident>, TypeExpr, Position)> {
        let position = self.peek().position;
        if self.eat(TokenKind::Ellipsis) {
            let elem = self.parse_type()?;
            return Ok((None, TypeExpr::Variadic(Box::new(elem)), position));
        }
        if self.at(TokenKind::Ident)
            && self.nth_kind(1) == TokenKind::LBracket
            && self.bracket_then_type(1)
        {
            let name = self.ident()?;
            let ty = self.parse_type()?;
            return Ok((Some(name), ty, position));
        }

        let ty = self.parse_type()?;
        if matches!(self.peek_kind(), TokenKind::Comma | TokenKind::RParen) {
            return Ok((None, ty, position));
        }
        let TypeExpr::Ident(name) = ty else {
            return Err(self.unexpected("`,` or `)`"));
        };
        let ty = if self.eat(TokenKind::Ellipsis) {
            TypeExpr::Variadic(Box::new(self.parse_type()?))
        } else {
            self.parse_type()?
        };
        Ok((Some(Ident { name, position }), ty, position))
    }

    // -- Types ----------------------------------------------------------------

    fn parse_type(&mut self) -> PResult<TypeExpr> {
        let token = self.peek();
        match token.kind {
            TokenKind::Ident => {
                self.bump();
                let base = if self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Ident {
                    self.bump();
                    let name = self.bump();
                    TypeExpr::qualified(token.text, name.text)
                } else {
                    TypeExpr::ident(token.text)
                };
                if self.at(TokenKind::LBracket) && self.nth_kind(1) != TokenKind::RBracket {
                    self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket)?;
                    return Ok(TypeExpr::Instance(Box::new(base)));
                }
                Ok(base)
            }
            TokenKind::Star => {
                self.bump();
                Ok(TypeExpr::pointer(self.parse_type()?))
            }
            TokenKind::LBracket => {
                self.bump();
                let len = if self.eat(TokenKind::RBracket) {
                    None
                } else {
                    Some(self.array_len()?)
                };
                let elem = Box::new(self.parse_type()?);
                Ok(TypeExpr::Array { len, elem })
            }
            TokenKind::Map => {
                self.bump();
                self.expect(TokenKind::LBracket, "`[`")?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket, "`]`")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::map(key, value))
            }
            TokenKind::Chan => {
                self.bump();
                let dir = if self.eat(TokenKind::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = Box::new(self.parse_type()?);
                Ok(TypeExpr::Chan { dir, elem })
            }
            TokenKind::Arrow => {
                self.bump();
                self.expect(TokenKind::Chan, "`chan`")?;
                let elem = Box::new(self.parse_type()?);
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem,
                })
            }
            TokenKind::Func => {
                self.bump();
                Ok(TypeExpr::Func(self.signature()?))
            }
            TokenKind::Struct => {
                self.bump();
                Ok(TypeExpr::Struct(self.struct_fields()?))
            }
            TokenKind::Interface => {
                self.bump();
                Ok(TypeExpr::Interface(self.interface_elems()?))
            }
            TokenKind::LParen => {
                self.bump();
                self.parse_type()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(TypeExpr::Unsupported(UnsupportedKind::Paren))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    /// Array length expression up to the closing `]`, kept as source text.
    fn array_len(&mut self) -> PResult<String> {
        let mut len = String::new();
        let mut depth = 0usize;
        loop {
            let token = self.bump();
            match token.kind {
                TokenKind::Eof => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnexpectedEof,
                        token.position,
                    ))
                }
                TokenKind::RBracket if depth == 0 => return Ok(len),
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => depth -= 1,
                _ => {}
            }
            len.push_str(token.text);
        }
    }

    fn struct_fields(&mut self) -> PResult<Vec<Field>> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RBrace) {
                return Ok(fields);
            }
            let doc = self.doc(&self.peek());
            fields.push(self.struct_field(doc)?);
            self.expect_terminator(TokenKind::RBrace)?;
        }
    }

    fn struct_field(&mut self, doc: Option<CommentGroup>) -> PResult<Field> {
        let position = self.peek().position;
        let embedded = match (self.peek_kind(), self.nth_kind(1)) {
            (TokenKind::Star, _) => true,
            (
                TokenKind::Ident,
                TokenKind::Dot
                | TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::String
                | TokenKind::RawString,
            ) => true,
            (TokenKind::Ident, TokenKind::LBracket) => !self.bracket_then_type(1),
            (TokenKind::Ident, _) => false,
            _ => return Err(self.unexpected("field name or embedded type")),
        };

        let (names, ty) = if embedded {
            (Vec::new(), self.parse_type()?)
        } else {
            let mut names = vec![self.ident()?];
            while self.eat(TokenKind::Comma) {
                names.push(self.ident()?);
            }
            (names, self.parse_type()?)
        };
        // Struct tags carry no type information.
        if matches!(self.peek_kind(), TokenKind::String | TokenKind::RawString) {
            self.bump();
        }
        Ok(Field {
            doc,
            names,
            ty,
            position,
        })
    }

    fn interface_elems(&mut self) -> PResult<Vec<Field>> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut elems = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RBrace) {
                return Ok(elems);
            }
            let first = self.peek();
            let doc = self.doc(&first);
            let elem = if self.at(TokenKind::Ident) && self.nth_kind(1) == TokenKind::LParen {
                let name = self.ident()?;
                let signature = self.signature()?;
                Field {
                    doc,
                    names: vec![name],
                    ty: TypeExpr::Func(signature),
                    position: first.position,
                }
            } else {
                Field {
                    doc,
                    names: Vec::new(),
                    ty: self.constraint_elem()?,
                    position: first.position,
                }
            };
            elems.push(elem);
            self.expect_terminator(TokenKind::RBrace)?;
        }
    }

    /// Embedded interface element: a type, or a `~T | U` constraint union.
    fn constraint_elem(&mut self) -> PResult<TypeExpr> {
        let mut union = self.eat(TokenKind::Tilde);
        let first = self.parse_type()?;
        while self.eat(TokenKind::Pipe) {
            union = true;
            self.eat(TokenKind::Tilde);
            self.parse_type()?;
        }
        Ok(if union {
            TypeExpr::Unsupported(UnsupportedKind::Union)
        } else {
            first
        })
    }
}

/// Apply Go's parameter grouping rule: when any entry is `name Type`, the
/// bare identifiers before it are further names sharing that type;
/// otherwise every entry is an unnamed type.
fn group_params(entries: Vec<(Option<Ident>, TypeExpr, Position)>) -> PResult<Vec<Field>> {
    if entries.iter().all(|(name, _, _)| name.is_none()) {
        return Ok(entries
            .into_iter()
            .map(|(_, ty, position)| Field {
                doc: None,
                names: Vec::new(),
                ty,
                position,
            })
            .collect());
    }

    let mut fields = Vec::new();
    let mut pending: Vec<Ident> = Vec::new();
    for (name, ty, position) in entries {
        match (name, ty) {
            (None, TypeExpr::Ident(name)) => pending.push(Ident { name, position }),
            (None, _) => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::MixedParameters,
                    position,
                ))
            }
            (Some(name), ty) => {
                let mut names = std::mem::take(&mut pending);
                let position = names.first().map_or(position, |n| n.position);
                names.push(name);
                fields.push(Field {
                    doc: None,
                    names,
                    ty,
                    position,
                });
            }
        }
    }
    if let Some(dangling) = pending.first() {
        return Err(SyntaxError::new(
            SyntaxErrorKind::MixedParameters,
            dangling.position,
        ));
    }
    Ok(fields)
}
