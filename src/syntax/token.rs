//! Token kinds for the Go declaration scanner.

use logos::{Lexer, Logos};

/// The kind of token produced by the lexer.
///
/// Only keywords that shape declarations get their own kind; everything else
/// that can appear inside a function body lexes as `Ident` or `Operator`,
/// since bodies are skipped by brace matching.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("type")]
    Type,
    #[token("func")]
    Func,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("chan")]
    Chan,
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("fallthrough")]
    Fallthrough,

    // ========== Literals ==========
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Ident,

    /// Integer, float, imaginary and hex-float literals, loosely matched.
    #[regex(r"[0-9]([0-9a-zA-Z_.]|[eEpP][+-])*")]
    #[regex(r"\.[0-9]([0-9a-zA-Z_]|[eEpP][+-])*")]
    Number,

    #[token("\"", |lex| scan_quoted(lex, '"'))]
    String,

    #[token("`", scan_raw)]
    RawString,

    #[token("'", |lex| scan_quoted(lex, '\''))]
    Rune,

    // ========== Comments ==========
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", scan_block_comment)]
    BlockComment,

    // ========== Punctuation ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("=")]
    Assign,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,

    /// Any other operator character. Multi-character operators lex as runs.
    #[regex(r"[+\-/%&^<>!:]")]
    Operator,

    #[token("\n")]
    Newline,

    /// End of input (produced by the lexer, not by logos).
    Eof,
}

impl TokenKind {
    /// Whether a newline directly after this token terminates the statement.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::RawString
                | TokenKind::Rune
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Increment
                | TokenKind::Decrement
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// Consume an interpreted string or rune body up to and including `quote`.
/// Fails on a newline or end of input before the closing quote.
fn scan_quoted(lex: &mut Lexer<TokenKind>, quote: char) -> bool {
    let mut escaped = false;
    for (offset, c) in lex.remainder().char_indices() {
        match c {
            '\n' => return false,
            '\\' if !escaped => escaped = true,
            c if c == quote && !escaped => {
                lex.bump(offset + c.len_utf8());
                return true;
            }
            _ => escaped = false,
        }
    }
    false
}

fn scan_raw(lex: &mut Lexer<TokenKind>) -> bool {
    match lex.remainder().find('`') {
        Some(end) => {
            lex.bump(end + 1);
            true
        }
        None => false,
    }
}

fn scan_block_comment(lex: &mut Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}
