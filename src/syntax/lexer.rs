//! Tokenizer: logos token stream plus Go's semicolon insertion and
//! comment grouping.
//!
//! Comments never reach the parser as tokens. Consecutive comments on
//! adjacent lines form a [`CommentGroup`]; a group that ends on the line
//! directly above a token, and does not trail code on its first line, is
//! recorded as that token's lead (doc) comment.

use super::ast::{Comment, CommentGroup};
use super::token::TokenKind;
use super::{Position, SyntaxError, SyntaxErrorKind};
use logos::Logos;

/// A token with its source text and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub position: Position,
    /// Index into [`Lexed::comments`] of the doc comment directly above.
    pub doc: Option<usize>,
}

/// Output of [`tokenize`].
#[derive(Debug, Default)]
pub struct Lexed<'src> {
    /// Code tokens, always terminated by `Eof`.
    pub tokens: Vec<Token<'src>>,
    /// Every comment group in source order.
    pub comments: Vec<CommentGroup>,
}

/// Tokenize Go source text.
pub fn tokenize(source: &str) -> Result<Lexed<'_>, SyntaxError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let index = LineIndex::new(source);
    let mut state = LexState::default();
    let mut lex = TokenKind::lexer(source);

    while let Some(result) = lex.next() {
        let span = lex.span();
        let text = lex.slice();
        let position = index.position(span.start);
        let kind = match result {
            Ok(kind) => kind,
            Err(()) => return Err(classify_error(text, position)),
        };

        match kind {
            TokenKind::Newline => state.newline(position),
            kind if kind.is_comment() => {
                let end_line = index.position(span.end).line;
                state.push_comment(
                    Comment {
                        text: text.trim_end_matches('\r').to_string(),
                        position,
                    },
                    end_line,
                );
                // A block comment spanning lines acts like a newline.
                if kind == TokenKind::BlockComment && text.contains('\n') {
                    state.newline(index.position(span.end));
                }
            }
            _ => {
                let end_line = index.position(span.end).line;
                state.push_code(kind, text, position, end_line);
            }
        }
    }

    let eof = index.position(source.len());
    state.newline(eof);
    state.push_code(TokenKind::Eof, "", eof, eof.line);
    Ok(state.lexed)
}

fn classify_error(text: &str, position: Position) -> SyntaxError {
    let kind = if text.starts_with("/*") {
        SyntaxErrorKind::UnterminatedComment
    } else if text.starts_with(['"', '\'', '`']) {
        SyntaxErrorKind::UnterminatedString
    } else {
        SyntaxErrorKind::UnexpectedChar(text.chars().next().unwrap_or('\0'))
    };
    SyntaxError::new(kind, position)
}

#[derive(Default)]
struct PendingGroup {
    comments: Vec<Comment>,
    end_line: u32,
    /// First comment shares its line with the preceding code token.
    trailing: bool,
}

#[derive(Default)]
struct LexState<'src> {
    lexed: Lexed<'src>,
    pending: Option<PendingGroup>,
    last_kind: Option<TokenKind>,
    last_code_line: Option<u32>,
}

impl<'src> LexState<'src> {
    fn push_code(&mut self, kind: TokenKind, text: &'src str, position: Position, end_line: u32) {
        let doc = self.finish_group(position.line);
        self.lexed.tokens.push(Token {
            kind,
            text,
            position,
            doc,
        });
        self.last_kind = Some(kind);
        self.last_code_line = Some(end_line);
    }

    fn push_comment(&mut self, comment: Comment, end_line: u32) {
        let line = comment.position.line;
        if let Some(group) = self.pending.as_mut().filter(|g| extends(g, line)) {
            group.comments.push(comment);
            group.end_line = end_line;
            return;
        }
        // A blank line, or a trailing group, ends the previous group without
        // attaching it.
        if let Some(group) = self.pending.take() {
            self.lexed.comments.push(CommentGroup {
                comments: group.comments,
            });
        }
        self.pending = Some(PendingGroup {
            comments: vec![comment],
            end_line,
            trailing: self.last_code_line == Some(line),
        });
    }

    fn newline(&mut self, position: Position) {
        if self.last_kind.is_some_and(TokenKind::ends_statement) {
            let doc = self.finish_group(position.line);
            self.lexed.tokens.push(Token {
                kind: TokenKind::Semicolon,
                text: "\n",
                position,
                doc,
            });
            self.last_kind = Some(TokenKind::Semicolon);
        }
    }

    /// Flush the pending group; returns its index when it documents a token
    /// starting on `line`.
    fn finish_group(&mut self, line: u32) -> Option<usize> {
        let group = self.pending.take()?;
        let index = self.lexed.comments.len();
        let is_lead = !group.trailing && group.end_line + 1 == line;
        self.lexed.comments.push(CommentGroup {
            comments: group.comments,
        });
        is_lead.then_some(index)
    }
}

/// Whether a comment starting on `line` joins `group`. A trailing group
/// never extends past its own line.
fn extends(group: &PendingGroup, line: u32) -> bool {
    if group.trailing {
        line <= group.end_line
    } else {
        line <= group.end_line + 1
    }
}

/// Maps byte offsets to line/column positions.
struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    fn new(source: &'src str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self.source[start..offset].chars().count();
        Position::new(line as u32 + 1, column as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(lexed: &Lexed<'_>) -> Vec<TokenKind> {
        lexed.tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn inserts_semicolons_after_line_enders() {
        let lexed = tokenize("package main\nimport \"fmt\"\n").unwrap();
        assert_eq!(
            kinds(&lexed),
            vec![
                TokenKind::Package,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Import,
                TokenKind::String,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn no_semicolon_after_comma() {
        let lexed = tokenize("f(a,\nb)").unwrap();
        assert!(!kinds(&lexed)[..5].contains(&TokenKind::Semicolon));
    }

    #[test]
    fn attaches_adjacent_comment_group_as_doc() {
        let source = "package p\n\n// Service does things\n// @service\ntype Service struct{}\n";
        let lexed = tokenize(source).unwrap();
        let type_token = lexed
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Type)
            .unwrap();
        let doc = &lexed.comments[type_token.doc.unwrap()];
        assert_eq!(doc.comments.len(), 2);
        assert_eq!(doc.comments[1].text, "// @service");
    }

    #[test]
    fn blank_line_detaches_comment() {
        let source = "package p\n\n// floating\n\ntype T int\n";
        let lexed = tokenize(source).unwrap();
        let type_token = lexed
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Type)
            .unwrap();
        assert_eq!(type_token.doc, None);
        assert_eq!(lexed.comments.len(), 1);
    }

    #[test]
    fn trailing_comment_is_not_a_doc() {
        let source = "package p\nvar x int // about x\ntype T int\n";
        let lexed = tokenize(source).unwrap();
        let type_token = lexed
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Type)
            .unwrap();
        assert_eq!(type_token.doc, None);
    }

    #[test]
    fn trailing_comment_after_open_brace_does_not_swallow_next_doc() {
        let source = "package p\ntype S interface { // the service\n\t// @get\n\tGet() error\n}\n";
        let lexed = tokenize(source).unwrap();
        let get = lexed.tokens.iter().find(|t| t.text == "Get").unwrap();
        let doc = &lexed.comments[get.doc.unwrap()];
        let lines: Vec<_> = doc.lines().collect();
        assert_eq!(lines, vec!["// @get"]);
        assert_eq!(lexed.comments.len(), 2);
    }

    #[test]
    fn trailing_comments_on_one_line_stay_together() {
        let lexed = tokenize("package p /* a */ /* b */\ntype T int\n").unwrap();
        assert_eq!(lexed.comments.len(), 1);
        assert_eq!(lexed.comments[0].comments.len(), 2);
        let type_token = lexed
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Type)
            .unwrap();
        assert_eq!(type_token.doc, None);
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        let lexed = tokenize("\u{feff}package p\n").unwrap();
        assert_eq!(lexed.tokens[0].kind, TokenKind::Package);
        assert_eq!(lexed.tokens[0].position, Position::new(1, 1));
    }

    #[test]
    fn reports_positions() {
        let lexed = tokenize("package p\n  type").unwrap();
        let type_token = lexed.tokens[3];
        assert_eq!(type_token.kind, TokenKind::Type);
        assert_eq!(type_token.position, Position::new(2, 3));
    }

    #[test]
    fn strips_carriage_returns_from_comments() {
        let lexed = tokenize("// @a\r\npackage p\r\n").unwrap();
        assert_eq!(lexed.comments[0].comments[0].text, "// @a");
    }

    #[test]
    fn unterminated_comment_is_a_syntax_error() {
        let err = tokenize("package p\n/* open").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedComment);
        assert_eq!(err.position, Position::new(2, 1));
    }

    #[test]
    fn unexpected_character_is_a_syntax_error() {
        let err = tokenize("package p\n@").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedChar('@'));
    }
}
