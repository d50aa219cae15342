//! Member (method) descriptions.

use super::{comments, types};
use crate::annotation;
use crate::error::ParseError;
use crate::model::{AnnotationMode, Member};
use crate::syntax::ast::{CommentGroup, FuncType, Ident};
use crate::syntax::Position;
use tracing::trace;

/// One method as it appears in the tree, before description.
#[derive(Debug, Clone, Copy)]
pub struct MemberSource<'a> {
    /// Identifiers bound by the declaration; exactly one is expected.
    pub names: &'a [Ident],
    pub signature: &'a FuncType,
    pub doc: Option<&'a CommentGroup>,
    pub position: Position,
}

/// Describe one method. Fails unless exactly one name is bound.
pub fn parse_member(source: MemberSource<'_>, mode: AnnotationMode) -> Result<Member, ParseError> {
    let name = match source.names {
        [] => {
            return Err(ParseError::MissingName {
                position: source.position,
            })
        }
        [name] => name.name.as_str(),
        names => {
            return Err(ParseError::AmbiguousName {
                names: names.iter().map(|n| n.name.clone()).collect(),
                position: source.position,
            })
        }
    };

    let lines = comments::sentinel_lines(source.doc);
    let annotations = annotation::parse(&lines, mode);
    trace!(member = name, annotations = annotations.len(), "parsed member");
    Ok(Member {
        name: name.to_string(),
        description: comments::description(name, source.doc),
        comments: lines,
        annotations,
        parameters: types::fields(&source.signature.params),
        results: types::fields(&source.signature.results),
    })
}
