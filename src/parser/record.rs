//! Struct declarations and the methods attached to them.

use super::member::{parse_member, MemberSource};
use super::{comments, declaration};
use crate::error::ParseError;
use crate::model::{AnnotationMode, Declaration, Imports};
use crate::syntax::ast::{CommentGroup, File, FuncDecl, TypeExpr};
use tracing::{debug, trace};

/// Describe struct `name` from the annotated, exported methods declared on
/// it anywhere in `file`. `Ok(None)` when no method qualifies.
pub fn parse_record(
    name: &str,
    doc: Option<&CommentGroup>,
    file: &File,
    file_imports: &Imports,
    mode: AnnotationMode,
) -> Result<Option<Declaration>, ParseError> {
    let mut members = Vec::new();
    for func in file.funcs() {
        if !is_api_method(func, name)? {
            continue;
        }
        members.push(parse_member(
            MemberSource {
                names: std::slice::from_ref(&func.name),
                signature: &func.signature,
                doc: func.doc.as_ref(),
                position: func.name.position,
            },
            mode,
        )?);
    }

    if members.is_empty() {
        trace!(record = name, "no annotated methods");
        return Ok(None);
    }
    debug!(record = name, members = members.len(), "parsed record");
    Ok(Some(declaration(name, doc, members, file_imports, mode)))
}

/// Exported, bound to `record` and carrying at least one sentinel line.
fn is_api_method(func: &FuncDecl, record: &str) -> Result<bool, ParseError> {
    let Some([receiver]) = func.recv.as_deref() else {
        return Ok(false);
    };
    if receiver_base(&receiver.ty) != Some(record) {
        return Ok(false);
    }
    if receiver.names.len() > 1 {
        return Err(ParseError::AmbiguousName {
            names: receiver.names.iter().map(|n| n.name.clone()).collect(),
            position: receiver.position,
        });
    }
    Ok(is_exported(&func.name.name) && !comments::sentinel_lines(func.doc.as_ref()).is_empty())
}

/// Receiver type name with one `*` and any type arguments removed.
fn receiver_base(ty: &TypeExpr) -> Option<&str> {
    let ty = match ty {
        TypeExpr::Pointer(inner) => inner.as_ref(),
        other => other,
    };
    let ty = match ty {
        TypeExpr::Instance(base) => base.as_ref(),
        other => other,
    };
    match ty {
        TypeExpr::Ident(name) => Some(name.as_str()),
        _ => None,
    }
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
