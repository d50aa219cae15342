//! Description builders: from a syntax tree to the [`crate::model`] tree.
//!
//! Data flows bottom-up: [`types`] renders parameter types, [`comments`]
//! classifies doc lines, [`member`] builds methods, [`record`] and
//! [`interface`] build declarations and [`file`] assembles the result.

pub mod comments;
pub mod file;
pub mod interface;
pub mod member;
pub mod record;
pub mod types;

pub use file::{describe, parse_source};

use crate::annotation;
use crate::model::{AnnotationMode, Declaration, Imports, Member};
use crate::syntax::ast::CommentGroup;

/// Assemble a declaration from its accepted members. Declaration-level
/// annotations come from the declaration's own doc comment only.
fn declaration(
    name: &str,
    doc: Option<&CommentGroup>,
    members: Vec<Member>,
    file_imports: &Imports,
    mode: AnnotationMode,
) -> Declaration {
    let lines = comments::sentinel_lines(doc);
    let mut decl = Declaration {
        name: name.to_string(),
        description: comments::description(name, doc),
        annotations: annotation::parse(&lines, mode),
        comments: lines,
        members,
        imports: Imports::new(),
    };
    decl.imports = used_imports(&decl, file_imports);
    decl
}

/// The subset of `file_imports` referenced by some parameter or result.
fn used_imports(decl: &Declaration, file_imports: &Imports) -> Imports {
    decl.fields()
        .filter_map(|field| {
            file_imports
                .get_key_value(&field.referenced_namespace)
                .map(|(alias, import)| (alias.clone(), import.clone()))
        })
        .collect()
}
