//! Annotation line grammars.
//!
//! Input lines have already had the comment leader and `@` marker removed,
//! so `// @route GET /users` arrives as `route GET /users`. Both dialects
//! produce at most one [`Annotation`] per name.

pub mod array;
pub mod map;

pub use map::AnnotationError;

use crate::model::{Annotation, AnnotationMode, Annotations};
use std::collections::BTreeMap;

/// Parses marker-stripped comment lines into annotations.
pub trait AnnotationParser {
    fn parse(&self, comments: &[String]) -> Annotations;
}

/// The parser implementing `mode`.
pub fn parser_for(mode: AnnotationMode) -> &'static dyn AnnotationParser {
    match mode {
        AnnotationMode::Array => &array::ArrayParser,
        AnnotationMode::Map => &map::MapParser,
    }
}

/// Parse `comments` with the grammar selected by `mode`.
pub fn parse(comments: &[String], mode: AnnotationMode) -> Annotations {
    parser_for(mode).parse(comments)
}

/// Record one occurrence of `name`. The first occurrence creates the entry;
/// every occurrence with a non-empty attribute map appends it.
fn accumulate(annotations: &mut Annotations, name: &str, attributes: BTreeMap<String, String>) {
    let entry = annotations
        .entry(name.to_string())
        .or_insert_with(|| Annotation::new(name));
    if !attributes.is_empty() {
        entry.attributes.push(attributes);
    }
}
