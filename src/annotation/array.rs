//! Token-array dialect: `name attr0 attr1 ...`.

use super::{accumulate, AnnotationParser};
use crate::model::Annotations;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Ordinary and full-width (U+3000) spaces both separate tokens.
static RE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x{3000}]+").unwrap());

pub struct ArrayParser;

impl AnnotationParser for ArrayParser {
    fn parse(&self, comments: &[String]) -> Annotations {
        let mut annotations = Annotations::new();
        for comment in comments {
            let mut tokens = split(comment);
            let Some(name) = tokens.next() else {
                continue;
            };
            let attributes: BTreeMap<String, String> = tokens
                .enumerate()
                .map(|(i, token)| (i.to_string(), token.to_string()))
                .collect();
            accumulate(&mut annotations, name, attributes);
        }
        annotations
    }
}

fn split(comment: &str) -> impl Iterator<Item = &str> {
    RE_SEPARATOR.split(comment).filter(|t| !t.is_empty())
}
