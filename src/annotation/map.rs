//! Key-value dialect: `name(key="value", other=value)` or a bare `name`.

use super::{accumulate, AnnotationParser};
use crate::model::{Annotation, Annotations};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("malformed annotation body in {line:?}: {reason}")]
    MalformedBody { line: String, reason: &'static str },
}

pub struct MapParser;

impl AnnotationParser for MapParser {
    fn parse(&self, comments: &[String]) -> Annotations {
        let mut annotations = Annotations::new();
        for comment in comments {
            match parse_line(comment) {
                Ok(Line::Bare(name)) => {
                    // A bare name always replaces any earlier entry.
                    annotations.insert(name.to_string(), Annotation::new(name));
                }
                Ok(Line::Call { name, attributes }) => {
                    accumulate(&mut annotations, name, attributes);
                }
                Err(err) => warn!("dropping annotation: {err}"),
            }
        }
        annotations
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Bare(&'a str),
    Call {
        name: &'a str,
        attributes: BTreeMap<String, String>,
    },
}

fn parse_line(comment: &str) -> Result<Line<'_>, AnnotationError> {
    let Some(open) = comment.find('(') else {
        return Ok(Line::Bare(comment));
    };
    let close = match comment.rfind(')') {
        Some(close) if close > open => close,
        _ => {
            return Err(AnnotationError::MalformedBody {
                line: comment.to_string(),
                reason: "missing closing `)`",
            })
        }
    };

    let attributes = comment[open + 1..close]
        .split(',')
        .filter_map(parse_item)
        .collect();
    Ok(Line::Call {
        name: &comment[..open],
        attributes,
    })
}

/// `key = "value"`; anything without exactly one `=` is dropped.
fn parse_item(item: &str) -> Option<(String, String)> {
    let mut parts = item.split('=');
    let (key, value) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let value = value.trim();
    let value = match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(unquoted) => unquoted,
        None => value,
    };
    Some((key.trim().to_string(), value.to_string()))
}
