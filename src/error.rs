//! Error types.
//!
//! [`ParseError`] covers failures inside one source text; [`Error`] adds the
//! I/O and configuration failures around it and always names the path.

use crate::syntax::{Position, SyntaxError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("method name is empty at line {}", .position.line)]
    MissingName { position: Position },

    #[error("method name is not unique at line {}: {}", .position.line, .names.join(", "))]
    AmbiguousName {
        names: Vec<String>,
        position: Position,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("invalid source pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to load config {}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
