//! Description tree produced by a parse, format-agnostic.
//!
//! Every value is built once per file and never mutated afterwards. Maps
//! are `BTreeMap` so serialised output is stable across runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Annotation name to annotation, at most one entry per name.
pub type Annotations = BTreeMap<String, Annotation>;

/// Import alias to import.
pub type Imports = BTreeMap<String, Import>;

/// Which annotation line grammar to apply.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationMode {
    /// `@name a b c`: whitespace-separated positional attributes.
    #[default]
    Array,
    /// `@name(key="value", ...)`: named attributes.
    Map,
}

impl fmt::Display for AnnotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnnotationMode::Array => "array",
            AnnotationMode::Map => "map",
        })
    }
}

/// One parsed `@` annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    /// One attribute map per occurrence that carried attributes, in
    /// encounter order.
    pub attributes: Vec<BTreeMap<String, String>>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }
}

/// A parameter or result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Empty for unnamed parameters and results.
    pub name: String,
    /// Full type, e.g. `*pkg.Type`.
    pub rendered_type: String,
    /// `rendered_type` without one leading `*`.
    pub base_type: String,
    pub is_pointer: bool,
    /// Package qualifier of the type's head, empty for builtins, local
    /// types and anonymous composites.
    pub referenced_namespace: String,
}

/// A method of a record or interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub description: String,
    /// Sentinel lines with the marker stripped, in source order.
    pub comments: Vec<String>,
    pub annotations: Annotations,
    pub parameters: Vec<Field>,
    pub results: Vec<Field>,
}

/// A struct or interface with its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub description: String,
    pub comments: Vec<String>,
    pub annotations: Annotations,
    pub members: Vec<Member>,
    /// Only the imports some member's parameter or result refers to.
    pub imports: Imports,
}

impl Declaration {
    /// All parameters and results across members, in order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members
            .iter()
            .flat_map(|m| m.parameters.iter().chain(m.results.iter()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Explicit alias, or the last segment of the path.
    pub alias: String,
    pub has_explicit_alias: bool,
    pub path: String,
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescription {
    pub file_name: String,
    /// The file's `package` clause.
    pub declared_namespace: String,
    /// Module path plus package directory, empty when unresolved.
    pub fully_qualified_namespace: String,
    /// The complete import table.
    pub imports: Imports,
    pub record_declarations: Vec<Declaration>,
    pub interface_declarations: Vec<Declaration>,
}

impl FileDescription {
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.record_declarations
            .iter()
            .chain(self.interface_declarations.iter())
    }
}
