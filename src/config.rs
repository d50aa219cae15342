//! YAML configuration shared with the code generator.

use crate::error::{Error, Result};
use crate::model::AnnotationMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tool configuration. Every field is optional; command-line arguments
/// take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Directory, file or glob of Go sources to scan.
    #[serde(rename = "servicePath")]
    pub source_path: Option<String>,
    /// Output directory for generated descriptions.
    pub gen_file_path: Option<PathBuf>,
    /// Prefix template prepended to every output file.
    pub template_file: Option<PathBuf>,
    /// Annotation dialect; `array` when omitted.
    pub annotation_mode: Option<AnnotationMode>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserialises as unit, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}
