//! JSON renderer: the description tree as-is, for generator templates.

use crate::render::Renderer;
use anyhow::{Context, Result};
use go_annotation::FileDescription;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, desc: &FileDescription) -> Result<String> {
        let mut out = serde_json::to_string_pretty(desc)
            .with_context(|| format!("failed to serialize {}", desc.file_name))?;
        out.push('\n');
        Ok(out)
    }

    /// Several files become one JSON array.
    fn render_all(&self, descs: &[FileDescription]) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(descs).context("failed to serialize descriptions")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
