//! Output formats for file descriptions.

pub mod json;
pub mod markdown;

use anyhow::{anyhow, Result};
use go_annotation::FileDescription;

/// Renders descriptions into a specific output format.
pub trait Renderer {
    fn render(&self, desc: &FileDescription) -> Result<String>;

    /// Render several files into one document.
    fn render_all(&self, descs: &[FileDescription]) -> Result<String> {
        let mut out = String::new();
        for desc in descs {
            out.push_str(&self.render(desc)?);
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use json or markdown", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats() {
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
        assert_eq!(create_renderer("md").unwrap().file_extension(), "md");
        assert!(create_renderer("html").is_err());
    }
}
