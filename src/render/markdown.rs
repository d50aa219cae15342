//! Markdown renderer: a human-readable API summary.

use crate::render::Renderer;
use anyhow::Result;
use go_annotation::model::{Annotations, Declaration, Field, Member};
use go_annotation::FileDescription;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, desc: &FileDescription) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("# {}\n", desc.file_name));
        if desc.fully_qualified_namespace.is_empty() {
            lines.push(format!("Package `{}`\n", desc.declared_namespace));
        } else {
            lines.push(format!(
                "Package `{}` (`{}`)\n",
                desc.declared_namespace, desc.fully_qualified_namespace
            ));
        }

        let sections = desc
            .record_declarations
            .iter()
            .map(|d| ("struct", d))
            .chain(desc.interface_declarations.iter().map(|d| ("interface", d)));
        let sections: Vec<_> = sections.collect();

        lines.push("## Index\n".to_string());
        for (kind, decl) in &sections {
            lines.push(format!("* [{kind} {}](#{})", decl.name, slug(kind, &decl.name)));
        }
        lines.push(String::new());

        for (kind, decl) in &sections {
            render_declaration(&mut lines, kind, decl);
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_declaration(lines: &mut Vec<String>, kind: &str, decl: &Declaration) {
    lines.push(format!("## {kind} {}\n", decl.name));
    if !decl.description.is_empty() {
        lines.push(format!("{}\n", decl.description));
    }
    render_annotations(lines, &decl.annotations);

    if !decl.imports.is_empty() {
        lines.push("#### Imports\n".to_string());
        for (alias, import) in &decl.imports {
            if import.has_explicit_alias {
                lines.push(format!("* `{alias}` `\"{}\"`", import.path));
            } else {
                lines.push(format!("* `\"{}\"`", import.path));
            }
        }
        lines.push(String::new());
    }

    for member in &decl.members {
        render_member(lines, member);
    }
}

fn render_member(lines: &mut Vec<String>, member: &Member) {
    lines.push(format!("### {}\n", member.name));
    if !member.description.is_empty() {
        lines.push(format!("{}\n", member.description));
    }
    lines.push("```go".to_string());
    lines.push(signature(member));
    lines.push("```\n".to_string());
    render_annotations(lines, &member.annotations);
}

fn render_annotations(lines: &mut Vec<String>, annotations: &Annotations) {
    if annotations.is_empty() {
        return;
    }
    lines.push("#### Annotations\n".to_string());
    for annotation in annotations.values() {
        if annotation.attributes.is_empty() {
            lines.push(format!("* `@{}`", annotation.name));
        }
        for attributes in &annotation.attributes {
            let pairs: Vec<String> = attributes
                .iter()
                .map(|(key, value)| format!("{key}={value:?}"))
                .collect();
            lines.push(format!("* `@{}({})`", annotation.name, pairs.join(", ")));
        }
    }
    lines.push(String::new());
}

/// `Name(a int, b string) (int, error)` rebuilt from the fields.
fn signature(member: &Member) -> String {
    let params: Vec<String> = member.parameters.iter().map(entry).collect();
    let mut out = format!("{}({})", member.name, params.join(", "));
    match member.results.as_slice() {
        [] => {}
        [only] if only.name.is_empty() => {
            out.push(' ');
            out.push_str(&only.rendered_type);
        }
        results => {
            let results: Vec<String> = results.iter().map(entry).collect();
            out.push_str(&format!(" ({})", results.join(", ")));
        }
    }
    out
}

fn entry(field: &Field) -> String {
    if field.name.is_empty() {
        field.rendered_type.clone()
    } else {
        format!("{} {}", field.name, field.rendered_type)
    }
}

/// GitHub heading anchor for `## {kind} {name}`.
fn slug(kind: &str, name: &str) -> String {
    format!("{kind} {name}")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect::<String>()
        .replace(' ', "-")
}
