//! File-level orchestration.

use super::interface::parse_interface;
use super::record::parse_record;
use crate::error::ParseError;
use crate::model::{AnnotationMode, FileDescription, Import, Imports};
use crate::syntax::ast::{Decl, File, ImportSpec, TypeExpr};
use crate::syntax;
use tracing::debug;

/// Parse Go source text and describe it. `Ok(None)` when the file declares
/// no struct or interface worth describing.
///
/// `fully_qualified_namespace` is left empty; see [`crate::parse_file`] for
/// module resolution.
pub fn parse_source(
    source: &str,
    file_name: &str,
    mode: AnnotationMode,
) -> Result<Option<FileDescription>, ParseError> {
    let file = syntax::parse(source)?;
    describe(&file, file_name, mode)
}

/// Describe an already parsed file.
pub fn describe(
    file: &File,
    file_name: &str,
    mode: AnnotationMode,
) -> Result<Option<FileDescription>, ParseError> {
    let imports = import_table(&file.imports);
    let mut records = Vec::new();
    let mut interfaces = Vec::new();

    for decl in &file.decls {
        let Decl::Type(decl) = decl else {
            continue;
        };
        for spec in &decl.specs {
            let name = spec.name.name.as_str();
            let doc = decl.doc_for(spec);
            match &spec.ty {
                TypeExpr::Struct(_) => {
                    records.extend(parse_record(name, doc, file, &imports, mode)?);
                }
                TypeExpr::Interface(elems) => {
                    interfaces.extend(parse_interface(name, doc, elems, &imports, mode)?);
                }
                _ => {}
            }
        }
    }

    if records.is_empty() && interfaces.is_empty() {
        debug!(file = file_name, "no declarations to describe");
        return Ok(None);
    }
    debug!(
        file = file_name,
        records = records.len(),
        interfaces = interfaces.len(),
        "described file"
    );
    Ok(Some(FileDescription {
        file_name: file_name.to_string(),
        declared_namespace: file.package.name.clone(),
        fully_qualified_namespace: String::new(),
        imports,
        record_declarations: records,
        interface_declarations: interfaces,
    }))
}

/// Every import keyed by the name it is referred to by: the explicit alias,
/// or the last element of the path.
pub fn import_table(specs: &[ImportSpec]) -> Imports {
    specs
        .iter()
        .map(|spec| {
            let alias = match &spec.name {
                Some(name) => name.name.clone(),
                None => spec.path.rsplit('/').next().unwrap_or_default().to_string(),
            };
            let import = Import {
                alias: alias.clone(),
                has_explicit_alias: spec.name.is_some(),
                path: spec.path.clone(),
            };
            (alias, import)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SERVICE: &str = r#"package svc

import (
	"context"
	m "example.com/app/model"
	"fmt"
)

// Users is the user API
// @service users
type Users struct{}

// Get fetches one user
// @get /users
func (u *Users) Get(ctx context.Context, id int) (*m.User, error) {
	return nil, fmt.Errorf("todo")
}

type Cache interface {
	Get(key string) (m.User, bool)
}

type Plain struct{}

type ID int
"#;

    #[test]
    fn describes_records_and_interfaces() {
        let desc = parse_source(SERVICE, "users.go", AnnotationMode::Array)
            .unwrap()
            .unwrap();
        assert_eq!(desc.file_name, "users.go");
        assert_eq!(desc.declared_namespace, "svc");
        assert_eq!(desc.fully_qualified_namespace, "");
        assert_eq!(desc.imports.len(), 3);

        assert_eq!(desc.record_declarations.len(), 1);
        let users = &desc.record_declarations[0];
        assert_eq!(users.description, "is the user API");
        assert_eq!(users.annotations["service"].attributes[0]["0"], "users");
        assert_eq!(
            users.imports.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["context", "m"]
        );

        assert_eq!(desc.interface_declarations.len(), 1);
        let cache = &desc.interface_declarations[0];
        assert_eq!(cache.members[0].results[0].referenced_namespace, "m");
        assert_eq!(cache.imports.keys().map(String::as_str).collect::<Vec<_>>(), vec!["m"]);
    }

    #[test]
    fn import_aliases() {
        let imports = import_table(&syntax::parse(SERVICE).unwrap().imports);
        assert!(!imports["context"].has_explicit_alias);
        assert_eq!(imports["m"].path, "example.com/app/model");
        assert!(imports["m"].has_explicit_alias);
        assert!(!imports.contains_key("model"));
    }

    #[test]
    fn grouped_type_after_trailing_comment_keeps_its_doc() {
        let source = "package svc\n\ntype ( // services\n\t// Svc serves\n\t// @svc\n\tSvc interface {\n\t\tPing() error\n\t}\n)\n";
        let desc = parse_source(source, "svc.go", AnnotationMode::Array)
            .unwrap()
            .unwrap();
        let svc = &desc.interface_declarations[0];
        assert_eq!(svc.comments, vec!["svc"]);
        assert_eq!(svc.description, "serves");
    }

    #[test]
    fn nothing_to_describe_is_none() {
        let source = "package svc\n\ntype Plain struct{}\n\nfunc helper() {}\n";
        assert_eq!(parse_source(source, "plain.go", AnnotationMode::Map), Ok(None));
    }

    #[test]
    fn syntax_errors_propagate() {
        let err = parse_source("package svc\nfunc (\n", "bad.go", AnnotationMode::Array)
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn parsing_is_deterministic() {
        let first = parse_source(SERVICE, "users.go", AnnotationMode::Array).unwrap();
        let second = parse_source(SERVICE, "users.go", AnnotationMode::Array).unwrap();
        assert_eq!(first, second);
    }
}
