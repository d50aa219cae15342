//! Interface declarations; every element of the body is a member.

use super::declaration;
use super::member::{parse_member, MemberSource};
use crate::error::ParseError;
use crate::model::{AnnotationMode, Declaration, Imports};
use crate::syntax::ast::{CommentGroup, Field, FuncType, TypeExpr};
use tracing::debug;

/// Describe interface `name` from its body `elems`. `Ok(None)` for an empty
/// interface. Embedded elements bind no name and fail with
/// [`ParseError::MissingName`].
pub fn parse_interface(
    name: &str,
    doc: Option<&CommentGroup>,
    elems: &[Field],
    file_imports: &Imports,
    mode: AnnotationMode,
) -> Result<Option<Declaration>, ParseError> {
    if elems.is_empty() {
        return Ok(None);
    }

    let empty = FuncType::default();
    let members = elems
        .iter()
        .map(|elem| {
            let signature = match &elem.ty {
                TypeExpr::Func(signature) => signature,
                _ => &empty,
            };
            parse_member(
                MemberSource {
                    names: &elem.names,
                    signature,
                    doc: elem.doc.as_ref(),
                    position: elem.position,
                },
                mode,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(interface = name, members = members.len(), "parsed interface");
    Ok(Some(declaration(name, doc, members, file_imports, mode)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::Decl;
    use crate::syntax::{parse, Position};
    use pretty_assertions::assert_eq;

    fn interface(source: &str, mode: AnnotationMode) -> Result<Option<Declaration>, ParseError> {
        let file = parse(source).unwrap();
        let Some(Decl::Type(decl)) = file.decls.first() else {
            panic!("expected a type declaration");
        };
        let spec = &decl.specs[0];
        let TypeExpr::Interface(elems) = &spec.ty else {
            panic!("expected an interface");
        };
        parse_interface(
            &spec.name.name,
            decl.doc_for(spec),
            elems,
            &Imports::new(),
            mode,
        )
    }

    #[test]
    fn includes_members_without_annotations() {
        let source = r#"package svc

// Store persists things
// @repository(table="users")
type Store interface {
	// Save writes a row
	Save(ctx context.Context, u *User) error
	Load(id int) (*User, error)
}
"#;
        let decl = interface(source, AnnotationMode::Map).unwrap().unwrap();
        assert_eq!(decl.name, "Store");
        assert_eq!(decl.description, "persists things");
        assert_eq!(decl.annotations["repository"].attributes[0]["table"], "users");
        assert_eq!(decl.members.len(), 2);
        assert_eq!(decl.members[0].description, "writes a row");
        assert!(decl.members.iter().all(|m| m.annotations.is_empty()));
        assert_eq!(decl.members[1].results[0].rendered_type, "*User");
    }

    #[test]
    fn trailing_comment_on_opening_line_leaves_member_docs_intact() {
        let source = "package svc\n\ntype Svc interface { // the service\n\t// @get\n\tGet() error\n}\n";
        let decl = interface(source, AnnotationMode::Array).unwrap().unwrap();
        assert_eq!(decl.members[0].comments, vec!["get"]);
        assert!(decl.members[0].annotations.contains_key("get"));
    }

    #[test]
    fn empty_interface_is_none() {
        let decl = interface("package svc\ntype Any interface{}\n", AnnotationMode::Array);
        assert_eq!(decl, Ok(None));
    }

    #[test]
    fn embedded_element_has_no_name() {
        let source = "package svc\ntype RW interface {\n\tio.Reader\n\tFlush() error\n}\n";
        assert_eq!(
            interface(source, AnnotationMode::Array),
            Err(ParseError::MissingName {
                position: Position::new(3, 2)
            })
        );
    }
}
