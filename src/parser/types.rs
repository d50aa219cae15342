//! Type expression rendering and parameter/result field construction.

use crate::model;
use crate::syntax::ast::{self, ChanDir, FuncType, TypeExpr};

/// Canonical text for a type expression.
pub fn render(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Ident(name) => name.clone(),
        TypeExpr::Qualified { package, name } => format!("{package}.{name}"),
        TypeExpr::Pointer(inner) => format!("*{}", render(inner)),
        // Array lengths are not part of the rendered signature.
        TypeExpr::Array { elem, .. } => format!("[]{}", render(elem)),
        TypeExpr::Map { key, value } => format!("map[{}]{}", render(key), render(value)),
        TypeExpr::Struct(fields) => {
            let fields: Vec<String> = fields.iter().flat_map(named_entries).collect();
            format!("struct{{{}}}", fields.join(", "))
        }
        TypeExpr::Interface(elems) if elems.is_empty() => "interface{}".to_string(),
        TypeExpr::Interface(elems) => {
            let elems: Vec<String> = elems.iter().map(interface_elem).collect();
            format!("interface{{{}}}", elems.join("; "))
        }
        TypeExpr::Func(signature) => format!("func{}", render_signature(signature)),
        TypeExpr::Variadic(elem) => format!("...{}", render(elem)),
        TypeExpr::Instance(_) => "IndexExpr".to_string(),
        TypeExpr::Chan { dir, elem } => match dir {
            ChanDir::Both => format!("chan {}", render(elem)),
            ChanDir::Send => format!("chan<- {}", render(elem)),
            ChanDir::Recv => format!("<-chan {}", render(elem)),
        },
        TypeExpr::Unsupported(kind) => kind.tag().to_string(),
    }
}

/// `(params) results` as written after a method name.
pub fn render_signature(signature: &FuncType) -> String {
    let params: Vec<String> = signature.params.iter().flat_map(named_entries).collect();
    let params = format!("({})", params.join(", "));
    match signature.results.as_slice() {
        [] => params,
        [only] if only.names.is_empty() => format!("{params} {}", render(&only.ty)),
        results => {
            let results: Vec<String> = results.iter().flat_map(named_entries).collect();
            format!("{params} ({})", results.join(", "))
        }
    }
}

/// `name type` per bound name, or the bare type for an unnamed entry.
fn named_entries(field: &ast::Field) -> Vec<String> {
    let ty = render(&field.ty);
    if field.names.is_empty() {
        return vec![ty];
    }
    field
        .names
        .iter()
        .map(|name| format!("{} {ty}", name.name))
        .collect()
}

fn interface_elem(elem: &ast::Field) -> String {
    match (elem.names.first(), &elem.ty) {
        (Some(name), TypeExpr::Func(signature)) => {
            format!("{}{}", name.name, render_signature(signature))
        }
        _ => render(&elem.ty),
    }
}

/// Package qualifier at the head of `ty`, looking through one pointer.
pub fn namespace(ty: &TypeExpr) -> &str {
    match ty {
        TypeExpr::Qualified { package, .. } => package.as_str(),
        TypeExpr::Pointer(inner) => match inner.as_ref() {
            TypeExpr::Qualified { package, .. } => package.as_str(),
            _ => "",
        },
        _ => "",
    }
}

/// Describe one parameter or result.
pub fn field(name: &str, ty: &TypeExpr) -> model::Field {
    let rendered_type = render(ty);
    let (base_type, is_pointer) = match rendered_type.strip_prefix('*') {
        Some(base) => (base.to_string(), true),
        None => (rendered_type.clone(), false),
    };
    model::Field {
        name: name.to_string(),
        rendered_type,
        base_type,
        is_pointer,
        referenced_namespace: namespace(ty).to_string(),
    }
}

/// Expand a parameter or result list, one field per bound name.
pub fn fields(list: &[ast::Field]) -> Vec<model::Field> {
    list.iter()
        .flat_map(|entry| {
            if entry.names.is_empty() {
                vec![field("", &entry.ty)]
            } else {
                entry
                    .names
                    .iter()
                    .map(|name| field(&name.name, &entry.ty))
                    .collect()
            }
        })
        .collect()
}
