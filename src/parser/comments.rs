//! Doc comment classification: sentinel lines and the description line.

use crate::syntax::ast::CommentGroup;

/// Marks a comment line as carrying an annotation.
pub const SENTINEL: char = '@';

/// Comment text after its `//` leader and following spaces. Block comments
/// never carry annotations.
fn body(line: &str) -> Option<&str> {
    line.strip_prefix("//").map(str::trim_start)
}

/// Lines of `doc` that start with the sentinel, with the leader and the
/// sentinel removed.
pub fn sentinel_lines(doc: Option<&CommentGroup>) -> Vec<String> {
    let Some(doc) = doc else {
        return Vec::new();
    };
    doc.lines()
        .filter_map(body)
        .filter_map(|text| text.strip_prefix(SENTINEL))
        .map(str::to_string)
        .collect()
}

/// Text following `name` on the first line that begins with it, trimmed.
/// Empty when no line does.
pub fn description(name: &str, doc: Option<&CommentGroup>) -> String {
    doc.into_iter()
        .flat_map(CommentGroup::lines)
        .filter_map(body)
        .find_map(|text| text.strip_prefix(name))
        .map(|rest| rest.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::Comment;
    use crate::syntax::Position;

    fn group(lines: &[&str]) -> CommentGroup {
        CommentGroup {
            comments: lines
                .iter()
                .map(|text| Comment {
                    text: text.to_string(),
                    position: Position::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn keeps_only_sentinel_lines_in_order() {
        let doc = group(&[
            "// UserService manages users",
            "// @service(name=\"user\")",
            "// plain prose with an @ inside",
            "//@auth",
            "/* @block */",
        ]);
        assert_eq!(
            sentinel_lines(Some(&doc)),
            vec!["service(name=\"user\")", "auth"]
        );
    }

    #[test]
    fn no_doc_no_lines() {
        assert!(sentinel_lines(None).is_empty());
        assert_eq!(description("X", None), "");
    }

    #[test]
    fn description_uses_first_line_starting_with_name() {
        let doc = group(&[
            "// @get",
            "// GetUser   returns a user  ",
            "// GetUser second line",
        ]);
        assert_eq!(description("GetUser", Some(&doc)), "returns a user");
    }

    #[test]
    fn description_empty_without_matching_line() {
        let doc = group(&["// Something else", "// @x"]);
        assert_eq!(description("GetUser", Some(&doc)), "");
    }

    #[test]
    fn description_is_a_prefix_match() {
        // `GetUsers` starts with `GetUser`, so its remainder is taken.
        let doc = group(&["// GetUsers lists"]);
        assert_eq!(description("GetUser", Some(&doc)), "s lists");
    }
}
