//! `Context{...}` key extraction from raw method text.
//!
//! Works on source text rather than the syntax tree: only the literal
//! `Context{A, B}` idiom (optionally package-qualified, e.g. `http.Context`)
//! is recognised.

use regex::Regex;

/// Extract context keys from the text of one method.
///
/// Tries the single-line form first, then a multi-line form whose entries
/// are separated by `,\n`. Returns `None` when neither matches.
pub fn extract_context_keys(method_src: &str, action: &str) -> Option<Vec<String>> {
    strict_keys(method_src, action).or_else(|| multiline_keys(method_src, action))
}

/// `Show ... Context{UserID, SessionID}` on one line.
fn strict_keys(src: &str, action: &str) -> Option<Vec<String>> {
    let pattern = format!(
        r"{}[\s\S]*?\b(?:\w+\.)?Context\{{([A-Za-z0-9_, ]+)\}}",
        regex::escape(action)
    );
    let captured = first_capture(&pattern, src)?;

    Some(
        captured
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    )
}

/// Entries spread over several lines, each ending in `,\n`.
fn multiline_keys(src: &str, action: &str) -> Option<Vec<String>> {
    let pattern = format!(
        r"{}[\s\S]*?\b(?:\w+\.)?Context\{{([^}}]+)\}}",
        regex::escape(action)
    );
    let captured = first_capture(&pattern, src)?.replace("\r\n", "\n");

    let mut segments: Vec<&str> = captured.split(",\n").collect();
    if segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }

    Some(
        segments
            .into_iter()
            .map(|s| s.trim_matches(|c: char| c.is_whitespace() || c == ','))
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    )
}

fn first_capture(pattern: &str, src: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(src)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_context() {
        let src = "func (c HomeController) Show(id int) {\n\tc.Render(http.Context{UserID, SessionID})\n}";
        assert_eq!(
            extract_context_keys(src, "Show"),
            Some(vec!["UserID".to_string(), "SessionID".to_string()])
        );
    }

    #[test]
    fn test_unqualified_context() {
        let src = "func (c HomeController) Show() { render(Context{UserID}) }";
        assert_eq!(extract_context_keys(src, "Show"), Some(vec!["UserID".to_string()]));
    }

    #[test]
    fn test_multiline_context() {
        let src = "func (c HomeController) Show() {\n\tc.Render(http.Context{\n\t\tUserID,\n\t\tSessionID,\n\t})\n}";
        assert_eq!(
            extract_context_keys(src, "Show"),
            Some(vec!["UserID".to_string(), "SessionID".to_string()])
        );
    }

    #[test]
    fn test_multiline_context_crlf() {
        let src = "func (c C) Show() {\r\n\tr(Context{\r\n\t\tA,\r\n\t\tB,\r\n\t})\r\n}";
        assert_eq!(
            extract_context_keys(src, "Show"),
            Some(vec!["A".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn test_first_match_wins() {
        let src = "func (c C) Show() {\n\ta(Context{First})\n\tb(Context{Second})\n}";
        assert_eq!(extract_context_keys(src, "Show"), Some(vec!["First".to_string()]));
    }

    #[test]
    fn test_similar_type_not_matched() {
        let src = "func (c C) Show() { x := MyContext{A} }";
        assert_eq!(extract_context_keys(src, "Show"), None);
    }

    #[test]
    fn test_no_context() {
        let src = "func (c HomeController) Index() {\n\treturn\n}";
        assert_eq!(extract_context_keys(src, "Index"), None);
    }

    #[test]
    fn test_name_must_precede_context() {
        let src = "func (c C) Index() { Context{A} }";
        assert_eq!(extract_context_keys(src, "Show"), None);
    }
}
