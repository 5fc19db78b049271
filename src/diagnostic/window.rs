//! Annotated source excerpt around a failing line.

use std::fmt::Write;

use crate::utils::html;

/// Lines of context shown on each side of the failing line.
pub const CONTEXT_LINES: usize = 5;

/// Inclusive 1-based range of lines to show, `None` when there is nothing
/// to show.
pub fn window(line: usize, total: usize) -> Option<(usize, usize)> {
    if line == 0 || total == 0 {
        return None;
    }
    let start = if line > CONTEXT_LINES + 1 {
        line - CONTEXT_LINES
    } else {
        1
    };
    let end = (line + CONTEXT_LINES).min(total);
    (start <= end).then_some((start, end))
}

/// Render the window of `source` around `line` as an ordered list whose
/// numbering matches the file. The failing line carries `class='err'`.
pub fn render_code(source: &str, line: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let Some((start, end)) = window(line, lines.len()) else {
        return String::new();
    };

    let mut code = if start > 1 {
        format!("<ol start='{start}'>")
    } else {
        "<ol>".to_string()
    };
    for (num, text) in (start..=end).zip(&lines[start - 1..end]) {
        let class = if num == line { " class='err'" } else { "" };
        let _ = write!(code, "<li{class}>{}</li>", html::escape(text));
    }
    code.push_str("</ol>");
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}\n")).collect()
    }

    #[test]
    fn test_window_centered() {
        assert_eq!(window(10, 30), Some((5, 15)));
    }

    #[test]
    fn test_window_near_top_starts_at_one() {
        assert_eq!(window(6, 30), Some((1, 11)));
        assert_eq!(window(7, 30), Some((2, 12)));
        assert_eq!(window(1, 30), Some((1, 6)));
    }

    #[test]
    fn test_window_clamps_at_eof() {
        assert_eq!(window(28, 30), Some((23, 30)));
        assert_eq!(window(30, 30), Some((25, 30)));
    }

    #[test]
    fn test_window_out_of_range() {
        assert_eq!(window(0, 30), None);
        assert_eq!(window(3, 0), None);
        assert_eq!(window(100, 30), None);
    }

    #[test]
    fn test_render_marks_failing_line_once() {
        let code = render_code(&numbered(30), 10);
        assert!(code.starts_with("<ol start='5'>"));
        assert!(code.ends_with("</ol>"));
        assert_eq!(code.matches("<li").count(), 11);
        assert_eq!(code.matches("class='err'").count(), 1);
        assert!(code.contains("<li class='err'>line 10</li>"));
        assert!(code.contains("<li>line 15</li>"));
        assert!(!code.contains("line 16"));
    }

    #[test]
    fn test_render_top_of_file() {
        let code = render_code(&numbered(8), 2);
        assert!(code.starts_with("<ol><li>line 1</li>"));
        assert!(code.contains("<li>line 7</li>"));
        assert!(!code.contains("line 8"));
    }

    #[test]
    fn test_render_escapes_source() {
        let code = render_code("if a < b && c {\n", 1);
        assert_eq!(code, "<ol><li class='err'>if a &lt; b &amp;&amp; c {</li></ol>");
    }
}
