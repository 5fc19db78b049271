//! Failure classification.

use std::{fmt, sync::OnceLock};

use regex::Regex;

use crate::{inspector::InspectError, utils::path::display_relative};

/// What went wrong, as far as it could be pinned to a source location.
///
/// `filename` and `line` are empty when the failure text did not carry a
/// location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureInfo {
    pub filename: String,
    pub line: String,
    pub message: String,
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(.+?\.go):(\d+):(?:\d+:)?\s+(.+?)\s*$").expect("static regex")
    })
}

impl FailureInfo {
    /// Classify a compiler or startup excerpt.
    ///
    /// `file.go:line:col: message` and `file.go:line: message` are recognized
    /// on any line of the excerpt; otherwise the whole trimmed text becomes the
    /// message.
    pub fn classify(excerpt: &str) -> Self {
        match location_re().captures(excerpt) {
            Some(caps) => Self {
                filename: caps[1].to_string(),
                line: caps[2].to_string(),
                message: caps[3].to_string(),
            },
            None => Self::unclassified(excerpt.trim()),
        }
    }

    /// A failure without a source location.
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Failure raised by the source inspector. Paths are shown relative to
    /// `root`.
    pub fn from_inspect(err: &InspectError, root: &std::path::Path) -> Self {
        match err {
            InspectError::Parse {
                path,
                line,
                message,
                ..
            } => Self {
                filename: display_relative(path, root),
                line: line.to_string(),
                message: message.clone(),
            },
            InspectError::Read { .. } => Self::unclassified(format!("{err:#}")),
        }
    }

    /// 1-based failing line, 0 when unknown.
    pub fn line_number(&self) -> usize {
        self.line.trim().parse().unwrap_or(0)
    }

    pub fn has_location(&self) -> bool {
        !self.filename.is_empty()
    }
}

impl fmt::Display for FailureInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.filename.is_empty(), self.line.is_empty()) {
            (true, _) => write!(f, "{}", self.message),
            (false, true) => write!(f, "{}: {}", self.filename, self.message),
            (false, false) => write!(f, "{}:{}: {}", self.filename, self.line, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_classify_with_column() {
        let info = FailureInfo::classify("app/server.go:10:5: undefined: Foo");
        assert_eq!(info.filename, "app/server.go");
        assert_eq!(info.line, "10");
        assert_eq!(info.message, "undefined: Foo");
        assert_eq!(info.line_number(), 10);
    }

    #[test]
    fn test_classify_without_column() {
        let info = FailureInfo::classify("./app/controllers/home.go:7: missing return");
        assert_eq!(info.filename, "./app/controllers/home.go");
        assert_eq!(info.line, "7");
        assert_eq!(info.message, "missing return");
    }

    #[test]
    fn test_classify_unmatched() {
        let info = FailureInfo::classify("  cannot find package \"shop/app/controllers\"\n");
        assert!(!info.has_location());
        assert_eq!(info.line_number(), 0);
        assert_eq!(info.message, "cannot find package \"shop/app/controllers\"");
        assert_eq!(info.to_string(), info.message);
    }

    #[test]
    fn test_classify_ignores_log_timestamps() {
        let info = FailureInfo::classify("2024/05/01 10:20:30 listen tcp: address in use");
        assert!(!info.has_location());
    }

    #[test]
    fn test_classify_finds_later_line() {
        let info = FailureInfo::classify("# shop\napp/x.go:3:1: syntax error");
        assert_eq!(info.filename, "app/x.go");
        assert_eq!(info.line, "3");
    }

    #[test]
    fn test_from_parse_error_relative() {
        let err = InspectError::Parse {
            path: PathBuf::from("/p/app/controllers/home.go"),
            line: 4,
            column: 2,
            message: "syntax error: unexpected `{`".into(),
        };
        let info = FailureInfo::from_inspect(&err, Path::new("/p"));
        assert_eq!(info.filename, "app/controllers/home.go");
        assert_eq!(info.line, "4");
        assert_eq!(info.to_string(), "app/controllers/home.go:4: syntax error: unexpected `{`");
    }
}
