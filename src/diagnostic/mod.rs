//! Error diagnostic renderer.
//!
//! Turns a [`FailureInfo`] into the source of a stand-in server that answers
//! every request with the failure and the offending source lines.

mod failure;
mod window;

pub use failure::FailureInfo;
pub use window::render_code;

use std::{fs, path::Path};

use crate::{
    debug,
    template::{DiagnosticVars, TemplateRenderer},
};

/// Template inputs for `failure`. Relative file names are resolved against
/// `root`; an unreadable file leaves the code block empty.
pub fn diagnostic_vars(failure: &FailureInfo, root: &Path, port: u16) -> DiagnosticVars {
    DiagnosticVars {
        message: failure.message.clone(),
        filename: failure.filename.clone(),
        line: failure.line.clone(),
        code: code_block(failure, root),
        port,
    }
}

/// Generated Go source of the diagnostic server.
pub fn render(
    failure: &FailureInfo,
    root: &Path,
    port: u16,
    renderer: &dyn TemplateRenderer,
) -> String {
    renderer.render_diagnostic(&diagnostic_vars(failure, root, port))
}

fn code_block(failure: &FailureInfo, root: &Path) -> String {
    if !failure.has_location() {
        return String::new();
    }
    let path = root.join(&failure.filename);
    match fs::read_to_string(&path) {
        Ok(source) => render_code(&source, failure.line_number()),
        Err(err) => {
            debug!("diagnostic"; "cannot read {}: {}", path.display(), err);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::EmbeddedTemplates;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        let source: String = (1..=30).map(|i| format!("// line {i}\n")).collect();
        fs::write(dir.path().join("app/server.go"), source).unwrap();
        dir
    }

    #[test]
    fn test_vars_from_compiler_error() {
        let dir = project();
        let failure = FailureInfo::classify("app/server.go:10:5: undefined: Foo");
        let vars = diagnostic_vars(&failure, dir.path(), 5000);

        assert_eq!(vars.filename, "app/server.go");
        assert_eq!(vars.line, "10");
        assert_eq!(vars.message, "undefined: Foo");
        assert!(vars.code.starts_with("<ol start='5'>"));
        assert!(vars.code.contains("<li class='err'>// line 10</li>"));
        assert!(vars.code.contains("<li>// line 15</li>"));
    }

    #[test]
    fn test_absolute_filename() {
        let dir = project();
        let abs = dir.path().join("app/server.go");
        let failure = FailureInfo::classify(&format!("{}:2:1: oops", abs.display()));
        let vars = diagnostic_vars(&failure, Path::new("/nowhere"), 5000);
        assert!(vars.code.starts_with("<ol><li>// line 1</li>"));
    }

    #[test]
    fn test_missing_file_or_location() {
        let dir = project();
        let vars = diagnostic_vars(
            &FailureInfo::classify("app/gone.go:3:1: x"),
            dir.path(),
            5000,
        );
        assert!(vars.code.is_empty());

        let vars = diagnostic_vars(&FailureInfo::unclassified("exit status 2"), dir.path(), 5000);
        assert!(vars.code.is_empty());
        assert_eq!(vars.message, "exit status 2");
    }

    #[test]
    fn test_render_produces_go_source() {
        let dir = project();
        let source = render(
            &FailureInfo::classify("app/server.go:10:5: undefined: Foo"),
            dir.path(),
            5000,
            &EmbeddedTemplates,
        );
        assert!(source.starts_with("// Code generated by ego"));
        assert!(source.contains("const page = \""));
        assert!(source.contains("undefined: Foo"));
    }
}
