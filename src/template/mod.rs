//! Template renderer seam.
//!
//! The supervisor only needs "values in, Go source out". [`TemplateRenderer`]
//! is that contract; [`EmbeddedTemplates`] is the built-in implementation
//! backed by the files in `template/files/`.
//!
//! ```ignore
//! let source = EmbeddedTemplates.render_server(&ServerVars {
//!     app_name: "shop".into(),
//!     controllers_import: "shop/app/controllers".into(),
//!     actions,
//!     port: 5000,
//! });
//! ```

mod engine;
mod routes;

use engine::{Template, TemplateVars, go_string};

use crate::{inspector::ActionSet, utils::html};

/// Inputs of the normal server skeleton.
#[derive(Debug, Clone)]
pub struct ServerVars {
    pub app_name: String,
    /// Go import path of the controllers package.
    pub controllers_import: String,
    pub actions: ActionSet,
    /// Default for the `-port` flag.
    pub port: u16,
}

/// Inputs of the diagnostic stand-in server.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticVars {
    pub message: String,
    pub filename: String,
    pub line: String,
    /// Rendered `<ol>` block, already HTML.
    pub code: String,
    pub port: u16,
}

/// Turns generation inputs into Go source text.
pub trait TemplateRenderer: Send + Sync {
    fn render_server(&self, vars: &ServerVars) -> String;
    fn render_diagnostic(&self, vars: &DiagnosticVars) -> String;
}

/// Templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

const SERVER_GO: Template<ServerVars> = Template::new(include_str!("files/server.go.tmpl"));
const DIAGNOSTIC_GO: Template<DiagnosticSource> =
    Template::new(include_str!("files/diagnostic.go.tmpl"));
const DIAGNOSTIC_HTML: Template<DiagnosticVars> =
    Template::new(include_str!("files/diagnostic.html"));

impl TemplateVars for ServerVars {
    fn apply(&self, content: &str) -> String {
        // A blank import keeps an empty controllers package compiling.
        let import = if self.actions.is_empty() {
            format!("\t_ {}", go_string(&self.controllers_import))
        } else {
            format!("\t{}", go_string(&self.controllers_import))
        };
        content
            .replace("__EGO_IMPORT__", &import)
            .replace("__EGO_APP_NAME__", &go_string(&self.app_name))
            .replace("__EGO_PORT__", &self.port.to_string())
            .replace("__EGO_ROUTES__", &routes::render_routes(&self.actions))
    }
}

impl TemplateVars for DiagnosticVars {
    fn apply(&self, content: &str) -> String {
        content
            .replace("__EGO_CODE__", &self.code)
            .replace("__EGO_MESSAGE__", &html::escape(&self.message))
            .replace("__EGO_FILENAME__", &html::escape(&self.filename))
            .replace("__EGO_LINE__", &html::escape(&self.line))
    }
}

/// The diagnostic page embedded into the stand-in server.
struct DiagnosticSource {
    page: String,
    port: u16,
}

impl TemplateVars for DiagnosticSource {
    fn apply(&self, content: &str) -> String {
        content
            .replace("__EGO_PORT__", &self.port.to_string())
            .replace("__EGO_PAGE__", &go_string(&self.page))
    }
}

impl TemplateRenderer for EmbeddedTemplates {
    fn render_server(&self, vars: &ServerVars) -> String {
        SERVER_GO.render(vars)
    }

    fn render_diagnostic(&self, vars: &DiagnosticVars) -> String {
        let page = DIAGNOSTIC_HTML.render(vars);
        DIAGNOSTIC_GO.render(&DiagnosticSource {
            page,
            port: vars.port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::{Action, Field};

    fn server_vars(actions: Vec<Action>) -> ServerVars {
        ServerVars {
            app_name: "shop".into(),
            controllers_import: "shop/app/controllers".into(),
            actions: ActionSet::new(actions),
            port: 5000,
        }
    }

    #[test]
    fn test_server_has_no_placeholders_left() {
        let source = EmbeddedTemplates.render_server(&server_vars(vec![Action {
            controller: "HomeController".into(),
            name: "Show".into(),
            fields: vec![Field::new("id", "int")],
            context_keys: None,
        }]));
        assert!(!source.contains("__EGO_"));
        assert!(source.contains("\t\"shop/app/controllers\""));
        assert!(source.contains("const appName = \"shop\""));
        assert!(source.contains("flag.Int(\"port\", 5000,"));
        assert!(source.contains("mux.HandleFunc(\"/home/show\""));
    }

    #[test]
    fn test_empty_action_set_uses_blank_import() {
        let source = EmbeddedTemplates.render_server(&server_vars(vec![]));
        assert!(source.contains("\t_ \"shop/app/controllers\""));
        assert!(!source.contains("mux.HandleFunc"));
    }

    #[test]
    fn test_diagnostic_embeds_escaped_page() {
        let source = EmbeddedTemplates.render_diagnostic(&DiagnosticVars {
            message: "undefined: <Foo>".into(),
            filename: "app/server.go".into(),
            line: "10".into(),
            code: "<ol start='5'><li class='err'>x</li></ol>".into(),
            port: 5000,
        });
        assert!(!source.contains("__EGO_"));
        assert!(source.contains("flag.Int(\"port\", 5000,"));
        assert!(source.contains("undefined: &lt;Foo&gt;"));
        assert!(source.contains("app/server.go:10"));
        assert!(source.contains("<li class='err'>x</li>"));
        // The page sits on one line inside a Go string literal.
        let page_line = source.lines().find(|l| l.starts_with("const page = ")).unwrap();
        assert!(page_line.ends_with('"'));
    }
}
