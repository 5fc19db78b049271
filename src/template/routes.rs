//! Go route registrations for the generated server.

use std::fmt::Write;

use rustc_hash::FxHashSet;

use crate::inspector::{Action, ActionSet, Field};

/// URL segment for a controller: `HomeController` → `home`.
pub fn controller_segment(controller: &str) -> String {
    let base = controller.strip_suffix("Controller").unwrap_or(controller);
    let base = if base.is_empty() { controller } else { base };
    base.to_ascii_lowercase()
}

/// Paths an action is served under. `Index` also answers the bare
/// controller path, and `HomeController.Index` answers `/`.
pub fn action_paths(action: &Action) -> Vec<String> {
    let segment = controller_segment(&action.controller);
    let mut paths = vec![format!("/{}/{}", segment, action.name.to_ascii_lowercase())];
    if action.name == "Index" {
        paths.push(format!("/{segment}"));
        if segment == "home" {
            paths.push("/".to_string());
        }
    }
    paths
}

/// Render every `mux.HandleFunc` block, one per distinct path.
pub fn render_routes(actions: &ActionSet) -> String {
    let mut seen = FxHashSet::default();
    let mut out = String::new();

    for action in actions {
        let call = render_call(action);
        for path in action_paths(action) {
            if !seen.insert(path.clone()) {
                continue;
            }
            // "/" is a subtree pattern in net/http; keep it exact.
            let guard = if path == "/" {
                "\t\tif r.URL.Path != \"/\" {\n\t\t\thttp.NotFound(w, r)\n\t\t\treturn\n\t\t}\n"
            } else {
                ""
            };
            let _ = write!(
                out,
                "\tmux.HandleFunc({:?}, func(w http.ResponseWriter, r *http.Request) {{\n{guard}{call}\t}})\n",
                path
            );
        }
    }
    out
}

fn render_call(action: &Action) -> String {
    let mut out = String::new();
    if let Some(keys) = &action.context_keys {
        let _ = writeln!(out, "\t\t// context: {}", keys.join(", "));
    }
    let args: Vec<String> = action.fields.iter().filter_map(argument).collect();
    let _ = writeln!(
        out,
        "\t\tcontrollers.{}{{}}.{}({})",
        action.controller,
        action.name,
        args.join(", ")
    );
    out
}

/// Go expression passed for one parameter. Variadic parameters are left
/// empty.
fn argument(field: &Field) -> Option<String> {
    let key = &field.key;
    let expr = match field.value.as_str() {
        ty if ty.starts_with("...") => return None,
        "string" => format!("r.FormValue({key:?})"),
        "int" => format!("formInt(r, {key:?})"),
        "int64" => format!("formInt64(r, {key:?})"),
        "bool" => format!("formBool(r, {key:?})"),
        "float64" => format!("formFloat64(r, {key:?})"),
        "http.ResponseWriter" => "w".to_string(),
        "*http.Request" => "r".to_string(),
        ty => format!("*new({ty})"),
    };
    Some(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(controller: &str, name: &str, fields: Vec<Field>) -> Action {
        Action {
            controller: controller.into(),
            name: name.into(),
            fields,
            context_keys: None,
        }
    }

    #[test]
    fn test_controller_segment() {
        assert_eq!(controller_segment("HomeController"), "home");
        assert_eq!(controller_segment("AdminUsers"), "adminusers");
        assert_eq!(controller_segment("Controller"), "controller");
    }

    #[test]
    fn test_index_paths() {
        let paths = action_paths(&action("HomeController", "Index", vec![]));
        assert_eq!(paths, ["/home/index", "/home", "/"]);
        let paths = action_paths(&action("Api", "Show", vec![]));
        assert_eq!(paths, ["/api/show"]);
    }

    #[test]
    fn test_arguments_by_type() {
        let fields = vec![
            Field::new("id", "int"),
            Field::new("q", "string"),
            Field::new("w", "http.ResponseWriter"),
            Field::new("when", "time.Time"),
            Field::new("rest", "...string"),
        ];
        let args: Vec<_> = fields.iter().filter_map(argument).collect();
        assert_eq!(
            args,
            [
                "formInt(r, \"id\")",
                "r.FormValue(\"q\")",
                "w",
                "*new(time.Time)"
            ]
        );
    }

    #[test]
    fn test_duplicate_paths_registered_once() {
        let set = ActionSet::new(vec![
            action("HomeController", "Index", vec![]),
            action("Home", "Index", vec![]),
        ]);
        let routes = render_routes(&set);
        assert_eq!(routes.matches("mux.HandleFunc(\"/home\",").count(), 1);
        assert_eq!(routes.matches("mux.HandleFunc(\"/\",").count(), 1);
        assert!(routes.contains("controllers.HomeController{}.Index()"));
    }

    #[test]
    fn test_context_hint_comment() {
        let mut show = action("HomeController", "Show", vec![Field::new("id", "int")]);
        show.context_keys = Some(vec!["UserID".into(), "SessionID".into()]);
        let routes = render_routes(&ActionSet::new(vec![show]));
        assert!(routes.contains("// context: UserID, SessionID"));
        assert!(routes.contains("controllers.HomeController{}.Show(formInt(r, \"id\"))"));
    }
}
