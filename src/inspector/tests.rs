use super::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

const HOME: &str = r#"package controllers

type HomeController struct{ Base }

func (c HomeController) Index() {
	c.Render(http.Context{Title, Items})
}

func (c HomeController) Show(id int, slug string) {
	c.Render(http.Context{
		UserID,
		SessionID,
	})
}

func (c OtherController) Stray() {}
"#;

const ADMIN: &str = r#"package controllers

type AdminUsers struct{}

func (a AdminUsers) List(page int) {}
"#;

#[test]
fn test_inspect_orders_by_file_then_source() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "home_controller.go", HOME);
    write(dir.path(), "admin_users.go", ADMIN);

    let set = inspect(dir.path()).unwrap();
    let names: Vec<_> = set
        .iter()
        .map(|a| format!("{}.{}", a.controller, a.name))
        .collect();
    assert_eq!(
        names,
        ["AdminUsers.List", "HomeController.Index", "HomeController.Show"]
    );
    assert_eq!(set.controllers(), ["AdminUsers", "HomeController"]);
}

#[test]
fn test_controller_name_matches_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "home_controller.go", HOME);
    write(dir.path(), "admin_users.go", ADMIN);

    let set = inspect(dir.path()).unwrap();
    for action in &set {
        assert!(action.controller == "HomeController" || action.controller == "AdminUsers");
    }
    assert!(set.iter().all(|a| a.name != "Stray"));
}

#[test]
fn test_context_keys_both_forms() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "home_controller.go", HOME);

    let set = inspect(dir.path()).unwrap();
    let actions: Vec<_> = set.iter().collect();
    assert_eq!(
        actions[0].context_keys,
        Some(vec!["Title".to_string(), "Items".to_string()])
    );
    assert_eq!(
        actions[1].context_keys,
        Some(vec!["UserID".to_string(), "SessionID".to_string()])
    );
    assert_eq!(
        actions[1].fields,
        vec![Field::new("id", "int"), Field::new("slug", "string")]
    );
}

#[test]
fn test_non_recursive_and_go_only() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "home_controller.go", HOME);
    write(dir.path(), "notes.txt", "func (c Notes) Hidden() {}");
    fs::create_dir(dir.path().join("nested")).unwrap();
    write(&dir.path().join("nested"), "admin_users.go", ADMIN);

    let set = inspect(dir.path()).unwrap();
    assert!(set.iter().all(|a| a.controller == "HomeController"));
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    assert!(inspect(dir.path()).unwrap().is_empty());
}

#[test]
fn test_missing_directory_is_read_error() {
    let dir = TempDir::new().unwrap();
    let err = inspect(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, InspectError::Read { .. }));
}

#[test]
fn test_parse_error_aborts_pass() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "admin_users.go", ADMIN);
    write(
        dir.path(),
        "home_controller.go",
        "package controllers\n\nfunc (c HomeController) Index( {\n",
    );

    let err = inspect(dir.path()).unwrap_err();
    match err {
        InspectError::Parse { path, .. } => assert!(path.ends_with("home_controller.go")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_action_set_serializes_as_array() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "admin_users.go", ADMIN);

    let json = serde_json::to_value(inspect(dir.path()).unwrap()).unwrap();
    assert_eq!(json[0]["controller"], "AdminUsers");
    assert_eq!(json[0]["fields"][0]["key"], "page");
    assert!(json[0]["context_keys"].is_null());
}
