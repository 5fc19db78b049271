//! Syntax-tree walk over one controller file.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use super::context::extract_context_keys;
use super::error::InspectError;
use super::types::{Action, Field};

/// Parse `source` and collect every method whose receiver type is
/// textually `controller`.
pub fn parse_actions(path: &Path, source: &str, controller: &str) -> Result<Vec<Action>, InspectError> {
    let tree = parse_go(path, source)?;
    let root = tree.root_node();
    let bytes = source.as_bytes();

    let mut actions = Vec::new();
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        if node.kind() != "method_declaration" {
            continue;
        }
        if receiver_type(node, bytes) != Some(controller) {
            continue;
        }
        let Some(name) = node.child_by_field_name("name").and_then(|n| text(n, bytes)) else {
            continue;
        };

        let method_src = text(node, bytes).unwrap_or_default();
        actions.push(Action {
            controller: controller.to_string(),
            name: name.to_string(),
            fields: parameters(node, bytes),
            context_keys: extract_context_keys(method_src, name),
        });
    }

    Ok(actions)
}

fn parse_go(path: &Path, source: &str) -> Result<Tree, InspectError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| parse_error(path, 1, 1, format!("parser initialization failed: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| parse_error(path, 1, 1, "failed to parse source".into()))?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, column, message) = match first_error(root) {
            Some(node) => {
                let pos = node.start_position();
                (pos.row + 1, pos.column + 1, describe_error(node, source.as_bytes()))
            }
            None => (1, 1, "syntax error".to_string()),
        };
        return Err(parse_error(path, line, column, message));
    }

    Ok(tree)
}

fn parse_error(path: &Path, line: usize, column: usize, message: String) -> InspectError {
    InspectError::Parse {
        path: path.to_path_buf(),
        line,
        column,
        message,
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error()
            && let Some(found) = first_error(child)
        {
            return Some(found);
        }
    }
    None
}

fn describe_error(node: Node<'_>, bytes: &[u8]) -> String {
    if node.is_missing() {
        return format!("syntax error: missing `{}`", node.kind());
    }
    let snippet = text(node, bytes)
        .and_then(|t| t.lines().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or_default();
    if snippet.is_empty() {
        "syntax error".to_string()
    } else {
        format!("syntax error: unexpected `{}`", truncate(snippet, 40))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Declared type of the first receiver parameter, as written.
fn receiver_type<'a>(method: Node<'_>, bytes: &'a [u8]) -> Option<&'a str> {
    let receiver = method.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    let decl = receiver
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")?;
    decl.child_by_field_name("type").and_then(|t| text(t, bytes))
}

/// Parameters in declaration order; `a, b int` yields two fields.
fn parameters(method: Node<'_>, bytes: &[u8]) -> Vec<Field> {
    let Some(list) = method.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        let variadic = match decl.kind() {
            "parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };

        let ty = decl
            .child_by_field_name("type")
            .and_then(|t| text(t, bytes))
            .unwrap_or_default();
        let ty = if variadic { format!("...{ty}") } else { ty.to_string() };

        let mut name_cursor = decl.walk();
        let names: Vec<&str> = decl
            .children_by_field_name("name", &mut name_cursor)
            .filter_map(|n| text(n, bytes))
            .collect();

        if names.is_empty() {
            fields.push(Field::new("", ty));
        } else {
            fields.extend(names.into_iter().map(|name| Field::new(name, ty.clone())));
        }
    }
    fields
}

fn text<'a>(node: Node<'_>, bytes: &'a [u8]) -> Option<&'a str> {
    std::str::from_utf8(bytes.get(node.byte_range())?).ok()
}
