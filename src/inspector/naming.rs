//! File name → controller type name.

/// Source file extension of controller files.
pub const SOURCE_EXT: &str = "go";

/// Derive the controller type name from a controller file name.
///
/// `home_controller.go` → `HomeController`, `api.go` → `Api`.
/// Returns `None` when nothing is left after the transform.
pub fn controller_name(file_name: &str) -> Option<String> {
    let stem = file_name
        .strip_suffix(SOURCE_EXT)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(file_name);

    let mut segments = stem.split('_');
    let mut name = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        name.push_str(&capitalize(segment));
    }

    let name = capitalize(&name);
    (!name.is_empty()).then_some(name)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
