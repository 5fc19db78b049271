//! Source inspector: controller files → [`ActionSet`].
//!
//! Every `.go` file directly inside the controllers directory is parsed on
//! its own; methods whose receiver type matches the name derived from the
//! file name become actions. Files are processed in parallel and the result
//! is assembled in file-name order, so a pass is deterministic.

mod context;
mod error;
mod naming;
mod parse;
mod types;

#[cfg(test)]
mod tests;

pub use error::InspectError;
pub use naming::controller_name;
pub use types::{Action, ActionSet, Field};

use std::{
    fs,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::debug;

/// Run one inspection pass over `dir`.
pub fn inspect(dir: &Path) -> Result<ActionSet, InspectError> {
    let files = controller_files(dir)?;
    debug!("inspect"; "{} controller file(s) in {}", files.len(), dir.display());

    let per_file = files
        .par_iter()
        .map(|(path, controller)| inspect_file(path, controller))
        .collect::<Result<Vec<_>, _>>()?;

    let actions: Vec<Action> = per_file.into_iter().flatten().collect();
    debug!("inspect"; "{} action(s) discovered", actions.len());
    Ok(ActionSet::new(actions))
}

/// Immediate `.go` files of `dir` paired with their controller name,
/// sorted by file name.
fn controller_files(dir: &Path) -> Result<Vec<(PathBuf, String)>, InspectError> {
    let read_err = |source| InspectError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(naming::SOURCE_EXT) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).and_then(controller_name)
        else {
            continue;
        };
        files.push((path, name));
    }

    files.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(files)
}

fn inspect_file(path: &Path, controller: &str) -> Result<Vec<Action>, InspectError> {
    let source = fs::read_to_string(path).map_err(|source| InspectError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse::parse_actions(path, &source, controller)
}
