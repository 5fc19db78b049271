//! Build runner: compile generated source with the platform toolchain.
//!
//! The toolchain sits behind [`Toolchain`] so the supervisor can be driven
//! without a Go installation.

use std::{
    path::{Path, PathBuf},
    process::Output,
};

use anyhow::Result;

use crate::{
    config::BuildConfig,
    debug,
    utils::exec::{Cmd, combined_output},
};

/// Result of one compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    /// Non-zero exit; `excerpt` is the line handed to classification.
    Failed { excerpt: String },
    /// Non-zero exit with too little output to pick an excerpt from.
    Unclassified { message: String },
}

/// Compiles one generated source file into an executable.
pub trait Toolchain: Send + Sync {
    /// Returns `Err` only when the toolchain could not be run at all.
    fn compile(&self, source: &Path, output: &Path) -> Result<BuildOutcome>;
}

/// `go build -o <output> <source>`, run from the project root.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    command: Vec<String>,
    root: PathBuf,
}

impl GoToolchain {
    pub fn new(config: &BuildConfig, root: &Path) -> Self {
        Self {
            command: config.command.clone(),
            root: root.to_path_buf(),
        }
    }
}

impl Toolchain for GoToolchain {
    fn compile(&self, source: &Path, output: &Path) -> Result<BuildOutcome> {
        let cmd = Cmd::from_slice(&self.command)
            .arg("-o")
            .arg(output)
            .arg(source)
            .cwd(&self.root);
        debug!("build"; "{} -o {} {}", self.command.join(" "), output.display(), source.display());

        let output = cmd.output()?;
        Ok(outcome_of(&output))
    }
}

/// Map a finished toolchain process to a [`BuildOutcome`].
pub fn outcome_of(output: &Output) -> BuildOutcome {
    if output.status.success() {
        return BuildOutcome::Success;
    }
    let text = combined_output(output);
    classify_output(&text, &output.status.to_string())
}

/// The first line of toolchain output names the package (`# shop`), so
/// the second is the first real diagnostic.
pub fn classify_output(text: &str, status: &str) -> BuildOutcome {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() >= 2 {
        return BuildOutcome::Failed {
            excerpt: lines[1].to_string(),
        };
    }
    let trimmed = text.trim();
    BuildOutcome::Unclassified {
        message: if trimmed.is_empty() {
            status.to_string()
        } else {
            trimmed.to_string()
        },
    }
}
