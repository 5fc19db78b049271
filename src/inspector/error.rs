use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an inspection pass.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The controllers directory (or one of its files) could not be read.
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A controller file is not valid Go.
    ///
    /// Displays as `file:line:column: message`, the same shape the
    /// compiler uses, so it classifies like a build failure.
    #[error("{}:{line}:{column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
}
