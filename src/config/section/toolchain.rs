//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! command = ["go", "build"]   # Invoked as: <command> -o <binary> <server_file>
//! genfiles = ".ego-genfiles"  # Purged and recreated on every cycle
//! binary = "ego-server"
//! server_file = "server.go"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Toolchain and generated-artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildConfig {
    /// Compiler command prefix.
    pub command: Vec<String>,

    /// Hidden working directory for generated artifacts.
    pub genfiles: PathBuf,

    /// Compiled binary file name (inside `genfiles`).
    pub binary: String,

    /// Generated server source file name (inside `genfiles`).
    pub server_file: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: vec!["go".into(), "build".into()],
            genfiles: PathBuf::from(".ego-genfiles"),
            binary: "ego-server".into(),
            server_file: "server.go".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_build_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.command, vec!["go", "build"]);
        assert_eq!(config.build.binary, "ego-server");
    }

    #[test]
    fn test_build_config_custom_command() {
        let config = test_parse_config("[build]\ncommand = [\"go\", \"build\", \"-race\"]");
        assert_eq!(config.build.command.len(), 3);
        assert_eq!(config.build.server_file, "server.go");
    }
}
