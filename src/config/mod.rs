//! Project configuration management for `ego.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [app], [serve], [build], [watch]
//! ├── types/         # ConfigError, global handle
//! ├── layout.rs      # Absolute paths derived from the sections
//! └── mod.rs         # DevConfig (this file)
//! ```
//!
//! The file is optional: without it every section uses its defaults and the
//! project root is the current directory.

pub mod layout;
pub mod section;
pub mod types;
mod util;

pub use layout::Layout;
pub use section::{AppConfig, BuildConfig, ServeConfig, WatchConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::{
    cli::{Cli, Commands, ServeArgs},
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{dir_name, find_config_file};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing ego.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory
    #[serde(skip)]
    pub root: PathBuf,

    /// Application layout
    #[serde(default)]
    pub app: AppConfig,

    /// Proxy and backend ports
    #[serde(default)]
    pub serve: ServeConfig,

    /// Toolchain and generated artifacts
    #[serde(default)]
    pub build: BuildConfig,

    /// Watcher settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl DevConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Without one, the
    /// current directory is the project root and defaults apply.
    pub fn load(cli: &Cli) -> Result<Self> {
        crate::logger::set_verbose(cli.verbose);

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => {
                let mut config = Self::default();
                config.root =
                    std::env::current_dir().context("Failed to get current working directory")?;
                config
            }
        };

        config.root = crate::utils::path::normalize_path(&config.root);
        if config.app.name.is_empty() {
            config.app.name = dir_name(&config.root);
        }

        if let Commands::Serve { args } = &cli.command {
            config.apply_serve_args(args);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored): {}", display_path, fields.join(", "));
    }

    /// Apply serve-specific CLI overrides.
    fn apply_serve_args(&mut self, args: &ServeArgs) {
        Self::update_option(&mut self.serve.interface, args.interface.as_ref());
        Self::update_option(&mut self.serve.port, args.port.as_ref());
        Self::update_option(&mut self.serve.backend_port, args.backend_port.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every configured path against the project root.
    pub fn layout(&self) -> Layout {
        let root = &self.root;
        let genfiles = root.join(&self.build.genfiles);
        Layout {
            root: root.clone(),
            controllers: root.join(&self.app.controllers),
            source: root.join(&self.app.source),
            assets: root.join(&self.app.assets),
            config: root.join(&self.app.config),
            binary: genfiles.join(&self.build.binary),
            server_file: genfiles.join(&self.build.server_file),
            genfiles,
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.serve.port == 0 || self.serve.backend_port == 0 {
            bail!(ConfigError::Validation("ports must be non-zero".into()));
        }
        if self.serve.port == self.serve.backend_port {
            bail!(ConfigError::Validation(format!(
                "serve.port and serve.backend_port are both {}",
                self.serve.port
            )));
        }
        if self.build.command.first().is_none_or(|c| c.trim().is_empty()) {
            bail!(ConfigError::Validation("build.command is empty".into()));
        }
        if self.build.genfiles.as_os_str().is_empty() || self.build.genfiles.is_absolute() {
            bail!(ConfigError::Validation(
                "build.genfiles must be a relative directory".into()
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> DevConfig {
    let (parsed, ignored) = DevConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
