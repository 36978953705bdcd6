//! Project configuration management for `quire.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # One file per TOML section
//! ├── types/         # Diagnostics, errors, global handle
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! Every path in the config is relative to the directory holding
//! `quire.toml` and is made absolute by [`SiteConfig::finalize`].

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    FaviconConfig, FeedConfig, FontsConfig, GeneratorConfig, ImagesConfig, PathsConfig,
    ScriptsConfig, ServeConfig, StyleSpec, StyleTargets, StylesConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config, reload_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing quire.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub styles: StylesConfig,

    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub favicon: FaviconConfig,

    #[serde(default)]
    pub fonts: FontsConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = crate::utils::path::normalize_path(&cwd.join(&config_path));

        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.finalize(&root);
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
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

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Make every configured path absolute against `root`.
    pub fn finalize(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);
        self.paths.normalize(&root);
        self.styles.normalize(&root);
        self.scripts.normalize(&root);
        self.images.normalize(&root);
        self.favicon.normalize(&root);
        self.fonts.normalize(&root);
        self.generator.normalize(&root);
        self.feed.normalize(&root);
        self.root = root;
    }

    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Serve {
            interface,
            port,
            no_watch,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            if *no_watch {
                self.serve.watch = false;
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Get path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the whole configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.styles.validate(&mut diag);
        self.scripts.validate(&mut diag);
        self.images.validate(&mut diag);
        self.favicon.validate(&mut diag);
        self.generator.validate(&mut diag);
        self.serve.validate(&mut diag);
        self.feed.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Parse config and resolve it against `root`, as `load` would.
#[cfg(test)]
pub fn test_config_at(root: &Path, content: &str) -> SiteConfig {
    let mut config = test_parse_config(content);
    config.config_path = root.join("quire.toml");
    config.finalize(root);
    config
}

// ============================================================================
// tests
// ============================================================================
