//! `[generator]` section configuration.
//!
//! The site generator is an external program that renders templates and
//! content (including the generated partials) into the output directory.
//!
//! ```toml
//! [generator]
//! command = ["npx", "@11ty/eleventy"]
//! output = "_site"
//! content = ["md", "liquid"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::rooted;

const COMMAND: FieldPath = FieldPath::new("generator.command");

const PACKAGE_RUNNERS: [&str; 5] = ["npx", "bunx", "pnpx", "yarn", "dlx"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Program and arguments, run from the project root.
    pub command: Vec<String>,
    /// Directory the generator writes the site to (served in dev).
    pub output: PathBuf,
    /// Content extensions whose changes trigger a generator run.
    pub content: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: vec!["npx".into(), "@11ty/eleventy".into()],
            output: "_site".into(),
            content: vec!["md".into(), "liquid".into()],
        }
    }
}

impl GeneratorConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.output = rooted(root, &self.output);
        for ext in &mut self.content {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(cmd) = self.command.first() else {
            diag.error(COMMAND, "command is empty");
            return;
        };

        if which::which(cmd).is_ok() {
            return;
        }
        if PACKAGE_RUNNERS.contains(&cmd.as_str()) {
            // Package runners can download packages at runtime
            if let Some(package) = self.command.get(1) {
                diag.warn(
                    COMMAND,
                    format!("`{package}` via `{cmd}`, ensure the package is installed"),
                );
            }
        } else {
            diag.error_with_hint(
                COMMAND,
                format!("`{cmd}` not found"),
                format!("install the command or update {COMMAND}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.generator.command, vec!["npx", "@11ty/eleventy"]);
        assert_eq!(config.generator.output, PathBuf::from("_site"));
        assert_eq!(config.generator.content, vec!["md", "liquid"]);
    }

    #[test]
    fn test_empty_command() {
        let generator = GeneratorConfig {
            command: vec![],
            ..GeneratorConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        generator.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_missing_binary() {
        let generator = GeneratorConfig {
            command: vec!["quire-definitely-missing-binary".into()],
            ..GeneratorConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        generator.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
    }
}
