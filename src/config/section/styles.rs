//! `[styles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [styles.targets]
//! safari = "12"
//! firefox = "78"
//!
//! [[styles.files]]
//! input = "src/styles/home.css"
//! output = "_includes/generated/styles/home.liquid"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::rooted;

const FILES: FieldPath = FieldPath::new("styles.files");
const TARGETS: FieldPath = FieldPath::new("styles.targets");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Oldest browser versions to prefix and lower syntax for.
    pub targets: StyleTargets,
    /// One entry per page-level stylesheet.
    pub files: Vec<StyleSpec>,
}

/// A stylesheet source and the partial it compiles into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpec {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Minimum browser versions (`"major"` or `"major.minor"`).
///
/// Unset browsers are not considered when deciding on prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTargets {
    pub android: Option<String>,
    pub chrome: Option<String>,
    pub edge: Option<String>,
    pub firefox: Option<String>,
    pub ie: Option<String>,
    pub ios_saf: Option<String>,
    pub opera: Option<String>,
    pub safari: Option<String>,
    pub samsung: Option<String>,
}

impl Default for StyleTargets {
    fn default() -> Self {
        Self {
            android: None,
            chrome: Some("80".into()),
            edge: Some("80".into()),
            firefox: Some("78".into()),
            ie: None,
            ios_saf: Some("12".into()),
            opera: None,
            safari: Some("12".into()),
            samsung: None,
        }
    }
}

impl StyleTargets {
    /// Iterate `(browser, version)` pairs that are set.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("android", &self.android),
            ("chrome", &self.chrome),
            ("edge", &self.edge),
            ("firefox", &self.firefox),
            ("ie", &self.ie),
            ("ios_saf", &self.ios_saf),
            ("opera", &self.opera),
            ("safari", &self.safari),
            ("samsung", &self.samsung),
        ]
        .into_iter()
        .filter_map(|(name, version)| version.as_deref().map(|v| (name, v)))
    }

    /// Encode a `major[.minor[.patch]]` version the way lightningcss expects
    /// (`major << 16 | minor << 8 | patch`).
    pub fn encode_version(version: &str) -> Option<u32> {
        let mut parts = version.trim().split('.');
        let major: u32 = parts.next()?.parse().ok()?;
        let minor: u32 = parts.next().map_or(Ok(0), str::parse).ok()?;
        let patch: u32 = parts.next().map_or(Ok(0), str::parse).ok()?;
        if parts.next().is_some() || minor > 0xff || patch > 0xff {
            return None;
        }
        Some(major << 16 | minor << 8 | patch)
    }
}

impl StylesConfig {
    pub fn normalize(&mut self, root: &Path) {
        for spec in &mut self.files {
            spec.input = rooted(root, &spec.input);
            spec.output = rooted(root, &spec.output);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (name, version) in self.targets.entries() {
            if StyleTargets::encode_version(version).is_none() {
                diag.error(TARGETS, format!("invalid {name} version `{version}`"));
            }
        }
        for spec in &self.files {
            if !spec.input.is_file() {
                diag.warn(
                    FILES,
                    format!("stylesheet not found: {}", spec.input.display()),
                );
            }
        }
    }
}
