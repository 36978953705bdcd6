//! `[paths]` section configuration.
//!
//! ```toml
//! [paths]
//! source = "src"                      # watched asset sources
//! generated = "_includes/generated"   # partials written by pipelines
//! assets = "assets"                   # static assets written by pipelines
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::rooted;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Asset source tree (fonts, images, js, styles).
    pub source: PathBuf,
    /// Generated partials consumed by the site generator.
    /// Changes here never trigger a rebuild.
    pub generated: PathBuf,
    /// Static asset output served at the site root.
    pub assets: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: "src".into(),
            generated: "_includes/generated".into(),
            assets: "assets".into(),
        }
    }
}

impl PathsConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.source = rooted(root, &self.source);
        self.generated = rooted(root, &self.generated);
        self.assets = rooted(root, &self.assets);
    }
}
