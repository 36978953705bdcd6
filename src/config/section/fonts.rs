//! `[fonts]` section configuration.
//!
//! ```toml
//! [fonts]
//! input = "src/fonts"
//! output = "assets/fonts"
//! extensions = ["woff", "woff2"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::rooted;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Extensions copied, compared case-insensitively without the dot.
    pub extensions: Vec<String>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            input: "src/fonts".into(),
            output: "assets/fonts".into(),
            extensions: vec!["woff".into(), "woff2".into()],
        }
    }
}

impl FontsConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.input = rooted(root, &self.input);
        self.output = rooted(root, &self.output);
        for ext in &mut self.extensions {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }
    }
}
