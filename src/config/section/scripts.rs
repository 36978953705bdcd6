//! `[scripts]` section configuration.
//!
//! ```toml
//! [scripts]
//! define = "__DEV__"
//!
//! [[scripts.bundles]]
//! input = "src/js/inline.js"
//! output = "_includes/generated/scripts/inline.js"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::rooted;

const DEFINE: FieldPath = FieldPath::new("scripts.define");
const BUNDLES: FieldPath = FieldPath::new("scripts.bundles");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Identifier replaced with `true`/`false` depending on the build env.
    pub define: String,
    /// Directory searched for bare import specifiers.
    pub node_modules: PathBuf,
    /// One entry per client script.
    pub bundles: Vec<BundleSpec>,
}

/// A client entry script and the bundle it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSpec {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            define: "__DEV__".into(),
            node_modules: "node_modules".into(),
            bundles: Vec::new(),
        }
    }
}

impl ScriptsConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.node_modules = rooted(root, &self.node_modules);
        for spec in &mut self.bundles {
            spec.input = rooted(root, &spec.input);
            spec.output = rooted(root, &spec.output);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let valid_ident = !self.define.is_empty()
            && !self.define.starts_with(|c: char| c.is_ascii_digit())
            && self
                .define
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if !valid_ident {
            diag.error(
                DEFINE,
                format!("`{}` is not a valid identifier", self.define),
            );
        }
        for spec in &self.bundles {
            if !spec.input.is_file() {
                diag.warn(
                    BUNDLES,
                    format!("entry not found: {}", spec.input.display()),
                );
            }
        }
    }
}
