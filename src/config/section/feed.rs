//! `[feed]` section configuration.
//!
//! ```toml
//! [feed]
//! path = "_site/feed.xml"
//! validator = "https://validator.w3.org/feed/check.cgi"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::rooted;

const VALIDATOR: FieldPath = FieldPath::new("feed.validator");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Generated feed document to validate.
    pub path: PathBuf,
    /// SOAP endpoint of the feed validation service.
    pub validator: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "_site/feed.xml".into(),
            validator: "https://validator.w3.org/feed/check.cgi".into(),
        }
    }
}

impl FeedConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.path = rooted(root, &self.path);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match url::Url::parse(&self.validator) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => diag.error(
                VALIDATOR,
                format!("unsupported scheme `{}`", url.scheme()),
            ),
            Err(e) => diag.error(VALIDATOR, format!("invalid url: {e}")),
        }
    }
}
