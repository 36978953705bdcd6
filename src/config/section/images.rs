//! `[images]` section configuration.
//!
//! ```toml
//! [[images.files]]
//! input = "src/images/me.jpg"
//! output = "assets/images/og-me.jpg"
//! quality = 80
//! width = 600
//! height = 600
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::rooted;

const FILES: FieldPath = FieldPath::new("images.files");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub files: Vec<ImageSpec>,
}

/// A raster image to resize and recompress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Lossy encoder quality (1-100). Ignored for lossless formats.
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Exact output width; aspect ratio is not preserved.
    pub width: u32,
    /// Exact output height; aspect ratio is not preserved.
    pub height: u32,
}

const fn default_quality() -> u8 {
    80
}

impl ImagesConfig {
    pub fn normalize(&mut self, root: &Path) {
        for spec in &mut self.files {
            spec.input = rooted(root, &spec.input);
            spec.output = rooted(root, &spec.output);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for spec in &self.files {
            let name = spec.input.display();
            if !(1..=100).contains(&spec.quality) {
                diag.error(
                    FILES,
                    format!("{name}: quality must be 1-100, got {}", spec.quality),
                );
            }
            if spec.width == 0 || spec.height == 0 {
                diag.error(FILES, format!("{name}: width and height must be non-zero"));
            }
            if !spec.input.is_file() {
                diag.warn(FILES, format!("image not found: {name}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_default_quality() {
        let config = test_parse_config(
            "[[images.files]]\ninput = \"a.jpg\"\noutput = \"b.jpg\"\nwidth = 10\nheight = 20",
        );
        assert_eq!(config.images.files[0].quality, 80);
        assert_eq!(config.images.files[0].height, 20);
    }

    #[test]
    fn test_validate_ranges() {
        let config = ImagesConfig {
            files: vec![ImageSpec {
                input: "missing.jpg".into(),
                output: "out.jpg".into(),
                quality: 0,
                width: 0,
                height: 10,
            }],
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors().len(), 2);
        assert_eq!(diag.warnings().len(), 1);
    }
}
