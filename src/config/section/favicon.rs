//! `[favicon]` section configuration.
//!
//! ```toml
//! [favicon]
//! source = "src/images/logo.png"
//! output = "assets/favicons"
//! html = "_includes/generated/favicons.html"
//! path = "/assets/favicons/"
//! app_name = "My Blog"
//! background = "#010120"
//!
//! [favicon.platforms]
//! android = true
//! apple_icon = true
//! favicons = true
//! windows = true
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::rooted;

const SOURCE: FieldPath = FieldPath::new("favicon.source");
const BACKGROUND: FieldPath = FieldPath::new("favicon.background");
const THEME_COLOR: FieldPath = FieldPath::new("favicon.theme_color");
const PATH: FieldPath = FieldPath::new("favicon.path");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaviconConfig {
    /// Source logo. When unset the favicon pipeline is skipped.
    pub source: Option<PathBuf>,
    /// Directory the icon set is written to. Wiped on every run.
    pub output: PathBuf,
    /// Partial holding the `<link>`/`<meta>` tags.
    pub html: PathBuf,
    /// URL prefix the icons are served under.
    pub path: String,
    pub app_name: String,
    pub app_short_name: Option<String>,
    pub description: String,
    pub developer_name: String,
    pub developer_url: String,
    pub lang: String,
    /// Tile and manifest background, `#rgb` or `#rrggbb`.
    pub background: String,
    pub theme_color: String,
    pub start_url: String,
    pub display: String,
    pub platforms: PlatformFlags,
}

/// Which icon families to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformFlags {
    pub android: bool,
    pub apple_icon: bool,
    pub apple_startup: bool,
    pub coast: bool,
    pub favicons: bool,
    pub firefox: bool,
    pub windows: bool,
    pub yandex: bool,
}

impl Default for PlatformFlags {
    fn default() -> Self {
        Self {
            android: true,
            apple_icon: true,
            apple_startup: false,
            coast: false,
            favicons: true,
            firefox: false,
            windows: true,
            yandex: false,
        }
    }
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            source: None,
            output: "assets/favicons".into(),
            html: "_includes/generated/favicons.html".into(),
            path: "/assets/favicons/".into(),
            app_name: String::new(),
            app_short_name: None,
            description: String::new(),
            developer_name: String::new(),
            developer_url: String::new(),
            lang: "en-US".into(),
            background: "#010120".into(),
            theme_color: "#010120".into(),
            start_url: "/".into(),
            display: "standalone".into(),
            platforms: PlatformFlags::default(),
        }
    }
}

impl FaviconConfig {
    pub fn normalize(&mut self, root: &Path) {
        if let Some(source) = &self.source {
            self.source = Some(rooted(root, source));
        }
        self.output = rooted(root, &self.output);
        self.html = rooted(root, &self.html);
        if !self.path.ends_with('/') {
            self.path.push('/');
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(source) = &self.source
            && !source.is_file()
        {
            diag.error(SOURCE, format!("logo not found: {}", source.display()));
        }
        for (field, value) in [(BACKGROUND, &self.background), (THEME_COLOR, &self.theme_color)] {
            if parse_hex_color(value).is_none() {
                diag.error_with_hint(
                    field,
                    format!("invalid color `{value}`"),
                    "use `#rgb` or `#rrggbb`",
                );
            }
        }
        if !self.path.starts_with('/') && !self.path.contains("://") {
            diag.warn(PATH, "icon path is relative; links may break on nested pages");
        }
    }

    /// Short name used by manifests, falling back to the app name.
    pub fn short_name(&self) -> &str {
        self.app_short_name.as_deref().unwrap_or(&self.app_name)
    }
}

/// Parse `#rgb` / `#rrggbb` into RGB components.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v << 4 | v;
            }
            Some(rgb)
        }
        6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(config.favicon.source.is_none());
        assert_eq!(config.favicon.background, "#010120");
        assert!(config.favicon.platforms.android);
        assert!(!config.favicon.platforms.yandex);
    }

    #[test]
    fn test_platform_override() {
        let config = test_parse_config("[favicon.platforms]\nandroid = false\nyandex = true");
        assert!(!config.favicon.platforms.android);
        assert!(config.favicon.platforms.yandex);
        // unspecified flags keep their defaults
        assert!(config.favicon.platforms.windows);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#010120"), Some([0x01, 0x01, 0x20]));
        assert_eq!(parse_hex_color("#fff"), Some([0xff, 0xff, 0xff]));
        assert_eq!(parse_hex_color("010120"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color("#+f+f+f"), None);
        // six bytes, four chars
        assert_eq!(parse_hex_color("#aééa"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_validate_reports_non_ascii_color() {
        let favicon = FaviconConfig {
            theme_color: "#aééa".into(),
            ..FaviconConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        favicon.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert!(diag.errors()[0].message.contains("#aééa"));
    }

    #[test]
    fn test_short_name_fallback() {
        let mut favicon = FaviconConfig {
            app_name: "jeremenichelli.io".into(),
            ..FaviconConfig::default()
        };
        assert_eq!(favicon.short_name(), "jeremenichelli.io");
        favicon.app_short_name = Some("jm".into());
        assert_eq!(favicon.short_name(), "jm");
    }

    #[test]
    fn test_normalize_path_suffix() {
        let mut favicon = FaviconConfig {
            path: "/icons".into(),
            ..FaviconConfig::default()
        };
        favicon.normalize(Path::new("/site"));
        assert_eq!(favicon.path, "/icons/");
        assert_eq!(favicon.output, PathBuf::from("/site/assets/favicons"));
    }
}
