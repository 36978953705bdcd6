//! Web font variants requested by `font.js`.
//!
//! Every variant of the family must load within [`FONT_TIMEOUT`]. On
//! success the root gets the loaded class and the session flag is set so
//! later pages skip loading entirely; on failure or timeout the root gets
//! the failed class and nothing is stored.

use std::time::Duration;

pub const FONT_FAMILY: &str = "Fira Sans";
pub const FONT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontVariant {
    pub weight: u16,
    pub italic: bool,
}

impl FontVariant {
    /// CSS `font` shorthand passed to `document.fonts.load`.
    pub fn shorthand(self, family: &str) -> String {
        let style = if self.italic { "italic" } else { "normal" };
        format!("{style} {} 1em \"{family}\"", self.weight)
    }
}

pub const FONT_VARIANTS: [FontVariant; 4] = [
    FontVariant { weight: 400, italic: false },
    FontVariant { weight: 400, italic: true },
    FontVariant { weight: 700, italic: false },
    FontVariant { weight: 700, italic: true },
];

/// JS array literal of the variants, as embedded in `font.js`.
pub fn variants_js() -> String {
    let items: Vec<String> = FONT_VARIANTS
        .iter()
        .map(|v| format!("'{}'", v.shorthand(FONT_FAMILY).replace('"', "\\\"")))
        .collect();
    format!("[{}]", items.join(", "))
}
