//! Client runtime shipped with every site.
//!
//! The browser scripts live in `embed/client/*.js` and are rendered with
//! the constants below when a site is scaffolded. The tests run the
//! rendered scripts under node against a fake page.
//!
//! | Script            | Behavior                               |
//! |-------------------|----------------------------------------|
//! | `inline.js`       | color scheme restore, toggle, sync     |
//! | `font.js`         | bounded web font loading               |
//! | `prefetch.js`     | viewport-driven link prefetch          |
//! | `highlighting.js` | deferred syntax highlighting           |

pub mod fonts;

#[cfg(test)]
mod tests;

/// localStorage key holding the color scheme.
pub const DARK_MODE_KEY: &str = "dark-mode";
/// Stored value meaning dark.
pub const DARK_VALUE: &str = "true";
/// Stored value meaning light; absence is normalized to this.
pub const LIGHT_VALUE: &str = "false";
/// Class on the root element while dark.
pub const DARK_CLASS: &str = "dark";
/// Selector of the scheme toggle control.
pub const TOGGLE_SELECTOR: &str = ".dark--toggle";

/// sessionStorage flag set once every font variant loaded.
pub const FONTS_CACHED_KEY: &str = "fonts-cached";
pub const FONTS_LOADED_CLASS: &str = "fonts-loaded";
pub const FONTS_FAILED_CLASS: &str = "fonts-failed";

/// Anchor target of the skip-navigation link.
pub const MAIN_TARGET: &str = "#main";
pub const SKIP_NAV_CLASS: &str = "skip--navigation";
pub const HEADING_ANCHOR_CLASS: &str = "heading--anchor";
/// Links containing this are never prefetched.
pub const FEED_PATH: &str = "feed.xml";

/// Public URLs of the deferred scripts.
pub const FONT_SCRIPT: &str = "/assets/js/font.js";
pub const PREFETCH_SCRIPT: &str = "/assets/js/prefetch.js";
pub const HIGHLIGHT_STYLESHEET: &str = "/assets/css/highlighting.css";
