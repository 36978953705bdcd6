//! Configuration section definitions.
//!
//! Each module corresponds to a section in `quire.toml`:
//!
//! | Module      | TOML Section    | Purpose                                |
//! |-------------|-----------------|----------------------------------------|
//! | `paths`     | `[paths]`       | Source, generated and asset roots      |
//! | `styles`    | `[styles]`      | Stylesheet entries and browser targets |
//! | `scripts`   | `[scripts]`     | Script bundle entries                  |
//! | `images`    | `[images]`      | Image resize/recompress entries        |
//! | `favicon`   | `[favicon]`     | Favicon set generation                 |
//! | `fonts`     | `[fonts]`       | Web font copying                       |
//! | `generator` | `[generator]`   | External site generator command        |
//! | `serve`     | `[serve]`       | Development server                     |
//! | `feed`      | `[feed]`        | Feed validation                        |

mod favicon;
mod feed;
mod fonts;
mod generator;
mod images;
mod paths;
mod scripts;
mod serve;
mod styles;

pub use favicon::{FaviconConfig, PlatformFlags, parse_hex_color};
pub use feed::FeedConfig;
pub use fonts::FontsConfig;
pub use generator::GeneratorConfig;
pub use images::{ImageSpec, ImagesConfig};
pub use paths::PathsConfig;
pub use scripts::{BundleSpec, ScriptsConfig};
pub use serve::ServeConfig;
pub use styles::{StyleSpec, StyleTargets, StylesConfig};

use std::path::{Path, PathBuf};

/// Resolve `path` against `root` unless it is already absolute.
pub(crate) fn rooted(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        crate::utils::path::normalize_path(&root.join(path))
    }
}
