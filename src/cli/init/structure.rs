//! Site directory structure and scaffold files.

use crate::embed::{
    client::{
        ClientVars, FONT_JS, HIGHLIGHTING_CSS, HIGHLIGHTING_JS, INLINE_JS, MAIN_CSS, PREFETCH_JS,
    },
    init::{GITIGNORE, InitVars, PACKAGE_JSON, QUIRE_TOML},
};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Standard site directory structure.
const SITE_DIRS: &[&str] = &[
    "src/js",
    "src/styles",
    "src/fonts",
    "src/images",
    "_includes/generated",
    "assets",
];

/// Create site directory structure at the given root.
pub fn create_structure(root: &Path) -> Result<()> {
    for dir in SITE_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory '{}'", path.display()))?;
    }
    Ok(())
}

/// Write every scaffold file, returning how many were written.
///
/// Existing files are left alone.
pub fn write_files(root: &Path, name: &str) -> Result<usize> {
    let vars = InitVars {
        name: name.to_string(),
    };
    let files = [
        ("quire.toml", QUIRE_TOML.render(&vars)),
        ("package.json", PACKAGE_JSON.render(&vars)),
        (".gitignore", GITIGNORE.to_string()),
        ("src/js/inline.js", INLINE_JS.render(&ClientVars)),
        ("src/js/font.js", FONT_JS.render(&ClientVars)),
        ("src/js/prefetch.js", PREFETCH_JS.render(&ClientVars)),
        ("src/js/highlighting.js", HIGHLIGHTING_JS.render(&ClientVars)),
        ("src/styles/main.css", MAIN_CSS.render(&ClientVars)),
        ("src/styles/highlighting.css", HIGHLIGHTING_CSS.content().to_string()),
    ];

    let mut written = 0;
    for (rel, content) in files {
        let path = root.join(rel);
        if path.exists() {
            continue;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        written += 1;
    }
    Ok(written)
}
