//! Site initialization.
//!
//! Scaffolds a new blog: config, package manifest, ignore file and the
//! client scripts and stylesheets the default bundles compile.

mod structure;
mod validate;

use crate::log;
use anyhow::Result;
use std::path::Path;

pub use validate::InitMode;

/// Create a new site at `root`.
///
/// `root` must not exist for [`InitMode::NewDir`] and must be empty for
/// [`InitMode::CurrentDir`].
pub fn new_site(root: &Path, mode: InitMode) -> Result<()> {
    validate::validate_target(root, mode)?;

    structure::create_structure(root)?;
    let written = structure::write_files(root, &site_name(root))?;

    log!("init"; "{} files written to {}", written, root.display());
    log!("init"; "run `npm install`, then `quire serve`");
    Ok(())
}

/// Package name derived from the directory name.
fn site_name(root: &Path) -> String {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    let name = name.trim_matches('-');
    if name.is_empty() {
        "blog".to_string()
    } else {
        name.to_string()
    }
}
