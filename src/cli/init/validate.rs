//! Pre-initialization checks on the target directory.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Where `quire init` scaffolds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// `quire init`: the current directory, which may only hold dotfiles
    CurrentDir,
    /// `quire init <dir>`: a directory that must not exist yet
    NewDir,
}

impl InitMode {
    pub const fn from_name(has_name: bool) -> Self {
        if has_name { Self::NewDir } else { Self::CurrentDir }
    }
}

/// Check `root` against the rules of `mode`.
pub fn validate_target(root: &Path, mode: InitMode) -> Result<()> {
    match mode {
        InitMode::CurrentDir if !only_dotfiles(root)? => bail!(
            "current directory is not empty, use `quire init <dir>` to scaffold into a new one"
        ),
        InitMode::NewDir if root.exists() => {
            bail!("'{}' already exists", root.display())
        }
        _ => Ok(()),
    }
}

/// True when `path` is missing or holds nothing but hidden entries
/// (such as a fresh `.git`).
fn only_dotfiles(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let entries = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory '{}'", path.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_name().to_string_lossy().starts_with('.') {
            return Ok(false);
        }
    }
    Ok(true)
}
