//! Filesystem helpers shared by the asset pipelines.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `contents` to `path`, creating parent directories first.
pub fn write_with_parents(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Remove a directory tree; a missing directory is not an error.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

/// Files directly inside `dir` whose extension is in `extensions`
/// (case-insensitive, without the dot), sorted by name.
///
/// A missing directory yields an empty list.
pub fn list_by_extension(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", dir.display())),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_with_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c.txt");
        write_with_parents(&path, "hi").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hi");
    }

    #[test]
    fn test_remove_missing_dir_ok() {
        let dir = TempDir::new().unwrap();
        remove_dir_all_if_exists(&dir.path().join("nope")).unwrap();
    }

    #[test]
    fn test_list_by_extension() {
        let dir = TempDir::new().unwrap();
        for name in ["b.woff2", "a.WOFF", "c.ttf", "readme.md"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("sub.woff")).unwrap();

        let files = list_by_extension(dir.path(), &["woff".into(), "woff2".into()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.WOFF", "b.woff2"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let files = list_by_extension(&dir.path().join("missing"), &["woff".into()]).unwrap();
        assert!(files.is_empty());
    }
}
