//! Directories the watcher is attached to.
//!
//! The project root is watched non-recursively (config file and top-level
//! content), then every top-level directory that is not an output, hidden
//! or `node_modules` gets a recursive watch, and so does the asset source
//! tree. Dependency and output trees never receive a watch at all.

use std::fs;
use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;

use super::classify::is_ignored;
use crate::config::SiteConfig;

/// Watch roots derived from the config, kept attached as directories come
/// and go.
#[derive(Default)]
pub struct WatchRoots {
    attached: FxHashMap<PathBuf, RecursiveMode>,
}

impl WatchRoots {
    /// Attach every desired root. The project root must exist.
    pub fn attach(
        &mut self,
        watcher: &mut RecommendedWatcher,
        config: &SiteConfig,
    ) -> notify::Result<()> {
        watcher.watch(&config.root, RecursiveMode::NonRecursive)?;
        self.attached
            .insert(config.root.clone(), RecursiveMode::NonRecursive);
        self.maintain(watcher, config);
        Ok(())
    }

    /// Drop roots that vanished or are no longer wanted, attach new ones.
    pub fn maintain(&mut self, watcher: &mut RecommendedWatcher, config: &SiteConfig) {
        let desired = desired_roots(config);

        self.attached.retain(|path, mode| {
            let keep = path.exists() && desired.iter().any(|(p, m)| p == path && m == mode);
            if !keep {
                let _ = watcher.unwatch(path);
                crate::debug!("watch"; "detached {}", path.display());
            }
            keep
        });

        for (path, mode) in desired {
            if self.attached.contains_key(&path) || !path.exists() {
                continue;
            }
            match watcher.watch(&path, mode) {
                Ok(()) => {
                    crate::debug!("watch"; "attached {}", path.display());
                    self.attached.insert(path, mode);
                }
                Err(e) => crate::debug!("watch"; "cannot watch {}: {}", path.display(), e),
            }
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = (&Path, RecursiveMode)> {
        self.attached.iter().map(|(p, m)| (p.as_path(), *m))
    }
}

/// Every path that should carry a watch, sorted, with nested recursive
/// roots folded into their ancestor.
pub fn desired_roots(config: &SiteConfig) -> Vec<(PathBuf, RecursiveMode)> {
    let mut recursive: Vec<PathBuf> = fs::read_dir(&config.root)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .filter(|path| !is_ignored(path, config))
        .collect();
    if config.paths.source.is_dir() && !is_ignored(&config.paths.source, config) {
        recursive.push(config.paths.source.clone());
    }

    recursive.sort();
    recursive.dedup();
    let folded: Vec<PathBuf> = recursive
        .iter()
        .filter(|path| {
            !recursive
                .iter()
                .any(|other| other != *path && path.starts_with(other))
        })
        .cloned()
        .collect();

    std::iter::once((config.root.clone(), RecursiveMode::NonRecursive))
        .chain(folded.into_iter().map(|p| (p, RecursiveMode::Recursive)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        for sub in [
            "src/js",
            "posts",
            "_includes/layouts",
            "node_modules/prismjs",
            ".git/objects",
            "_site/posts",
            "assets/js",
        ] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        fs::write(dir.path().join("quire.toml"), "").unwrap();
        fs::write(dir.path().join("index.md"), "# hi").unwrap();
        dir
    }

    fn names(roots: &[(PathBuf, RecursiveMode)], base: &Path) -> Vec<(String, RecursiveMode)> {
        roots
            .iter()
            .map(|(p, m)| {
                let rel = p.strip_prefix(base).unwrap().to_string_lossy().into_owned();
                (rel, *m)
            })
            .collect()
    }

    #[test]
    fn test_desired_roots_skip_outputs_and_dependencies() {
        let dir = site();
        let config = test_config_at(dir.path(), "");
        let roots = desired_roots(&config);
        assert_eq!(
            names(&roots, &config.root),
            vec![
                (String::new(), RecursiveMode::NonRecursive),
                ("_includes".to_string(), RecursiveMode::Recursive),
                ("posts".to_string(), RecursiveMode::Recursive),
                ("src".to_string(), RecursiveMode::Recursive),
            ]
        );
    }

    #[test]
    fn test_nested_source_folds_into_top_level_dir() {
        let dir = site();
        fs::create_dir_all(dir.path().join("theme/assets-src")).unwrap();
        let config = test_config_at(dir.path(), "[paths]\nsource = \"theme/assets-src\"");
        let roots = desired_roots(&config);
        let names = names(&roots, &config.root);
        // folded into `theme`
        assert!(names.contains(&("theme".to_string(), RecursiveMode::Recursive)));
        assert!(!names.iter().any(|(n, _)| n.contains("assets-src")));
        assert!(!names.iter().any(|(n, _)| n.starts_with("node_modules")));
    }

    #[test]
    fn test_maintain_attaches_new_directories() {
        let dir = site();
        let config = test_config_at(dir.path(), "");
        let mut watcher =
            notify::recommended_watcher(|_: notify::Result<notify::Event>| {}).unwrap();
        let mut roots = WatchRoots::default();
        roots.attach(&mut watcher, &config).unwrap();
        assert_eq!(roots.paths().count(), 4);

        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::remove_dir_all(dir.path().join("posts")).unwrap();
        roots.maintain(&mut watcher, &config);

        let attached: Vec<_> = roots.paths().map(|(p, _)| p.to_path_buf()).collect();
        assert!(attached.contains(&config.root.join("drafts")));
        assert!(!attached.contains(&config.root.join("posts")));
        assert!(!attached.iter().any(|p| p.ends_with("node_modules")));
    }
}
