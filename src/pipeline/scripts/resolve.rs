//! Module specifier resolution.
//!
//! Relative specifiers resolve against the importing file. Bare
//! specifiers (`pkg`, `pkg/sub`, `@scope/pkg`) are looked up in the
//! configured `node_modules`, then in every `node_modules` above the
//! importer, using `package.json` `module` before `main`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 2] = ["js", "mjs"];

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    module: Option<String>,
    main: Option<String>,
}

/// Resolve `specifier` as seen from `importer`.
pub fn resolve(specifier: &str, importer: &Path, node_modules: &Path) -> Option<PathBuf> {
    if is_relative(specifier) {
        let base = importer.parent().unwrap_or(Path::new("")).join(specifier);
        return resolve_file(&base);
    }

    let (package, subpath) = split_bare(specifier)?;
    let search = std::iter::once(node_modules.to_path_buf()).chain(
        importer
            .ancestors()
            .skip(1)
            .map(|dir| dir.join("node_modules")),
    );

    search
        .map(|dir| dir.join(package))
        .filter(|dir| dir.is_dir())
        .find_map(|dir| match subpath {
            Some(sub) => resolve_file(&dir.join(sub)),
            None => resolve_package(&dir),
        })
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

/// Split `@scope/pkg/sub` into (`@scope/pkg`, `Some("sub")`).
fn split_bare(specifier: &str) -> Option<(&str, Option<&str>)> {
    let name_end = if specifier.starts_with('@') {
        let slash = specifier.find('/')?;
        specifier[slash + 1..]
            .find('/')
            .map_or(specifier.len(), |i| slash + 1 + i)
    } else {
        specifier.find('/').unwrap_or(specifier.len())
    };
    let (name, rest) = specifier.split_at(name_end);
    if name.is_empty() {
        return None;
    }
    let sub = rest.strip_prefix('/').filter(|s| !s.is_empty());
    Some((name, sub))
}

fn resolve_package(dir: &Path) -> Option<PathBuf> {
    let manifest = fs::read_to_string(dir.join("package.json"))
        .ok()
        .and_then(|text| serde_json::from_str::<PackageJson>(&text).ok())
        .unwrap_or_default();

    [manifest.module, manifest.main]
        .into_iter()
        .flatten()
        .find_map(|field| resolve_file(&dir.join(field)))
        .or_else(|| resolve_file(&dir.join("index")))
}

/// Try `base`, `base.js`, `base.mjs`, then `base/index.{js,mjs}`.
fn resolve_file(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }
    let with_ext = |path: &Path, ext: &str| {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    };
    EXTENSIONS
        .iter()
        .map(|ext| with_ext(base, ext))
        .chain(EXTENSIONS.iter().map(|ext| with_ext(&base.join("index"), ext)))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_split_bare() {
        assert_eq!(split_bare("hunt"), Some(("hunt", None)));
        assert_eq!(split_bare("hunt/dist/x"), Some(("hunt", Some("dist/x"))));
        assert_eq!(split_bare("@scope/pkg"), Some(("@scope/pkg", None)));
        assert_eq!(split_bare("@scope/pkg/sub"), Some(("@scope/pkg", Some("sub"))));
        assert_eq!(split_bare("@scope"), None);
    }

    #[test]
    fn test_relative_with_extension_fallbacks() {
        let dir = TempDir::new().unwrap();
        let entry = touch(dir.path(), "src/js/main.js", "");
        let util = touch(dir.path(), "src/js/util.mjs", "");
        let index = touch(dir.path(), "src/js/lib/index.js", "");
        let nm = dir.path().join("node_modules");

        assert_eq!(resolve("./util", &entry, &nm), Some(util));
        assert_eq!(resolve("./lib", &entry, &nm), Some(index));
        assert_eq!(resolve("./missing", &entry, &nm), None);
    }

    #[test]
    fn test_package_prefers_module_field() {
        let dir = TempDir::new().unwrap();
        let entry = touch(dir.path(), "src/js/main.js", "");
        touch(
            dir.path(),
            "node_modules/hunt/package.json",
            r#"{"main": "dist/hunt.js", "module": "dist/hunt.mjs"}"#,
        );
        touch(dir.path(), "node_modules/hunt/dist/hunt.js", "");
        let esm = touch(dir.path(), "node_modules/hunt/dist/hunt.mjs", "");

        let nm = dir.path().join("node_modules");
        assert_eq!(resolve("hunt", &entry, &nm), Some(esm));
    }

    #[test]
    fn test_package_main_and_index_fallback() {
        let dir = TempDir::new().unwrap();
        let entry = touch(dir.path(), "src/js/main.js", "");
        touch(dir.path(), "node_modules/a/package.json", r#"{"main": "lib/a"}"#);
        let a = touch(dir.path(), "node_modules/a/lib/a.js", "");
        let b = touch(dir.path(), "node_modules/b/index.js", "");

        // configured directory does not exist; ancestors are searched
        let nm = dir.path().join("vendor");
        assert_eq!(resolve("a", &entry, &nm), Some(a));
        assert_eq!(resolve("b", &entry, &nm), Some(b));
        assert_eq!(resolve("c", &entry, &nm), None);
    }
}
