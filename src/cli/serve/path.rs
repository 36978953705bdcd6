//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Resolve a request URL under `serve_root`.
///
/// Directories resolve to their `index.html`, and extensionless URLs fall
/// back to `<url>.html`. Anything escaping `serve_root` resolves to `None`.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);
    if clean.split('/').any(|part| part == "..") {
        return None;
    }

    let root = serve_root.canonicalize().ok()?;
    let candidates = [
        root.join(&clean),
        root.join(&clean).join("index.html"),
        root.join(format!("{clean}.html")),
    ];

    candidates
        .into_iter()
        .filter(|path| path.is_file())
        .filter_map(|path| path.canonicalize().ok())
        // symlinks may still point outside
        .find(|path| path.starts_with(&root))
}

/// Decode, strip query and fragment, trim slashes.
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    decoded.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts/hello")).unwrap();
        fs::write(dir.path().join("index.html"), "home").unwrap();
        fs::write(dir.path().join("posts/hello/index.html"), "post").unwrap();
        fs::write(dir.path().join("about.html"), "about").unwrap();
        fs::write(dir.path().join("feed.xml"), "<feed/>").unwrap();
        dir
    }

    #[test]
    fn test_resolves_files_and_indexes() {
        let dir = site();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(resolve_path("/", dir.path()), Some(root.join("index.html")));
        assert_eq!(
            resolve_path("/posts/hello/?ref=x", dir.path()),
            Some(root.join("posts/hello/index.html"))
        );
        assert_eq!(resolve_path("/about", dir.path()), Some(root.join("about.html")));
        assert_eq!(resolve_path("/feed.xml", dir.path()), Some(root.join("feed.xml")));
        assert_eq!(resolve_path("/missing", dir.path()), None);
    }

    #[test]
    fn test_rejects_traversal() {
        let dir = site();
        assert_eq!(resolve_path("/../etc/passwd", dir.path()), None);
        assert_eq!(resolve_path("/posts/%2e%2e/%2e%2e/secret", dir.path()), None);
    }

    #[test]
    fn test_decodes_percent_escapes() {
        let dir = site();
        fs::write(dir.path().join("a b.html"), "space").unwrap();
        assert!(resolve_path("/a%20b.html", dir.path()).is_some());
    }
}
