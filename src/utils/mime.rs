//! MIME type detection for the dev server and the favicon markup.

use std::path::Path;

/// MIME type constants for everything the blog output contains.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const MANIFEST: &str = "application/manifest+json";
    pub const XML: &str = "application/xml";
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";
    pub const OCTET_STREAM: &str = "application/octet-stream";

    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";

    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
    pub const OTF: &str = "font/otf";
}

/// Guess MIME type from file extension.
pub fn from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    from_extension(ext.as_deref())
}

/// Guess MIME type from a lowercase extension.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("html" | "htm") => types::HTML,
        Some("css") => types::CSS,
        Some("js" | "mjs") => types::JAVASCRIPT,
        Some("json" | "webapp") => types::JSON,
        Some("webmanifest") => types::MANIFEST,
        Some("xml") => types::XML,
        Some("rss") => types::RSS,
        Some("atom") => types::ATOM,
        Some("txt" | "md") => types::PLAIN,

        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("svg") => types::SVG,
        Some("ico") => types::ICO,

        Some("woff") => types::WOFF,
        Some("woff2") => types::WOFF2,
        Some("ttf") => types::TTF,
        Some("otf") => types::OTF,

        _ => types::OCTET_STREAM,
    }
}

/// MIME type for `<link rel="icon" type=...>`; unknown types are treated as ICO.
pub fn for_icon(path: &Path) -> &'static str {
    match from_path(path) {
        mime @ (types::PNG | types::SVG | types::WEBP | types::GIF | types::JPEG) => mime,
        _ => types::ICO,
    }
}

/// Whether a response body may have the reload script injected.
pub fn is_html(mime: &str) -> bool {
    mime.starts_with("text/html")
}
