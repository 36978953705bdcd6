//! Reload client injection into served HTML.

/// URL the injected tag loads the reload client from.
pub const HOTRELOAD_PATH: &str = "/__quire/hotreload.js";

/// Insert the reload client tag before the last `</body>`, or append it.
pub fn inject_hotreload(content: &[u8]) -> Vec<u8> {
    let tag = format!(r#"<script src="{HOTRELOAD_PATH}" defer></script>"#);
    let tag = tag.as_bytes();

    const PATTERN: &[u8] = b"</body>";
    let pos = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
        .unwrap_or(content.len());

    let mut result = Vec::with_capacity(content.len() + tag.len());
    result.extend_from_slice(&content[..pos]);
    result.extend_from_slice(tag);
    result.extend_from_slice(&content[pos..]);
    result
}
