//! Dotted config field path (e.g. `favicon.source`).

use owo_colors::OwoColorize;
use std::fmt;

/// A config field path, shown in diagnostics.
///
/// ```ignore
/// const SOURCE: FieldPath = FieldPath::new("favicon.source");
/// diag.error(SOURCE, "file not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
