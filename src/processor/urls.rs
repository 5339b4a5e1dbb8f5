//! Asset URL lookup.
//!
//! Turning a static path into the URL a browser fetches belongs to whatever
//! compiles and serves the assets. Processors only see it through
//! [`AssetUrlResolver`]; [`StaticUrls`] is the plain prefix-joining default.

use anyhow::Result;

/// Maps a static path (a bundle's `output_filename` or one of its source
/// files) to its served URL.
pub trait AssetUrlResolver: Send + Sync {
    /// Served URL for `path`.
    fn url(&self, path: &str) -> Result<String>;
}

/// Joins a base URL and a static path.
///
/// Absolute URLs (`http://`, `https://`, protocol-relative `//`) are returned
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticUrls {
    base: String,
}

impl StaticUrls {
    /// Create a resolver rooted at `base` (for example `/static/`).
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
        }
    }
}

impl AssetUrlResolver for StaticUrls {
    fn url(&self, path: &str) -> Result<String> {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
            return Ok(path.to_string());
        }
        Ok(format!("{}/{}", self.base.trim_end_matches('/'), path.trim_start_matches('/')))
    }
}
