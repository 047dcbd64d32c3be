//! On-disk cache of downloaded document pages.
//!
//! Pages are stored as `<dir>/<ver_id>.html` and never expire: a version id
//! names one immutable consolidated text, so a cached page stays valid.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::validate_ver_id;
use crate::error::Result;
use crate::export::write_atomic;
use crate::parser::{parse_html_with, ParseOptions};
use crate::types::ParsedDocument;

use super::http::{create_client, download_html};

/// Directory of cached HTML pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCache {
    dir: PathBuf,
}

impl DocumentCache {
    /// Create a cache rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cached page of a version.
    pub fn path(&self, ver_id: &str) -> PathBuf {
        self.dir.join(format!("{ver_id}.html"))
    }

    /// Return the page of `ver_id`, calling `fetch` only on a cache miss.
    ///
    /// A fetched page is written atomically before it is returned, so an
    /// interrupted run never leaves a truncated page behind. Errors from
    /// `fetch` are returned unchanged and nothing is cached.
    pub fn html<F>(&self, ver_id: &str, fetch: F) -> Result<String>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        validate_ver_id(ver_id)?;

        let path = self.path(ver_id);
        if path.is_file() {
            tracing::debug!(ver_id, path = %path.display(), "Cache hit");
            return Ok(fs::read_to_string(&path)?);
        }

        let html = fetch(ver_id)?;
        fs::create_dir_all(&self.dir)?;
        write_atomic(&path, &html)?;
        tracing::debug!(ver_id, path = %path.display(), "Cached document");
        Ok(html)
    }
}

/// Fetch and parse a document version.
///
/// With a cache directory the page is read from, or stored into, the cache;
/// without one it is always downloaded.
///
/// # Arguments
/// * `ver_id` - Numeric version identifier
/// * `cache_dir` - Optional cache directory
/// * `base_url` - Base of the document pages (usually [`crate::config::SOURCE_BASE_URL`])
/// * `options` - Parse options
pub fn fetch_document(
    ver_id: &str,
    cache_dir: Option<&Path>,
    base_url: &str,
    options: &ParseOptions,
) -> Result<ParsedDocument> {
    validate_ver_id(ver_id)?;

    let download = |id: &str| -> Result<String> {
        let client = create_client()?;
        download_html(&client, base_url, id)
    };

    let html = match cache_dir {
        Some(dir) => DocumentCache::new(dir).html(ver_id, download)?,
        None => download(ver_id)?,
    };

    Ok(parse_html_with(&html, ver_id, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexroError;
    use std::cell::Cell;
    use tempfile::tempdir;

    const PAGE: &str = r#"<html><head><title>Lege</title></head><body>
        <span class="S_ART" id="art1"><span class="S_ART_TTL">Articolul 1</span>
        <span class="S_ART_BDY"><span class="S_PAR" id="p1">Text.</span></span></span>
    </body></html>"#;

    #[test]
    fn test_html_fetches_once_then_hits_cache() {
        let temp_dir = tempdir().unwrap();
        let cache = DocumentCache::new(temp_dir.path().join("cache"));
        let calls = Cell::new(0);

        let fetch = |_: &str| -> Result<String> {
            calls.set(calls.get() + 1);
            Ok(PAGE.to_string())
        };
        assert_eq!(cache.html("42", fetch).unwrap(), PAGE);
        assert_eq!(cache.html("42", fetch).unwrap(), PAGE);

        assert_eq!(calls.get(), 1);
        assert!(cache.path("42").is_file());
    }

    #[test]
    fn test_html_reads_existing_file_without_fetching() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("7.html"), "<p>cached</p>").unwrap();

        let cache = DocumentCache::new(temp_dir.path());
        let html = cache
            .html("7", |_| panic!("fetch must not be called"))
            .unwrap();
        assert_eq!(html, "<p>cached</p>");
    }

    #[test]
    fn test_html_fetch_error_is_not_cached() {
        let temp_dir = tempdir().unwrap();
        let cache = DocumentCache::new(temp_dir.path());

        let result = cache.html("9", |id| Err(LexroError::InvalidVersionId(id.to_string())));
        assert!(result.is_err());
        assert!(!cache.path("9").exists());
    }

    #[test]
    fn test_html_rejects_invalid_ver_id() {
        let temp_dir = tempdir().unwrap();
        let cache = DocumentCache::new(temp_dir.path());
        let err = cache
            .html("../secret", |_| Ok(String::new()))
            .unwrap_err();
        assert!(matches!(err, LexroError::InvalidVersionId(_)));
    }

    #[test]
    fn test_fetch_document_uses_cached_page() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("42.html"), PAGE).unwrap();

        // Unreachable base URL: the page must come from the cache.
        let doc = fetch_document(
            "42",
            Some(temp_dir.path()),
            "http://127.0.0.1:9",
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(doc.document.ver_id, "42");
        assert_eq!(doc.document.title.as_deref(), Some("Lege"));
        assert_eq!(doc.articles.len(), 1);
    }
}
