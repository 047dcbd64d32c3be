//! Configuration constants and validation functions.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::error::{LexroError, Result};

/// Base URL of the document detail pages on legislatie.just.ro.
pub const SOURCE_BASE_URL: &str = "https://legislatie.just.ro/Public/DetaliiDocument";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Name of the cache directory created under the user's home directory.
pub const CACHE_DIR_NAME: &str = ".leropa";

/// Text wrap width for Markdown output.
pub const TEXT_WRAP_WIDTH: usize = 100;

/// Environment variable naming a log file for the CLI.
pub const LOG_FILE_ENV: &str = "LEXRO_LOG_FILE";

/// Version id pattern: one or more ASCII digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static VER_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// Validate a document version identifier.
///
/// # Examples
/// ```
/// use lexro::config::validate_ver_id;
///
/// assert!(validate_ver_id("120341").is_ok());
/// assert!(validate_ver_id("12a").is_err());
/// ```
pub fn validate_ver_id(ver_id: &str) -> Result<()> {
    if VER_ID_PATTERN.is_match(ver_id) {
        Ok(())
    } else {
        Err(LexroError::InvalidVersionId(ver_id.to_string()))
    }
}

/// Build the public URL of a document version.
///
/// The parser stores this URL in `DocumentInfo::source`.
///
/// # Examples
/// ```
/// use lexro::config::source_url;
///
/// assert_eq!(
///     source_url("120341"),
///     "https://legislatie.just.ro/Public/DetaliiDocument/120341"
/// );
/// ```
pub fn source_url(ver_id: &str) -> String {
    document_url(SOURCE_BASE_URL, ver_id)
}

/// Build a document URL against an arbitrary base (used for testing mirrors).
pub fn document_url(base_url: &str, ver_id: &str) -> String {
    format!("{}/{ver_id}", base_url.trim_end_matches('/'))
}

/// Default directory of the HTML cache (`~/.leropa`).
pub fn default_cache_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CACHE_DIR_NAME))
        .ok_or(LexroError::NoHomeDirectory)
}
