//! Error types for lexro.
//!
//! The HTML parser itself never fails on malformed-but-parseable input;
//! these errors cover the collaborators around it (fetching, caching,
//! serialization and the CLI).

use thiserror::Error;

/// Main error type for the lexro library.
#[derive(Debug, Error)]
pub enum LexroError {
    /// Invalid document version identifier.
    #[error("Invalid version id: '{0}'. Expected a numeric identifier (e.g., 120341)")]
    InvalidVersionId(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download the HTML page for a version.
    #[error("Failed to download document {ver_id}: {source}")]
    Download {
        ver_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Workbook could not be built.
    #[error("Spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Requested format is not supported for the operation.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The home directory could not be determined for the default cache.
    #[error("Could not determine the home directory for the document cache")]
    NoHomeDirectory,
}

/// Result type alias for lexro operations.
pub type Result<T> = std::result::Result<T, LexroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LexroError::InvalidVersionId("abc".to_string());
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = "xml".parse::<crate::export::Format>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported output format: 'xml', expected one of: json, yaml, xlsx"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LexroError = io.into();
        assert!(matches!(err, LexroError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }
}
