//! HTTP client for downloading document pages from legislatie.just.ro.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::{document_url, validate_ver_id, HTTP_TIMEOUT_SECS};
use crate::error::{LexroError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("lexro/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with timeout and user agent.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download the HTML page of a document version.
///
/// A single request is made; connection failures and non-success statuses
/// are returned as [`LexroError::Download`].
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `base_url` - Base of the document pages (usually [`crate::config::SOURCE_BASE_URL`])
/// * `ver_id` - Numeric version identifier
pub fn download_html(client: &Client, base_url: &str, ver_id: &str) -> Result<String> {
    validate_ver_id(ver_id)?;

    let url = document_url(base_url, ver_id);
    tracing::info!(url = %url, "Downloading document");

    let wrap = |source: reqwest::Error| LexroError::Download {
        ver_id: ver_id.to_string(),
        source,
    };

    let response = client.get(&url).send().map_err(wrap)?;
    let response = response.error_for_status().map_err(wrap)?;
    let html = response.text().map_err(wrap)?;

    tracing::debug!(ver_id, bytes = html.len(), "Downloaded document");
    Ok(html)
}
