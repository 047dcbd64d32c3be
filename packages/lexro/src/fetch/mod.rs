//! Retrieval of document pages: HTTP download and the on-disk page cache.
//!
//! This sits outside the parsing core; the parser only ever sees page text.

pub mod cache;
pub mod http;

pub use cache::{fetch_document, DocumentCache};
pub use http::{create_client, download_html};
