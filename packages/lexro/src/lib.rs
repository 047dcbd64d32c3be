//! Lexro - Parse Romanian legislation pages from legislatie.just.ro.
//!
//! This crate turns the HTML page of a consolidated legal act into a
//! structured document: metadata and version history, articles with their
//! paragraphs, lettered items and amendment notes, and the book / title /
//! chapter / section / subsection hierarchy the articles belong to.
//!
//! # Example
//!
//! ```
//! use lexro::parse_html;
//!
//! let html = r#"<html><head><meta name="title" content="Lege"></head><body>
//!   <span class="S_ART" id="art1">
//!     <span class="S_ART_TTL">Articolul 1</span>
//!     <span class="S_ART_BDY">
//!       <span class="S_ALN" id="aln1">
//!         <span class="S_ALN_TTL">(1)</span>
//!         <span class="S_ALN_BDY">Prezenta lege reglementează.</span>
//!       </span>
//!     </span>
//!   </span>
//! </body></html>"#;
//!
//! let doc = parse_html(html, "120341");
//! assert_eq!(doc.document.title.as_deref(), Some("Lege"));
//! assert_eq!(doc.articles[0].paragraphs[0].label.as_deref(), Some("(1)"));
//! assert_eq!(doc.articles[0].full_text, "(1) Prezenta lege reglementează.");
//! ```
//!
//! # Architecture
//!
//! - [`dom`]: element classification, navigation and text extraction
//! - [`parser`]: metadata, notes, paragraphs and articles
//! - [`hierarchy`]: container arena and article placement
//! - [`types`]: output data model
//! - [`fetch`]: page download and on-disk cache
//! - [`export`]: JSON, YAML and Markdown output
//! - [`config`]: constants and validation
//! - [`error`]: error type and Result alias
//! - [`cli`]: command-line interface

pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod export;
pub mod fetch;
pub mod hierarchy;
pub mod parser;
pub mod types;

// Re-export the parsing entry points
pub use parser::{parse_html, parse_html_with, ParseOptions};

// Re-export commonly used items
pub use config::validate_ver_id;
pub use error::{LexroError, Result};
pub use fetch::fetch_document;
pub use types::{
    Article, Book, Chapter, DocumentInfo, HistoryEntry, Note, Paragraph, ParsedDocument, Section,
    SubParagraph, Subsection, Title,
};
