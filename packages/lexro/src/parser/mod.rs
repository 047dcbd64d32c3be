//! HTML structural parser for legislatie.just.ro documents.
//!
//! Parsing is a pure function of the page text and the requested version
//! id. Malformed but parseable input never fails: unknown elements are
//! skipped, missing labels and headings degrade to empty values, and an
//! article without a body is dropped on its own.

pub mod article;
pub mod metadata;
pub mod note;
pub mod paragraph;

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::hierarchy::HierarchyResolver;
use crate::types::ParsedDocument;

pub use article::{article_label, build_article, compose_full_text};
pub use metadata::{extract_document_info, extract_history};
pub use note::{parse_note, parse_note_details, NoteDetails};
pub use paragraph::extract_paragraphs;

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static ARTICLES: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".S_ART").expect("valid selector"));

/// Options controlling how a document is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Insert placeholder containers for missing intermediate levels
    /// (e.g. a chapter between a book and a section). Off by default: a
    /// container then attaches to the nearest present ancestor.
    pub placeholders: bool,
}

impl ParseOptions {
    /// Enable or disable placeholder containers.
    #[must_use]
    pub fn with_placeholders(mut self, placeholders: bool) -> Self {
        self.placeholders = placeholders;
        self
    }
}

/// Parse a document page with default options.
///
/// # Examples
/// ```
/// use lexro::parser::parse_html;
///
/// let html = r#"<span class="S_ART" id="art1">
///     <span class="S_ART_TTL">Articolul 1</span>
///     <span class="S_ART_BDY"><span class="S_PAR" id="p1">Text.</span></span>
/// </span>"#;
///
/// let doc = parse_html(html, "123");
/// assert_eq!(doc.document.ver_id, "123");
/// assert_eq!(doc.articles[0].label, "1");
/// assert_eq!(doc.articles[0].full_text, "Text.");
/// ```
pub fn parse_html(html: &str, ver_id: &str) -> ParsedDocument {
    parse_html_with(html, ver_id, &ParseOptions::default())
}

/// Parse a document page.
///
/// Every `S_ART` element is built into an [`Article`](crate::types::Article)
/// and placed in the container hierarchy; the flat article list keeps
/// document order.
pub fn parse_html_with(html: &str, ver_id: &str, options: &ParseOptions) -> ParsedDocument {
    let page = Html::parse_document(html);
    let document = extract_document_info(&page, ver_id);

    let mut resolver = HierarchyResolver::new(options.placeholders);
    let mut articles = Vec::new();
    for element in page.select(&ARTICLES) {
        let Some(article) = build_article(element) else {
            continue;
        };
        resolver.place_article(element, &article.article_id);
        articles.push(article);
    }

    let books = resolver.into_books();
    tracing::debug!(
        ver_id,
        articles = articles.len(),
        books = books.len(),
        "Parsed document"
    );

    ParsedDocument {
        document,
        articles,
        books,
    }
}
