//! Document metadata and version history.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::config::source_url;
use crate::dom::compact_text;
use crate::types::{DocumentInfo, HistoryEntry};

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static META_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="title"]"#).expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static META_KEYWORDS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="keywords"]"#).expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static PAGE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));

/// Links of the consolidation history list.
#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static HISTORY_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#istoric_fa a").expect("valid selector"));

/// Version id as the last numeric path segment, before any query string.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HREF_VER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)(?:\?|$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HISTORY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}\.\d{2}\.\d{4})").expect("valid regex"));

/// Extract the [`DocumentInfo`] of a page.
///
/// `ver_id` is not read from the page: it names the version that was
/// requested and is used to build the `source` URL.
pub fn extract_document_info(page: &Html, ver_id: &str) -> DocumentInfo {
    let title = meta_content(page, &META_TITLE)
        .filter(|content| !content.is_empty())
        .or_else(|| page_title(page));
    let history = extract_history(page);
    let prev_ver = history.first().map(|entry| entry.ver_id.clone());

    DocumentInfo {
        source: source_url(ver_id),
        ver_id: ver_id.to_string(),
        title,
        description: meta_content(page, &META_DESCRIPTION),
        keywords: meta_content(page, &META_KEYWORDS),
        history,
        prev_ver,
        next_ver: None,
    }
}

/// Parse the consolidation history list, in page order.
///
/// Links without an `href` (the current version) and links whose version
/// id or date cannot be found are skipped.
pub fn extract_history(page: &Html) -> Vec<HistoryEntry> {
    page.select(&HISTORY_LINKS)
        .filter_map(history_entry)
        .collect()
}

fn history_entry(link: ElementRef<'_>) -> Option<HistoryEntry> {
    let href = link.value().attr("href").filter(|href| !href.is_empty())?;

    let Some(ver_id) = HREF_VER_ID.captures(href).and_then(|caps| caps.get(1)) else {
        tracing::trace!(href, "History link without version id");
        return None;
    };

    // The visible text usually is the date; the title attribute repeats it
    // as "Consolidarea din DD.MM.YYYY".
    let text = compact_text(link);
    let date_source = if HISTORY_DATE.is_match(&text) {
        text.as_str()
    } else {
        link.value().attr("title").unwrap_or_default()
    };

    let Some(date) = HISTORY_DATE.captures(date_source).and_then(|caps| caps.get(1)) else {
        tracing::trace!(href, "History link without date");
        return None;
    };

    Some(HistoryEntry::new(ver_id.as_str(), date.as_str()))
}

fn meta_content(page: &Html, selector: &Selector) -> Option<String> {
    page.select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

fn page_title(page: &Html) -> Option<String> {
    page.select(&PAGE_TITLE)
        .next()
        .map(compact_text)
        .filter(|title| !title.is_empty())
}
