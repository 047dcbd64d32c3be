//! Text extraction over the HTML tree.
//!
//! Extraction never mutates the tree. Elements that the source would have
//! detached before reading text (nested notes, line items, note titles) are
//! passed as `skip` kinds and excluded together with their subtrees. Hidden
//! ellipsis placeholders are always excluded.

use regex::Regex;
use scraper::{ElementRef, Node};
use std::sync::LazyLock;

use super::kind::{classify, ElementKind};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;:!?\)])").expect("valid regex"));

/// Collapse whitespace runs to one space and trim the result.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Collapse whitespace and remove stray spaces before punctuation.
///
/// # Examples
/// ```
/// use lexro::dom::normalize_whitespace;
///
/// assert_eq!(
///     normalize_whitespace("  potrivit  art. 272 ,\n alin. (2) . "),
///     "potrivit art. 272, alin. (2)."
/// );
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    SPACE_BEFORE_PUNCTUATION
        .replace_all(&collapsed, "$1")
        .into_owned()
}

/// Visible text of an element with one space between inline fragments.
///
/// Every text node is trimmed and the fragments are joined by a single
/// space, so text split across links or emphasis spans keeps its word
/// boundaries. The result is normalized with [`normalize_whitespace`].
pub fn spaced_text(element: ElementRef<'_>, skip: &[ElementKind]) -> String {
    let mut fragments = Vec::new();
    collect_fragments(element, skip, &mut fragments);
    normalize_whitespace(&fragments.join(" "))
}

/// Visible text of an element with fragments concatenated directly.
///
/// Used for labels and history link texts, where a single token may be
/// split across several nodes.
pub fn compact_text(element: ElementRef<'_>) -> String {
    let mut fragments = Vec::new();
    collect_fragments(element, &[], &mut fragments);
    collapse_whitespace(&fragments.concat())
}

fn collect_fragments<'a>(element: ElementRef<'a>, skip: &[ElementKind], out: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let fragment = text.trim();
                if !fragment.is_empty() {
                    out.push(fragment);
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !is_skipped(child, skip) {
                        collect_fragments(child, skip, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_skipped(element: ElementRef<'_>, skip: &[ElementKind]) -> bool {
    match classify(element) {
        Some(ElementKind::Ellipsis) => true,
        Some(kind) => skip.contains(&kind),
        None => false,
    }
}
