//! Article assembly.

use scraper::ElementRef;

use super::paragraph::extract_paragraphs;
use crate::dom::{element_id, find_descendant, normalize_whitespace, spaced_text, ElementKind};
use crate::types::{Article, Paragraph};

/// Prefix of article headings ("Articolul 5").
const ARTICLE_PREFIX: &str = "Articolul ";

/// Build an [`Article`] from an `S_ART` element.
///
/// Returns `None` when the article has no `S_ART_BDY`; such articles are
/// dropped from the output without failing the parse.
pub fn build_article(element: ElementRef<'_>) -> Option<Article> {
    let article_id = element_id(element);

    let Some(body) = find_descendant(element, ElementKind::ArticleBody) else {
        tracing::debug!(article_id = %article_id, "Skipping article without body");
        return None;
    };

    let label = find_descendant(element, ElementKind::ArticleTitle)
        .map(|title| article_label(&spaced_text(title, &[])))
        .unwrap_or_default();

    let (paragraphs, notes) = extract_paragraphs(body);
    let full_text = compose_full_text(&paragraphs);

    Some(Article {
        article_id,
        label,
        full_text,
        paragraphs,
        notes,
    })
}

/// Strip the "Articolul " prefix from an article heading.
///
/// Only the exact, case-sensitive prefix is removed; other headings are
/// kept as they are.
///
/// # Examples
/// ```
/// use lexro::parser::article_label;
///
/// assert_eq!(article_label("Articolul 5"), "5");
/// assert_eq!(article_label("Articolul 12^1"), "12^1");
/// assert_eq!(article_label("ARTICOLUL 5"), "ARTICOLUL 5");
/// ```
pub fn article_label(heading: &str) -> String {
    heading
        .strip_prefix(ARTICLE_PREFIX)
        .unwrap_or(heading)
        .trim()
        .to_string()
}

/// Recompose the text of an article from its paragraphs.
///
/// Each paragraph contributes its label and text followed by the label and
/// text of each of its items. Notes and hidden placeholders never reach the
/// paragraphs, so they never appear here either.
pub fn compose_full_text(paragraphs: &[Paragraph]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for paragraph in paragraphs {
        if let Some(label) = &paragraph.label {
            parts.push(label);
        }
        parts.push(&paragraph.text);
        for sub in &paragraph.subparagraphs {
            parts.push(&sub.label);
            parts.push(&sub.text);
        }
    }
    normalize_whitespace(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubParagraph;
    use scraper::{Html, Selector};

    fn build(html: &str) -> Option<Article> {
        let page = Html::parse_fragment(html);
        let selector = Selector::parse(".S_ART").unwrap();
        build_article(page.select(&selector).next().unwrap())
    }

    #[test]
    fn test_build_article_reads_label_and_text() {
        let article = build(concat!(
            r#"<span class="S_ART" id="art5"><span class="S_ART_TTL">Articolul 5</span>"#,
            r#"<span class="S_ART_BDY"><span class="S_PAR" id="p1">Text of the article.</span></span></span>"#,
        ))
        .unwrap();
        assert_eq!(article.article_id, "art5");
        assert_eq!(article.label, "5");
        assert_eq!(article.full_text, "Text of the article.");
    }

    #[test]
    fn test_build_article_without_title_has_empty_label() {
        let article = build(r#"<span class="S_ART" id="a"><span class="S_ART_BDY">x</span></span>"#).unwrap();
        assert_eq!(article.label, "");
        assert!(article.paragraphs.is_empty());
    }

    #[test]
    fn test_build_article_without_body_is_skipped() {
        assert!(build(r#"<span class="S_ART" id="a"><span class="S_ART_TTL">Articolul 1</span></span>"#).is_none());
    }

    #[test]
    fn test_full_text_excludes_ellipsis() {
        let article = build(concat!(
            r#"<span class="S_ART" id="a"><span class="S_ART_BDY">"#,
            r#"<span class="S_LIT" id="l1"><span class="S_LIT_TTL">a)</span>"#,
            r#"<span class="S_LIT_BDY"><span class="S_LIT_SHORT">...</span>Real body text.</span></span>"#,
            r#"</span></span>"#,
        ))
        .unwrap();
        assert!(!article.full_text.contains("..."));
        assert!(article.full_text.contains("Real body text."));
    }

    #[test]
    fn test_full_text_keeps_spaces_around_links() {
        let article = build(concat!(
            r#"<span class="S_ART" id="a"><span class="S_ART_BDY">"#,
            r#"<span class="S_PAR" id="p">potrivit<a href="/x">art. 272</a>din Codul civil</span>"#,
            r#"</span></span>"#,
        ))
        .unwrap();
        assert_eq!(article.full_text, "potrivit art. 272 din Codul civil");
    }

    #[test]
    fn test_compose_full_text_orders_labels_and_items() {
        let mut first = Paragraph::new("p1", "Intro:", Some("(1)".to_string()));
        first.subparagraphs = vec![
            SubParagraph::new("a", "a)", "one;"),
            SubParagraph::new("b", "b)", "two."),
        ];
        let second = Paragraph::new("p2", "Closing.", Some("(2)".to_string()));

        assert_eq!(
            compose_full_text(&[first, second]),
            "(1) Intro: a) one; b) two. (2) Closing."
        );
    }

    #[test]
    fn test_compose_full_text_skips_empty_parts() {
        let mut paragraph = Paragraph::new("p", "Items:", None);
        paragraph.subparagraphs = vec![SubParagraph::new("l", "", "unlabelled")];
        assert_eq!(compose_full_text(&[paragraph]), "Items: unlabelled");
    }
}
