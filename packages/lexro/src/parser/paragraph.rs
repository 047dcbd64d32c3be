//! Paragraph and sub-item extraction from an article body.
//!
//! The body is a flat run of sibling elements. Numbered paragraphs, plain
//! paragraphs, lettered items and article notes follow each other and the
//! grouping (which items belong to which paragraph) is inferred from their
//! order and labels. The scan is a fold over the children of the body with
//! a [`ParagraphScan`] as the accumulator.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

use super::note::parse_note;
use crate::dom::{
    classify, compact_text, element_children, element_id, find_descendant, find_outermost, spaced_text,
    ElementKind,
};
use crate::types::{Note, Paragraph, SubParagraph};

/// Label written at the start of an item body: `(12)` or `b)`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEADING_ITEM_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\([0-9]+\)|[a-z]\))").expect("valid regex"));

/// Label written at the start of a bare numbered body: `(12)`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEADING_PARAGRAPH_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\([0-9]+\))").expect("valid regex"));

/// A label that opens a new numbered paragraph.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PARAGRAPH_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([0-9]+\)$").expect("valid regex"));

/// Accumulator threaded through the scan of an article body.
///
/// The current paragraph is always the last one pushed, so items that
/// belong to a paragraph are appended to `paragraphs.last_mut()`.
#[derive(Debug, Default)]
struct ParagraphScan {
    paragraphs: Vec<Paragraph>,
    notes: Vec<Note>,
}

impl ParagraphScan {
    fn step(mut self, element: ElementRef<'_>) -> Self {
        match classify(element) {
            Some(ElementKind::Note) => self.notes.push(parse_note(element)),
            Some(ElementKind::Paragraph) => self.paragraphs.push(plain_paragraph(element)),
            Some(ElementKind::NumberedParagraph) => self.paragraphs.push(numbered_paragraph(element)),
            Some(ElementKind::Letter) => self.push_letter(element),
            Some(ElementKind::NumberedParagraphBody) => self.paragraphs.push(bare_paragraph(element)),
            kind => {
                tracing::trace!(
                    id = %element_id(element),
                    ?kind,
                    "Ignoring element in article body"
                );
            }
        }
        self
    }

    fn current(&self) -> Option<&Paragraph> {
        self.paragraphs.last()
    }

    /// Place a lettered item: a new paragraph, an item of the current one,
    /// or a label-less paragraph when nothing can own it.
    fn push_letter(&mut self, element: ElementRef<'_>) {
        let letter = LetterItem::read(element);

        let numbered = PARAGRAPH_LABEL.is_match(&letter.label);
        let starts_paragraph = numbered
            && match self.current() {
                None => true,
                Some(current) => current.label.is_some(),
            };

        if starts_paragraph {
            let paragraph = Paragraph::new(letter.id, letter.text, Some(letter.label)).with_notes(letter.notes);
            self.paragraphs.push(paragraph);
        } else if let Some(current) = self.paragraphs.last_mut() {
            current
                .subparagraphs
                .push(SubParagraph::new(letter.id, letter.label, letter.text));
            current.notes.extend(letter.notes);
        } else {
            let paragraph = Paragraph::new(letter.id, letter.text, None).with_notes(letter.notes);
            self.paragraphs.push(paragraph);
        }
    }
}

/// Extract the paragraphs and article-level notes of an article body.
///
/// Children of the body are visited in document order:
/// - `S_NTA` notes become article notes and contribute no text;
/// - `S_PAR` and `S_ALN` start a new paragraph, taking their `S_LIN` items
///   as sub-paragraphs and their nested `S_PAR` notes as paragraph notes;
/// - `S_LIT` items either start a numbered paragraph or extend the current
///   one, depending on their label;
/// - a bare `S_ALN_BDY` starts a paragraph labelled from its leading `(n)`.
///
/// Other elements are ignored.
pub fn extract_paragraphs(body: ElementRef<'_>) -> (Vec<Paragraph>, Vec<Note>) {
    let scan = element_children(body).fold(ParagraphScan::default(), ParagraphScan::step);
    (scan.paragraphs, scan.notes)
}

/// `S_PAR` paragraph: the whole element is the text, no label.
fn plain_paragraph(element: ElementRef<'_>) -> Paragraph {
    let text = spaced_text(element, &[ElementKind::Paragraph, ElementKind::Line]);

    Paragraph {
        par_id: element_id(element),
        text,
        label: None,
        subparagraphs: line_items(element),
        notes: embedded_notes(element),
    }
}

/// `S_ALN` paragraph: label from `S_ALN_TTL`, text from `S_ALN_BDY`.
fn numbered_paragraph(element: ElementRef<'_>) -> Paragraph {
    let scope = find_descendant(element, ElementKind::NumberedParagraphBody).unwrap_or(element);
    let text = spaced_text(
        scope,
        &[
            ElementKind::Paragraph,
            ElementKind::Line,
            ElementKind::NumberedParagraphTitle,
        ],
    );
    let label = find_descendant(element, ElementKind::NumberedParagraphTitle)
        .map(compact_text)
        .filter(|label| !label.is_empty());

    Paragraph {
        par_id: element_id(element),
        text,
        label,
        subparagraphs: line_items(element),
        notes: embedded_notes(scope),
    }
}

/// `S_ALN_BDY` found directly in the article body.
fn bare_paragraph(element: ElementRef<'_>) -> Paragraph {
    let text = spaced_text(element, &[ElementKind::Paragraph, ElementKind::Line]);
    let (label, text) = match split_leading_label(&LEADING_PARAGRAPH_LABEL, &text) {
        Some((label, rest)) => (Some(label), rest),
        None => (None, text),
    };

    Paragraph {
        par_id: element_id(element),
        text,
        label,
        subparagraphs: line_items(element),
        notes: embedded_notes(element),
    }
}

/// Parsed `S_LIT` element before it is placed.
#[derive(Debug)]
struct LetterItem {
    id: String,
    label: String,
    text: String,
    notes: Vec<Note>,
}

impl LetterItem {
    fn read(element: ElementRef<'_>) -> Self {
        let scope = find_descendant(element, ElementKind::LetterBody).unwrap_or(element);
        let text = spaced_text(scope, &[ElementKind::Paragraph, ElementKind::LetterTitle]);
        let label = find_descendant(element, ElementKind::LetterTitle)
            .map(compact_text)
            .unwrap_or_default();

        // Some pages leave S_LIT_TTL empty and write the label in the body.
        let (label, text) = if label.is_empty() {
            split_leading_label(&LEADING_ITEM_LABEL, &text).unwrap_or((label, text))
        } else {
            (label, text)
        };

        Self {
            id: element_id(element),
            label,
            text,
            notes: embedded_notes(scope),
        }
    }
}

/// `S_LIN` items of a paragraph, as sub-paragraphs.
fn line_items(element: ElementRef<'_>) -> Vec<SubParagraph> {
    find_outermost(element, ElementKind::Line)
        .into_iter()
        .map(|item| {
            let label = find_descendant(item, ElementKind::LineTitle)
                .map(compact_text)
                .unwrap_or_default();
            let text = match find_descendant(item, ElementKind::LineBody) {
                Some(body) => spaced_text(body, &[ElementKind::Paragraph]),
                None => spaced_text(item, &[ElementKind::Paragraph, ElementKind::LineTitle]),
            };
            SubParagraph::new(element_id(item), label, text)
        })
        .collect()
}

/// Notes embedded as nested `S_PAR` elements.
fn embedded_notes(scope: ElementRef<'_>) -> Vec<Note> {
    find_outermost(scope, ElementKind::Paragraph)
        .into_iter()
        .map(parse_note)
        .collect()
}

/// Split a leading label off a text, returning `(label, rest)`.
fn split_leading_label(pattern: &Regex, text: &str) -> Option<(String, String)> {
    let found = pattern.find(text)?;
    let rest = text[found.end()..].trim_start().to_string();
    Some((found.as_str().to_string(), rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    fn scan(body_html: &str) -> (Vec<Paragraph>, Vec<Note>) {
        let html = format!(r#"<span class="S_ART_BDY" id="body">{body_html}</span>"#);
        let page = Html::parse_fragment(&html);
        let selector = Selector::parse("#body").unwrap();
        extract_paragraphs(page.select(&selector).next().unwrap())
    }

    fn letter(id: &str, label: &str, text: &str) -> String {
        format!(
            r#"<span class="S_LIT" id="{id}"><span class="S_LIT_TTL">{label}</span><span class="S_LIT_BDY">{text}</span></span>"#
        )
    }

    #[test]
    fn test_plain_and_numbered_paragraphs() {
        let (paragraphs, notes) = scan(concat!(
            r#"<span class="S_PAR" id="p1">First paragraph.</span>"#,
            r#"<span class="S_ALN" id="p2"><span class="S_ALN_TTL">(1)</span>"#,
            r#"<span class="S_ALN_BDY">Second paragraph.</span></span>"#,
        ));
        assert!(notes.is_empty());
        assert_eq!(
            paragraphs,
            vec![
                Paragraph::new("p1", "First paragraph.", None),
                Paragraph::new("p2", "Second paragraph.", Some("(1)".to_string())),
            ]
        );
    }

    #[test]
    fn test_letters_attach_to_current_paragraph() {
        let body = format!(
            r#"<span class="S_ALN" id="p1"><span class="S_ALN_TTL">(1)</span><span class="S_ALN_BDY">Intro:</span></span>{}{}"#,
            letter("a", "a)", "first;"),
            letter("b", "b)", "second.")
        );
        let (paragraphs, _) = scan(&body);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(
            paragraphs[0].subparagraphs,
            vec![
                SubParagraph::new("a", "a)", "first;"),
                SubParagraph::new("b", "b)", "second."),
            ]
        );
    }

    #[test]
    fn test_numbered_letters_start_paragraphs() {
        let body = [
            letter("l1", "", "(1) Intro paragraph."),
            letter("l2", "", "a) First item."),
            letter("l3", "", "b) Second item."),
            letter("l4", "", "(2) Second paragraph."),
        ]
        .concat();
        let (paragraphs, _) = scan(&body);

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].label.as_deref(), Some("(1)"));
        assert_eq!(paragraphs[0].text, "Intro paragraph.");
        assert_eq!(
            paragraphs[0].subparagraphs,
            vec![
                SubParagraph::new("l2", "a)", "First item."),
                SubParagraph::new("l3", "b)", "Second item."),
            ]
        );
        assert_eq!(paragraphs[1].label.as_deref(), Some("(2)"));
        assert_eq!(paragraphs[1].text, "Second paragraph.");
        assert!(paragraphs[1].subparagraphs.is_empty());
    }

    #[test]
    fn test_numbered_letter_under_unlabelled_paragraph_is_item() {
        let body = format!(
            r#"<span class="S_PAR" id="p1">Main paragraph.</span>{}{}"#,
            letter("a", "", "a) Lettered item."),
            letter("n", "", "(1) Numbered item.")
        );
        let (paragraphs, _) = scan(&body);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(
            paragraphs[0].subparagraphs,
            vec![
                SubParagraph::new("a", "a)", "Lettered item."),
                SubParagraph::new("n", "(1)", "Numbered item."),
            ]
        );
    }

    #[test]
    fn test_stray_letter_becomes_unlabelled_paragraph() {
        let (paragraphs, _) = scan(&letter("a", "a)", "Orphan item."));
        assert_eq!(paragraphs, vec![Paragraph::new("a", "Orphan item.", None)]);
    }

    #[test]
    fn test_line_items_become_subparagraphs() {
        let (paragraphs, _) = scan(concat!(
            r#"<span class="S_ALN" id="p1"><span class="S_ALN_TTL">(2)</span><span class="S_ALN_BDY">Sunt:"#,
            r#"<span class="S_LIN" id="l1"><span class="S_LIN_TTL">–</span><span class="S_LIN_BDY">primul;</span></span>"#,
            r#"<span class="S_LIN" id="l2"><span class="S_LIN_TTL">–</span><span class="S_LIN_BDY">al doilea.</span></span>"#,
            r#"</span></span>"#,
        ));
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text, "Sunt:");
        assert_eq!(
            paragraphs[0].subparagraphs,
            vec![
                SubParagraph::new("l1", "–", "primul;"),
                SubParagraph::new("l2", "–", "al doilea."),
            ]
        );
    }

    #[test]
    fn test_notes_are_split_from_text() {
        let (paragraphs, notes) = scan(concat!(
            r#"<span class="S_ALN" id="p1"><span class="S_ALN_TTL">(1)</span><span class="S_ALN_BDY">"#,
            r#"Paragraph text.<span class="S_PAR" id="n1">(la 01-01-2020, paragraph changed)</span>"#,
            r#"</span></span>"#,
            r#"<span class="S_NTA" id="n2"><span class="S_NTA_TTL">Notă</span><span>Article note.</span></span>"#,
        ));
        assert_eq!(paragraphs[0].text, "Paragraph text.");
        assert_eq!(paragraphs[0].notes.len(), 1);
        assert_eq!(paragraphs[0].notes[0].note_id, "n1");
        assert_eq!(paragraphs[0].notes[0].text, "(la 01-01-2020, paragraph changed)");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Article note.");
    }

    #[test]
    fn test_letter_notes_go_to_owning_paragraph() {
        let body = format!(
            r#"<span class="S_PAR" id="p1">Intro.</span>{}"#,
            letter("a", "a)", r#"item;<span class="S_PAR" id="n1">(la 02.02.2021, litera a) a fost modificată)</span>"#)
        );
        let (paragraphs, _) = scan(&body);
        assert_eq!(paragraphs[0].subparagraphs[0].text, "item;");
        assert_eq!(paragraphs[0].notes.len(), 1);
        assert_eq!(paragraphs[0].notes[0].subject.as_deref(), Some("litera a)"));
    }

    #[test]
    fn test_bare_numbered_body() {
        let (paragraphs, _) = scan(r#"<span class="S_ALN_BDY" id="b1">(3) Bare paragraph.</span>"#);
        assert_eq!(
            paragraphs,
            vec![Paragraph::new("b1", "Bare paragraph.", Some("(3)".to_string()))]
        );
    }

    #[test]
    fn test_unknown_elements_are_ignored() {
        let (paragraphs, notes) = scan(r#"<span class="OTHER">x</span><span class="S_LIN">y</span>"#);
        assert!(paragraphs.is_empty());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_paragraph_order_is_preserved() {
        let body: String = (1..=5)
            .map(|n| format!(r#"<span class="S_PAR" id="p{n}">Paragraph {n}.</span>"#))
            .collect();
        let (paragraphs, _) = scan(&body);
        let ids: Vec<_> = paragraphs.iter().map(|p| p.par_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5"]);
    }
}
