//! Amendment note parsing.
//!
//! Notes are free-form Romanian prose such as
//! "(la 01-01-2020, Alin. (2) al art. 287 a fost modificat de ... LEGEA nr. 60
//! din 10 aprilie 2012, publicată în MONITORUL OFICIAL nr. 255 din ...)".
//! Each field is mined by an independent pattern and stays `None` when its
//! pattern does not match.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

use crate::dom::{element_id, spaced_text, ElementKind};
use crate::types::Note;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"la (\d{2}[.-]\d{2}[.-]\d{4})").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SUBJECT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*(.*?)\s+a fost").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LAW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)LEGEA nr\.\s*(\d+)\s+din\s+([0-9]{1,2} [a-zăâîșțşţ]+ [0-9]{4})")
        .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MONITOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)MONITORUL OFICIAL nr\.\s*(\d+)\s+din\s+([0-9]{1,2} [a-zăâîșțşţ]+ [0-9]{4})")
        .expect("valid regex")
});

/// Phrase replacement, with straight or Romanian typographic quotes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REPLACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)înlocuirea sintagmei ["„“”]([^"„“”]+)["“”] cu sintagma ["„“”]([^"„“”]+)["“”]"#,
    )
    .expect("valid regex")
});

/// Fields mined from the text of a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDetails {
    pub date: Option<String>,
    pub subject: Option<String>,
    pub law_number: Option<String>,
    pub law_date: Option<String>,
    pub monitor_number: Option<String>,
    pub monitor_date: Option<String>,
    pub replaced: Option<String>,
    pub replacement: Option<String>,
}

/// Extract the structured fields of a normalized note text.
///
/// The subject is only looked for when a date was found, since it is the
/// clause between the date and "a fost".
///
/// # Examples
/// ```
/// use lexro::parser::parse_note_details;
///
/// let details = parse_note_details("(la 01-01-2020, Alin. (2) a fost abrogat.)");
/// assert_eq!(details.date.as_deref(), Some("01-01-2020"));
/// assert_eq!(details.subject.as_deref(), Some("Alin. (2)"));
/// assert!(details.law_number.is_none());
/// ```
pub fn parse_note_details(text: &str) -> NoteDetails {
    let date = capture(&DATE_PATTERN, text, 1);
    let subject = date
        .as_ref()
        .and_then(|_| capture(&SUBJECT_PATTERN, text, 1));

    let (law_number, law_date) = capture_pair(&LAW_PATTERN, text);
    let (monitor_number, monitor_date) = capture_pair(&MONITOR_PATTERN, text);
    let (replaced, replacement) = capture_pair(&REPLACE_PATTERN, text);

    NoteDetails {
        date,
        subject,
        law_number,
        law_date,
        monitor_number,
        monitor_date,
        replaced,
        replacement,
    }
}

/// Build a [`Note`] from a note element.
///
/// Works for both article-level notes (`S_NTA`, whose `S_NTA_TTL` heading
/// is left out of the text) and notes embedded in a paragraph body.
pub fn parse_note(element: ElementRef<'_>) -> Note {
    let text = spaced_text(element, &[ElementKind::NoteTitle]);
    let details = parse_note_details(&text);

    Note {
        note_id: element_id(element),
        text,
        date: details.date,
        subject: details.subject,
        law_number: details.law_number,
        law_date: details.law_date,
        monitor_number: details.monitor_number,
        monitor_date: details.monitor_date,
        replaced: details.replaced,
        replacement: details.replacement,
    }
}

fn capture(pattern: &Regex, text: &str, group: usize) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().to_string())
}

fn capture_pair(pattern: &Regex, text: &str) -> (Option<String>, Option<String>) {
    match pattern.captures(text) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().to_string()),
            caps.get(2).map(|m| m.as_str().to_string()),
        ),
        None => (None, None),
    }
}
