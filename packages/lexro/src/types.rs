//! Core data types produced by the parser.
//!
//! Every record is a plain value: the parser builds them once and hands the
//! finished tree to the caller. Optional fields serialize as `null` so that
//! JSON and YAML output always carry the same keys.

use serde::{Deserialize, Serialize};

/// Version entry from the consolidation history of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identifier of the listed version.
    pub ver_id: String,

    /// Consolidation date as printed on the page (`DD.MM.YYYY`).
    pub date: String,
}

impl HistoryEntry {
    /// Create a new history entry.
    #[must_use]
    pub fn new(ver_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            ver_id: ver_id.into(),
            date: date.into(),
        }
    }
}

/// Metadata about the parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Public URL of the document version.
    pub source: String,

    /// Identifier of the document version.
    pub ver_id: String,

    /// Document title (meta title, else the page title).
    pub title: Option<String>,

    /// Content of the description meta tag.
    pub description: Option<String>,

    /// Content of the keywords meta tag.
    pub keywords: Option<String>,

    /// Earlier versions, in the order the page lists them.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,

    /// Identifier of the previous version, if any.
    pub prev_ver: Option<String>,

    /// Identifier of the next version, if any.
    pub next_ver: Option<String>,
}

/// Amendment note attached to an article or paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identifier of the note element.
    pub note_id: String,

    /// Whitespace-normalized note text without the note title.
    pub text: String,

    /// Date the amendment took effect.
    pub date: Option<String>,

    /// Portion of the document that was modified.
    pub subject: Option<String>,

    /// Number of the amending law.
    pub law_number: Option<String>,

    /// Date of the amending law.
    pub law_date: Option<String>,

    /// Number of the Monitorul Oficial issue.
    pub monitor_number: Option<String>,

    /// Date of the Monitorul Oficial issue.
    pub monitor_date: Option<String>,

    /// Phrase that was replaced.
    pub replaced: Option<String>,

    /// Phrase that replaced it.
    pub replacement: Option<String>,
}

/// Lettered, numbered or dash-prefixed item inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubParagraph {
    /// Identifier of the item element.
    pub sub_id: String,

    /// Label such as `a)`, `(1)` or `–`; empty when the source has none.
    pub label: String,

    /// Item text without the label.
    pub text: String,
}

impl SubParagraph {
    /// Create a new sub-paragraph.
    #[must_use]
    pub fn new(sub_id: impl Into<String>, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sub_id: sub_id.into(),
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Paragraph of an article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Identifier of the paragraph element.
    pub par_id: String,

    /// Paragraph text without the label.
    pub text: String,

    /// Numeric label such as `(1)`, if present.
    pub label: Option<String>,

    /// Items in source order.
    #[serde(default)]
    pub subparagraphs: Vec<SubParagraph>,

    /// Notes embedded in the paragraph.
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Paragraph {
    /// Create a paragraph without items or notes.
    #[must_use]
    pub fn new(par_id: impl Into<String>, text: impl Into<String>, label: Option<String>) -> Self {
        Self {
            par_id: par_id.into(),
            text: text.into(),
            label,
            subparagraphs: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Attach paragraph-level notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }
}

/// A single article of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier of the article element.
    pub article_id: String,

    /// Article label with the "Articolul " prefix removed (e.g. `"5"`).
    pub label: String,

    /// Text recomposed from the paragraphs and their items.
    pub full_text: String,

    /// Paragraphs in source order.
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,

    /// Article-level notes.
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// Subsection grouping articles inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    pub subsection_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub placeholder: bool,
    #[serde(default)]
    pub articles: Vec<String>,
}

/// Section grouping nested sections, subsections and articles.
///
/// Sections whose title carries a dotted number (`2.3`) nest under the
/// section numbered by the prefix (`2`); `level` is the number of dotted
/// segments, or the structural depth for unnumbered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section_id: String,
    pub title: String,
    pub description: Option<String>,
    pub level: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub placeholder: bool,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
    #[serde(default)]
    pub articles: Vec<String>,
}

/// Chapter grouping sections and articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub placeholder: bool,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub articles: Vec<String>,
}

/// Title grouping chapters, sections and articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub title_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub placeholder: bool,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub articles: Vec<String>,
}

/// Book, the root container of the document hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub placeholder: bool,
    #[serde(default)]
    pub titles: Vec<Title>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub articles: Vec<String>,
}

/// Complete parse result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Document metadata and version history.
    pub document: DocumentInfo,

    /// All articles in document order, regardless of hierarchy position.
    pub articles: Vec<Article>,

    /// Root containers with nested titles, chapters, sections and article ids.
    #[serde(default)]
    pub books: Vec<Book>,
}

impl ParsedDocument {
    /// Find an article by its element id.
    #[must_use]
    pub fn article(&self, article_id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.article_id == article_id)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
