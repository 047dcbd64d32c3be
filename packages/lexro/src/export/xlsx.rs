//! Spreadsheet export.
//!
//! A parsed document is flattened into one sheet per record type: Document,
//! HistoryEntry, Book, Title, Chapter, Section, Article, Paragraph,
//! SubParagraph and Note. Every row carries its own id and a `parent_id`
//! column pointing at the row that contains it; nested records are listed
//! in the parent row as comma-separated ids. Subsections share the Section
//! sheet. Sheets without rows are left out of the workbook.

use std::collections::HashMap;

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::types::{Article, Book, Chapter, Note, Paragraph, ParsedDocument, Section, Subsection, Title};

const DOCUMENT_COLUMNS: &[&str] = &[
    "ver_id",
    "source",
    "title",
    "description",
    "keywords",
    "history",
    "prev_ver",
    "next_ver",
    "books",
];
const HISTORY_COLUMNS: &[&str] = &["ver_id", "date", "parent_id"];
const BOOK_COLUMNS: &[&str] = &[
    "book_id",
    "title",
    "description",
    "placeholder",
    "titles",
    "chapters",
    "sections",
    "articles",
    "parent_id",
];
const TITLE_COLUMNS: &[&str] = &[
    "title_id",
    "title",
    "description",
    "placeholder",
    "chapters",
    "sections",
    "articles",
    "parent_id",
];
const CHAPTER_COLUMNS: &[&str] = &[
    "chapter_id",
    "title",
    "description",
    "placeholder",
    "sections",
    "articles",
    "parent_id",
];
const SECTION_COLUMNS: &[&str] = &[
    "section_id",
    "title",
    "description",
    "level",
    "placeholder",
    "sections",
    "articles",
    "parent_id",
];
const ARTICLE_COLUMNS: &[&str] = &["article_id", "label", "full_text", "paragraphs", "notes", "parent_id"];
const PARAGRAPH_COLUMNS: &[&str] = &["par_id", "label", "text", "subparagraphs", "notes", "parent_id"];
const SUBPARAGRAPH_COLUMNS: &[&str] = &["sub_id", "label", "text", "parent_id"];
const NOTE_COLUMNS: &[&str] = &[
    "note_id",
    "text",
    "date",
    "subject",
    "law_number",
    "law_date",
    "monitor_number",
    "monitor_date",
    "replaced",
    "replacement",
    "parent_id",
];

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&Option<String>> for Cell {
    fn from(value: &Option<String>) -> Self {
        value.as_deref().map_or(Self::Empty, Self::from)
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, Self::from)
    }
}

/// One worksheet: a header row and its records.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }
}

/// Comma-separated ids of nested records.
fn id_list<'a>(ids: impl IntoIterator<Item = &'a str>) -> Cell {
    Cell::from(ids.into_iter().collect::<Vec<_>>().join(",").as_str())
}

/// Placeholder flag, only written for synthetic containers.
fn placeholder(flag: bool) -> Cell {
    if flag {
        Cell::Bool(true)
    } else {
        Cell::Empty
    }
}

/// Accumulates the rows of every sheet while walking a document.
struct Flattener<'a> {
    document: Sheet,
    history: Sheet,
    books: Sheet,
    titles: Sheet,
    chapters: Sheet,
    sections: Sheet,
    articles: Sheet,
    paragraphs: Sheet,
    subparagraphs: Sheet,
    notes: Sheet,
    /// Containing hierarchy node of each placed article.
    article_parent: HashMap<&'a str, &'a str>,
}

impl<'a> Flattener<'a> {
    fn new() -> Self {
        Self {
            document: Sheet::new("Document", DOCUMENT_COLUMNS),
            history: Sheet::new("HistoryEntry", HISTORY_COLUMNS),
            books: Sheet::new("Book", BOOK_COLUMNS),
            titles: Sheet::new("Title", TITLE_COLUMNS),
            chapters: Sheet::new("Chapter", CHAPTER_COLUMNS),
            sections: Sheet::new("Section", SECTION_COLUMNS),
            articles: Sheet::new("Article", ARTICLE_COLUMNS),
            paragraphs: Sheet::new("Paragraph", PARAGRAPH_COLUMNS),
            subparagraphs: Sheet::new("SubParagraph", SUBPARAGRAPH_COLUMNS),
            notes: Sheet::new("Note", NOTE_COLUMNS),
            article_parent: HashMap::new(),
        }
    }

    fn place_articles(&mut self, articles: &'a [String], parent_id: &'a str) {
        for article_id in articles {
            self.article_parent.insert(article_id.as_str(), parent_id);
        }
    }

    fn document(&mut self, doc: &'a ParsedDocument) {
        let info = &doc.document;
        for entry in &info.history {
            self.history
                .rows
                .push(vec![Cell::from(&entry.ver_id), Cell::from(&entry.date), Cell::from(&info.ver_id)]);
        }

        self.document.rows.push(vec![
            Cell::from(&info.ver_id),
            Cell::from(&info.source),
            Cell::from(&info.title),
            Cell::from(&info.description),
            Cell::from(&info.keywords),
            id_list(info.history.iter().map(|entry| entry.ver_id.as_str())),
            Cell::from(&info.prev_ver),
            Cell::from(&info.next_ver),
            id_list(doc.books.iter().map(|book| book.book_id.as_str())),
        ]);

        for book in &doc.books {
            self.book(book, &info.ver_id);
        }
        // Articles last, once every container has claimed its own
        for article in &doc.articles {
            self.article(article);
        }
    }

    fn book(&mut self, book: &'a Book, parent_id: &str) {
        self.books.rows.push(vec![
            Cell::from(&book.book_id),
            Cell::from(&book.title),
            Cell::from(&book.description),
            placeholder(book.placeholder),
            id_list(book.titles.iter().map(|title| title.title_id.as_str())),
            id_list(book.chapters.iter().map(|chapter| chapter.chapter_id.as_str())),
            id_list(book.sections.iter().map(|section| section.section_id.as_str())),
            id_list(book.articles.iter().map(String::as_str)),
            Cell::from(parent_id),
        ]);
        self.place_articles(&book.articles, &book.book_id);

        for title in &book.titles {
            self.title(title, &book.book_id);
        }
        for chapter in &book.chapters {
            self.chapter(chapter, &book.book_id);
        }
        for section in &book.sections {
            self.section(section, &book.book_id);
        }
    }

    fn title(&mut self, title: &'a Title, parent_id: &str) {
        self.titles.rows.push(vec![
            Cell::from(&title.title_id),
            Cell::from(&title.title),
            Cell::from(&title.description),
            placeholder(title.placeholder),
            id_list(title.chapters.iter().map(|chapter| chapter.chapter_id.as_str())),
            id_list(title.sections.iter().map(|section| section.section_id.as_str())),
            id_list(title.articles.iter().map(String::as_str)),
            Cell::from(parent_id),
        ]);
        self.place_articles(&title.articles, &title.title_id);

        for chapter in &title.chapters {
            self.chapter(chapter, &title.title_id);
        }
        for section in &title.sections {
            self.section(section, &title.title_id);
        }
    }

    fn chapter(&mut self, chapter: &'a Chapter, parent_id: &str) {
        self.chapters.rows.push(vec![
            Cell::from(&chapter.chapter_id),
            Cell::from(&chapter.title),
            Cell::from(&chapter.description),
            placeholder(chapter.placeholder),
            id_list(chapter.sections.iter().map(|section| section.section_id.as_str())),
            id_list(chapter.articles.iter().map(String::as_str)),
            Cell::from(parent_id),
        ]);
        self.place_articles(&chapter.articles, &chapter.chapter_id);

        for section in &chapter.sections {
            self.section(section, &chapter.chapter_id);
        }
    }

    fn section(&mut self, section: &'a Section, parent_id: &str) {
        let children = section
            .sections
            .iter()
            .map(|nested| nested.section_id.as_str())
            .chain(section.subsections.iter().map(|sub| sub.subsection_id.as_str()));

        self.sections.rows.push(vec![
            Cell::from(&section.section_id),
            Cell::from(&section.title),
            Cell::from(&section.description),
            Cell::Number(f64::from(section.level)),
            placeholder(section.placeholder),
            id_list(children),
            id_list(section.articles.iter().map(String::as_str)),
            Cell::from(parent_id),
        ]);
        self.place_articles(&section.articles, &section.section_id);

        for nested in &section.sections {
            self.section(nested, &section.section_id);
        }
        for subsection in &section.subsections {
            self.subsection(subsection, &section.section_id);
        }
    }

    fn subsection(&mut self, subsection: &'a Subsection, parent_id: &str) {
        self.sections.rows.push(vec![
            Cell::from(&subsection.subsection_id),
            Cell::from(&subsection.title),
            Cell::from(&subsection.description),
            Cell::Empty,
            placeholder(subsection.placeholder),
            Cell::Empty,
            id_list(subsection.articles.iter().map(String::as_str)),
            Cell::from(parent_id),
        ]);
        self.place_articles(&subsection.articles, &subsection.subsection_id);
    }

    fn article(&mut self, article: &Article) {
        let parent_id = self.article_parent.get(article.article_id.as_str()).copied();
        self.articles.rows.push(vec![
            Cell::from(&article.article_id),
            Cell::from(&article.label),
            Cell::from(&article.full_text),
            id_list(article.paragraphs.iter().map(|paragraph| paragraph.par_id.as_str())),
            id_list(article.notes.iter().map(|note| note.note_id.as_str())),
            Cell::from(parent_id),
        ]);

        for paragraph in &article.paragraphs {
            self.paragraph(paragraph, &article.article_id);
        }
        for note in &article.notes {
            self.note(note, &article.article_id);
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph, parent_id: &str) {
        self.paragraphs.rows.push(vec![
            Cell::from(&paragraph.par_id),
            Cell::from(&paragraph.label),
            Cell::from(&paragraph.text),
            id_list(paragraph.subparagraphs.iter().map(|sub| sub.sub_id.as_str())),
            id_list(paragraph.notes.iter().map(|note| note.note_id.as_str())),
            Cell::from(parent_id),
        ]);

        for sub in &paragraph.subparagraphs {
            self.subparagraphs.rows.push(vec![
                Cell::from(&sub.sub_id),
                Cell::from(&sub.label),
                Cell::from(&sub.text),
                Cell::from(&paragraph.par_id),
            ]);
        }
        for note in &paragraph.notes {
            self.note(note, &paragraph.par_id);
        }
    }

    fn note(&mut self, note: &Note, parent_id: &str) {
        self.notes.rows.push(vec![
            Cell::from(&note.note_id),
            Cell::from(&note.text),
            Cell::from(&note.date),
            Cell::from(&note.subject),
            Cell::from(&note.law_number),
            Cell::from(&note.law_date),
            Cell::from(&note.monitor_number),
            Cell::from(&note.monitor_date),
            Cell::from(&note.replaced),
            Cell::from(&note.replacement),
            Cell::from(parent_id),
        ]);
    }

    fn into_sheets(self) -> Vec<Sheet> {
        [
            self.document,
            self.history,
            self.books,
            self.titles,
            self.chapters,
            self.sections,
            self.articles,
            self.paragraphs,
            self.subparagraphs,
            self.notes,
        ]
        .into_iter()
        .filter(|sheet| !sheet.rows.is_empty())
        .collect()
    }
}

/// Flatten a document into linked sheets, in workbook order.
#[must_use]
pub fn flatten(doc: &ParsedDocument) -> Vec<Sheet> {
    let mut flattener = Flattener::new();
    flattener.document(doc);
    flattener.into_sheets()
}

/// Build the workbook of a document as `.xlsx` bytes.
pub fn workbook_bytes(doc: &ParsedDocument) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    for sheet in flatten(doc) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        for (col, column) in (0u16..).zip(sheet.columns) {
            worksheet.write_string(0, col, *column)?;
        }
        for (row, cells) in (1u32..).zip(&sheet.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row, col, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row, col, *number)?;
                    }
                    Cell::Bool(flag) => {
                        worksheet.write_boolean(row, col, *flag)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(size = bytes.len(), "Built workbook");
    Ok(bytes)
}
