//! Output of parsed documents: JSON/YAML files, spreadsheets and
//! per-article Markdown.

pub mod markdown;
pub mod writer;
pub mod xlsx;

pub use markdown::{article_markdown, export_markdown, slug};
pub use writer::{
    load_document, load_document_info, render, save_document, to_json, to_yaml, write_atomic, Format,
};
pub use xlsx::{flatten, workbook_bytes, Cell, Sheet};
