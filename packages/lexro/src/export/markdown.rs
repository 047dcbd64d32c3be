//! Markdown export, one file per article.
//!
//! Each file starts with a YAML front matter block identifying the article
//! and its source document, followed by the article text: paragraphs with
//! their labels, items as a list and amendment notes as block quotes.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use textwrap::{fill, Options};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::writer::write_atomic;
use crate::config::TEXT_WRAP_WIDTH;
use crate::error::Result;
use crate::types::{Article, DocumentInfo, Note, ParsedDocument};

/// Maximum length of a file name slug.
const SLUG_MAX_LEN: usize = 80;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]+").expect("valid regex"));

/// Front matter of an exported article.
#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    article_id: &'a str,
    label: &'a str,
    ver_id: &'a str,
    source: &'a str,
    title: Option<&'a str>,
    exported_at: String,
}

/// File-name slug without diacritics.
///
/// # Examples
/// ```
/// use lexro::export::slug;
///
/// assert_eq!(slug("Articolul 12^1"), "Articolul_12_1");
/// assert_eq!(slug("Secțiunea a 2-a"), "Sectiunea_a_2-a");
/// assert_eq!(slug("***"), "");
/// ```
pub fn slug(text: &str) -> String {
    let ascii: String = text.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let slug = SLUG_INVALID.replace_all(&ascii, "_");
    slug.trim_matches('_').chars().take(SLUG_MAX_LEN).collect()
}

/// Wrap a paragraph at the configured width.
fn wrap(text: &str, initial: &str, subsequent: &str) -> String {
    let options = Options::new(TEXT_WRAP_WIDTH)
        .initial_indent(initial)
        .subsequent_indent(subsequent);
    fill(text, &options)
}

fn labelled(label: &str, text: &str) -> String {
    if label.is_empty() {
        text.to_string()
    } else if text.is_empty() {
        label.to_string()
    } else {
        format!("{label} {text}")
    }
}

fn push_notes(out: &mut Vec<String>, notes: &[Note]) {
    for note in notes {
        out.push(wrap(&note.text, "> ", "> "));
    }
}

/// Render one article as Markdown.
pub fn article_markdown(article: &Article, document: &DocumentInfo, exported_at: DateTime<Utc>) -> Result<String> {
    let front = FrontMatter {
        article_id: &article.article_id,
        label: &article.label,
        ver_id: &document.ver_id,
        source: &document.source,
        title: document.title.as_deref(),
        exported_at: exported_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    };
    let front = serde_yaml_ng::to_string(&front)?;

    let heading = if article.label.is_empty() {
        format!("# {}", article.article_id)
    } else {
        format!("# Articolul {}", article.label)
    };

    let mut blocks = vec![heading];
    for paragraph in &article.paragraphs {
        let label = paragraph.label.as_deref().unwrap_or_default();
        let text = labelled(label, &paragraph.text);
        if !text.is_empty() {
            blocks.push(wrap(&text, "", ""));
        }

        if !paragraph.subparagraphs.is_empty() {
            let items: Vec<String> = paragraph
                .subparagraphs
                .iter()
                .map(|sub| wrap(&labelled(&sub.label, &sub.text), "- ", "  "))
                .collect();
            blocks.push(items.join("\n"));
        }

        push_notes(&mut blocks, &paragraph.notes);
    }
    push_notes(&mut blocks, &article.notes);

    Ok(format!("---\n{front}---\n\n{}\n", blocks.join("\n\n")))
}

/// File name of an article, unique within `taken`.
fn article_file_name(article: &Article, taken: &mut HashSet<String>) -> String {
    let base = Some(slug(&article.label))
        .filter(|s| !s.is_empty())
        .map(|s| format!("art_{s}"))
        .or_else(|| Some(slug(&article.article_id)).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "article".to_string());

    let mut name = base.clone();
    let mut counter = 2;
    while !taken.insert(name.clone()) {
        name = format!("{base}_{counter}");
        counter += 1;
    }
    format!("{name}.md")
}

/// Write every article of a document as a Markdown file in `output_dir`.
///
/// # Returns
/// Paths of the written files, in article order
pub fn export_markdown(doc: &ParsedDocument, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let exported_at = Utc::now();
    let mut taken = HashSet::new();
    let mut written = Vec::with_capacity(doc.articles.len());

    for article in &doc.articles {
        let path = output_dir.join(article_file_name(article, &mut taken));
        let content = article_markdown(article, &doc.document, exported_at)?;
        write_atomic(&path, &content)?;
        written.push(path);
    }

    tracing::info!(
        files = written.len(),
        dir = %output_dir.display(),
        "Exported articles to Markdown"
    );
    Ok(written)
}
