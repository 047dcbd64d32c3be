//! JSON, YAML and spreadsheet output of parsed documents.

use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use super::xlsx::workbook_bytes;
use crate::error::{LexroError, Result};
use crate::types::{DocumentInfo, ParsedDocument};

/// Serialization format of a saved document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Yaml,
    /// Workbook with one linked sheet per record type; file output only.
    Xlsx,
}

impl Format {
    /// File extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xlsx => "xlsx",
        }
    }

    /// Format of a saved file, from its extension (`.yaml`/`.yml` are YAML,
    /// `.xlsx` a workbook, anything else is read as JSON).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Json,
        }
    }
}

impl FromStr for Format {
    type Err = LexroError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(LexroError::UnsupportedFormat(format!(
                "'{s}', expected one of: json, yaml, xlsx"
            ))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Indent block sequences two columns under the key that owns them.
///
/// serde_yaml_ng writes `- ` items in the same column as their key; saved
/// documents nest them instead:
///
/// ```yaml
/// # serde_yaml_ng:          # saved:
/// paragraphs:               paragraphs:
/// - par_id: art1_aln1         - par_id: art1_aln1
///   subparagraphs:              subparagraphs:
///   - sub_id: art1_lita           - sub_id: art1_lita
/// ```
///
/// Only a `- ` line right after a bare `key:` line opens a sequence, so a
/// wrapped note text whose continuation starts with a dash keeps its column.
fn indent_yaml_sequences(yaml: &str) -> String {
    // Dash columns of the sequences enclosing the current line.
    let mut open: Vec<usize> = Vec::new();
    let mut previous_is_key = false;

    let lines: Vec<String> = yaml
        .lines()
        .map(|line| {
            let content = line.trim_start();
            if content.is_empty() {
                return line.to_string();
            }
            let column = line.len() - content.len();
            let is_item = content.starts_with("- ");

            // Left of a dash, or a mapping key in its column, ends that sequence
            while open
                .last()
                .is_some_and(|&dash| column < dash || (column == dash && !is_item))
            {
                open.pop();
            }
            if is_item && previous_is_key && open.last() != Some(&column) {
                open.push(column);
            }

            previous_is_key = content.ends_with(':');
            format!("{}{}", " ".repeat(column + 2 * open.len()), content)
        })
        .collect();

    lines.join("\n")
}

/// Serialize a document as JSON.
pub fn to_json(doc: &ParsedDocument, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(json)
}

/// Serialize a document as YAML, with a document start marker.
pub fn to_yaml(doc: &ParsedDocument) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(doc)?;
    let yaml = indent_yaml_sequences(&yaml);

    let lines: Vec<&str> = yaml.lines().map(|l| l.trim_end()).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Serialize a document as text in the given format.
///
/// Workbooks are binary and can only be saved with [`save_document`].
pub fn render(doc: &ParsedDocument, format: Format) -> Result<String> {
    match format {
        Format::Json => to_json(doc, true),
        Format::Yaml => to_yaml(doc),
        Format::Xlsx => Err(LexroError::UnsupportedFormat(
            "'xlsx' cannot be printed, save it to a directory with --output".to_string(),
        )),
    }
}

/// Write a file atomically: temp file, sync, then rename.
///
/// Partial writes never replace an existing file.
pub fn write_atomic(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_ref())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}

/// Save a document as `<output_dir>/<ver_id>.<ext>`.
///
/// # Returns
/// Path to the saved file
pub fn save_document(doc: &ParsedDocument, format: Format, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let output_file = output_dir.join(format!("{}.{}", doc.document.ver_id, format.extension()));
    let content = match format {
        Format::Xlsx => workbook_bytes(doc)?,
        Format::Json | Format::Yaml => render(doc, format)?.into_bytes(),
    };
    write_atomic(&output_file, content)?;

    tracing::info!(path = %output_file.display(), "Saved document");
    Ok(output_file)
}

/// Reject workbooks before reading a saved file back.
fn readable_format(path: &Path) -> Result<Format> {
    match Format::from_path(path) {
        Format::Xlsx => Err(LexroError::UnsupportedFormat(
            "'xlsx' cannot be loaded, use a saved JSON or YAML document".to_string(),
        )),
        format => Ok(format),
    }
}

/// Load a saved JSON or YAML document.
pub fn load_document(path: &Path) -> Result<ParsedDocument> {
    let format = readable_format(path)?;
    let text = fs::read_to_string(path)?;
    let doc = match format {
        Format::Yaml => serde_yaml_ng::from_str(&text)?,
        Format::Json | Format::Xlsx => serde_json::from_str(&text)?,
    };
    Ok(doc)
}

/// Only the `document` section of a saved file.
#[derive(Debug, Deserialize)]
struct DocumentSection {
    document: DocumentInfo,
}

/// Load the metadata of a saved document without its articles.
pub fn load_document_info(path: &Path) -> Result<DocumentInfo> {
    let format = readable_format(path)?;
    let text = fs::read_to_string(path)?;
    let section: DocumentSection = match format {
        Format::Yaml => serde_yaml_ng::from_str(&text)?,
        Format::Json | Format::Xlsx => serde_json::from_str(&text)?,
    };
    Ok(section.document)
}
