//! Command-line interface for lexro.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{default_cache_dir, validate_ver_id, LOG_FILE_ENV, SOURCE_BASE_URL};
use crate::error::{LexroError, Result};
use crate::export::{export_markdown, load_document, load_document_info, render, save_document, Format};
use crate::fetch::fetch_document;
use crate::parser::{parse_html_with, ParseOptions};
use crate::types::ParsedDocument;

/// Lexro - Parse Romanian legislation from legislatie.just.ro into JSON, YAML or spreadsheets.
#[derive(Debug, Parser)]
#[command(name = "lexro")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable trace logging (implies --debug)
    #[arg(long, global = true)]
    pub trace: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, env = LOG_FILE_ENV)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download a document version and convert it.
    Convert {
        /// Version identifier (e.g., 120341)
        ver_id: String,

        /// Directory of the HTML cache (default: ~/.leropa)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Always download, bypassing the HTML cache
        #[arg(long, conflicts_with = "cache_dir")]
        no_cache: bool,

        /// Base URL of the document pages
        #[arg(long, default_value = SOURCE_BASE_URL)]
        base_url: String,

        /// Output format (xlsx needs --output)
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output directory (default: print to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Insert placeholder containers for missing hierarchy levels
        #[arg(long)]
        placeholders: bool,
    },

    /// Parse a local HTML page.
    Parse {
        /// HTML file to parse
        file: PathBuf,

        /// Version identifier the page belongs to
        #[arg(long)]
        ver_id: String,

        /// Output format (xlsx needs --output)
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output directory (default: print to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Insert placeholder containers for missing hierarchy levels
        #[arg(long)]
        placeholders: bool,
    },

    /// Show the metadata of a saved JSON/YAML document.
    Info {
        /// Saved document
        file: PathBuf,
    },

    /// Export the articles of a saved document as Markdown files.
    Markdown {
        /// Saved JSON/YAML document
        file: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            ver_id,
            cache_dir,
            no_cache,
            base_url,
            format,
            output,
            placeholders,
        } => {
            let cache_dir = match (no_cache, cache_dir) {
                (true, _) => None,
                (false, Some(dir)) => Some(dir),
                (false, None) => Some(default_cache_dir()?),
            };
            let options = ParseOptions::default().with_placeholders(placeholders);
            convert_command(&ver_id, cache_dir.as_deref(), &base_url, format, output.as_deref(), &options)
        }
        Commands::Parse {
            file,
            ver_id,
            format,
            output,
            placeholders,
        } => {
            let options = ParseOptions::default().with_placeholders(placeholders);
            parse_command(&file, &ver_id, format, output.as_deref(), &options)
        }
        Commands::Info { file } => info_command(&file),
        Commands::Markdown { file, output } => markdown_command(&file, &output),
    }
}

/// Fail early when the output path exists but is not a directory.
fn check_output_dir(output: Option<&Path>) -> Result<()> {
    if let Some(output_dir) = output {
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(LexroError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Output path is not a directory: {}", output_dir.display()),
            )));
        }
    }
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a document summary to stderr, then save it or print it to stdout.
fn emit(doc: &ParsedDocument, format: Format, output: Option<&Path>) -> Result<()> {
    let title = doc.document.title.as_deref().unwrap_or("(untitled)");
    eprintln!("  Title: {}", style(title).green());
    eprintln!("  Articles: {}", doc.articles.len());
    eprintln!("  Books: {}", doc.books.len());

    match output {
        Some(output_dir) => {
            let path = save_document(doc, format, output_dir)?;
            println!();
            println!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => println!("{}", render(doc, format)?),
    }
    Ok(())
}

/// Execute the convert command.
fn convert_command(
    ver_id: &str,
    cache_dir: Option<&Path>,
    base_url: &str,
    format: Format,
    output: Option<&Path>,
    options: &ParseOptions,
) -> Result<()> {
    // Validate inputs before making HTTP requests
    validate_ver_id(ver_id)?;
    check_output_dir(output)?;

    eprintln!("{} {}", style("Converting").bold(), style(ver_id).cyan());

    let pb = spinner("Fetching document...");
    let result = fetch_document(ver_id, cache_dir, base_url, options);
    pb.finish_and_clear();

    emit(&result?, format, output)
}

/// Execute the parse command.
fn parse_command(
    file: &Path,
    ver_id: &str,
    format: Format,
    output: Option<&Path>,
    options: &ParseOptions,
) -> Result<()> {
    validate_ver_id(ver_id)?;
    check_output_dir(output)?;

    eprintln!("{} {}", style("Parsing").bold(), style(file.display()).cyan());

    let html = fs::read_to_string(file)?;
    let doc = parse_html_with(&html, ver_id, options);

    emit(&doc, format, output)
}

/// Execute the info command.
fn info_command(file: &Path) -> Result<()> {
    let info = load_document_info(file)?;

    println!("{}", style(info.title.as_deref().unwrap_or("(untitled)")).bold());
    println!("  Version: {}", style(&info.ver_id).cyan());
    println!("  Source: {}", info.source);
    if let Some(description) = &info.description {
        println!("  Description: {description}");
    }
    if let Some(prev) = &info.prev_ver {
        println!("  Previous version: {prev}");
    }
    if !info.history.is_empty() {
        println!("  History ({} versions):", info.history.len());
        for entry in &info.history {
            println!("    {} {}", style(&entry.ver_id).cyan(), entry.date);
        }
    }
    Ok(())
}

/// Execute the markdown command.
fn markdown_command(file: &Path, output: &Path) -> Result<()> {
    check_output_dir(Some(output))?;

    let doc = load_document(file)?;
    let paths = export_markdown(&doc, output)?;

    println!(
        "{} {} articles to {}",
        style("Exported").green().bold(),
        paths.len(),
        output.display()
    );
    Ok(())
}
