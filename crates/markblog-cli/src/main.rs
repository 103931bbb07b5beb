//! Markblog CLI - Render, list, and check markblog documents
//!
//! Usage:
//!   mbcli [OPTIONS] <COMMAND>
//!
//! Commands:
//!   render  Render a single file to an HTML fragment
//!   list    List the documents in the configured directory
//!   show    Render one document from the directory by identifier
//!   check   Report recoverable problems in a file

mod config;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use markblog_core::{
    parse_document, parse_document_with_diagnostics, Diagnostic, FsDocumentStore, Library,
    RawDocument, RenderedDocument,
};
use serde::Serialize;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "mbcli", version, about = "Markblog document renderer and checker")]
struct Cli {
    /// Path to configuration file (default: ./markblog.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the `.md` documents.
    #[arg(short, long, env = "MARKBLOG_DIR")]
    dir: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a file and print the HTML fragment.
    Render {
        file: PathBuf,

        /// Print the rendered document as JSON.
        #[arg(short, long)]
        json: bool,
    },

    /// List the documents in the configured directory.
    List {
        #[arg(short, long)]
        json: bool,
    },

    /// Render one document from the configured directory.
    Show {
        id: String,

        #[arg(short, long)]
        json: bool,
    },

    /// Print the problems recovered from while parsing a file.
    Check {
        file: PathBuf,

        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Command::Render { file, json } => cmd_render(&file, json, out),
        Command::Check { file, json } => cmd_check(&file, json, out),
        Command::List { json } => {
            let config = Config::resolve(cli.config.as_deref(), cli.dir)?;
            cmd_list(&library(&config), json, out)
        }
        Command::Show { id, json } => {
            let config = Config::resolve(cli.config.as_deref(), cli.dir)?;
            cmd_show(&library(&config), &id, json, out)
        }
    }
}

fn library(config: &Config) -> Library<FsDocumentStore> {
    log::debug!("documents directory: {}", config.documents_dir.display());
    Library::new(FsDocumentStore::new(&config.documents_dir))
}

fn read_file(path: &Path) -> Result<RawDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    let identifier = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(RawDocument::new(identifier, content))
}

// =============================================================================
// Render Command
// =============================================================================

fn cmd_render(file: &Path, json: bool, out: &mut impl Write) -> Result<()> {
    let raw = read_file(file)?;
    let doc = parse_document(&raw);
    print_document(&doc, json, out)
}

fn print_document(doc: &RenderedDocument, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, doc)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", doc.html)?;
    }
    Ok(())
}

// =============================================================================
// List Command
// =============================================================================

#[derive(Serialize)]
struct ListEntry<'a> {
    identifier: &'a str,
    title: &'a str,
    created_at: String,
}

fn cmd_list(library: &Library<FsDocumentStore>, json: bool, out: &mut impl Write) -> Result<()> {
    let docs = library.render_all();
    let entries: Vec<_> = docs
        .iter()
        .map(|doc| ListEntry {
            identifier: &doc.identifier,
            title: &doc.title,
            created_at: doc.front_matter().created_at_display(),
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
        return Ok(());
    }

    for entry in &entries {
        let date = if entry.created_at.is_empty() {
            "-"
        } else {
            entry.created_at.as_str()
        };
        writeln!(out, "{}\t{}\t{}", entry.identifier, date, entry.title)?;
    }
    Ok(())
}

// =============================================================================
// Show Command
// =============================================================================

fn cmd_show(
    library: &Library<FsDocumentStore>,
    id: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    match library.render(id) {
        Some(doc) => print_document(&doc, json, out),
        None => bail!("not found: {id}"),
    }
}

// =============================================================================
// Check Command
// =============================================================================

#[derive(Serialize)]
struct CheckReport<'a> {
    identifier: &'a str,
    clean: bool,
    diagnostics: Vec<&'a Diagnostic>,
}

fn cmd_check(file: &Path, json: bool, out: &mut impl Write) -> Result<()> {
    let raw = read_file(file)?;
    let result = parse_document_with_diagnostics(&raw);

    if json {
        let report = CheckReport {
            identifier: &raw.identifier,
            clean: result.is_clean(),
            diagnostics: result.diagnostics.iter().collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else if result.is_clean() {
        writeln!(out, "{}: no problems found", file.display())?;
    } else {
        writeln!(
            out,
            "{}: {} problem(s) recovered",
            file.display(),
            result.diagnostics.len()
        )?;
        for diagnostic in result.diagnostics.iter() {
            writeln!(out, "  - {}", diagnostic)?;
        }
    }
    Ok(())
}
