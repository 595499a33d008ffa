//! ReasonKit Extract CLI
//!
//! Reads an HTML document from a file or stdin and prints the extracted
//! content, metadata, links, tables or code blocks as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use reasonkit_extract::{
    CodeExtractor, ContentExtractor, ExtractionConfig, LinkExtractor, MetadataExtractor,
    PageExtractor, TableExtractor,
};

/// ReasonKit Extract
#[derive(Parser, Debug)]
#[command(name = "rk-extract")]
#[command(author = "ReasonKit Team <team@reasonkit.sh>")]
#[command(version)]
#[command(about = "Extract clean content and metadata from HTML documents")]
struct Args {
    /// What to extract
    #[command(subcommand)]
    command: Command,

    /// HTML file to read (stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Base URL for resolving relative links
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Minimum text length for main-content candidates
    #[arg(long, global = true)]
    min_content_length: Option<usize>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Main content with counts
    Content,
    /// Clean main-content text only
    Text,
    /// Page metadata
    Metadata,
    /// Links
    Links,
    /// Tables
    Tables,
    /// Code blocks
    Code,
    /// Everything at once
    All,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config = ExtractionConfig::from_env().context("invalid extraction configuration")?;
    if let Some(len) = args.min_content_length {
        config = config.with_min_content_length(len);
    }

    let html = read_input(args.input.as_ref()).with_context(|| match &args.input {
        Some(path) => format!("failed to read {}", path.display()),
        None => "failed to read stdin".to_string(),
    })?;
    tracing::debug!("Read {} bytes of input", html.len());
    let base_url = args.base_url.as_deref();

    let result: reasonkit_extract::Result<()> = match args.command {
        Command::Content => print_json(
            &ContentExtractor::with_config(config).extract_main_content(&html)?,
            args.pretty,
        ),
        Command::Text => {
            println!("{}", ContentExtractor::with_config(config).clean_text(&html)?);
            Ok(())
        }
        Command::Metadata => print_json(
            &MetadataExtractor::with_config(config).extract(&html)?,
            args.pretty,
        ),
        Command::Links => print_json(&LinkExtractor::extract_all(&html, base_url)?, args.pretty),
        Command::Tables => print_json(&TableExtractor::extract(&html)?, args.pretty),
        Command::Code => print_json(
            &CodeExtractor::with_config(config).extract(&html)?,
            args.pretty,
        ),
        Command::All => print_json(
            &PageExtractor::with_config(config).extract(&html, base_url)?,
            args.pretty,
        ),
    };
    Ok(result?)
}

fn read_input(path: Option<&PathBuf>) -> reasonkit_extract::Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            Ok(html)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> reasonkit_extract::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
