//! Redline CLI
//!
//! Reads tracked-changes XML and prints its original and revised text.

use std::fs;
use std::io::{self, Write};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xml_redline::constants::{ATTR_AUTHOR, ATTR_DATE};
use xml_redline::{
    CurrentTextFallback, ExtractionResult, Extractor, MarkupTree, ParseOptions, RevisionSummary,
    XmlTreeParser,
};

/// Original and revised text from tracked-changes markup
#[derive(Parser)]
#[command(name = "redline")]
#[command(version)]
#[command(about = "Original and revised text from tracked-changes markup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (tracing-subscriber EnvFilter syntax)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    log: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract both projections from a document
    #[command(visible_alias = "x")]
    Extract {
        /// Markup file (e.g. word/document.xml)
        input: String,

        /// Emit the full result as JSON
        #[arg(long)]
        json: bool,

        /// File holding the host's current plain text, used when a
        /// projection comes out empty
        #[arg(long)]
        current_text: Option<String>,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// List the revision markers in a document
    #[command(visible_alias = "i")]
    Inspect {
        /// Markup file
        input: String,

        #[command(flatten)]
        parse: ParseArgs,
    },
}

#[derive(clap::Args)]
struct ParseArgs {
    /// Keep whitespace-only text outside xml:space="preserve"
    #[arg(long)]
    keep_whitespace: bool,

    /// Additional element local names to drop with their content
    #[arg(long = "skip", value_name = "NAME")]
    skip: Vec<String>,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        self.skip.iter().fold(
            ParseOptions::default().keep_whitespace(self.keep_whitespace),
            |options, name| options.skip_element(name.clone()),
        )
    }

    fn load(&self, path: &str) -> Result<MarkupTree, Box<dyn std::error::Error>> {
        tracing::info!(path, "parsing");
        Ok(XmlTreeParser::with_options(self.options()).parse_file(path)?)
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Extract {
            input,
            json,
            current_text,
            parse,
        } => run_extract(&input, json, current_text.as_deref(), &parse),
        Commands::Inspect { input, parse } => run_inspect(&input, &parse),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Runs extraction and prints both projections.
fn run_extract(
    input: &str,
    json: bool,
    current_text_path: Option<&str>,
    parse: &ParseArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = parse.load(input)?;

    let result = match current_text_path {
        Some(path) => {
            let current = fs::read_to_string(path)?;
            Extractor::with_policy(CurrentTextFallback::new(current)).extract(&tree)?
        }
        None => Extractor::new().extract(&tree)?,
    };

    for warning in result.warnings() {
        eprintln!("warning: {}", warning);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        print_projections(&mut out, &result)?;
    }
    Ok(())
}

fn print_projections<W: Write>(out: &mut W, result: &ExtractionResult) -> io::Result<()> {
    writeln!(out, "--- original")?;
    writeln!(out, "{}", result.original())?;
    writeln!(out, "+++ revised")?;
    writeln!(out, "{}", result.revised())?;
    if result.used_fallback() {
        writeln!(out, "(fallback text used)")?;
    }
    Ok(())
}

/// Prints a marker summary followed by one line per marker.
fn run_inspect(input: &str, parse: &ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tree = parse.load(input)?;
    let summary = RevisionSummary::from_tree(&tree);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "{} markers: {} deleted, {} inserted, {} moved from, {} moved to",
        summary.total(),
        summary.deletions,
        summary.insertions,
        summary.moves_from,
        summary.moves_to
    )?;
    if !summary.authors.is_empty() {
        let authors: Vec<&str> = summary.authors.iter().map(String::as_str).collect();
        writeln!(out, "authors: {}", authors.join(", "))?;
    }

    for (id, node, state) in tree.revisions() {
        let element = node.as_element();
        let attr = |name: &str| element.and_then(|e| e.attribute_local(name)).unwrap_or("-");
        writeln!(
            out,
            "{:>6}  {:<9}  {:<20}  {}",
            id.to_string(),
            state.to_string(),
            attr(ATTR_AUTHOR),
            attr(ATTR_DATE)
        )?;
    }
    Ok(())
}
