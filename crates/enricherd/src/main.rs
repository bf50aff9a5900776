//! Command line interface for the enricher paper summarization pipeline.
//!
//! Drives one paper through the whole pipeline: fetch the metadata from
//! arXiv, ask the configured model for the structured summary, render the
//! markdown document, and persist every stage under the output directory.
//!
//! # Usage
//!
//! ```bash
//! # Enrich a paper by its abstract page URL
//! enricher https://arxiv.org/abs/2301.07041
//!
//! # Or by its bare accession number, in English, against a local gateway
//! enricher 2301.07041 --language English --base-url http://localhost:8080/v1
//! ```
//!
//! The API key is taken from `--api-key`, then `OPENAI_API_KEY`; without one
//! the run stops before any network call. Each stage prints a line with a
//! `✓`/`✗` marker so a failed run is unmistakable, and artifacts of stages
//! that already succeeded stay on disk.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{fs, path::PathBuf};

use clap::{builder::ArgAction, Parser};
use console::style;
use enricher::{
  config::{ConfigOverrides, EngineConfig},
  llm::EnrichmentEngine,
  render::DocumentRenderer,
  sink::PersistenceSink,
  source::{extract_identifier, ArxivClient, MetadataSource},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod error;

use crate::error::*;

/// Prefix for informational stage lines
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success lines
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for failure lines
static ERROR_PREFIX: &str = "✗ ";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Enrich one arXiv paper with an AI-generated summary")]
pub struct Cli {
  /// arXiv reference: an abstract/PDF page URL or a bare accession number
  pub reference: String,

  /// Target language for the generated summary
  #[arg(long)]
  pub language: Option<String>,

  /// Model identifier to request from the provider
  #[arg(long)]
  pub model: Option<String>,

  /// API key; falls back to the OPENAI_API_KEY environment variable
  #[arg(long)]
  pub api_key: Option<String>,

  /// Base endpoint of the OpenAI-compatible API
  #[arg(long)]
  pub base_url: Option<String>,

  /// Directory holding system.txt, user.txt and paper.md templates
  #[arg(long, default_value = "templates")]
  pub templates: PathBuf,

  /// Directory the records and the rendered document are written into
  #[arg(long, default_value = "output")]
  pub output: PathBuf,

  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(short, long, action = ArgAction::Count, help = "Increase logging verbosity")]
  pub verbose: u8,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Entry point for the enricher CLI application
///
/// Parses arguments, sets up logging, and runs the pipeline once. On any
/// stage failure a red marker and the error are printed and the process
/// exits non-zero, leaving earlier-stage artifacts on disk.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  if let Err(e) = run(cli).await {
    eprintln!("{} {e}", style(ERROR_PREFIX).red());
    std::process::exit(1);
  }
}

/// Runs the full pipeline for one paper reference.
async fn run(cli: Cli) -> Result<()> {
  // Resolve configuration first: a missing credential must surface before
  // any network call is attempted.
  let config = EngineConfig::resolve(ConfigOverrides {
    api_key:  cli.api_key,
    base_url: cli.base_url,
    model:    cli.model,
    language: cli.language,
  })?;
  debug!("Resolved configuration: model {}, base URL {}", config.model, config.base_url);

  let identifier = extract_identifier(&cli.reference)?;
  println!("{} Fetching metadata for {identifier}", style(INFO_PREFIX).cyan());

  let paper = ArxivClient::new().fetch(&identifier).await?;
  println!("{} {}", style(INFO_PREFIX).cyan(), paper.title);

  let sink = PersistenceSink::new(&cli.output);
  let raw_path = sink.write_raw(&paper)?;
  println!("{} Raw record written to {}", style(SUCCESS_PREFIX).green(), raw_path.display());

  let system_template = fs::read_to_string(cli.templates.join("system.txt"))?;
  let user_template = fs::read_to_string(cli.templates.join("user.txt"))?;
  let document_template = fs::read_to_string(cli.templates.join("paper.md"))?;

  println!(
    "{} Requesting {} summary from {}",
    style(INFO_PREFIX).cyan(),
    config.language,
    config.model
  );
  let engine = EnrichmentEngine::new(config, system_template, user_template);
  let enrichment = engine.enrich(&paper).await?;
  let paper = paper.with_enrichment(enrichment);

  let enriched_path = sink.write_enriched(&paper)?;
  println!(
    "{} Enriched record written to {}",
    style(SUCCESS_PREFIX).green(),
    enriched_path.display()
  );

  let mut renderer = DocumentRenderer::new(document_template);
  let document = renderer.render(&paper)?;
  let document_path = sink.write_document(&paper.id, &document)?;
  println!("{} Document written to {}", style(SUCCESS_PREFIX).green(), document_path.display());

  Ok(())
}
