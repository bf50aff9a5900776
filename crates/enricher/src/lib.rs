//! AI-assisted enrichment pipeline for academic paper metadata.
//!
//! `enricher` takes a single arXiv paper reference and carries it through a
//! fixed, fully sequential pipeline:
//!
//! 1. Resolve the reference into a [`paper::PaperRecord`] via the arXiv API.
//! 2. Ask a language model for a structured summary (TL;DR, motivation,
//!    method, result, conclusion, and a translated title and abstract) with
//!    the response constrained to the seven-field [`llm::SchemaContract`].
//! 3. Render the enriched record into a fixed-format markdown document.
//! 4. Persist each stage as line-delimited JSON and plain text so the run can
//!    be repeated from the last successful stage without re-fetching.
//!
//! # Getting Started
//!
//! ```no_run
//! use enricher::{
//!   config::{ConfigOverrides, EngineConfig},
//!   llm::EnrichmentEngine,
//!   render::DocumentRenderer,
//!   source::{extract_identifier, ArxivClient, MetadataSource},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = EngineConfig::resolve(ConfigOverrides::default())?;
//!
//!   let id = extract_identifier("https://arxiv.org/abs/2301.07041")?;
//!   let paper = ArxivClient::new().fetch(&id).await?;
//!
//!   let engine = EnrichmentEngine::new(config, "Respond in {language}.", "{title}\n\n{content}");
//!   let enrichment = engine.enrich(&paper).await?;
//!   let paper = paper.with_enrichment(enrichment);
//!
//!   let mut renderer = DocumentRenderer::new("## {idx}. {title} ({cate})\n\n{tldr}\n");
//!   println!("{}", renderer.render(&paper)?);
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`paper`]: The [`paper::PaperRecord`] data model and its enrichment result
//! - [`source`]: Metadata retrieval from the arXiv Atom API
//! - [`llm`]: Structured-output language model invocation
//! - [`template`]: Named-placeholder substitution shared by prompts and documents
//! - [`render`]: Document rendering from enriched records
//! - [`sink`]: Line-delimited JSON and document persistence
//! - [`config`]: Credential and provider resolution with documented precedence
//!
//! # Design Philosophy
//!
//! The pipeline processes exactly one record per invocation, synchronously.
//! Every stage fails fast with a typed error carrying enough context to
//! diagnose it; no stage retries or recovers on its own, so a run is always
//! safe to repeat from scratch or from the last persisted artifact.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod config;
pub mod error;
pub mod llm;
pub mod paper;
pub mod render;
pub mod sink;
pub mod source;
pub mod template;

use crate::error::*;

/// Common traits and types for ergonomic imports.
///
/// Brings in the error type and the two trait seams of the pipeline (the
/// metadata source and the chat transport) with a single glob import:
///
/// ```no_run
/// use enricher::{prelude::*, source::ArxivClient};
///
/// async fn example() -> Result<()> {
///   let paper = ArxivClient::new().fetch("2301.07041").await?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::{EnricherError, Result},
    llm::ChatTransport,
    source::MetadataSource,
  };
}
