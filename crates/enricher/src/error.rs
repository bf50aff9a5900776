//! Error types for the enricher library.
//!
//! This module provides the error type shared by every pipeline stage. Each
//! stage reports its own kind and carries the underlying cause, so a caller
//! can tell apart bad input, an unreachable metadata source, a missing
//! credential, a failed model call, and a template mismatch.
//!
//! # Examples
//!
//! ```
//! use enricher::{error::EnricherError, source::extract_identifier};
//! // or `use enricher::prelude::*` to bring in the error type
//!
//! match extract_identifier("https://example.com/paper") {
//!   Err(EnricherError::InvalidReference) => println!("Not an arXiv reference"),
//!   Err(e) => println!("Other error: {}", e),
//!   Ok(id) => println!("Identifier: {}", id),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`enricher`](crate) crate.
pub type Result<T> = core::result::Result<T, EnricherError>;

/// Errors that can occur while enriching a paper record.
///
/// The variants mirror the pipeline stages: reference validation, metadata
/// retrieval, configuration, model invocation, and document rendering. None
/// of them is recovered from automatically; the pipeline stops at the first
/// failure and can be re-run from the last persisted artifact.
#[derive(Error, Debug)]
pub enum EnricherError {
  /// The supplied paper reference doesn't match the expected format.
  ///
  /// Raised before any network call when the input is neither a bare arXiv
  /// accession number (e.g. "2301.07041") nor an `arxiv.org/abs/...` or
  /// `arxiv.org/pdf/...` URL. The input itself is wrong; fix it and re-run.
  #[error("Invalid paper reference format")]
  InvalidReference,

  /// The metadata source was unavailable or returned unusable data.
  ///
  /// This covers network failures against the arXiv API, non-success HTTP
  /// statuses, malformed Atom feeds, and feeds missing the required title or
  /// summary elements. The message carries the underlying cause; the call
  /// may simply be retried later.
  #[error("Metadata fetch failed: {0}")]
  MetadataFetch(String),

  /// A required configuration value could not be resolved.
  ///
  /// Typically a missing API credential: no explicit override was given and
  /// the corresponding environment variable is unset. Surfaced before any
  /// network call is attempted.
  #[error("Configuration error: {0}")]
  Config(String),

  /// The model provider rejected the supplied credential.
  ///
  /// Raised when the chat endpoint answers 401 or 403. The key is present
  /// but not accepted for the selected provider.
  #[error("Authentication failed: {0}")]
  Authentication(String),

  /// The model call failed or returned output violating the schema contract.
  ///
  /// This covers transport errors, non-success statuses other than the
  /// authentication ones, responses with no tool call, and tool-call
  /// arguments that cannot be coerced into the seven required fields. The
  /// caller may retry or switch provider/model.
  #[error("Model invocation failed: {0}")]
  ModelInvocation(String),

  /// A template and the supplied values don't line up.
  ///
  /// Raised when a document is rendered from a record without enrichment, or
  /// when a template references a placeholder no value was supplied for.
  /// This indicates a template or pipeline bug rather than a transient
  /// condition; a partially substituted document is never produced.
  #[error("Render failed: {0}")]
  Render(String),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A persisted record could not be serialized or deserialized.
  #[error(transparent)]
  Serde(#[from] serde_json::Error),
}
