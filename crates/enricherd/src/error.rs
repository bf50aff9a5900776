//! Error type for the CLI wrapper around the enricher pipeline.

use thiserror::Error;

/// Result type alias for the CLI.
pub type Result<T> = core::result::Result<T, EnricherdError>;

/// Errors surfaced by the CLI.
///
/// Mostly a thin wrapper: pipeline failures keep their typed kind from the
/// library, and anything touching the template files on disk comes through
/// as an I/O error.
#[derive(Error, Debug)]
pub enum EnricherdError {
  /// A pipeline stage failed; see [`enricher::error::EnricherError`].
  #[error(transparent)]
  Enricher(#[from] enricher::error::EnricherError),

  /// Reading a template file or writing an artifact failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}
