//! Document rendering from enriched paper records.
//!
//! The renderer merges a [`PaperRecord`] and its enrichment result into a
//! fixed-format markdown document via positional template substitution. It
//! refuses to render a record that has not been enriched; a document with
//! blank AI fields is never produced.
//!
//! # Examples
//!
//! ```
//! use enricher::{
//!   paper::{EnrichmentResult, PaperRecord},
//!   render::DocumentRenderer,
//! };
//!
//! # fn example(paper: PaperRecord) -> Result<(), enricher::error::EnricherError> {
//! let mut renderer = DocumentRenderer::new("## {idx}. [{title}]({url})\n\n{tldr}\n");
//! let document = renderer.render(&paper)?;
//! assert!(!document.contains('{'));
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::{paper::PaperRecord, template::fill};

/// Sentinel substituted for the category field when the record has none.
const CATEGORY_SENTINEL: &str = "N/A";

/// Renders enriched records into the target document format.
///
/// The template may reference twelve placeholders: `{title}`, `{authors}`,
/// `{url}`, `{tldr}`, `{motivation}`, `{method}`, `{result}`,
/// `{conclusion}`, `{paper_title_zh}`, `{abstract_zh}`, `{cate}` and
/// `{idx}`. The running index is seeded at 1 for the first document of a run
/// and increases monotonically, so multi-document batches never renumber.
pub struct DocumentRenderer {
  /// The document template text.
  template: String,
  /// Running index of the next document to render.
  idx:      usize,
}

impl DocumentRenderer {
  /// Creates a renderer for the given template, with the index seeded at 1.
  pub fn new(template: impl Into<String>) -> Self { Self { template: template.into(), idx: 1 } }

  /// Renders one enriched record, consuming the next running index.
  ///
  /// Authors are flattened into a comma-joined string and the first category
  /// becomes the `{cate}` field, with [`CATEGORY_SENTINEL`] standing in when
  /// the record carries no categories.
  ///
  /// # Errors
  ///
  /// Returns [`EnricherError::Render`] when the record has no enrichment or
  /// the template references an unsupplied placeholder. The index is only
  /// consumed on success.
  pub fn render(&mut self, paper: &PaperRecord) -> Result<String> {
    let Some(enrichment) = &paper.enrichment else {
      return Err(EnricherError::Render(format!(
        "record {} has no enrichment result to render",
        paper.id
      )));
    };

    let values = BTreeMap::from([
      ("title", paper.title.clone()),
      ("authors", paper.authors.join(",")),
      ("url", paper.source_url.clone()),
      ("tldr", enrichment.tldr.clone()),
      ("motivation", enrichment.motivation.clone()),
      ("method", enrichment.method.clone()),
      ("result", enrichment.result.clone()),
      ("conclusion", enrichment.conclusion.clone()),
      ("paper_title_zh", enrichment.paper_title_zh.clone()),
      ("abstract_zh", enrichment.abstract_zh.clone()),
      (
        "cate",
        paper.categories.first().cloned().unwrap_or_else(|| CATEGORY_SENTINEL.to_string()),
      ),
      ("idx", self.idx.to_string()),
    ]);

    let document = fill(&self.template, &values)?;
    self.idx += 1;
    Ok(document)
  }
}
