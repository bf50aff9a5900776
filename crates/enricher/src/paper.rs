//! Core paper record and enrichment result types.
//!
//! This module provides the canonical in-memory representation of one paper
//! as it moves through the pipeline. A [`PaperRecord`] is constructed once
//! per run by the metadata source (or supplied literally in tests), enriched
//! at most once by the engine, and then consumed by the renderer.
//!
//! The serialized shape matches the line-delimited JSON files the pipeline
//! persists: the canonical link is stored under the `abs` key and the
//! enrichment result under the `AI` key, which is omitted entirely until the
//! engine has succeeded.
//!
//! # Examples
//!
//! ```
//! use enricher::paper::{EnrichmentResult, PaperRecord};
//!
//! let record = PaperRecord {
//!   id:         "2301.07041".into(),
//!   title:      "Verifiable Fully Homomorphic Encryption".into(),
//!   authors:    vec!["Alexander Viand".into(), "Christian Knabenhans".into()],
//!   summary:    "Fully Homomorphic Encryption (FHE) is seeing increasing ...".into(),
//!   source_url: "https://arxiv.org/abs/2301.07041".into(),
//!   categories: vec!["cs.CR".into()],
//!   enrichment: None,
//! };
//! assert!(record.enrichment.is_none());
//! ```

use super::*;

/// Canonical in-memory representation of a paper and its enrichment result.
///
/// Carries the metadata fetched from the bibliographic source plus, after a
/// successful model call, the structured summary. The record is never shared
/// across concurrent enrichment attempts; exactly one is in flight per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
  /// Opaque, externally assigned identifier (an arXiv accession number).
  pub id:         String,
  /// Paper title in the source language, never empty.
  pub title:      String,
  /// Author names in display order; may be empty.
  pub authors:    Vec<String>,
  /// Abstract text used as the model input, never empty.
  pub summary:    String,
  /// Canonical reference link, persisted under the original `abs` key.
  #[serde(rename = "abs")]
  pub source_url: String,
  /// Classification tags in source order; may be empty, in which case the
  /// renderer substitutes the "N/A" sentinel.
  pub categories: Vec<String>,
  /// Structured summary, absent until the enrichment engine succeeds.
  #[serde(rename = "AI", skip_serializing_if = "Option::is_none", default)]
  pub enrichment: Option<EnrichmentResult>,
}

/// Structured summary produced by the enrichment engine.
///
/// All seven fields are present and non-null whenever the engine reports
/// success; a partial result is never constructed. The translated fields
/// keep the `_zh` names of the persisted format regardless of the configured
/// target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentResult {
  /// One-sentence "too long; didn't read" summary in the target language.
  pub tldr:           String,
  /// What problem motivated the paper.
  pub motivation:     String,
  /// How the paper approaches the problem.
  pub method:         String,
  /// What the experiments or analysis showed.
  pub result:         String,
  /// What the authors conclude.
  pub conclusion:     String,
  /// Paper title translated into the target language.
  pub paper_title_zh: String,
  /// Abstract translated into the target language.
  pub abstract_zh:    String,
}

impl PaperRecord {
  /// Attaches an enrichment result to this record.
  ///
  /// A record is enriched at most once per run; attaching a second result
  /// replaces nothing silently but is logged, since it points at a pipeline
  /// driving the record through the engine twice.
  pub fn with_enrichment(mut self, enrichment: EnrichmentResult) -> Self {
    if self.enrichment.is_some() {
      warn!("Record {} was already enriched; replacing the previous result", self.id);
    }
    self.enrichment = Some(enrichment);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_record() -> PaperRecord {
    PaperRecord {
      id:         "2301.07041".into(),
      title:      "Verifiable Fully Homomorphic Encryption".into(),
      authors:    vec!["Alexander Viand".into(), "Christian Knabenhans".into()],
      summary:    "Fully Homomorphic Encryption (FHE) is seeing increasing use.".into(),
      source_url: "https://arxiv.org/abs/2301.07041".into(),
      categories: vec!["cs.CR".into()],
      enrichment: None,
    }
  }

  #[test]
  fn serializes_with_original_keys() {
    let line = serde_json::to_string(&sample_record()).unwrap();
    assert!(line.contains("\"abs\":"));
    // The enrichment key only appears once the engine has succeeded.
    assert!(!line.contains("\"AI\":"));
  }

  #[test]
  fn round_trips_through_json() {
    let record = sample_record();
    let line = serde_json::to_string(&record).unwrap();
    let reloaded: PaperRecord = serde_json::from_str(&line).unwrap();
    assert_eq!(record, reloaded);
  }

  #[test]
  fn enrichment_round_trips_under_ai_key() {
    let record = sample_record().with_enrichment(EnrichmentResult {
      tldr:           "tldr".into(),
      motivation:     "motivation".into(),
      method:         "method".into(),
      result:         "result".into(),
      conclusion:     "conclusion".into(),
      paper_title_zh: "标题".into(),
      abstract_zh:    "摘要".into(),
    });
    let line = serde_json::to_string(&record).unwrap();
    assert!(line.contains("\"AI\":"));
    let reloaded: PaperRecord = serde_json::from_str(&line).unwrap();
    assert_eq!(record, reloaded);
  }
}
