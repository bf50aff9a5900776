//! Persistence of pipeline intermediate and final state.
//!
//! Each stage's output lands in its own file, named deterministically from
//! the paper identifier inside one output directory:
//!
//! - `<id>.jsonl`: the raw record, written right after the metadata fetch
//!   succeeds, so a later run can re-process without re-fetching;
//! - `<id>_enriched.jsonl`: the record plus enrichment result, written on
//!   enrichment success only;
//! - `<id>.md`: the rendered document.
//!
//! All writes are full-file overwrites. A crash mid-write can leave an
//! inconsistent file; that is acceptable because every stage's output is
//! regenerable by re-running the pipeline from the last successful stage.

use std::fs;

use super::*;
use crate::paper::PaperRecord;

/// Writes raw records, enriched records and rendered documents to disk.
pub struct PersistenceSink {
  /// Directory all artifacts are written into.
  output_dir: PathBuf,
}

impl PersistenceSink {
  /// Creates a sink rooted at the given directory.
  ///
  /// The directory is created lazily on the first write.
  pub fn new(output_dir: impl AsRef<Path>) -> Self {
    Self { output_dir: output_dir.as_ref().to_path_buf() }
  }

  /// Path of the raw record file for an identifier.
  pub fn raw_path(&self, id: &str) -> PathBuf { self.output_dir.join(format!("{id}.jsonl")) }

  /// Path of the enriched record file for an identifier.
  pub fn enriched_path(&self, id: &str) -> PathBuf {
    self.output_dir.join(format!("{id}_enriched.jsonl"))
  }

  /// Path of the rendered document file for an identifier.
  pub fn document_path(&self, id: &str) -> PathBuf { self.output_dir.join(format!("{id}.md")) }

  /// Writes the pre-enrichment record as one line of JSON.
  pub fn write_raw(&self, paper: &PaperRecord) -> Result<PathBuf> {
    self.write_record(self.raw_path(&paper.id), paper)
  }

  /// Writes the enriched record as one line of JSON.
  ///
  /// # Errors
  ///
  /// Returns [`EnricherError::Render`] if the record carries no enrichment;
  /// a partial result is never persisted as a success artifact.
  pub fn write_enriched(&self, paper: &PaperRecord) -> Result<PathBuf> {
    if paper.enrichment.is_none() {
      return Err(EnricherError::Render(format!(
        "refusing to persist record {} as enriched without an enrichment result",
        paper.id
      )));
    }
    self.write_record(self.enriched_path(&paper.id), paper)
  }

  /// Writes the rendered document as plain text.
  pub fn write_document(&self, id: &str, document: &str) -> Result<PathBuf> {
    let path = self.document_path(id);
    fs::create_dir_all(&self.output_dir)?;
    fs::write(&path, document)?;
    trace!("Wrote document to {}", path.display());
    Ok(path)
  }

  /// Reloads a previously persisted raw record.
  ///
  /// Lets a run resume from the fetch stage without hitting the network
  /// again.
  pub fn load_raw(&self, id: &str) -> Result<PaperRecord> {
    let content = fs::read_to_string(self.raw_path(id))?;
    let line = content.lines().find(|line| !line.trim().is_empty()).unwrap_or_default();
    Ok(serde_json::from_str(line)?)
  }

  /// Serializes one record as a single JSON line and overwrites `path`.
  fn write_record(&self, path: PathBuf, paper: &PaperRecord) -> Result<PathBuf> {
    fs::create_dir_all(&self.output_dir)?;
    let mut line = serde_json::to_string(paper)?;
    line.push('\n');
    fs::write(&path, line)?;
    trace!("Wrote record {} to {}", paper.id, path.display());
    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::paper::EnrichmentResult;

  fn sample_record() -> PaperRecord {
    PaperRecord {
      id:         "2301.00001".into(),
      title:      "A Title".into(),
      authors:    vec!["Someone".into()],
      summary:    "A summary.".into(),
      source_url: "https://arxiv.org/abs/2301.00001".into(),
      categories: vec!["cs.CL".into()],
      enrichment: None,
    }
  }

  fn sample_enrichment() -> EnrichmentResult {
    EnrichmentResult {
      tldr:           "t".into(),
      motivation:     "m".into(),
      method:         "m".into(),
      result:         "r".into(),
      conclusion:     "c".into(),
      paper_title_zh: "标题".into(),
      abstract_zh:    "摘要".into(),
    }
  }

  #[test]
  fn raw_record_round_trips() {
    let dir = tempdir().unwrap();
    let sink = PersistenceSink::new(dir.path());

    let record = sample_record();
    let path = sink.write_raw(&record).unwrap();
    assert_eq!(path, dir.path().join("2301.00001.jsonl"));

    let reloaded = sink.load_raw("2301.00001").unwrap();
    assert_eq!(record, reloaded);
  }

  #[test]
  fn written_files_are_single_json_lines() {
    let dir = tempdir().unwrap();
    let sink = PersistenceSink::new(dir.path());
    sink.write_raw(&sample_record()).unwrap();

    let content = std::fs::read_to_string(dir.path().join("2301.00001.jsonl")).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.ends_with('\n'));
  }

  #[test]
  fn rewrites_overwrite_instead_of_appending() {
    let dir = tempdir().unwrap();
    let sink = PersistenceSink::new(dir.path());

    sink.write_raw(&sample_record()).unwrap();
    let mut updated = sample_record();
    updated.title = "An Updated Title".into();
    sink.write_raw(&updated).unwrap();

    let reloaded = sink.load_raw("2301.00001").unwrap();
    assert_eq!(reloaded.title, "An Updated Title");
    let content = std::fs::read_to_string(sink.raw_path("2301.00001")).unwrap();
    assert_eq!(content.lines().count(), 1);
  }

  #[test]
  fn enriched_write_requires_an_enrichment() {
    let dir = tempdir().unwrap();
    let sink = PersistenceSink::new(dir.path());

    assert!(matches!(sink.write_enriched(&sample_record()), Err(EnricherError::Render(_))));

    let enriched = sample_record().with_enrichment(sample_enrichment());
    let path = sink.write_enriched(&enriched).unwrap();
    assert_eq!(path, dir.path().join("2301.00001_enriched.jsonl"));
  }

  #[test]
  fn document_lands_next_to_the_records() {
    let dir = tempdir().unwrap();
    let sink = PersistenceSink::new(dir.path());
    let path = sink.write_document("2301.00001", "## 1. A Title\n").unwrap();
    assert_eq!(path, dir.path().join("2301.00001.md"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "## 1. A Title\n");
  }
}
