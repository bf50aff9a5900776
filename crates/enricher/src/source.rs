//! Metadata retrieval from the arXiv Atom API.
//!
//! This module resolves a user-supplied paper reference into a
//! [`PaperRecord`]. The reference is validated against the known accession
//! number pattern before any network call, then the arXiv query API
//! (`http://export.arxiv.org/api/query`) is hit and its Atom feed parsed
//! into the common record shape.
//!
//! The [`MetadataSource`] trait is the seam between the pipeline and the
//! external bibliographic service; tests substitute a stub implementation
//! and never touch the network.
//!
//! # Examples
//!
//! ```no_run
//! use enricher::source::{extract_identifier, ArxivClient, MetadataSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let id = extract_identifier("https://arxiv.org/abs/2301.07041")?;
//! let paper = ArxivClient::new().fetch(&id).await?;
//!
//! println!("Title: {}", paper.title);
//! println!("Authors: {}", paper.authors.join(","));
//! # Ok(())
//! # }
//! ```

use quick_xml::de::from_str;

use super::*;
use crate::paper::PaperRecord;

lazy_static! {
  /// Bare new-style arXiv accession number, e.g. "2301.07041".
  static ref ARXIV_ID: Regex = Regex::new(r"^\d+\.\d+$").unwrap();
  /// Abstract or PDF page URL carrying an accession number.
  static ref ARXIV_URL: Regex =
    Regex::new(r"^https?://arxiv\.org/(?:abs|pdf)/(\d+\.\d+)(?:v\d+)?(?:\.pdf)?$").unwrap();
  /// Collapses the hard-wrapped whitespace arXiv puts in titles and summaries.
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Extracts the arXiv accession number from a user-supplied reference.
///
/// Accepts either a bare identifier ("2301.07041") or an abstract/PDF URL
/// ("https://arxiv.org/abs/2301.07041"). Validation happens entirely
/// locally, before any network call.
///
/// # Errors
///
/// Returns [`EnricherError::InvalidReference`] when the input matches
/// neither form.
///
/// # Examples
///
/// ```
/// use enricher::source::extract_identifier;
///
/// assert_eq!(extract_identifier("https://arxiv.org/abs/2301.00001").unwrap(), "2301.00001");
/// assert!(extract_identifier("https://example.com/paper").is_err());
/// ```
pub fn extract_identifier(reference: &str) -> Result<String> {
  if ARXIV_ID.is_match(reference) {
    return Ok(reference.to_string());
  }
  ARXIV_URL
    .captures(reference)
    .and_then(|captures| captures.get(1))
    .map(|id| id.as_str().to_string())
    .ok_or(EnricherError::InvalidReference)
}

/// Resolves a paper identifier into a [`PaperRecord`].
///
/// Implementations are idempotent: repeated calls for the same identifier
/// yield the same record, modulo upstream changes. On failure no partial
/// record is returned.
#[async_trait]
pub trait MetadataSource: Send + Sync {
  /// Fetches the paper's metadata and constructs a record.
  async fn fetch(&self, identifier: &str) -> Result<PaperRecord>;
}

/// Internal representation of the arXiv API's Atom feed response.
#[derive(Debug, Deserialize)]
struct Feed {
  /// A feed may contain multiple entries; a single-identifier query
  /// normally returns exactly one.
  #[serde(rename = "entry", default)]
  entries: Vec<Entry>,
}

/// Internal representation of a paper entry from arXiv's API response.
#[derive(Debug, Deserialize)]
struct Entry {
  /// Paper title (may contain LaTeX markup and hard-wrapped whitespace)
  #[serde(default)]
  title:      Option<String>,
  /// Paper abstract, same caveats as the title
  #[serde(default)]
  summary:    Option<String>,
  /// List of paper authors
  #[serde(rename = "author", default)]
  authors:    Vec<EntryAuthor>,
  /// arXiv abstract URL (e.g., "http://arxiv.org/abs/2301.07041v1")
  #[serde(rename = "id", default)]
  url:        Option<String>,
  /// Subject classification tags; the primary category comes first
  #[serde(rename = "category", default)]
  categories: Vec<EntryCategory>,
}

/// Internal representation of an author from arXiv's API response.
#[derive(Debug, Deserialize)]
struct EntryAuthor {
  /// Author's full name
  name: String,
}

/// Internal representation of a subject classification element.
#[derive(Debug, Deserialize)]
struct EntryCategory {
  /// The classification tag itself, e.g. "cs.CL"
  #[serde(rename = "@term")]
  term: String,
}

/// Client for the arXiv metadata API.
///
/// Fetches paper metadata over the public Atom feed API and converts it to a
/// [`PaperRecord`]. The HTTP client is reused across requests.
pub struct ArxivClient {
  /// Internal web client used to connect to the API.
  client: reqwest::Client,
}

impl ArxivClient {
  /// Creates a new arXiv client instance.
  pub fn new() -> Self { Self { client: reqwest::Client::new() } }
}

impl Default for ArxivClient {
  fn default() -> Self { Self::new() }
}

#[async_trait]
impl MetadataSource for ArxivClient {
  #[instrument(skip(self))]
  async fn fetch(&self, identifier: &str) -> Result<PaperRecord> {
    let url = format!("http://export.arxiv.org/api/query?id_list={identifier}&max_results=1");

    debug!("Fetching from arXiv via: {url}");

    let response = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| EnricherError::MetadataFetch(format!("request to arXiv failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
      return Err(EnricherError::MetadataFetch(format!("arXiv returned status {status}")));
    }

    let body = response
      .text()
      .await
      .map_err(|e| EnricherError::MetadataFetch(format!("reading arXiv response failed: {e}")))?;

    trace!("arXiv response: {body}");

    parse_feed(identifier, &body)
  }
}

/// Parses an arXiv Atom feed into a [`PaperRecord`].
///
/// Title and summary are required; a missing primary-category element is
/// tolerated and leaves `categories` empty. Hard-wrapped whitespace in the
/// title and summary is collapsed to single spaces.
fn parse_feed(identifier: &str, body: &str) -> Result<PaperRecord> {
  let feed: Feed = from_str(body)
    .map_err(|e| EnricherError::MetadataFetch(format!("failed to parse Atom feed: {e}")))?;

  if feed.entries.len() > 1 {
    warn!("arXiv returned {} entries for {identifier}; using the first", feed.entries.len());
  }
  let entry = feed
    .entries
    .into_iter()
    .next()
    .ok_or_else(|| EnricherError::MetadataFetch(format!("no entry found for {identifier}")))?;

  let title = entry
    .title
    .as_deref()
    .map(normalize_whitespace)
    .filter(|title| !title.is_empty())
    .ok_or_else(|| EnricherError::MetadataFetch(format!("entry for {identifier} has no title")))?;
  let summary =
    entry.summary.as_deref().map(normalize_whitespace).filter(|s| !s.is_empty()).ok_or_else(
      || EnricherError::MetadataFetch(format!("entry for {identifier} has no summary")),
    )?;

  let source_url = entry
    .url
    .unwrap_or_else(|| format!("https://arxiv.org/abs/{identifier}"));

  Ok(PaperRecord {
    id: identifier.to_string(),
    title,
    authors: entry.authors.into_iter().map(|author| author.name).collect(),
    summary,
    source_url,
    categories: entry.categories.into_iter().map(|category| category.term).collect(),
    enrichment: None,
  })
}

/// Collapses runs of whitespace into single spaces and trims the ends.
fn normalize_whitespace(text: &str) -> String { WHITESPACE.replace_all(text.trim(), " ").into_owned() }
