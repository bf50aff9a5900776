//! Named-placeholder template substitution.
//!
//! Both the prompt templates fed to the model and the markdown document
//! template go through the same [`fill`] function: a closed set of named
//! values is substituted into `{placeholder}` markers, and any placeholder
//! without a value fails the whole render instead of leaking into the
//! output.

use super::*;

lazy_static! {
  /// Matches `{name}` markers; names are restricted to identifier characters
  /// so literal braces in surrounding text pass through untouched.
  static ref PLACEHOLDER: Regex = Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap();
}

/// Substitutes named values into a template.
///
/// Every `{name}` marker in `template` is replaced by the matching entry in
/// `values`. Supplying values the template never references is fine; the
/// reverse is not.
///
/// # Errors
///
/// Returns [`EnricherError::Render`] naming the offending placeholder when
/// the template references a name with no supplied value. The template is
/// checked up front, so a failed call produces no partially substituted
/// text.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use enricher::template::fill;
///
/// let values = BTreeMap::from([("title", "Attention Is All You Need".to_string())]);
/// let text = fill("# {title}", &values).unwrap();
/// assert_eq!(text, "# Attention Is All You Need");
/// ```
pub fn fill(template: &str, values: &BTreeMap<&str, String>) -> Result<String> {
  for captures in PLACEHOLDER.captures_iter(template) {
    let name = &captures[1];
    if !values.contains_key(name) {
      return Err(EnricherError::Render(format!(
        "template references placeholder {{{name}}} but no value was supplied"
      )));
    }
  }

  Ok(
    PLACEHOLDER
      .replace_all(template, |captures: &regex::Captures| values[&captures[1]].clone())
      .into_owned(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn substitutes_all_placeholders() {
    let values = BTreeMap::from([
      ("title", "A Paper".to_string()),
      ("language", "Chinese".to_string()),
      ("content", "An abstract.".to_string()),
    ]);
    let text = fill("Summarize {title} in {language}:\n{content}", &values).unwrap();
    assert_eq!(text, "Summarize A Paper in Chinese:\nAn abstract.");
  }

  #[test]
  fn repeated_placeholders_are_each_replaced() {
    let values = BTreeMap::from([("x", "1".to_string())]);
    assert_eq!(fill("{x}{x}{x}", &values).unwrap(), "111");
  }

  #[test]
  fn unused_values_are_allowed() {
    let values =
      BTreeMap::from([("used", "yes".to_string()), ("ignored", "whatever".to_string())]);
    assert_eq!(fill("{used}", &values).unwrap(), "yes");
  }

  #[test]
  fn missing_value_names_the_placeholder() {
    let err = fill("{title} by {authors}", &BTreeMap::new()).unwrap_err();
    match err {
      EnricherError::Render(message) => assert!(message.contains("{title}")),
      other => panic!("expected a render error, got {other:?}"),
    }
  }

  #[test]
  fn literal_braces_survive() {
    let values = BTreeMap::from([("idx", "1".to_string())]);
    // A brace pair that is not an identifier is not a placeholder.
    assert_eq!(fill("{idx}: f(x) = {{}}", &values).unwrap(), "1: f(x) = {{}}");
  }
}
