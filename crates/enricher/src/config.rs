//! Credential and provider configuration.
//!
//! Configuration is resolved once, before any network call, and passed by
//! value into the engine rather than read ad hoc. Each value follows the
//! same precedence: explicit override, then environment variable, then
//! provider default. Only the API key has no default; its absence is a
//! [`EnricherError::Config`] surfaced to the caller immediately.

use super::*;

/// Environment variable holding the provider API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the provider base endpoint.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "MODEL_NAME";
/// Environment variable overriding the target language.
pub const LANGUAGE_VAR: &str = "LANGUAGE";

/// Default base endpoint when neither override nor environment supplies one.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "deepseek-chat";
/// Default target language for the structured summary.
pub const DEFAULT_LANGUAGE: &str = "Chinese";

/// Explicit configuration overrides, taking precedence over the environment.
///
/// Typically populated from command-line flags; any field left `None` falls
/// through to the environment variable and then the default.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  /// Overrides [`API_KEY_VAR`].
  pub api_key:  Option<String>,
  /// Overrides [`BASE_URL_VAR`].
  pub base_url: Option<String>,
  /// Overrides [`MODEL_VAR`].
  pub model:    Option<String>,
  /// Overrides [`LANGUAGE_VAR`].
  pub language: Option<String>,
}

/// Fully resolved configuration handed to the enrichment engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
  /// Bearer credential for the provider.
  pub api_key:  String,
  /// Base endpoint of the OpenAI-compatible API.
  pub base_url: String,
  /// Model identifier submitted with each request.
  pub model:    String,
  /// Target natural language for every generated field.
  pub language: String,
}

impl EngineConfig {
  /// Resolves configuration from overrides and the process environment.
  ///
  /// # Errors
  ///
  /// Returns [`EnricherError::Config`] when no API key is resolvable in any
  /// precedence tier.
  pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
    Self::resolve_with(overrides, |name| std::env::var(name).ok())
  }

  /// Resolves configuration against an explicit environment lookup.
  ///
  /// Tests pass a closure instead of mutating the process environment.
  pub fn resolve_with(
    overrides: ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
  ) -> Result<Self> {
    let api_key = overrides.api_key.or_else(|| env(API_KEY_VAR)).ok_or_else(|| {
      EnricherError::Config(format!(
        "no API key resolvable: pass one explicitly or set {API_KEY_VAR}"
      ))
    })?;

    Ok(Self {
      api_key,
      base_url: overrides
        .base_url
        .or_else(|| env(BASE_URL_VAR))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
      model: overrides
        .model
        .or_else(|| env(MODEL_VAR))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
      language: overrides
        .language
        .or_else(|| env(LANGUAGE_VAR))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Environment stub returning values from a fixed list.
  fn env_of<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| pairs.iter().find(|(key, _)| *key == name).map(|(_, value)| value.to_string())
  }

  #[test]
  fn explicit_override_beats_environment() {
    let overrides = ConfigOverrides {
      api_key: Some("override-key".into()),
      model: Some("override-model".into()),
      ..Default::default()
    };
    let config = EngineConfig::resolve_with(
      overrides,
      env_of(&[(API_KEY_VAR, "env-key"), (MODEL_VAR, "env-model")]),
    )
    .unwrap();
    assert_eq!(config.api_key, "override-key");
    assert_eq!(config.model, "override-model");
  }

  #[test]
  fn environment_beats_defaults() {
    let config = EngineConfig::resolve_with(
      ConfigOverrides::default(),
      env_of(&[
        (API_KEY_VAR, "env-key"),
        (BASE_URL_VAR, "https://llm.internal/v1"),
        (LANGUAGE_VAR, "English"),
      ]),
    )
    .unwrap();
    assert_eq!(config.base_url, "https://llm.internal/v1");
    assert_eq!(config.language, "English");
    assert_eq!(config.model, DEFAULT_MODEL);
  }

  #[test]
  fn defaults_fill_everything_but_the_key() {
    let config =
      EngineConfig::resolve_with(ConfigOverrides::default(), env_of(&[(API_KEY_VAR, "k")]))
        .unwrap();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.language, DEFAULT_LANGUAGE);
  }

  #[test]
  fn missing_key_is_a_configuration_error() {
    let result = EngineConfig::resolve_with(ConfigOverrides::default(), |_| None);
    assert!(matches!(
      result,
      Err(EnricherError::Config(message)) if message.contains(API_KEY_VAR)
    ));
  }
}
