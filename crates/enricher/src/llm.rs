//! Structured-output language model invocation.
//!
//! This module turns a paper's title and abstract into the seven-field
//! structured summary. The model is not asked for free text: the request
//! carries a single function tool whose JSON schema is the
//! [`SchemaContract`], and `tool_choice` forces the model to call it, so on
//! success the response is coercible to exactly the contract shape. Extra
//! fields are ignored; a missing required field is a contract violation
//! reported as [`EnricherError::ModelInvocation`].
//!
//! The HTTP round trip lives behind the [`ChatTransport`] trait so tests can
//! substitute a stub and count calls. The default [`HttpTransport`] speaks
//! the OpenAI-compatible `chat/completions` wire format, which the usual
//! hosted providers and local gateways all accept.
//!
//! # Examples
//!
//! ```no_run
//! use enricher::{
//!   config::{ConfigOverrides, EngineConfig},
//!   llm::EnrichmentEngine,
//!   prelude::*,
//! };
//!
//! # async fn example(paper: enricher::paper::PaperRecord) -> Result<()> {
//! let config = EngineConfig::resolve(ConfigOverrides::default())?;
//! let engine = EnrichmentEngine::new(
//!   config,
//!   "You summarize papers in {language}.",
//!   "Title: {title}\n\nAbstract: {content}",
//! );
//! let enrichment = engine.enrich(&paper).await?;
//! println!("TL;DR: {}", enrichment.tldr);
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::{
  config::EngineConfig,
  paper::{EnrichmentResult, PaperRecord},
  template::fill,
};

/// Name of the function tool the model is forced to call.
const FUNCTION_NAME: &str = "structured_summary";

/// The fixed structured-output shape the model must populate.
///
/// Seven required string fields, each carrying a human-readable description
/// that tells the model what the field means and which language to respond
/// in. The descriptions are parameterized by the configured target language;
/// the field names themselves stay fixed so the persisted format never
/// changes.
#[derive(Debug, Clone)]
pub struct SchemaContract {
  /// Target natural language the descriptions instruct the model to use.
  language: String,
}

impl SchemaContract {
  /// Creates the contract for a target language.
  pub fn new(language: impl Into<String>) -> Self { Self { language: language.into() } }

  /// The required field names, in schema order.
  pub const FIELDS: [&'static str; 7] =
    ["tldr", "motivation", "method", "result", "conclusion", "paper_title_zh", "abstract_zh"];

  /// Builds the JSON schema for the function tool's parameters.
  pub fn parameters(&self) -> Value {
    let language = &self.language;
    json!({
      "type": "object",
      "properties": {
        "tldr": {
          "type": "string",
          "description": format!("generate a too long; didn't read summary in {language}"),
        },
        "motivation": {
          "type": "string",
          "description": format!("describe the motivation in this paper in {language}"),
        },
        "method": {
          "type": "string",
          "description": format!("method of this paper in {language}"),
        },
        "result": {
          "type": "string",
          "description": format!("result of this paper in {language}"),
        },
        "conclusion": {
          "type": "string",
          "description": format!("conclusion of this paper in {language}"),
        },
        "paper_title_zh": {
          "type": "string",
          "description": format!("translate the paper title to {language}"),
        },
        "abstract_zh": {
          "type": "string",
          "description": format!("translate the abstract to {language}"),
        },
      },
      "required": Self::FIELDS,
    })
  }

  /// Wraps the schema into the function tool sent with the request.
  pub fn as_tool(&self) -> Tool {
    Tool {
      kind:     "function",
      function: FunctionDef {
        name:        FUNCTION_NAME.to_string(),
        description: format!("Produce a structured summary of an academic paper in {}", self.language),
        parameters:  self.parameters(),
      },
    }
  }

  /// The `tool_choice` value forcing the model to call the function.
  pub fn tool_choice(&self) -> Value {
    json!({ "type": "function", "function": { "name": FUNCTION_NAME } })
  }

  /// Coerces raw tool-call arguments into an [`EnrichmentResult`].
  ///
  /// # Errors
  ///
  /// Returns [`EnricherError::ModelInvocation`] when the arguments are not
  /// valid JSON or a required field is missing. Fields beyond the contract
  /// are ignored.
  pub fn coerce(&self, arguments: &str) -> Result<EnrichmentResult> {
    serde_json::from_str(arguments).map_err(|e| {
      EnricherError::ModelInvocation(format!("tool call arguments violate the schema contract: {e}"))
    })
  }
}

/// A single chat message, system or user role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  /// The role of the message sender, "system" or "user" here.
  pub role:    String,
  /// The rendered template text for that role.
  pub content: String,
}

/// A function tool offered to the model.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
  /// Tool kind; always "function" for this pipeline.
  #[serde(rename = "type")]
  pub kind:     &'static str,
  /// The function declaration itself.
  pub function: FunctionDef,
}

/// Declaration of a callable function and its parameter schema.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDef {
  /// Function name the model must echo back in its tool call.
  pub name:        String,
  /// Human-readable description of what the function produces.
  pub description: String,
  /// JSON schema of the accepted arguments.
  pub parameters:  Value,
}

/// Request body for the `chat/completions` endpoint.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
  /// Model identifier, e.g. "deepseek-chat".
  pub model:       String,
  /// System and user messages, in order.
  pub messages:    Vec<Message>,
  /// The tools offered to the model; exactly one here.
  pub tools:       Vec<Tool>,
  /// Forces the model to call the schema-contract function.
  pub tool_choice: Value,
}

/// Response body from the `chat/completions` endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
  /// Completion choices; the first one carries the tool call.
  pub choices: Vec<Choice>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
  /// The assistant message for this choice.
  pub message: AssistantMessage,
}

/// Assistant message within a completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
  /// Free-text content; unused when a tool call is forced.
  #[serde(default)]
  pub content:    Option<String>,
  /// Tool calls emitted by the model.
  #[serde(default)]
  pub tool_calls: Vec<ToolCall>,
}

/// A tool call emitted by the model.
#[derive(Debug, Deserialize)]
pub struct ToolCall {
  /// The called function and its arguments.
  pub function: FunctionCall,
}

/// The function name and serialized arguments of a tool call.
#[derive(Debug, Deserialize)]
pub struct FunctionCall {
  /// Name of the called function.
  pub name:      String,
  /// JSON-encoded arguments, to be coerced against the contract.
  pub arguments: String,
}

/// Transport seam for the chat completion round trip.
///
/// The engine builds the full request; implementations only move it across
/// the wire. Tests use a stub implementation with an atomic call counter to
/// assert, for example, that no call is made when configuration fails.
#[async_trait]
pub trait ChatTransport: Send + Sync {
  /// Sends one chat completion request and decodes the response body.
  async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Default transport speaking the OpenAI-compatible HTTP wire format.
pub struct HttpTransport {
  /// Internal web client, reused across requests.
  client:   reqwest::Client,
  /// Base endpoint, e.g. "https://api.openai.com/v1".
  base_url: String,
  /// Bearer credential for the provider.
  api_key:  String,
}

impl HttpTransport {
  /// Creates a transport for the configured provider.
  pub fn new(config: &EngineConfig) -> Self {
    Self {
      client:   reqwest::Client::new(),
      base_url: config.base_url.trim_end_matches('/').to_string(),
      api_key:  config.api_key.clone(),
    }
  }
}

#[async_trait]
impl ChatTransport for HttpTransport {
  async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
    let url = format!("{}/chat/completions", self.base_url);

    debug!("Requesting completion from {url}");

    let response = self
      .client
      .post(&url)
      .bearer_auth(&self.api_key)
      .json(request)
      .send()
      .await
      .map_err(|e| EnricherError::ModelInvocation(format!("request to {url} failed: {e}")))?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
      return Err(EnricherError::Authentication(format!(
        "provider rejected the API key (status {status})"
      )));
    }
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(EnricherError::ModelInvocation(format!(
        "provider returned status {status}: {body}"
      )));
    }

    response
      .json()
      .await
      .map_err(|e| EnricherError::ModelInvocation(format!("undecodable completion response: {e}")))
  }
}

/// Transforms a paper's title and abstract into an [`EnrichmentResult`].
///
/// The engine renders the externally supplied system and user templates with
/// the target language and the paper's title and summary, submits them as a
/// two-message instruction with the contract's function tool, and validates
/// the response. A single attempt is made per invocation; retry policy is
/// the caller's concern.
pub struct EnrichmentEngine {
  /// Resolved provider and language configuration.
  config:          EngineConfig,
  /// The output schema the model is constrained to.
  contract:        SchemaContract,
  /// System instruction template with a `{language}` placeholder.
  system_template: String,
  /// User instruction template with `{language}`, `{title}` and `{content}`
  /// placeholders.
  user_template:   String,
  /// Wire transport; swapped out in tests.
  transport:       Box<dyn ChatTransport>,
}

impl EnrichmentEngine {
  /// Creates an engine with the default HTTP transport.
  pub fn new(
    config: EngineConfig,
    system_template: impl Into<String>,
    user_template: impl Into<String>,
  ) -> Self {
    let transport = Box::new(HttpTransport::new(&config));
    let contract = SchemaContract::new(&config.language);
    Self {
      config,
      contract,
      system_template: system_template.into(),
      user_template: user_template.into(),
      transport,
    }
  }

  /// Replaces the transport, mainly to stub out the network in tests.
  pub fn with_transport(mut self, transport: Box<dyn ChatTransport>) -> Self {
    self.transport = transport;
    self
  }

  /// Runs one enrichment attempt for the given paper.
  ///
  /// # Errors
  ///
  /// - [`EnricherError::Render`] if a prompt template references an unknown
  ///   placeholder.
  /// - [`EnricherError::Authentication`] if the provider rejects the key.
  /// - [`EnricherError::ModelInvocation`] for transport failures, responses
  ///   without a tool call, and schema-contract violations.
  #[instrument(skip(self, paper), fields(paper_id = %paper.id, model = %self.config.model))]
  pub async fn enrich(&self, paper: &PaperRecord) -> Result<EnrichmentResult> {
    let values = BTreeMap::from([
      ("language", self.config.language.clone()),
      ("title", paper.title.clone()),
      ("content", paper.summary.clone()),
    ]);

    let request = ChatRequest {
      model:       self.config.model.clone(),
      messages:    vec![
        Message { role: "system".to_string(), content: fill(&self.system_template, &values)? },
        Message { role: "user".to_string(), content: fill(&self.user_template, &values)? },
      ],
      tools:       vec![self.contract.as_tool()],
      tool_choice: self.contract.tool_choice(),
    };

    let response = self.transport.complete(&request).await?;

    let call = response
      .choices
      .first()
      .and_then(|choice| choice.message.tool_calls.first())
      .ok_or_else(|| {
        EnricherError::ModelInvocation("completion contained no tool call".to_string())
      })?;

    if call.function.name != FUNCTION_NAME {
      warn!("Model called unexpected function {}", call.function.name);
    }

    self.contract.coerce(&call.function.arguments)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn schema_lists_all_seven_required_fields() {
    let contract = SchemaContract::new("Chinese");
    let parameters = contract.parameters();

    let required: Vec<&str> =
      parameters["required"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(required, SchemaContract::FIELDS);

    for field in SchemaContract::FIELDS {
      let description = parameters["properties"][field]["description"].as_str().unwrap();
      assert!(description.contains("Chinese"), "{field} description lacks the language");
    }
  }

  #[test]
  fn coerces_conforming_arguments() {
    let contract = SchemaContract::new("Chinese");
    let arguments = serde_json::json!({
      "tldr": "一句话总结",
      "motivation": "动机",
      "method": "方法",
      "result": "结果",
      "conclusion": "结论",
      "paper_title_zh": "标题",
      "abstract_zh": "摘要",
    })
    .to_string();

    let enrichment = contract.coerce(&arguments).unwrap();
    assert_eq!(enrichment.tldr, "一句话总结");
    assert_eq!(enrichment.paper_title_zh, "标题");
  }

  #[test]
  fn extra_fields_are_ignored() {
    let contract = SchemaContract::new("Chinese");
    let arguments = serde_json::json!({
      "tldr": "t", "motivation": "m", "method": "m", "result": "r",
      "conclusion": "c", "paper_title_zh": "p", "abstract_zh": "a",
      "confidence": 0.9,
    })
    .to_string();
    assert!(contract.coerce(&arguments).is_ok());
  }

  #[test]
  fn missing_field_is_a_contract_violation() {
    let contract = SchemaContract::new("Chinese");
    let arguments = serde_json::json!({
      "tldr": "t", "motivation": "m", "method": "m", "result": "r",
      "conclusion": "c", "paper_title_zh": "p",
    })
    .to_string();
    assert!(matches!(
      contract.coerce(&arguments),
      Err(EnricherError::ModelInvocation(message)) if message.contains("abstract_zh")
    ));
  }

  #[test]
  fn malformed_arguments_are_a_contract_violation() {
    let contract = SchemaContract::new("Chinese");
    assert!(matches!(
      contract.coerce("not json"),
      Err(EnricherError::ModelInvocation(_))
    ));
  }

  #[test]
  fn tool_choice_forces_the_contract_function() {
    let contract = SchemaContract::new("English");
    assert_eq!(contract.tool_choice()["function"]["name"], FUNCTION_NAME);
    assert_eq!(contract.as_tool().function.name, FUNCTION_NAME);
  }
}
