/// LLM Client: the single point of entry for text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation service directly.
/// Everything goes through [`NarrativeGenerator`], which this client implements.
///
/// Request policy (model, persona, temperature, output ceiling) is fixed here and
/// is not caller-configurable. One call is one HTTP request: no retries, and no
/// client-side timeout. Callers that need bounded latency wrap the future.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// The model used for every narrative. Hardcoded to prevent drift.
pub const MODEL: &str = "gpt-4-turbo-preview";
/// Favors varied prose over deterministic output.
const TEMPERATURE: f64 = 0.8;
const MAX_TOKENS: u32 = 4000;

/// Typed outcome of a generation request. Never collapsed into a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Caller supplied malformed or missing input. Nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No service credential is configured. Nothing was sent.
    #[error("Narrative generation is not configured")]
    ServiceUnavailable,

    /// The remote call failed or returned unusable output.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Anything that can turn a compiled prompt into narrative text.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;

    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Token accounting is informational only; gateways may omit either count.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletion {
    /// Text of the first choice. Blank content counts as no content.
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The generation client. `Disabled` when no API key was configured at startup;
/// every call on a disabled client fails with `ServiceUnavailable` before any
/// network activity.
#[derive(Clone)]
pub enum LlmClient {
    Enabled(ChatClient),
    Disabled,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, base_url: &str) -> Self {
        match api_key.filter(|key| !key.trim().is_empty()) {
            Some(api_key) => LlmClient::Enabled(ChatClient::new(api_key, base_url)),
            None => LlmClient::Disabled,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.openai_api_key.clone(), &config.openai_base_url)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, LlmClient::Enabled(_))
    }
}

#[async_trait]
impl NarrativeGenerator for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        match self {
            LlmClient::Enabled(client) => client.complete(prompt).await,
            LlmClient::Disabled => Err(GenerationError::ServiceUnavailable),
        }
    }

    fn is_available(&self) -> bool {
        self.is_enabled()
    }
}

/// Chat-completions client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl ChatClient {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        }
    }

    /// Sends exactly one chat-completions request for `prompt`.
    pub async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "prompt cannot be empty".to_string(),
            ));
        }

        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::AUTOBIOGRAPHER_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                warn!("Generation request failed: {e}");
                GenerationError::GenerationFailed(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Generation service returned {status}: {message}");
            return Err(GenerationError::GenerationFailed(format!(
                "service returned {status}: {message}"
            )));
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| {
            GenerationError::GenerationFailed(format!("unreadable response: {e}"))
        })?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Generation call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion.into_text().ok_or_else(|| {
            GenerationError::GenerationFailed("service returned no content".to_string())
        })
    }
}
