/// LLM Client — the single point of entry for all generation calls.
///
/// ARCHITECTURAL RULE: No other module may talk to a model backend directly.
/// Engines depend on the [`GenerateText`] trait and receive an implementation
/// at construction time — there is no ambient model singleton. Adding a
/// second backend means adding a second implementation of the trait, not
/// branching inside an engine.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const OLLAMA_CHAT_PATH: &str = "/api/chat";
/// Sampling temperature for all calls. Low on purpose: the pipeline wants
/// schema-shaped output, not creativity.
const TEMPERATURE: f32 = 0.2;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("generation call exceeded the {REQUEST_TIMEOUT_SECS}s deadline")]
    Timeout,

    #[error("model returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(e)
        }
    }
}

/// The generation capability every engine is built against.
///
/// `instruction` carries the task and schema description, `payload` the
/// material to operate on. Retry, rate-limit, and backoff policy are NOT
/// this trait's concern — the engines own their bounded repair loops and
/// treat a failed invocation as terminal.
#[async_trait]
pub trait GenerateText: Send + Sync {
    async fn invoke(&self, instruction: &str, payload: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

/// [`GenerateText`] backed by a local Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerateText for OllamaClient {
    async fn invoke(&self, instruction: &str, payload: &str) -> Result<String, LlmError> {
        let request_body = OllamaChatRequest {
            model: &self.model,
            messages: vec![
                OllamaMessage {
                    role: "system",
                    content: instruction,
                },
                OllamaMessage {
                    role: "user",
                    content: payload,
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: TEMPERATURE,
            },
        };

        let url = format!("{}{}", self.base_url, OLLAMA_CHAT_PATH);
        let response = self.client.post(&url).json(&request_body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: OllamaChatResponse = response.json().await?;
        if chat.message.content.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }

        debug!(
            "generation call succeeded: {} response chars",
            chat.message.content.len()
        );

        Ok(chat.message.content)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// The prompts forbid fences, but smaller local models add them anyway.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
