//! Generation client — the single point of entry for all generation-service
//! calls. No other module may talk to the upstream model API directly.
//!
//! The call is one blocking round trip: no internal retry, no response
//! caching. The caller decides whether to resubmit a failed request.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod extract;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all product generation calls.
pub const MODEL: &str = "gpt-4";
const MAX_TOKENS: u32 = 2000;
/// High-determinism output keeps generated records structurally uniform.
const TEMPERATURE: f32 = 0.0;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Credential rejected by generation service")]
    CredentialRejected,

    #[error("Generation service error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Generation service returned empty content")]
    EmptyContent,

    #[error("No product record could be extracted: {detail}")]
    Parse { detail: String, raw: String },
}

/// Text-completion seam. `OpenAiClient` is the production implementation;
/// tests substitute a stub. Held in `AppState` as `Arc<dyn GenerationService>`.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Sends one system + user message pair and returns the raw reply text.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        api_key: &str,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: UpstreamErrorBody,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: String,
}

/// OpenAI chat-completions client. The API key travels with each call
/// because requests carry their own credential.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        api_key: &str,
    ) -> Result<String, GenerationError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
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
            .post(OPENAI_API_URL)
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GenerationError::CredentialRejected);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyContent)?;

        debug!("generation call succeeded ({} chars)", content.len());

        Ok(content)
    }
}
