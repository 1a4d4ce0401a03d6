//! Client for the code-generation service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerationError;

use super::prompt::GenerationRequest;

/// Maximum characters of an error body kept in [`GenerationError::Api`].
const MAX_ERROR_BODY: usize = 500;

/// Trait for sending a generation request to a code-generation service.
///
/// This abstraction allows replacing the network call in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send one request and return the raw text of the reply.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client for `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
        };

        debug!(
            "Requesting {} tests from {} (prompt {} chars)",
            request.language,
            self.model,
            request.user_prompt.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(GenerationError::Transport)?;

        let status = response.status();
        let text = response.text().await.map_err(GenerationError::Transport)?;

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        parse_chat_response(&text)
    }
}

/// Pull the first choice's message content out of a chat-completions body.
fn parse_chat_response(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("response has no choices".into()))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    Ok(content)
}
