use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors that can occur when calling the chat-completions API
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Seam for the remote text-generation call, so tests can substitute a fake.
pub trait ChatApi {
    /// Send a single-turn conversation (system framing + user prompt) and
    /// return the generated narrative text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ChatError>;
}

/// OpenAI-compatible chat-completions client
///
/// Sends one POST per call: a fixed system turn plus the constructed user
/// prompt. One attempt, no retry; no explicit timeout is configured.
pub struct ChatClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl ChatClient {
    /// Create a new chat client against an OpenAI-compatible endpoint.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
            client: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, system: &str, user: &str) -> Result<String, ChatError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        tracing::debug!("Sending chat completion request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ChatError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Chat completion failed: {} - {}", status, body);
            return Err(ChatError::ApiError(format!(
                "Chat completion failed: {status}"
            )));
        }

        let json: Value = response.json().await?;

        let content = json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| {
                ChatError::InvalidResponse("Missing choices[0].message.content".into())
            })?;

        Ok(content.to_string())
    }
}

impl ChatApi for ChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ChatError> {
        self.send(system, user).await
    }
}
