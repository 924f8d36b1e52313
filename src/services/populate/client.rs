//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::OpenAiSettings;
use crate::error::{AppError, AppResult};

/// HTTP connect timeout for chat-completion calls.
const CHAT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP total timeout for chat-completion calls.
const CHAT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Text-generation client, constructed once at startup and shared.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    settings: OpenAiSettings,
}

impl ChatClient {
    /// Build the client with explicit timeouts.
    pub fn new(settings: OpenAiSettings) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CHAT_CONNECT_TIMEOUT)
            .timeout(CHAT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { http, settings })
    }

    /// Whether an API key is configured at all.
    pub fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    /// Send a single-user-message completion request and return the text.
    pub async fn complete(&self, prompt: &str) -> AppResult<String> {
        let api_key = self.settings.api_key.as_ref().ok_or_else(|| {
            AppError::Configuration(
                "OPENAI_API_KEY is not configured; AI population is unavailable".to_string(),
            )
        })?;

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );

        let body = json!({
            "model": self.settings.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.settings.temperature,
            "max_tokens": self.settings.max_tokens,
        });

        debug!("Requesting completion from {} (model={})", url, self.settings.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("Chat completion request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Chat completion returned {}: {}",
                status,
                detail.chars().take(300).collect::<String>()
            )));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Invalid chat completion response: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                AppError::ExternalService("Chat completion returned no choices".to_string())
            })
    }
}
