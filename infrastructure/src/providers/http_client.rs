//! OpenAI-compatible chat completions adapter.
//!
//! One [`HttpBackendClient`] per configured backend. Works with any endpoint
//! that speaks `POST {base_url}/chat/completions` (OpenAI, Gemini's OpenAI
//! layer, Ollama, OpenRouter).

use async_trait::async_trait;
use panel_application::ports::backend_client::{BackendClient, BackendError};
use panel_domain::{BackendConfig, BackendIdentity, Message};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Endpoint used when a backend sets no `base_url`
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Longest slice of an error body kept in a failure reason
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Chat completions client bound to one backend
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    client: reqwest::Client,
    config: BackendConfig,
    endpoint: String,
}

impl HttpBackendClient {
    /// Build a client whose every request gives up after `request_timeout`.
    pub fn new(config: BackendConfig, request_timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BackendError::Network(format!("failed to create HTTP client: {e}")))?;
        let endpoint = format!(
            "{}/chat/completions",
            config.base_url().unwrap_or(DEFAULT_BASE_URL)
        );
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(format!("{} did not answer in time", self.endpoint))
        } else {
            BackendError::Network(e.to_string())
        }
    }
}

// =============================================================================
// API TYPES
// =============================================================================

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Message> for ApiMessage<'a> {
    fn from(m: &'a Message) -> Self {
        Self {
            role: m.role.as_str(),
            content: &m.content,
        }
    }
}

#[derive(Deserialize)]
struct ChatApiResponse {
    choices: Option<Vec<Choice>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Pull the assistant text out of a 2xx body.
fn extract_content(body: &str) -> Result<String, BackendError> {
    let parsed: ChatApiResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::Upstream(format!("invalid JSON in response: {e}")))?;

    if let Some(error) = parsed.error {
        return Err(BackendError::Upstream(
            error.message.unwrap_or_else(|| "unspecified error".to_string()),
        ));
    }

    let choice = parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| BackendError::Upstream("no choices in response".to_string()))?;

    let message = choice
        .message
        .ok_or_else(|| BackendError::Upstream("choice has no message".to_string()))?;

    // Providers send `"content": null` for empty completions.
    Ok(message.content.unwrap_or_default())
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    fn identity(&self) -> &BackendIdentity {
        self.config.identity()
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, BackendError> {
        let request = ChatApiRequest {
            model: self.config.model(),
            messages: messages.iter().map(ApiMessage::from).collect(),
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if self.config.has_credential() {
            builder = builder.bearer_auth(self.config.credential().expose_secret());
        }

        debug!("POST {} (model {})", self.endpoint, self.config.model());
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Auth(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&body)
            ))),
            s if !s.is_success() => Err(BackendError::Upstream(format!(
                "HTTP {}: {}",
                s.as_u16(),
                truncate(&body)
            ))),
            _ => extract_content(&body),
        }
    }
}
