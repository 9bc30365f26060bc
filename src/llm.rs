//! Hosted model client
//!
//! Talks to Groq's OpenAI-compatible chat completions endpoint. The solver
//! only needs "prompt in, text out", expressed by [`CompletionBackend`] so
//! tests can swap in a scripted backend.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Configuration for the hosted model
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Chat completions URL
    pub api_url: String,

    /// API key (from environment)
    pub api_key: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Failure talking to the hosted model
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{} not set", API_KEY_ENV)]
    MissingKey,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("no choices in response")]
    EmptyResponse,
}

/// The three kinds of request the solver makes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Classification,
    Explanation,
    Recommendation,
}

impl RequestKind {
    pub fn temperature(&self) -> f32 {
        match self {
            RequestKind::Classification => 0.1,
            RequestKind::Explanation => 0.5,
            RequestKind::Recommendation => 0.3,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            RequestKind::Classification => 50,
            RequestKind::Explanation => 5096,
            RequestKind::Recommendation => 4096,
        }
    }
}

/// A single prompt plus its sampling knobs
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub kind: RequestKind,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(kind: RequestKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            temperature: kind.temperature(),
            max_tokens: kind.max_tokens(),
        }
    }
}

/// Anything that can turn a prompt into text
pub trait CompletionBackend: Send + Sync {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Groq chat completions client. Build once, share by reference.
#[derive(Debug, Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl GroqClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl CompletionBackend for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            kind = ?request.kind,
            prompt_chars = request.prompt.len(),
            "Sending completion request"
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_knobs_per_kind() {
        let r = CompletionRequest::new(RequestKind::Classification, "p");
        assert_eq!((r.temperature, r.max_tokens), (0.1, 50));
        let r = CompletionRequest::new(RequestKind::Explanation, "p");
        assert_eq!((r.temperature, r.max_tokens), (0.5, 5096));
        let r = CompletionRequest::new(RequestKind::Recommendation, "p");
        assert_eq!((r.temperature, r.max_tokens), (0.3, 4096));
    }

    #[test]
    fn test_client_requires_key() {
        let config = LlmConfig {
            api_key: "  ".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(GroqClient::new(config), Err(LlmError::MissingKey)));
    }

    #[test]
    fn test_chat_request_shape() {
        let body = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            temperature: 0.5,
            max_tokens: 10,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn test_chat_response_parsing() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Strength"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Strength"));
    }
}
