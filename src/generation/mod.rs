//! Text-generation seam used by the summarization pipeline.
//!
//! The pipeline talks to a [`GenerationClient`]: a prompt goes in, trimmed text comes out, and any
//! failure is a [`GenerationError`]. [`GeminiClient`] is the production adapter and issues HTTP
//! requests directly to the Gemini `generateContent` endpoint. Tests substitute their own client.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced while asking the generation service for text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Service could not be reached (network failure, timeout, or client setup error).
    #[error("Generation service unavailable: {0}")]
    ProviderUnavailable(String),
    /// Service answered with a non-success status.
    #[error("Generation request failed: {0}")]
    GenerationFailed(String),
    /// Service answered but the payload carried no usable text.
    #[error("Malformed generation response: {0}")]
    InvalidResponse(String),
    /// Service refused the prompt on content-policy grounds.
    #[error("Prompt blocked by generation service: {0}")]
    Blocked(String),
}

/// Interface implemented by text-generation backends.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send a fully built prompt and return the service's text output, trimmed.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Gemini `generateContent` adapter.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a client for the given endpoint. `timeout` of `None` waits indefinitely.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerationError> {
        let mut builder =
            Client::builder().user_agent(concat!("pdfbrief/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|error| {
            GenerationError::ProviderUnavailable(format!("failed to build HTTP client: {error}"))
        })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        Self::new(
            config.generation_base_url.clone(),
            config.generation_model.clone(),
            config.gemini_api_key.clone(),
            config.generation_timeout,
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, GenerationError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => GenerationError::Blocked(reason),
                None => GenerationError::InvalidResponse("response contained no candidates".into()),
            });
        };

        let texts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if texts.is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "UNSPECIFIED".into());
            return Err(GenerationError::InvalidResponse(format!(
                "candidate carried no text (finish reason {reason})"
            )));
        }

        Ok(texts.concat().trim().to_string())
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let payload = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let mut request = self.http.post(self.endpoint()).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response = request.send().await.map_err(|error| {
            GenerationError::ProviderUnavailable(format!(
                "failed to reach {}: {error}",
                self.base_url
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            if status == StatusCode::NOT_FOUND {
                return Err(GenerationError::GenerationFailed(format!(
                    "model '{}' not found at {}: {message}",
                    self.model,
                    self.endpoint()
                )));
            }
            return Err(GenerationError::GenerationFailed(format!(
                "service returned {status}: {message}"
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!("failed to decode response: {error}"))
        })?;

        body.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    const PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn client_for(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
        GeminiClient::new(
            server.base_url(),
            "gemini-test",
            api_key.map(str::to_string),
            None,
        )
        .expect("client")
    }

    #[tokio::test]
    async fn gemini_client_returns_trimmed_text() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, Some("test-key"));

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .header("x-goog-api-key", "test-key")
                    .body_contains("Summarize this");
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [{ "text": "  Intro. " }, { "text": "Outro.\n" }]
                        },
                        "finishReason": "STOP"
                    }]
                }));
            })
            .await;

        let text = client.generate("Summarize this").await.expect("text");

        mock.assert_async().await;
        assert_eq!(text, "Intro. Outro.");
    }

    #[tokio::test]
    async fn gemini_client_surfaces_error_message() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, None);

        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(403).json_body(json!({
                    "error": {
                        "code": 403,
                        "message": "Method doesn't allow unregistered callers.",
                        "status": "PERMISSION_DENIED"
                    }
                }));
            })
            .await;

        let error = client.generate("prompt").await.expect_err("error response");

        assert!(
            matches!(&error, GenerationError::GenerationFailed(message)
                if message.contains("403") && message.contains("unregistered callers")),
            "unexpected error: {error}"
        );
    }

    #[tokio::test]
    async fn gemini_client_reports_blocked_prompt() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, Some("k"));

        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).json_body(json!({
                    "promptFeedback": { "blockReason": "SAFETY" }
                }));
            })
            .await;

        let error = client.generate("prompt").await.expect_err("blocked");
        assert!(matches!(error, GenerationError::Blocked(reason) if reason == "SAFETY"));
    }

    #[tokio::test]
    async fn gemini_client_rejects_candidate_without_text() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, Some("k"));

        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).json_body(json!({
                    "candidates": [{ "finishReason": "MAX_TOKENS" }]
                }));
            })
            .await;

        let error = client.generate("prompt").await.expect_err("no text");
        assert!(
            matches!(&error, GenerationError::InvalidResponse(message) if message.contains("MAX_TOKENS"))
        );
    }

    #[tokio::test]
    async fn gemini_client_reports_unreachable_service() {
        let client = GeminiClient::new("http://127.0.0.1:1", "gemini-test", None, None)
            .expect("client");
        let error = client.generate("prompt").await.expect_err("unreachable");
        assert!(matches!(error, GenerationError::ProviderUnavailable(_)));
    }
}
