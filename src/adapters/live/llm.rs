//! Live adapter for the `LlmClient` port using the Anthropic messages API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

/// Default messages endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Live LLM client that calls the Anthropic messages API.
pub struct LiveLlmClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl LiveLlmClient {
    /// Creates a client for `endpoint`, authenticating with `api_key` when present.
    #[must_use]
    pub fn new(api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        Self { client: Client::new(), api_key, endpoint: endpoint.into() }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Converts a raw HTTP response body into a completion or an error message.
fn parse_response(status: u16, body: &str) -> Result<CompletionResponse, BoxError> {
    if !(200..300).contains(&status) {
        let msg = serde_json::from_str::<ApiError>(body)
            .map_or_else(|_| body.to_string(), |e| e.error.message);
        return Err(format!("LLM API error ({status}): {msg}").into());
    }

    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| -> BoxError { format!("Failed to parse LLM API response: {e}").into() })?;

    Ok(CompletionResponse {
        text: parsed.content.into_iter().map(|block| block.text).collect(),
        prompt_tokens: parsed.usage.input_tokens,
        completion_tokens: parsed.usage.output_tokens,
    })
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let Some(api_key) = self.api_key.as_deref() else {
                warn!("no API key configured for LLM requests");
                return Err("ANTHROPIC_API_KEY environment variable not set".into());
            };

            let body = MessagesRequest {
                model: &request.model,
                max_tokens: request.max_tokens,
                messages: [Message { role: "user", content: &request.prompt }],
            };

            debug!(model = %request.model, endpoint = %self.endpoint, "sending completion request");
            let response = self
                .client
                .post(&self.endpoint)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> BoxError { format!("LLM API request failed: {e}").into() })?;

            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| -> BoxError { format!("Failed to read LLM API response: {e}").into() })?;

            parse_response(status, &text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_successful_response() {
        let body = r#"{"content":[{"type":"text","text":"hello "},{"type":"text","text":"world"}],
                      "usage":{"input_tokens":12,"output_tokens":3}}"#;
        let response = parse_response(200, body).unwrap();
        assert_eq!(response.text, "hello world");
        assert_eq!(response.prompt_tokens, 12);
        assert_eq!(response.completion_tokens, 3);
    }

    #[test]
    fn surfaces_api_error_message() {
        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#;
        let err = parse_response(429, body).unwrap_err();
        assert_eq!(err.to_string(), "LLM API error (429): slow down");
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_network() {
        let client = LiveLlmClient::new(None, DEFAULT_ENDPOINT);
        let request = CompletionRequest {
            model: "test-model".into(),
            prompt: "hi".into(),
            max_tokens: 10,
        };
        let err = client.complete(&request).await.unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }
}
