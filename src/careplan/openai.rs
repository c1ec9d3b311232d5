//! OpenAI-compatible chat-completions client.
//!
//! The orchestrator only sees the [`ChatModel`] trait; this module
//! provides the HTTP implementation and a mock for tests. Generation
//! calls request a machine-parseable JSON object (`response_format`);
//! follow-up calls return plain text.

use std::cell::Cell;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::ChatMessage;
use crate::config::ModelConfig;

// ═══════════════════════════════════════════════════════════
// Trait + errors
// ═══════════════════════════════════════════════════════════

/// Chat-completion backend abstraction (allows mocking).
pub trait ChatModel {
    /// Send the messages and return the assistant's text. With
    /// `json_output`, the provider is directed to return a single JSON
    /// object.
    fn complete(&self, messages: &[ChatMessage], json_output: bool)
        -> Result<String, ChatClientError>;
}

/// Transport-level failures. Surfaced upward as an opaque short reason;
/// raw provider internals stay at this boundary.
#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("モデルAPIに接続できません: {0}")]
    Connection(String),

    #[error("モデルAPIがタイムアウトしました（{0}秒）")]
    Timeout(u64),

    #[error("モデルAPIエラー (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("モデル応答の形式が不正です: {0}")]
    MalformedBody(String),

    #[error("モデル応答に選択肢が含まれていません")]
    EmptyChoices,
}

// ═══════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// ═══════════════════════════════════════════════════════════
// OpenAiClient
// ═══════════════════════════════════════════════════════════

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ChatModel for OpenAiClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        json_output: bool,
    ) -> Result<String, ChatClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages,
            response_format: json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ChatClientError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ChatClientError::Timeout(self.timeout_secs)
                } else {
                    ChatClientError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ChatClientError::Api {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| ChatClientError::MalformedBody(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ChatClientError::EmptyChoices)
    }
}

/// Provider error bodies can be arbitrarily long; only a short prefix
/// ever travels past this boundary.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max_chars).collect();
        format!("{prefix}…")
    }
}

// ═══════════════════════════════════════════════════════════
// MockChatModel — canned responses for tests
// ═══════════════════════════════════════════════════════════

/// Mock chat backend: scripted responses in order (the last one repeats)
/// and a call counter, so tests can assert that gated paths never reach
/// the model.
pub struct MockChatModel {
    responses: Vec<String>,
    error: Option<String>,
    calls: Cell<usize>,
}

impl MockChatModel {
    pub fn new(response: &str) -> Self {
        Self {
            responses: vec![response.to_string()],
            error: None,
            calls: Cell::new(0),
        }
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses,
            error: None,
            calls: Cell::new(0),
        }
    }

    /// A mock that fails every call with a connection error.
    pub fn failing(message: &str) -> Self {
        Self {
            responses: Vec::new(),
            error: Some(message.to_string()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ChatModel for MockChatModel {
    fn complete(
        &self,
        _messages: &[ChatMessage],
        _json_output: bool,
    ) -> Result<String, ChatClientError> {
        let n = self.calls.get();
        self.calls.set(n + 1);

        if let Some(message) = &self.error {
            return Err(ChatClientError::Connection(message.clone()));
        }

        let idx = n.min(self.responses.len().saturating_sub(1));
        match self.responses.get(idx) {
            Some(response) => Ok(response.clone()),
            None => Err(ChatClientError::EmptyChoices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response_and_counts() {
        let mock = MockChatModel::new("応答テキスト");
        let result = mock.complete(&[ChatMessage::user("q")], false).unwrap();
        assert_eq!(result, "応答テキスト");
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn mock_scripted_responses_in_order_then_repeat_last() {
        let mock = MockChatModel::with_responses(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(mock.complete(&[], true).unwrap(), "one");
        assert_eq!(mock.complete(&[], true).unwrap(), "two");
        assert_eq!(mock.complete(&[], true).unwrap(), "two");
        assert_eq!(mock.calls(), 3);
    }

    #[test]
    fn failing_mock_returns_connection_error() {
        let mock = MockChatModel::failing("接続拒否");
        let result = mock.complete(&[], false);
        assert!(matches!(result, Err(ChatClientError::Connection(_))));
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = ModelConfig {
            base_url: "https://api.openai.com/v1/".to_string(),
            ..ModelConfig::with_api_key("sk-test")
        };
        let client = OpenAiClient::new(&config);
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn request_serializes_json_object_directive_only_when_asked() {
        let messages = vec![ChatMessage::user("q")];
        let with_format = ChatCompletionRequest {
            model: "gpt-4o-mini",
            temperature: 0.1,
            messages: &messages,
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
        };
        let json = serde_json::to_string(&with_format).unwrap();
        assert!(json.contains("\"response_format\":{\"type\":\"json_object\"}"));

        let without_format = ChatCompletionRequest {
            model: "gpt-4o-mini",
            temperature: 0.1,
            messages: &messages,
            response_format: None,
        };
        let json = serde_json::to_string(&without_format).unwrap();
        assert!(!json.contains("response_format"));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "あ".repeat(500);
        let short = truncate(&long, 200);
        assert_eq!(short.chars().count(), 201);
        assert!(short.ends_with('…'));

        assert_eq!(truncate("short body", 200), "short body");
    }

    #[test]
    fn response_body_parses_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"答え"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "答え");
    }
}
