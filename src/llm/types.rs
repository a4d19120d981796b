//! LLM types — completion envelope, provider trait, and errors.
//!
//! The envelope is the provider contract boundary: a body that does not match
//! it is a fatal [`LlmError::Envelope`], never a soft fallback.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("API request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The response body does not match the completion envelope.
    #[error("malformed completion envelope: {0}")]
    Envelope(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::Timeout { .. } => "E_API_TIMEOUT",
            Self::Envelope(_) => "E_API_ENVELOPE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest(_) | Self::Timeout { .. } | Self::ApiResponse { status: 429 | 500..=599, .. }
        )
    }
}

// =============================================================================
// ENVELOPE WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: Option<WireMessage>,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<MessageContent>,
}

/// Message content: either a plain string or a sequence of typed parts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One typed part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    /// Kept loosely typed; non-string text is ignored during extraction.
    #[serde(default)]
    pub text: Option<Value>,
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// A validated completion response: at least one choice with content.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEnvelope {
    /// Model reported by the provider, when present.
    pub model: Option<String>,
    /// Content of the first choice.
    pub content: MessageContent,
}

impl ChatEnvelope {
    /// Validate a provider response body against the envelope shape.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Envelope`] if the body is not JSON, has no choices,
    /// or the first choice carries no message content.
    pub fn parse(body: &str) -> Result<Self, LlmError> {
        let wire: WireEnvelope = serde_json::from_str(body).map_err(|e| LlmError::Envelope(e.to_string()))?;
        let Some(choice) = wire.choices.into_iter().next() else {
            return Err(LlmError::Envelope("missing choices[0]".to_string()));
        };
        let Some(content) = choice.message.and_then(|m| m.content) else {
            return Err(LlmError::Envelope("choices[0].message.content missing".to_string()));
        };
        Ok(Self { model: wire.model, content })
    }

    /// Build an envelope around plain text content.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { model: None, content: MessageContent::Text(text.into()) }
    }

    /// Flatten the content to text: plain strings as-is, otherwise the `text`
    /// parts joined by newlines. Always trimmed.
    #[must_use]
    pub fn text_content(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.trim().to_string(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|part| part.kind == "text")
                .filter_map(|part| part.text.as_ref().and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string(),
        }
    }
}

// =============================================================================
// COMPLETION PROVIDER TRAIT
// =============================================================================

/// Provider-neutral async completion trait. Enables mocking in tests.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model used when the caller does not request one.
    fn default_model(&self) -> &str;

    /// Issue exactly one completion request.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] on transport failure, non-success status,
    /// timeout, or a malformed envelope.
    async fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<ChatEnvelope, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
