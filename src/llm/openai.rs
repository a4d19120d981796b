//! OpenAI-compatible chat-completions client.
//!
//! Thin HTTP wrapper for `/chat/completions`. The response body is handed to
//! [`ChatEnvelope::parse`] so envelope validation stays pure and testable.

use serde::Serialize;
use std::time::Duration;

use super::config::LlmTimeouts;
use super::types::{ChatEnvelope, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_tokens: u32,
    timeouts: LlmTimeouts,
}

impl OpenAiClient {
    /// Build a client. Both timeouts are enforced by the HTTP client, so an
    /// expired request is cancelled and its connection released.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(api_key: String, base_url: String, max_tokens: u32, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url, max_tokens, timeouts })
    }

    pub async fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<ChatEnvelope, LlmError> {
        let messages = build_messages(system, prompt);
        let body = CcRequest { model, max_tokens: self.max_tokens, messages: &messages };
        let text = self.send_json("/chat/completions", &body).await?;
        ChatEnvelope::parse(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        check_status(status, text)
    }

    fn transport_error(&self, err: &reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout { secs: self.timeouts.request_secs }
        } else {
            LlmError::ApiRequest(err.to_string())
        }
    }
}

/// Anything but 200 becomes [`LlmError::ApiResponse`] carrying the body.
fn check_status(status: u16, body: String) -> Result<String, LlmError> {
    if status == 200 { Ok(body) } else { Err(LlmError::ApiResponse { status, body }) }
}

// =============================================================================
// CHAT COMPLETIONS WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage<'a>],
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CcMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn build_messages<'a>(system: &'a str, prompt: &'a str) -> Vec<CcMessage<'a>> {
    let mut out = Vec::with_capacity(2);
    if !system.trim().is_empty() {
        out.push(CcMessage { role: "system", content: system });
    }
    out.push(CcMessage { role: "user", content: prompt });
    out
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
