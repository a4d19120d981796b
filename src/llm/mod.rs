//! LLM — completion provider adapter.
//!
//! DESIGN
//! ======
//! [`LlmClient`] wraps an OpenAI-compatible chat-completions client built from
//! an explicit [`LlmConfig`]. Callers depend on the [`CompletionProvider`]
//! trait so tests can inject fakes without touching the network.

pub mod config;
pub mod openai;
pub mod types;

pub use config::{LlmConfig, LlmTimeouts};
pub use types::{ChatEnvelope, CompletionProvider, ContentPart, LlmError, MessageContent};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete completion client configured from [`LlmConfig`].
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl LlmClient {
    /// Build a client from environment variables. See [`LlmConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build a client from a typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey { var: config.api_key_env });
        }
        let model = config.model.clone();
        let inner = openai::OpenAiClient::new(
            config.api_key,
            config::normalize_base_url(&config.base_url),
            config.max_tokens,
            config.timeouts,
        )?;
        Ok(Self { inner, model })
    }

    /// Return the configured default model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl CompletionProvider for LlmClient {
    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<ChatEnvelope, LlmError> {
        self.inner.complete(model, system, prompt).await
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
