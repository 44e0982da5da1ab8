//! LLM driver trait and the chat completions implementation.
//!
//! The chat service asks the model for one complete reply per user turn, so
//! the [`LlmDriver`] seam is a single non-streaming `complete` call over the
//! conversation so far.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_chat::llm::{ChatCompletionsDriver, LlmDriver, LlmSettings, Message};
//!
//! let driver = ChatCompletionsDriver::new(LlmSettings::from_config(&config.llm));
//! let reply = driver.complete(&[Message::user("Which borough has the most felonies?")]).await?;
//! ```

pub mod chat_completions;
pub mod provider;

pub use chat_completions::ChatCompletionsDriver;
pub use provider::Provider;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// LLM connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL including the API version segment (e.g. `https://openrouter.ai/api/v1`).
    pub base_url: String,
    /// Optional API key sent as a bearer token.
    pub api_key: Option<String>,
    /// Model identifier (e.g. `meta-llama/llama-4-maverick`).
    pub model: String,
    /// Upper bound on generated tokens per reply.
    pub max_tokens: u32,
    /// Provider conventions, detected from `base_url`.
    pub provider: Provider,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("provider", &self.provider)
            .finish()
    }
}

impl LlmSettings {
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            provider: Provider::detect_from_url(&config.base_url),
        }
    }
}

/// A message in a conversation, in the chat completions wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: MessageRole,
    /// Plain text content.
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// Trait for LLM drivers.
#[async_trait::async_trait]
pub trait LlmDriver: Send + Sync {
    /// Produce the assistant's reply to `messages`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the provider answers with a
    /// non-success status, or the response carries no message content.
    async fn complete(&self, messages: &[Message]) -> anyhow::Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() {
        let value = serde_json::to_value(Message::assistant("Brooklyn")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "role": "assistant", "content": "Brooklyn" })
        );
    }

    #[test]
    fn test_settings_drop_blank_key() {
        let config = LlmConfig {
            api_key: Some("   ".to_string()),
            ..LlmConfig::default()
        };
        let settings = LlmSettings::from_config(&config);
        assert!(settings.api_key.is_none());
        assert_eq!(settings.provider, Provider::OpenRouter);
    }

    #[test]
    fn test_settings_debug_redacts_key() {
        let config = LlmConfig {
            api_key: Some("sk-secret".to_string()),
            ..LlmConfig::default()
        };
        let debug = format!("{:?}", LlmSettings::from_config(&config));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
