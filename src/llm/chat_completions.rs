//! OpenAI-compatible Chat Completions driver.
//!
//! Implements [`LlmDriver`] with one non-streaming request to
//! `{base_url}/chat/completions` per call.

use anyhow::{Context, anyhow, bail};

use super::{LlmDriver, LlmSettings, Message};

/// Driver for the Chat Completions API.
#[derive(Clone)]
pub struct ChatCompletionsDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsDriver {
    /// Create a new Chat Completions driver with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl LlmDriver for ChatCompletionsDriver {
    async fn complete(&self, messages: &[Message]) -> anyhow::Result<String> {
        let url = self.settings.provider.build_chat_url(&self.settings.base_url);

        let body = serde_json::json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "messages": messages,
        });

        tracing::debug!(
            url = %url,
            model = %self.settings.model,
            message_count = messages.len(),
            "Requesting chat completion"
        );

        let mut rb = self.http.post(&url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = rb.bearer_auth(k);
        }
        for (name, value) in self.settings.provider.extra_headers() {
            rb = rb.header(*name, *value);
        }

        let resp = rb
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            bail!("completion request failed with status {status}: {detail}");
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .context("completion response was not valid JSON")?;

        let content = v["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("completion response contained no message content"))?;

        tracing::debug!(content_length = content.len(), "Chat completion received");

        Ok(content.to_string())
    }
}
