//! Provider-specific URL and header conventions.

/// Supported chat completions providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `OpenAI` (api.openai.com)
    OpenAI,
    /// `OpenRouter` (openrouter.ai)
    OpenRouter,
    /// Any other OpenAI-compatible server, often local and keyless
    Generic,
}

/// Title `OpenRouter` shows for requests from this application.
const OPENROUTER_APP_TITLE: &str = "Sentinel Chat";

impl Provider {
    /// Detect provider from base URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel_chat::llm::Provider;
    ///
    /// let provider = Provider::detect_from_url("https://openrouter.ai/api/v1");
    /// assert_eq!(provider, Provider::OpenRouter);
    /// ```
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let lower = base_url.to_lowercase();

        if lower.contains("openrouter.ai") {
            Self::OpenRouter
        } else if lower.contains("api.openai.com") {
            Self::OpenAI
        } else {
            Self::Generic
        }
    }

    /// Whether requests are rejected without an API key.
    #[must_use]
    pub fn requires_api_key(self) -> bool {
        !matches!(self, Self::Generic)
    }

    /// Build the chat completions URL. `base_url` already carries the version segment.
    #[must_use]
    pub fn build_chat_url(self, base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }

    /// Extra request headers the provider expects.
    #[must_use]
    pub fn extra_headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::OpenRouter => &[("X-Title", OPENROUTER_APP_TITLE)],
            Self::OpenAI | Self::Generic => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_openai() {
        let provider = Provider::detect_from_url("https://api.openai.com/v1");
        assert_eq!(provider, Provider::OpenAI);
    }

    #[test]
    fn test_detect_openrouter() {
        let provider = Provider::detect_from_url("https://OpenRouter.ai/api/v1");
        assert_eq!(provider, Provider::OpenRouter);
    }

    #[test]
    fn test_detect_local_server() {
        let provider = Provider::detect_from_url("http://localhost:11434/v1");
        assert_eq!(provider, Provider::Generic);
        assert!(!provider.requires_api_key());
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let url = Provider::OpenRouter.build_chat_url("https://openrouter.ai/api/v1/");
        assert_eq!(url, "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn test_openrouter_headers() {
        assert_eq!(
            Provider::OpenRouter.extra_headers(),
            &[("X-Title", "Sentinel Chat")]
        );
        assert!(Provider::OpenAI.extra_headers().is_empty());
    }
}
