//! The one network exchange per turn.

use std::time::Duration;

use thiserror::Error;

/// Why an exchange produced no reply. The controller treats all variants alike.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Connection, body, or JSON decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The body parsed but carried no string `reply`.
    #[error("response did not contain a reply")]
    MissingReply,

    /// No response arrived within the exchange timeout.
    #[error("no response within {0:?}")]
    TimedOut(Duration),
}

/// Sends one user message and resolves to the bot's reply text.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    async fn exchange(&self, message: &str) -> Result<String, ExchangeError>;
}
