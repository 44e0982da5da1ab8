//! Session and conversation history management.
//!
//! Each browser gets a session (identified by a cookie) holding the user and
//! assistant turns sent to the model. Loading the chat page resets it.
//!
//! # Example
//!
//! ```rust
//! use sentinel_chat::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! session.add_user_message("Hello!");
//!
//! assert_eq!(session.messages().len(), 1);
//! ```

mod thread;

use std::time::Duration;

use tokio::task::JoinHandle;

pub use thread::{Session, SessionStore};

/// Periodically drop sessions idle for longer than `timeout`.
pub fn spawn_sweeper(store: SessionStore, timeout: Duration, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.cleanup_expired_with_timeout(timeout);
            if removed > 0 {
                tracing::info!(
                    name: "session.swept",
                    removed,
                    remaining = store.len(),
                    "Expired sessions removed"
                );
            }
        }
    })
}
