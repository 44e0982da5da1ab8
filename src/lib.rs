//! Sentinel Chat
//!
//! A chat assistant grounded in the NYPD 2025 complaints dataset, and the chat
//! widget that talks to it.
//!
//! # Architecture
//!
//! - **Server**: Axum service serving the chat page and `POST /chat`
//! - **Stats**: dataset statistics rendered into the model's system prompt
//! - **LLM**: Chat Completions driver behind the [`llm::LlmDriver`] trait
//! - **Widget**: chat UI controller shared by the browser page and the terminal client
//!
//! # Modules
//!
//! - [`config`]: layered configuration and command line
//! - [`llm`]: LLM driver trait and implementation
//! - [`session`]: per-browser conversation history
//! - [`stats`]: dataset loading, statistics, system prompt
//! - [`widget`]: chat controller, views, and transport seam
//! - [`client`]: HTTP transport to the chat service
//! - [`server`]: router and handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod client;
pub mod config;
pub mod llm;
pub mod page;
pub mod repl;
pub mod server;
pub mod session;
pub mod stats;
pub mod widget;

use std::sync::Arc;

use crate::config::AppConfig;
use llm::LlmDriver;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Global configuration.
    pub config: Arc<AppConfig>,
    /// Conversation history per browser session.
    pub sessions: SessionStore,
    /// Model backend.
    pub llm: Arc<dyn LlmDriver>,
    /// Dataset summary sent ahead of every conversation.
    pub system_prompt: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: Arc<AppConfig>,
        sessions: SessionStore,
        llm: Arc<dyn LlmDriver>,
        system_prompt: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            config,
            sessions,
            llm,
            system_prompt: system_prompt.into(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("sessions", &self.sessions.len())
            .field("system_prompt_len", &self.system_prompt.len())
            .finish()
    }
}
