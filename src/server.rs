use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::llm::{ChatCompletionsDriver, LlmSettings, Message};
use crate::page::{CHAT_SCRIPT, index_page};
use crate::session::{self, Session, SessionStore};
use crate::stats::{Dataset, DatasetStats, build_system_prompt};

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sentinel_session";

/// Reply to a blank message.
pub const EMPTY_MESSAGE_REPLY: &str = "Please type a question.";

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let dataset = Dataset::load(&config.dataset.csv_path)
        .with_context(|| format!("Failed to load dataset {}", config.dataset.csv_path))?;
    let stats = DatasetStats::compute(&dataset);

    info!(
        name: "dataset.loaded",
        path = %config.dataset.csv_path,
        records = dataset.len(),
        columns = dataset.columns().len(),
        "Dataset loaded"
    );

    let system_prompt = build_system_prompt(&stats);

    let driver = ChatCompletionsDriver::new(LlmSettings::from_config(&config.llm));
    let settings = driver.settings();
    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        provider = ?settings.provider,
        "LLM configuration loaded"
    );
    if settings.provider.requires_api_key() && settings.api_key.is_none() {
        tracing::warn!(
            provider = ?settings.provider,
            "No API key configured; set LLM_API_KEY or llm.api_key"
        );
    }

    let sessions = SessionStore::new();
    session::spawn_sweeper(
        sessions.clone(),
        Duration::from_secs(config.session.timeout_secs),
        Duration::from_secs(config.session.sweep_interval_secs),
    );

    let state = AppState::new(
        Arc::clone(&config),
        sessions,
        Arc::new(driver),
        system_prompt,
    );

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .route("/static/chat.js", get(widget_script))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout, next.run(req)).await {
                    Ok(res) => res,
                    Err(_elapsed) => {
                        (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                    }
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

/// Response from the chat endpoint.
#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

fn session_cookie(id: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Resolve the caller's session, minting one (and its cookie) if absent.
fn resolve_session(sessions: &SessionStore, jar: CookieJar) -> (CookieJar, Session) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let session = sessions.get_or_create(cookie.value());
        return (jar, session);
    }
    let session = sessions.create();
    let jar = jar.add(session_cookie(session.id()));
    (jar, session)
}

/// GET / - Chat page. Starts the conversation over.
async fn index(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = resolve_session(&state.sessions, jar);
    session.clear();
    tracing::debug!(session_id = %session.id(), "Conversation reset");
    let exchange_timeout = Duration::from_secs(state.config.client.exchange_timeout_secs);
    (jar, Html(index_page(exchange_timeout)))
}

/// POST /chat - One user turn, one reply.
async fn chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let (jar, session) = resolve_session(&state.sessions, jar);

    let message = req.message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return (
            jar,
            Json(ChatResponse {
                reply: EMPTY_MESSAGE_REPLY.to_string(),
            }),
        );
    }

    info!(
        session_id = %session.id(),
        length = message.len(),
        "Received chat request"
    );

    let mut conversation = session.conversation(&state.system_prompt);
    conversation.push(Message::user(message));

    let reply = match state.llm.complete(&conversation).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(session_id = %session.id(), error = %e, "Model call failed");
            format!("Error: {e}")
        }
    };

    // Both turns are recorded together, after the reply exists.
    session.add_user_message(message);
    session.add_assistant_message(reply.as_str());

    (jar, Json(ChatResponse { reply }))
}

/// GET /static/chat.js - Browser binding of the widget.
async fn widget_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        CHAT_SCRIPT,
    )
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}
