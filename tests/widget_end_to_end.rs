use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::json;

use sentinel_chat::AppState;
use sentinel_chat::client::HttpTransport;
use sentinel_chat::config::AppConfig;
use sentinel_chat::llm::{LlmDriver, Message};
use sentinel_chat::server::router;
use sentinel_chat::session::SessionStore;
use sentinel_chat::widget::{
    ChatController, EXCHANGE_FAILED_TEXT, HtmlDocument, QUICK_REPLIES, Role, TurnOutcome,
};

struct CountingDriver;

#[async_trait::async_trait]
impl LlmDriver for CountingDriver {
    async fn complete(&self, messages: &[Message]) -> anyhow::Result<String> {
        // System prompt plus alternating turns
        let turns = (messages.len() - 1).div_ceil(2);
        Ok(format!("turn {turns}"))
    }
}

/// Serve `app` on an ephemeral port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn widget(base_url: &str) -> ChatController<HtmlDocument, HttpTransport> {
    ChatController::new(
        HtmlDocument::with_welcome(QUICK_REPLIES),
        HttpTransport::new(base_url).unwrap(),
    )
}

#[tokio::test]
async fn test_turns_share_server_session() {
    let state = AppState::new(
        Arc::new(AppConfig::default()),
        SessionStore::new(),
        Arc::new(CountingDriver),
        "system",
    );
    let base_url = spawn(router(state)).await;
    let mut chat = widget(&base_url);

    let first = chat.apply_quick_reply(QUICK_REPLIES[0]).await;
    chat.set_draft("and the second?");
    let second = chat.submit_current_input().await;

    assert_eq!(first, Ok(TurnOutcome::Replied));
    assert_eq!(second, Ok(TurnOutcome::Replied));

    let transcript: Vec<(Role, &str)> = chat
        .transcript()
        .messages()
        .iter()
        .map(|m| (m.role(), m.text()))
        .collect();
    assert_eq!(
        transcript,
        vec![
            (Role::User, QUICK_REPLIES[0]),
            (Role::Bot, "turn 1"),
            (Role::User, "and the second?"),
            (Role::Bot, "turn 2"),
        ]
    );
    assert!(!chat.view().has_welcome());
    assert!(!chat.view().has_typing());
    assert!(chat.view().send_enabled());
}

#[tokio::test]
async fn test_server_error_shows_warning() {
    let app = Router::new().route(
        "/chat",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base_url = spawn(app).await;
    let mut chat = widget(&base_url);
    chat.set_draft("hi");

    let outcome = chat.submit_current_input().await;

    assert_eq!(outcome, Ok(TurnOutcome::Failed));
    assert_eq!(chat.transcript().last().unwrap().text(), EXCHANGE_FAILED_TEXT);
    assert!(!chat.view().has_typing());
    assert!(chat.view().send_enabled());
}

#[tokio::test]
async fn test_missing_reply_shows_warning() {
    let app = Router::new().route(
        "/chat",
        post(|| async { Json(json!({"answer": "wrong field"})) }),
    );
    let base_url = spawn(app).await;
    let mut chat = widget(&base_url);
    chat.set_draft("hi");

    let outcome = chat.submit_current_input().await;

    assert_eq!(outcome, Ok(TurnOutcome::Failed));
    assert_eq!(chat.transcript().len(), 2);
    assert_eq!(chat.transcript().last().unwrap().text(), EXCHANGE_FAILED_TEXT);
}

#[tokio::test]
async fn test_unreachable_server_shows_warning() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut chat = widget(&format!("http://{addr}"));
    chat.set_draft("hi");

    assert_eq!(chat.submit_current_input().await, Ok(TurnOutcome::Failed));
    assert_eq!(chat.transcript().last().unwrap().text(), EXCHANGE_FAILED_TEXT);
}
