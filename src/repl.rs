//! Terminal client: the chat widget over a line editor.

use std::time::Duration;

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::client::HttpTransport;
use crate::config::AppConfig;
use crate::widget::{ChatController, Key, KeyPress, QUICK_REPLIES, TerminalView};

/// One line of input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    /// `:N` picks the N-th quick reply.
    QuickReply(&'static str),
    /// `:N` with no such quick reply.
    UnknownQuickReply(String),
    Text(String),
}

#[must_use]
pub fn parse_command(line: &str, quick_replies: &[&'static str]) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed == ":q" || trimmed == ":quit" {
        return ReplCommand::Quit;
    }
    if let Some(index) = trimmed.strip_prefix(':')
        && let Ok(n) = index.parse::<usize>()
    {
        return match n.checked_sub(1).and_then(|i| quick_replies.get(i).copied()) {
            Some(preset) => ReplCommand::QuickReply(preset),
            None => ReplCommand::UnknownQuickReply(trimmed.to_string()),
        };
    }
    ReplCommand::Text(line.to_string())
}

/// Run the interactive client against the server at `base_url`.
pub async fn run(config: &AppConfig, base_url: Option<String>) -> Result<()> {
    let base_url = base_url.unwrap_or_else(|| config.client.base_url.clone());
    let timeout = Duration::from_secs(config.client.exchange_timeout_secs);
    let transport = HttpTransport::new(&base_url)
        .with_context(|| format!("Failed to create client for {base_url}"))?;

    tracing::info!(
        name: "client.started",
        endpoint = %transport.endpoint(),
        timeout_secs = timeout.as_secs(),
        "Terminal client started"
    );

    let mut view = TerminalView::stdout();
    view.print_welcome(QUICK_REPLIES);
    let mut chat = ChatController::new(view, transport).with_timeout(timeout);

    let mut rl = DefaultEditor::new().context("Failed to initialize line editor")?;

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match parse_command(&line, QUICK_REPLIES) {
                    ReplCommand::Quit => break,
                    ReplCommand::QuickReply(preset) => {
                        if let Err(reason) = chat.apply_quick_reply(preset).await {
                            tracing::debug!(%reason, "Quick reply declined");
                        }
                    }
                    ReplCommand::UnknownQuickReply(command) => {
                        eprintln!(
                            "No quick reply {command}; choose :1 to :{}",
                            QUICK_REPLIES.len()
                        );
                    }
                    ReplCommand::Text(text) => {
                        chat.set_draft(text);
                        chat.on_key_press(KeyPress::new(Key::Enter)).await;
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: &[&str] = &["Busiest borough?", "Top offenses?"];

    #[test]
    fn test_quit() {
        assert_eq!(parse_command(":q", PRESETS), ReplCommand::Quit);
        assert_eq!(parse_command("  :quit ", PRESETS), ReplCommand::Quit);
    }

    #[test]
    fn test_quick_reply_is_one_based() {
        assert_eq!(parse_command(":1", PRESETS), ReplCommand::QuickReply("Busiest borough?"));
        assert_eq!(parse_command(":2", PRESETS), ReplCommand::QuickReply("Top offenses?"));
        assert_eq!(
            parse_command(":0", PRESETS),
            ReplCommand::UnknownQuickReply(":0".to_string())
        );
        assert_eq!(
            parse_command(":3", PRESETS),
            ReplCommand::UnknownQuickReply(":3".to_string())
        );
    }

    #[test]
    fn test_everything_else_is_text() {
        assert_eq!(
            parse_command("  how many :) ", PRESETS),
            ReplCommand::Text("  how many :) ".to_string())
        );
        assert_eq!(parse_command(":x", PRESETS), ReplCommand::Text(":x".to_string()));
        assert_eq!(parse_command("", PRESETS), ReplCommand::Text(String::new()));
    }
}
