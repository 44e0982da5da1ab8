//! The chat page served at `/`.

use std::time::Duration;

use crate::widget::markup::welcome_html;
use crate::widget::{MAX_INPUT_HEIGHT, QUICK_REPLIES};

/// Browser binding of the widget, served at `/static/chat.js`.
pub const CHAT_SCRIPT: &str = include_str!("../static/chat.js");

const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; height: 100vh; display: flex; justify-content: center; }
.app { width: 100%; max-width: 820px; display: flex; flex-direction: column; height: 100vh; }
header { padding: 16px 20px; border-bottom: 1px solid #1e293b; font-weight: 600; }
#chatWindow { flex: 1; overflow-y: auto; padding: 20px; display: flex; flex-direction: column; gap: 14px; }
.message { display: flex; gap: 10px; align-items: flex-start; }
.message.user { flex-direction: row-reverse; }
.avatar { width: 34px; height: 34px; border-radius: 50%; background: #1e293b; display: flex; align-items: center; justify-content: center; flex-shrink: 0; }
.bubble { max-width: 75%; padding: 10px 14px; border-radius: 14px; background: #1e293b; white-space: pre-wrap; line-height: 1.5; }
.message.user .bubble { background: #2563eb; color: #fff; }
.typing .bubble { display: flex; gap: 4px; }
.dot { width: 7px; height: 7px; border-radius: 50%; background: #94a3b8; animation: blink 1.2s infinite; }
.dot:nth-child(2) { animation-delay: .2s; }
.dot:nth-child(3) { animation-delay: .4s; }
@keyframes blink { 0%, 80%, 100% { opacity: .2; } 40% { opacity: 1; } }
.welcome { margin: auto; text-align: center; max-width: 520px; }
.welcome-icon { font-size: 40px; margin-bottom: 8px; }
.welcome p { color: #94a3b8; margin: 8px 0 16px; }
.chips { display: flex; flex-wrap: wrap; gap: 8px; justify-content: center; }
.chip { border: 1px solid #334155; background: transparent; color: #e2e8f0; border-radius: 999px; padding: 6px 12px; cursor: pointer; }
.chip:hover { background: #1e293b; }
.composer { display: flex; gap: 10px; padding: 14px 20px; border-top: 1px solid #1e293b; }
#userInput { flex: 1; resize: none; border-radius: 12px; border: 1px solid #334155; background: #0b1222; color: inherit; padding: 10px 12px; font: inherit; overflow-y: auto; }
#sendBtn { border: none; border-radius: 12px; background: #2563eb; color: #fff; padding: 0 18px; cursor: pointer; }
#sendBtn:disabled { opacity: .5; cursor: not-allowed; }
";

/// Generate the HTML shell for the application.
fn html_shell(title: &str, content: &str, exchange_timeout: Duration) -> String {
    let exchange_timeout_ms = exchange_timeout.as_millis();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Chat with the NYPD complaints dataset">
    <title>{title}</title>
    <style>{STYLES}</style>
</head>
<body>
    <div class="app">
        <header>🚓 {title}</header>
        {content}
    </div>
    <script src="/static/chat.js" data-max-input-height="{MAX_INPUT_HEIGHT}" data-exchange-timeout-ms="{exchange_timeout_ms}"></script>
</body>
</html>"#
    )
}

/// The chat page: welcome panel, transcript, composer.
///
/// The browser gives up on a reply after `exchange_timeout`.
#[must_use]
pub fn index_page(exchange_timeout: Duration) -> String {
    let content = format!(
        r#"<div id="chatWindow">{welcome}</div>
        <div class="composer">
            <textarea id="userInput" rows="1" placeholder="Ask about the complaints data..."></textarea>
            <button id="sendBtn" type="button">Send</button>
        </div>"#,
        welcome = welcome_html(QUICK_REPLIES),
    );
    html_shell("NYPD Sentinel Assistant", &content, exchange_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_page_has_widget_surface() {
        let html = index_page(Duration::from_secs(60));

        for id in [
            r#"id="chatWindow""#,
            r#"id="userInput""#,
            r#"id="sendBtn""#,
            r#"id="welcome""#,
        ] {
            assert!(html.contains(id), "missing {id}");
        }
        assert_eq!(html.matches(r#"class="chip""#).count(), QUICK_REPLIES.len());
        assert!(html.contains(r#"data-max-input-height="120""#));
        assert!(html.contains(r#"data-exchange-timeout-ms="60000""#));
    }

    #[test]
    fn test_exchange_timeout_follows_config() {
        let html = index_page(Duration::from_secs(5));

        assert!(html.contains(r#"data-exchange-timeout-ms="5000""#));
    }

    #[test]
    fn test_script_binds_dom_surface() {
        for needle in [
            "chatWindow",
            "userInput",
            "sendBtn",
            "'/chat'",
            "textContent",
            "dataset.exchangeTimeoutMs",
        ] {
            assert!(CHAT_SCRIPT.contains(needle), "script missing {needle}");
        }
        assert!(!CHAT_SCRIPT.contains("innerHTML = data"));
    }
}
