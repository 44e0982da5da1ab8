//! HTML fragments shared by the server-rendered page and [`HtmlDocument`].
//!
//! Message text is always escaped; replies are never interpreted as markup.
//!
//! [`HtmlDocument`]: super::HtmlDocument

use html_escape::encode_text;

use super::Message;

/// Element id of the typing indicator.
pub const TYPING_ID: &str = "typing";
/// Element id of the empty-state panel.
pub const WELCOME_ID: &str = "welcome";

/// The typing indicator: a bot row whose bubble holds three animated dots.
pub const TYPING_HTML: &str = concat!(
    r#"<div class="message bot typing" id="typing">"#,
    r#"<div class="avatar">🤖</div>"#,
    r#"<div class="bubble"><div class="dot"></div><div class="dot"></div><div class="dot"></div></div>"#,
    "</div>"
);

/// Render one transcript row.
#[must_use]
pub fn message_html(message: &Message) -> String {
    let role = message.role();
    format!(
        r#"<div class="message {class}"><div class="avatar">{avatar}</div><div class="bubble">{text}</div></div>"#,
        class = role.as_str(),
        avatar = role.avatar(),
        text = encode_text(message.text()),
    )
}

/// Render the empty-state panel with one chip per quick reply.
#[must_use]
pub fn welcome_html(quick_replies: &[&str]) -> String {
    let chips: String = quick_replies
        .iter()
        .map(|reply| format!(r#"<button type="button" class="chip">{}</button>"#, encode_text(reply)))
        .collect();

    format!(
        r#"<div id="{WELCOME_ID}" class="welcome"><div class="welcome-icon">🤖</div><h2>NYPD Sentinel Assistant</h2><p>Ask about the 2025 complaints data: boroughs, offenses, times, victims and suspects.</p><div class="chips">{chips}</div></div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_markup_is_inert() {
        let html = message_html(&Message::bot("<b>hi</b> & <script>alert(1)</script>"));

        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt; &amp; &lt;script&gt;"));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_role_specific_avatar() {
        assert!(message_html(&Message::user("hi")).contains(r#"class="message user"><div class="avatar">👤"#));
        assert!(message_html(&Message::bot("hi")).contains(r#"class="message bot"><div class="avatar">🤖"#));
    }

    #[test]
    fn test_welcome_chips_escaped() {
        let html = welcome_html(&["Top <10> offenses?", "Busiest borough?"]);

        assert!(html.starts_with(r#"<div id="welcome""#));
        assert_eq!(html.matches(r#"class="chip""#).count(), 2);
        assert!(html.contains("Top &lt;10&gt; offenses?"));
    }
}
