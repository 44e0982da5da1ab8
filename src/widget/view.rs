//! Presentation surface driven by the controller.

use super::Message;
use super::markup::{TYPING_HTML, message_html, welcome_html};

/// The chat surface: transcript region, draft field, send control.
///
/// Methods are infallible; a surface that can fail (a terminal) reports its
/// own errors.
pub trait ChatView {
    /// Append a message row at the bottom of the transcript.
    fn append_message(&mut self, message: &Message);
    /// Show the typing indicator below the transcript.
    fn show_typing(&mut self);
    /// Remove the typing indicator if present.
    fn remove_typing(&mut self);
    /// Remove the empty-state panel if present.
    fn remove_welcome(&mut self);
    /// Replace the draft field's text.
    fn set_input_value(&mut self, value: &str);
    /// Empty the draft field.
    fn clear_input(&mut self);
    /// Fix the draft field height, or `None` to size it automatically.
    fn set_input_height(&mut self, height: Option<u32>);
    /// Enable or disable the send control.
    fn set_send_enabled(&mut self, enabled: bool);
    /// Move keyboard focus to the draft field.
    fn focus_input(&mut self);
    /// Scroll the transcript region to its bottom edge.
    fn scroll_to_bottom(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Message(Message),
    Typing,
}

/// In-memory document mirroring the browser DOM of the widget.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    welcome: Option<Vec<String>>,
    nodes: Vec<Node>,
    input_value: String,
    input_height: Option<u32>,
    send_enabled: bool,
    focused: bool,
    scrolled_to_bottom: bool,
}

impl Default for HtmlDocument {
    fn default() -> Self {
        Self {
            welcome: None,
            nodes: Vec::new(),
            input_value: String::new(),
            input_height: None,
            send_enabled: true,
            focused: false,
            scrolled_to_bottom: true,
        }
    }
}

impl HtmlDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A document showing the welcome panel with the given quick replies.
    #[must_use]
    pub fn with_welcome(quick_replies: &[&str]) -> Self {
        Self {
            welcome: Some(quick_replies.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    #[must_use]
    pub fn input_height(&self) -> Option<u32> {
        self.input_height
    }

    #[must_use]
    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scrolled_to_bottom
    }

    #[must_use]
    pub fn has_welcome(&self) -> bool {
        self.welcome.is_some()
    }

    #[must_use]
    pub fn has_typing(&self) -> bool {
        self.nodes.contains(&Node::Typing)
    }

    /// Whether the typing indicator is the bottom-most row.
    #[must_use]
    pub fn typing_is_last(&self) -> bool {
        self.nodes.last() == Some(&Node::Typing)
    }

    /// Rendered messages in display order, excluding the typing indicator.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Message(message) => Some(message),
            Node::Typing => None,
        })
    }

    /// Inner HTML of the transcript container.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::new();
        if let Some(replies) = &self.welcome {
            let replies: Vec<&str> = replies.iter().map(String::as_str).collect();
            html.push_str(&welcome_html(&replies));
        }
        for node in &self.nodes {
            match node {
                Node::Message(message) => html.push_str(&message_html(message)),
                Node::Typing => html.push_str(TYPING_HTML),
            }
        }
        html
    }
}

impl ChatView for HtmlDocument {
    fn append_message(&mut self, message: &Message) {
        self.nodes.push(Node::Message(message.clone()));
        self.scrolled_to_bottom = false;
    }

    fn show_typing(&mut self) {
        if !self.has_typing() {
            self.nodes.push(Node::Typing);
            self.scrolled_to_bottom = false;
        }
    }

    fn remove_typing(&mut self) {
        self.nodes.retain(|node| *node != Node::Typing);
    }

    fn remove_welcome(&mut self) {
        self.welcome = None;
    }

    fn set_input_value(&mut self, value: &str) {
        value.clone_into(&mut self.input_value);
    }

    fn clear_input(&mut self) {
        self.input_value.clear();
    }

    fn set_input_height(&mut self, height: Option<u32>) {
        self.input_height = height;
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
    }

    fn focus_input(&mut self) {
        self.focused = true;
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolled_to_bottom = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_indicator_is_singleton() {
        let mut doc = HtmlDocument::new();
        doc.show_typing();
        doc.show_typing();

        assert_eq!(doc.render().matches(r#"id="typing""#).count(), 1);

        doc.remove_typing();
        assert!(!doc.has_typing());
    }

    #[test]
    fn test_render_order() {
        let mut doc = HtmlDocument::with_welcome(&["Busiest borough?"]);
        assert!(doc.render().contains("Busiest borough?"));

        doc.remove_welcome();
        doc.append_message(&Message::user("hi"));
        doc.show_typing();

        let html = doc.render();
        assert!(!html.contains(r#"id="welcome""#));
        let user_at = html.find("message user").unwrap();
        let typing_at = html.find(r#"id="typing""#).unwrap();
        assert!(user_at < typing_at);
        assert!(doc.typing_is_last());
    }
}
