//! Chat widget: transcript, draft field, typing indicator, quick replies.
//!
//! [`ChatController`] owns the interaction rules and drives any [`ChatView`]
//! over any [`ChatTransport`]. Two views ship with the crate:
//!
//! - [`HtmlDocument`]: an in-memory mirror of the browser page.
//! - [`TerminalView`]: avatar-prefixed lines for the terminal client.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_chat::client::HttpTransport;
//! use sentinel_chat::widget::{ChatController, HtmlDocument, QUICK_REPLIES};
//!
//! let transport = HttpTransport::new("http://127.0.0.1:5000")?;
//! let mut chat = ChatController::new(HtmlDocument::with_welcome(QUICK_REPLIES), transport);
//!
//! chat.apply_quick_reply(QUICK_REPLIES[0]).await?;
//! println!("{}", chat.view().render());
//! ```

mod controller;
mod keys;
pub mod markup;
mod message;
mod terminal;
mod transport;
mod view;

pub use controller::{
    ChatController, Declined, EXCHANGE_FAILED_TEXT, ExchangeState, MAX_INPUT_HEIGHT, PendingTurn,
    TurnOutcome, grown_height,
};
pub use keys::{Key, KeyAction, KeyDisposition, KeyPress};
pub use message::{Message, Role, Transcript};
pub use terminal::TerminalView;
pub use transport::{ChatTransport, ExchangeError};
pub use view::{ChatView, HtmlDocument};

/// Preset questions offered in the welcome panel.
pub const QUICK_REPLIES: &[&str] = &[
    "Which borough has the most crimes?",
    "What are the top 10 offenses?",
    "When do most felonies happen?",
    "What is the average police response time?",
];
