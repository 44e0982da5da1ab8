//! Chat UI controller.
//!
//! Binds draft edits, key presses and quick replies to transcript updates and
//! exactly one exchange per turn. A turn runs in two synchronous halves around
//! the single suspension point:
//!
//! 1. [`ChatController::begin_turn`]: append the user message, clear the
//!    draft, disable sending, show the typing indicator.
//! 2. [`ChatController::finish_turn`]: remove the indicator, append one bot
//!    message (reply or warning), re-enable sending, refocus the draft.
//!
//! [`ChatController::submit_current_input`] awaits the transport in between.
//! Every entry point goes through the same idle/in-flight gate, so at most
//! one exchange is outstanding per transcript.

use std::time::Duration;

use thiserror::Error;

use super::keys::{KeyAction, KeyDisposition, KeyPress};
use super::transport::{ChatTransport, ExchangeError};
use super::view::ChatView;
use super::{Message, Transcript};

/// Bot message shown when an exchange fails for any reason.
pub const EXCHANGE_FAILED_TEXT: &str = "⚠️ Something went wrong. Please try again.";

/// Tallest the draft field grows before it scrolls.
pub const MAX_INPUT_HEIGHT: u32 = 120;

/// Height of the draft field for content `content_height` tall.
#[must_use]
pub fn grown_height(content_height: u32) -> u32 {
    content_height.min(MAX_INPUT_HEIGHT)
}

/// Whether a reply is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    InFlight { turn: u64 },
}

/// Why a submission did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Declined {
    /// The trimmed draft was empty.
    #[error("draft is empty")]
    EmptyDraft,
    /// Another exchange has not resolved yet.
    #[error("an exchange is already in flight")]
    ExchangeInFlight,
}

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply was appended.
    Replied,
    /// The warning message was appended.
    Failed,
}

/// A submitted turn awaiting its reply.
#[derive(Debug)]
#[must_use = "a pending turn must be finished or the widget stays disabled"]
pub struct PendingTurn {
    id: u64,
    text: String,
}

impl PendingTurn {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The trimmed text sent to the server.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Controller for one chat surface.
#[derive(Debug)]
pub struct ChatController<V, T> {
    view: V,
    transport: T,
    transcript: Transcript,
    draft: String,
    state: ExchangeState,
    turns: u64,
    welcome_dismissed: bool,
    typing_visible: bool,
    send_enabled: bool,
    timeout: Option<Duration>,
}

impl<V: ChatView, T: ChatTransport> ChatController<V, T> {
    #[must_use]
    pub fn new(view: V, transport: T) -> Self {
        Self {
            view,
            transport,
            transcript: Transcript::default(),
            draft: String::new(),
            state: ExchangeState::Idle,
            turns: 0,
            welcome_dismissed: false,
            typing_visible: false,
            send_enabled: true,
            timeout: None,
        }
    }

    /// Fail exchanges that take longer than `limit`.
    #[must_use]
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.state, ExchangeState::InFlight { .. })
    }

    #[must_use]
    pub fn typing_visible(&self) -> bool {
        self.typing_visible
    }

    #[must_use]
    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    /// Replace the draft and show it in the draft field.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
        self.view.set_input_value(&self.draft);
    }

    /// A draft edit: record the new text and resize the field.
    pub fn on_input(&mut self, draft: impl Into<String>, content_height: u32) -> u32 {
        self.set_draft(draft);
        self.auto_grow(content_height)
    }

    /// Fit the draft field to its content, up to [`MAX_INPUT_HEIGHT`].
    pub fn auto_grow(&mut self, content_height: u32) -> u32 {
        let height = grown_height(content_height);
        self.view.set_input_height(Some(height));
        height
    }

    /// Submit the draft and wait for the reply.
    pub async fn submit_current_input(&mut self) -> Result<TurnOutcome, Declined> {
        let turn = self.begin_turn()?;
        let result = self.exchange(turn.text()).await;
        Ok(self.finish_turn(turn, result))
    }

    /// Put `preset` in the draft and submit it.
    ///
    /// While a turn is in flight the draft is left as it was.
    pub async fn apply_quick_reply(&mut self, preset: &str) -> Result<TurnOutcome, Declined> {
        if self.is_busy() {
            return Err(Declined::ExchangeInFlight);
        }
        self.set_draft(preset);
        self.submit_current_input().await
    }

    /// Handle a key press in the draft field.
    pub async fn on_key_press(&mut self, event: KeyPress) -> KeyDisposition {
        match event.action() {
            KeyAction::Submit => {
                if let Err(reason) = self.submit_current_input().await {
                    tracing::trace!(%reason, "Submission declined");
                }
                KeyDisposition::PreventDefault
            }
            KeyAction::PassThrough => KeyDisposition::Default,
        }
    }

    /// First half of a turn: everything up to the network call.
    pub fn begin_turn(&mut self) -> Result<PendingTurn, Declined> {
        if self.is_busy() {
            return Err(Declined::ExchangeInFlight);
        }
        let text = self.draft.trim();
        if text.is_empty() {
            return Err(Declined::EmptyDraft);
        }
        let text = text.to_string();

        self.append(Message::user(text.clone()));

        self.draft.clear();
        self.view.clear_input();
        self.view.set_input_height(None);

        self.set_send_enabled(false);
        self.show_typing();

        self.turns += 1;
        self.state = ExchangeState::InFlight { turn: self.turns };
        tracing::debug!(turn = self.turns, length = text.len(), "Turn started");

        Ok(PendingTurn {
            id: self.turns,
            text,
        })
    }

    /// Second half of a turn: render the outcome and reopen the widget.
    pub fn finish_turn(
        &mut self,
        turn: PendingTurn,
        result: Result<String, ExchangeError>,
    ) -> TurnOutcome {
        debug_assert_eq!(self.state, ExchangeState::InFlight { turn: turn.id });

        self.remove_typing();

        let (reply, outcome) = match result {
            Ok(reply) => (reply, TurnOutcome::Replied),
            Err(e) => {
                tracing::debug!(turn = turn.id, error = %e, "Exchange failed");
                (EXCHANGE_FAILED_TEXT.to_string(), TurnOutcome::Failed)
            }
        };
        self.append(Message::bot(reply));

        self.state = ExchangeState::Idle;
        self.set_send_enabled(true);
        self.view.focus_input();

        outcome
    }

    async fn exchange(&self, text: &str) -> Result<String, ExchangeError> {
        let Some(limit) = self.timeout else {
            return self.transport.exchange(text).await;
        };
        match tokio::time::timeout(limit, self.transport.exchange(text)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ExchangeError::TimedOut(limit)),
        }
    }

    fn append(&mut self, message: Message) {
        if !self.welcome_dismissed {
            self.view.remove_welcome();
            self.welcome_dismissed = true;
        }
        self.view.append_message(&message);
        self.view.scroll_to_bottom();
        self.transcript.push(message);
    }

    fn show_typing(&mut self) {
        if !self.typing_visible {
            self.view.show_typing();
            self.view.scroll_to_bottom();
            self.typing_visible = true;
        }
    }

    fn remove_typing(&mut self) {
        if self.typing_visible {
            self.view.remove_typing();
            self.typing_visible = false;
        }
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
        self.view.set_send_enabled(enabled);
    }
}
