//! Line-oriented [`ChatView`] for the terminal client.
//!
//! The line editor owns the draft field, so draft, focus and send-control
//! updates have nothing to draw here.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveToColumn,
    queue,
    terminal::{Clear, ClearType},
};

use super::view::ChatView;
use super::{Message, Role};

/// Writes the transcript as avatar-prefixed lines.
#[derive(Debug)]
pub struct TerminalView<W: Write> {
    out: W,
    typing_line: bool,
}

impl TerminalView<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            typing_line: false,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the empty-state panel with numbered quick replies.
    pub fn print_welcome(&mut self, quick_replies: &[&str]) {
        let result = self.write_welcome(quick_replies);
        report(result);
    }

    fn write_welcome(&mut self, quick_replies: &[&str]) -> io::Result<()> {
        writeln!(self.out, "{} NYPD Sentinel Assistant", Role::Bot.avatar())?;
        writeln!(self.out, "Ask about the 2025 complaints data. Quick replies:")?;
        for (i, reply) in quick_replies.iter().enumerate() {
            writeln!(self.out, "  :{} {reply}", i + 1)?;
        }
        writeln!(self.out, "Type :q to quit.")?;
        self.out.flush()
    }

    fn write_message(&mut self, message: &Message) -> io::Result<()> {
        let avatar = message.role().avatar();
        let mut lines = message.text().lines();
        writeln!(self.out, "{avatar} {}", lines.next().unwrap_or_default())?;
        for line in lines {
            writeln!(self.out, "   {line}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn append_message(&mut self, message: &Message) {
        report(self.write_message(message));
    }

    fn show_typing(&mut self) {
        if self.typing_line {
            return;
        }
        let result = write!(self.out, "{} ...", Role::Bot.avatar()).and_then(|()| self.out.flush());
        self.typing_line = result.is_ok();
        report(result);
    }

    fn remove_typing(&mut self) {
        if !self.typing_line {
            return;
        }
        self.typing_line = false;
        let result = queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))
            .and_then(|()| self.out.flush());
        report(result);
    }

    fn remove_welcome(&mut self) {}

    fn set_input_value(&mut self, _value: &str) {}

    fn clear_input(&mut self) {}

    fn set_input_height(&mut self, _height: Option<u32>) {}

    fn set_send_enabled(&mut self, _enabled: bool) {}

    fn focus_input(&mut self) {}

    fn scroll_to_bottom(&mut self) {}
}

fn report(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "Failed to write to terminal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_messages_are_avatar_prefixed() {
        let mut view = TerminalView::new(Vec::new());
        view.append_message(&Message::user("hi"));
        view.append_message(&Message::bot("first\nsecond"));

        assert_eq!(output(view), "👤 hi\n🤖 first\n   second\n");
    }

    #[test]
    fn test_typing_line_is_cleared() {
        let mut view = TerminalView::new(Vec::new());
        view.show_typing();
        view.show_typing();
        view.remove_typing();
        view.remove_typing();
        view.append_message(&Message::bot("done"));

        let out = output(view);
        assert_eq!(out.matches("🤖 ...").count(), 1);
        assert_eq!(out.matches("\x1b[2K").count(), 1);
        assert!(out.ends_with("🤖 done\n"));
    }

    #[test]
    fn test_welcome_numbers_quick_replies() {
        let mut view = TerminalView::new(Vec::new());
        view.print_welcome(&["Busiest borough?", "Top offenses?"]);

        let out = output(view);
        assert!(out.contains("  :1 Busiest borough?\n"));
        assert!(out.contains("  :2 Top offenses?\n"));
    }
}
