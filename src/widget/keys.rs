//! Key handling for the draft field.
//!
//! Enter commits the draft; Shift+Enter falls through so the platform inserts
//! a line break. Everything else is ordinary text editing.

/// Keys the draft field distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    /// Navigation, deletion, function keys and the like.
    Other,
}

/// A key press with the modifier that matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    #[must_use]
    pub fn with_shift(self) -> Self {
        Self { shift: true, ..self }
    }

    #[must_use]
    pub fn action(self) -> KeyAction {
        match self {
            Self {
                key: Key::Enter,
                shift: false,
            } => KeyAction::Submit,
            _ => KeyAction::PassThrough,
        }
    }
}

/// What the handler does with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    PassThrough,
}

/// Whether the platform default for the key should still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    PreventDefault,
    Default,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_submits() {
        assert_eq!(KeyPress::new(Key::Enter).action(), KeyAction::Submit);
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        assert_eq!(
            KeyPress::new(Key::Enter).with_shift().action(),
            KeyAction::PassThrough
        );
    }

    #[test]
    fn test_other_keys_pass_through() {
        assert_eq!(KeyPress::new(Key::Char('a')).action(), KeyAction::PassThrough);
        assert_eq!(KeyPress::new(Key::Other).action(), KeyAction::PassThrough);
    }
}
