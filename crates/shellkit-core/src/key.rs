//! Key definitions and key event structures for terminal input decoding.
//!
//! A decoded key is a closed variant: either a plain character (`KeyCode::Rune`)
//! or one of a fixed set of special keys (`KeyCode::Special`), plus independent
//! `alt` and `ctrl` modifier flags.

/// Special keys the decoder can produce.
///
/// The set is closed so that key dispatch can be checked exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key, also the fallback for unrecognized escape sequences
    Escape,

    // Control characters with a dedicated meaning
    ControlA,
    ControlB,
    ControlC,
    ControlD,
    ControlE,
    ControlF,
    ControlK,
    ControlL,
    ControlN,
    ControlP,
    ControlR,
    ControlU,
    ControlW,

    // Ctrl + arrow combinations (ESC[1;5C / ESC[1;5D)
    ControlLeft,
    ControlRight,

    // Navigation keys (arrow keys)
    Up,
    Down,
    Right,
    Left,

    // Navigation and editing keys
    Home,
    End,
    Delete,
    Backspace,

    Tab,
    Enter,
}

/// What a key event carries: a character or a special key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A decoded Unicode code point
    Rune(char),
    /// A special key; the rune is not meaningful
    Special(Key),
}

/// KeyEvent represents one decoded input event with its modifier flags.
///
/// `alt` is only set for escape-prefixed printable characters. `ctrl` is set
/// for keys derived from control bytes and for Ctrl-modified arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub alt: bool,
    pub ctrl: bool,
}

impl KeyEvent {
    /// Create an unmodified character event
    pub const fn rune(ch: char) -> Self {
        Self {
            code: KeyCode::Rune(ch),
            alt: false,
            ctrl: false,
        }
    }

    /// Create an unmodified special key event
    pub const fn special(key: Key) -> Self {
        Self {
            code: KeyCode::Special(key),
            alt: false,
            ctrl: false,
        }
    }

    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// The special key, if this event carries one
    pub fn special_key(&self) -> Option<Key> {
        match self.code {
            KeyCode::Special(key) => Some(key),
            KeyCode::Rune(_) => None,
        }
    }

    /// The character, if this event carries one
    pub fn rune_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Rune(ch) => Some(ch),
            KeyCode::Special(_) => None,
        }
    }

    /// Check if this event is the given special key, regardless of modifiers
    pub fn is(&self, key: Key) -> bool {
        self.special_key() == Some(key)
    }

    /// A character event with neither modifier set
    pub fn is_plain_rune(&self) -> bool {
        matches!(self.code, KeyCode::Rune(_)) && !self.alt && !self.ctrl
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        KeyEvent::special(key)
    }
}

impl From<char> for KeyEvent {
    fn from(ch: char) -> Self {
        KeyEvent::rune(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_rune() {
        let event = KeyEvent::rune('a');
        assert_eq!(event.rune_char(), Some('a'));
        assert_eq!(event.special_key(), None);
        assert!(event.is_plain_rune());
    }

    #[test]
    fn test_key_event_special() {
        let event = KeyEvent::special(Key::Delete);
        assert_eq!(event.special_key(), Some(Key::Delete));
        assert_eq!(event.rune_char(), None);
        assert!(event.is(Key::Delete));
        assert!(!event.is_plain_rune());
    }

    #[test]
    fn test_modifiers() {
        let alt_b = KeyEvent::rune('b').with_alt();
        assert!(alt_b.alt);
        assert!(!alt_b.ctrl);
        assert!(!alt_b.is_plain_rune());

        let ctrl_right = KeyEvent::special(Key::ControlRight).with_ctrl();
        assert!(ctrl_right.ctrl);
        assert!(ctrl_right.is(Key::ControlRight));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(KeyEvent::from(Key::Enter), KeyEvent::special(Key::Enter));
        assert_eq!(KeyEvent::from('x'), KeyEvent::rune('x'));
    }

    #[test]
    fn test_key_debug() {
        assert_eq!(format!("{:?}", Key::ControlLeft), "ControlLeft");
    }
}
