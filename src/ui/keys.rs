use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Backspace,
    Esc,
    Resize,
    Other,
}

impl Key {
    /// Maps a terminal event; releases and repeats of key presses are dropped.
    pub fn from_event(event: Event) -> Option<Key> {
        match event {
            Event::Key(key) => Key::from_key_event(key),
            Event::Resize(_, _) => Some(Key::Resize),
            _ => None,
        }
    }

    fn from_key_event(event: KeyEvent) -> Option<Key> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        let key = match event.code {
            KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Key::Ctrl(c.to_ascii_lowercase())
            }
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Esc,
            _ => Key::Other,
        };
        Some(key)
    }

    /// What the status bar shows after the key is pressed.
    pub fn echo(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Ctrl(c) => format!("^{}", c.to_ascii_uppercase()),
            _ => String::new(),
        }
    }
}

/// Anything that yields key presses, blocking until one arrives.
pub trait KeySource {
    fn next_key(&mut self) -> Result<Key>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_from_event() {
        assert_eq!(
            Key::from_event(press(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Key::Char('j'))
        );
        assert_eq!(
            Key::from_event(press(KeyCode::Char('e'), KeyModifiers::CONTROL)),
            Some(Key::Ctrl('e'))
        );
        assert_eq!(
            Key::from_event(press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Key::Esc)
        );
        assert_eq!(Key::from_event(Event::Resize(80, 24)), Some(Key::Resize));
        assert_eq!(Key::from_event(Event::FocusGained), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut event = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(Key::from_event(Event::Key(event)), None);
    }

    #[test]
    fn test_echo() {
        assert_eq!(Key::Char('G').echo(), "G");
        assert_eq!(Key::Ctrl('y').echo(), "^Y");
        assert_eq!(Key::PageDown.echo(), "");
    }
}
