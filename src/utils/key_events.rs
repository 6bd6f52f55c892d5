use std::ops::Deref;

use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyModifiers};

/// Human readable form of a key, e.g. `ctrl-t`, `enter`, `G`
pub fn key_event_to_string(key_event: &CrosstermKeyEvent) -> String {
    let code = match key_event.code {
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::F(n) => format!("f({n})"),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => String::new(),
    };

    let modifiers = [
        (KeyModifiers::CONTROL, "ctrl"),
        (KeyModifiers::SHIFT, "shift"),
        (KeyModifiers::ALT, "alt"),
    ];
    let mut parts: Vec<&str> = modifiers
        .iter()
        .filter(|(m, _)| key_event.modifiers.intersects(*m))
        .map(|(_, name)| *name)
        .collect();
    parts.push(&code);
    parts.join("-")
}

/// A key event that can be compared against configured key bindings and printed
/// in help messages. Only code and modifiers take part in comparison.
#[derive(Clone, Debug)]
pub struct KeyEvent(pub CrosstermKeyEvent);

impl KeyEvent {
    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self(CrosstermKeyEvent::new(code, modifiers))
    }
}

impl PartialEq for KeyEvent {
    fn eq(&self, other: &Self) -> bool {
        self.0.code == other.0.code && self.0.modifiers == other.0.modifiers
    }
}

impl From<CrosstermKeyEvent> for KeyEvent {
    fn from(key_event: CrosstermKeyEvent) -> Self {
        Self(key_event)
    }
}
impl From<KeyCode> for KeyEvent {
    fn from(key_code: KeyCode) -> Self {
        Self(CrosstermKeyEvent::new(key_code, KeyModifiers::NONE))
    }
}
impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self(CrosstermKeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }
}
impl From<KeyEvent> for CrosstermKeyEvent {
    fn from(val: KeyEvent) -> Self {
        val.0
    }
}
impl Deref for KeyEvent {
    type Target = CrosstermKeyEvent;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", key_event_to_string(self))
    }
}

#[cfg(test)]
pub mod test_utils {
    use crate::tui::Event;

    use super::*;

    pub fn get_key_evt(key: KeyCode) -> Event {
        Event::Key(CrosstermKeyEvent::new(key, KeyModifiers::NONE))
    }
    pub fn get_char_evt(key: char) -> Event {
        Event::Key(CrosstermKeyEvent::new(
            KeyCode::Char(key),
            KeyModifiers::NONE,
        ))
    }
    pub fn get_ctrl_evt(key: char) -> Event {
        Event::Key(CrosstermKeyEvent::new(
            KeyCode::Char(key),
            KeyModifiers::CONTROL,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys() {
        assert_eq!(KeyEvent::from('s').to_string(), "s");
        assert_eq!(KeyEvent::from(' ').to_string(), "space");
        assert_eq!(KeyEvent::from(KeyCode::BackTab).to_string(), "backtab");
        assert_eq!(KeyEvent::from(KeyCode::F(2)).to_string(), "f(2)");
    }

    #[test]
    fn modified_keys() {
        let key = KeyEvent::with_modifiers(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(key.to_string(), "ctrl-t");
        let key = KeyEvent::with_modifiers(
            KeyCode::Enter,
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        );
        assert_eq!(key.to_string(), "ctrl-alt-enter");
    }

    #[test]
    fn compares_code_and_modifiers_only() {
        let mut released = CrosstermKeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        released.kind = crossterm::event::KeyEventKind::Release;
        assert_eq!(KeyEvent::from(released), KeyEvent::from(KeyCode::Enter));
        assert_ne!(
            KeyEvent::with_modifiers(KeyCode::Char('t'), KeyModifiers::CONTROL),
            KeyEvent::from('t')
        );
    }
}
