//! Input handling

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Processed input action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Regular character input
    Char(char),
    /// Enter: send the typed message
    Submit,
    Backspace,
    Delete,
    Left,
    Right,
    /// Previous entry in input history
    Up,
    /// Next entry in input history
    Down,
    Home,
    End,
    /// Scroll the conversation up
    PageUp,
    /// Scroll the conversation down
    PageDown,
    Escape,
    /// Ctrl+C
    Interrupt,
    /// Ctrl+L (clear chat)
    Clear,
    /// Ctrl+R (retry failed reply)
    Retry,
    /// Ctrl+O (attach a PDF)
    Attach,
    /// Ctrl+U (clear line)
    ClearLine,
    /// Ctrl+W (delete word)
    DeleteWord,
    /// Bracketed paste
    Paste(String),
    Unknown,
}

/// Convert a crossterm key event to an action
pub fn key_to_action(event: KeyEvent) -> Action {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    // Windows reports releases too
    if kind == KeyEventKind::Release {
        return Action::Unknown;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Action::Interrupt,
            KeyCode::Char('l') => Action::Clear,
            KeyCode::Char('r') => Action::Retry,
            KeyCode::Char('o') => Action::Attach,
            KeyCode::Char('u') => Action::ClearLine,
            KeyCode::Char('w') => Action::DeleteWord,
            _ => Action::Unknown,
        };
    }

    if modifiers.contains(KeyModifiers::ALT) {
        return Action::Unknown;
    }

    match code {
        KeyCode::Char(c) => Action::Char(c),
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Esc => Action::Escape,
        _ => Action::Unknown,
    }
}

/// Convert a crossterm event to an action
pub fn event_to_action(event: Event) -> Option<Action> {
    match event {
        Event::Key(key_event) => Some(key_to_action(key_event)),
        Event::Paste(text) => Some(Action::Paste(text)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_chat_shortcuts() {
        assert_eq!(key_to_action(ctrl('l')), Action::Clear);
        assert_eq!(key_to_action(ctrl('r')), Action::Retry);
        assert_eq!(key_to_action(ctrl('o')), Action::Attach);
        assert_eq!(key_to_action(ctrl('c')), Action::Interrupt);
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            Action::Submit
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('Z'), KeyModifiers::SHIFT)),
            Action::Char('Z')
        );
    }

    #[test]
    fn test_paste_event() {
        assert_eq!(
            event_to_action(Event::Paste("a b".into())),
            Some(Action::Paste("a b".into()))
        );
        assert_eq!(event_to_action(Event::FocusGained), None);
    }
}
