//! Translation between crossterm key events and browser key names

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a terminal key press means to the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalKey {
    /// A key, named the way a browser's `KeyboardEvent.key` would name it
    Named(String),
    /// Leave the application
    Quit,
    /// Releases, repeats of modifiers and keys with no browser name
    Unmapped,
}

/// Maps a crossterm key event to a [`TerminalKey`]
#[must_use]
pub fn translate(event: KeyEvent) -> TerminalKey {
    if event.kind == KeyEventKind::Release {
        return TerminalKey::Unmapped;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c' | 'q' | 'd') => TerminalKey::Quit,
            _ => TerminalKey::Unmapped,
        };
    }

    let name = match event.code {
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return TerminalKey::Unmapped,
    };

    TerminalKey::Named(name)
}

/// Builds the key event a terminal would deliver for a browser key name
#[must_use]
pub fn key_event_for(name: &str) -> Option<KeyEvent> {
    let code = match name {
        "Enter" => KeyCode::Enter,
        "Backspace" => KeyCode::Backspace,
        "Escape" => KeyCode::Esc,
        "Tab" => KeyCode::Tab,
        "Delete" => KeyCode::Delete,
        "ArrowLeft" => KeyCode::Left,
        "ArrowRight" => KeyCode::Right,
        "ArrowUp" => KeyCode::Up,
        "ArrowDown" => KeyCode::Down,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => return None,
            }
        }
    };
    Some(KeyEvent::new(code, KeyModifiers::NONE))
}
