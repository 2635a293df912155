//! Keyboard routing.
//!
//! Keys are identified by their browser `KeyboardEvent.key` names (`"7"`,
//! `"Enter"`, `"Backspace"`, `"Escape"`). The terminal front-end translates
//! its own key events into the same names so there is a single classifier.

use crate::controller::Command;

/// How a key press should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRoute {
    /// Operation to run, `None` when the key is ignored
    pub command: Option<Command>,
    /// Whether the host's default action for the key must be suppressed
    pub prevent_default: bool,
}

impl KeyRoute {
    /// A key the calculator does not handle
    pub const IGNORED: Self = Self {
        command: None,
        prevent_default: false,
    };

    const fn pass_through(command: Command) -> Self {
        Self {
            command: Some(command),
            prevent_default: false,
        }
    }

    const fn consume(command: Command) -> Self {
        Self {
            command: Some(command),
            prevent_default: true,
        }
    }

    /// Returns true if the key maps to an operation
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        self.command.is_some()
    }
}

/// Classifies a key name.
///
/// | key                          | command        | default suppressed |
/// |------------------------------|----------------|--------------------|
/// | `0`-`9` `.` `+` `-` `*` `/`  | append the key | no                 |
/// | `Enter` `=`                  | evaluate       | yes                |
/// | `Backspace`                  | delete last    | yes                |
/// | `Escape` `c` `C`             | clear          | no                 |
/// | anything else                | ignored        | no                 |
#[must_use]
pub fn route_key(key: &str) -> KeyRoute {
    match key {
        "Enter" | "=" => KeyRoute::consume(Command::Evaluate),
        "Backspace" => KeyRoute::consume(Command::DeleteLast),
        "Escape" | "c" | "C" => KeyRoute::pass_through(Command::Clear),
        _ => match single_char(key) {
            Some(ch) if is_appendable(ch) => KeyRoute::pass_through(Command::Append(ch)),
            _ => KeyRoute::IGNORED,
        },
    }
}

/// Characters the keyboard path appends verbatim
#[must_use]
pub const fn is_appendable(ch: char) -> bool {
    matches!(ch, '0'..='9' | '.' | '+' | '-' | '*' | '/')
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Append keys =====

    #[test]
    fn test_digits_append() {
        for ch in '0'..='9' {
            let route = route_key(&ch.to_string());
            assert_eq!(route.command, Some(Command::Append(ch)));
            assert!(!route.prevent_default);
        }
    }

    #[test]
    fn test_operators_and_decimal_append() {
        for ch in ['.', '+', '-', '*', '/'] {
            assert_eq!(
                route_key(&ch.to_string()),
                KeyRoute::pass_through(Command::Append(ch))
            );
        }
    }

    // ===== Command keys =====

    #[test]
    fn test_enter_and_equals_evaluate() {
        for key in ["Enter", "="] {
            let route = route_key(key);
            assert_eq!(route.command, Some(Command::Evaluate));
            assert!(route.prevent_default, "{key} must suppress default");
        }
    }

    #[test]
    fn test_backspace_deletes() {
        let route = route_key("Backspace");
        assert_eq!(route.command, Some(Command::DeleteLast));
        assert!(route.prevent_default);
    }

    #[test]
    fn test_escape_and_c_clear() {
        for key in ["Escape", "c", "C"] {
            let route = route_key(key);
            assert_eq!(route.command, Some(Command::Clear));
            assert!(!route.prevent_default);
        }
    }

    // ===== Ignored keys =====

    #[test]
    fn test_other_keys_ignored() {
        for key in [
            "a", "x", "(", ")", "%", "^", " ", "Tab", "Shift", "ArrowLeft", "Delete", "F5", "",
            "12", "cc",
        ] {
            let route = route_key(key);
            assert_eq!(route, KeyRoute::IGNORED, "{key:?} should be ignored");
            assert!(!route.is_handled());
        }
    }

    #[test]
    fn test_is_appendable() {
        assert!(is_appendable('7'));
        assert!(is_appendable('/'));
        assert!(!is_appendable('('));
        assert!(!is_appendable('c'));
    }
}
