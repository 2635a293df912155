//! On-screen keypad shared by the DOM, browser and terminal front-ends.
//!
//! Layout:
//! ```text
//! [ 7 ] [ 8 ] [ 9 ] [ / ]
//! [ 4 ] [ 5 ] [ 6 ] [ * ]
//! [ 1 ] [ 2 ] [ 3 ] [ - ]
//! [ 0 ] [ . ] [ = ] [ + ]
//! [ C ] [DEL]
//! ```

use crate::controller::Command;

/// A single keypad button bound to a fixed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButton {
    /// The command this button runs
    pub command: Command,
    /// Element id (`btn-7`, `btn-plus`, ...)
    pub id: String,
    /// Text on the button face
    pub label: String,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
}

impl KeypadButton {
    /// Creates a button, deriving its id and label from the command
    #[must_use]
    pub fn new(command: Command, row: usize, col: usize) -> Self {
        let (id, label) = match command {
            Command::Append(ch) => (format!("btn-{}", char_name(ch)), ch.to_string()),
            Command::Clear => ("btn-clear".to_string(), "C".to_string()),
            Command::DeleteLast => ("btn-delete".to_string(), "DEL".to_string()),
            Command::Evaluate => ("btn-equals".to_string(), "=".to_string()),
        };
        Self {
            command,
            id,
            label,
            row,
            col,
        }
    }

    /// Value of the `data-action` attribute carried by the button element
    #[must_use]
    pub fn data_action(&self) -> String {
        encode_action(self.command)
    }
}

fn char_name(ch: char) -> String {
    match ch {
        '+' => "plus".to_string(),
        '-' => "minus".to_string(),
        '*' => "times".to_string(),
        '/' => "divide".to_string(),
        '.' => "decimal".to_string(),
        other => other.to_string(),
    }
}

/// Encodes a command as a `data-action` attribute value
#[must_use]
pub fn encode_action(command: Command) -> String {
    match command {
        Command::Append(ch) => format!("append:{ch}"),
        Command::Clear => "clear".to_string(),
        Command::DeleteLast => "delete".to_string(),
        Command::Evaluate => "evaluate".to_string(),
    }
}

/// Decodes a `data-action` attribute value
#[must_use]
pub fn decode_action(value: &str) -> Option<Command> {
    match value {
        "clear" => Some(Command::Clear),
        "delete" => Some(Command::DeleteLast),
        "evaluate" => Some(Command::Evaluate),
        _ => {
            let rest = value.strip_prefix("append:")?;
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(Command::Append(ch)),
                _ => None,
            }
        }
    }
}

/// Keypad layout definition
#[derive(Debug, Clone)]
pub struct Keypad {
    buttons: Vec<KeypadButton>,
    rows: usize,
    cols: usize,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Keypad {
    /// Creates the standard calculator keypad
    #[must_use]
    pub fn new() -> Self {
        let grid: [&[Command]; 5] = [
            &[
                Command::Append('7'),
                Command::Append('8'),
                Command::Append('9'),
                Command::Append('/'),
            ],
            &[
                Command::Append('4'),
                Command::Append('5'),
                Command::Append('6'),
                Command::Append('*'),
            ],
            &[
                Command::Append('1'),
                Command::Append('2'),
                Command::Append('3'),
                Command::Append('-'),
            ],
            &[
                Command::Append('0'),
                Command::Append('.'),
                Command::Evaluate,
                Command::Append('+'),
            ],
            &[Command::Clear, Command::DeleteLast],
        ];

        let buttons = grid
            .iter()
            .enumerate()
            .flat_map(|(row, commands)| {
                commands
                    .iter()
                    .enumerate()
                    .map(move |(col, command)| KeypadButton::new(*command, row, col))
            })
            .collect();

        Self {
            buttons,
            rows: 5,
            cols: 4,
        }
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub fn buttons(&self) -> &[KeypadButton] {
        &self.buttons
    }

    /// Gets a button by row and column
    #[must_use]
    pub fn button_at(&self, row: usize, col: usize) -> Option<&KeypadButton> {
        self.buttons.iter().find(|b| b.row == row && b.col == col)
    }

    /// Finds a button by element id
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&KeypadButton> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Finds the button that runs `command`
    #[must_use]
    pub fn find_by_command(&self, command: Command) -> Option<&KeypadButton> {
        self.buttons.iter().find(|b| b.command == command)
    }

    /// Maps a click on element `id` to its command
    #[must_use]
    pub fn handle_click(&self, id: &str) -> Option<Command> {
        self.find_by_id(id).map(|b| b.command)
    }
}
