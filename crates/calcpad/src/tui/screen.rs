//! Text-grid rendering of the calculator.
//!
//! Rendering is a pure function from app state to lines of text; only
//! [`Screen::draw`] touches the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::keypad::{Keypad, KeypadButton};

/// Width of one keypad cell, including its brackets
pub const CELL_WIDTH: usize = 6;

/// Terminal row of the display text
pub const DISPLAY_ROW: u16 = 1;

/// Terminal row of the first keypad row
pub const KEYPAD_TOP: u16 = 3;

/// Terminal column where keypad cells start (after the left border)
pub const KEYPAD_LEFT: u16 = 1;

const HELP: &str = "Enter/= eval  Bksp del  Esc/c clear  ^C quit";

/// A rendered frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    lines: Vec<String>,
    error: bool,
}

impl Screen {
    /// Renders the display text and keypad
    #[must_use]
    pub fn render(display: &str, error: bool, keypad: &Keypad) -> Self {
        let (rows, cols) = keypad.dimensions();
        let inner = cols * CELL_WIDTH;
        let rule = "─".repeat(inner);

        let mut lines = Vec::with_capacity(rows + 5);
        lines.push(format!("┌{rule}┐"));
        lines.push(format!("│{}│", fit_right(display, inner)));
        lines.push(format!("├{rule}┤"));
        for row in 0..rows {
            let cells: String = (0..cols)
                .map(|col| keypad.button_at(row, col).map_or_else(blank_cell, cell))
                .collect();
            lines.push(format!("│{cells}│"));
        }
        lines.push(format!("└{rule}┘"));
        lines.push(HELP.to_string());

        Self { lines, error }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The display line without borders or padding
    #[must_use]
    pub fn display_line(&self) -> &str {
        self.lines
            .get(DISPLAY_ROW as usize)
            .map_or("", |line| line.trim_matches('│').trim_start())
    }

    /// Writes the frame to a terminal
    pub fn draw<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (row, line) in self.lines.iter().enumerate() {
            queue!(out, MoveTo(0, row as u16))?;
            if self.error && row == DISPLAY_ROW as usize {
                queue!(
                    out,
                    SetForegroundColor(Color::Red),
                    Print(line),
                    ResetColor
                )?;
            } else {
                queue!(out, Print(line))?;
            }
            queue!(out, Clear(ClearType::UntilNewLine))?;
        }
        out.flush()
    }
}

/// Keypad grid position under terminal cell (`column`, `row`)
#[must_use]
pub fn hit_test(keypad: &Keypad, column: u16, row: u16) -> Option<&KeypadButton> {
    let grid_row = row.checked_sub(KEYPAD_TOP)? as usize;
    let grid_col = column.checked_sub(KEYPAD_LEFT)? as usize / CELL_WIDTH;
    keypad.button_at(grid_row, grid_col)
}

/// Terminal cell at the center of a button
#[must_use]
pub fn button_center(button: &KeypadButton) -> (u16, u16) {
    let column = KEYPAD_LEFT as usize + button.col * CELL_WIDTH + CELL_WIDTH / 2;
    let row = KEYPAD_TOP as usize + button.row;
    (column as u16, row as u16)
}

fn cell(button: &KeypadButton) -> String {
    format!("[{:^4}]", button.label)
}

fn blank_cell() -> String {
    " ".repeat(CELL_WIDTH)
}

// Long expressions keep their tail visible, like a scrolled text field
fn fit_right(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        text.chars().skip(count - width).collect()
    } else {
        format!("{text:>width$}")
    }
}
