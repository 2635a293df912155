//! Display controller: the single owner of the calculator's text buffer.
//!
//! ```text
//!            evaluate() fails
//!   Normal ───────────────────▶ ErrorDisplay
//!     ▲                             │
//!     └─────── deadline reached ────┘
//!              (or any user operation)
//! ```
//!
//! A failed evaluation records an auto-clear deadline instead of spawning a
//! timer. Front-ends wake up whenever they like and call [`DisplayController::tick`];
//! only a deadline that is both due and still pending empties the buffer.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::{AutoClearPolicy, CalcpadConfig};
use crate::core::{format_number, ArithmeticEvaluator, CalcResult, ExpressionEvaluator};

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Buffer holds user input or the last result
    Normal,
    /// Buffer holds the error text and an auto-clear is pending
    ErrorDisplay,
}

/// A single operation on the display, as produced by buttons and keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Append one character
    Append(char),
    /// Empty the buffer
    Clear,
    /// Remove the last character
    DeleteLast,
    /// Evaluate the buffer
    Evaluate,
}

/// Owns the display buffer and reacts to user operations
#[derive(Debug)]
pub struct DisplayController<C: Clock = SystemClock> {
    buffer: String,
    state: DisplayState,
    // ascending; holds at most one entry under CancelOnInput
    auto_clear_deadlines: VecDeque<Duration>,
    evaluator: Box<dyn ExpressionEvaluator>,
    clock: C,
    config: CalcpadConfig,
}

impl Default for DisplayController {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayController {
    /// Creates a controller on the system clock with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new(), CalcpadConfig::default())
    }

    /// Creates a controller on the system clock
    #[must_use]
    pub fn with_config(config: CalcpadConfig) -> Self {
        Self::with_clock(SystemClock::new(), config)
    }
}

impl<C: Clock> DisplayController<C> {
    /// Creates a controller on an explicit clock
    #[must_use]
    pub fn with_clock(clock: C, config: CalcpadConfig) -> Self {
        Self {
            buffer: String::new(),
            state: DisplayState::Normal,
            auto_clear_deadlines: VecDeque::new(),
            evaluator: Box::new(ArithmeticEvaluator::new()),
            clock,
            config,
        }
    }

    /// Replaces the expression evaluator
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Box<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// The text currently shown
    #[must_use]
    pub fn display(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub const fn state(&self) -> DisplayState {
        self.state
    }

    #[must_use]
    pub const fn config(&self) -> &CalcpadConfig {
        &self.config
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Concatenates `value` onto the buffer without validation
    pub fn append(&mut self, value: &str) {
        self.begin_user_operation();
        self.buffer.push_str(value);
        debug!(value, display = %self.buffer, "append");
    }

    /// Empties the buffer
    pub fn clear(&mut self) {
        self.begin_user_operation();
        self.buffer.clear();
        debug!("clear");
    }

    /// Removes the final character; no-op on an empty buffer
    pub fn delete_last(&mut self) {
        self.begin_user_operation();
        self.buffer.pop();
        debug!(display = %self.buffer, "delete last");
    }

    /// Evaluates the buffer.
    ///
    /// On success the buffer is replaced with the formatted value. On failure
    /// it shows the error text and an auto-clear is scheduled. The error is
    /// returned for inspection only; the display already reflects it.
    pub fn evaluate(&mut self) -> CalcResult<f64> {
        self.begin_user_operation();

        match self.evaluator.evaluate(&self.buffer) {
            Ok(value) => {
                debug!(expression = %self.buffer, value, "evaluated");
                self.buffer = format_number(value);
                Ok(value)
            }
            Err(error) => {
                let deadline = self.clock.now() + self.config.auto_clear_delay();
                debug!(expression = %self.buffer, %error, ?deadline, "evaluation failed");
                self.buffer.clone_from(&self.config.error_text);
                self.state = DisplayState::ErrorDisplay;
                self.auto_clear_deadlines.push_back(deadline);
                Err(error)
            }
        }
    }

    /// Runs a routed command
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Append(ch) => {
                let mut encoded = [0; 4];
                self.append(ch.encode_utf8(&mut encoded));
            }
            Command::Clear => self.clear(),
            Command::DeleteLast => self.delete_last(),
            Command::Evaluate => {
                // failure is already on the display
                let _ = self.evaluate();
            }
        }
    }

    /// Fires every auto-clear whose deadline has passed.
    ///
    /// Returns `true` if the buffer was cleared.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let mut fired = false;

        while self
            .auto_clear_deadlines
            .front()
            .is_some_and(|deadline| *deadline <= now)
        {
            self.auto_clear_deadlines.pop_front();
            fired = true;
        }

        if fired {
            info!(cleared = %self.buffer, "auto-clear fired");
            self.buffer.clear();
            self.state = DisplayState::Normal;
        }

        fired
    }

    /// Whether any auto-clear is still scheduled
    #[must_use]
    pub fn has_pending_auto_clear(&self) -> bool {
        !self.auto_clear_deadlines.is_empty()
    }

    /// Time remaining until the next auto-clear, if one is pending
    #[must_use]
    pub fn time_until_auto_clear(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.auto_clear_deadlines
            .front()
            .map(|deadline| deadline.saturating_sub(now))
    }

    // Overdue clears fire first so events keep their arrival order.
    fn begin_user_operation(&mut self) {
        self.tick();

        if self.config.auto_clear_policy == AutoClearPolicy::CancelOnInput
            && self.has_pending_auto_clear()
        {
            debug!("pending auto-clear cancelled by user input");
            self.auto_clear_deadlines.clear();
        }

        self.state = DisplayState::Normal;
    }
}
