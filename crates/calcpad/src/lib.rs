//! Calcpad - keypad calculator widget
//!
//! A display controller owns the text buffer of a small four-function
//! calculator. Keypad buttons and keyboard keys are routed to four
//! operations (append, clear, delete-last, evaluate); a failed evaluation
//! shows an error that clears itself after a configurable delay.
//!
//! Expressions never reach a general-purpose interpreter: the buffer is
//! tokenized, parsed and folded by [`core`].
//!
//! The same controller runs behind three front-ends:
//!
//! - a mock DOM driven by [`driver::DomDriver`], used by scenario tests
//! - a crossterm terminal UI (feature `tui`)
//! - the browser through wasm-bindgen (feature `wasm`)
//!
//! # Example
//!
//! ```rust
//! use calcpad::prelude::*;
//!
//! let clock = ManualClock::new();
//! let mut calc = DisplayController::with_clock(clock.clone(), CalcpadConfig::default());
//!
//! calc.append("2+3*4");
//! calc.evaluate().unwrap();
//! assert_eq!(calc.display(), "14");
//!
//! calc.append("/");
//! assert!(calc.evaluate().is_err());
//! assert_eq!(calc.display(), "Error");
//!
//! clock.advance_ms(1500);
//! calc.tick();
//! assert_eq!(calc.display(), "");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_debug_implementations)]

pub mod clock;
pub mod config;
pub mod controller;
pub mod core;
pub mod dom;
pub mod driver;
pub mod input;
pub mod keypad;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::{AutoClearPolicy, CalcpadConfig, ConfigError};
    pub use crate::controller::{Command, DisplayController, DisplayState};
    pub use crate::core::{
        format_number, ArithmeticEvaluator, CalcError, CalcResult, Evaluator,
        ExpressionEvaluator, Parser,
    };
    pub use crate::dom::{DomElement, DomEvent, MockDom};
    pub use crate::driver::{CalculatorDriver, DomDriver};
    pub use crate::input::{route_key, KeyRoute};
    pub use crate::keypad::{Keypad, KeypadButton};

    #[cfg(feature = "tui")]
    pub use crate::tui::TuiDriver;
}
