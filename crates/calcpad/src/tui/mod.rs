//! Terminal front-end: crossterm input, text-grid rendering, poll loop

mod app;
mod keys;
mod screen;

pub use app::{run, TuiApp, TuiDriver};
pub use keys::{key_event_for, translate, TerminalKey};
pub use screen::{button_center, hit_test, Screen};
