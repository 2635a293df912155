//! Terminal application state and event loop

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{debug, info};

use super::keys::{key_event_for, translate, TerminalKey};
use super::screen::{button_center, hit_test, Screen};
use crate::clock::{Clock, ManualClock, SystemClock};
use crate::config::CalcpadConfig;
use crate::controller::{DisplayController, DisplayState};
use crate::driver::CalculatorDriver;
use crate::input::{route_key, KeyRoute};
use crate::keypad::Keypad;

/// Upper bound on how long the loop blocks when no auto-clear is pending
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Calculator running in a terminal
#[derive(Debug)]
pub struct TuiApp<C: Clock = SystemClock> {
    controller: DisplayController<C>,
    keypad: Keypad,
    should_quit: bool,
}

impl TuiApp {
    /// Creates an app on the system clock
    #[must_use]
    pub fn new(config: CalcpadConfig) -> Self {
        Self::with_controller(DisplayController::with_config(config))
    }
}

impl<C: Clock> TuiApp<C> {
    #[must_use]
    pub fn with_controller(controller: DisplayController<C>) -> Self {
        Self {
            controller,
            keypad: Keypad::new(),
            should_quit: false,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &DisplayController<C> {
        &self.controller
    }

    #[must_use]
    pub const fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Renders the current state
    #[must_use]
    pub fn screen(&self) -> Screen {
        let error = self.controller.state() == DisplayState::ErrorDisplay;
        Screen::render(self.controller.display(), error, &self.keypad)
    }

    /// Applies a terminal event; returns true when the screen must be redrawn
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => match translate(*key) {
                TerminalKey::Quit => {
                    self.should_quit = true;
                    false
                }
                TerminalKey::Named(name) => self.handle_key_name(&name).is_handled(),
                TerminalKey::Unmapped => false,
            },
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            Event::Resize(..) => true,
            _ => false,
        }
    }

    /// Routes a browser key name to the controller
    pub fn handle_key_name(&mut self, name: &str) -> KeyRoute {
        let route = route_key(name);
        if let Some(command) = route.command {
            self.controller.execute(command);
        }
        route
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        let Some(command) = hit_test(&self.keypad, mouse.column, mouse.row).map(|b| b.command)
        else {
            return false;
        };
        debug!(?command, column = mouse.column, row = mouse.row, "keypad click");
        self.controller.execute(command);
        true
    }

    /// Fires due auto-clears; returns true when the screen must be redrawn
    pub fn tick(&mut self) -> bool {
        self.controller.tick()
    }

    /// How long the event loop may block waiting for input
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        self.controller
            .time_until_auto_clear()
            .map_or(IDLE_POLL, |remaining| remaining.min(IDLE_POLL))
    }
}

/// Runs the calculator in the current terminal until the user quits
pub fn run(config: CalcpadConfig) -> io::Result<()> {
    let mut app = TuiApp::new(config);
    let mut stdout = io::stdout();

    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
    info!("terminal calculator started");

    let result = event_loop(&mut app, &mut stdout);

    execute!(stdout, Show, DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    info!("terminal calculator stopped");

    result
}

fn event_loop<C: Clock, W: Write>(app: &mut TuiApp<C>, out: &mut W) -> io::Result<()> {
    app.screen().draw(out)?;

    while !app.should_quit() {
        let mut dirty = false;
        if event::poll(app.poll_timeout())? {
            dirty |= app.handle_event(&event::read()?);
        }
        dirty |= app.tick();

        if dirty {
            app.screen().draw(out)?;
        }
    }

    Ok(())
}

/// Drives a [`TuiApp`] with synthesized terminal events on a manual clock
#[derive(Debug)]
pub struct TuiDriver {
    app: TuiApp<ManualClock>,
    clock: ManualClock,
}

impl Default for TuiDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CalcpadConfig::default())
    }

    #[must_use]
    pub fn with_config(config: CalcpadConfig) -> Self {
        let clock = ManualClock::new();
        let controller = DisplayController::with_clock(clock.clone(), config);
        Self {
            app: TuiApp::with_controller(controller),
            clock,
        }
    }

    #[must_use]
    pub const fn app(&self) -> &TuiApp<ManualClock> {
        &self.app
    }

    /// Feeds a raw terminal event
    pub fn send(&mut self, event: &Event) -> bool {
        self.app.handle_event(event)
    }
}

impl CalculatorDriver for TuiDriver {
    fn press_button(&mut self, id: &str) -> bool {
        let Some((column, row)) = self.app.keypad().find_by_id(id).map(button_center) else {
            return false;
        };
        self.send(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
    }

    fn press_key(&mut self, key: &str) -> KeyRoute {
        let Some(event) = key_event_for(key) else {
            return KeyRoute::IGNORED;
        };
        match translate(event) {
            TerminalKey::Named(name) => self.app.handle_key_name(&name),
            TerminalKey::Quit | TerminalKey::Unmapped => KeyRoute::IGNORED,
        }
    }

    fn advance(&mut self, by: Duration) {
        self.clock.advance(by);
        self.app.tick();
    }

    // The whole buffer; the screen only shows its tail
    fn display(&self) -> String {
        self.app.controller().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_typing_and_evaluating() {
        let mut driver = TuiDriver::new();
        for ch in "6*7".chars() {
            assert!(driver.send(&key(KeyCode::Char(ch))));
        }
        assert!(driver.send(&key(KeyCode::Enter)));
        assert_eq!(driver.app().controller().display(), "42");
    }

    #[test]
    fn test_ignored_key_does_not_redraw() {
        let mut driver = TuiDriver::new();
        assert!(!driver.send(&key(KeyCode::Char('x'))));
        assert!(!driver.send(&key(KeyCode::Insert)));
        assert_eq!(driver.app().controller().display(), "");
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut driver = TuiDriver::new();
        driver.send(&Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(driver.app().should_quit());
    }

    #[test]
    fn test_plain_c_clears() {
        let mut driver = TuiDriver::new();
        driver.type_keys("12");
        driver.send(&key(KeyCode::Char('c')));
        assert!(!driver.app().should_quit());
        assert_eq!(driver.display(), "");
    }

    #[test]
    fn test_display_is_whole_buffer() {
        let mut driver = TuiDriver::new();
        let digits = "1234567890".repeat(4);
        driver.type_keys(&digits);
        assert_eq!(driver.display(), digits);

        let visible = driver.app().screen().display_line().to_string();
        assert!(visible.len() < digits.len());
        assert!(digits.ends_with(visible.trim_start()));
    }

    #[test]
    fn test_mouse_click_on_keypad() {
        let mut driver = TuiDriver::new();
        assert!(driver.press_button("btn-9"));
        assert!(driver.press_button("btn-minus"));
        assert!(driver.press_button("btn-4"));
        assert!(driver.press_button("btn-equals"));
        assert_eq!(driver.display(), "5");
        assert!(!driver.press_button("btn-nope"));
    }

    #[test]
    fn test_mouse_release_ignored() {
        let mut driver = TuiDriver::new();
        let (column, row) = button_center(driver.app().keypad().find_by_id("btn-1").unwrap());
        let handled = driver.send(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
        assert!(!handled);
        assert_eq!(driver.display(), "");
    }

    #[test]
    fn test_resize_redraws() {
        let mut driver = TuiDriver::new();
        assert!(driver.send(&Event::Resize(80, 24)));
    }

    #[test]
    fn test_poll_timeout_tracks_deadline() {
        let mut driver = TuiDriver::new();
        assert_eq!(driver.app().poll_timeout(), IDLE_POLL);

        driver.type_keys("2+=");
        assert_eq!(driver.app().poll_timeout(), IDLE_POLL);

        driver.advance_ms(1300);
        assert_eq!(driver.app().poll_timeout(), Duration::from_millis(200));

        driver.advance_ms(200);
        assert_eq!(driver.display(), "");
        assert_eq!(driver.app().poll_timeout(), IDLE_POLL);
    }

    #[test]
    fn test_error_renders_in_error_state() {
        let mut driver = TuiDriver::new();
        driver.type_keys("/=");
        assert_eq!(driver.display(), "Error");
        assert_eq!(
            driver.app().controller().state(),
            DisplayState::ErrorDisplay
        );
    }
}
