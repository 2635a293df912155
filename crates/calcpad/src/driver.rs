//! Unified calculator driver.
//!
//! Scenario tests are written once against [`CalculatorDriver`] and run on
//! every front-end: the mock DOM here and the terminal app in `tui`.

use std::time::Duration;

use tracing::trace;

use crate::clock::ManualClock;
use crate::config::CalcpadConfig;
use crate::controller::DisplayController;
use crate::dom::{DomEvent, MockDom, DISPLAY_ID};
use crate::input::{route_key, KeyRoute};
use crate::keypad::{decode_action, Keypad};

/// Platform-neutral way to interact with a calculator front-end
pub trait CalculatorDriver {
    /// Clicks the keypad button with element id `id`; returns false if no such button
    fn press_button(&mut self, id: &str) -> bool;

    /// Presses a key by its browser key name
    fn press_key(&mut self, key: &str) -> KeyRoute;

    /// Lets time pass, firing any due auto-clear
    fn advance(&mut self, by: Duration);

    /// Text currently shown on the display
    fn display(&self) -> String;

    /// Presses each character of `keys` as its own key
    fn type_keys(&mut self, keys: &str) {
        for ch in keys.chars() {
            self.press_key(ch.encode_utf8(&mut [0; 4]));
        }
    }

    /// Lets `ms` milliseconds pass
    fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

/// Drives a controller through the mock DOM on a manual clock
#[derive(Debug)]
pub struct DomDriver {
    controller: DisplayController<ManualClock>,
    clock: ManualClock,
    keypad: Keypad,
    dom: MockDom,
}

impl Default for DomDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DomDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CalcpadConfig::default())
    }

    #[must_use]
    pub fn with_config(config: CalcpadConfig) -> Self {
        let clock = ManualClock::new();
        let keypad = Keypad::new();
        Self {
            controller: DisplayController::with_clock(clock.clone(), config),
            clock,
            dom: MockDom::calculator(&keypad),
            keypad,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &DisplayController<ManualClock> {
        &self.controller
    }

    #[must_use]
    pub const fn dom(&self) -> &MockDom {
        &self.dom
    }

    #[must_use]
    pub const fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    #[must_use]
    pub const fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Clicks an element, dispatching through its `data-action` attribute
    pub fn click(&mut self, element_id: &str) -> bool {
        self.dom.dispatch_event(DomEvent::click(element_id));

        let command = self
            .dom
            .get_element(element_id)
            .and_then(|elem| elem.get_attr("data-action"))
            .and_then(decode_action);

        match command {
            Some(command) => {
                trace!(element_id, ?command, "click");
                self.controller.execute(command);
                self.sync_dom();
                true
            }
            None => false,
        }
    }

    /// Sends a document keydown
    pub fn key_down(&mut self, key: &str) -> KeyRoute {
        let route = route_key(key);
        self.dom
            .dispatch_event(DomEvent::key_down(key, route.prevent_default));

        if let Some(command) = route.command {
            trace!(key, ?command, "keydown");
            self.controller.execute(command);
            self.sync_dom();
        }
        route
    }

    /// Text of the display element
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.dom.get_element_text(DISPLAY_ID).unwrap_or_default()
    }

    fn sync_dom(&mut self) {
        self.dom
            .set_element_text(DISPLAY_ID, self.controller.display());
    }
}

impl CalculatorDriver for DomDriver {
    fn press_button(&mut self, id: &str) -> bool {
        self.click(id)
    }

    fn press_key(&mut self, key: &str) -> KeyRoute {
        self.key_down(key)
    }

    fn advance(&mut self, by: Duration) {
        self.clock.advance(by);
        if self.controller.tick() {
            self.sync_dom();
        }
    }

    fn display(&self) -> String {
        self.display_text().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutoClearPolicy;
    use crate::controller::{Command, DisplayState};

    #[test]
    fn test_click_digits_and_evaluate() {
        let mut driver = DomDriver::new();
        for id in ["btn-2", "btn-plus", "btn-3", "btn-times", "btn-4"] {
            assert!(driver.click(id));
        }
        assert_eq!(driver.display_text(), "2+3*4");
        driver.click("btn-equals");
        assert_eq!(driver.display_text(), "14");
    }

    #[test]
    fn test_click_unknown_element() {
        let mut driver = DomDriver::new();
        assert!(!driver.click("display"));
        assert!(!driver.click("btn-missing"));
        assert_eq!(driver.dom().event_history().len(), 2);
    }

    #[test]
    fn test_click_delete_and_clear() {
        let mut driver = DomDriver::new();
        driver.type_keys("123");
        driver.click("btn-delete");
        assert_eq!(driver.display_text(), "12");
        driver.click("btn-clear");
        assert_eq!(driver.display_text(), "");
    }

    #[test]
    fn test_key_down_records_default_prevented() {
        let mut driver = DomDriver::new();
        driver.key_down("5");
        driver.key_down("Enter");
        driver.key_down("Tab");
        assert_eq!(
            driver.dom().event_history(),
            &[
                DomEvent::key_down("5", false),
                DomEvent::key_down("Enter", true),
                DomEvent::key_down("Tab", false),
            ]
        );
        assert_eq!(driver.display_text(), "5");
    }

    #[test]
    fn test_error_auto_clears() {
        let mut driver = DomDriver::new();
        driver.type_keys("2+");
        driver.key_down("Enter");
        assert_eq!(driver.display_text(), "Error");
        assert_eq!(driver.controller().state(), DisplayState::ErrorDisplay);

        driver.advance_ms(1499);
        assert_eq!(driver.display_text(), "Error");
        driver.advance_ms(1);
        assert_eq!(driver.display_text(), "");
    }

    #[test]
    fn test_escape_during_error_cancels_auto_clear() {
        let mut driver = DomDriver::new();
        driver.type_keys("*/=");
        assert_eq!(driver.display_text(), "Error");

        driver.advance_ms(300);
        driver.key_down("Escape");
        assert_eq!(driver.display_text(), "");
        driver.type_keys("8");

        driver.advance_ms(2000);
        assert_eq!(driver.display_text(), "8");
    }

    #[test]
    fn test_escape_during_error_unconditional_clobbers() {
        let config = CalcpadConfig::default().with_policy(AutoClearPolicy::Unconditional);
        let mut driver = DomDriver::with_config(config);
        driver.type_keys("*/=");

        driver.advance_ms(300);
        driver.key_down("Escape");
        assert_eq!(driver.display_text(), "");
        driver.type_keys("8");

        driver.advance_ms(1200);
        assert_eq!(driver.display_text(), "");
    }

    #[test]
    fn test_keypad_buttons_all_clickable() {
        let mut driver = DomDriver::new();
        let ids: Vec<String> = driver.keypad().buttons().iter().map(|b| b.id.clone()).collect();
        for id in ids {
            assert!(driver.click(&id), "{id}");
        }
        // last button is DEL, preceded by C
        assert_eq!(driver.display_text(), "");
        assert_eq!(
            driver.keypad().buttons().last().map(|b| b.command),
            Some(Command::DeleteLast)
        );
    }
}
