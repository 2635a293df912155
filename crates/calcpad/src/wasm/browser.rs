//! Browser bindings.
//!
//! Binds a [`DisplayController`] to a page that has an `input#display` and
//! buttons carrying `data-action` attributes. The pending auto-clear is
//! mirrored by exactly one `window.setTimeout`, replaced or cancelled
//! whenever the controller's deadline changes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, HtmlInputElement, KeyboardEvent, Performance, Window};

use crate::clock::Clock;
use crate::config::CalcpadConfig;
use crate::controller::{Command, DisplayController, DisplayState};
use crate::dom::DISPLAY_ID;
use crate::input::route_key;
use crate::keypad::decode_action;

type ClickListener = Closure<dyn FnMut(web_sys::Event)>;

/// Monotonic clock backed by `performance.now()`
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: Performance,
}

impl PerformanceClock {
    #[must_use]
    pub fn new(performance: Performance) -> Self {
        Self { performance }
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(self.performance.now().max(0.0) / 1000.0)
    }
}

#[derive(Debug)]
struct Page {
    controller: DisplayController<PerformanceClock>,
    window: Window,
    display: HtmlInputElement,
    timeout: Option<i32>,
    on_timeout: Option<Closure<dyn FnMut()>>,
}

impl Page {
    fn execute(&mut self, command: Command) {
        self.controller.execute(command);
        self.render();
        self.schedule_auto_clear();
    }

    fn render(&self) {
        self.display.set_value(self.controller.display());
        let class_list = self.display.class_list();
        let result = if self.controller.state() == DisplayState::ErrorDisplay {
            class_list.add_1("error")
        } else {
            class_list.remove_1("error")
        };
        if let Err(err) = result {
            console::error_1(&err);
        }
    }

    fn fire_timeout(&mut self) {
        self.timeout = None;
        if self.controller.tick() {
            self.render();
        }
        self.schedule_auto_clear();
    }

    fn schedule_auto_clear(&mut self) {
        if let Some(handle) = self.timeout.take() {
            self.window.clear_timeout_with_handle(handle);
        }

        let (Some(remaining), Some(callback)) =
            (self.controller.time_until_auto_clear(), self.on_timeout.as_ref())
        else {
            return;
        };

        let millis = i32::try_from(remaining.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => self.timeout = Some(handle),
            Err(err) => console::error_1(&err),
        }
    }
}

/// Calculator attached to the current page.
///
/// Listeners live as long as this object; keep it referenced from JS.
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserCalculator {
    page: Rc<RefCell<Page>>,
    clicks: Vec<(Element, ClickListener)>,
    keydown: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Attaches with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<BrowserCalculator, JsValue> {
        Self::attach(CalcpadConfig::default())
    }

    /// Attaches with a YAML configuration document
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(yaml: &str) -> Result<BrowserCalculator, JsValue> {
        let config = CalcpadConfig::from_yaml_str(yaml).map_err(to_js)?;
        Self::attach(config)
    }

    /// Text currently in the display
    #[wasm_bindgen(getter)]
    pub fn display(&self) -> String {
        self.page.borrow().controller.display().to_string()
    }

    /// True while the error text is shown
    #[wasm_bindgen(getter, js_name = isError)]
    pub fn is_error(&self) -> bool {
        self.page.borrow().controller.state() == DisplayState::ErrorDisplay
    }

    /// Runs a `data-action` value (`append:7`, `clear`, `delete`, `evaluate`)
    pub fn press(&self, action: &str) -> bool {
        match decode_action(action) {
            Some(command) => {
                self.page.borrow_mut().execute(command);
                true
            }
            None => false,
        }
    }
}

impl BrowserCalculator {
    fn attach(config: CalcpadConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let performance = window
            .performance()
            .ok_or_else(|| JsValue::from_str("no performance timer"))?;
        let display = document
            .get_element_by_id(DISPLAY_ID)
            .ok_or_else(|| JsValue::from_str("missing #display"))?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| JsValue::from_str("#display is not an input"))?;

        let page = Rc::new(RefCell::new(Page {
            controller: DisplayController::with_clock(PerformanceClock::new(performance), config),
            window,
            display,
            timeout: None,
            on_timeout: None,
        }));
        page.borrow_mut().on_timeout = Some(timeout_callback(Rc::downgrade(&page)));
        page.borrow().render();

        let clicks = bind_buttons(&document, &page)?;
        let keydown = bind_keyboard(&document, &page)?;

        Ok(Self {
            page,
            clicks,
            keydown: Some(keydown),
        })
    }
}

impl Drop for BrowserCalculator {
    fn drop(&mut self) {
        let mut page = self.page.borrow_mut();
        if let Some(handle) = page.timeout.take() {
            page.window.clear_timeout_with_handle(handle);
        }
        page.on_timeout = None;
        for (element, listener) in self.clicks.drain(..) {
            let _ = element
                .remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
        }
        if let (Some(document), Some(keydown)) = (page.window.document(), self.keydown.take()) {
            let _ = document
                .remove_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
        }
    }
}

fn timeout_callback(page: Weak<RefCell<Page>>) -> Closure<dyn FnMut()> {
    Closure::new(move || {
        if let Some(page) = page.upgrade() {
            page.borrow_mut().fire_timeout();
        }
    })
}

fn bind_buttons(
    document: &Document,
    page: &Rc<RefCell<Page>>,
) -> Result<Vec<(Element, ClickListener)>, JsValue> {
    let nodes = document.query_selector_all("[data-action]")?;
    let mut listeners = Vec::with_capacity(nodes.length() as usize);

    for index in 0..nodes.length() {
        let Some(element) = nodes.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(command) = element
            .get_attribute("data-action")
            .as_deref()
            .and_then(decode_action)
        else {
            console::warn_1(&JsValue::from_str("ignoring unknown data-action"));
            continue;
        };

        let page = Rc::clone(page);
        let listener = ClickListener::new(move |_event: web_sys::Event| {
            page.borrow_mut().execute(command);
        });
        element.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
        listeners.push((element, listener));
    }

    Ok(listeners)
}

fn bind_keyboard(
    document: &Document,
    page: &Rc<RefCell<Page>>,
) -> Result<Closure<dyn FnMut(KeyboardEvent)>, JsValue> {
    let page = Rc::clone(page);
    let listener = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        let route = route_key(&event.key());
        if route.prevent_default {
            event.prevent_default();
        }
        if let Some(command) = route.command {
            page.borrow_mut().execute(command);
        }
    });
    document.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())?;
    Ok(listener)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
