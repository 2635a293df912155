//! Mock DOM for exercising the calculator without a browser.
//!
//! Holds the same elements the browser page provides (an `<input id="display">`
//! and one `<button data-action=...>` per keypad button) and records every
//! dispatched event.

use std::collections::HashMap;

use crate::keypad::Keypad;

/// Element id of the display field
pub const DISPLAY_ID: &str = "display";

/// Element id of the keypad container
pub const KEYPAD_ID: &str = "keypad";

/// A DOM element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomElement {
    /// Element id
    pub id: String,
    /// Tag name
    pub tag: String,
    /// Text content (or `value` for input elements)
    pub text_content: String,
    /// Element attributes
    pub attributes: HashMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
}

impl DomElement {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Events the mock DOM can receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// Pointer click on an element
    Click {
        /// The clicked element
        element_id: String,
    },
    /// Document-level key press
    KeyDown {
        /// `KeyboardEvent.key` value
        key: String,
        /// Whether a listener called `preventDefault()`
        default_prevented: bool,
    },
}

impl DomEvent {
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    #[must_use]
    pub fn key_down(key: &str, default_prevented: bool) -> Self {
        Self::KeyDown {
            key: key.to_string(),
            default_prevented,
        }
    }
}

/// In-memory stand-in for the calculator page
#[derive(Debug, Default)]
pub struct MockDom {
    elements: HashMap<String, DomElement>,
    event_history: Vec<DomEvent>,
}

impl MockDom {
    /// Creates an empty DOM
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the calculator page for `keypad`
    #[must_use]
    pub fn calculator(keypad: &Keypad) -> Self {
        let mut dom = Self::new();

        dom.register_element(
            DomElement::new("input")
                .with_id(DISPLAY_ID)
                .with_attr("type", "text")
                .with_attr("readonly", "")
                .with_class("display"),
        );
        dom.register_element(DomElement::new("div").with_id(KEYPAD_ID).with_class("keypad"));

        for button in keypad.buttons() {
            dom.register_element(
                DomElement::new("button")
                    .with_id(&button.id)
                    .with_text(&button.label)
                    .with_class("keypad-btn")
                    .with_attr("data-action", &button.data_action()),
            );
        }

        dom
    }

    /// Registers an element for id lookup
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Number of registered elements
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Records an event
    pub fn dispatch_event(&mut self, event: DomEvent) {
        self.event_history.push(event);
    }

    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }

    pub fn clear_event_history(&mut self) {
        self.event_history.clear();
    }

    /// Updates element text by id
    pub fn set_element_text(&mut self, id: &str, text: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.text_content.clear();
            elem.text_content.push_str(text);
        }
    }

    /// Gets element text by id
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }
}
