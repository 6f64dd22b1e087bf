use serde_json::Value;
use std::collections::BTreeMap;

use crate::engine::{BoundingBox, ElementState, ElementStates, SelectOption};

/// A fake DOM element
#[derive(Debug, Clone, PartialEq)]
pub struct MockElement {
    /// Upper-case node name (`BUTTON`, `INPUT`, ...)
    pub node_name: String,
    /// Text content
    pub text: String,
    /// HTML attributes
    pub attributes: BTreeMap<String, String>,
    /// DOM properties
    pub properties: BTreeMap<String, Value>,
    /// State flags
    pub states: ElementStates,
    /// Layout box
    pub bounding_box: BoundingBox,
    /// `<option>` children of a `<select>`
    pub options: Vec<SelectOption>,
}

impl MockElement {
    /// Attached, visible, enabled and editable element of the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            node_name: tag.to_ascii_uppercase(),
            text: String::new(),
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            states: [
                ElementState::Attached,
                ElementState::Visible,
                ElementState::Enabled,
                ElementState::Editable,
            ]
            .into_iter()
            .collect(),
            bounding_box: BoundingBox::new(0.0, 0.0, 100.0, 20.0),
            options: Vec::new(),
        }
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set a DOM property
    #[must_use]
    pub fn with_property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    /// Replace the state flags
    #[must_use]
    pub fn with_states(mut self, states: ElementStates) -> Self {
        self.states = states;
        self
    }

    /// Attached but not visible
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.states = self.states.without(ElementState::Visible);
        self
    }

    /// Not enabled and not editable
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.states = self
            .states
            .without(ElementState::Enabled)
            .without(ElementState::Editable);
        self
    }

    /// Set the layout box
    #[must_use]
    pub const fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Add a `<select>` option
    #[must_use]
    pub fn with_option(mut self, label: &str, value: &str, selected: bool) -> Self {
        self.options.push(SelectOption {
            label: label.to_string(),
            value: value.to_string(),
            selected,
        });
        self
    }

    pub(crate) fn property(&self, name: &str) -> Value {
        if let Some(value) = self.properties.get(name) {
            return value.clone();
        }
        match name {
            "nodeName" | "tagName" => Value::String(self.node_name.clone()),
            "textContent" | "innerText" => Value::String(self.text.clone()),
            _ => Value::Null,
        }
    }
}
