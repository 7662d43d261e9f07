//! Preserved state: the diff baseline.
//!
//! The store holds, per widget, the property values and listener flags the
//! client last received, and is carried across request cycles. A successful
//! render refreshes a widget's entry, inbound client writes are folded in
//! during READ_DATA (the client already sees those values), and an entry is
//! dropped when its widget is pruned. The render phase diffs current widget
//! state against this baseline, so a property changed and changed back
//! between renders produces no operation, while a mutation made between
//! requests renders exactly once.

use std::collections::HashMap;

use crate::protocol::{PropertyMap, PropertyValue};
use crate::widgets::Widget;

/// What the client holds for one widget: its last-rendered property values
/// and listener flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreservedState {
    properties: PropertyMap,
    listeners: HashMap<String, bool>,
}

impl PreservedState {
    /// Capture the given tracked properties and listen events of a widget.
    pub fn capture(widget: &Widget, properties: &[&str], events: &[&str]) -> Self {
        let properties = properties
            .iter()
            .map(|name| (name.to_string(), widget.property(name)))
            .collect();
        let listeners = events
            .iter()
            .map(|event| (event.to_string(), widget.has_listener(event)))
            .collect();
        Self { properties, listeners }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn had_listener(&self, event: &str) -> bool {
        self.listeners.get(event).copied().unwrap_or(false)
    }

    /// Record a value the client already holds, e.g. a client-originated
    /// property write.
    pub(crate) fn record_property(&mut self, name: &str, value: PropertyValue) {
        self.properties.insert(name.to_string(), value);
    }
}

/// Per-session store of per-widget baselines, carried across cycles.
#[derive(Debug, Default)]
pub struct PreservedStore {
    states: HashMap<String, PreservedState>,
}

impl PreservedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the baseline for one widget; the state passed in is what the
    /// client holds after the current message is delivered.
    pub fn preserve(&mut self, widget_id: &str, state: PreservedState) {
        self.states.insert(widget_id.to_string(), state);
    }

    pub fn state(&self, widget_id: &str) -> Option<&PreservedState> {
        self.states.get(widget_id)
    }

    pub(crate) fn state_mut(&mut self, widget_id: &str) -> Option<&mut PreservedState> {
        self.states.get_mut(widget_id)
    }

    /// Drop one widget's baseline; called when the widget is pruned.
    pub(crate) fn remove(&mut self, widget_id: &str) {
        self.states.remove(widget_id);
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
