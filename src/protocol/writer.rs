//! Ordered batching of operations into one outbound message.
//!
//! The writer keeps the tail operation "open": a Set or Listen appended for
//! the same target as the open record merges into it instead of starting a
//! new record, and writes issued between an object's Create and the first
//! flush fold into the Create itself. Calls always close the open record and
//! are never merged, so call order survives on the wire.

use std::collections::BTreeMap;

use crate::protocol::message::Message;
use crate::protocol::operation::Operation;
use crate::protocol::value::{PropertyMap, PropertyValue};

/// Property name that carries style flags; folds into the Create record's
/// `styles` field rather than its property map.
pub const STYLE_PROPERTY: &str = "style";

/// Accumulates one request cycle's operations in order.
#[derive(Debug, Default)]
pub struct MessageWriter {
    head: PropertyMap,
    operations: Vec<Operation>,
}

impl MessageWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a head entry (request counter, error flag).
    pub fn set_head(&mut self, key: &str, value: impl Into<PropertyValue>) {
        self.head.insert(key.to_string(), value.into());
    }

    pub fn append_create(&mut self, target: &str, object_type: &str) {
        self.operations.push(Operation::Create {
            target: target.to_string(),
            object_type: object_type.to_string(),
            properties: PropertyMap::new(),
            styles: Vec::new(),
            listeners: BTreeMap::new(),
        });
    }

    /// Append a property write, merging into the open record when possible.
    pub fn append_set(&mut self, target: &str, name: &str, value: PropertyValue) {
        match self.operations.last_mut() {
            Some(Operation::Create {
                target: t,
                properties,
                styles,
                ..
            }) if t == target => {
                if name == STYLE_PROPERTY {
                    if let PropertyValue::StrList(flags) = value {
                        *styles = flags;
                        return;
                    }
                }
                properties.insert(name.to_string(), value);
            }
            Some(Operation::Set { target: t, properties }) if t == target => {
                properties.insert(name.to_string(), value);
            }
            _ => {
                let mut properties = PropertyMap::new();
                properties.insert(name.to_string(), value);
                self.operations.push(Operation::Set {
                    target: target.to_string(),
                    properties,
                });
            }
        }
    }

    /// Append a listener toggle, merging into the open record when possible.
    pub fn append_listen(&mut self, target: &str, event: &str, enabled: bool) {
        match self.operations.last_mut() {
            Some(Operation::Create { target: t, listeners, .. }) if t == target => {
                listeners.insert(event.to_string(), enabled);
            }
            Some(Operation::Listen { target: t, events }) if t == target => {
                events.insert(event.to_string(), enabled);
            }
            _ => {
                let mut events = BTreeMap::new();
                events.insert(event.to_string(), enabled);
                self.operations.push(Operation::Listen {
                    target: target.to_string(),
                    events,
                });
            }
        }
    }

    /// Append a method call. Calls close the open record and never merge.
    pub fn append_call(&mut self, target: &str, method: &str, arguments: PropertyMap) {
        self.operations.push(Operation::Call {
            target: target.to_string(),
            method: method.to_string(),
            arguments,
        });
    }

    pub fn append_destroy(&mut self, target: &str) {
        self.operations.push(Operation::Destroy {
            target: target.to_string(),
        });
    }

    pub fn append_execute_script(&mut self, target: &str, script_type: &str, script: &str) {
        self.operations.push(Operation::ExecuteScript {
            target: target.to_string(),
            script_type: script_type.to_string(),
            script: script.to_string(),
        });
    }

    /// Append an already-built operation, applying the same merge rules.
    pub fn append(&mut self, operation: Operation) {
        match operation {
            Operation::Set { target, properties } => {
                for (name, value) in properties {
                    self.append_set(&target, &name, value);
                }
            }
            Operation::Listen { target, events } => {
                for (event, enabled) in events {
                    self.append_listen(&target, &event, enabled);
                }
            }
            other => self.operations.push(other),
        }
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Finalize into an immutable message. Consumes the writer, so a message
    /// can only be produced once per cycle.
    pub fn finish(self) -> Message {
        Message::new(self.head, self.operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_absorbs_trailing_set() {
        let mut writer = MessageWriter::new();
        writer.append_create("w1", "ui.Shell");
        writer.append_set("w1", "foo", PropertyValue::Int(23));

        let message = writer.finish();
        assert_eq!(message.operation_count(), 1);
        let create = message.find_create("w1").unwrap();
        assert_eq!(create.property("foo"), Some(&PropertyValue::Int(23)));
    }

    #[test]
    fn style_property_folds_into_create_styles() {
        let mut writer = MessageWriter::new();
        writer.append_create("w1", "ui.Button");
        writer.append_set(
            "w1",
            STYLE_PROPERTY,
            PropertyValue::StrList(vec!["PUSH".to_string(), "BORDER".to_string()]),
        );

        let message = writer.finish();
        match message.find_create("w1").unwrap() {
            Operation::Create { styles, properties, .. } => {
                assert_eq!(styles, &["PUSH".to_string(), "BORDER".to_string()]);
                assert!(properties.is_empty());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn consecutive_sets_merge_last_write_wins() {
        let mut writer = MessageWriter::new();
        writer.append_set("w1", "x", PropertyValue::Int(1));
        writer.append_set("w1", "x", PropertyValue::Int(2));
        writer.append_set("w1", "y", PropertyValue::Int(3));

        let message = writer.finish();
        assert_eq!(message.operation_count(), 1);
        assert_eq!(message.find_set_property("w1", "x"), Some(&PropertyValue::Int(2)));
        assert_eq!(message.find_set_property("w1", "y"), Some(&PropertyValue::Int(3)));
    }

    #[test]
    fn set_for_other_target_closes_open_record() {
        let mut writer = MessageWriter::new();
        writer.append_set("w1", "x", PropertyValue::Int(1));
        writer.append_set("w2", "x", PropertyValue::Int(2));
        writer.append_set("w1", "y", PropertyValue::Int(3));

        assert_eq!(writer.operation_count(), 3);
    }

    #[test]
    fn call_never_merges() {
        let mut writer = MessageWriter::new();
        writer.append_call("w1", "method", PropertyMap::new());
        writer.append_call("w1", "method", PropertyMap::new());

        let message = writer.finish();
        assert_eq!(message.calls_for("w1").len(), 2);
    }

    #[test]
    fn listen_merges_into_open_listen_record() {
        let mut writer = MessageWriter::new();
        writer.append_listen("w1", "selection", false);
        writer.append_listen("w1", "fake", false);
        writer.append_listen("w1", "fake2", true);

        let message = writer.finish();
        assert_eq!(message.operation_count(), 1);
        assert_eq!(message.find_listen_property("w1", "selection"), Some(false));
        assert_eq!(message.find_listen_property("w1", "fake"), Some(false));
        assert_eq!(message.find_listen_property("w1", "fake2"), Some(true));
    }
}
