//! The finalized outbound message.
//!
//! A message is the complete ordered batch of operations produced by one
//! request cycle plus a small head map. It is immutable once built; the
//! writer hands one out exactly once per cycle.

use serde_json::Value;

use crate::protocol::operation::Operation;
use crate::protocol::value::{map_to_json, PropertyMap, PropertyValue};

/// Head key carrying the cycle counter.
pub const HEAD_REQUEST_COUNTER: &str = "requestCounter";
/// Head key present only when the cycle completed with a flagged failure.
pub const HEAD_ERROR: &str = "error";

/// An immutable, ordered outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    head: PropertyMap,
    operations: Vec<Operation>,
}

impl Message {
    pub(crate) fn new(head: PropertyMap, operations: Vec<Operation>) -> Self {
        Self { head, operations }
    }

    pub fn head(&self) -> &PropertyMap {
        &self.head
    }

    /// The cycle counter stamped into the head, if present.
    pub fn request_counter(&self) -> Option<i64> {
        self.head.get(HEAD_REQUEST_COUNTER).and_then(PropertyValue::as_int)
    }

    /// The error flag for a failed-but-completed cycle.
    ///
    /// Lets the client tell a failed cycle apart from a normal empty diff.
    pub fn error(&self) -> Option<&str> {
        self.head.get(HEAD_ERROR).and_then(PropertyValue::as_str)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// True when the cycle produced no operations and no error flag.
    pub fn is_empty_diff(&self) -> bool {
        self.operations.is_empty() && self.error().is_none()
    }

    /// Find the Create record for a target.
    pub fn find_create(&self, target: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|op| matches!(op, Operation::Create { .. }) && op.target() == target)
    }

    /// Position of the Create record for a target within the message.
    pub fn create_position(&self, target: &str) -> Option<usize> {
        self.operations
            .iter()
            .position(|op| matches!(op, Operation::Create { .. }) && op.target() == target)
    }

    /// Find a property in any Set record for a target.
    pub fn find_set_property(&self, target: &str, name: &str) -> Option<&PropertyValue> {
        self.operations.iter().rev().find_map(|op| match op {
            Operation::Set { target: t, properties } if t == target => properties.get(name),
            _ => None,
        })
    }

    /// Find a listener toggle in any Listen record for a target.
    pub fn find_listen_property(&self, target: &str, event: &str) -> Option<bool> {
        self.operations.iter().rev().find_map(|op| match op {
            Operation::Listen { target: t, events } if t == target => events.get(event).copied(),
            _ => None,
        })
    }

    /// All Call records for a target, in wire order.
    pub fn calls_for(&self, target: &str) -> Vec<&Operation> {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Call { .. }) && op.target() == target)
            .collect()
    }

    /// Whether the message destroys the given target.
    pub fn destroys(&self, target: &str) -> bool {
        self.operations
            .iter()
            .any(|op| matches!(op, Operation::Destroy { .. }) && op.target() == target)
    }

    /// Render the message into its JSON wire structure.
    pub fn to_json(&self) -> Value {
        let operations = self.operations.iter().map(Operation::to_json).collect();
        serde_json::json!({
            "head": map_to_json(&self.head),
            "operations": Value::Array(operations),
        })
    }

    /// Serialize for the transport layer.
    pub fn to_wire_string(&self, pretty: bool) -> String {
        let json = self.to_json();
        if pretty {
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        } else {
            json.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> Message {
        let mut head = PropertyMap::new();
        head.insert(HEAD_REQUEST_COUNTER.to_string(), PropertyValue::Int(7));
        let mut properties = PropertyMap::new();
        properties.insert("text".to_string(), PropertyValue::from("ok"));
        Message::new(
            head,
            vec![
                Operation::Create {
                    target: "w1".to_string(),
                    object_type: "ui.Shell".to_string(),
                    properties: PropertyMap::new(),
                    styles: Vec::new(),
                    listeners: BTreeMap::new(),
                },
                Operation::Set {
                    target: "w1".to_string(),
                    properties,
                },
            ],
        )
    }

    #[test]
    fn head_accessors() {
        let message = sample();
        assert_eq!(message.request_counter(), Some(7));
        assert_eq!(message.error(), None);
        assert!(!message.is_empty_diff());
    }

    #[test]
    fn lookup_helpers_find_records() {
        let message = sample();
        assert!(message.find_create("w1").is_some());
        assert_eq!(message.create_position("w1"), Some(0));
        assert_eq!(
            message.find_set_property("w1", "text"),
            Some(&PropertyValue::from("ok"))
        );
        assert_eq!(message.find_set_property("w1", "missing"), None);
        assert!(!message.destroys("w1"));
    }

    #[test]
    fn wire_string_is_valid_json() {
        let message = sample();
        let raw = message.to_wire_string(false);
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["head"]["requestCounter"], 7);
        assert_eq!(parsed["operations"][0]["action"], "create");
    }
}
