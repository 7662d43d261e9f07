//! Outbound protocol operations.
//!
//! One operation is one atomic instruction to the client renderer. A message
//! is an ordered list of these records; order is significant and preserved.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::protocol::value::{map_to_json, PropertyMap, PropertyValue};

/// A single outbound operation record.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Instantiate an object of `object_type` on the client.
    ///
    /// Property writes and listener toggles issued before the first render
    /// fold into this record, so Create is always the first operation the
    /// client sees for an id.
    Create {
        target: String,
        object_type: String,
        properties: PropertyMap,
        styles: Vec<String>,
        listeners: BTreeMap<String, bool>,
    },
    /// Write one or more properties on an existing object.
    Set {
        target: String,
        properties: PropertyMap,
    },
    /// Toggle event notification for one or more event names.
    Listen {
        target: String,
        events: BTreeMap<String, bool>,
    },
    /// Invoke a method on the client object. Never merged.
    Call {
        target: String,
        method: String,
        arguments: PropertyMap,
    },
    /// Release the client object. Terminal for the id.
    Destroy { target: String },
    /// Run a script in the client context.
    ExecuteScript {
        target: String,
        script_type: String,
        script: String,
    },
}

impl Operation {
    /// The id of the object this operation addresses.
    pub fn target(&self) -> &str {
        match self {
            Operation::Create { target, .. }
            | Operation::Set { target, .. }
            | Operation::Listen { target, .. }
            | Operation::Call { target, .. }
            | Operation::Destroy { target }
            | Operation::ExecuteScript { target, .. } => target,
        }
    }

    /// The wire action tag for this operation.
    pub fn action(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "create",
            Operation::Set { .. } => "set",
            Operation::Listen { .. } => "listen",
            Operation::Call { .. } => "call",
            Operation::Destroy { .. } => "destroy",
            Operation::ExecuteScript { .. } => "executeScript",
        }
    }

    /// Render this operation into its JSON record form.
    pub fn to_json(&self) -> Value {
        let mut record = serde_json::Map::new();
        record.insert("target".to_string(), Value::String(self.target().to_string()));
        record.insert("action".to_string(), Value::String(self.action().to_string()));
        match self {
            Operation::Create {
                object_type,
                properties,
                styles,
                listeners,
                ..
            } => {
                record.insert("type".to_string(), Value::String(object_type.clone()));
                if !properties.is_empty() {
                    record.insert("properties".to_string(), map_to_json(properties));
                }
                if !styles.is_empty() {
                    let styles = styles.iter().cloned().map(Value::String).collect();
                    record.insert("styles".to_string(), Value::Array(styles));
                }
                if !listeners.is_empty() {
                    record.insert("listen".to_string(), bool_map_to_json(listeners));
                }
            }
            Operation::Set { properties, .. } => {
                record.insert("properties".to_string(), map_to_json(properties));
            }
            Operation::Listen { events, .. } => {
                record.insert("properties".to_string(), bool_map_to_json(events));
            }
            Operation::Call { method, arguments, .. } => {
                record.insert("method".to_string(), Value::String(method.clone()));
                if !arguments.is_empty() {
                    record.insert("properties".to_string(), map_to_json(arguments));
                }
            }
            Operation::Destroy { .. } => {}
            Operation::ExecuteScript {
                script_type, script, ..
            } => {
                record.insert("scriptType".to_string(), Value::String(script_type.clone()));
                record.insert("script".to_string(), Value::String(script.clone()));
            }
        }
        Value::Object(record)
    }

    /// Look up a property on a Create or Set record.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        match self {
            Operation::Create { properties, .. } | Operation::Set { properties, .. } => {
                properties.get(name)
            }
            Operation::Call { arguments, .. } => arguments.get(name),
            _ => None,
        }
    }
}

fn bool_map_to_json(map: &BTreeMap<String, bool>) -> Value {
    let entries = map.iter().map(|(name, on)| (name.clone(), Value::Bool(*on)));
    Value::Object(entries.collect())
}
