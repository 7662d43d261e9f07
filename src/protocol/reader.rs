//! Inbound client message parsing.
//!
//! The client sends the symmetric half of the protocol: property writes,
//! event notifications, and method calls. Parsing is all-or-nothing; a
//! malformed record fails the whole message with a diagnosable error before
//! any widget state is touched.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::value::{PropertyMap, PropertyValue, UnsupportedValue};

/// One client-originated operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientOperation {
    /// Property writes originating from the client renderer.
    Set { target: String, properties: PropertyMap },
    /// An event occurred on the client, with named parameters.
    Notify {
        target: String,
        event: String,
        properties: PropertyMap,
    },
    /// The client invokes a server-side method.
    Call {
        target: String,
        method: String,
        arguments: PropertyMap,
    },
}

impl ClientOperation {
    pub fn target(&self) -> &str {
        match self {
            ClientOperation::Set { target, .. }
            | ClientOperation::Notify { target, .. }
            | ClientOperation::Call { target, .. } => target,
        }
    }
}

/// A fully parsed inbound message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientMessage {
    pub operations: Vec<ClientOperation>,
}

/// Errors raised while parsing an inbound message.
#[derive(Debug, Error)]
pub enum ProtocolParseError {
    #[error("invalid JSON in client message: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("client message is not a JSON object")]
    NotAnObject,

    #[error("operation {index} is not a JSON object")]
    MalformedOperation { index: usize },

    #[error("operation {index}: missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("operation {index}: unknown action '{action}'")]
    UnknownAction { index: usize, action: String },

    #[error("operation {index}, field '{field}': {source}")]
    UnsupportedValue {
        index: usize,
        field: String,
        #[source]
        source: UnsupportedValue,
    },

    #[error("client message exceeds the operation limit ({limit})")]
    TooManyOperations { limit: usize },
}

impl ClientMessage {
    /// Parse a raw inbound message, enforcing the configured operation limit.
    pub fn parse(raw: &str, max_operations: usize) -> Result<Self, ProtocolParseError> {
        let json: Value = serde_json::from_str(raw).map_err(ProtocolParseError::InvalidJson)?;
        let root = json.as_object().ok_or(ProtocolParseError::NotAnObject)?;

        let records = match root.get("operations") {
            Some(Value::Array(records)) => records.as_slice(),
            Some(_) => return Err(ProtocolParseError::NotAnObject),
            None => &[],
        };
        if records.len() > max_operations {
            return Err(ProtocolParseError::TooManyOperations { limit: max_operations });
        }

        let mut operations = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            operations.push(parse_operation(index, record)?);
        }
        Ok(ClientMessage { operations })
    }
}

fn parse_operation(index: usize, record: &Value) -> Result<ClientOperation, ProtocolParseError> {
    let record = record
        .as_object()
        .ok_or(ProtocolParseError::MalformedOperation { index })?;
    let target = required_string(index, record, "target")?;
    let action = required_string(index, record, "action")?;

    match action.as_str() {
        "set" => Ok(ClientOperation::Set {
            target,
            properties: parse_properties(index, record.get("properties"))?,
        }),
        "notify" => Ok(ClientOperation::Notify {
            target,
            event: required_string(index, record, "event")?,
            properties: parse_properties(index, record.get("properties"))?,
        }),
        "call" => Ok(ClientOperation::Call {
            target,
            method: required_string(index, record, "method")?,
            arguments: parse_properties(index, record.get("properties"))?,
        }),
        _ => Err(ProtocolParseError::UnknownAction { index, action }),
    }
}

fn required_string(
    index: usize,
    record: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, ProtocolParseError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ProtocolParseError::MissingField { index, field })
}

fn parse_properties(
    index: usize,
    value: Option<&Value>,
) -> Result<PropertyMap, ProtocolParseError> {
    let mut properties = PropertyMap::new();
    let Some(value) = value else {
        return Ok(properties);
    };
    let object = value
        .as_object()
        .ok_or(ProtocolParseError::MalformedOperation { index })?;
    for (name, raw) in object {
        let parsed = PropertyValue::from_json(raw).map_err(|source| {
            ProtocolParseError::UnsupportedValue {
                index,
                field: name.clone(),
                source,
            }
        })?;
        properties.insert(name.clone(), parsed);
    }
    Ok(properties)
}
