//! Wire property values.
//!
//! The protocol restricts property values to a closed set: strings, numbers
//! (integers and floats keep their distinct wire representation), booleans,
//! object references (rendered as the referenced id), and flat lists of
//! integers or strings. Anything richer belongs to the application layer.

use std::collections::BTreeMap;

use serde_json::Value;

/// Ordered property-name → value mapping used throughout the protocol.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A single property value as it appears on the wire.
///
/// Equality is semantic for value types (two `Int(3)` are equal regardless
/// of provenance) and identity-by-id for references.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Reference to another remote object, rendered as its id.
    Reference(String),
    IntList(Vec<i64>),
    StrList(Vec<String>),
}

impl PropertyValue {
    /// Render this value into its JSON wire form.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null => Value::Null,
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Int(i) => Value::from(*i),
            PropertyValue::Float(f) => Value::from(*f),
            PropertyValue::Str(s) => Value::String(s.clone()),
            PropertyValue::Reference(id) => Value::String(id.clone()),
            PropertyValue::IntList(items) => {
                Value::Array(items.iter().map(|i| Value::from(*i)).collect())
            }
            PropertyValue::StrList(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.clone())).collect())
            }
        }
    }

    /// Parse a JSON value from an inbound message.
    ///
    /// References cannot be distinguished from plain strings on the wire;
    /// inbound string values always parse as `Str`, and the application
    /// resolves ids where it expects a reference.
    pub fn from_json(value: &Value) -> Result<PropertyValue, UnsupportedValue> {
        match value {
            Value::Null => Ok(PropertyValue::Null),
            Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(PropertyValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(PropertyValue::Float(f))
                } else {
                    Err(UnsupportedValue::Number(n.to_string()))
                }
            }
            Value::String(s) => Ok(PropertyValue::Str(s.clone())),
            Value::Array(items) => Self::list_from_json(items),
            Value::Object(_) => Err(UnsupportedValue::Object),
        }
    }

    fn list_from_json(items: &[Value]) -> Result<PropertyValue, UnsupportedValue> {
        if items.iter().all(|v| v.as_i64().is_some()) {
            let ints = items.iter().filter_map(Value::as_i64).collect();
            return Ok(PropertyValue::IntList(ints));
        }
        if items.iter().all(Value::is_string) {
            let strings = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            return Ok(PropertyValue::StrList(strings));
        }
        Err(UnsupportedValue::MixedList)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            PropertyValue::Reference(id) => Some(id),
            _ => None,
        }
    }
}

/// A JSON value that has no representation in the property-value set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedValue {
    #[error("number '{0}' is out of range for the wire format")]
    Number(String),
    #[error("nested objects are not valid property values")]
    Object,
    #[error("lists must be all-integer or all-string")]
    MixedList,
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<Vec<i64>> for PropertyValue {
    fn from(value: Vec<i64>) -> Self {
        PropertyValue::IntList(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::StrList(value)
    }
}

/// Render a property map into a JSON object, preserving map order.
pub(crate) fn map_to_json(map: &PropertyMap) -> Value {
    let entries = map
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()));
    Value::Object(entries.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_and_float_keep_distinct_wire_forms() {
        assert_eq!(PropertyValue::Int(2).to_json().to_string(), "2");
        assert_eq!(PropertyValue::Float(3.5).to_json().to_string(), "3.5");
        assert_ne!(PropertyValue::Int(1), PropertyValue::Float(1.0));
    }

    #[test]
    fn reference_renders_as_id_string() {
        let value = PropertyValue::Reference("w42".to_string());
        assert_eq!(value.to_json(), Value::String("w42".to_string()));
    }

    #[test]
    fn from_json_round_trips_scalars() {
        let json = serde_json::json!(23);
        assert_eq!(PropertyValue::from_json(&json).unwrap(), PropertyValue::Int(23));
        let json = serde_json::json!(47.11);
        assert_eq!(
            PropertyValue::from_json(&json).unwrap(),
            PropertyValue::Float(47.11)
        );
        let json = serde_json::json!(true);
        assert_eq!(PropertyValue::from_json(&json).unwrap(), PropertyValue::Bool(true));
    }

    #[test]
    fn from_json_parses_homogeneous_lists() {
        let json = serde_json::json!([1, 2, 3]);
        assert_eq!(
            PropertyValue::from_json(&json).unwrap(),
            PropertyValue::IntList(vec![1, 2, 3])
        );
        let json = serde_json::json!(["PUSH", "BORDER"]);
        assert_eq!(
            PropertyValue::from_json(&json).unwrap(),
            PropertyValue::StrList(vec!["PUSH".to_string(), "BORDER".to_string()])
        );
    }

    #[test]
    fn from_json_rejects_mixed_lists_and_objects() {
        let json = serde_json::json!([1, "two"]);
        assert_eq!(
            PropertyValue::from_json(&json),
            Err(UnsupportedValue::MixedList)
        );
        let json = serde_json::json!({"nested": true});
        assert_eq!(PropertyValue::from_json(&json), Err(UnsupportedValue::Object));
    }
}
