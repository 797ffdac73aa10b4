//! Conversions between JSON documents and wire values.
//!
//! JSON has no type hints, so numbers follow the same ladder as native
//! integers: `Int` when they fit 32 bits, then `Long`, then `Decimal`.
//! Non-integral numbers become `Double`.

use rust_decimal::prelude::ToPrimitive;

use crate::error::{IgniteError, Result};

use super::value::Value;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Value::from(v)
                } else if let Some(v) = n.as_u64() {
                    Value::from(v)
                } else {
                    Value::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(v) => Value::String(v),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (Value::String(key), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Converts the value to a JSON document.
    ///
    /// Maps need string keys. Binary objects, enums, raw bytes and
    /// structs have no JSON form other than their fields, so structs become
    /// objects, bytes become arrays of numbers and the rest are rejected.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        use serde_json::Value as Json;

        Ok(match self {
            Value::Null => Json::Null,
            Value::Bool(v) => Json::Bool(*v),
            Value::Byte(v) => Json::from(*v),
            Value::Short(v) => Json::from(*v),
            Value::Int(v) => Json::from(*v),
            Value::Long(v) => Json::from(*v),
            Value::Float(v) => finite(f64::from(*v))?,
            Value::Double(v) => finite(*v)?,
            Value::Char(v) => Json::String(v.to_string()),
            Value::String(v) => Json::String(v.clone()),
            Value::Uuid(v) => Json::String(v.to_string()),
            Value::Date(v) | Value::Timestamp(v) => Json::String(v.to_rfc3339()),
            Value::Time(v) => Json::String(v.to_string()),
            Value::Decimal(v) => match (v.is_integer(), v.to_i64()) {
                (true, Some(i)) => Json::from(i),
                _ => Json::String(v.to_string()),
            },
            Value::Bytes(v) => Json::Array(v.iter().map(|b| Json::from(*b)).collect()),
            Value::Array(items) => {
                Json::Array(items.iter().map(Value::to_json).collect::<Result<_>>()?)
            }
            Value::Map(entries) => {
                let mut object = serde_json::Map::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = key.as_str().ok_or_else(|| {
                        IgniteError::Encode(format!("JSON object keys must be strings, not {}", key.kind()))
                    })?;
                    object.insert(key.to_string(), value.to_json()?);
                }
                Json::Object(object)
            }
            Value::Struct(record) => {
                let mut object = serde_json::Map::with_capacity(record.len());
                for (name, value) in record.iter() {
                    object.insert(name.to_string(), value.to_json()?);
                }
                Json::Object(object)
            }
            Value::Enum(_) | Value::Object(_) => {
                return Err(IgniteError::Encode(format!(
                    "{} values have no JSON form",
                    self.kind()
                )))
            }
        })
    }
}

fn finite(v: f64) -> Result<serde_json::Value> {
    serde_json::Number::from_f64(v)
        .map(serde_json::Value::Number)
        .ok_or_else(|| IgniteError::Encode(format!("{} has no JSON form", v)))
}
