//! Cache proxy and the response field conversions it shares with the client.

mod cache;

pub use cache::{Cache, CacheOptions};

use ignite_core::serialization::{Record, Value};
use ignite_core::{IgniteError, Result};

/// Removes a response field, failing if the body does not carry it.
pub(crate) fn take_field(record: &mut Record, name: &str) -> Result<Value> {
    record
        .take(name)
        .ok_or_else(|| IgniteError::Decode(format!("response has no '{}' field", name)))
}

pub(crate) fn into_bool(value: Value) -> Result<bool> {
    match value {
        Value::Bool(v) => Ok(v),
        other => Err(IgniteError::Decode(format!(
            "expected Bool, found {}",
            other.kind()
        ))),
    }
}

pub(crate) fn into_long(value: Value) -> Result<i64> {
    match value {
        Value::Long(v) => Ok(v),
        other => Err(IgniteError::Decode(format!(
            "expected Long, found {}",
            other.kind()
        ))),
    }
}

pub(crate) fn into_entries(value: Value) -> Result<Vec<(Value, Value)>> {
    match value {
        Value::Map(entries) => Ok(entries),
        Value::Null => Ok(Vec::new()),
        other => Err(IgniteError::Decode(format!(
            "expected Map, found {}",
            other.kind()
        ))),
    }
}
