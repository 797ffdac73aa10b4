//! Dynamic schemas for cache configuration requests.
//!
//! A configuration body is `[i16 count]` followed by one
//! `[i16 code][value]` entry per property, in the order the caller
//! supplied them.

use crate::error::{IgniteError, Result};
use crate::protocol::{Request, Schema};
use crate::serialization::{DataInput, ObjectDataInput, TypeDescriptor, Value};

use super::properties::CacheProperty;

/// Property codes mapped to values, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(i16, Value)>,
}

impl PropertyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property. Replacing an existing code keeps its position.
    pub fn insert(&mut self, code: impl Into<i16>, value: impl Into<Value>) -> &mut Self {
        let code = code.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == code) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((code, value)),
        }
        self
    }

    /// Sets a property, builder style.
    pub fn with(mut self, code: impl Into<i16>, value: impl Into<Value>) -> Self {
        self.insert(code, value);
        self
    }

    /// Returns the value of a property.
    pub fn get(&self, code: impl Into<i16>) -> Option<&Value> {
        let code = code.into();
        self.entries
            .iter()
            .find(|(existing, _)| *existing == code)
            .map(|(_, value)| value)
    }

    /// Returns true if the property is set.
    pub fn contains(&self, code: impl Into<i16>) -> bool {
        self.get(code).is_some()
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no property is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(code, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (i16, &Value)> {
        self.entries.iter().map(|(code, value)| (*code, value))
    }
}

impl<C: Into<i16>, V: Into<Value>> FromIterator<(C, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (code, value) in iter {
            map.insert(code, value);
        }
        map
    }
}

/// Schema and values of a configuration body built from a [`PropertyMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSchema {
    schema: Schema,
    values: Vec<Value>,
}

impl ConfigSchema {
    /// Returns the body schema: `param_count` then one field per property.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the values, one per schema field.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Builds a configuration request carrying this body.
    pub fn into_request(self, op_code: i16) -> Request {
        self.schema
            .fields()
            .zip(self.values)
            .fold(Request::config(op_code), |request, (field, value)| {
                request.field(field.name().to_string(), field.ty(), value)
            })
    }
}

/// Builds the ordered, typed body of a configuration request.
///
/// Fails with [`IgniteError::UnknownProperty`] for codes absent from the
/// property table.
pub fn build_config_schema(properties: &PropertyMap) -> Result<ConfigSchema> {
    let count = i16::try_from(properties.len()).map_err(|_| {
        IgniteError::Configuration(format!("too many properties: {}", properties.len()))
    })?;

    let mut schema = Schema::empty().with("param_count", TypeDescriptor::Short);
    let mut values = Vec::with_capacity(properties.len() + 1);
    values.push(Value::Short(count));

    for (index, (code, value)) in properties.iter().enumerate() {
        let property = CacheProperty::from_code(code)?;
        schema = schema.with(format!("property_{}", index), property.descriptor());
        values.push(value.clone());
    }
    Ok(ConfigSchema { schema, values })
}

/// Builds a cache creation request; the name property is mandatory.
pub fn create_cache_request(op_code: i16, properties: &PropertyMap) -> Result<Request> {
    match properties.get(CacheProperty::Name) {
        Some(Value::String(_)) => {}
        Some(other) => {
            return Err(IgniteError::Configuration(format!(
                "cache name must be a string, not {}",
                other.kind()
            )))
        }
        None => {
            return Err(IgniteError::Configuration(
                "cache configuration must include the name property".to_string(),
            ))
        }
    }
    Ok(build_config_schema(properties)?.into_request(op_code))
}

/// Reads a configuration request without knowing its properties up front.
///
/// Returns the op code, query id and the properties in wire order.
pub fn decode_config_properties(bytes: &[u8]) -> Result<(i16, i64, PropertyMap)> {
    let mut input = ObjectDataInput::new(bytes);
    let length = input.read_len()?;
    if length != input.remaining() {
        return Err(IgniteError::Decode(format!(
            "frame length {} does not match {} received bytes",
            length,
            input.remaining()
        )));
    }
    let op_code = input.read_short()?;
    let query_id = input.read_long()?;
    let config_len = input.read_len()?;
    if config_len != input.remaining() {
        return Err(IgniteError::Decode(format!(
            "configuration length {} does not match {} remaining bytes",
            config_len,
            input.remaining()
        )));
    }

    let count = input.read_short()?;
    let mut properties = PropertyMap::new();
    for _ in 0..count {
        let code = input.read_short()?;
        let value = CacheProperty::from_code(code)?.value_type().read(&mut input)?;
        properties.insert(code, value);
    }
    if input.remaining() != 0 {
        return Err(IgniteError::Decode(format!(
            "{} trailing bytes after {} properties",
            input.remaining(),
            count
        )));
    }
    Ok((op_code, query_id, properties))
}
