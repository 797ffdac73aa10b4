//! Native values carried by the Ignite binary protocol.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{IgniteError, Result};
use crate::hash;

/// A value that can be written to or read from an Ignite message.
///
/// Every variant has exactly one wire encoding when written as an "any"
/// value, so the variant doubles as the type hint: `Value::Short(5)` is sent
/// as a short, `Value::Int(5)` as an int.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    Byte(i8),
    /// Signed 16-bit integer.
    Short(i16),
    /// Signed 32-bit integer.
    Int(i32),
    /// Signed 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Character from the Basic Multilingual Plane.
    Char(char),
    /// UTF-8 text.
    String(String),
    /// UUID.
    Uuid(Uuid),
    /// Date with millisecond precision.
    Date(DateTime<Utc>),
    /// Timestamp with nanosecond precision.
    Timestamp(DateTime<Utc>),
    /// Time of day with millisecond precision.
    Time(NaiveTime),
    /// Decimal number; also carries integers too wide for `Long`.
    Decimal(Decimal),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Key/value pairs in insertion order.
    Map(Vec<(Value, Value)>),
    /// Enum constant.
    Enum(BinaryEnum),
    /// Binary object.
    Object(BinaryObject),
    /// Fixed-layout structure decoded from a declared struct schema.
    Struct(Record),
}

impl Value {
    /// Resolves an integer of unknown width to the narrowest lossless variant.
    ///
    /// `Int` when it fits 32 bits, `Long` when it fits 64 bits, `Decimal`
    /// when it fits the 96-bit decimal mantissa, otherwise an encode error.
    pub fn from_integer(v: i128) -> Result<Value> {
        if let Ok(v) = i32::try_from(v) {
            return Ok(Value::Int(v));
        }
        if let Ok(v) = i64::try_from(v) {
            return Ok(Value::Long(v));
        }
        Decimal::try_from_i128_with_scale(v, 0)
            .map(Value::Decimal)
            .map_err(|_| IgniteError::Encode(format!("integer {} overflows every wire type", v)))
    }

    /// Returns a short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::Time(_) => "time",
            Value::Decimal(_) => "decimal",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Enum(_) => "enum",
            Value::Object(_) => "object",
            Value::Struct(_) => "struct",
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any integral variant widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any floating point variant widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the entries, if this is a `Map`.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the structure, if this is a `Struct`.
    pub fn as_struct(&self) -> Option<&Record> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the binary object, if this is an `Object`.
    pub fn as_object(&self) -> Option<&BinaryObject> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        match i32::try_from(v) {
            Ok(narrow) => Value::Int(narrow),
            Err(_) => Value::Long(v),
        }
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::from(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Value::from(v),
            Err(_) => Value::Decimal(Decimal::from(v)),
        }
    }
}

impl TryFrom<i128> for Value {
    type Error = IgniteError;

    fn try_from(v: i128) -> Result<Self> {
        Value::from_integer(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<BinaryObject> for Value {
    fn from(v: BinaryObject) -> Self {
        Value::Object(v)
    }
}

impl From<BinaryEnum> for Value {
    fn from(v: BinaryEnum) -> Self {
        Value::Enum(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Struct(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(v: BTreeMap<K, V>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>, S> From<HashMap<K, V, S>> for Value {
    fn from(v: HashMap<K, V, S>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// An ordered list of named values decoded from a fixed layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Appends a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value.into());
        self
    }

    /// Returns the value of the first field with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Removes and returns the first field with the given name.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(field, _)| field == name)?;
        Some(self.fields.remove(index).1)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }
}

impl<N: Into<String>> FromIterator<(N, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// An enum constant identified by its binary type id and ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryEnum {
    /// Binary type id of the enum class.
    pub type_id: i32,
    /// Ordinal of the constant.
    pub ordinal: i32,
}

impl BinaryEnum {
    /// Creates an enum constant for the named enum type.
    pub fn new(type_name: &str, ordinal: i32) -> Self {
        Self {
            type_id: hash::type_id(type_name),
            ordinal,
        }
    }
}

/// A schema-tagged structured value.
///
/// Fields are identified by the hash of their lowercased name; the schema id
/// sent on the wire is derived from the field ids in order.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryObject {
    type_id: i32,
    fields: Vec<(i32, Value)>,
}

impl BinaryObject {
    /// Creates an empty object of the named type.
    pub fn new(type_name: &str) -> Self {
        Self::with_type_id(hash::type_id(type_name))
    }

    /// Creates an empty object with an explicit type id.
    pub fn with_type_id(type_id: i32) -> Self {
        Self {
            type_id,
            fields: Vec::new(),
        }
    }

    /// Adds a named field.
    pub fn with_field(self, name: &str, value: impl Into<Value>) -> Self {
        self.with_field_id(hash::field_id(name), value)
    }

    /// Adds a field by its id.
    pub fn with_field_id(mut self, field_id: i32, value: impl Into<Value>) -> Self {
        self.fields.push((field_id, value.into()));
        self
    }

    /// Returns the binary type id.
    pub fn type_id(&self) -> i32 {
        self.type_id
    }

    /// Returns the schema id derived from the field ids.
    pub fn schema_id(&self) -> i32 {
        let ids: Vec<i32> = self.fields.iter().map(|(id, _)| *id).collect();
        hash::schema_id(&ids)
    }

    /// Returns the value of the named field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let id = hash::field_id(name);
        self.fields
            .iter()
            .find(|(field_id, _)| *field_id == id)
            .map(|(_, value)| value)
    }

    /// Returns `(field id, value)` pairs in write order.
    pub fn fields(&self) -> &[(i32, Value)] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_ladder() {
        assert_eq!(Value::from_integer(42).unwrap(), Value::Int(42));
        assert_eq!(
            Value::from_integer(i128::from(i32::MAX) + 1).unwrap(),
            Value::Long(i64::from(i32::MAX) + 1)
        );
        let wide = i128::from(i64::MAX) * 4;
        assert_eq!(
            Value::from_integer(wide).unwrap(),
            Value::Decimal(Decimal::from_i128_with_scale(wide, 0))
        );
        assert!(matches!(
            Value::from_integer(i128::MAX),
            Err(IgniteError::Encode(_))
        ));
    }

    #[test]
    fn test_native_conversions() {
        assert_eq!(Value::from(42i64), Value::Int(42));
        assert_eq!(Value::from(i64::MAX), Value::Long(i64::MAX));
        assert_eq!(Value::from(7i16), Value::Short(7));
        assert_eq!(Value::from(u64::MAX), Value::Decimal(Decimal::from(u64::MAX)));
        assert_eq!(Value::from("k"), Value::String("k".into()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            Value::from(BTreeMap::from([("a", 1)])),
            Value::Map(vec![(Value::from("a"), Value::Int(1))])
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Short(3).as_i64(), Some(3));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Int(1).as_str(), None);
        assert_eq!(Value::Map(vec![]).kind(), "map");
    }

    #[test]
    fn test_record_lookup() {
        let mut record = Record::new().with("a", 1).with("b", "two");
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("b"), Some(&Value::from("two")));
        assert_eq!(record.get("c"), None);
        assert_eq!(record.take("a"), Some(Value::Int(1)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_binary_object_fields() {
        let person = BinaryObject::new("Person")
            .with_field("name", "Ann")
            .with_field("age", 30);
        assert_eq!(person.type_id(), hash::type_id("person"));
        assert_eq!(person.field("NAME"), Some(&Value::from("Ann")));
        assert_eq!(person.field("missing"), None);
        assert_eq!(person.schema_id(), 1946200325);
    }
}
