//! Declared wire types used by request and response schemas.

use crate::error::{IgniteError, Result};

use super::any::{char_to_unit, read_any, unit_to_char, write_any};
use super::data_output::wire_len;
use super::value::{Record, Value};
use super::{DataInput, DataOutput, ObjectDataInput, ObjectDataOutput, TypeCode};

/// A named field of a fixed struct layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructField {
    /// Field name; used to look the value up, never serialized.
    pub name: &'static str,
    /// Wire type of the field.
    pub ty: TypeDescriptor,
}

impl StructField {
    /// Creates a struct field.
    pub const fn new(name: &'static str, ty: TypeDescriptor) -> Self {
        Self { name, ty }
    }
}

/// How a schema field is laid out on the wire.
///
/// Primitive descriptors are written without a type code. `String`,
/// `StringArray` and `Any` are tagged; the container descriptors carry an
/// `i32` count in front of their elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeDescriptor {
    /// Boolean byte.
    Bool,
    /// `i8`.
    Byte,
    /// `i16`.
    Short,
    /// `i32`.
    Int,
    /// `i64`.
    Long,
    /// `f32`.
    Float,
    /// `f64`.
    Double,
    /// UTF-16 code unit.
    Char,
    /// `[i32 count][bytes]`.
    ByteArray,
    /// Tagged nullable string.
    String,
    /// Tagged nullable array of tagged strings.
    StringArray,
    /// Tagged value whose type is chosen at runtime.
    Any,
    /// `[i32 count]` followed by tagged values.
    AnyArray,
    /// `[i32 count]` followed by tagged key/value pairs.
    Map,
    /// Fields of a fixed layout, in order.
    Struct(&'static [StructField]),
    /// `[i32 count]` followed by structs of one layout.
    StructArray(&'static [StructField]),
    /// `[i16 code]` followed by the value of the property's type.
    Property {
        /// Property code written before the value.
        code: i16,
        /// Wire type of the property value.
        value: &'static TypeDescriptor,
    },
}

impl TypeDescriptor {
    /// Returns a short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TypeDescriptor::Bool => "Bool",
            TypeDescriptor::Byte => "Byte",
            TypeDescriptor::Short => "Short",
            TypeDescriptor::Int => "Int",
            TypeDescriptor::Long => "Long",
            TypeDescriptor::Float => "Float",
            TypeDescriptor::Double => "Double",
            TypeDescriptor::Char => "Char",
            TypeDescriptor::ByteArray => "ByteArray",
            TypeDescriptor::String => "String",
            TypeDescriptor::StringArray => "StringArray",
            TypeDescriptor::Any => "Any",
            TypeDescriptor::AnyArray => "AnyArray",
            TypeDescriptor::Map => "Map",
            TypeDescriptor::Struct(_) => "Struct",
            TypeDescriptor::StructArray(_) => "StructArray",
            TypeDescriptor::Property { .. } => "Property",
        }
    }

    /// Returns the type code identifying this wire type, if it has one.
    pub fn type_code(&self) -> Option<TypeCode> {
        match self {
            TypeDescriptor::Bool => Some(TypeCode::Bool),
            TypeDescriptor::Byte => Some(TypeCode::Byte),
            TypeDescriptor::Short => Some(TypeCode::Short),
            TypeDescriptor::Int => Some(TypeCode::Int),
            TypeDescriptor::Long => Some(TypeCode::Long),
            TypeDescriptor::Float => Some(TypeCode::Float),
            TypeDescriptor::Double => Some(TypeCode::Double),
            TypeDescriptor::Char => Some(TypeCode::Char),
            TypeDescriptor::ByteArray => Some(TypeCode::ByteArray),
            TypeDescriptor::String => Some(TypeCode::String),
            TypeDescriptor::StringArray => Some(TypeCode::StringArray),
            TypeDescriptor::Map => Some(TypeCode::Map),
            TypeDescriptor::Any
            | TypeDescriptor::AnyArray
            | TypeDescriptor::Struct(_)
            | TypeDescriptor::StructArray(_)
            | TypeDescriptor::Property { .. } => None,
        }
    }

    /// Returns true if values of this type start with a type code.
    pub fn is_tagged(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::String | TypeDescriptor::StringArray | TypeDescriptor::Any
        )
    }

    /// Encodes a single value.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut out = ObjectDataOutput::new();
        self.write(&mut out, value)?;
        Ok(out.into_bytes())
    }

    /// Decodes a single value, returning it with the number of bytes consumed.
    pub fn decode(&self, bytes: &[u8]) -> Result<(Value, usize)> {
        let mut input = ObjectDataInput::new(bytes);
        let value = self.read(&mut input)?;
        Ok((value, input.position()))
    }

    /// Writes a value in this wire type.
    pub fn write(&self, out: &mut ObjectDataOutput, value: &Value) -> Result<()> {
        match self {
            TypeDescriptor::Bool => match value {
                Value::Bool(v) => out.write_bool(*v),
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::Byte => out.write_byte(self.integral(value)?),
            TypeDescriptor::Short => out.write_short(self.integral(value)?),
            TypeDescriptor::Int => out.write_int(self.integral(value)?),
            TypeDescriptor::Long => out.write_long(self.integral(value)?),
            TypeDescriptor::Float => match value {
                Value::Float(v) => out.write_float(*v),
                Value::Double(v) if f64::from(*v as f32) == *v || v.is_nan() => {
                    out.write_float(*v as f32)
                }
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::Double => match value.as_f64() {
                Some(v) => out.write_double(v),
                None => Err(self.mismatch(value)),
            },
            TypeDescriptor::Char => match value {
                Value::Char(c) => out.write_char(char_to_unit(*c)?),
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::ByteArray => {
                let bytes = self.byte_array(value)?;
                out.write_int(wire_len(bytes.len())?)?;
                out.write_bytes(&bytes)
            }
            TypeDescriptor::String => match value {
                Value::String(_) | Value::Null => write_any(out, value),
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::StringArray => match value {
                Value::Null => write_any(out, value),
                Value::Array(items) => {
                    out.write_u8(TypeCode::StringArray.code())?;
                    out.write_int(wire_len(items.len())?)?;
                    items
                        .iter()
                        .try_for_each(|item| TypeDescriptor::String.write(out, item))
                }
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::Any => write_any(out, value),
            TypeDescriptor::AnyArray => match value {
                Value::Array(items) => {
                    out.write_int(wire_len(items.len())?)?;
                    items.iter().try_for_each(|item| write_any(out, item))
                }
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::Map => match value {
                Value::Map(entries) => {
                    out.write_int(wire_len(entries.len())?)?;
                    entries.iter().try_for_each(|(key, value)| {
                        write_any(out, key)?;
                        write_any(out, value)
                    })
                }
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::Struct(fields) => match value {
                Value::Struct(record) => write_struct(out, fields, record),
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::StructArray(fields) => match value {
                Value::Array(items) => {
                    out.write_int(wire_len(items.len())?)?;
                    for item in items {
                        match item {
                            Value::Struct(record) => write_struct(out, fields, record)?,
                            other => return Err(self.mismatch(other)),
                        }
                    }
                    Ok(())
                }
                other => Err(self.mismatch(other)),
            },
            TypeDescriptor::Property { code, value: ty } => {
                out.write_short(*code)?;
                ty.write(out, value)
            }
        }
    }

    /// Reads a value of this wire type.
    pub fn read(&self, input: &mut ObjectDataInput<'_>) -> Result<Value> {
        match self {
            TypeDescriptor::Bool => Ok(Value::Bool(input.read_bool()?)),
            TypeDescriptor::Byte => Ok(Value::Byte(input.read_byte()?)),
            TypeDescriptor::Short => Ok(Value::Short(input.read_short()?)),
            TypeDescriptor::Int => Ok(Value::Int(input.read_int()?)),
            TypeDescriptor::Long => Ok(Value::Long(input.read_long()?)),
            TypeDescriptor::Float => Ok(Value::Float(input.read_float()?)),
            TypeDescriptor::Double => Ok(Value::Double(input.read_double()?)),
            TypeDescriptor::Char => Ok(Value::Char(unit_to_char(input.read_char()?)?)),
            TypeDescriptor::ByteArray => {
                let len = input.read_len()?;
                Ok(Value::Bytes(input.read_bytes(len)?))
            }
            TypeDescriptor::String => {
                let code = input.read_u8()?;
                if code == TypeCode::Null.code() {
                    return Ok(Value::Null);
                }
                self.expect_code(code, TypeCode::String)?;
                Ok(Value::String(input.read_string()?))
            }
            TypeDescriptor::StringArray => {
                let code = input.read_u8()?;
                if code == TypeCode::Null.code() {
                    return Ok(Value::Null);
                }
                self.expect_code(code, TypeCode::StringArray)?;
                read_counted(input, |i| TypeDescriptor::String.read(i))
            }
            TypeDescriptor::Any => read_any(input),
            TypeDescriptor::AnyArray => read_counted(input, read_any),
            TypeDescriptor::Map => {
                let len = input.read_len()?;
                let mut entries = Vec::with_capacity(len.min(input.remaining()));
                for _ in 0..len {
                    let key = read_any(input)?;
                    let value = read_any(input)?;
                    entries.push((key, value));
                }
                Ok(Value::Map(entries))
            }
            TypeDescriptor::Struct(fields) => read_struct(input, fields),
            TypeDescriptor::StructArray(fields) => read_counted(input, |i| read_struct(i, fields)),
            TypeDescriptor::Property { code, value } => {
                let actual = input.read_short()?;
                if actual != *code {
                    return Err(IgniteError::Decode(format!(
                        "expected property code {}, found {}",
                        code, actual
                    )));
                }
                value.read(input)
            }
        }
    }

    fn mismatch(&self, value: &Value) -> IgniteError {
        IgniteError::Encode(format!("cannot write {} as {}", value.kind(), self.name()))
    }

    fn expect_code(&self, actual: u8, expected: TypeCode) -> Result<()> {
        if actual == expected.code() {
            Ok(())
        } else {
            Err(IgniteError::Decode(format!(
                "expected type code {} for {}, found {}",
                expected.code(),
                self.name(),
                actual
            )))
        }
    }

    fn integral<T: TryFrom<i64>>(&self, value: &Value) -> Result<T> {
        let wide = value.as_i64().ok_or_else(|| self.mismatch(value))?;
        T::try_from(wide).map_err(|_| {
            IgniteError::Encode(format!("{} overflows {}", wide, self.name()))
        })
    }

    fn byte_array(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Bytes(bytes) => Ok(bytes.clone()),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    let v = item.as_i64().ok_or_else(|| self.mismatch(item))?;
                    i8::try_from(v)
                        .map(|b| b as u8)
                        .or_else(|_| u8::try_from(v))
                        .map_err(|_| IgniteError::Encode(format!("{} overflows a byte", v)))
                })
                .collect(),
            other => Err(self.mismatch(other)),
        }
    }
}

fn write_struct(
    out: &mut ObjectDataOutput,
    fields: &[StructField],
    record: &Record,
) -> Result<()> {
    for field in fields {
        let value = record.get(field.name).ok_or_else(|| {
            IgniteError::Encode(format!("struct is missing field '{}'", field.name))
        })?;
        field.ty.write(out, value)?;
    }
    Ok(())
}

fn read_struct(input: &mut ObjectDataInput<'_>, fields: &[StructField]) -> Result<Value> {
    let mut record = Record::new();
    for field in fields {
        record.push(field.name, field.ty.read(input)?);
    }
    Ok(Value::Struct(record))
}

fn read_counted<F>(input: &mut ObjectDataInput<'_>, read: F) -> Result<Value>
where
    F: Fn(&mut ObjectDataInput<'_>) -> Result<Value>,
{
    let len = input.read_len()?;
    let mut items = Vec::with_capacity(len.min(input.remaining()));
    for _ in 0..len {
        items.push(read(input)?);
    }
    Ok(Value::Array(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    static PAIR: &[StructField] = &[
        StructField::new("name", TypeDescriptor::String),
        StructField::new("flag", TypeDescriptor::Bool),
    ];

    fn round_trip(ty: TypeDescriptor, value: Value) {
        let bytes = ty.encode(&value).unwrap();
        let (decoded, consumed) = ty.decode(&bytes).unwrap();
        assert_eq!(decoded, value, "{} round trip", ty.name());
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_primitives_are_untagged() {
        assert_eq!(TypeDescriptor::Int.encode(&Value::Int(1)).unwrap(), vec![1, 0, 0, 0]);
        assert_eq!(TypeDescriptor::Byte.encode(&Value::Int(1)).unwrap(), vec![1]);
        assert_eq!(TypeDescriptor::Short.encode(&Value::Int(2)).unwrap(), vec![2, 0]);
        assert_eq!(TypeDescriptor::Bool.encode(&Value::Bool(true)).unwrap(), vec![1]);
        assert_eq!(
            TypeDescriptor::ByteArray.encode(&Value::Bytes(vec![9])).unwrap(),
            vec![1, 0, 0, 0, 9]
        );
    }

    #[test]
    fn test_round_trips() {
        round_trip(TypeDescriptor::Bool, Value::Bool(true));
        round_trip(TypeDescriptor::Byte, Value::Byte(-3));
        round_trip(TypeDescriptor::Short, Value::Short(300));
        round_trip(TypeDescriptor::Int, Value::Int(i32::MIN));
        round_trip(TypeDescriptor::Long, Value::Long(i64::MAX));
        round_trip(TypeDescriptor::Float, Value::Float(0.5));
        round_trip(TypeDescriptor::Double, Value::Double(1e100));
        round_trip(TypeDescriptor::Char, Value::Char('z'));
        round_trip(TypeDescriptor::ByteArray, Value::Bytes(vec![1, 2, 3]));
        round_trip(TypeDescriptor::String, Value::from("cache"));
        round_trip(TypeDescriptor::String, Value::Null);
        round_trip(
            TypeDescriptor::StringArray,
            Value::Array(vec![Value::from("a"), Value::Null]),
        );
        round_trip(TypeDescriptor::Any, Value::from(vec![1, 2]));
        round_trip(
            TypeDescriptor::AnyArray,
            Value::Array(vec![Value::Int(1), Value::from("x")]),
        );
        round_trip(
            TypeDescriptor::Map,
            Value::Map(vec![(Value::from("k"), Value::Long(1 << 40))]),
        );
        round_trip(
            TypeDescriptor::Struct(PAIR),
            Value::Struct(Record::new().with("name", "n").with("flag", false)),
        );
        round_trip(
            TypeDescriptor::StructArray(PAIR),
            Value::Array(vec![Value::Struct(
                Record::new().with("name", Value::Null).with("flag", true),
            )]),
        );
    }

    #[test]
    fn test_null_string() {
        assert_eq!(TypeDescriptor::String.encode(&Value::Null).unwrap(), vec![101]);
        assert_eq!(
            TypeDescriptor::String.encode(&Value::from("ab")).unwrap(),
            vec![9, 2, 0, 0, 0, b'a', b'b']
        );
    }

    #[test]
    fn test_string_array_layout() {
        let bytes = TypeDescriptor::StringArray
            .encode(&Value::Array(vec![Value::from("a")]))
            .unwrap();
        assert_eq!(bytes, vec![20, 1, 0, 0, 0, 9, 1, 0, 0, 0, b'a']);
    }

    #[test]
    fn test_property_layout() {
        static INT: TypeDescriptor = TypeDescriptor::Int;
        let ty = TypeDescriptor::Property { code: 3, value: &INT };
        assert_eq!(ty.encode(&Value::Int(2)).unwrap(), vec![3, 0, 2, 0, 0, 0]);
        round_trip(ty, Value::Int(2));

        let wrong = [4, 0, 2, 0, 0, 0];
        assert!(matches!(ty.decode(&wrong), Err(IgniteError::Decode(_))));
    }

    #[test]
    fn test_integer_overflow_is_encode_error() {
        assert!(matches!(
            TypeDescriptor::Byte.encode(&Value::Int(300)),
            Err(IgniteError::Encode(_))
        ));
        assert!(matches!(
            TypeDescriptor::Int.encode(&Value::Long(1 << 40)),
            Err(IgniteError::Encode(_))
        ));
    }

    #[test]
    fn test_type_mismatch_is_encode_error() {
        assert!(matches!(
            TypeDescriptor::Int.encode(&Value::from("1")),
            Err(IgniteError::Encode(_))
        ));
        assert!(matches!(
            TypeDescriptor::Float.encode(&Value::Double(0.1)),
            Err(IgniteError::Encode(_))
        ));
        assert!(matches!(
            TypeDescriptor::Struct(PAIR).encode(&Value::Struct(Record::new().with("name", "x"))),
            Err(IgniteError::Encode(_))
        ));
    }

    #[test]
    fn test_byte_array_from_integers() {
        let bytes = TypeDescriptor::ByteArray
            .encode(&Value::from(vec![0, 2, 255]))
            .unwrap();
        assert_eq!(bytes, vec![3, 0, 0, 0, 0, 2, 255]);
    }

    #[test]
    fn test_wrong_tag_is_decode_error() {
        assert!(matches!(
            TypeDescriptor::String.decode(&[3, 1, 0, 0, 0]),
            Err(IgniteError::Decode(_))
        ));
    }

    #[test]
    fn test_truncated_input() {
        assert!(TypeDescriptor::Long.decode(&[1, 2, 3]).is_err());
        assert!(TypeDescriptor::AnyArray.decode(&[2, 0, 0, 0, 101]).is_err());
        assert!(TypeDescriptor::Map.decode(&[1, 0, 0, 0, 101]).is_err());
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(TypeDescriptor::Int.type_code(), Some(TypeCode::Int));
        assert_eq!(TypeDescriptor::Any.type_code(), None);
        assert!(TypeDescriptor::String.is_tagged());
        assert!(!TypeDescriptor::Long.is_tagged());
    }
}
