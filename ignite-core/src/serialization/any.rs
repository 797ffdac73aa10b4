//! Self-describing ("any") values: a type code followed by the payload.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{IgniteError, Result};

use super::binary_object::{read_object, write_object};
use super::data_output::wire_len;
use super::type_code::{map_kind, OBJECT_ARRAY_TYPE_ID};
use super::value::{BinaryEnum, Value};
use super::{DataInput, DataOutput, ObjectDataInput, ObjectDataOutput, TypeCode};

const NANOS_PER_MILLI: u32 = 1_000_000;

/// Deepest nesting of arrays, maps and objects a decoded value may have.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Encodes a value with its type code prefix.
pub fn encode_any(value: &Value) -> Result<Vec<u8>> {
    let mut out = ObjectDataOutput::new();
    write_any(&mut out, value)?;
    Ok(out.into_bytes())
}

/// Decodes a tagged value, returning it with the number of bytes consumed.
pub fn decode_any(bytes: &[u8]) -> Result<(Value, usize)> {
    let mut input = ObjectDataInput::new(bytes);
    let value = read_any(&mut input)?;
    Ok((value, input.position()))
}

/// Writes a value with its type code prefix.
///
/// The wire type follows from the variant alone; see [`Value::from_integer`]
/// for how integers of unknown width pick their variant.
pub fn write_any(out: &mut ObjectDataOutput, value: &Value) -> Result<()> {
    match value {
        Value::Null => out.write_u8(TypeCode::Null.code()),
        Value::Bool(v) => {
            out.write_u8(TypeCode::Bool.code())?;
            out.write_bool(*v)
        }
        Value::Byte(v) => {
            out.write_u8(TypeCode::Byte.code())?;
            out.write_byte(*v)
        }
        Value::Short(v) => {
            out.write_u8(TypeCode::Short.code())?;
            out.write_short(*v)
        }
        Value::Int(v) => {
            out.write_u8(TypeCode::Int.code())?;
            out.write_int(*v)
        }
        Value::Long(v) => {
            out.write_u8(TypeCode::Long.code())?;
            out.write_long(*v)
        }
        Value::Float(v) => {
            out.write_u8(TypeCode::Float.code())?;
            out.write_float(*v)
        }
        Value::Double(v) => {
            out.write_u8(TypeCode::Double.code())?;
            out.write_double(*v)
        }
        Value::Char(v) => {
            out.write_u8(TypeCode::Char.code())?;
            out.write_char(char_to_unit(*v)?)
        }
        Value::String(v) => {
            out.write_u8(TypeCode::String.code())?;
            out.write_string(v)
        }
        Value::Uuid(v) => {
            out.write_u8(TypeCode::Uuid.code())?;
            let (most, least) = v.as_u64_pair();
            out.write_long(most as i64)?;
            out.write_long(least as i64)
        }
        Value::Date(v) => {
            out.write_u8(TypeCode::Date.code())?;
            out.write_long(whole_millis(v)?)
        }
        Value::Timestamp(v) => {
            out.write_u8(TypeCode::Timestamp.code())?;
            out.write_long(v.timestamp_millis())?;
            out.write_int((v.timestamp_subsec_nanos() % NANOS_PER_MILLI) as i32)
        }
        Value::Time(v) => {
            out.write_u8(TypeCode::Time.code())?;
            if v.nanosecond() % NANOS_PER_MILLI != 0 {
                return Err(IgniteError::Encode(format!(
                    "time {} has sub-millisecond precision",
                    v
                )));
            }
            let millis = i64::from(v.num_seconds_from_midnight()) * 1000
                + i64::from(v.nanosecond() / NANOS_PER_MILLI);
            out.write_long(millis)
        }
        Value::Decimal(v) => {
            out.write_u8(TypeCode::Decimal.code())?;
            write_decimal(out, v)
        }
        Value::Bytes(v) => {
            out.write_u8(TypeCode::ByteArray.code())?;
            out.write_int(wire_len(v.len())?)?;
            out.write_bytes(v)
        }
        Value::Array(items) => {
            out.write_u8(TypeCode::ObjectArray.code())?;
            out.write_int(OBJECT_ARRAY_TYPE_ID)?;
            out.write_int(wire_len(items.len())?)?;
            items.iter().try_for_each(|item| write_any(out, item))
        }
        Value::Map(entries) => {
            out.write_u8(TypeCode::Map.code())?;
            out.write_int(wire_len(entries.len())?)?;
            out.write_byte(map_kind::LINKED_HASH_MAP)?;
            entries.iter().try_for_each(|(key, value)| {
                write_any(out, key)?;
                write_any(out, value)
            })
        }
        Value::Enum(v) => {
            out.write_u8(TypeCode::Enum.code())?;
            out.write_int(v.type_id)?;
            out.write_int(v.ordinal)
        }
        Value::Object(v) => write_object(out, v),
        Value::Struct(_) => Err(IgniteError::Encode(
            "struct values have no self-describing encoding; declare a struct type".to_string(),
        )),
    }
}

/// Reads a tagged value.
///
/// Values nested deeper than [`MAX_NESTING_DEPTH`] fail with
/// [`IgniteError::Decode`].
pub fn read_any(input: &mut ObjectDataInput<'_>) -> Result<Value> {
    read_any_at(input, 0)
}

pub(crate) fn read_any_at(input: &mut ObjectDataInput<'_>, depth: usize) -> Result<Value> {
    if depth > MAX_NESTING_DEPTH {
        return Err(IgniteError::Decode(format!(
            "value nesting exceeds {} levels",
            MAX_NESTING_DEPTH
        )));
    }
    let code = TypeCode::try_from(input.read_u8()?)?;
    let value = match code {
        TypeCode::Null => Value::Null,
        TypeCode::Bool => Value::Bool(input.read_bool()?),
        TypeCode::Byte => Value::Byte(input.read_byte()?),
        TypeCode::Short => Value::Short(input.read_short()?),
        TypeCode::Int => Value::Int(input.read_int()?),
        TypeCode::Long => Value::Long(input.read_long()?),
        TypeCode::Float => Value::Float(input.read_float()?),
        TypeCode::Double => Value::Double(input.read_double()?),
        TypeCode::Char => Value::Char(unit_to_char(input.read_char()?)?),
        TypeCode::String => Value::String(input.read_string()?),
        TypeCode::Uuid => {
            let most = input.read_long()? as u64;
            let least = input.read_long()? as u64;
            Value::Uuid(Uuid::from_u64_pair(most, least))
        }
        TypeCode::Date => Value::Date(datetime(input.read_long()?, 0)?),
        TypeCode::Timestamp => {
            let millis = input.read_long()?;
            let nanos = input.read_int()?;
            let nanos = u32::try_from(nanos)
                .ok()
                .filter(|n| *n < NANOS_PER_MILLI)
                .ok_or_else(|| {
                    IgniteError::Decode(format!("timestamp nanos out of range: {}", nanos))
                })?;
            Value::Timestamp(datetime(millis, nanos)?)
        }
        TypeCode::Time => Value::Time(time_of_day(input.read_long()?)?),
        TypeCode::Decimal => Value::Decimal(read_decimal(input)?),
        TypeCode::ByteArray => {
            let len = input.read_len()?;
            Value::Bytes(input.read_bytes(len)?)
        }
        TypeCode::ShortArray => read_primitive_array(input, |i| Ok(Value::Short(i.read_short()?)))?,
        TypeCode::IntArray => read_primitive_array(input, |i| Ok(Value::Int(i.read_int()?)))?,
        TypeCode::LongArray => read_primitive_array(input, |i| Ok(Value::Long(i.read_long()?)))?,
        TypeCode::FloatArray => read_primitive_array(input, |i| Ok(Value::Float(i.read_float()?)))?,
        TypeCode::DoubleArray => {
            read_primitive_array(input, |i| Ok(Value::Double(i.read_double()?)))?
        }
        TypeCode::CharArray => {
            read_primitive_array(input, |i| Ok(Value::Char(unit_to_char(i.read_char()?)?)))?
        }
        TypeCode::BoolArray => read_primitive_array(input, |i| Ok(Value::Bool(i.read_bool()?)))?,
        TypeCode::StringArray
        | TypeCode::UuidArray
        | TypeCode::DateArray
        | TypeCode::DecimalArray
        | TypeCode::TimestampArray
        | TypeCode::TimeArray => {
            let len = input.read_len()?;
            read_items(input, len, depth + 1)?
        }
        TypeCode::ObjectArray | TypeCode::EnumArray => {
            let _component_type_id = input.read_int()?;
            let len = input.read_len()?;
            read_items(input, len, depth + 1)?
        }
        TypeCode::Collection => {
            let len = input.read_len()?;
            let _kind = input.read_byte()?;
            read_items(input, len, depth + 1)?
        }
        TypeCode::Map => {
            let len = input.read_len()?;
            let _kind = input.read_byte()?;
            let mut entries = Vec::with_capacity(len.min(input.remaining()));
            for _ in 0..len {
                let key = read_any_at(input, depth + 1)?;
                let value = read_any_at(input, depth + 1)?;
                entries.push((key, value));
            }
            Value::Map(entries)
        }
        TypeCode::Enum | TypeCode::BinaryEnum => {
            let type_id = input.read_int()?;
            if type_id == 0 {
                return Err(IgniteError::Decode(
                    "enums of unregistered types are not supported".to_string(),
                ));
            }
            let ordinal = input.read_int()?;
            Value::Enum(BinaryEnum { type_id, ordinal })
        }
        TypeCode::WrappedBinaryObject => {
            let len = input.read_len()?;
            let payload = input.read_bytes(len)?;
            let offset = input.read_int()?;
            let offset = usize::try_from(offset)
                .ok()
                .filter(|o| *o < payload.len())
                .ok_or_else(|| {
                    IgniteError::Decode(format!("wrapped object offset out of range: {}", offset))
                })?;
            let mut inner = ObjectDataInput::new(&payload[offset..]);
            read_any_at(&mut inner, depth + 1)?
        }
        TypeCode::ComplexObject => Value::Object(read_object(input, depth)?),
    };
    Ok(value)
}

fn read_primitive_array<F>(input: &mut ObjectDataInput<'_>, read: F) -> Result<Value>
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

fn read_items(input: &mut ObjectDataInput<'_>, len: usize, depth: usize) -> Result<Value> {
    let mut items = Vec::with_capacity(len.min(input.remaining()));
    for _ in 0..len {
        items.push(read_any_at(input, depth)?);
    }
    Ok(Value::Array(items))
}

pub(crate) fn char_to_unit(c: char) -> Result<u16> {
    u16::try_from(u32::from(c))
        .map_err(|_| IgniteError::Encode(format!("char {:?} is outside the BMP", c)))
}

pub(crate) fn unit_to_char(unit: u16) -> Result<char> {
    char::from_u32(u32::from(unit))
        .ok_or_else(|| IgniteError::Decode(format!("unpaired surrogate 0x{:04x}", unit)))
}

fn whole_millis(v: &DateTime<Utc>) -> Result<i64> {
    if v.timestamp_subsec_nanos() % NANOS_PER_MILLI != 0 {
        return Err(IgniteError::Encode(format!(
            "date {} has sub-millisecond precision; use a timestamp",
            v
        )));
    }
    Ok(v.timestamp_millis())
}

fn datetime(millis: i64, extra_nanos: u32) -> Result<DateTime<Utc>> {
    let secs = millis.div_euclid(1000);
    let nanos = (millis.rem_euclid(1000) as u32) * NANOS_PER_MILLI + extra_nanos;
    DateTime::from_timestamp(secs, nanos)
        .ok_or_else(|| IgniteError::Decode(format!("date out of range: {} ms", millis)))
}

fn time_of_day(millis: i64) -> Result<NaiveTime> {
    u32::try_from(millis)
        .ok()
        .and_then(|ms| {
            NaiveTime::from_num_seconds_from_midnight_opt(ms / 1000, (ms % 1000) * NANOS_PER_MILLI)
        })
        .ok_or_else(|| IgniteError::Decode(format!("time of day out of range: {} ms", millis)))
}

/// Writes `[i32 scale][i32 len][big-endian magnitude]`, sign in the top bit.
///
/// The magnitude bytes match `BigInteger.toByteArray()` of the absolute
/// unscaled value: minimal, with a leading zero byte when the top bit is set.
fn write_decimal(out: &mut ObjectDataOutput, v: &Decimal) -> Result<()> {
    let mantissa = v.mantissa();
    let magnitude = mantissa.unsigned_abs().to_be_bytes();
    let first = magnitude
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(magnitude.len() - 1);
    let mut bytes = Vec::with_capacity(17);
    if magnitude[first] & 0x80 != 0 {
        bytes.push(0);
    }
    bytes.extend_from_slice(&magnitude[first..]);
    if mantissa < 0 {
        bytes[0] |= 0x80;
    }

    out.write_int(v.scale() as i32)?;
    out.write_int(wire_len(bytes.len())?)?;
    out.write_bytes(&bytes)
}

fn read_decimal(input: &mut ObjectDataInput<'_>) -> Result<Decimal> {
    let scale = input.read_int()?;
    let len = input.read_len()?;
    let mut bytes = input.read_bytes(len)?;
    if bytes.is_empty() {
        return Err(IgniteError::Decode("decimal without magnitude bytes".to_string()));
    }
    let negative = bytes[0] & 0x80 != 0;
    bytes[0] &= 0x7F;

    let overflow = || IgniteError::Decode("decimal exceeds 96-bit precision".to_string());
    let significant = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    if bytes.len() - significant > 16 {
        return Err(overflow());
    }
    let mut magnitude: i128 = 0;
    for b in &bytes[significant..] {
        magnitude = magnitude
            .checked_mul(256)
            .and_then(|m| m.checked_add(i128::from(*b)))
            .ok_or_else(overflow)?;
    }
    if negative {
        magnitude = -magnitude;
    }

    let (mantissa, scale) = if scale < 0 {
        let factor = 10i128
            .checked_pow(scale.unsigned_abs())
            .ok_or_else(overflow)?;
        (magnitude.checked_mul(factor).ok_or_else(overflow)?, 0)
    } else {
        (magnitude, scale as u32)
    };
    Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|_| overflow())
}
