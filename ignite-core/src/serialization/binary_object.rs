//! Complex (binary) object layout.
//!
//! ```text
//! [u8 103][u8 version][i16 flags][i32 type_id][i32 hash_code][i32 length]
//! [i32 schema_id][i32 schema_offset][field data...][(i32 field_id, offset)...]
//! ```
//!
//! Offsets are relative to the first byte of the object; `length` covers the
//! whole object including the type code.

use crate::error::{IgniteError, Result};
use crate::hash;

use super::any::{read_any_at, write_any};
use super::{DataInput, DataOutput, ObjectDataInput, ObjectDataOutput, TypeCode};
use super::value::BinaryObject;

/// Size of the object header, type code included.
pub const HEADER_LEN: usize = 24;

const PROTOCOL_VERSION: u8 = 1;

const FLAG_USER_TYPE: i16 = 0x0001;
const FLAG_HAS_SCHEMA: i16 = 0x0002;
const FLAG_HAS_RAW_DATA: i16 = 0x0004;
const FLAG_OFFSET_ONE_BYTE: i16 = 0x0008;
const FLAG_OFFSET_TWO_BYTES: i16 = 0x0010;
const FLAG_COMPACT_FOOTER: i16 = 0x0020;

/// Writes a binary object, type code included.
pub(crate) fn write_object(out: &mut ObjectDataOutput, object: &BinaryObject) -> Result<()> {
    let mut data = ObjectDataOutput::new();
    let mut offsets = Vec::with_capacity(object.fields().len());
    for (_, value) in object.fields() {
        offsets.push(HEADER_LEN + data.len());
        write_any(&mut data, value)?;
    }

    let schema_offset = HEADER_LEN + data.len();
    let max_offset = offsets.last().copied().unwrap_or(0);
    let (width, width_flag) = if max_offset <= 0xFF {
        (1, FLAG_OFFSET_ONE_BYTE)
    } else if max_offset <= 0xFFFF {
        (2, FLAG_OFFSET_TWO_BYTES)
    } else {
        (4, 0)
    };

    let mut flags = FLAG_USER_TYPE;
    let (schema_id, schema_offset_field, footer_len) = if object.fields().is_empty() {
        (0, 0, 0)
    } else {
        flags |= FLAG_HAS_SCHEMA | width_flag;
        (
            object.schema_id(),
            schema_offset,
            object.fields().len() * (4 + width),
        )
    };
    let length = schema_offset + footer_len;

    out.write_u8(TypeCode::ComplexObject.code())?;
    out.write_u8(PROTOCOL_VERSION)?;
    out.write_short(flags)?;
    out.write_int(object.type_id())?;
    out.write_int(hash::bytes_hash(data.as_bytes()))?;
    out.write_int(to_i32(length)?)?;
    out.write_int(schema_id)?;
    out.write_int(to_i32(schema_offset_field)?)?;
    out.write_bytes(data.as_bytes())?;

    for ((field_id, _), offset) in object.fields().iter().zip(offsets) {
        out.write_int(*field_id)?;
        match width {
            1 => out.write_u8(offset as u8)?,
            2 => out.write_short(offset as u16 as i16)?,
            _ => out.write_int(to_i32(offset)?)?,
        }
    }
    Ok(())
}

/// Reads a binary object whose type code has already been consumed.
///
/// `depth` is the nesting level of the object; its fields sit one level
/// below.
pub(crate) fn read_object(input: &mut ObjectDataInput<'_>, depth: usize) -> Result<BinaryObject> {
    let version = input.read_u8()?;
    if version != PROTOCOL_VERSION {
        return Err(IgniteError::Decode(format!(
            "unsupported binary object version {}",
            version
        )));
    }
    let flags = input.read_short()?;
    let type_id = input.read_int()?;
    let _hash_code = input.read_int()?;
    let length = to_usize(input.read_int()?, "object length")?;
    let _schema_id = input.read_int()?;
    let schema_offset = input.read_int()?;

    if length < HEADER_LEN {
        return Err(IgniteError::Decode(format!(
            "binary object length {} shorter than its header",
            length
        )));
    }
    // `rest` holds everything after the header, so object offset N is rest[N - HEADER_LEN].
    let rest = input.read_bytes(length - HEADER_LEN)?;
    let mut object = BinaryObject::with_type_id(type_id);

    if flags & FLAG_HAS_SCHEMA == 0 {
        return Ok(object);
    }
    if flags & FLAG_COMPACT_FOOTER != 0 {
        return Err(IgniteError::Decode(
            "binary objects with a compact footer need type metadata to be read".to_string(),
        ));
    }

    let width = if flags & FLAG_OFFSET_ONE_BYTE != 0 {
        1
    } else if flags & FLAG_OFFSET_TWO_BYTES != 0 {
        2
    } else {
        4
    };
    let schema_offset = to_usize(schema_offset, "schema offset")?;
    let footer_end = if flags & FLAG_HAS_RAW_DATA != 0 {
        length.checked_sub(4).ok_or_else(|| {
            IgniteError::Decode("binary object too short for its raw offset".to_string())
        })?
    } else {
        length
    };
    if schema_offset < HEADER_LEN || schema_offset > footer_end {
        return Err(IgniteError::Decode(format!(
            "schema offset {} outside object of length {}",
            schema_offset, length
        )));
    }

    let footer = &rest[schema_offset - HEADER_LEN..footer_end - HEADER_LEN];
    let entry_len = 4 + width;
    if footer.len() % entry_len != 0 {
        return Err(IgniteError::Decode(format!(
            "schema footer of {} bytes is not a whole number of {}-byte entries",
            footer.len(),
            entry_len
        )));
    }

    let mut footer_input = ObjectDataInput::new(footer);
    while footer_input.remaining() > 0 {
        let field_id = footer_input.read_int()?;
        let offset = match width {
            1 => usize::from(footer_input.read_u8()?),
            2 => usize::from(footer_input.read_short()? as u16),
            _ => to_usize(footer_input.read_int()?, "field offset")?,
        };
        if offset < HEADER_LEN || offset >= schema_offset {
            return Err(IgniteError::Decode(format!(
                "field offset {} outside field data",
                offset
            )));
        }
        let mut field_input = ObjectDataInput::new(&rest[offset - HEADER_LEN..schema_offset - HEADER_LEN]);
        let value = read_any_at(&mut field_input, depth + 1)?;
        object = object.with_field_id(field_id, value);
    }
    Ok(object)
}

fn to_i32(v: usize) -> Result<i32> {
    i32::try_from(v).map_err(|_| IgniteError::Encode(format!("binary object too large: {}", v)))
}

fn to_usize(v: i32, what: &str) -> Result<usize> {
    usize::try_from(v).map_err(|_| IgniteError::Decode(format!("negative {}: {}", what, v)))
}
