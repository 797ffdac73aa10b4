//! Serialization for the Ignite binary format.
//!
//! Values travel either tagged (a [`TypeCode`] byte followed by the payload)
//! or untagged in the layout a [`TypeDescriptor`] declares.

mod any;
mod binary_object;
mod data_input;
mod data_output;
mod descriptor;
#[cfg(feature = "json")]
mod json;
mod type_code;
mod value;

pub use any::{decode_any, encode_any, read_any, write_any, MAX_NESTING_DEPTH};
pub use binary_object::HEADER_LEN as BINARY_OBJECT_HEADER_LEN;
pub use data_input::{DataInput, ObjectDataInput};
pub use data_output::{wire_len, DataOutput, ObjectDataOutput};
pub use descriptor::{StructField, TypeDescriptor};
pub use type_code::{collection_kind, map_kind, TypeCode, OBJECT_ARRAY_TYPE_ID};
pub use value::{BinaryEnum, BinaryObject, Record, Value};
