//! One-byte wire type codes of the Ignite binary protocol.

use crate::error::IgniteError;

/// Wire type code prefixed to every tagged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeCode {
    /// Signed 8-bit integer.
    Byte = 1,
    /// Signed 16-bit integer.
    Short = 2,
    /// Signed 32-bit integer.
    Int = 3,
    /// Signed 64-bit integer.
    Long = 4,
    /// 32-bit float.
    Float = 5,
    /// 64-bit float.
    Double = 6,
    /// UTF-16 code unit.
    Char = 7,
    /// Boolean.
    Bool = 8,
    /// Length-prefixed UTF-8 string.
    String = 9,
    /// UUID as two 64-bit halves.
    Uuid = 10,
    /// Milliseconds since the epoch.
    Date = 11,
    /// Byte array.
    ByteArray = 12,
    /// Short array.
    ShortArray = 13,
    /// Int array.
    IntArray = 14,
    /// Long array.
    LongArray = 15,
    /// Float array.
    FloatArray = 16,
    /// Double array.
    DoubleArray = 17,
    /// Char array.
    CharArray = 18,
    /// Bool array.
    BoolArray = 19,
    /// String array.
    StringArray = 20,
    /// UUID array.
    UuidArray = 21,
    /// Date array.
    DateArray = 22,
    /// Array of tagged objects.
    ObjectArray = 23,
    /// Collection of tagged objects.
    Collection = 24,
    /// Map of tagged keys to tagged values.
    Map = 25,
    /// Binary object wrapped in a byte array.
    WrappedBinaryObject = 27,
    /// Enum as (type id, ordinal).
    Enum = 28,
    /// Enum array.
    EnumArray = 29,
    /// Arbitrary precision decimal.
    Decimal = 30,
    /// Decimal array.
    DecimalArray = 31,
    /// Milliseconds since the epoch plus nanoseconds.
    Timestamp = 33,
    /// Timestamp array.
    TimestampArray = 34,
    /// Milliseconds since midnight.
    Time = 36,
    /// Time array.
    TimeArray = 37,
    /// Binary enum.
    BinaryEnum = 38,
    /// Null value.
    Null = 101,
    /// Binary (complex) object.
    ComplexObject = 103,
}

impl TypeCode {
    /// Returns the byte written on the wire.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TypeCode {
    type Error = IgniteError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => TypeCode::Byte,
            2 => TypeCode::Short,
            3 => TypeCode::Int,
            4 => TypeCode::Long,
            5 => TypeCode::Float,
            6 => TypeCode::Double,
            7 => TypeCode::Char,
            8 => TypeCode::Bool,
            9 => TypeCode::String,
            10 => TypeCode::Uuid,
            11 => TypeCode::Date,
            12 => TypeCode::ByteArray,
            13 => TypeCode::ShortArray,
            14 => TypeCode::IntArray,
            15 => TypeCode::LongArray,
            16 => TypeCode::FloatArray,
            17 => TypeCode::DoubleArray,
            18 => TypeCode::CharArray,
            19 => TypeCode::BoolArray,
            20 => TypeCode::StringArray,
            21 => TypeCode::UuidArray,
            22 => TypeCode::DateArray,
            23 => TypeCode::ObjectArray,
            24 => TypeCode::Collection,
            25 => TypeCode::Map,
            27 => TypeCode::WrappedBinaryObject,
            28 => TypeCode::Enum,
            29 => TypeCode::EnumArray,
            30 => TypeCode::Decimal,
            31 => TypeCode::DecimalArray,
            33 => TypeCode::Timestamp,
            34 => TypeCode::TimestampArray,
            36 => TypeCode::Time,
            37 => TypeCode::TimeArray,
            38 => TypeCode::BinaryEnum,
            101 => TypeCode::Null,
            103 => TypeCode::ComplexObject,
            other => {
                return Err(IgniteError::Decode(format!("unknown type code {}", other)));
            }
        })
    }
}

/// Map kinds carried after the entry count of a tagged map.
pub mod map_kind {
    /// `java.util.HashMap`: iteration order not preserved by the server.
    pub const HASH_MAP: i8 = 1;
    /// `java.util.LinkedHashMap`: insertion order preserved.
    pub const LINKED_HASH_MAP: i8 = 2;
}

/// Collection kinds carried after the element count of a tagged collection.
pub mod collection_kind {
    /// User-defined set.
    pub const USER_SET: i8 = -1;
    /// User-defined collection.
    pub const USER_COLLECTION: i8 = 0;
    /// `java.util.ArrayList`.
    pub const ARRAY_LIST: i8 = 1;
    /// `java.util.LinkedList`.
    pub const LINKED_LIST: i8 = 2;
    /// `java.util.HashSet`.
    pub const HASH_SET: i8 = 3;
    /// `java.util.LinkedHashSet`.
    pub const LINKED_HASH_SET: i8 = 4;
    /// `java.util.Collections.singletonList`.
    pub const SINGLETON_LIST: i8 = 5;
}

/// Component type id written in front of `Object[]` arrays.
pub const OBJECT_ARRAY_TYPE_ID: i32 = -1;
