//! Hash functions shared with the Ignite server.
//!
//! Every function here must agree bit-for-bit with the server's Java
//! implementation: caches, binary types and binary fields are identified on
//! the wire by these hashes only.

const FNV1_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV1_PRIME: u32 = 0x0100_0193;

/// Computes Java's `String.hashCode()` for the given string.
///
/// The hash is `h = 31 * h + unit` over the UTF-16 code units of the string,
/// with 32-bit wrapping arithmetic, starting from zero.
pub fn hash_code(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// A reference to a cache, either by name or by its numeric identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRef<'a> {
    /// Cache referenced by name; hashed on use.
    Name(&'a str),
    /// Cache referenced by an identifier the caller already holds.
    Id(i32),
}

impl<'a> From<&'a str> for CacheRef<'a> {
    fn from(name: &'a str) -> Self {
        CacheRef::Name(name)
    }
}

impl<'a> From<&'a String> for CacheRef<'a> {
    fn from(name: &'a String) -> Self {
        CacheRef::Name(name)
    }
}

impl From<i32> for CacheRef<'_> {
    fn from(id: i32) -> Self {
        CacheRef::Id(id)
    }
}

/// Returns the wire identifier of a cache.
///
/// Names are hashed with [`hash_code`]; numeric identifiers pass through.
pub fn cache_id<'a>(cache: impl Into<CacheRef<'a>>) -> i32 {
    match cache.into() {
        CacheRef::Name(name) => hash_code(name),
        CacheRef::Id(id) => id,
    }
}

/// Returns the binary type identifier for a type name (hash of the lowercased name).
pub fn type_id(type_name: &str) -> i32 {
    hash_code(&type_name.to_lowercase())
}

/// Returns the binary field identifier for a field name (hash of the lowercased name).
pub fn field_id(field_name: &str) -> i32 {
    hash_code(&field_name.to_lowercase())
}

/// Computes the schema identifier of a binary object from its field ids.
///
/// FNV-1 over the little-endian bytes of each field id, in field order.
pub fn schema_id(field_ids: &[i32]) -> i32 {
    let mut hash = FNV1_OFFSET_BASIS;
    for id in field_ids {
        for byte in id.to_le_bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(FNV1_PRIME);
        }
    }
    hash as i32
}

/// Computes the identity hash of serialized binary object field data.
pub fn bytes_hash(data: &[u8]) -> i32 {
    data.iter()
        .fold(1i32, |h, &b| h.wrapping_mul(31).wrapping_add(i32::from(b as i8)))
}
