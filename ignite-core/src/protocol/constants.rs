//! Protocol constants for the Ignite thin-client binary protocol.

/// Size of the `i32` length prefix of every frame.
pub const SIZE_OF_LENGTH_FIELD: usize = 4;

/// Size of the request header after the length: op code and query id.
pub const REQUEST_HEADER_SIZE: usize = 2 + 8;

/// Size of the response header after the length: query id and status.
pub const RESPONSE_HEADER_SIZE: usize = 8 + 4;

/// Status of a successful response.
pub const STATUS_SUCCESS: i32 = 0;

/// Generic failure status.
pub const STATUS_FAILED: i32 = 1;

/// Handshake request marker.
pub const HANDSHAKE_OP: u8 = 1;

/// Client code announcing a thin client.
pub const THIN_CLIENT_CODE: u8 = 2;

/// Protocol version spoken by this client: major.
pub const PROTOCOL_VERSION_MAJOR: i16 = 1;

/// Protocol version spoken by this client: minor.
pub const PROTOCOL_VERSION_MINOR: i16 = 0;

/// Protocol version spoken by this client: patch.
pub const PROTOCOL_VERSION_PATCH: i16 = 0;

/// Flag value keeping cache values in binary form on the server.
pub const FLAG_KEEP_BINARY: i8 = 1;

// Key-value operations.

/// Cache get.
pub const OP_CACHE_GET: i16 = 1000;

/// Cache put.
pub const OP_CACHE_PUT: i16 = 1001;

/// Cache put if absent.
pub const OP_CACHE_PUT_IF_ABSENT: i16 = 1002;

/// Cache get of several keys.
pub const OP_CACHE_GET_ALL: i16 = 1003;

/// Cache put of several entries.
pub const OP_CACHE_PUT_ALL: i16 = 1004;

/// Cache get and put.
pub const OP_CACHE_GET_AND_PUT: i16 = 1005;

/// Cache get and replace.
pub const OP_CACHE_GET_AND_REPLACE: i16 = 1006;

/// Cache get and remove.
pub const OP_CACHE_GET_AND_REMOVE: i16 = 1007;

/// Cache get and put if absent.
pub const OP_CACHE_GET_AND_PUT_IF_ABSENT: i16 = 1008;

/// Cache replace.
pub const OP_CACHE_REPLACE: i16 = 1009;

/// Cache replace if the current value equals a sample.
pub const OP_CACHE_REPLACE_IF_EQUALS: i16 = 1010;

/// Cache contains key.
pub const OP_CACHE_CONTAINS_KEY: i16 = 1011;

/// Cache contains all of several keys.
pub const OP_CACHE_CONTAINS_KEYS: i16 = 1012;

/// Cache clear.
pub const OP_CACHE_CLEAR: i16 = 1013;

/// Cache clear of one key.
pub const OP_CACHE_CLEAR_KEY: i16 = 1014;

/// Cache clear of several keys.
pub const OP_CACHE_CLEAR_KEYS: i16 = 1015;

/// Cache remove of one key.
pub const OP_CACHE_REMOVE_KEY: i16 = 1016;

/// Cache remove if the current value equals a sample.
pub const OP_CACHE_REMOVE_IF_EQUALS: i16 = 1017;

/// Cache remove of several keys.
pub const OP_CACHE_REMOVE_KEYS: i16 = 1018;

/// Cache remove of every entry.
pub const OP_CACHE_REMOVE_ALL: i16 = 1019;

/// Cache size.
pub const OP_CACHE_GET_SIZE: i16 = 1020;

// Cache management operations.

/// Names of existing caches.
pub const OP_CACHE_GET_NAMES: i16 = 1050;

/// Create a cache by name, failing if it exists.
pub const OP_CACHE_CREATE_WITH_NAME: i16 = 1051;

/// Create a cache by name unless it exists.
pub const OP_CACHE_GET_OR_CREATE_WITH_NAME: i16 = 1052;

/// Create a cache from a configuration, failing if it exists.
pub const OP_CACHE_CREATE_WITH_CONFIGURATION: i16 = 1053;

/// Create a cache from a configuration unless it exists.
pub const OP_CACHE_GET_OR_CREATE_WITH_CONFIGURATION: i16 = 1054;

/// Configuration of an existing cache.
pub const OP_CACHE_GET_CONFIGURATION: i16 = 1055;

/// Destroy a cache.
pub const OP_CACHE_DESTROY: i16 = 1056;

/// Returns a readable name for an op code, used in logs.
pub fn op_name(op_code: i16) -> &'static str {
    match op_code {
        OP_CACHE_GET => "cache_get",
        OP_CACHE_PUT => "cache_put",
        OP_CACHE_PUT_IF_ABSENT => "cache_put_if_absent",
        OP_CACHE_GET_ALL => "cache_get_all",
        OP_CACHE_PUT_ALL => "cache_put_all",
        OP_CACHE_GET_AND_PUT => "cache_get_and_put",
        OP_CACHE_GET_AND_REPLACE => "cache_get_and_replace",
        OP_CACHE_GET_AND_REMOVE => "cache_get_and_remove",
        OP_CACHE_GET_AND_PUT_IF_ABSENT => "cache_get_and_put_if_absent",
        OP_CACHE_REPLACE => "cache_replace",
        OP_CACHE_REPLACE_IF_EQUALS => "cache_replace_if_equals",
        OP_CACHE_CONTAINS_KEY => "cache_contains_key",
        OP_CACHE_CONTAINS_KEYS => "cache_contains_keys",
        OP_CACHE_CLEAR => "cache_clear",
        OP_CACHE_CLEAR_KEY => "cache_clear_key",
        OP_CACHE_CLEAR_KEYS => "cache_clear_keys",
        OP_CACHE_REMOVE_KEY => "cache_remove_key",
        OP_CACHE_REMOVE_IF_EQUALS => "cache_remove_if_equals",
        OP_CACHE_REMOVE_KEYS => "cache_remove_keys",
        OP_CACHE_REMOVE_ALL => "cache_remove_all",
        OP_CACHE_GET_SIZE => "cache_get_size",
        OP_CACHE_GET_NAMES => "cache_get_names",
        OP_CACHE_CREATE_WITH_NAME => "cache_create",
        OP_CACHE_GET_OR_CREATE_WITH_NAME => "cache_get_or_create",
        OP_CACHE_CREATE_WITH_CONFIGURATION => "cache_create_with_config",
        OP_CACHE_GET_OR_CREATE_WITH_CONFIGURATION => "cache_get_or_create_with_config",
        OP_CACHE_GET_CONFIGURATION => "cache_get_configuration",
        OP_CACHE_DESTROY => "cache_destroy",
        _ => "unknown",
    }
}
