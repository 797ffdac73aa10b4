//! Cache configuration: the property table, struct layouts and the dynamic
//! schema builder used by create-with-configuration requests.

mod builder;
mod properties;
mod structs;

pub use builder::{
    build_config_schema, create_cache_request, decode_config_properties, ConfigSchema,
    PropertyMap,
};
pub use properties::{
    CacheAtomicityMode, CacheMode, CacheProperty, IndexType, PartitionLossPolicy, PeekMode,
    RebalanceMode, WriteSynchronizationMode,
};
pub use structs::{
    CacheKeyConfiguration, QueryEntity, QueryField, QueryIndex, CACHE_CONFIG,
    CACHE_KEY_CONFIGURATION, FIELD_NAME_ALIAS, INDEX_FIELD, QUERY_ENTITY, QUERY_FIELD,
    QUERY_INDEX,
};
