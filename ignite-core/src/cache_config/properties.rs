//! Cache configuration property codes and the enumerations they carry.

use crate::error::{IgniteError, Result};
use crate::serialization::{TypeDescriptor, Value};

use super::structs::{CACHE_KEY_CONFIGURATION, QUERY_ENTITY};

static STRING: TypeDescriptor = TypeDescriptor::String;
static INT: TypeDescriptor = TypeDescriptor::Int;
static LONG: TypeDescriptor = TypeDescriptor::Long;
static BOOL: TypeDescriptor = TypeDescriptor::Bool;
static QUERY_ENTITIES: TypeDescriptor = TypeDescriptor::StructArray(QUERY_ENTITY);
static CACHE_KEY_CONFIGURATIONS: TypeDescriptor =
    TypeDescriptor::StructArray(CACHE_KEY_CONFIGURATION);

/// A cache configuration property, identified on the wire by its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i16)]
pub enum CacheProperty {
    /// Cache name (String). Mandatory when creating a cache.
    Name = 0,
    /// [`CacheMode`] (Int).
    CacheMode = 1,
    /// [`CacheAtomicityMode`] (Int).
    CacheAtomicityMode = 2,
    /// Number of backups (Int).
    BackupsNumber = 3,
    /// [`WriteSynchronizationMode`] (Int).
    WriteSynchronizationMode = 4,
    /// Copy on read (Bool).
    CopyOnRead = 5,
    /// Read from backup (Bool).
    ReadFromBackup = 6,
    /// Data region name (String).
    DataRegionName = 100,
    /// On-heap cache enabled (Bool).
    IsOnheapCacheEnabled = 101,
    /// Query entities (array of query entity structs).
    QueryEntities = 200,
    /// Query parallelism (Int).
    QueryParallelism = 201,
    /// Query detail metric size (Int).
    QueryDetailMetricSize = 202,
    /// SQL schema (String).
    SqlSchema = 203,
    /// SQL index inline max size (Int).
    SqlIndexInlineMaxSize = 204,
    /// SQL escape all (Bool).
    SqlEscapeAll = 205,
    /// Maximum query iterators (Int).
    MaxQueryIterators = 206,
    /// [`RebalanceMode`] (Int).
    RebalanceMode = 300,
    /// Rebalance delay in milliseconds (Long).
    RebalanceDelay = 301,
    /// Rebalance timeout in milliseconds (Long).
    RebalanceTimeout = 302,
    /// Rebalance batch size (Int).
    RebalanceBatchSize = 303,
    /// Rebalance batches prefetch count (Long).
    RebalanceBatchesPrefetchCount = 304,
    /// Rebalance order (Int).
    RebalanceOrder = 305,
    /// Rebalance throttle in milliseconds (Long).
    RebalanceThrottle = 306,
    /// Cache group name (String).
    GroupName = 400,
    /// Cache key configurations (array of key configuration structs).
    CacheKeyConfiguration = 401,
    /// Default lock timeout in milliseconds (Long).
    DefaultLockTimeout = 402,
    /// Maximum concurrent async operations (Int).
    MaxConcurrentAsyncOperations = 403,
    /// [`PartitionLossPolicy`] (Int).
    PartitionLossPolicy = 404,
    /// Eager TTL (Bool).
    EagerTtl = 405,
    /// Statistics enabled (Bool).
    StatisticsEnabled = 406,
}

impl CacheProperty {
    /// Every property, in code order.
    pub const ALL: [CacheProperty; 30] = [
        CacheProperty::Name,
        CacheProperty::CacheMode,
        CacheProperty::CacheAtomicityMode,
        CacheProperty::BackupsNumber,
        CacheProperty::WriteSynchronizationMode,
        CacheProperty::CopyOnRead,
        CacheProperty::ReadFromBackup,
        CacheProperty::DataRegionName,
        CacheProperty::IsOnheapCacheEnabled,
        CacheProperty::QueryEntities,
        CacheProperty::QueryParallelism,
        CacheProperty::QueryDetailMetricSize,
        CacheProperty::SqlSchema,
        CacheProperty::SqlIndexInlineMaxSize,
        CacheProperty::SqlEscapeAll,
        CacheProperty::MaxQueryIterators,
        CacheProperty::RebalanceMode,
        CacheProperty::RebalanceDelay,
        CacheProperty::RebalanceTimeout,
        CacheProperty::RebalanceBatchSize,
        CacheProperty::RebalanceBatchesPrefetchCount,
        CacheProperty::RebalanceOrder,
        CacheProperty::RebalanceThrottle,
        CacheProperty::GroupName,
        CacheProperty::CacheKeyConfiguration,
        CacheProperty::DefaultLockTimeout,
        CacheProperty::MaxConcurrentAsyncOperations,
        CacheProperty::PartitionLossPolicy,
        CacheProperty::EagerTtl,
        CacheProperty::StatisticsEnabled,
    ];

    /// Returns the wire code.
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Looks a property up by its wire code.
    pub fn from_code(code: i16) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|property| property.code() == code)
            .ok_or(IgniteError::UnknownProperty(code))
    }

    /// Returns the wire type of the property value.
    pub fn value_type(self) -> &'static TypeDescriptor {
        match self {
            CacheProperty::Name
            | CacheProperty::DataRegionName
            | CacheProperty::SqlSchema
            | CacheProperty::GroupName => &STRING,
            CacheProperty::CacheMode
            | CacheProperty::CacheAtomicityMode
            | CacheProperty::BackupsNumber
            | CacheProperty::WriteSynchronizationMode
            | CacheProperty::QueryParallelism
            | CacheProperty::QueryDetailMetricSize
            | CacheProperty::SqlIndexInlineMaxSize
            | CacheProperty::MaxQueryIterators
            | CacheProperty::RebalanceMode
            | CacheProperty::RebalanceBatchSize
            | CacheProperty::RebalanceOrder
            | CacheProperty::MaxConcurrentAsyncOperations
            | CacheProperty::PartitionLossPolicy => &INT,
            CacheProperty::RebalanceDelay
            | CacheProperty::RebalanceTimeout
            | CacheProperty::RebalanceBatchesPrefetchCount
            | CacheProperty::RebalanceThrottle
            | CacheProperty::DefaultLockTimeout => &LONG,
            CacheProperty::CopyOnRead
            | CacheProperty::ReadFromBackup
            | CacheProperty::IsOnheapCacheEnabled
            | CacheProperty::SqlEscapeAll
            | CacheProperty::EagerTtl
            | CacheProperty::StatisticsEnabled => &BOOL,
            CacheProperty::QueryEntities => &QUERY_ENTITIES,
            CacheProperty::CacheKeyConfiguration => &CACHE_KEY_CONFIGURATIONS,
        }
    }

    /// Returns the descriptor writing `[i16 code][value]`.
    pub fn descriptor(self) -> TypeDescriptor {
        TypeDescriptor::Property {
            code: self.code(),
            value: self.value_type(),
        }
    }
}

impl From<CacheProperty> for i16 {
    fn from(property: CacheProperty) -> Self {
        property.code()
    }
}

/// Cache distribution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum CacheMode {
    /// Data kept on the local node only.
    Local = 0,
    /// Every node holds a full copy.
    Replicated = 1,
    /// Data split into partitions across nodes.
    #[default]
    Partitioned = 2,
}

impl CacheMode {
    /// Returns the integer value of this mode.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Creates a mode from its integer value.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Local),
            1 => Some(Self::Replicated),
            2 => Some(Self::Partitioned),
            _ => None,
        }
    }
}

/// Cache atomicity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum CacheAtomicityMode {
    /// Fully transactional.
    Transactional = 0,
    /// Atomic, without transactions.
    #[default]
    Atomic = 1,
}

impl CacheAtomicityMode {
    /// Returns the integer value of this mode.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Creates a mode from its integer value.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Transactional),
            1 => Some(Self::Atomic),
            _ => None,
        }
    }
}

/// When a write is acknowledged relative to its backups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum WriteSynchronizationMode {
    /// Wait for primary and backups.
    FullSync = 0,
    /// Do not wait.
    FullAsync = 1,
    /// Wait for the primary only.
    #[default]
    PrimarySync = 2,
}

impl WriteSynchronizationMode {
    /// Returns the integer value of this mode.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Creates a mode from its integer value.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::FullSync),
            1 => Some(Self::FullAsync),
            2 => Some(Self::PrimarySync),
            _ => None,
        }
    }
}

/// How data is rebalanced when topology changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum RebalanceMode {
    /// Block cache access until rebalancing finishes.
    Sync = 0,
    /// Rebalance in the background.
    #[default]
    Async = 1,
    /// No rebalancing.
    None = 2,
}

impl RebalanceMode {
    /// Returns the integer value of this mode.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Creates a mode from its integer value.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Sync),
            1 => Some(Self::Async),
            2 => Some(Self::None),
            _ => None,
        }
    }
}

/// Behavior when partitions are lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum PartitionLossPolicy {
    /// Writes fail, reads allowed from surviving partitions.
    ReadOnlySafe = 0,
    /// Writes fail, reads allowed everywhere.
    ReadOnlyAll = 1,
    /// Reads and writes allowed on surviving partitions.
    ReadWriteSafe = 2,
    /// Reads and writes allowed everywhere.
    ReadWriteAll = 3,
    /// Loss is ignored.
    #[default]
    Ignore = 4,
}

impl PartitionLossPolicy {
    /// Returns the integer value of this policy.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Creates a policy from its integer value.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::ReadOnlySafe),
            1 => Some(Self::ReadOnlyAll),
            2 => Some(Self::ReadWriteSafe),
            3 => Some(Self::ReadWriteAll),
            4 => Some(Self::Ignore),
            _ => None,
        }
    }
}

/// Which copies of the data a size query counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum PeekMode {
    /// Every copy.
    #[default]
    All = 0,
    /// Near cache entries.
    Near = 1,
    /// Primary copies.
    Primary = 2,
    /// Backup copies.
    Backup = 3,
}

impl PeekMode {
    /// Returns the byte value of this mode.
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    /// Creates a mode from its byte value.
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            0 => Some(Self::All),
            1 => Some(Self::Near),
            2 => Some(Self::Primary),
            3 => Some(Self::Backup),
            _ => None,
        }
    }
}

/// Kind of a query index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum IndexType {
    /// Sorted index.
    #[default]
    Sorted = 0,
    /// Full-text index.
    Fulltext = 1,
    /// Geospatial index.
    Geospatial = 2,
}

impl IndexType {
    /// Returns the byte value of this index type.
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    /// Creates an index type from its byte value.
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            0 => Some(Self::Sorted),
            1 => Some(Self::Fulltext),
            2 => Some(Self::Geospatial),
            _ => None,
        }
    }
}

impl From<CacheMode> for Value {
    fn from(v: CacheMode) -> Self {
        Value::Int(v.as_i32())
    }
}

impl From<CacheAtomicityMode> for Value {
    fn from(v: CacheAtomicityMode) -> Self {
        Value::Int(v.as_i32())
    }
}

impl From<WriteSynchronizationMode> for Value {
    fn from(v: WriteSynchronizationMode) -> Self {
        Value::Int(v.as_i32())
    }
}

impl From<RebalanceMode> for Value {
    fn from(v: RebalanceMode) -> Self {
        Value::Int(v.as_i32())
    }
}

impl From<PartitionLossPolicy> for Value {
    fn from(v: PartitionLossPolicy) -> Self {
        Value::Int(v.as_i32())
    }
}

impl From<PeekMode> for Value {
    fn from(v: PeekMode) -> Self {
        Value::Byte(v.as_i8())
    }
}

impl From<IndexType> for Value {
    fn from(v: IndexType) -> Self {
        Value::Byte(v.as_i8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for property in CacheProperty::ALL {
            assert_eq!(CacheProperty::from_code(property.code()).unwrap(), property);
        }
    }

    #[test]
    fn test_all_is_sorted_and_unique() {
        let codes: Vec<i16> = CacheProperty::ALL.iter().map(|p| p.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_unknown_code() {
        assert!(matches!(
            CacheProperty::from_code(7),
            Err(IgniteError::UnknownProperty(7))
        ));
    }

    #[test]
    fn test_value_types() {
        assert_eq!(*CacheProperty::Name.value_type(), TypeDescriptor::String);
        assert_eq!(*CacheProperty::BackupsNumber.value_type(), TypeDescriptor::Int);
        assert_eq!(*CacheProperty::RebalanceDelay.value_type(), TypeDescriptor::Long);
        assert_eq!(*CacheProperty::EagerTtl.value_type(), TypeDescriptor::Bool);
        assert!(matches!(
            CacheProperty::QueryEntities.value_type(),
            TypeDescriptor::StructArray(_)
        ));
    }

    #[test]
    fn test_property_descriptor_layout() {
        let bytes = CacheProperty::BackupsNumber
            .descriptor()
            .encode(&Value::Int(2))
            .unwrap();
        assert_eq!(bytes, vec![3, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn test_enum_values() {
        assert_eq!(Value::from(CacheMode::Partitioned), Value::Int(2));
        assert_eq!(CacheMode::from_value(1), Some(CacheMode::Replicated));
        assert_eq!(PartitionLossPolicy::from_value(9), None);
        assert_eq!(Value::from(PeekMode::Backup), Value::Byte(3));
        assert_eq!(RebalanceMode::default(), RebalanceMode::Async);
    }
}
