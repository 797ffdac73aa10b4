//! Struct layouts carried by cache configuration messages, and typed
//! builders producing values in those layouts.

use crate::serialization::{Record, StructField, TypeDescriptor, Value};

use super::properties::IndexType;

/// Affinity key configuration of one key type.
pub const CACHE_KEY_CONFIGURATION: &[StructField] = &[
    StructField::new("type_name", TypeDescriptor::String),
    StructField::new("affinity_key_field_name", TypeDescriptor::String),
];

/// One column of a query entity.
pub const QUERY_FIELD: &[StructField] = &[
    StructField::new("name", TypeDescriptor::String),
    StructField::new("type_name", TypeDescriptor::String),
    StructField::new("is_key_field", TypeDescriptor::Bool),
    StructField::new("is_notnull_constraint_field", TypeDescriptor::Bool),
];

/// Alias of a query entity column.
pub const FIELD_NAME_ALIAS: &[StructField] = &[
    StructField::new("field_name", TypeDescriptor::String),
    StructField::new("alias", TypeDescriptor::String),
];

/// One column of a query index.
pub const INDEX_FIELD: &[StructField] = &[
    StructField::new("name", TypeDescriptor::String),
    StructField::new("is_descending", TypeDescriptor::Bool),
];

/// A query index.
pub const QUERY_INDEX: &[StructField] = &[
    StructField::new("index_name", TypeDescriptor::String),
    StructField::new("index_type", TypeDescriptor::Byte),
    StructField::new("inline_size", TypeDescriptor::Int),
    StructField::new("fields", TypeDescriptor::StructArray(INDEX_FIELD)),
];

/// A query entity: SQL table definition of a key/value type pair.
pub const QUERY_ENTITY: &[StructField] = &[
    StructField::new("key_type_name", TypeDescriptor::String),
    StructField::new("value_type_name", TypeDescriptor::String),
    StructField::new("table_name", TypeDescriptor::String),
    StructField::new("key_field_name", TypeDescriptor::String),
    StructField::new("value_field_name", TypeDescriptor::String),
    StructField::new("query_fields", TypeDescriptor::StructArray(QUERY_FIELD)),
    StructField::new("field_name_aliases", TypeDescriptor::StructArray(FIELD_NAME_ALIAS)),
    StructField::new("query_indexes", TypeDescriptor::StructArray(QUERY_INDEX)),
];

/// Body of a cache configuration response.
pub const CACHE_CONFIG: &[StructField] = &[
    StructField::new("length", TypeDescriptor::Int),
    StructField::new("cache_atomicity_mode", TypeDescriptor::Int),
    StructField::new("backups_number", TypeDescriptor::Int),
    StructField::new("cache_mode", TypeDescriptor::Int),
    StructField::new("copy_on_read", TypeDescriptor::Bool),
    StructField::new("data_region_name", TypeDescriptor::String),
    StructField::new("eager_ttl", TypeDescriptor::Bool),
    StructField::new("statistics_enabled", TypeDescriptor::Bool),
    StructField::new("group_name", TypeDescriptor::String),
    StructField::new("default_lock_timeout", TypeDescriptor::Long),
    StructField::new("max_concurrent_async_operations", TypeDescriptor::Int),
    StructField::new("max_query_iterators", TypeDescriptor::Int),
    StructField::new("name", TypeDescriptor::String),
    StructField::new("is_onheap_cache_enabled", TypeDescriptor::Bool),
    StructField::new("partition_loss_policy", TypeDescriptor::Int),
    StructField::new("query_detail_metric_size", TypeDescriptor::Int),
    StructField::new("query_parallelism", TypeDescriptor::Int),
    StructField::new("read_from_backup", TypeDescriptor::Bool),
    StructField::new("rebalance_batch_size", TypeDescriptor::Int),
    StructField::new("rebalance_batches_prefetch_count", TypeDescriptor::Long),
    StructField::new("rebalance_delay", TypeDescriptor::Long),
    StructField::new("rebalance_mode", TypeDescriptor::Int),
    StructField::new("rebalance_order", TypeDescriptor::Int),
    StructField::new("rebalance_throttle", TypeDescriptor::Long),
    StructField::new("rebalance_timeout", TypeDescriptor::Long),
    StructField::new("sql_escape_all", TypeDescriptor::Bool),
    StructField::new("sql_index_inline_max_size", TypeDescriptor::Int),
    StructField::new("sql_schema", TypeDescriptor::String),
    StructField::new("write_synchronization_mode", TypeDescriptor::Int),
    StructField::new(
        "cache_key_configuration",
        TypeDescriptor::StructArray(CACHE_KEY_CONFIGURATION),
    ),
    StructField::new("query_entities", TypeDescriptor::StructArray(QUERY_ENTITY)),
];

fn text(v: &Option<String>) -> Value {
    Value::from(v.clone())
}

fn structs<T: Clone + Into<Value>>(items: &[T]) -> Value {
    Value::Array(items.iter().cloned().map(Into::into).collect())
}

/// Affinity key of a key type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeyConfiguration {
    /// Key type name.
    pub type_name: String,
    /// Field holding the affinity key.
    pub affinity_key_field_name: String,
}

impl CacheKeyConfiguration {
    /// Creates a key configuration.
    pub fn new(type_name: impl Into<String>, affinity_key_field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            affinity_key_field_name: affinity_key_field_name.into(),
        }
    }
}

impl From<CacheKeyConfiguration> for Value {
    fn from(v: CacheKeyConfiguration) -> Self {
        Value::Struct(
            Record::new()
                .with("type_name", v.type_name)
                .with("affinity_key_field_name", v.affinity_key_field_name),
        )
    }
}

/// A column of a query entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryField {
    /// Column name.
    pub name: String,
    /// Java type name of the column.
    pub type_name: String,
    /// Whether the column belongs to the key.
    pub is_key_field: bool,
    /// Whether the column is `NOT NULL`.
    pub is_notnull_constraint_field: bool,
}

impl QueryField {
    /// Creates a nullable value column.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_key_field: false,
            is_notnull_constraint_field: false,
        }
    }

    /// Marks the column as part of the key.
    pub fn key(mut self) -> Self {
        self.is_key_field = true;
        self
    }

    /// Marks the column `NOT NULL`.
    pub fn not_null(mut self) -> Self {
        self.is_notnull_constraint_field = true;
        self
    }
}

impl From<QueryField> for Value {
    fn from(v: QueryField) -> Self {
        Value::Struct(
            Record::new()
                .with("name", v.name)
                .with("type_name", v.type_name)
                .with("is_key_field", v.is_key_field)
                .with("is_notnull_constraint_field", v.is_notnull_constraint_field),
        )
    }
}

/// A query index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryIndex {
    /// Index name.
    pub index_name: String,
    /// Index kind.
    pub index_type: IndexType,
    /// Inline size, or -1 for the default.
    pub inline_size: i32,
    /// Indexed columns with their sort direction (`true` = descending).
    pub fields: Vec<(String, bool)>,
}

impl QueryIndex {
    /// Creates a sorted index with the default inline size.
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            index_type: IndexType::Sorted,
            inline_size: -1,
            fields: Vec::new(),
        }
    }

    /// Sets the index kind.
    pub fn index_type(mut self, index_type: IndexType) -> Self {
        self.index_type = index_type;
        self
    }

    /// Sets the inline size.
    pub fn inline_size(mut self, inline_size: i32) -> Self {
        self.inline_size = inline_size;
        self
    }

    /// Adds an indexed column.
    pub fn field(mut self, name: impl Into<String>, descending: bool) -> Self {
        self.fields.push((name.into(), descending));
        self
    }
}

impl From<QueryIndex> for Value {
    fn from(v: QueryIndex) -> Self {
        let fields = v
            .fields
            .into_iter()
            .map(|(name, descending)| {
                Value::Struct(Record::new().with("name", name).with("is_descending", descending))
            })
            .collect::<Vec<_>>();
        Value::Struct(
            Record::new()
                .with("index_name", v.index_name)
                .with("index_type", v.index_type)
                .with("inline_size", v.inline_size)
                .with("fields", Value::Array(fields)),
        )
    }
}

/// SQL table definition of a key/value type pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEntity {
    /// Key type name.
    pub key_type_name: Option<String>,
    /// Value type name.
    pub value_type_name: Option<String>,
    /// Table name.
    pub table_name: Option<String>,
    /// Name of the column holding the whole key.
    pub key_field_name: Option<String>,
    /// Name of the column holding the whole value.
    pub value_field_name: Option<String>,
    /// Columns.
    pub query_fields: Vec<QueryField>,
    /// Column aliases as `(field name, alias)`.
    pub field_name_aliases: Vec<(String, String)>,
    /// Indexes.
    pub query_indexes: Vec<QueryIndex>,
}

impl QueryEntity {
    /// Creates an entity for a key/value type pair.
    pub fn new(key_type_name: impl Into<String>, value_type_name: impl Into<String>) -> Self {
        Self {
            key_type_name: Some(key_type_name.into()),
            value_type_name: Some(value_type_name.into()),
            ..Self::default()
        }
    }

    /// Sets the table name.
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Adds a column.
    pub fn query_field(mut self, field: QueryField) -> Self {
        self.query_fields.push(field);
        self
    }

    /// Adds a column alias.
    pub fn alias(mut self, field_name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.field_name_aliases.push((field_name.into(), alias.into()));
        self
    }

    /// Adds an index.
    pub fn index(mut self, index: QueryIndex) -> Self {
        self.query_indexes.push(index);
        self
    }
}

impl From<QueryEntity> for Value {
    fn from(v: QueryEntity) -> Self {
        let aliases = v
            .field_name_aliases
            .into_iter()
            .map(|(field_name, alias)| {
                Value::Struct(Record::new().with("field_name", field_name).with("alias", alias))
            })
            .collect::<Vec<_>>();
        Value::Struct(
            Record::new()
                .with("key_type_name", text(&v.key_type_name))
                .with("value_type_name", text(&v.value_type_name))
                .with("table_name", text(&v.table_name))
                .with("key_field_name", text(&v.key_field_name))
                .with("value_field_name", text(&v.value_field_name))
                .with("query_fields", structs(&v.query_fields))
                .with("field_name_aliases", Value::Array(aliases))
                .with("query_indexes", structs(&v.query_indexes)),
        )
    }
}
