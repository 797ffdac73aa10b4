//! Common test utilities: an in-memory Ignite node and scripted transports.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::BytesMut;
use ignite_client::core::cache_config::{
    decode_config_properties, CacheProperty, PropertyMap, CACHE_CONFIG,
};
use ignite_client::core::hash_code;
use ignite_client::core::protocol::*;
use ignite_client::core::serialization::{Record, TypeDescriptor, Value};
use ignite_client::{ClientConfig, IgniteClient, IgniteError, Result, Transport};

/// Status the node answers with when a cache id is unknown.
pub const STATUS_CACHE_DOES_NOT_EXIST: i32 = 1000;
/// Status the node answers with when creating a cache that exists.
pub const STATUS_CACHE_EXISTS: i32 = 1001;

#[derive(Debug)]
struct CacheState {
    name: String,
    properties: PropertyMap,
    entries: Vec<(Value, Value)>,
}

impl CacheState {
    fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn put(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    fn remove(&mut self, key: &Value) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }
}

/// A single-node cache server speaking the thin protocol from the server side.
#[derive(Debug, Default)]
pub struct FakeNode {
    caches: Vec<CacheState>,
    requests: Vec<(i16, i64)>,
}

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty cache with default settings.
    pub fn with_cache(mut self, name: &str) -> Self {
        self.caches.push(CacheState {
            name: name.to_string(),
            properties: PropertyMap::new().with(CacheProperty::Name, name),
            entries: Vec::new(),
        });
        self
    }

    /// Op code and query id of every request handled so far.
    pub fn requests(&self) -> &[(i16, i64)] {
        &self.requests
    }

    pub fn entries(&self, name: &str) -> Option<&[(Value, Value)]> {
        self.caches
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.entries.as_slice())
    }

    pub fn properties(&self, name: &str) -> Option<&PropertyMap> {
        self.caches
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.properties)
    }

    pub fn cache_names(&self) -> Vec<String> {
        self.caches.iter().map(|c| c.name.clone()).collect()
    }

    /// Answers one request frame with one response frame.
    pub fn handle(&mut self, frame: &[u8]) -> Vec<u8> {
        let op_code = i16::from_le_bytes([frame[4], frame[5]]);
        let query_id = i64::from_le_bytes(frame[6..14].try_into().unwrap());
        self.requests.push((op_code, query_id));

        let (schema, response) = self.dispatch(op_code, query_id, frame);
        encode_response(&schema, &response).unwrap()
    }

    fn find(&self, cache_id: i32) -> Option<usize> {
        self.caches
            .iter()
            .position(|c| hash_code(&c.name) == cache_id)
    }

    fn dispatch(&mut self, op_code: i16, query_id: i64, frame: &[u8]) -> (Schema, Response) {
        match op_code {
            OP_CACHE_GET_NAMES => {
                let names = self.cache_names().into_iter().map(Value::from).collect();
                one(query_id, "cache_names", TypeDescriptor::StringArray, Value::Array(names))
            }
            OP_CACHE_CREATE_WITH_NAME | OP_CACHE_GET_OR_CREATE_WITH_NAME => {
                let schema = Schema::empty().with("cache_name", TypeDescriptor::String);
                let request = decode_request(&schema, frame).unwrap();
                let name = request.get("cache_name").and_then(Value::as_str).unwrap();
                let properties = PropertyMap::new().with(CacheProperty::Name, name);
                self.create(query_id, properties, op_code == OP_CACHE_CREATE_WITH_NAME)
            }
            OP_CACHE_CREATE_WITH_CONFIGURATION | OP_CACHE_GET_OR_CREATE_WITH_CONFIGURATION => {
                let (_, _, properties) = decode_config_properties(frame).unwrap();
                self.create(
                    query_id,
                    properties,
                    op_code == OP_CACHE_CREATE_WITH_CONFIGURATION,
                )
            }
            OP_CACHE_DESTROY => {
                let schema = Schema::empty().with("hash_code", TypeDescriptor::Int);
                let id = cache_id_of(&decode_request(&schema, frame).unwrap());
                match self.find(id) {
                    Some(index) => {
                        self.caches.remove(index);
                        unit(query_id)
                    }
                    None => missing(query_id, id),
                }
            }
            OP_CACHE_GET_CONFIGURATION => {
                let schema = Schema::empty()
                    .with("hash_code", TypeDescriptor::Int)
                    .with("flags", TypeDescriptor::Byte);
                let id = cache_id_of(&decode_request(&schema, frame).unwrap());
                match self.find(id) {
                    Some(index) => one(
                        query_id,
                        "cache_config",
                        TypeDescriptor::Struct(CACHE_CONFIG),
                        Value::Struct(config_record(&self.caches[index].properties)),
                    ),
                    None => missing(query_id, id),
                }
            }
            _ => self.key_value(op_code, query_id, frame),
        }
    }

    fn create(
        &mut self,
        query_id: i64,
        properties: PropertyMap,
        fail_if_exists: bool,
    ) -> (Schema, Response) {
        let name = properties
            .get(CacheProperty::Name)
            .and_then(Value::as_str)
            .unwrap()
            .to_string();
        if self.find(hash_code(&name)).is_some() {
            if fail_if_exists {
                return failure(
                    query_id,
                    STATUS_CACHE_EXISTS,
                    format!("Cache already exists [name={}]", name),
                );
            }
        } else {
            self.caches.push(CacheState {
                name,
                properties,
                entries: Vec::new(),
            });
        }
        unit(query_id)
    }

    fn key_value(&mut self, op_code: i16, query_id: i64, frame: &[u8]) -> (Schema, Response) {
        use TypeDescriptor::{Any, AnyArray, ByteArray, Map};

        let fields: &[(&'static str, TypeDescriptor)] = match op_code {
            OP_CACHE_GET
            | OP_CACHE_GET_AND_REMOVE
            | OP_CACHE_CONTAINS_KEY
            | OP_CACHE_CLEAR_KEY
            | OP_CACHE_REMOVE_KEY => &[("key", Any)],
            OP_CACHE_PUT
            | OP_CACHE_PUT_IF_ABSENT
            | OP_CACHE_GET_AND_PUT
            | OP_CACHE_GET_AND_REPLACE
            | OP_CACHE_GET_AND_PUT_IF_ABSENT
            | OP_CACHE_REPLACE => &[("key", Any), ("value", Any)],
            OP_CACHE_REPLACE_IF_EQUALS => &[("key", Any), ("sample", Any), ("value", Any)],
            OP_CACHE_REMOVE_IF_EQUALS => &[("key", Any), ("sample", Any)],
            OP_CACHE_GET_ALL | OP_CACHE_CONTAINS_KEYS | OP_CACHE_CLEAR_KEYS
            | OP_CACHE_REMOVE_KEYS => &[("keys", AnyArray)],
            OP_CACHE_PUT_ALL => &[("data", Map)],
            OP_CACHE_GET_SIZE => &[("peek_modes", ByteArray)],
            OP_CACHE_CLEAR | OP_CACHE_REMOVE_ALL => &[],
            other => {
                return failure(
                    query_id,
                    STATUS_FAILED,
                    format!("unsupported operation {}", other),
                )
            }
        };

        let schema = fields.iter().fold(
            Schema::empty()
                .with("hash_code", TypeDescriptor::Int)
                .with("flag", TypeDescriptor::Byte),
            |schema, (name, ty)| schema.with(*name, *ty),
        );
        let request = decode_request(&schema, frame).unwrap();
        let id = cache_id_of(&request);
        let Some(index) = self.find(id) else {
            return missing(query_id, id);
        };
        let cache = &mut self.caches[index];

        let arg = |name: &str| request.get(name).cloned().unwrap();
        let keys = || match arg("keys") {
            Value::Array(keys) => keys,
            other => panic!("keys must be an array, got {:?}", other),
        };

        match op_code {
            OP_CACHE_GET => value(query_id, cache.get(&arg("key")).cloned()),
            OP_CACHE_PUT => {
                cache.put(arg("key"), arg("value"));
                unit(query_id)
            }
            OP_CACHE_PUT_IF_ABSENT => {
                let absent = cache.get(&arg("key")).is_none();
                if absent {
                    cache.put(arg("key"), arg("value"));
                }
                success(query_id, absent)
            }
            OP_CACHE_GET_ALL => {
                let data = keys()
                    .into_iter()
                    .filter_map(|key| cache.get(&key).cloned().map(|v| (key, v)))
                    .collect();
                one(query_id, "data", Map, Value::Map(data))
            }
            OP_CACHE_PUT_ALL => {
                match arg("data") {
                    Value::Map(entries) => entries.into_iter().for_each(|(k, v)| {
                        cache.put(k, v);
                    }),
                    other => panic!("data must be a map, got {:?}", other),
                }
                unit(query_id)
            }
            OP_CACHE_GET_AND_PUT => value(query_id, cache.put(arg("key"), arg("value"))),
            OP_CACHE_GET_AND_REPLACE => {
                let old = match cache.get(&arg("key")) {
                    Some(_) => cache.put(arg("key"), arg("value")),
                    None => None,
                };
                value(query_id, old)
            }
            OP_CACHE_GET_AND_REMOVE => value(query_id, cache.remove(&arg("key"))),
            OP_CACHE_GET_AND_PUT_IF_ABSENT => {
                let current = cache.get(&arg("key")).cloned();
                if current.is_none() {
                    cache.put(arg("key"), arg("value"));
                }
                value(query_id, current)
            }
            OP_CACHE_REPLACE => {
                let present = cache.get(&arg("key")).is_some();
                if present {
                    cache.put(arg("key"), arg("value"));
                }
                success(query_id, present)
            }
            OP_CACHE_REPLACE_IF_EQUALS => {
                let matches = cache.get(&arg("key")) == Some(&arg("sample"));
                if matches {
                    cache.put(arg("key"), arg("value"));
                }
                success(query_id, matches)
            }
            OP_CACHE_CONTAINS_KEY => {
                let present = cache.get(&arg("key")).is_some();
                one(query_id, "value", TypeDescriptor::Bool, present)
            }
            OP_CACHE_CONTAINS_KEYS => {
                let all = keys().iter().all(|key| cache.get(key).is_some());
                one(query_id, "value", TypeDescriptor::Bool, all)
            }
            OP_CACHE_CLEAR | OP_CACHE_REMOVE_ALL => {
                cache.entries.clear();
                unit(query_id)
            }
            OP_CACHE_CLEAR_KEY => {
                cache.remove(&arg("key"));
                unit(query_id)
            }
            OP_CACHE_CLEAR_KEYS | OP_CACHE_REMOVE_KEYS => {
                for key in keys() {
                    cache.remove(&key);
                }
                unit(query_id)
            }
            OP_CACHE_REMOVE_KEY => {
                let removed = cache.remove(&arg("key")).is_some();
                success(query_id, removed)
            }
            OP_CACHE_REMOVE_IF_EQUALS => {
                let matches = cache.get(&arg("key")) == Some(&arg("sample"));
                if matches {
                    cache.remove(&arg("key"));
                }
                success(query_id, matches)
            }
            OP_CACHE_GET_SIZE => {
                let count = cache.entries.len() as i64;
                one(query_id, "count", TypeDescriptor::Long, Value::Long(count))
            }
            _ => unreachable!(),
        }
    }
}

fn cache_id_of(request: &Request) -> i32 {
    match request.get("hash_code") {
        Some(Value::Int(id)) => *id,
        other => panic!("missing hash_code: {:?}", other),
    }
}

fn unit(query_id: i64) -> (Schema, Response) {
    (Schema::empty(), Response::success(query_id, Record::new()))
}

fn one(
    query_id: i64,
    name: &'static str,
    ty: TypeDescriptor,
    value: impl Into<Value>,
) -> (Schema, Response) {
    (
        Schema::empty().with(name, ty),
        Response::success(query_id, Record::new().with(name, value)),
    )
}

fn value(query_id: i64, value: Option<Value>) -> (Schema, Response) {
    one(query_id, "value", TypeDescriptor::Any, value.unwrap_or(Value::Null))
}

fn success(query_id: i64, flag: bool) -> (Schema, Response) {
    one(query_id, "success", TypeDescriptor::Bool, flag)
}

fn failure(query_id: i64, status: i32, message: String) -> (Schema, Response) {
    (Schema::empty(), Response::failure(query_id, status, message))
}

fn missing(query_id: i64, cache_id: i32) -> (Schema, Response) {
    failure(
        query_id,
        STATUS_CACHE_DOES_NOT_EXIST,
        format!("Cache does not exist [cacheId={}]", cache_id),
    )
}

fn config_property(field: &str) -> Option<CacheProperty> {
    let property = match field {
        "cache_atomicity_mode" => CacheProperty::CacheAtomicityMode,
        "backups_number" => CacheProperty::BackupsNumber,
        "cache_mode" => CacheProperty::CacheMode,
        "copy_on_read" => CacheProperty::CopyOnRead,
        "data_region_name" => CacheProperty::DataRegionName,
        "eager_ttl" => CacheProperty::EagerTtl,
        "statistics_enabled" => CacheProperty::StatisticsEnabled,
        "group_name" => CacheProperty::GroupName,
        "default_lock_timeout" => CacheProperty::DefaultLockTimeout,
        "max_concurrent_async_operations" => CacheProperty::MaxConcurrentAsyncOperations,
        "max_query_iterators" => CacheProperty::MaxQueryIterators,
        "name" => CacheProperty::Name,
        "is_onheap_cache_enabled" => CacheProperty::IsOnheapCacheEnabled,
        "partition_loss_policy" => CacheProperty::PartitionLossPolicy,
        "query_detail_metric_size" => CacheProperty::QueryDetailMetricSize,
        "query_parallelism" => CacheProperty::QueryParallelism,
        "read_from_backup" => CacheProperty::ReadFromBackup,
        "rebalance_batch_size" => CacheProperty::RebalanceBatchSize,
        "rebalance_batches_prefetch_count" => CacheProperty::RebalanceBatchesPrefetchCount,
        "rebalance_delay" => CacheProperty::RebalanceDelay,
        "rebalance_mode" => CacheProperty::RebalanceMode,
        "rebalance_order" => CacheProperty::RebalanceOrder,
        "rebalance_throttle" => CacheProperty::RebalanceThrottle,
        "rebalance_timeout" => CacheProperty::RebalanceTimeout,
        "sql_escape_all" => CacheProperty::SqlEscapeAll,
        "sql_index_inline_max_size" => CacheProperty::SqlIndexInlineMaxSize,
        "sql_schema" => CacheProperty::SqlSchema,
        "write_synchronization_mode" => CacheProperty::WriteSynchronizationMode,
        "cache_key_configuration" => CacheProperty::CacheKeyConfiguration,
        "query_entities" => CacheProperty::QueryEntities,
        _ => return None,
    };
    Some(property)
}

fn default_for(ty: TypeDescriptor) -> Value {
    match ty {
        TypeDescriptor::Bool => Value::Bool(false),
        TypeDescriptor::Int => Value::Int(0),
        TypeDescriptor::Long => Value::Long(0),
        TypeDescriptor::StructArray(_) => Value::Array(Vec::new()),
        _ => Value::Null,
    }
}

fn config_record(properties: &PropertyMap) -> Record {
    CACHE_CONFIG
        .iter()
        .map(|field| {
            let value = config_property(field.name)
                .and_then(|property| properties.get(property).cloned())
                .unwrap_or_else(|| default_for(field.ty));
            (field.name, value)
        })
        .collect()
}

/// Transport that hands every frame to a shared [`FakeNode`].
#[derive(Debug, Clone)]
pub struct MockTransport {
    node: Arc<Mutex<FakeNode>>,
    pending: VecDeque<Vec<u8>>,
}

impl MockTransport {
    pub fn new(node: Arc<Mutex<FakeNode>>) -> Self {
        Self {
            node,
            pending: VecDeque::new(),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        let response = self.node.lock().unwrap().handle(frame);
        self.pending.push_back(response);
        Ok(())
    }

    async fn receive(&mut self) -> Result<BytesMut> {
        self.pending
            .pop_front()
            .map(|frame| BytesMut::from(&frame[..]))
            .ok_or_else(|| IgniteError::Connection("no response pending".to_string()))
    }
}

type Responder = Box<dyn FnMut(&[u8]) -> Option<Vec<u8>> + Send + Sync>;

/// Transport answering each frame with a closure.
///
/// A closure returning `None` leaves the request unanswered: `receive`
/// then waits forever.
pub struct ScriptedTransport {
    responder: Responder,
    pending: VecDeque<Vec<u8>>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: FnMut(&[u8]) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            pending: VecDeque::new(),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Frames sent so far, shared with the transport.
    pub fn sent(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.sent)
    }
}

impl std::fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.sent.lock().unwrap().push(frame.to_vec());
        if let Some(response) = (self.responder)(frame) {
            self.pending.push_back(response);
        }
        Ok(())
    }

    async fn receive(&mut self) -> Result<BytesMut> {
        match self.pending.pop_front() {
            Some(frame) => Ok(BytesMut::from(&frame[..])),
            None => std::future::pending().await,
        }
    }
}

/// Returns the query id of a request frame.
pub fn query_id_of(frame: &[u8]) -> i64 {
    i64::from_le_bytes(frame[6..14].try_into().unwrap())
}

/// Returns the op code of a request frame.
pub fn op_code_of(frame: &[u8]) -> i16 {
    i16::from_le_bytes([frame[4], frame[5]])
}

/// A client wired to a fresh node holding the given caches.
pub fn client_with_caches(names: &[&str]) -> (IgniteClient, Arc<Mutex<FakeNode>>) {
    let node = names
        .iter()
        .fold(FakeNode::new(), |node, name| node.with_cache(name));
    let node = Arc::new(Mutex::new(node));
    let client = IgniteClient::with_transport(
        ClientConfig::default(),
        MockTransport::new(Arc::clone(&node)),
    );
    (client, node)
}

/// Installs a test subscriber once so `RUST_LOG` controls test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
