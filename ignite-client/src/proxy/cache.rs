//! Key-value operations on a single cache.

use ignite_core::cache_config::PeekMode;
use ignite_core::protocol::{
    ApiResult, Request, Schema, OP_CACHE_CLEAR, OP_CACHE_CLEAR_KEY, OP_CACHE_CLEAR_KEYS,
    OP_CACHE_CONTAINS_KEY, OP_CACHE_CONTAINS_KEYS, OP_CACHE_GET, OP_CACHE_GET_ALL,
    OP_CACHE_GET_AND_PUT, OP_CACHE_GET_AND_PUT_IF_ABSENT, OP_CACHE_GET_AND_REMOVE,
    OP_CACHE_GET_AND_REPLACE, OP_CACHE_GET_SIZE, OP_CACHE_PUT, OP_CACHE_PUT_ALL,
    OP_CACHE_PUT_IF_ABSENT, OP_CACHE_REMOVE_ALL, OP_CACHE_REMOVE_IF_EQUALS, OP_CACHE_REMOVE_KEY,
    OP_CACHE_REMOVE_KEYS, OP_CACHE_REPLACE, OP_CACHE_REPLACE_IF_EQUALS, FLAG_KEEP_BINARY,
};
use ignite_core::serialization::{TypeDescriptor, Value};
use ignite_core::{cache_id, CacheRef, Result};

use super::{into_bool, into_entries, into_long, take_field};
use crate::client::IgniteClient;

/// Per-cache request options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    binary: bool,
}

impl CacheOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps complex values in binary form on the server.
    pub fn binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Returns true if values are kept in binary form.
    pub fn is_binary(&self) -> bool {
        self.binary
    }

    fn flag(&self) -> i8 {
        if self.binary {
            FLAG_KEEP_BINARY
        } else {
            0
        }
    }
}

/// Handle to one cache on the node.
///
/// Every operation returns `Ok(ApiResult)` once the node has answered,
/// whatever the status; use [`ApiResult::into_result`] to turn a failed
/// status into an error.
///
/// # Example
///
/// ```ignore
/// let cache = client.cache("people");
///
/// cache.put(1, "Ann").await?.into_result()?;
/// assert!(cache.contains_key(1).await?.into_value().unwrap_or(false));
///
/// let old = cache.get_and_replace(1, "Bob").await?.into_value();
/// assert_eq!(old, Some(Value::from("Ann")));
/// ```
#[derive(Debug, Clone)]
pub struct Cache {
    client: IgniteClient,
    name: Option<String>,
    cache_id: i32,
    options: CacheOptions,
}

impl Cache {
    pub(crate) fn new<'a>(
        client: IgniteClient,
        cache: impl Into<CacheRef<'a>>,
        options: CacheOptions,
    ) -> Self {
        let cache = cache.into();
        let name = match cache {
            CacheRef::Name(name) => Some(name.to_string()),
            CacheRef::Id(_) => None,
        };
        Self {
            client,
            name,
            cache_id: cache_id(cache),
            options,
        }
    }

    /// Returns the cache name, if the handle was created from one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the cache identifier sent with every request.
    pub fn cache_id(&self) -> i32 {
        self.cache_id
    }

    /// Returns the request options.
    pub fn options(&self) -> CacheOptions {
        self.options
    }

    /// Returns a handle to the same cache with other options.
    pub fn with_options(&self, options: CacheOptions) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    /// Retrieves the value of a key; `Value::Null` when absent.
    pub async fn get(&self, key: impl Into<Value>) -> Result<ApiResult<Value>> {
        let request = self.request(OP_CACHE_GET).field("key", TypeDescriptor::Any, key);
        self.value(request).await
    }

    /// Stores a value.
    pub async fn put(&self, key: impl Into<Value>, value: impl Into<Value>) -> Result<ApiResult<()>> {
        let request = self
            .request(OP_CACHE_PUT)
            .field("key", TypeDescriptor::Any, key)
            .field("value", TypeDescriptor::Any, value);
        self.client.execute_unit(request).await
    }

    /// Stores a value unless the key is present. True if it was stored.
    pub async fn put_if_absent(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<ApiResult<bool>> {
        let request = self
            .request(OP_CACHE_PUT_IF_ABSENT)
            .field("key", TypeDescriptor::Any, key)
            .field("value", TypeDescriptor::Any, value);
        self.success(request).await
    }

    /// Retrieves the values of several keys. Absent keys are left out.
    pub async fn get_all<K, I>(&self, keys: I) -> Result<ApiResult<Vec<(Value, Value)>>>
    where
        K: Into<Value>,
        I: IntoIterator<Item = K>,
    {
        let request = self
            .request(OP_CACHE_GET_ALL)
            .field("keys", TypeDescriptor::AnyArray, values(keys));
        let schema = Schema::empty().with("data", TypeDescriptor::Map);
        self.client
            .execute(request, &schema)
            .await?
            .try_map(|mut record| into_entries(take_field(&mut record, "data")?))
    }

    /// Stores several entries.
    pub async fn put_all<K, V, I>(&self, entries: I) -> Result<ApiResult<()>>
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let data = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let request = self
            .request(OP_CACHE_PUT_ALL)
            .field("data", TypeDescriptor::Map, Value::Map(data));
        self.client.execute_unit(request).await
    }

    /// Stores a value and returns the previous one.
    pub async fn get_and_put(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<ApiResult<Value>> {
        self.key_value_returning(OP_CACHE_GET_AND_PUT, key, value).await
    }

    /// Replaces the value of a present key and returns the previous one.
    pub async fn get_and_replace(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<ApiResult<Value>> {
        self.key_value_returning(OP_CACHE_GET_AND_REPLACE, key, value)
            .await
    }

    /// Removes a key and returns its value.
    pub async fn get_and_remove(&self, key: impl Into<Value>) -> Result<ApiResult<Value>> {
        let request = self
            .request(OP_CACHE_GET_AND_REMOVE)
            .field("key", TypeDescriptor::Any, key);
        self.value(request).await
    }

    /// Stores a value unless the key is present; returns the current value.
    pub async fn get_and_put_if_absent(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<ApiResult<Value>> {
        self.key_value_returning(OP_CACHE_GET_AND_PUT_IF_ABSENT, key, value)
            .await
    }

    /// Replaces the value of a present key. True if it was replaced.
    pub async fn replace(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<ApiResult<bool>> {
        let request = self
            .request(OP_CACHE_REPLACE)
            .field("key", TypeDescriptor::Any, key)
            .field("value", TypeDescriptor::Any, value);
        self.success(request).await
    }

    /// Replaces the value of a key only if it currently equals `sample`.
    pub async fn replace_if_equals(
        &self,
        key: impl Into<Value>,
        sample: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<ApiResult<bool>> {
        let request = self
            .request(OP_CACHE_REPLACE_IF_EQUALS)
            .field("key", TypeDescriptor::Any, key)
            .field("sample", TypeDescriptor::Any, sample)
            .field("value", TypeDescriptor::Any, value);
        self.success(request).await
    }

    /// Checks whether a key is present.
    pub async fn contains_key(&self, key: impl Into<Value>) -> Result<ApiResult<bool>> {
        let request = self
            .request(OP_CACHE_CONTAINS_KEY)
            .field("key", TypeDescriptor::Any, key);
        self.flag_value(request).await
    }

    /// Checks whether every key is present.
    pub async fn contains_keys<K, I>(&self, keys: I) -> Result<ApiResult<bool>>
    where
        K: Into<Value>,
        I: IntoIterator<Item = K>,
    {
        let request = self
            .request(OP_CACHE_CONTAINS_KEYS)
            .field("keys", TypeDescriptor::AnyArray, values(keys));
        self.flag_value(request).await
    }

    /// Clears the cache without notifying listeners or writers.
    pub async fn clear(&self) -> Result<ApiResult<()>> {
        self.client.execute_unit(self.request(OP_CACHE_CLEAR)).await
    }

    /// Clears one key without notifying listeners or writers.
    pub async fn clear_key(&self, key: impl Into<Value>) -> Result<ApiResult<()>> {
        let request = self
            .request(OP_CACHE_CLEAR_KEY)
            .field("key", TypeDescriptor::Any, key);
        self.client.execute_unit(request).await
    }

    /// Clears several keys without notifying listeners or writers.
    pub async fn clear_keys<K, I>(&self, keys: I) -> Result<ApiResult<()>>
    where
        K: Into<Value>,
        I: IntoIterator<Item = K>,
    {
        let request = self
            .request(OP_CACHE_CLEAR_KEYS)
            .field("keys", TypeDescriptor::AnyArray, values(keys));
        self.client.execute_unit(request).await
    }

    /// Removes a key. True if it was present.
    pub async fn remove_key(&self, key: impl Into<Value>) -> Result<ApiResult<bool>> {
        let request = self
            .request(OP_CACHE_REMOVE_KEY)
            .field("key", TypeDescriptor::Any, key);
        self.success(request).await
    }

    /// Removes a key only if its value equals `sample`.
    pub async fn remove_if_equals(
        &self,
        key: impl Into<Value>,
        sample: impl Into<Value>,
    ) -> Result<ApiResult<bool>> {
        let request = self
            .request(OP_CACHE_REMOVE_IF_EQUALS)
            .field("key", TypeDescriptor::Any, key)
            .field("sample", TypeDescriptor::Any, sample);
        self.success(request).await
    }

    /// Removes several keys, notifying listeners and writers.
    pub async fn remove_keys<K, I>(&self, keys: I) -> Result<ApiResult<()>>
    where
        K: Into<Value>,
        I: IntoIterator<Item = K>,
    {
        let request = self
            .request(OP_CACHE_REMOVE_KEYS)
            .field("keys", TypeDescriptor::AnyArray, values(keys));
        self.client.execute_unit(request).await
    }

    /// Removes every entry, notifying listeners and writers.
    pub async fn remove_all(&self) -> Result<ApiResult<()>> {
        self.client
            .execute_unit(self.request(OP_CACHE_REMOVE_ALL))
            .await
    }

    /// Counts entries. An empty `peek_modes` counts every copy.
    pub async fn get_size(&self, peek_modes: &[PeekMode]) -> Result<ApiResult<i64>> {
        let modes = peek_modes.iter().map(|mode| mode.as_i8() as u8).collect();
        let request = self.request(OP_CACHE_GET_SIZE).field(
            "peek_modes",
            TypeDescriptor::ByteArray,
            Value::Bytes(modes),
        );
        let schema = Schema::empty().with("count", TypeDescriptor::Long);
        self.client
            .execute(request, &schema)
            .await?
            .try_map(|mut record| into_long(take_field(&mut record, "count")?))
    }

    fn request(&self, op_code: i16) -> Request {
        Request::new(op_code)
            .field("hash_code", TypeDescriptor::Int, self.cache_id)
            .field("flag", TypeDescriptor::Byte, Value::Byte(self.options.flag()))
    }

    async fn key_value_returning(
        &self,
        op_code: i16,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<ApiResult<Value>> {
        let request = self
            .request(op_code)
            .field("key", TypeDescriptor::Any, key)
            .field("value", TypeDescriptor::Any, value);
        self.value(request).await
    }

    async fn value(&self, request: Request) -> Result<ApiResult<Value>> {
        let schema = Schema::empty().with("value", TypeDescriptor::Any);
        self.client
            .execute(request, &schema)
            .await?
            .try_map(|mut record| take_field(&mut record, "value"))
    }

    async fn success(&self, request: Request) -> Result<ApiResult<bool>> {
        self.bool_field(request, "success").await
    }

    async fn flag_value(&self, request: Request) -> Result<ApiResult<bool>> {
        self.bool_field(request, "value").await
    }

    async fn bool_field(&self, request: Request, name: &'static str) -> Result<ApiResult<bool>> {
        let schema = Schema::empty().with(name, TypeDescriptor::Bool);
        self.client
            .execute(request, &schema)
            .await?
            .try_map(|mut record| into_bool(take_field(&mut record, name)?))
    }
}

fn values<K: Into<Value>, I: IntoIterator<Item = K>>(items: I) -> Value {
    Value::Array(items.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::connection::Transport;
    use async_trait::async_trait;
    use bytes::BytesMut;
    use ignite_core::IgniteError;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&mut self, _frame: &[u8]) -> Result<()> {
            Err(IgniteError::Connection("unreachable".to_string()))
        }

        async fn receive(&mut self) -> Result<BytesMut> {
            Err(IgniteError::Connection("unreachable".to_string()))
        }
    }

    fn client() -> IgniteClient {
        IgniteClient::with_transport(ClientConfig::default(), Unreachable)
    }

    #[test]
    fn test_cache_by_name() {
        let cache = client().cache("my-cache");
        assert_eq!(cache.name(), Some("my-cache"));
        assert_eq!(cache.cache_id(), ignite_core::hash_code("my-cache"));
        assert!(!cache.options().is_binary());
    }

    #[test]
    fn test_cache_by_id() {
        let cache = client().cache(42i32);
        assert_eq!(cache.name(), None);
        assert_eq!(cache.cache_id(), 42);
    }

    #[test]
    fn test_request_prefix() {
        let cache = client().cache_with_options("c", CacheOptions::new().binary(true));
        let request = cache.request(OP_CACHE_GET);
        assert_eq!(request.get("hash_code"), Some(&Value::Int(ignite_core::hash_code("c"))));
        assert_eq!(request.get("flag"), Some(&Value::Byte(1)));

        let plain = cache.with_options(CacheOptions::default()).request(OP_CACHE_GET);
        assert_eq!(plain.get("flag"), Some(&Value::Byte(0)));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let cache = client().cache("c");
        let err = cache.get(1).await.unwrap_err();
        assert!(matches!(err, IgniteError::Connection(m) if m == "unreachable"));
    }
}
