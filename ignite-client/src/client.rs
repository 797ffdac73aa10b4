//! Ignite client entry point.

use std::sync::Arc;

use ignite_core::cache_config::{create_cache_request, PropertyMap, CACHE_CONFIG};
use ignite_core::protocol::{
    decode_response, op_name, ApiResult, Request, Schema, OP_CACHE_CREATE_WITH_CONFIGURATION,
    OP_CACHE_CREATE_WITH_NAME, OP_CACHE_DESTROY, OP_CACHE_GET_CONFIGURATION, OP_CACHE_GET_NAMES,
    OP_CACHE_GET_OR_CREATE_WITH_CONFIGURATION, OP_CACHE_GET_OR_CREATE_WITH_NAME,
};
use ignite_core::serialization::{Record, TypeDescriptor, Value};
use ignite_core::{cache_id, CacheRef, IgniteError, Result};
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::connection::{with_timeout, Connection, Transport};
use crate::proxy::{take_field, Cache, CacheOptions};

/// Transport plus a flag cleared when an exchange was cut short.
#[derive(Debug)]
struct Channel {
    transport: Box<dyn Transport>,
    in_sync: bool,
}

#[derive(Debug)]
struct ClientInner {
    config: ClientConfig,
    channel: Mutex<Channel>,
}

/// The main entry point for talking to an Ignite node.
///
/// One request/response exchange runs at a time: the transport is held
/// behind an async mutex for the whole send and receive. Cloning the
/// client shares the connection.
///
/// # Example
///
/// ```ignore
/// use ignite_client::{ClientConfig, IgniteClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = IgniteClient::connect(ClientConfig::default()).await?;
///     client.cache_get_or_create("my-cache").await?.into_result()?;
///
///     let cache = client.cache("my-cache");
///     cache.put(1, "one").await?.into_result()?;
///     let value = cache.get(1).await?.into_value();
///
///     client.close().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct IgniteClient {
    inner: Arc<ClientInner>,
}

impl IgniteClient {
    /// Connects to the configured node over TCP and performs the handshake.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The node cannot be reached
    /// - The handshake is rejected
    /// - Connecting takes longer than the connection timeout
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let connection = Connection::connect(&config).await?;
        tracing::info!(
            address = %config.address(),
            version = %config.protocol_version(),
            "connected to Ignite node"
        );
        Ok(Self::with_transport(config, connection))
    }

    /// Creates a client over an already established transport.
    pub fn with_transport<T: Transport + 'static>(config: ClientConfig, transport: T) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                channel: Mutex::new(Channel {
                    transport: Box::new(transport),
                    in_sync: true,
                }),
            }),
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Sends a request and decodes the response body with `response_schema`.
    ///
    /// A nonzero status is not an `Err`: it comes back as a failed
    /// [`ApiResult`] carrying the server's message. `Err` is reserved for
    /// transport, codec and protocol failures, including a response whose
    /// query id differs from the request's.
    pub async fn execute(
        &self,
        request: Request,
        response_schema: &Schema,
    ) -> Result<ApiResult<Record>> {
        let op_code = request.op_code();
        let query_id = request.query_id();
        let frame = request.encode()?;

        tracing::trace!(
            op = op_name(op_code),
            op_code,
            query_id,
            len = frame.len(),
            "sending request"
        );

        let timeout = self.inner.config.request_timeout();
        let bytes = {
            let mut channel = self.inner.channel.lock().await;
            if !channel.in_sync {
                return Err(IgniteError::Connection(
                    "connection is unusable after an interrupted request".to_string(),
                ));
            }

            channel.in_sync = false;
            let exchange = async {
                channel.transport.send(&frame).await?;
                channel.transport.receive().await
            };
            let bytes = with_timeout(timeout, exchange, || {
                format!(
                    "{} (query {}) timed out after {:?}",
                    op_name(op_code),
                    query_id,
                    timeout
                )
            })
            .await?;
            channel.in_sync = true;
            bytes
        };

        let response = decode_response(response_schema, &bytes)?;
        if response.query_id != query_id {
            return Err(IgniteError::Protocol(format!(
                "response query id {} does not match request query id {}",
                response.query_id, query_id
            )));
        }

        let result = ApiResult::from_response(response);
        if result.is_success() {
            tracing::trace!(op = op_name(op_code), query_id, "request succeeded");
        } else {
            tracing::warn!(
                op = op_name(op_code),
                query_id,
                status = result.status(),
                error = result.message(),
                "request failed"
            );
        }
        Ok(result)
    }

    /// Returns a handle to a cache. Nothing is sent to the node.
    pub fn cache<'a>(&self, cache: impl Into<CacheRef<'a>>) -> Cache {
        Cache::new(self.clone(), cache, CacheOptions::default())
    }

    /// Returns a cache handle using the given options.
    pub fn cache_with_options<'a>(
        &self,
        cache: impl Into<CacheRef<'a>>,
        options: CacheOptions,
    ) -> Cache {
        Cache::new(self.clone(), cache, options)
    }

    /// Lists the names of all caches on the node.
    pub async fn cache_get_names(&self) -> Result<ApiResult<Vec<String>>> {
        let schema = Schema::empty().with("cache_names", TypeDescriptor::StringArray);
        self.execute(Request::new(OP_CACHE_GET_NAMES), &schema)
            .await?
            .try_map(|mut record| match take_field(&mut record, "cache_names")? {
                Value::Null => Ok(Vec::new()),
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(name) => Ok(name),
                        other => Err(IgniteError::Decode(format!(
                            "expected a cache name, found {}",
                            other.kind()
                        ))),
                    })
                    .collect(),
                other => Err(IgniteError::Decode(format!(
                    "expected a string array, found {}",
                    other.kind()
                ))),
            })
    }

    /// Creates a cache with default settings. Fails if it already exists.
    pub async fn cache_create(&self, name: &str) -> Result<ApiResult<()>> {
        self.named_cache_request(OP_CACHE_CREATE_WITH_NAME, name).await
    }

    /// Creates a cache with default settings unless it already exists.
    pub async fn cache_get_or_create(&self, name: &str) -> Result<ApiResult<()>> {
        self.named_cache_request(OP_CACHE_GET_OR_CREATE_WITH_NAME, name)
            .await
    }

    /// Destroys a cache.
    pub async fn cache_destroy<'a>(&self, cache: impl Into<CacheRef<'a>>) -> Result<ApiResult<()>> {
        let request =
            Request::new(OP_CACHE_DESTROY).field("hash_code", TypeDescriptor::Int, cache_id(cache));
        self.execute_unit(request).await
    }

    /// Reads the configuration of a cache.
    ///
    /// The value is the `cache_config` record: `length` followed by the
    /// configuration fields in wire order.
    pub async fn cache_get_configuration<'a>(
        &self,
        cache: impl Into<CacheRef<'a>>,
    ) -> Result<ApiResult<Record>> {
        let request = Request::new(OP_CACHE_GET_CONFIGURATION)
            .field("hash_code", TypeDescriptor::Int, cache_id(cache))
            .field("flags", TypeDescriptor::Byte, Value::Byte(0));
        let schema = Schema::empty().with("cache_config", TypeDescriptor::Struct(CACHE_CONFIG));
        self.execute(request, &schema)
            .await?
            .try_map(|mut record| match take_field(&mut record, "cache_config")? {
                Value::Struct(config) => Ok(config),
                other => Err(IgniteError::Decode(format!(
                    "expected a cache configuration, found {}",
                    other.kind()
                ))),
            })
    }

    /// Creates a cache from a property map. Fails if it already exists.
    ///
    /// The map must contain the name property.
    pub async fn cache_create_with_config(
        &self,
        properties: &PropertyMap,
    ) -> Result<ApiResult<()>> {
        let request = create_cache_request(OP_CACHE_CREATE_WITH_CONFIGURATION, properties)?;
        self.execute_unit(request).await
    }

    /// Creates a cache from a property map unless it already exists.
    pub async fn cache_get_or_create_with_config(
        &self,
        properties: &PropertyMap,
    ) -> Result<ApiResult<()>> {
        let request =
            create_cache_request(OP_CACHE_GET_OR_CREATE_WITH_CONFIGURATION, properties)?;
        self.execute_unit(request).await
    }

    /// Closes the transport. Later requests fail with a connection error.
    pub async fn close(&self) -> Result<()> {
        let mut channel = self.inner.channel.lock().await;
        channel.in_sync = false;
        tracing::info!(address = %self.inner.config.address(), "closing Ignite client");
        channel.transport.close().await
    }

    async fn named_cache_request(&self, op_code: i16, name: &str) -> Result<ApiResult<()>> {
        let request = Request::new(op_code).field("cache_name", TypeDescriptor::String, name);
        self.execute_unit(request).await
    }

    pub(crate) async fn execute_unit(&self, request: Request) -> Result<ApiResult<()>> {
        Ok(self.execute(request, &Schema::empty()).await?.without_value())
    }
}
