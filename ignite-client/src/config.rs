//! Client configuration types and builders.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use ignite_core::protocol::{ProtocolVersion, DEFAULT_MAX_FRAME_LENGTH, RESPONSE_HEADER_SIZE};

/// Default thin-client port of an Ignite node.
pub const DEFAULT_PORT: u16 = 10800;
/// Default connection timeout.
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
/// Default time allowed for one request/response exchange.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn default_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT))
}

/// Configuration error returned when validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ignite_core::IgniteError {
    fn from(error: ConfigError) -> Self {
        ignite_core::IgniteError::Configuration(error.message)
    }
}

/// Main client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    address: SocketAddr,
    connection_timeout: Duration,
    request_timeout: Duration,
    protocol_version: ProtocolVersion,
    max_frame_length: usize,
    tcp_nodelay: bool,
}

impl ClientConfig {
    /// Creates a new client configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the address of the node to connect to.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Returns the connection timeout, covering TCP connect and handshake.
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Returns the time allowed for one request/response exchange.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the protocol version offered in the handshake.
    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    /// Returns the largest accepted response frame.
    pub fn max_frame_length(&self) -> usize {
        self.max_frame_length
    }

    /// Returns whether `TCP_NODELAY` is set on the socket.
    pub fn tcp_nodelay(&self) -> bool {
        self.tcp_nodelay
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            protocol_version: ProtocolVersion::default(),
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
            tcp_nodelay: true,
        }
    }
}

/// Builder for `ClientConfig`.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    address: Option<SocketAddr>,
    connection_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    protocol_version: Option<ProtocolVersion>,
    max_frame_length: Option<usize>,
    tcp_nodelay: Option<bool>,
}

impl ClientConfigBuilder {
    /// Creates a new client configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node address.
    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = Some(address);
        self
    }

    /// Sets the node address from an `ip:port` string.
    pub fn address_str(self, address: &str) -> Result<Self, ConfigError> {
        let address = address
            .parse()
            .map_err(|e| ConfigError::new(format!("invalid address '{}': {}", address, e)))?;
        Ok(self.address(address))
    }

    /// Sets the connection timeout.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    /// Sets the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the protocol version offered in the handshake.
    pub fn protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = Some(version);
        self
    }

    /// Sets the largest accepted response frame.
    pub fn max_frame_length(mut self, max_frame_length: usize) -> Self {
        self.max_frame_length = Some(max_frame_length);
        self
    }

    /// Enables or disables `TCP_NODELAY`.
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = Some(enabled);
        self
    }

    /// Builds the client configuration, returning an error if validation fails.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let defaults = ClientConfig::default();

        let connection_timeout = self
            .connection_timeout
            .unwrap_or(defaults.connection_timeout);
        if connection_timeout.is_zero() {
            return Err(ConfigError::new("connection_timeout must be positive"));
        }

        let request_timeout = self.request_timeout.unwrap_or(defaults.request_timeout);
        if request_timeout.is_zero() {
            return Err(ConfigError::new("request_timeout must be positive"));
        }

        let max_frame_length = self.max_frame_length.unwrap_or(defaults.max_frame_length);
        if max_frame_length < RESPONSE_HEADER_SIZE {
            return Err(ConfigError::new(format!(
                "max_frame_length must be at least {}",
                RESPONSE_HEADER_SIZE
            )));
        }
        if i32::try_from(max_frame_length).is_err() {
            return Err(ConfigError::new("max_frame_length must fit a 32-bit length"));
        }

        let protocol_version = self.protocol_version.unwrap_or(defaults.protocol_version);
        if protocol_version.major < 1 {
            return Err(ConfigError::new(format!(
                "unsupported protocol version {}",
                protocol_version
            )));
        }

        let address = self.address.unwrap_or(defaults.address);
        if address.port() == 0 {
            return Err(ConfigError::new("port must not be zero"));
        }

        Ok(ClientConfig {
            address,
            connection_timeout,
            request_timeout,
            protocol_version,
            max_frame_length,
            tcp_nodelay: self.tcp_nodelay.unwrap_or(defaults.tcp_nodelay),
        })
    }
}
