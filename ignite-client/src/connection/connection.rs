//! TCP connection to a single Ignite node.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use ignite_core::protocol::{
    decode_handshake_response, encode_handshake, FrameCodec, ProtocolVersion,
};
use ignite_core::{IgniteError, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::Decoder;

use super::transport::Transport;
use crate::config::ClientConfig;

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generates a new unique connection ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A handshaken connection to one Ignite node.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    address: SocketAddr,
    stream: TcpStream,
    codec: FrameCodec,
    read_buffer: BytesMut,
}

impl Connection {
    /// Wraps an established TCP stream. No handshake is performed.
    pub fn new(stream: TcpStream, address: SocketAddr, codec: FrameCodec) -> Self {
        Self {
            id: ConnectionId::new(),
            address,
            stream,
            codec,
            read_buffer: BytesMut::with_capacity(8192),
        }
    }

    /// Returns the connection's unique identifier.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the remote address of this connection.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Connects to the configured node and performs the handshake.
    ///
    /// The connection timeout covers both the TCP connect and the
    /// handshake exchange.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let address = config.address();
        let timeout = config.connection_timeout();

        let connect = async {
            let stream = TcpStream::connect(address).await.map_err(|e| {
                IgniteError::Connection(format!("failed to connect to {}: {}", address, e))
            })?;

            if config.tcp_nodelay() {
                stream.set_nodelay(true).map_err(|e| {
                    IgniteError::Connection(format!("failed to set TCP_NODELAY: {}", e))
                })?;
            }

            let codec = FrameCodec::with_max_frame_length(config.max_frame_length());
            let mut connection = Self::new(stream, address, codec);
            tracing::debug!(id = %connection.id, address = %address, "established connection");

            connection.handshake(config.protocol_version()).await?;
            Ok(connection)
        };

        with_timeout(timeout, connect, || {
            format!("connecting to {} timed out after {:?}", address, timeout)
        })
        .await
    }

    /// Offers `version` to the node and waits for its answer.
    ///
    /// A rejection becomes [`IgniteError::Protocol`] carrying the server's
    /// version and message.
    pub async fn handshake(&mut self, version: ProtocolVersion) -> Result<()> {
        let request = encode_handshake(version)?;
        self.write_frame(&request).await?;

        let response = self.read_frame().await?;
        let outcome = decode_handshake_response(&response)?;
        match outcome.into_result() {
            Ok(()) => {
                tracing::debug!(id = %self.id, version = %version, "handshake accepted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "handshake rejected");
                Err(e)
            }
        }
    }

    async fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.stream.write_all(frame).await.map_err(|e| {
            IgniteError::Connection(format!("failed to write to {}: {}", self.address, e))
        })
    }

    async fn read_frame(&mut self) -> Result<BytesMut> {
        loop {
            if let Some(frame) = self.codec.decode(&mut self.read_buffer)? {
                return Ok(frame);
            }

            let bytes_read = self.stream.read_buf(&mut self.read_buffer).await.map_err(|e| {
                IgniteError::Connection(format!("failed to read from {}: {}", self.address, e))
            })?;

            if bytes_read == 0 {
                return Err(IgniteError::Connection(format!(
                    "connection to {} closed{}",
                    self.address,
                    if self.read_buffer.is_empty() {
                        ""
                    } else {
                        " in the middle of a frame"
                    }
                )));
            }
        }
    }

    /// Closes this connection.
    pub async fn shutdown(mut self) -> Result<()> {
        self.close().await
    }
}

#[async_trait]
impl Transport for Connection {
    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        let mut buf = BytesMut::with_capacity(frame.len());
        tokio_util::codec::Encoder::<&[u8]>::encode(&mut self.codec, frame, &mut buf)?;
        self.write_frame(&buf).await
    }

    async fn receive(&mut self) -> Result<BytesMut> {
        self.read_frame().await
    }

    async fn close(&mut self) -> Result<()> {
        match self.stream.shutdown().await {
            Ok(()) => {
                tracing::debug!(id = %self.id, address = %self.address, "connection closed");
                Ok(())
            }
            Err(e) => {
                tracing::debug!(id = %self.id, error = %e, "connection shutdown failed");
                Err(IgniteError::Connection(format!(
                    "failed to close connection to {}: {}",
                    self.address, e
                )))
            }
        }
    }
}

pub(crate) async fn with_timeout<T, F, M>(duration: Duration, future: F, message: M) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
    M: FnOnce() -> String,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(IgniteError::Timeout(message())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignite_core::protocol::{decode_handshake, encode_handshake_response, HandshakeResponse};
    use tokio::net::TcpListener;

    #[test]
    fn test_connection_id_uniqueness() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        let id3 = ConnectionId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId(42);
        assert_eq!(id.to_string(), "conn-42");
    }

    async fn serve_handshake(listener: TcpListener, answer: HandshakeResponse) {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 12];
        socket.read_exact(&mut request).await.unwrap();
        assert_eq!(decode_handshake(&request).unwrap(), ProtocolVersion::new(1, 0, 0));
        socket
            .write_all(&encode_handshake_response(&answer).unwrap())
            .await
            .unwrap();
        let mut rest = Vec::new();
        let _ = socket.read_to_end(&mut rest).await;
    }

    fn config_for(address: SocketAddr) -> ClientConfig {
        ClientConfig::builder()
            .address(address)
            .connection_timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_accepted() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_handshake(listener, HandshakeResponse::Accepted));

        let connection = Connection::connect(&config_for(address)).await.unwrap();
        assert_eq!(connection.address(), address);
        connection.shutdown().await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_close_reaches_peer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 12];
            socket.read_exact(&mut request).await.unwrap();
            socket
                .write_all(&encode_handshake_response(&HandshakeResponse::Accepted).unwrap())
                .await
                .unwrap();
            let mut rest = Vec::new();
            socket.read_to_end(&mut rest).await.unwrap();
            rest
        });

        let mut connection = Connection::connect(&config_for(address)).await.unwrap();
        connection.close().await.unwrap();
        assert!(server.await.unwrap().is_empty());

        let err = connection.send(&[0, 0, 0, 0]).await.unwrap_err();
        assert!(matches!(err, IgniteError::Connection(_)));
    }

    #[tokio::test]
    async fn test_connect_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_handshake(
            listener,
            HandshakeResponse::Rejected {
                server_version: ProtocolVersion::new(1, 2, 0),
                message: "unsupported version".to_string(),
            },
        ));

        let err = Connection::connect(&config_for(address)).await.unwrap_err();
        match err {
            IgniteError::Protocol(message) => {
                assert!(message.contains("1.2.0"));
                assert!(message.contains("unsupported version"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let err = Connection::connect(&config_for(address)).await.unwrap_err();
        assert!(matches!(err, IgniteError::Connection(_)));
    }

    #[tokio::test]
    async fn test_handshake_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(socket);
        });

        let config = ClientConfig::builder()
            .address(address)
            .connection_timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let err = Connection::connect(&config).await.unwrap_err();
        assert!(matches!(err, IgniteError::Timeout(_)));
        server.await.unwrap();
    }
}
