//! Byte transport carrying request and response frames.

use async_trait::async_trait;
use bytes::BytesMut;
use ignite_core::Result;

/// A bidirectional channel to one Ignite node.
///
/// `send` writes one complete request frame. `receive` returns the next
/// complete response frame, length prefix included. Failures are reported
/// as [`IgniteError::Connection`](ignite_core::IgniteError::Connection) and
/// passed to callers unchanged.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends one frame.
    async fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Receives one frame.
    async fn receive(&mut self) -> Result<BytesMut>;

    /// Releases the underlying resources.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame).await
    }

    async fn receive(&mut self) -> Result<BytesMut> {
        (**self).receive().await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}
