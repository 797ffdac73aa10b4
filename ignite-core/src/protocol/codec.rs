//! Framing codec splitting a byte stream into length-prefixed frames.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::constants::SIZE_OF_LENGTH_FIELD;
use crate::error::{IgniteError, Result};

/// Default upper bound on a single frame.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 64 * 1024 * 1024;

/// Codec for `[i32 length][payload]` frames.
///
/// Decoded frames keep their length prefix, so they can be handed directly
/// to [`decode_response`](super::decode_response). Encoded frames must
/// already carry a prefix matching their size.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_length: usize,
}

impl FrameCodec {
    /// Creates a codec with the default frame limit.
    pub fn new() -> Self {
        Self::with_max_frame_length(DEFAULT_MAX_FRAME_LENGTH)
    }

    /// Creates a codec rejecting frames longer than `max_frame_length`.
    pub fn with_max_frame_length(max_frame_length: usize) -> Self {
        Self { max_frame_length }
    }

    /// Returns the frame limit.
    pub fn max_frame_length(&self) -> usize {
        self.max_frame_length
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = IgniteError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < SIZE_OF_LENGTH_FIELD {
            return Ok(None);
        }

        let length = i32::from_le_bytes([src[0], src[1], src[2], src[3]]);
        let length = usize::try_from(length).map_err(|_| {
            IgniteError::Protocol(format!("negative frame length {}", length))
        })?;
        if length > self.max_frame_length {
            return Err(IgniteError::Protocol(format!(
                "frame length {} exceeds limit {}",
                length, self.max_frame_length
            )));
        }

        let total = SIZE_OF_LENGTH_FIELD + length;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }
        Ok(Some(src.split_to(total)))
    }
}

impl Encoder<Vec<u8>> for FrameCodec {
    type Error = IgniteError;

    fn encode(&mut self, item: Vec<u8>, dst: &mut BytesMut) -> Result<()> {
        <Self as Encoder<&[u8]>>::encode(self, item.as_slice(), dst)
    }
}

impl Encoder<&[u8]> for FrameCodec {
    type Error = IgniteError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<()> {
        let mut header = item;
        if header.remaining() < SIZE_OF_LENGTH_FIELD {
            return Err(IgniteError::Encode(
                "frame is shorter than its length prefix".to_string(),
            ));
        }
        let declared = header.get_i32_le();
        if usize::try_from(declared).ok() != Some(header.remaining()) {
            return Err(IgniteError::Encode(format!(
                "frame length prefix {} does not match {} payload bytes",
                declared,
                header.remaining()
            )));
        }
        dst.extend_from_slice(item);
        Ok(())
    }
}
