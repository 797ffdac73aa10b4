//! Ignite thin-client binary protocol.
//!
//! This module provides the schema-driven message codec, the handshake and
//! the framing codec used on the wire.

mod codec;
pub mod constants;
mod handshake;
mod message;
mod result;
mod schema;

pub use codec::{FrameCodec, DEFAULT_MAX_FRAME_LENGTH};
pub use constants::*;
pub use handshake::{
    decode_handshake, decode_handshake_response, encode_handshake, encode_handshake_response,
    HandshakeResponse, ProtocolVersion,
};
pub use message::{
    decode_config_request, decode_request, decode_response, encode_config_request,
    encode_request, encode_response, next_query_id, Request, Response, ResponseBody,
};
pub use result::ApiResult;
pub use schema::{Field, Schema};
