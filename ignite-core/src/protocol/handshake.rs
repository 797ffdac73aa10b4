//! Connection handshake.
//!
//! ```text
//! request:  [i32 8][u8 1][i16 major][i16 minor][i16 patch][u8 2]
//! accepted: [i32 1][u8 1]
//! rejected: [i32 len][u8 0][i16 major][i16 minor][i16 patch][tagged string]
//! ```

use std::fmt;

use super::constants::{
    HANDSHAKE_OP, PROTOCOL_VERSION_MAJOR, PROTOCOL_VERSION_MINOR, PROTOCOL_VERSION_PATCH,
    SIZE_OF_LENGTH_FIELD, THIN_CLIENT_CODE,
};
use crate::error::{IgniteError, Result};
use crate::serialization::{
    wire_len, DataInput, DataOutput, ObjectDataInput, ObjectDataOutput, TypeDescriptor, Value,
};

/// A thin-client protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    /// Major version.
    pub major: i16,
    /// Minor version.
    pub minor: i16,
    /// Patch version.
    pub patch: i16,
}

impl ProtocolVersion {
    /// Creates a version.
    pub const fn new(major: i16, minor: i16, patch: i16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::new(
            PROTOCOL_VERSION_MAJOR,
            PROTOCOL_VERSION_MINOR,
            PROTOCOL_VERSION_PATCH,
        )
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The server's answer to a handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeResponse {
    /// The server accepted the requested version.
    Accepted,
    /// The server rejected it and announced the version it speaks.
    Rejected {
        /// Version supported by the server.
        server_version: ProtocolVersion,
        /// Reason given by the server.
        message: String,
    },
}

impl HandshakeResponse {
    /// Converts a rejection into a protocol error.
    pub fn into_result(self) -> Result<()> {
        match self {
            HandshakeResponse::Accepted => Ok(()),
            HandshakeResponse::Rejected {
                server_version,
                message,
            } => Err(IgniteError::Protocol(format!(
                "handshake rejected (server version {}): {}",
                server_version, message
            ))),
        }
    }
}

/// Encodes a handshake request for the given version.
pub fn encode_handshake(version: ProtocolVersion) -> Result<Vec<u8>> {
    let mut out = ObjectDataOutput::with_capacity(12);
    out.write_int(0)?;
    out.write_u8(HANDSHAKE_OP)?;
    out.write_short(version.major)?;
    out.write_short(version.minor)?;
    out.write_short(version.patch)?;
    out.write_u8(THIN_CLIENT_CODE)?;
    out.patch_int(0, wire_len(out.len() - SIZE_OF_LENGTH_FIELD)?)?;
    Ok(out.into_bytes())
}

/// Decodes a handshake request, returning the requested version.
pub fn decode_handshake(bytes: &[u8]) -> Result<ProtocolVersion> {
    let mut input = framed(bytes)?;
    let op = input.read_u8()?;
    if op != HANDSHAKE_OP {
        return Err(IgniteError::Decode(format!("not a handshake request: {}", op)));
    }
    let version = read_version(&mut input)?;
    let client_code = input.read_u8()?;
    if client_code != THIN_CLIENT_CODE {
        return Err(IgniteError::Decode(format!(
            "unexpected client code {}",
            client_code
        )));
    }
    Ok(version)
}

/// Encodes the server side of a handshake.
pub fn encode_handshake_response(response: &HandshakeResponse) -> Result<Vec<u8>> {
    let mut out = ObjectDataOutput::new();
    out.write_int(0)?;
    match response {
        HandshakeResponse::Accepted => out.write_bool(true)?,
        HandshakeResponse::Rejected {
            server_version,
            message,
        } => {
            out.write_bool(false)?;
            out.write_short(server_version.major)?;
            out.write_short(server_version.minor)?;
            out.write_short(server_version.patch)?;
            TypeDescriptor::String.write(&mut out, &Value::from(message.as_str()))?;
        }
    }
    out.patch_int(0, wire_len(out.len() - SIZE_OF_LENGTH_FIELD)?)?;
    Ok(out.into_bytes())
}

/// Decodes the server's handshake answer.
pub fn decode_handshake_response(bytes: &[u8]) -> Result<HandshakeResponse> {
    let mut input = framed(bytes)?;
    if input.read_bool()? {
        return Ok(HandshakeResponse::Accepted);
    }
    let server_version = read_version(&mut input)?;
    let message = match TypeDescriptor::String.read(&mut input)? {
        Value::String(message) => message,
        _ => String::new(),
    };
    Ok(HandshakeResponse::Rejected {
        server_version,
        message,
    })
}

fn framed(bytes: &[u8]) -> Result<ObjectDataInput<'_>> {
    let mut input = ObjectDataInput::new(bytes);
    let length = input.read_len()?;
    if length != input.remaining() || length == 0 {
        return Err(IgniteError::Decode(format!(
            "handshake frame length {} does not match {} received bytes",
            length,
            input.remaining()
        )));
    }
    Ok(input)
}

fn read_version(input: &mut ObjectDataInput<'_>) -> Result<ProtocolVersion> {
    Ok(ProtocolVersion::new(
        input.read_short()?,
        input.read_short()?,
        input.read_short()?,
    ))
}
