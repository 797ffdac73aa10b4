//! Core types and protocol for the Apache Ignite thin client.
//!
//! This crate performs no I/O. It turns cache operations into request
//! frames and response frames back into values:
//!
//! - [`serialization`]: wire types, tagged values and binary objects
//! - [`protocol`]: schemas, request/response frames, handshake, framing
//! - [`cache_config`]: cache configuration properties and the dynamic
//!   configuration schema builder
//! - [`hash`]: the Java-compatible hashes identifying caches, types and fields

#![warn(missing_docs)]

pub mod cache_config;
pub mod error;
pub mod hash;
pub mod protocol;
pub mod serialization;

pub use error::{IgniteError, Result};
pub use hash::{cache_id, hash_code, CacheRef};
pub use protocol::{ApiResult, Field, Request, Response, ResponseBody, Schema};
pub use serialization::{
    BinaryEnum, BinaryObject, DataInput, DataOutput, ObjectDataInput, ObjectDataOutput, Record,
    TypeCode, TypeDescriptor, Value,
};
