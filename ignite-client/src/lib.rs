//! Async Rust thin client for [Apache Ignite](https://ignite.apache.org/).
//!
//! The client speaks the Ignite binary thin-client protocol (version 1.0.0)
//! over a single TCP connection. It is built on [Tokio](https://tokio.rs/)
//! and exposes every operation as an `async fn`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ignite_client::{ClientConfig, IgniteClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .address("127.0.0.1:10800".parse()?)
//!         .build()?;
//!     let client = IgniteClient::connect(config).await?;
//!
//!     client.cache_get_or_create("my-cache").await?.into_result()?;
//!     let cache = client.cache("my-cache");
//!     cache.put("key", "value").await?.into_result()?;
//!     let value = cache.get("key").await?.into_result()?;
//!     println!("{:?}", value); // Some(String("value"))
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Results
//!
//! Each call resolves to `Result<ApiResult<T>>`. The outer `Result` fails
//! on transport, codec and protocol errors; the [`ApiResult`] carries the
//! node's status, its error text on failure and the decoded value on
//! success.
//!
//! # Cache Configuration
//!
//! Caches can be created from a [`PropertyMap`](core::cache_config::PropertyMap)
//! of configuration properties:
//!
//! ```rust,ignore
//! use ignite_client::core::cache_config::{CacheMode, CacheProperty, PropertyMap};
//!
//! let properties = PropertyMap::new()
//!     .with(CacheProperty::Name, "orders")
//!     .with(CacheProperty::CacheMode, CacheMode::Replicated)
//!     .with(CacheProperty::BackupsNumber, 1);
//! client.cache_create_with_config(&properties).await?.into_result()?;
//! ```
//!
//! # Feature Flags
//!
//! | Flag | Purpose |
//! |------|---------|
//! | `json` | Convert `serde_json` documents to and from [`Value`] |

#![warn(missing_docs)]

mod client;
pub mod config;
pub mod connection;
pub mod proxy;

pub use client::IgniteClient;
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use connection::{Connection, ConnectionId, Transport};
pub use ignite_core as core;
pub use ignite_core::{ApiResult, IgniteError, Record, Result, Value};
pub use proxy::{Cache, CacheOptions};
