//! Basic usage example covering cache management and key-value operations.
//!
//! Run with: `cargo run --example basic_usage`
//!
//! Requires an Ignite node with the thin-client connector on localhost:10800.

use std::time::Duration;

use ignite_client::core::cache_config::{CacheMode, CacheProperty, PeekMode, PropertyMap};
use ignite_client::{ClientConfig, IgniteClient, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Ignite Client Basic Usage Example ===\n");

    let config = ClientConfig::builder()
        .address_str("127.0.0.1:10800")?
        .connection_timeout(Duration::from_secs(10))
        .build()?;

    println!("Connecting to Ignite node...");
    let client = IgniteClient::connect(config).await?;
    println!("Connected to {}\n", client.config().address());

    // ========== Cache Management ==========
    println!("--- Cache Management ---\n");

    let properties = PropertyMap::new()
        .with(CacheProperty::Name, "example-cache")
        .with(CacheProperty::CacheMode, CacheMode::Replicated)
        .with(CacheProperty::BackupsNumber, 1);
    client
        .cache_get_or_create_with_config(&properties)
        .await?
        .into_result()?;

    let names = client.cache_get_names().await?.into_result()?;
    println!("Caches on the node: {:?}\n", names.unwrap_or_default());

    // ========== Key-Value Operations ==========
    println!("--- Key-Value Operations ---\n");

    let cache = client.cache("example-cache");

    println!("Putting entries into cache...");
    cache
        .put_all(vec![("key1", "value1"), ("key2", "value2"), ("key3", "value3")])
        .await?
        .into_result()?;

    let size = cache.get_size(&[PeekMode::All]).await?.into_result()?;
    println!("Cache size: {}", size.unwrap_or(0));

    println!("\nRetrieving entries:");
    for key in ["key1", "key2", "key3", "nonexistent"] {
        match cache.get(key).await?.into_result()? {
            Some(Value::Null) | None => println!("  {} -> (not found)", key),
            Some(value) => println!("  {} -> {:?}", key, value),
        }
    }

    let replaced = cache.replace_if_equals("key1", "value1", "updated").await?;
    println!("\nreplace_if_equals(key1): {:?}", replaced.value());

    let failed = client.cache("no-such-cache").get("key1").await?;
    println!(
        "get on a missing cache: status {} ({})",
        failed.status(),
        failed.message()
    );

    // ========== Cleanup ==========
    println!("\n--- Cleanup ---\n");

    cache.remove_all().await?.into_result()?;
    client.cache_destroy("example-cache").await?.into_result()?;
    client.close().await?;
    println!("Done.");

    Ok(())
}
