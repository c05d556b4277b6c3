//! Mini LRU demo
//!
//! Fills a cache sized from the environment and prints its contents from
//! most to least recently put.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_lru::{CacheConfig, LruCache};

/// Number of keys written by the demo, on top of the configured capacity.
const OVERFLOW: u32 = 3;

fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!("Configuration loaded: max_size={}", config.max_size);

    let cache = LruCache::from_config(&config);
    let total = config.max_size.saturating_add(OVERFLOW);
    for i in 0..total {
        cache.put(format!("key{}", i), i);
    }
    info!(
        "Put {} keys, {} cached, {} evicted",
        total,
        cache.size(),
        total - cache.size()
    );

    let mut iter = cache.iterator();
    while iter.has_next() {
        let entry = iter.next_entry()?;
        println!(
            "{}\t{}\t{}",
            entry.key(),
            entry.value(),
            entry.created_at().to_rfc3339()
        );
    }
    iter.close();

    Ok(())
}
