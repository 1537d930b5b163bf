//! Bounded Cache Demo
//!
//! Walks the cache through its lifecycle: inserts with payload-derived costs,
//! reads, a capacity eviction, a disk round trip, and a stats summary.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bounded_cache::{Cache, CacheConfig};

fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bounded_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting bounded cache demo");

    // Load configuration from environment variables; cap the total cost if
    // nothing is configured so the walkthrough below shows an eviction
    let mut config = CacheConfig::from_env();
    if config.max_entries == 0 && config.max_total_cost == 0 {
        config = config.max_total_cost(64);
    }
    info!(
        lifespan_secs = config.lifespan.as_secs(),
        max_entries = config.max_entries,
        max_total_cost = config.max_total_cost,
        "Configuration loaded"
    );

    let mut cache: Cache<String, String> = Cache::new(config);

    // Insert fetched resources keyed by URL, costed by payload size -
    // the pattern the HTTP and image loaders use
    for url in [
        "https://example.com/logo.png",
        "https://example.com/banner.jpg",
        "https://example.com/icon.svg",
    ] {
        let payload = format!("payload-for:{url}");
        let cost = payload.len() as u64;
        info!(url, cost, "caching fetched resource");
        cache.insert_with_cost(url.to_string(), payload, cost);
    }

    // Read back whatever survived the cost limit
    for url in [
        "https://example.com/logo.png",
        "https://example.com/banner.jpg",
        "https://example.com/icon.svg",
    ] {
        match cache.get(&url.to_string()) {
            Some(payload) => info!(url, bytes = payload.len(), "cache hit"),
            None => info!(url, "cache miss (evicted or expired)"),
        }
    }

    // Derive a cache of payload sizes without disturbing the original
    let mut sizes = cache.map(|payload| payload.len());
    info!(entries = sizes.len(), "derived payload-size cache");
    if let Some(size) = sizes.get(&"https://example.com/icon.svg".to_string()) {
        info!(size, "icon payload size from derived cache");
    }

    // Round trip through the platform cache directory
    cache
        .save_to_disk("bounded_cache_demo")
        .context("saving demo cache")?;
    let mut restored: Cache<String, String> =
        Cache::read_from_disk("bounded_cache_demo").context("loading demo cache")?;
    info!(entries = restored.len(), "cache restored from disk");

    if let Some(payload) = restored.get(&"https://example.com/icon.svg".to_string()) {
        info!(bytes = payload.len(), "restored entry verified");
    }

    let stats = cache.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        expirations = stats.expirations,
        entries = stats.total_entries,
        total_cost = stats.total_cost,
        hit_rate = stats.hit_rate(),
        finished_at = %chrono::Utc::now().to_rfc3339(),
        "Demo summary"
    );

    Ok(())
}
