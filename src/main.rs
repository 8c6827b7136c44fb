//! LRU TTL Cache - demo process
//!
//! Builds a cache from environment configuration, runs a small workload, and
//! keeps the sweeper alive until shutdown so its logs can be observed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl_cache::{Cache, CacheConfig};

/// Interval between stats reports while idling
const REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache, which starts its sweeper
/// 4. Populate it with a sample workload
/// 5. Report stats periodically until SIGINT/SIGTERM, then stop the sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: capacity={}, default_ttl={}s, sweep_interval={}s",
        config.capacity, config.default_ttl, config.sweep_interval
    );

    let cache: Arc<Cache<String>> =
        Arc::new(Cache::with_config(config).context("failed to build cache")?);

    populate(&cache);
    info!("Cache populated with {} entries", cache.count());

    let mut report = tokio::time::interval(REPORT_INTERVAL);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = report.tick() => {
                let stats = serde_json::to_string(&cache.stats())?;
                info!("Cache stats: {}", stats);
            }
        }
    }

    cache.stop_cleanup();
    info!("Shutdown complete");
    Ok(())
}

/// Writes a mix of permanent, default-TTL and short-lived entries.
fn populate(cache: &Cache<String>) {
    for i in 0..cache.capacity() {
        let key = format!("key:{}", i);
        let value = format!("value-{}", i);
        match i % 3 {
            0 => cache.set(key, value),
            1 => cache.set_with_expiration(key, value, 0),
            _ => cache.set_with_expiration(key, value, 5),
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
