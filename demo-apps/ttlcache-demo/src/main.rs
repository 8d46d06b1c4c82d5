use anyhow::Result;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ttlcache_core::{CacheConfig, TtlCache};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttlcache_demo=info,ttlcache_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Sweep every 100ms unless TTLCACHE_SWEEP_INTERVAL_MS says otherwise
    let config = CacheConfig::from_env_or(
        CacheConfig::default().with_sweep_interval(Duration::from_millis(100)),
    )?;
    let cache = TtlCache::with_config(config);
    cache.start_background_sweep()?;

    tracing::info!("Sweep interval: {:?}", cache.sweep_interval());

    cache.set("name", "Vadim", Duration::from_millis(200));

    if let Some(value) = cache.get("name") {
        println!("immediate: {}", value);
    }

    tokio::time::sleep(Duration::from_millis(300)).await;

    if cache.get("name").is_none() {
        println!("expired and removed (by get or background sweep)");
    }

    cache.shutdown().await;

    Ok(())
}
