use anyhow::{Context, Result};
use riverwatch::api::{create_app, supervise_server};
use riverwatch::broadcast::BroadcastService;
use riverwatch::config;
use riverwatch::state::SnapshotStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riverwatch=info".into()),
        )
        .init();

    info!("Riverwatch starting...");

    let config_path = std::env::var("RIVERWATCH_CONFIG").ok().map(PathBuf::from);
    let config = config::load(config_path.as_deref()).context("Failed to load configuration")?;

    let seed = config.seed.snapshot();
    info!(
        listen_addr = %config.server.listen_addr,
        interval_ms = config.broadcast.interval_ms,
        subscriber_buffer = config.broadcast.subscriber_buffer,
        rivers = config.seed.rivers.len(),
        zones = config.seed.zones.len(),
        cameras = config.seed.cameras.len(),
        entities = seed.entity_count(),
        seeded = config.seed.rng_seed.is_some(),
        "Configuration loaded"
    );

    let store = SnapshotStore::new(seed, config.seed.jitter());
    let broadcast = Arc::new(BroadcastService::new(
        store,
        config.broadcast.subscriber_buffer,
    ));
    let ticker_handle = broadcast.start(config.broadcast.interval());

    let app = create_app(Arc::clone(&broadcast), &config.broadcast);
    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    info!(addr = %config.server.listen_addr, "Riverwatch listening");

    let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

    let outcome = supervise_server(server_handle, tokio::signal::ctrl_c()).await;
    ticker_handle.abort();
    if let Err(e) = &outcome {
        error!(error = %e, "Riverwatch stopping after server failure");
    }
    info!(
        ticks = broadcast.metrics.get_tick_count(),
        "Riverwatch stopped"
    );

    outcome
}
