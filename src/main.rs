use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use toxicguard::datasource::{SyntheticTradeSource, TradeSource};
use toxicguard::orchestration::{spawn_batch_poller, spawn_slot_clock, Desk, FeedControl};
use toxicguard::{api, config::Config};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("Configuration error")?;

    let desk = Arc::new(Desk::from_config(&config).context("Failed to build lane simulator")?);
    let feed = Arc::new(FeedControl::new(
        config.feed_enabled,
        config.batch_interval,
    ));
    let source: Arc<dyn TradeSource> = match config.feed_seed {
        Some(seed) => Arc::new(SyntheticTradeSource::seeded(seed, config.failure_rate)),
        None => Arc::new(SyntheticTradeSource::new(config.failure_rate)),
    };

    tracing::info!(
        lanes = config.num_lanes,
        base_capacity = config.base_capacity,
        oracle_price = config.oracle_price,
        slot_ms = config.slot_interval.as_millis() as u64,
        batch_ms = config.batch_interval.as_millis() as u64,
        live = config.feed_enabled,
        "lane simulator ready"
    );

    let _slot_clock = spawn_slot_clock(desk.clone(), feed.clone(), config.slot_interval);
    let _poller = spawn_batch_poller(desk.clone(), source.clone(), feed.clone());

    let app = api::create_router(api::AppState::new(desk, feed, source));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
