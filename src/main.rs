//! Digest Curator: binary entrypoint.
//! Boots the Axum HTTP server, the feed ingest scheduler, and the Prometheus endpoint.

use digest_curator::api::{self, AppState};
use digest_curator::config::AppConfig;
use digest_curator::ingest::config::{build_providers, load_feeds_default};
use digest_curator::ingest::scheduler::{spawn_ingest_scheduler, IngestSchedulerCfg};
use digest_curator::metrics::Metrics;
use digest_curator::relevance::RelevanceEngine;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Shuttle may already have installed a subscriber; keep theirs in that case.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env();

    // --- Ranking engine (taxonomy asset is optional) ---
    let engine = RelevanceEngine::from_default_taxonomy()?;
    let state = AppState::new(engine, cfg.rank);

    // --- Feed ingest ---
    let feeds = load_feeds_default()?;
    if feeds.is_empty() {
        tracing::warn!(target: "ingest", "no feeds configured; pool stays empty");
    } else {
        let client = reqwest::Client::builder()
            .user_agent(concat!("digest-curator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(anyhow::Error::from)?;
        let providers = build_providers(&feeds, &client);
        spawn_ingest_scheduler(
            IngestSchedulerCfg {
                interval: cfg.ingest_interval,
                fetch_timeout: cfg.fetch_timeout,
            },
            providers,
            state.pool.clone(),
        );
    }

    let mut router = api::router(state);
    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = ?e, "metrics disabled"),
    }

    Ok(router.into())
}
