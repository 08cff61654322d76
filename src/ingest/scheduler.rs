// src/ingest/scheduler.rs
use crate::ingest::types::SourceProvider;
use crate::store::ItemPool;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Clone, Copy, Debug)]
pub struct IngestSchedulerCfg {
    pub interval: Duration,
    pub fetch_timeout: Duration,
}

/// Ingest once and swap the pool. An empty result keeps the previous batch.
pub async fn refresh_pool_once(
    providers: &[Arc<dyn SourceProvider>],
    pool: &ItemPool,
    fetch_timeout: Duration,
) -> usize {
    let (kept, filtered, dedup) = crate::ingest::run_once(providers, fetch_timeout).await;
    let n = kept.len();
    if n > 0 {
        pool.replace(kept);
    }
    counter!("ingest_runs_total").increment(1);
    tracing::info!(
        target: "ingest",
        kept = n,
        filtered = filtered,
        dedup = dedup,
        providers = providers.len(),
        "ingest tick"
    );
    n
}

/// Spawn a background task that refreshes `pool` every `cfg.interval` (first tick immediately).
pub fn spawn_ingest_scheduler(
    cfg: IngestSchedulerCfg,
    providers: Vec<Arc<dyn SourceProvider>>,
    pool: ItemPool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cfg.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            refresh_pool_once(&providers, &pool, cfg.fetch_timeout).await;
        }
    })
}
