// src/config.rs
//! Environment-driven application config. `.env` is loaded by the binary before this runs.

use std::time::Duration;

use crate::rank::{RankOptions, DEFAULT_MAX_GENERAL, DEFAULT_MAX_RELEVANT};

pub const ENV_MAX_RELEVANT: &str = "CURATOR_MAX_RELEVANT";
pub const ENV_MAX_GENERAL: &str = "CURATOR_MAX_GENERAL";
pub const ENV_INGEST_INTERVAL_SECS: &str = "CURATOR_INGEST_INTERVAL_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "CURATOR_FETCH_TIMEOUT_SECS";

pub const DEFAULT_INGEST_INTERVAL_SECS: u64 = 1800;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub rank: RankOptions,
    pub ingest_interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rank: RankOptions::default(),
            ingest_interval: Duration::from_secs(DEFAULT_INGEST_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

// parse an unsigned env value; invalid or missing → None
fn parse_env_u64(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup (env, test map). Invalid values fall back to defaults;
    /// interval and timeout are at least one second.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let max_relevant = parse_env_u64(get(ENV_MAX_RELEVANT))
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_MAX_RELEVANT);
        let max_general = parse_env_u64(get(ENV_MAX_GENERAL))
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_MAX_GENERAL);
        let interval = parse_env_u64(get(ENV_INGEST_INTERVAL_SECS))
            .unwrap_or(DEFAULT_INGEST_INTERVAL_SECS)
            .max(1);
        let timeout = parse_env_u64(get(ENV_FETCH_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
            .max(1);

        Self {
            rank: RankOptions {
                max_relevant,
                max_general,
            },
            ingest_interval: Duration::from_secs(interval),
            fetch_timeout: Duration::from_secs(timeout),
        }
    }
}
