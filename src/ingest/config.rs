// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ingest::providers::rss::RssProvider;
use crate::ingest::types::SourceProvider;

pub const ENV_FEEDS_PATH: &str = "CURATOR_FEEDS_PATH";

/// One RSS source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

/// Load feeds from an explicit path. Supports TOML or JSON formats.
pub fn load_feeds_from(path: &Path) -> Result<Vec<FeedSource>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feeds from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_feeds(&content, ext.as_str())
}

/// Load feeds using env var + fallbacks:
/// 1) $CURATOR_FEEDS_PATH
/// 2) config/feeds.toml
/// 3) config/feeds.json
pub fn load_feeds_default() -> Result<Vec<FeedSource>> {
    if let Ok(p) = std::env::var(ENV_FEEDS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_feeds_from(&pb);
        } else {
            return Err(anyhow!("CURATOR_FEEDS_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/feeds.toml");
    if toml_p.exists() {
        return load_feeds_from(&toml_p);
    }
    let json_p = PathBuf::from("config/feeds.json");
    if json_p.exists() {
        return load_feeds_from(&json_p);
    }
    Ok(Vec::new())
}

/// Build HTTP providers sharing one client.
pub fn build_providers(feeds: &[FeedSource], client: &reqwest::Client) -> Vec<Arc<dyn SourceProvider>> {
    feeds
        .iter()
        .map(|f| {
            Arc::new(RssProvider::from_url(f.name.clone(), f.url.clone(), client.clone()))
                as Arc<dyn SourceProvider>
        })
        .collect()
}

fn parse_feeds(s: &str, hint_ext: &str) -> Result<Vec<FeedSource>> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[feeds]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported feeds format"))
}

fn parse_toml(s: &str) -> Result<Vec<FeedSource>> {
    #[derive(Deserialize)]
    struct TomlFeeds {
        #[serde(default)]
        feeds: Vec<FeedSource>,
    }
    let v: TomlFeeds = toml::from_str(s)?;
    Ok(clean_list(v.feeds))
}

fn parse_json(s: &str) -> Result<Vec<FeedSource>> {
    let v: Vec<FeedSource> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

/// Trim, drop entries without a URL, drop repeated URLs (first wins).
fn clean_list(items: Vec<FeedSource>) -> Vec<FeedSource> {
    let mut out: Vec<FeedSource> = Vec::with_capacity(items.len());
    for it in items {
        let url = it.url.trim();
        if url.is_empty() || out.iter().any(|f| f.url == url) {
            continue;
        }
        let name = match it.name.trim() {
            "" => url.to_string(),
            n => n.to_string(),
        };
        out.push(FeedSource {
            name,
            url: url.to_string(),
        });
    }
    out
}
