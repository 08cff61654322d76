// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

pub const MAX_SUMMARY_CHARS: usize = 1000;
pub const MAX_SNIPPET_CHARS: usize = 280;

/// One article eligible for ranking. `url` is the identity key.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content_snippet: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: Option<String>, // feed name, informational only
}

/// Feed entry as a provider saw it, before validation and cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub source: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub categories: Vec<String>,
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>>;
    fn name(&self) -> &str;
}
