// src/brief.rs
//! Brief generation seam. The ranked selection plus the profile go in, a structured
//! digest comes out. Production wires a text-generation client behind `BriefGenerator`;
//! `OutlineBriefGenerator` is the deterministic built-in used when none is configured.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::ingest::truncate_chars;
use crate::ingest::types::CandidateItem;
use crate::profile::Profile;

pub const DEFAULT_BLURB_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefEntry {
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source: Option<String>,
    pub blurb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    pub headline: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<BriefEntry>,
}

#[async_trait::async_trait]
pub trait BriefGenerator: Send + Sync {
    async fn generate(&self, profile: &Profile, items: &[CandidateItem]) -> Result<Brief>;
    fn name(&self) -> &'static str;
}

pub type DynBriefGenerator = Arc<dyn BriefGenerator>;

/// Headline + one entry per item, blurb from the snippet (or summary).
#[derive(Debug, Clone)]
pub struct OutlineBriefGenerator {
    pub max_blurb_chars: usize,
}

impl Default for OutlineBriefGenerator {
    fn default() -> Self {
        Self {
            max_blurb_chars: DEFAULT_BLURB_CHARS,
        }
    }
}

fn headline_for(profile: &Profile, n: usize) -> String {
    let focus = profile
        .industry
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| profile.role_title.as_deref().map(str::trim).filter(|s| !s.is_empty()));
    let noun = if n == 1 { "story" } else { "stories" };
    match focus {
        Some(f) => format!("Your {f} briefing: {n} {noun}"),
        None => format!("Your briefing: {n} {noun}"),
    }
}

#[async_trait::async_trait]
impl BriefGenerator for OutlineBriefGenerator {
    async fn generate(&self, profile: &Profile, items: &[CandidateItem]) -> Result<Brief> {
        let entries = items
            .iter()
            .map(|it| BriefEntry {
                title: it.title.clone(),
                url: it.url.clone(),
                published_at: it.published_at,
                source: it.source.clone(),
                blurb: it
                    .content_snippet
                    .as_deref()
                    .or(it.summary.as_deref())
                    .map(|s| truncate_chars(s, self.max_blurb_chars))
                    .unwrap_or_default(),
            })
            .collect::<Vec<_>>();

        Ok(Brief {
            headline: headline_for(profile, entries.len()),
            generated_at: Utc::now(),
            entries,
        })
    }

    fn name(&self) -> &'static str {
        "outline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn it(title: &str, snippet: Option<&str>, summary: Option<&str>) -> CandidateItem {
        CandidateItem {
            title: title.into(),
            url: format!("https://a.test/{}", title.len()),
            published_at: Utc::now(),
            summary: summary.map(str::to_string),
            content_snippet: snippet.map(str::to_string),
            tags: vec![],
            source: Some("Feed".into()),
        }
    }

    #[tokio::test]
    async fn outline_keeps_order_and_prefers_snippet() {
        let g = OutlineBriefGenerator { max_blurb_chars: 5 };
        let p = Profile {
            industry: Some("Healthcare / Life Sciences".into()),
            ..Default::default()
        };
        let items = vec![
            it("First", Some("snippet text"), Some("summary")),
            it("Second one", None, Some("sum")),
            it("Third story", None, None),
        ];
        let b = g.generate(&p, &items).await.unwrap();
        assert_eq!(b.headline, "Your Healthcare / Life Sciences briefing: 3 stories");
        let titles: Vec<&str> = b.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second one", "Third story"]);
        assert_eq!(b.entries[0].blurb, "snipp");
        assert_eq!(b.entries[1].blurb, "sum");
        assert_eq!(b.entries[2].blurb, "");
    }

    #[tokio::test]
    async fn headline_without_labels() {
        let b = OutlineBriefGenerator::default()
            .generate(&Profile::default(), &[it("Only", None, None)])
            .await
            .unwrap();
        assert_eq!(b.headline, "Your briefing: 1 story");
    }
}
