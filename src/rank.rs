// src/rank.rs
//! Selection: score the batch, take the best-scoring items (score > 0), then fill up with
//! the most recent items not already chosen.
//!
//! - Relevant segment: score desc, at most `max_relevant`.
//! - General segment: publish time desc, at most `max_general`, excluding URLs already in
//!   the relevant segment.
//!
//! Both sorts are stable, so insertion order breaks ties. A URL never appears twice.

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ingest::types::CandidateItem;
use crate::profile::Profile;
use crate::relevance::RelevanceEngine;

pub const DEFAULT_MAX_RELEVANT: usize = 30;
pub const DEFAULT_MAX_GENERAL: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankOptions {
    pub max_relevant: usize,
    pub max_general: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            max_relevant: DEFAULT_MAX_RELEVANT,
            max_general: DEFAULT_MAX_GENERAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: CandidateItem,
    pub score: u8,
}

/// Ranked selection split into its two segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub relevant: Vec<ScoredItem>,
    pub general: Vec<ScoredItem>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.relevant.len() + self.general.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Relevant segment followed by general segment.
    pub fn into_items(self) -> Vec<CandidateItem> {
        self.relevant
            .into_iter()
            .chain(self.general)
            .map(|s| s.item)
            .collect()
    }
}

/// Rank with the built-in taxonomy.
pub fn rank(items: &[CandidateItem], profile: &Profile, opts: RankOptions) -> Vec<CandidateItem> {
    select(RelevanceEngine::builtin(), items, profile, opts).into_items()
}

/// Score every item independently, then build the two segments.
pub fn select(
    engine: &RelevanceEngine,
    items: &[CandidateItem],
    profile: &Profile,
    opts: RankOptions,
) -> Selection {
    // 1) Score
    let scores: Vec<u8> = items
        .iter()
        .map(|it| engine.score(it, profile).score)
        .collect();

    // 2) Relevant: score > 0, score desc
    let mut positive: Vec<usize> = (0..items.len()).filter(|&i| scores[i] > 0).collect();
    positive.sort_by(|&a, &b| scores[b].cmp(&scores[a]));

    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());
    let mut relevant = Vec::with_capacity(opts.max_relevant.min(positive.len()));
    for i in positive {
        if relevant.len() >= opts.max_relevant {
            break;
        }
        if seen.insert(items[i].url.as_str()) {
            relevant.push(ScoredItem {
                item: items[i].clone(),
                score: scores[i],
            });
        }
    }

    // 3+4) General: whole batch minus chosen URLs, newest first
    let mut by_recency: Vec<usize> = (0..items.len()).collect();
    by_recency.sort_by(|&a, &b| items[b].published_at.cmp(&items[a].published_at));

    let mut general = Vec::with_capacity(opts.max_general.min(items.len()));
    for i in by_recency {
        if general.len() >= opts.max_general {
            break;
        }
        if seen.insert(items[i].url.as_str()) {
            general.push(ScoredItem {
                item: items[i].clone(),
                score: scores[i],
            });
        }
    }

    counter!("rank_requests_total").increment(1);
    histogram!("rank_selected_items").record((relevant.len() + general.len()) as f64);
    tracing::debug!(
        target: "rank",
        batch = items.len(),
        relevant = relevant.len(),
        general = general.len(),
        "ranked batch"
    );

    Selection { relevant, general }
}
