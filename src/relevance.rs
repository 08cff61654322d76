// src/relevance.rs
//! Relevance scorer: weighted profile-signal accumulation over an item's searchable text,
//! cross-signal bonus, avoid-topic penalties, clamp to ⟨0..100⟩.
//!
//! Matching is plain case-insensitive substring containment (see `normalize`).

use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::info;

use crate::ingest::types::CandidateItem;
use crate::normalize::searchable_text;
use crate::profile::{needle, Profile};
use crate::rank::{self, RankOptions, Selection};
use crate::taxonomy::Taxonomy;

// --- signal weights ---
pub const DIRECT_LABEL_POINTS: i32 = 18;
pub const KEYWORD_POINTS: i32 = 5;
pub const KEYWORD_CAP: i32 = 15;
pub const FOCUS_TOPIC_POINTS: i32 = 15;
pub const TOOL_POINTS: i32 = 12;
pub const GOAL_WORD_POINTS: i32 = 5;
pub const GOAL_WORD_MIN_CHARS: usize = 4; // words must be longer than 3 chars
pub const GOAL_WORD_CAP: usize = 3;
pub const AVOID_PENALTY: i32 = 25;
pub const BONUS_POINTS: i32 = 10;
pub const BONUS_TIER_1: usize = 3;
pub const BONUS_TIER_2: usize = 5;
pub const MAX_SCORE: i32 = 100;

// Dev logging gate: CURATOR_DEV_LOG=1 AND dev env (debug or SHUTTLE_ENV in {local,development,dev}).
// Read once per process.
static DEV_LOGGING: once_cell::sync::Lazy<bool> = once_cell::sync::Lazy::new(dev_logging_requested);

pub(crate) fn dev_logging_enabled() -> bool {
    *DEV_LOGGING
}

fn dev_logging_requested() -> bool {
    let on = std::env::var("CURATOR_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Minimal, anonymized dev logger for scoring events.
fn dev_log_relevance(url: &str, rel: &Relevance) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(url);
    let matched_short = truncate_vec(&rel.matched, 5);
    let reasons_short = truncate_vec(&rel.reasons, 5);
    // Never log titles or URLs. Only hashed id + short lists.
    info!(
        target: "relevance",
        %id, score = rel.score, matches = rel.matches,
        matched = ?matched_short,
        reasons = ?reasons_short
    );
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

/// Result of scoring one item against one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Relevance {
    pub score: u8,
    /// Distinct signal categories that contributed a positive match.
    pub matches: usize,
    pub matched: Vec<String>,
    pub reasons: Vec<String>,
}

/// Score an item with the built-in taxonomy.
pub fn score(item: &CandidateItem, profile: &Profile) -> u8 {
    RelevanceEngine::builtin().score(item, profile).score
}

/// Points for a label's expansion keywords found in `text`, with the distinct hits.
fn keyword_points<'a>(text: &str, keywords: &'a [String]) -> (i32, Vec<&'a str>) {
    let hits: Vec<&str> = keywords
        .iter()
        .filter(|k| text.contains(k.as_str()))
        .map(String::as_str)
        .collect();
    let pts = (hits.len() as i32 * KEYWORD_POINTS).min(KEYWORD_CAP);
    (pts, hits)
}

/// Number of goal words (longer than 3 chars) present in `text`, capped.
fn goal_word_hits(text: &str, goal: &str) -> usize {
    goal.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() >= GOAL_WORD_MIN_CHARS && text.contains(*w))
        .count()
        .min(GOAL_WORD_CAP)
}

/// Scorer bound to one taxonomy. Stateless per call.
#[derive(Debug, Clone)]
pub struct RelevanceEngine {
    taxonomy: Taxonomy,
}

static BUILTIN_ENGINE: once_cell::sync::Lazy<RelevanceEngine> =
    once_cell::sync::Lazy::new(|| RelevanceEngine::new(Taxonomy::builtin().clone()));

impl RelevanceEngine {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn builtin() -> &'static RelevanceEngine {
        &BUILTIN_ENGINE
    }

    /// Taxonomy from `$CURATOR_TAXONOMY_PATH` / `config/taxonomy.toml`, else built-in.
    pub fn from_default_taxonomy() -> anyhow::Result<Self> {
        Ok(Self::new(Taxonomy::load_default()?))
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Public scoring API: signals → cross-signal bonus → avoid penalties → clamp.
    pub fn score(&self, item: &CandidateItem, profile: &Profile) -> Relevance {
        let text = searchable_text(item);
        let rel = self.score_text(&text, profile);
        dev_log_relevance(&item.url, &rel);
        rel
    }

    /// Score an already-normalized (lowercase) searchable text.
    pub fn score_text(&self, text: &str, profile: &Profile) -> Relevance {
        let mut rel = Relevance::default();
        let mut total = 0i32;
        let mut matches = 0usize;

        if profile.is_empty() {
            return rel;
        }

        // 1) Industry: direct label + expanded keywords
        if let Some(industry) = profile.industry_needle() {
            if text.contains(&industry) {
                total += DIRECT_LABEL_POINTS;
                matches += 1;
                rel.matched.push("industry:direct".into());
            }
        }
        if let Some(industry) = profile.industry.as_deref() {
            let (pts, hits) = keyword_points(text, self.taxonomy.industry_keywords(industry));
            if !hits.is_empty() {
                total += pts;
                matches += 1;
                rel.matched
                    .extend(hits.iter().map(|k| format!("industry:keyword:{k}")));
            }
        }

        // 2) Role: same pattern
        if let Some(role) = profile.role_needle() {
            if text.contains(&role) {
                total += DIRECT_LABEL_POINTS;
                matches += 1;
                rel.matched.push("role:direct".into());
            }
        }
        if let Some(role) = profile.role_title.as_deref() {
            let (pts, hits) = keyword_points(text, self.taxonomy.role_keywords(role));
            if !hits.is_empty() {
                total += pts;
                matches += 1;
                rel.matched
                    .extend(hits.iter().map(|k| format!("role:keyword:{k}")));
            }
        }

        // 3) Focus topics, one match each
        for topic in &profile.focus_topics {
            if let Some(n) = needle(Some(topic)) {
                if text.contains(&n) {
                    total += FOCUS_TOPIC_POINTS;
                    matches += 1;
                    rel.matched.push(format!("focus:{n}"));
                }
            }
        }

        // 4) Tools / platforms, one match each
        for tool in &profile.tools {
            if let Some(n) = needle(Some(tool)) {
                if text.contains(&n) {
                    total += TOOL_POINTS;
                    matches += 1;
                    rel.matched.push(format!("tool:{n}"));
                }
            }
        }

        // 5) Goals: long-enough words as substrings, capped per goal
        for goal in &profile.goals {
            let hits = goal_word_hits(text, goal);
            if hits > 0 {
                total += hits as i32 * GOAL_WORD_POINTS;
                matches += 1;
                rel.matched.push(format!("goal:{}:{hits}", goal.trim()));
            }
        }

        // 6) Cross-signal bonus (tiers stack)
        if matches >= BONUS_TIER_1 {
            total += BONUS_POINTS;
            rel.reasons.push("bonus:3plus".into());
        }
        if matches >= BONUS_TIER_2 {
            total += BONUS_POINTS;
            rel.reasons.push("bonus:5plus".into());
        }

        // 7) Avoid-topic penalties (do not touch `matches`)
        for topic in &profile.avoid_topics {
            if let Some(n) = needle(Some(topic)) {
                if text.contains(&n) {
                    total -= AVOID_PENALTY;
                    rel.reasons.push(format!("avoid:{n}"));
                }
            }
        }

        // 8) Clamp
        if total > MAX_SCORE {
            rel.reasons.push("clamped:high".into());
        } else if total < 0 {
            rel.reasons.push("clamped:low".into());
        }
        rel.score = total.clamp(0, MAX_SCORE) as u8;
        rel.matches = matches;
        rel
    }
}

/* ----------------------------
Thread-safe handle + reload
---------------------------- */

/// Label lists offered to profile forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct TaxonomyLabels {
    pub industries: Vec<String>,
    pub roles: Vec<String>,
}

/// Shared engine handle; the taxonomy can be swapped at runtime.
#[derive(Clone)]
pub struct RelevanceHandle {
    inner: Arc<RwLock<RelevanceEngine>>,
}

impl RelevanceHandle {
    pub fn new(engine: RelevanceEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn score(&self, item: &CandidateItem, profile: &Profile) -> Relevance {
        match self.inner.read() {
            Ok(eng) => eng.score(item, profile),
            Err(poisoned) => poisoned.into_inner().score(item, profile),
        }
    }

    pub fn select(&self, items: &[CandidateItem], profile: &Profile, opts: RankOptions) -> Selection {
        match self.inner.read() {
            Ok(eng) => rank::select(&eng, items, profile, opts),
            Err(poisoned) => rank::select(&poisoned.into_inner(), items, profile, opts),
        }
    }

    /// Canonical (industry, role) labels of the current taxonomy, sorted.
    pub fn labels(&self) -> TaxonomyLabels {
        let collect = |eng: &RelevanceEngine| {
            let tax = eng.taxonomy();
            TaxonomyLabels {
                industries: tax.industry_labels().into_iter().map(str::to_string).collect(),
                roles: tax.role_labels().into_iter().map(str::to_string).collect(),
            }
        };
        match self.inner.read() {
            Ok(eng) => collect(&*eng),
            Err(poisoned) => collect(&*poisoned.into_inner()),
        }
    }

    /// Rebuild from a TOML file and swap atomically. The old engine stays on error.
    pub fn reload_from(&self, path: &Path) -> anyhow::Result<()> {
        let fresh = RelevanceEngine::new(Taxonomy::from_path(path)?);
        let mut guard = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("relevance engine lock poisoned"))?;
        *guard = fresh;
        Ok(())
    }
}

/* ----------------------------
Tests
---------------------------- */
