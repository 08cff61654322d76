// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod scheduler;
pub mod types;

use crate::ingest::types::{
    CandidateItem, RawItem, SourceProvider, MAX_SNIPPET_CHARS, MAX_SUMMARY_CHARS,
};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_events_total", "Total items parsed from providers.");
        describe_counter!(
            "ingest_kept_total",
            "Items kept after normalization + validation."
        );
        describe_counter!(
            "ingest_filtered_total",
            "Items dropped for a missing title or URL."
        );
        describe_counter!("ingest_dedup_total", "Items removed as duplicate URLs.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors and timeouts."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!(
            "ingest_pipeline_last_run_ts",
            "Unix ts when ingest pipeline last ran."
        );
    });
}

/// Normalize text: decode entities, strip tags, fold quotes and whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// Char-boundary-safe length cap.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        s.chars().take(max).collect::<String>().trim_end().to_string()
    } else {
        s.to_string()
    }
}

/// Identity form of an article URL: trimmed, no fragment, no `utm_*` tracking params,
/// no trailing slash on the path. Non-http(s) or unparseable links yield `None`.
pub fn canonical_url(raw: &str) -> Option<String> {
    let mut url = reqwest::Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !k.starts_with("utm_"))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    let mut out = url.to_string();
    if url.query().is_none() && url.path() != "/" && out.ends_with('/') {
        out.pop();
    }
    Some(out)
}

/// Turn one raw feed entry into a candidate item; `None` when title or URL is unusable.
pub fn to_candidate(raw: RawItem, fallback_ts: DateTime<Utc>) -> Option<CandidateItem> {
    let title = normalize_text(raw.title.as_deref().unwrap_or_default());
    if title.is_empty() {
        return None;
    }
    let url = canonical_url(raw.link.as_deref().unwrap_or_default())?;

    let body = raw
        .description
        .as_deref()
        .map(normalize_text)
        .filter(|s| !s.is_empty());
    let summary = body.as_deref().map(|b| truncate_chars(b, MAX_SUMMARY_CHARS));
    let content_snippet = body.as_deref().map(|b| truncate_chars(b, MAX_SNIPPET_CHARS));

    let mut tags: Vec<String> = Vec::with_capacity(raw.categories.len());
    for c in &raw.categories {
        let t = normalize_text(c);
        if !t.is_empty() && !tags.iter().any(|x| x.eq_ignore_ascii_case(&t)) {
            tags.push(t);
        }
    }

    Some(CandidateItem {
        title,
        url,
        published_at: raw.published_at.unwrap_or(fallback_ts),
        summary,
        content_snippet,
        tags,
        source: Some(raw.source).filter(|s| !s.is_empty()),
    })
}

/// Normalize + validate + dedup by canonical URL (first occurrence wins).
/// Returns (kept, filtered_count, dedup_count).
pub fn normalize_filter_dedup(
    fallback_ts: DateTime<Utc>,
    raw_items: Vec<RawItem>,
) -> (Vec<CandidateItem>, usize, usize) {
    let mut filtered_out = 0usize;
    let mut dedup_out = 0usize;
    let mut seen: HashSet<String> = HashSet::with_capacity(raw_items.len());
    let mut keep = Vec::with_capacity(raw_items.len());

    for raw in raw_items {
        let Some(item) = to_candidate(raw, fallback_ts) else {
            filtered_out += 1;
            continue;
        };
        if !seen.insert(item.url.clone()) {
            dedup_out += 1;
            continue;
        }
        keep.push(item);
    }

    (keep, filtered_out, dedup_out)
}

/// Fetch all providers concurrently, each under `timeout`. A failing or slow provider
/// is logged and skipped; the rest of the batch is unaffected.
pub async fn fetch_all(
    providers: &[Arc<dyn SourceProvider>],
    timeout: Duration,
) -> Vec<RawItem> {
    let mut set = JoinSet::new();
    for (idx, p) in providers.iter().enumerate() {
        let p = Arc::clone(p);
        set.spawn(async move {
            let res = tokio::time::timeout(timeout, p.fetch_latest()).await;
            (idx, p.name().to_string(), res)
        });
    }

    let mut per_provider: Vec<(usize, Vec<RawItem>)> = Vec::with_capacity(providers.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, _, Ok(Ok(items)))) => per_provider.push((idx, items)),
            Ok((_, name, Ok(Err(e)))) => {
                tracing::warn!(target: "ingest", error = ?e, provider = %name, "provider error");
                counter!("ingest_provider_errors_total").increment(1);
            }
            Ok((_, name, Err(_))) => {
                tracing::warn!(
                    target: "ingest",
                    provider = %name,
                    timeout_ms = timeout.as_millis() as u64,
                    "provider timed out"
                );
                counter!("ingest_provider_errors_total").increment(1);
            }
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, "provider task failed");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }

    // Provider order, not completion order, so dedup is deterministic.
    per_provider.sort_by_key(|(idx, _)| *idx);
    per_provider.into_iter().flat_map(|(_, v)| v).collect()
}

/// Run ingest once using the provided providers.
/// Returns (kept, filtered_count, dedup_count).
pub async fn run_once(
    providers: &[Arc<dyn SourceProvider>],
    timeout: Duration,
) -> (Vec<CandidateItem>, usize, usize) {
    ensure_metrics_described();

    let raw = fetch_all(providers, timeout).await;
    let now = Utc::now();
    let (kept, filtered_cnt, dedup_cnt) = normalize_filter_dedup(now, raw);

    // Telemetry
    counter!("ingest_kept_total").increment(kept.len() as u64);
    counter!("ingest_filtered_total").increment(filtered_cnt as u64);
    counter!("ingest_dedup_total").increment(dedup_cnt as u64);
    gauge!("ingest_pipeline_last_run_ts").set(now.timestamp() as f64);

    (kept, filtered_cnt, dedup_cnt)
}
