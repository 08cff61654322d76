// tests/ingest_pipeline.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use digest_curator::ingest::providers::rss::RssProvider;
use digest_curator::ingest::scheduler::refresh_pool_once;
use digest_curator::ingest::types::{RawItem, SourceProvider};
use digest_curator::ingest::{normalize_text, run_once};
use digest_curator::store::ItemPool;
use digest_curator::{rank, Profile, RankOptions};

const FEED_XML: &str = include_str!("fixtures/tech_news_rss.xml");

struct MockProvider;

#[async_trait]
impl SourceProvider for MockProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        Ok(vec![RawItem {
            source: "Mock".to_string(),
            title: Some("<b>Hello&nbsp;world</b> &ldquo;ok&rdquo;".to_string()),
            link: Some("https://mock.test/x".to_string()),
            published_at: Some(Utc.timestamp_opt(1_000_000, 0).unwrap()),
            description: None,
            categories: vec![],
        }])
    }
    fn name(&self) -> &str {
        "MockProvider"
    }
}

struct FailingProvider;

#[async_trait]
impl SourceProvider for FailingProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        anyhow::bail!("connection reset")
    }
    fn name(&self) -> &str {
        "Failing"
    }
}

struct SlowProvider;

#[async_trait]
impl SourceProvider for SlowProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![RawItem {
            source: "Slow".into(),
            title: Some("too late".into()),
            link: Some("https://slow.test/1".into()),
            ..Default::default()
        }])
    }
    fn name(&self) -> &str {
        "Slow"
    }
}

#[test]
fn normalize_text_strips_html_and_unescapes() {
    assert_eq!(normalize_text(""), "");
    assert_eq!(
        normalize_text("<p>Hello&nbsp;<b>world</b> &ldquo;ok&rdquo;</p>"),
        r#"Hello world "ok""#
    );
    assert_eq!(normalize_text("A\u{00A0}\n\tB   C"), "A B C");
}

#[tokio::test]
async fn smoke_pipeline_runs_and_outputs() {
    let providers: Vec<Arc<dyn SourceProvider>> = vec![Arc::new(MockProvider)];
    let (out, filtered, dedup) = run_once(&providers, Duration::from_secs(1)).await;
    assert_eq!((out.len(), filtered, dedup), (1, 0, 0));
    assert_eq!(out[0].title, r#"Hello world "ok""#);
    assert_eq!(out[0].source.as_deref(), Some("Mock"));
}

#[tokio::test]
async fn failing_and_slow_providers_are_isolated() {
    let providers: Vec<Arc<dyn SourceProvider>> = vec![
        Arc::new(FailingProvider),
        Arc::new(SlowProvider),
        Arc::new(MockProvider),
    ];
    let started = std::time::Instant::now();
    let (out, _, _) = run_once(&providers, Duration::from_millis(200)).await;
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].url, "https://mock.test/x");
}

#[tokio::test]
async fn fixture_feed_is_validated_and_deduplicated() {
    let providers: Vec<Arc<dyn SourceProvider>> =
        vec![Arc::new(RssProvider::from_fixture("Wire", FEED_XML))];
    let (items, filtered, dedup) = run_once(&providers, Duration::from_secs(5)).await;

    assert_eq!(filtered, 2, "untitled + linkless entries are dropped");
    assert_eq!(dedup, 1, "fragment-only variant of the same URL is a duplicate");
    assert_eq!(items.len(), 3);

    let agent = &items[0];
    assert_eq!(agent.url, "https://wire.example.com/2025/06/ai-coding-agent");
    assert_eq!(
        agent.summary.as_deref(),
        Some("A startup released an autonomous agent that writes payment integrations.")
    );
    assert_eq!(agent.tags, vec!["AI".to_string(), "Payments".to_string()]);
    assert_eq!(agent.source.as_deref(), Some("Wire"));
}

#[tokio::test]
async fn fixture_feed_ranks_for_a_fintech_profile() {
    let providers: Vec<Arc<dyn SourceProvider>> =
        vec![Arc::new(RssProvider::from_fixture("Wire", FEED_XML))];
    let pool = ItemPool::new();
    let n = refresh_pool_once(&providers, &pool, Duration::from_secs(5)).await;
    assert_eq!(n, 3);

    let p = Profile {
        industry: Some("Fintech / Financial Services".into()),
        avoid_topics: vec!["coal".into()],
        ..Default::default()
    };
    let out = rank(&pool.snapshot(), &p, RankOptions::default());
    let urls: Vec<&str> = out.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            // relevant: fintech + payments keywords
            "https://wire.example.com/2025/06/ai-coding-agent",
            // general: newest first
            "https://wire.example.com/2025/06/telehealth-triage",
            "https://wire.example.com/2025/06/solar-battery",
        ]
    );
}

#[tokio::test]
async fn empty_ingest_keeps_previous_pool() {
    let pool = ItemPool::new();
    let ok: Vec<Arc<dyn SourceProvider>> = vec![Arc::new(MockProvider)];
    refresh_pool_once(&ok, &pool, Duration::from_secs(1)).await;
    assert_eq!(pool.len(), 1);

    let broken: Vec<Arc<dyn SourceProvider>> = vec![Arc::new(FailingProvider)];
    let n = refresh_pool_once(&broken, &pool, Duration::from_secs(1)).await;
    assert_eq!(n, 0);
    assert_eq!(pool.len(), 1);
}
