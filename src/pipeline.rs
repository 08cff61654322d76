// src/pipeline.rs
//! Digest job: profile lookup → pool snapshot → rank → brief generation.

use anyhow::{Context, Result};
use metrics::counter;
use std::sync::Arc;
use tracing::info;

use crate::brief::{Brief, DynBriefGenerator};
use crate::profile::Profile;
use crate::rank::RankOptions;
use crate::relevance::{anon_hash, RelevanceHandle};
use crate::store::{ItemPool, ProfileStore};

#[derive(Clone)]
pub struct DigestPipeline {
    pub relevance: RelevanceHandle,
    pub profiles: Arc<dyn ProfileStore>,
    pub pool: ItemPool,
    pub generator: DynBriefGenerator,
    pub rank: RankOptions,
}

impl DigestPipeline {
    /// Digest for a stored profile. `Ok(None)` when the user has no profile.
    pub async fn run_for_user(&self, user_id: &str) -> Result<Option<Brief>> {
        let profile = self
            .profiles
            .get(user_id)
            .await
            .context("loading profile")?;
        let Some(profile) = profile else {
            info!(target: "pipeline", user = %anon_hash(user_id), "no profile, skipping digest");
            return Ok(None);
        };
        self.run_for_profile(&profile).await.map(Some)
    }

    pub async fn run_for_profile(&self, profile: &Profile) -> Result<Brief> {
        let items = self.pool.snapshot();
        let selection = self.relevance.select(&items, profile, self.rank);
        let relevant = selection.relevant.len();
        let general = selection.general.len();

        let ranked = selection.into_items();
        let brief = self
            .generator
            .generate(profile, &ranked)
            .await
            .with_context(|| format!("generating brief via `{}`", self.generator.name()))?;

        counter!("digest_runs_total").increment(1);
        info!(
            target: "pipeline",
            pool = items.len(),
            relevant,
            general,
            generator = self.generator.name(),
            "digest generated"
        );
        Ok(brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::{BriefGenerator, OutlineBriefGenerator};
    use crate::ingest::types::CandidateItem;
    use crate::relevance::RelevanceEngine;
    use crate::store::InMemoryProfileStore;
    use chrono::{TimeZone, Utc};

    struct FailingGenerator;

    #[async_trait::async_trait]
    impl BriefGenerator for FailingGenerator {
        async fn generate(&self, _: &Profile, _: &[CandidateItem]) -> Result<Brief> {
            anyhow::bail!("upstream unavailable")
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn item(n: i64, title: &str) -> CandidateItem {
        CandidateItem {
            title: title.into(),
            url: format!("https://p.test/{n}"),
            published_at: Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap(),
            summary: None,
            content_snippet: None,
            tags: vec![],
            source: None,
        }
    }

    fn pipeline(generator: DynBriefGenerator) -> (DigestPipeline, InMemoryProfileStore) {
        let store = InMemoryProfileStore::new();
        let pool = ItemPool::new();
        pool.replace(vec![
            item(1, "Old gardening news"),
            item(2, "Kubernetes operators explained"),
            item(3, "Newest weather"),
        ]);
        let p = DigestPipeline {
            relevance: RelevanceHandle::new(RelevanceEngine::builtin().clone()),
            profiles: Arc::new(store.clone()),
            pool,
            generator,
            rank: RankOptions {
                max_relevant: 5,
                max_general: 1,
            },
        };
        (p, store)
    }

    #[tokio::test]
    async fn unknown_user_yields_none() {
        let (p, _) = pipeline(Arc::new(OutlineBriefGenerator::default()));
        assert!(p.run_for_user("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn relevant_items_lead_the_brief() {
        let (p, store) = pipeline(Arc::new(OutlineBriefGenerator::default()));
        store
            .put(
                "u1",
                Profile {
                    tools: vec!["Kubernetes".into()],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let b = p.run_for_user("u1").await.unwrap().unwrap();
        let urls: Vec<&str> = b.entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://p.test/2", "https://p.test/3"]);
    }

    #[tokio::test]
    async fn generator_errors_propagate_with_context() {
        let (p, _) = pipeline(Arc::new(FailingGenerator));
        let err = p.run_for_profile(&Profile::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("upstream unavailable"));
        assert!(format!("{err:#}").contains("failing"));
    }
}
