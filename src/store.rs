// src/store.rs
//! In-memory collaborators: profile lookup and the latest ingested item batch.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ingest::types::CandidateItem;
use crate::profile::Profile;

#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>>;
    async fn put(&self, user_id: &str, profile: Profile) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    inner: Arc<RwLock<HashMap<String, Profile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>> {
        let g = self
            .inner
            .read()
            .map_err(|_| anyhow::anyhow!("profile store lock poisoned"))?;
        Ok(g.get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, profile: Profile) -> Result<()> {
        let mut g = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("profile store lock poisoned"))?;
        g.insert(user_id.to_string(), profile);
        Ok(())
    }
}

/// Latest ingested batch. Each ingest run replaces the whole batch.
#[derive(Clone, Default)]
pub struct ItemPool {
    inner: Arc<RwLock<PoolState>>,
}

#[derive(Default)]
struct PoolState {
    items: Arc<Vec<CandidateItem>>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl ItemPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, items: Vec<CandidateItem>) {
        let mut g = match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        g.items = Arc::new(items);
        g.refreshed_at = Some(Utc::now());
    }

    /// Cheap snapshot; later refreshes do not affect it.
    pub fn snapshot(&self) -> Arc<Vec<CandidateItem>> {
        match self.inner.read() {
            Ok(g) => Arc::clone(&g.items),
            Err(poisoned) => Arc::clone(&poisoned.into_inner().items),
        }
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        match self.inner.read() {
            Ok(g) => g.refreshed_at,
            Err(poisoned) => poisoned.into_inner().refreshed_at,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn it(url: &str) -> CandidateItem {
        CandidateItem {
            title: "t".into(),
            url: url.into(),
            published_at: Utc::now(),
            summary: None,
            content_snippet: None,
            tags: vec![],
            source: None,
        }
    }

    #[tokio::test]
    async fn profiles_roundtrip_by_user() {
        let s = InMemoryProfileStore::new();
        assert!(s.get("u1").await.unwrap().is_none());
        let p = Profile {
            tools: vec!["Notion".into()],
            ..Default::default()
        };
        s.put("u1", p.clone()).await.unwrap();
        assert_eq!(s.get("u1").await.unwrap(), Some(p));
        assert!(s.get("u2").await.unwrap().is_none());
    }

    #[test]
    fn pool_replaces_wholesale_and_snapshots_are_stable() {
        let pool = ItemPool::new();
        assert!(pool.is_empty());
        assert!(pool.refreshed_at().is_none());

        pool.replace(vec![it("https://a.test/1"), it("https://a.test/2")]);
        let snap = pool.snapshot();
        pool.replace(vec![it("https://a.test/3")]);

        assert_eq!(snap.len(), 2);
        assert_eq!(pool.len(), 1);
        assert!(pool.refreshed_at().is_some());
    }
}
