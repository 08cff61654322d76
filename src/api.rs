// src/api.rs
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;

use crate::brief::{Brief, DynBriefGenerator, OutlineBriefGenerator};
use crate::ingest::types::CandidateItem;
use crate::pipeline::DigestPipeline;
use crate::profile::Profile;
use crate::rank::RankOptions;
use crate::relevance::{Relevance, RelevanceEngine, RelevanceHandle, TaxonomyLabels};
use crate::store::{InMemoryProfileStore, ItemPool, ProfileStore};
use crate::taxonomy::{DEFAULT_TAXONOMY_PATH, ENV_TAXONOMY_PATH};

type ApiError = (StatusCode, String);

#[derive(Clone)]
pub struct AppState {
    pub relevance: RelevanceHandle,
    pub profiles: Arc<dyn ProfileStore>,
    pub pool: ItemPool,
    pub generator: DynBriefGenerator,
    pub rank: RankOptions,
    pub taxonomy_path: PathBuf,
}

impl AppState {
    /// In-memory stores, outline briefs, given engine + ranking defaults.
    pub fn new(engine: RelevanceEngine, rank: RankOptions) -> Self {
        let taxonomy_path = std::env::var(ENV_TAXONOMY_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TAXONOMY_PATH));
        Self {
            relevance: RelevanceHandle::new(engine),
            profiles: Arc::new(InMemoryProfileStore::new()),
            pool: ItemPool::new(),
            generator: Arc::new(OutlineBriefGenerator::default()),
            rank,
            taxonomy_path,
        }
    }

    pub fn pipeline(&self) -> DigestPipeline {
        DigestPipeline {
            relevance: self.relevance.clone(),
            profiles: Arc::clone(&self.profiles),
            pool: self.pool.clone(),
            generator: Arc::clone(&self.generator),
            rank: self.rank,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/score", post(score_item))
        .route("/rank", post(rank_items))
        .route("/profiles/{user_id}", get(get_profile).put(put_profile))
        .route("/digest/{user_id}", post(digest_for_user))
        .route("/taxonomy", get(taxonomy_labels))
        .route("/debug/pool", get(debug_pool))
        .route("/admin/reload-taxonomy", post(admin_reload_taxonomy))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn internal(e: anyhow::Error) -> ApiError {
    tracing::warn!(error = ?e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
}

#[derive(serde::Deserialize)]
struct ScoreReq {
    item: CandidateItem,
    #[serde(default)]
    profile: Profile,
}

async fn score_item(State(state): State<AppState>, Json(body): Json<ScoreReq>) -> Json<Relevance> {
    Json(state.relevance.score(&body.item, &body.profile))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankReq {
    items: Vec<CandidateItem>,
    #[serde(default)]
    profile: Profile,
    #[serde(default)]
    max_relevant: Option<usize>,
    #[serde(default)]
    max_general: Option<usize>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RankResp {
    items: Vec<CandidateItem>,
    relevant_count: usize,
    general_count: usize,
}

async fn rank_items(State(state): State<AppState>, Json(body): Json<RankReq>) -> Json<RankResp> {
    let opts = RankOptions {
        max_relevant: body.max_relevant.unwrap_or(state.rank.max_relevant),
        max_general: body.max_general.unwrap_or(state.rank.max_general),
    };
    let sel = state.relevance.select(&body.items, &body.profile, opts);
    let relevant_count = sel.relevant.len();
    let general_count = sel.general.len();
    Json(RankResp {
        items: sel.into_items(),
        relevant_count,
        general_count,
    })
}

async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    match state.profiles.get(&user_id).await.map_err(internal)? {
        Some(p) => Ok(Json(p)),
        None => Err((StatusCode::NOT_FOUND, "unknown profile".to_string())),
    }
}

async fn put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(profile): Json<Profile>,
) -> Result<StatusCode, ApiError> {
    state
        .profiles
        .put(&user_id, profile)
        .await
        .map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn digest_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Brief>, ApiError> {
    match state.pipeline().run_for_user(&user_id).await.map_err(internal)? {
        Some(b) => Ok(Json(b)),
        None => Err((StatusCode::NOT_FOUND, "unknown profile".to_string())),
    }
}

async fn taxonomy_labels(State(state): State<AppState>) -> Json<TaxonomyLabels> {
    Json(state.relevance.labels())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PoolInfo {
    count: usize,
    refreshed_at: Option<DateTime<Utc>>,
}

async fn debug_pool(State(state): State<AppState>) -> Json<PoolInfo> {
    Json(PoolInfo {
        count: state.pool.len(),
        refreshed_at: state.pool.refreshed_at(),
    })
}

async fn admin_reload_taxonomy(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .relevance
        .reload_from(&state.taxonomy_path)
        .map_err(internal)?;
    Ok("reloaded".to_string())
}
