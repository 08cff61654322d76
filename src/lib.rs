// src/lib.rs
// Public library surface for integration tests (and potential reuse).

// Ranking core
pub mod normalize;
pub mod profile;
pub mod rank;
pub mod relevance;
pub mod taxonomy;

// Collaborators around the core
pub mod brief;
pub mod ingest;
pub mod pipeline;
pub mod store;

// Service plumbing
pub mod api;
pub mod config;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::ingest::types::CandidateItem;
pub use crate::profile::Profile;
pub use crate::rank::{rank, RankOptions};
pub use crate::relevance::score;
