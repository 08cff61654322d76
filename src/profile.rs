// src/profile.rs
//! User interest profile consumed (read-only) by the relevance engine.

use serde::{Deserialize, Serialize};

/// A user's declared interests.
///
/// `industry` and `role_title` are canonical labels when they come from the
/// profile form, but any string is accepted: unknown labels simply get no
/// taxonomy expansion. Unset and blank values contribute nothing to scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub industry: Option<String>,
    pub role_title: Option<String>,
    pub goals: Vec<String>,
    pub tools: Vec<String>,
    pub focus_topics: Vec<String>,
    pub avoid_topics: Vec<String>,
}

impl Profile {
    /// Industry label lowercased, or `None` when unset/blank.
    pub fn industry_needle(&self) -> Option<String> {
        needle(self.industry.as_deref())
    }

    /// Role label lowercased, or `None` when unset/blank.
    pub fn role_needle(&self) -> Option<String> {
        needle(self.role_title.as_deref())
    }

    /// True when no field can produce a positive or negative signal.
    pub fn is_empty(&self) -> bool {
        self.industry_needle().is_none()
            && self.role_needle().is_none()
            && all_blank(&self.goals)
            && all_blank(&self.tools)
            && all_blank(&self.focus_topics)
            && all_blank(&self.avoid_topics)
    }
}

/// Lowercased, trimmed match phrase; blank input yields `None`.
pub fn needle(raw: Option<&str>) -> Option<String> {
    let t = raw?.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_lowercase())
    }
}

fn all_blank(v: &[String]) -> bool {
    v.iter().all(|s| s.trim().is_empty())
}
