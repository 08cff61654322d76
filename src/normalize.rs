// src/normalize.rs
//! Searchable text surface for an item: the only string profile phrases are matched against.

use crate::ingest::types::CandidateItem;

/// Lowercase `title summary tag1 tag2 ...`, whitespace-joined. Missing summary reads as "".
pub fn searchable_text(item: &CandidateItem) -> String {
    let mut out = String::with_capacity(
        item.title.len()
            + item.summary.as_ref().map_or(0, String::len)
            + item.tags.iter().map(|t| t.len() + 1).sum::<usize>()
            + 1,
    );
    out.push_str(&item.title);
    out.push(' ');
    out.push_str(item.summary.as_deref().unwrap_or_default());
    for tag in &item.tags {
        out.push(' ');
        out.push_str(tag);
    }
    out.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(title: &str, summary: Option<&str>, tags: &[&str]) -> CandidateItem {
        CandidateItem {
            title: title.into(),
            url: "https://example.test/a".into(),
            published_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            summary: summary.map(str::to_string),
            content_snippet: Some("Snippet is NOT searchable".into()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source: None,
        }
    }

    #[test]
    fn joins_title_summary_and_tags_lowercased() {
        let s = searchable_text(&item("Rust 2.0", Some("Big NEWS"), &["Lang", "Compilers"]));
        assert_eq!(s, "rust 2.0 big news lang compilers");
    }

    #[test]
    fn missing_summary_and_tags_are_empty() {
        let s = searchable_text(&item("Only Title", None, &[]));
        assert_eq!(s, "only title ");
        assert!(!s.contains("snippet"));
    }
}
