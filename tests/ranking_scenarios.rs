// tests/ranking_scenarios.rs
// Hand-picked scoring and selection scenarios with pinned values.

use chrono::{TimeZone, Utc};
use digest_curator::relevance::{score, RelevanceEngine};
use digest_curator::{rank, CandidateItem, Profile, RankOptions};

fn item(n: i64, title: &str) -> CandidateItem {
    CandidateItem {
        title: title.to_string(),
        url: format!("https://scenario.test/{n}"),
        published_at: Utc.timestamp_opt(1_750_000_000 + n * 300, 0).unwrap(),
        summary: Some(String::new()),
        content_snippet: None,
        tags: vec![],
        source: Some("Scenario".into()),
    }
}

fn fintech_engineer() -> Profile {
    Profile {
        industry: Some("Fintech / Financial Services".into()),
        role_title: Some("Software Engineer".into()),
        focus_topics: vec!["AI agents".into()],
        ..Default::default()
    }
}

#[test]
fn fintech_engineer_coding_agent_is_pinned() {
    let it = item(1, "New AI Coding Agent Launches for Fintech Developers");
    let r = RelevanceEngine::builtin().score(&it, &fintech_engineer());

    // Full label "fintech / financial services" is not in the text, so no direct hit;
    // keyword "fintech" → +5. Role: "developer" + "coding" → +10. Focus "ai agents" is
    // not a literal substring of "ai coding agent".
    assert_eq!(r.score, 15, "{r:?}");
    assert_eq!(r.matches, 2);
    assert!(r.matched.iter().any(|m| m == "industry:keyword:fintech"));
    assert!(r.matched.iter().any(|m| m == "role:keyword:developer"));
    assert!(r.matched.iter().any(|m| m == "role:keyword:coding"));
    assert!(!r.matched.iter().any(|m| m.starts_with("focus:")));
    assert!(!r.matched.iter().any(|m| m.ends_with(":direct")));
}

#[test]
fn fintech_engineer_with_literal_focus_topic_gets_bonus() {
    let it = item(2, "AI agents for Fintech developers: a coding guide");
    let r = RelevanceEngine::builtin().score(&it, &fintech_engineer());
    // 5 + 10 + 15 + 10 (three categories)
    assert_eq!(r.score, 40, "{r:?}");
    assert_eq!(r.matches, 3);
    assert!(r.reasons.iter().any(|s| s == "bonus:3plus"));
}

#[test]
fn direct_label_hits_when_text_contains_it() {
    let p = Profile {
        role_title: Some("Product Manager".into()),
        ..Default::default()
    };
    let it = item(3, "What every product manager should know about roadmap debt");
    // direct +18, keywords "roadmap" → +5
    assert_eq!(score(&it, &p), 23);
}

#[test]
fn avoid_only_profile_clamps_to_zero() {
    let p = Profile {
        avoid_topics: vec!["fintech".into()],
        ..Default::default()
    };
    let it = item(1, "New AI Coding Agent Launches for Fintech Developers");
    let r = RelevanceEngine::builtin().score(&it, &p);
    assert_eq!(r.score, 0);
    assert!(r.reasons.iter().any(|s| s == "avoid:fintech"));
    assert!(r.reasons.iter().any(|s| s == "clamped:low"));

    // never selected as relevant, still eligible as general
    let out = rank(&[it.clone()], &p, RankOptions::default());
    assert_eq!(out, vec![it]);
}

#[test]
fn fifty_items_two_matches() {
    let mut items: Vec<CandidateItem> = (0..50)
        .map(|n| item(n, &format!("Market update number {n}")))
        .collect();
    items[10].title = "Quantum networking trial".into();
    items[40].title = "Quantum error correction with qiskit".into();

    let p = Profile {
        focus_topics: vec!["quantum".into()],
        tools: vec!["qiskit".into()],
        ..Default::default()
    };
    let out = rank(
        &items,
        &p,
        RankOptions {
            max_relevant: 30,
            max_general: 15,
        },
    );

    assert_eq!(out.len(), 17);
    // relevant segment by score: 27 (item 40) then 15 (item 10)
    assert_eq!(out[0].url, "https://scenario.test/40");
    assert_eq!(out[1].url, "https://scenario.test/10");
    // general segment: the 15 newest of the rest, newest first
    let general: Vec<String> = out[2..].iter().map(|i| i.url.clone()).collect();
    let expected: Vec<String> = (0..50)
        .rev()
        .filter(|n| *n != 40 && *n != 10)
        .take(15)
        .map(|n| format!("https://scenario.test/{n}"))
        .collect();
    assert_eq!(general, expected);
}

#[test]
fn software_engineer_matches_engineer_and_software() {
    let p = Profile {
        role_title: Some("Software Engineer".into()),
        ..Default::default()
    };
    let it = item(4, "Why every engineer should learn software testing");
    let r = RelevanceEngine::builtin().score(&it, &p);
    // no direct hit ("engineer should learn software"); keywords engineer + software → +10
    assert_eq!(r.score, 10, "{r:?}");
    assert_eq!(r.matches, 1);
    assert_eq!(
        r.matched,
        vec![
            "role:keyword:engineer".to_string(),
            "role:keyword:software".to_string(),
        ]
    );
}
