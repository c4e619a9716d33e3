// Unit tests for the inclusion-criteria chain.
//
// Covers monotonicity, identity of the empty chain, first-failure reporting,
// the standard protocol chain built from Config, and the chain-local
// duplicate guard's dependence on its position.

use bibsift::config::Config;
use bibsift::filter::criteria::{
    Accessible, CriterionKind, English, NotDuplicate, PeerReviewed, Recent, Relevant,
};
use bibsift::filter::traits::FnCriterion;
use bibsift::filter::FilterChain;
use bibsift::records::Record;

fn eligible(title: &str) -> Record {
    Record::new()
        .with("entry_type", "article")
        .with("title", title)
        .with("year", "2022")
        .with("url", "https://example.org")
}

fn protocol_config() -> Config {
    Config {
        current_year: Some(2024),
        ..Config::default()
    }
}

// ============================================================
// Chain-level properties
// ============================================================

#[test]
fn filtering_never_adds_records() {
    let records = vec![
        eligible("Blockchain voting"),
        eligible("Unrelated"),
        Record::new(),
        eligible("DAO treasuries").with("language", "french"),
    ];
    let chains: Vec<FilterChain> = vec![
        FilterChain::new(),
        FilterChain::new().with(PeerReviewed),
        FilterChain::from_config(&protocol_config()),
    ];
    for mut chain in chains {
        let outcome = chain.apply(records.clone());
        assert!(outcome.kept.len() <= records.len());
        assert_eq!(outcome.kept.len() + outcome.rejected.len(), records.len());
    }
}

#[test]
fn empty_chain_returns_input_unchanged() {
    let records = vec![eligible("b"), Record::new(), eligible("a")];
    let outcome = FilterChain::new().apply(records.clone());
    assert_eq!(outcome.kept, records);
    assert!(outcome.rejections_by_criterion().is_empty());
}

#[test]
fn only_first_failing_criterion_is_reported() {
    // Fails peer_reviewed, recent and relevant; only the first is recorded
    let record = Record::new().with("entry_type", "misc").with("year", "1990");
    let mut chain = FilterChain::new()
        .with(PeerReviewed)
        .with(Recent {
            current_year: 2024,
            window_years: 10,
        })
        .with(Relevant::new(&["dao"]));
    let outcome = chain.apply(vec![record]);
    let tally = outcome.rejections_by_criterion();
    assert_eq!(tally["peer_reviewed"], 1);
    assert_eq!(tally["recent"], 0);
    assert_eq!(tally["relevant"], 0);
}

#[test]
fn closures_join_the_chain() {
    let mut chain = FilterChain::new()
        .with(English)
        .with(FnCriterion::new("has_abstract", |r: &Record| {
            r.abstract_text().is_some()
        }));
    let outcome = chain.apply(vec![
        eligible("x").with("abstract", "text"),
        eligible("y"),
    ]);
    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(outcome.rejected[0].criterion, "has_abstract");
}

// ============================================================
// Standard protocol chain
// ============================================================

#[test]
fn standard_chain_order_and_names() {
    let mut chain = FilterChain::from_config(&protocol_config());
    assert_eq!(chain.len(), 7);
    let outcome = chain.apply(vec![]);
    assert_eq!(
        outcome.criteria,
        vec![
            "peer_reviewed",
            "recent",
            "relevant",
            "english",
            "not_duplicate",
            "accessible",
            "complete"
        ]
    );
}

#[test]
fn standard_chain_applies_every_rule() {
    let records = vec![
        eligible("A Blockchain survey"),                                   // kept
        eligible("A blockchain survey"),                                   // not_duplicate
        eligible("Web3 wallets").with("entry_type", "book"),               // peer_reviewed
        eligible("DAO law").with("year", "2001"),                          // recent
        eligible("Relational databases"),                                  // relevant
        eligible("Decentralized finance").with("language", "Spanish"),     // english
        Record::new()
            .with("entry_type", "conference")
            .with("title", "DAO tooling")
            .with("year", "2023"),                                         // accessible
        eligible("Web3 abstracts").with("entry_type", "abstract"),         // peer_reviewed
    ];
    let outcome = FilterChain::from_config(&protocol_config()).apply(records);
    assert_eq!(outcome.kept.len(), 1);
    let tally = outcome.rejections_by_criterion();
    assert_eq!(tally["peer_reviewed"], 2);
    assert_eq!(tally["recent"], 1);
    assert_eq!(tally["relevant"], 1);
    assert_eq!(tally["english"], 1);
    assert_eq!(tally["not_duplicate"], 1);
    assert_eq!(tally["accessible"], 1);
    assert_eq!(tally["complete"], 0);
}

#[test]
fn completeness_rejects_preliminary_when_peer_review_is_off() {
    let config = Config {
        criteria: vec![CriterionKind::Complete],
        ..protocol_config()
    };
    let outcome = FilterChain::from_config(&config).apply(vec![
        eligible("x").with("entry_type", "preliminary"),
        eligible("y").with("entry_type", "misc"),
    ]);
    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(outcome.rejected[0].criterion, "complete");
}

// ============================================================
// Chain-local duplicate guard
// ============================================================

#[test]
fn not_duplicate_only_remembers_records_that_reach_it() {
    // The first copy is rejected earlier in the chain, so the second copy is
    // the first one the guard sees.
    let first = Record::new().with("title", "Same paper");
    let second = Record::new().with("title", "Same paper").with("url", "https://x");
    let mut chain = FilterChain::new()
        .with(Accessible)
        .with(NotDuplicate::default());
    let outcome = chain.apply(vec![first, second.clone()]);
    assert_eq!(outcome.kept, vec![second]);
}

#[test]
fn not_duplicate_state_is_fresh_each_pass() {
    let mut chain = FilterChain::new().with(NotDuplicate::default());
    let records = vec![eligible("One"), eligible("Two")];
    assert_eq!(chain.apply(records.clone()).kept.len(), 2);
    assert_eq!(chain.apply(records).kept.len(), 2);
}

#[test]
fn malformed_year_is_excluded_not_fatal() {
    let records = vec![
        eligible("DAO one").with("year", "2O20"),
        eligible("DAO two"),
    ];
    let outcome = FilterChain::from_config(&protocol_config()).apply(records);
    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(outcome.malformed_count(), 1);
    assert_eq!(outcome.rejected[0].criterion, "recent");
}

#[test]
fn extreme_year_fails_recency_without_stopping_the_run() {
    let records = vec![
        eligible("DAO one").with("year", &i32::MIN.to_string()),
        eligible("DAO two"),
    ];
    let outcome = FilterChain::from_config(&protocol_config()).apply(records);
    let titles: Vec<_> = outcome.kept.iter().filter_map(|r| r.title()).collect();
    assert_eq!(titles, vec!["DAO two"]);
    assert_eq!(outcome.rejections_by_criterion()["recent"], 1);
    assert_eq!(outcome.malformed_count(), 0);
}
