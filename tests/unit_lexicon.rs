// Unit tests for lexical summaries: n-gram windows, the greedy keyword
// normalizer (threshold boundary, order sensitivity, aliases), and ranking.

use indexmap::IndexMap;

use bibsift::lexicon::ngrams::{count_ngrams, ngrams};
use bibsift::lexicon::normalize::{KeywordNormalizer, Similarity};
use bibsift::lexicon::stats::{keyword_counts, rank};
use bibsift::records::Record;
use bibsift::text::clean_text;

fn counts(pairs: &[(&str, usize)]) -> IndexMap<String, usize> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// ============================================================
// N-grams
// ============================================================

#[test]
fn bigrams_of_repeating_text() {
    assert_eq!(ngrams("a b a b", 2), vec!["a b", "b a", "a b"]);
}

#[test]
fn gram_count_is_tokens_minus_n_plus_one() {
    let text = "one two three four five";
    for n in 1..=7 {
        let expected = 5usize.saturating_sub(n - 1);
        assert_eq!(ngrams(text, n).len(), expected, "n = {n}");
    }
}

#[test]
fn cleaning_is_a_separate_step() {
    let stops = ["the", "of", "in"].iter().map(|s| s.to_string()).collect();
    let cleaned = clean_text("The Governance of DAOs in Practice", &stops);
    assert_eq!(cleaned, "governance daos practice");
    assert_eq!(ngrams(&cleaned, 2), vec!["governance daos", "daos practice"]);
    // Uncleaned text is taken as-is
    assert_eq!(ngrams("The DAO", 2), vec!["The DAO"]);
}

#[test]
fn cleaned_non_ascii_words_stay_whole() {
    let stops = ["la", "des"].iter().map(|s| s.to_string()).collect();
    let cleaned = clean_text("La gouvernance des DAO décentralisées", &stops);
    assert_eq!(cleaned, "gouvernance dao décentralisées");
    assert_eq!(
        ngrams(&cleaned, 2),
        vec!["gouvernance dao", "dao décentralisées"]
    );
}

#[test]
fn corpus_counts_then_floor() {
    let texts = vec!["smart contract audit"; 5]
        .into_iter()
        .chain(["smart contract"])
        .collect::<Vec<_>>();
    let table = count_ngrams(&texts, 1, 3);
    assert_eq!(table["smart contract"], 6);
    assert_eq!(table["smart contract audit"], 5);

    let ranked = rank(&table, 6, 10);
    assert_eq!(
        ranked,
        vec![
            ("smart".to_string(), 6),
            ("contract".to_string(), 6),
            ("smart contract".to_string(), 6)
        ]
    );
}

// ============================================================
// Keyword normalizer
// ============================================================

#[test]
fn ratio_equal_to_threshold_merges() {
    let ratio = Similarity::Levenshtein.score("blockchain", "blockchains");
    let n = KeywordNormalizer::new(ratio).unwrap();
    let merged = n.merge(&counts(&[("blockchain", 2), ("blockchains", 3)]));
    assert_eq!(merged, counts(&[("blockchain", 5)]));
}

#[test]
fn ratio_just_below_threshold_stays_separate() {
    let ratio = Similarity::Levenshtein.score("blockchain", "blockchains");
    let n = KeywordNormalizer::new(ratio + f64::EPSILON).unwrap();
    let merged = n.merge(&counts(&[("blockchain", 2), ("blockchains", 3)]));
    assert_eq!(merged.len(), 2);
}

#[test]
fn merge_is_order_sensitive() {
    // "b" sits between "a" and "c": close to both, while a and c are far apart.
    let a = "abcdefgh";
    let b = "abcdwxyz";
    let c = "stuvwxyz";
    let n = KeywordNormalizer::new(0.5).unwrap();

    let forward = n.merge(&counts(&[(a, 1), (b, 1), (c, 1)]));
    assert_eq!(forward, counts(&[(a, 2), (c, 1)]));

    let backward = n.merge(&counts(&[(c, 1), (b, 1), (a, 1)]));
    assert_eq!(backward, counts(&[(c, 2), (a, 1)]));
}

#[test]
fn representative_is_first_seen_spelling() {
    let n = KeywordNormalizer::new(0.8).unwrap();
    let merged = n.merge(&counts(&[("smart contracts", 4), ("smart contract", 1)]));
    assert_eq!(merged.get_index(0), Some((&"smart contracts".to_string(), &5)));
}

#[test]
fn aliases_override_before_similarity() {
    let aliases: IndexMap<String, String> = [
        ("distributed ledger".to_string(), "blockchain".to_string()),
        ("dlt".to_string(), "blockchain".to_string()),
    ]
    .into_iter()
    .collect();
    let n = KeywordNormalizer::new(0.95).unwrap().with_aliases(aliases);
    let buckets = n.buckets(&counts(&[
        ("distributed ledger", 1),
        ("dao", 2),
        ("dlt", 3),
    ]));
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].representative, "blockchain");
    assert_eq!(buckets[0].count, 4);
}

#[test]
fn keyword_counts_feed_the_normalizer() {
    let records = vec![
        Record::new().with("keywords", "Blockchain, Smart Contracts"),
        Record::new().with("keywords", "blockchains, smart contract"),
        Record::new(),
    ];
    let raw = keyword_counts(&records);
    assert_eq!(raw.len(), 4);
    let merged = KeywordNormalizer::new(0.8).unwrap().merge(&raw);
    assert_eq!(merged, counts(&[("blockchain", 2), ("smart contracts", 2)]));
}
