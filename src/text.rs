// Text cleaning shared by feature extraction and n-gram counting.
//
// Tokens are runs of two or more Unicode word characters, lowercased. Stopwords are
// supplied by the caller; `english_stopwords` is the default provider.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use stop_words::{get, LANGUAGE};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\w\w+\b").unwrap_or_else(|e| panic!("token pattern is valid: {e}"))
});

/// English stopword set from the `stop-words` crate.
pub fn english_stopwords() -> HashSet<String> {
    let words: Vec<String> = get(LANGUAGE::English);
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

/// Lowercased word tokens of length two or more, in text order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tokens with stopwords removed.
pub fn content_tokens(text: &str, stopwords: &HashSet<String>) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !stopwords.contains(t))
        .collect()
}

/// Lowercase, drop punctuation and stopwords, and join with single spaces.
///
/// This is the caller-side cleaning step that n-gram extraction expects.
pub fn clean_text(text: &str, stopwords: &HashSet<String>) -> String {
    content_tokens(text, stopwords).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_punctuation_and_single_chars() {
        assert_eq!(
            tokenize("A DAO-based, decentralized x system!"),
            vec!["dao", "based", "decentralized", "system"]
        );
    }

    #[test]
    fn test_tokenize_keeps_accented_letters() {
        assert_eq!(
            tokenize("Économie décentralisée naïve"),
            vec!["économie", "décentralisée", "naïve"]
        );
        assert_eq!(tokenize("Zürich ДАО"), vec!["zürich", "дао"]);
    }

    #[test]
    fn test_clean_text_removes_stopwords() {
        let s = stops(&["the", "of"]);
        assert_eq!(
            clean_text("The governance of   the DAO", &s),
            "governance dao"
        );
    }

    #[test]
    fn test_english_stopwords_cover_common_words() {
        let s = english_stopwords();
        assert!(s.contains("the"));
        assert!(s.contains("and"));
        assert!(!s.contains("blockchain"));
    }
}
