// Sliding-window n-gram extraction.
//
// Input text must already be cleaned (lowercased, stopwords removed, see
// `text::clean_text`). Windows do not wrap and are not padded, so a text of
// `t` tokens yields `max(0, t - n + 1)` grams. Frequency floors belong to the
// caller (`stats::rank`), not to extraction.

use indexmap::IndexMap;
use tracing::debug;

/// All contiguous runs of `n` whitespace-delimited tokens, in text order.
/// `n == 0` yields nothing.
pub fn ngrams(text: &str, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    let tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

/// Sum gram counts over a corpus for every length in `min..=max`.
///
/// Keys keep first-seen order: shorter lengths of a document before longer
/// ones, documents in input order.
pub fn count_ngrams<S: AsRef<str>>(texts: &[S], min: usize, max: usize) -> IndexMap<String, usize> {
    let mut table: IndexMap<String, usize> = IndexMap::new();
    for text in texts {
        for n in min.max(1)..=max {
            for gram in ngrams(text.as_ref(), n) {
                *table.entry(gram).or_insert(0) += 1;
            }
        }
    }
    debug!(documents = texts.len(), distinct = table.len(), "Counted n-grams");
    table
}
