// Lexical summaries: merged keyword tables, n-gram tables, corpus statistics.

pub mod ngrams;
pub mod normalize;
pub mod stats;
