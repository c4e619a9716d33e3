// Textual clustering: TF-IDF features, 2-D projection, k-means partitioning.

pub mod assign;
pub mod kmeans;
pub mod reduce;
pub mod tfidf;
pub mod traits;
