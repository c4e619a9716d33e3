// Bibsift: consolidate, screen and cluster literature-search exports.
//
// This is the library root. Each module corresponds to one stage of the
// review pipeline; `pipeline` strings them together.

pub mod clustering;
pub mod config;
pub mod error;
pub mod filter;
pub mod lexicon;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod text;
