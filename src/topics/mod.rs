// Topic modeling: fit topics over the two-document corpus and report each
// document's topic keywords plus a corpus-level topic table.

pub mod analyzer;
pub mod ctfidf;
pub mod traits;
