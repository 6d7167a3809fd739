// Analyzer trait: the seam every metric plugs into.
//
// Each analyzer sees the same immutable DocumentPair and returns an
// AnalysisValue. Anticipated failures (a model that can't fit two documents,
// an unparseable LLM reply) are returned as `AnalysisValue::error(..)` values.
// An `Err` is still contained by the orchestrator and reported as that
// analyzer's error entry; only a panic escapes the pipeline.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::value::AnalysisValue;

/// Report label for per-document output derived from the generated README.
pub const GENERATED_ROLE: &str = "generated_readme";
/// Report label for per-document output derived from the reference README.
pub const REFERENCE_ROLE: &str = "user_readme";

/// The two documents under comparison. Empty strings are valid input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPair {
    pub generated: String,
    pub reference: String,
}

impl DocumentPair {
    pub fn new(generated: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            generated: generated.into(),
            reference: reference.into(),
        }
    }

    /// The same pair with the roles exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            generated: self.reference.clone(),
            reference: self.generated.clone(),
        }
    }
}

/// One independent metric over a document pair.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Report key this analyzer fills, e.g. `text_similarity`.
    fn name(&self) -> &'static str;

    /// Analyze the pair.
    async fn analyze(&self, pair: &DocumentPair) -> Result<AnalysisValue>;
}
