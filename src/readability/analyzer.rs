// readability_metrics: Flesch reading ease and Gunning fog for each document.

use anyhow::Result;
use async_trait::async_trait;

use crate::pipeline::traits::{GENERATED_ROLE, REFERENCE_ROLE};
use crate::pipeline::{AnalysisValue, Analyzer, DocumentPair};

use super::formulas::ReadabilityScores;

#[derive(Default)]
pub struct ReadabilityAnalyzer;

fn scores_value(text: &str) -> AnalysisValue {
    let scores = ReadabilityScores::from_text(text);
    AnalysisValue::map([
        ("flesch_reading_ease", scores.flesch_reading_ease.into()),
        ("gunning_fog_index", scores.gunning_fog_index.into()),
    ])
}

#[async_trait]
impl Analyzer for ReadabilityAnalyzer {
    fn name(&self) -> &'static str {
        "readability_metrics"
    }

    async fn analyze(&self, pair: &DocumentPair) -> Result<AnalysisValue> {
        Ok(AnalysisValue::map([
            (GENERATED_ROLE, scores_value(&pair.generated)),
            (REFERENCE_ROLE, scores_value(&pair.reference)),
        ]))
    }
}
