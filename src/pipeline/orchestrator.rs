// Pipeline orchestrator: fan a document pair out to every analyzer.
//
// Each analyzer runs as its own tokio task, so one slow or failing analyzer
// never blocks the rest. Results are collected per analyzer (value or
// contained error), normalized, and assembled into an EvaluationReport whose
// five keys are fixed by its type.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::normalize::normalize;
use super::traits::{Analyzer, DocumentPair};
use super::value::AnalysisValue;

/// The complete evaluation of one document pair.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub text_similarity: Value,
    pub topic_modeling: Value,
    pub readability_metrics: Value,
    pub named_entity_recognition: Value,
    pub ai_judge: Value,
}

impl EvaluationReport {
    /// Top-level keys, in serialized order.
    pub const KEYS: [&'static str; 5] = [
        "text_similarity",
        "topic_modeling",
        "readability_metrics",
        "named_entity_recognition",
        "ai_judge",
    ];

    /// Every section paired with its key.
    pub fn sections(&self) -> [(&'static str, &Value); 5] {
        [
            (Self::KEYS[0], &self.text_similarity),
            (Self::KEYS[1], &self.topic_modeling),
            (Self::KEYS[2], &self.readability_metrics),
            (Self::KEYS[3], &self.named_entity_recognition),
            (Self::KEYS[4], &self.ai_judge),
        ]
    }

    /// Keys whose section is an `{error: ..}` object.
    pub fn degraded(&self) -> Vec<&'static str> {
        self.sections()
            .into_iter()
            .filter(|(_, v)| v.get("error").is_some_and(Value::is_string))
            .map(|(k, _)| k)
            .collect()
    }
}

/// One analyzer per report section.
#[derive(Clone)]
pub struct AnalyzerSet {
    pub text_similarity: Arc<dyn Analyzer>,
    pub topic_modeling: Arc<dyn Analyzer>,
    pub readability_metrics: Arc<dyn Analyzer>,
    pub named_entity_recognition: Arc<dyn Analyzer>,
    pub ai_judge: Arc<dyn Analyzer>,
}

/// Runs every analyzer over a document pair and assembles the report.
///
/// Holds no per-request state; share it behind an `Arc` across requests.
pub struct Pipeline {
    analyzers: AnalyzerSet,
}

impl Pipeline {
    pub fn new(analyzers: AnalyzerSet) -> Self {
        Self { analyzers }
    }

    /// Evaluate a document pair.
    ///
    /// Analyzer errors become `{error: ..}` sections. The only failure that
    /// propagates is a panic inside an analyzer task, which is a bug with no
    /// recovery contract.
    pub async fn evaluate(&self, pair: DocumentPair) -> Result<EvaluationReport> {
        let started = Instant::now();
        let pair = Arc::new(pair);
        let set = &self.analyzers;

        let (text_similarity, topic_modeling, readability_metrics, named_entity_recognition, ai_judge) = tokio::join!(
            spawn_analyzer(&set.text_similarity, &pair),
            spawn_analyzer(&set.topic_modeling, &pair),
            spawn_analyzer(&set.readability_metrics, &pair),
            spawn_analyzer(&set.named_entity_recognition, &pair),
            spawn_analyzer(&set.ai_judge, &pair),
        );

        let report = EvaluationReport {
            text_similarity: section(&set.text_similarity, text_similarity)?,
            topic_modeling: section(&set.topic_modeling, topic_modeling)?,
            readability_metrics: section(&set.readability_metrics, readability_metrics)?,
            named_entity_recognition: section(
                &set.named_entity_recognition,
                named_entity_recognition,
            )?,
            ai_judge: section(&set.ai_judge, ai_judge)?,
        };

        let degraded = report.degraded();
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            degraded = ?degraded,
            "Evaluation complete"
        );

        Ok(report)
    }
}

/// Start one analyzer on its own task.
fn spawn_analyzer(
    analyzer: &Arc<dyn Analyzer>,
    pair: &Arc<DocumentPair>,
) -> JoinHandle<AnalysisValue> {
    let analyzer = Arc::clone(analyzer);
    let pair = Arc::clone(pair);
    tokio::spawn(async move { run_contained(analyzer.as_ref(), &pair).await })
}

/// Run an analyzer, converting an `Err` into its degraded section.
async fn run_contained(analyzer: &dyn Analyzer, pair: &DocumentPair) -> AnalysisValue {
    let started = Instant::now();
    let name = analyzer.name();

    let value = match analyzer.analyze(pair).await {
        Ok(value) => value,
        Err(e) => {
            warn!(analyzer = name, error = %format!("{e:#}"), "Analyzer failed");
            return AnalysisValue::error(format!("{name} failed: {e:#}"));
        }
    };

    if value.is_error() {
        warn!(analyzer = name, "Analyzer returned a degraded result");
    }
    debug!(
        analyzer = name,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Analyzer finished"
    );
    value
}

/// Normalize a joined task result; a panicked task is fatal.
fn section(
    analyzer: &Arc<dyn Analyzer>,
    joined: Result<AnalysisValue, tokio::task::JoinError>,
) -> Result<Value> {
    let value = joined.with_context(|| format!("{} analyzer panicked", analyzer.name()))?;
    Ok(normalize(&value))
}
