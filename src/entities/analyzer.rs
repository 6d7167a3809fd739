// named_entity_recognition: entity mentions for each document, in order.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::pipeline::traits::{GENERATED_ROLE, REFERENCE_ROLE};
use crate::pipeline::{AnalysisValue, Analyzer, DocumentPair};

use super::traits::{Entity, EntityRecognizer};

pub struct EntityAnalyzer {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl EntityAnalyzer {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }
}

fn entities_value(entities: Vec<Entity>) -> AnalysisValue {
    AnalysisValue::Seq(
        entities
            .into_iter()
            .map(|e| {
                AnalysisValue::map([
                    ("text", AnalysisValue::Text(e.text)),
                    ("label", AnalysisValue::Text(e.label)),
                ])
            })
            .collect(),
    )
}

#[async_trait]
impl Analyzer for EntityAnalyzer {
    fn name(&self) -> &'static str {
        "named_entity_recognition"
    }

    async fn analyze(&self, pair: &DocumentPair) -> Result<AnalysisValue> {
        let generated = self
            .recognizer
            .recognize(&pair.generated)
            .await
            .context("Entity recognition failed for the generated README")?;
        let reference = self
            .recognizer
            .recognize(&pair.reference)
            .await
            .context("Entity recognition failed for the user README")?;

        Ok(AnalysisValue::map([
            (format!("{GENERATED_ROLE}_entities"), entities_value(generated)),
            (format!("{REFERENCE_ROLE}_entities"), entities_value(reference)),
        ]))
    }
}
