// Pipeline assembly: turn configuration into a ready-to-run Pipeline.
//
// The three external collaborators (embedding model, NER model, LLM) are
// loaded once. Any that can't be loaded is replaced by a stand-in whose calls
// fail, so the affected analyzer reports `{error: ..}` while the rest of the
// report is still produced.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::entities::analyzer::EntityAnalyzer;
use crate::entities::onnx::OnnxEntityRecognizer;
use crate::entities::traits::{EntityRecognizer, UnavailableRecognizer};
use crate::judge::analyzer::JudgeAnalyzer;
use crate::judge::gemini::GeminiClient;
use crate::judge::traits::{LanguageModel, UnconfiguredModel};
use crate::models::download::{embedding_model_dir, ner_model_dir};
use crate::readability::analyzer::ReadabilityAnalyzer;
use crate::similarity::analyzer::TextSimilarityAnalyzer;
use crate::similarity::embeddings::{Embedder, SentenceEmbedder, UnavailableEmbedder};
use crate::text::normalize::TextNormalizer;
use crate::topics::analyzer::TopicAnalyzer;
use crate::topics::traits::TopicModel;

use super::orchestrator::{AnalyzerSet, Pipeline};

/// The external models the analyzers call into.
#[derive(Clone)]
pub struct Collaborators {
    pub embedder: Arc<dyn Embedder>,
    pub recognizer: Arc<dyn EntityRecognizer>,
    pub language_model: Arc<dyn LanguageModel>,
    pub topic_model: Arc<dyn TopicModel>,
}

impl Collaborators {
    /// Load every collaborator the config points at, falling back to
    /// stand-ins for any that are missing.
    pub fn load(config: &Config) -> Self {
        let embedder: Arc<dyn Embedder> =
            match SentenceEmbedder::load(&embedding_model_dir(&config.model_dir)) {
                Ok(model) => Arc::new(model),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "Embedding model unavailable, semantic similarity disabled");
                    Arc::new(UnavailableEmbedder::new(format!("{e:#}")))
                }
            };

        let recognizer: Arc<dyn EntityRecognizer> =
            match OnnxEntityRecognizer::load(&ner_model_dir(&config.model_dir)) {
                Ok(model) => Arc::new(model),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "NER model unavailable, entity recognition disabled");
                    Arc::new(UnavailableRecognizer::new(format!("{e:#}")))
                }
            };

        let language_model: Arc<dyn LanguageModel> = if config.require_judge().is_err() {
            warn!("GEMINI_API_KEY not set, AI judge disabled");
            Arc::new(UnconfiguredModel)
        } else {
            match GeminiClient::new(config.gemini_options()) {
                Ok(client) => {
                    info!(model = %config.judge_model, "AI judge enabled");
                    Arc::new(client)
                }
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "Gemini client unavailable, AI judge disabled");
                    Arc::new(UnconfiguredModel)
                }
            }
        };

        Self {
            embedder,
            recognizer,
            language_model,
            topic_model: Arc::new(config.topic_model()),
        }
    }
}

/// Wire collaborators into the five analyzers.
pub fn build_pipeline(collaborators: Collaborators) -> Pipeline {
    let Collaborators {
        embedder,
        recognizer,
        language_model,
        topic_model,
    } = collaborators;

    Pipeline::new(AnalyzerSet {
        text_similarity: Arc::new(TextSimilarityAnalyzer::new(
            TextNormalizer::default(),
            embedder,
        )),
        topic_modeling: Arc::new(TopicAnalyzer::new(topic_model)),
        readability_metrics: Arc::new(ReadabilityAnalyzer),
        named_entity_recognition: Arc::new(EntityAnalyzer::new(recognizer)),
        ai_judge: Arc::new(JudgeAnalyzer::new(language_model)),
    })
}
