// text_similarity: lexical and semantic cosine between the two documents.
//
// The lexical score needs no model and is always reported. When embedding
// fails, `semantic_cosine_similarity` holds an `{error: ..}` object instead.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::pipeline::{AnalysisValue, Analyzer, DocumentPair};
use crate::text::normalize::TextNormalizer;

use super::embeddings::{cosine_similarity, Embedder};
use super::tfidf::tfidf_cosine;

pub struct TextSimilarityAnalyzer {
    normalizer: TextNormalizer,
    embedder: Arc<dyn Embedder>,
}

impl TextSimilarityAnalyzer {
    pub fn new(normalizer: TextNormalizer, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            normalizer,
            embedder,
        }
    }

    /// TF-IDF cosine over stop-word-stripped, lowercased text.
    pub fn lexical(&self, pair: &DocumentPair) -> f64 {
        let generated = self.normalizer.normalize(&pair.generated);
        let reference = self.normalizer.normalize(&pair.reference);
        tfidf_cosine(&generated, &reference)
    }

    /// Embedding cosine over the raw text.
    pub async fn semantic(&self, pair: &DocumentPair) -> Result<f64> {
        let texts = [pair.generated.clone(), pair.reference.clone()];
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .context("Failed to embed documents")?;

        match embeddings.as_slice() {
            [a, b] => Ok(cosine_similarity(a, b)),
            other => anyhow::bail!("Embedder returned {} vectors for 2 documents", other.len()),
        }
    }
}

#[async_trait]
impl Analyzer for TextSimilarityAnalyzer {
    fn name(&self) -> &'static str {
        "text_similarity"
    }

    async fn analyze(&self, pair: &DocumentPair) -> Result<AnalysisValue> {
        let lexical = self.lexical(pair);
        let semantic = match self.semantic(pair).await {
            Ok(score) => {
                debug!(lexical, semantic = score, "Computed text similarity");
                score.into()
            }
            Err(e) => {
                warn!(lexical, error = %format!("{e:#}"), "Semantic similarity unavailable");
                AnalysisValue::error(format!("Semantic similarity failed: {e:#}"))
            }
        };

        Ok(AnalysisValue::map([
            ("tfidf_cosine_similarity", lexical.into()),
            ("semantic_cosine_similarity", semantic),
        ]))
    }
}
