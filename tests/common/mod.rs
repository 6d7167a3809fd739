// Deterministic stand-ins for the external models, shared by the
// integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use lectern::entities::traits::{Entity, EntityRecognizer};
use lectern::judge::traits::LanguageModel;
use lectern::pipeline::{build_pipeline, Collaborators, Pipeline};
use lectern::similarity::embeddings::Embedder;
use lectern::topics::ctfidf::KeywordTopicModel;
use lectern::topics::traits::{TopicFit, TopicModel};

pub const RUBRIC_REPLY: &str = "```json\n{\"Clarity\": 5, \"Coverage\": 4, \"Correctness\": 5, \"Style\": 4, \"Composite\": 90, \"Reasoning\": \"Covers the same ground.\"}\n```";

/// Bag-of-words embedding: each lowercase word adds 1.0 to a bucket chosen
/// by its byte sum. Identical texts embed identically.
pub struct HashingEmbedder;

const DIM: usize = 64;

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0; DIM];
                for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
                    let bucket = word.to_lowercase().bytes().map(usize::from).sum::<usize>() % DIM;
                    v[bucket] += 1.0;
                }
                v
            })
            .collect())
    }
}

/// Tags every capitalized word as MISC.
pub struct CapitalizedRecognizer;

#[async_trait]
impl EntityRecognizer for CapitalizedRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        Ok(text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
            .map(|w| Entity::new(w, "MISC"))
            .collect())
    }
}

/// Replies with the same text to every prompt.
pub struct CannedModel(pub String);

#[async_trait]
impl LanguageModel for CannedModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// A topic model that never fits.
pub struct FailingTopicModel;

impl TopicModel for FailingTopicModel {
    fn fit(&self, _documents: &[String]) -> Result<TopicFit> {
        anyhow::bail!("not enough documents")
    }
}

pub fn collaborators(judge_reply: &str) -> Collaborators {
    Collaborators {
        embedder: Arc::new(HashingEmbedder),
        recognizer: Arc::new(CapitalizedRecognizer),
        language_model: Arc::new(CannedModel(judge_reply.to_string())),
        topic_model: Arc::new(KeywordTopicModel::default()),
    }
}

/// A pipeline whose collaborators are all deterministic fakes.
pub fn fake_pipeline() -> Pipeline {
    build_pipeline(collaborators(RUBRIC_REPLY))
}
