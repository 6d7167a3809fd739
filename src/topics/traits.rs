// Topic model trait: swap-ready abstraction.
//
// The analyzer only needs per-document topic assignments and each topic's
// representative keywords. The default implementation is a class-based TF-IDF
// model, but anything that can fit a small corpus plugs in here.

use anyhow::Result;

/// Topic id given to documents that couldn't be placed in any topic.
pub const OUTLIER_TOPIC: i64 = -1;

/// One fitted topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub id: i64,
    /// Number of documents assigned to this topic
    pub count: usize,
    /// Representative keywords with their weights, strongest first
    pub keywords: Vec<(String, f64)>,
}

impl Topic {
    /// Short label built from the id and the top four keywords,
    /// e.g. `0_parser_tokens_grammar_ast`.
    pub fn name(&self) -> String {
        let mut parts = vec![self.id.to_string()];
        parts.extend(self.keywords.iter().take(4).map(|(w, _)| w.clone()));
        parts.join("_")
    }
}

/// Result of fitting a topic model over a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicFit {
    /// Topic id assigned to each input document, in input order
    pub assignments: Vec<i64>,
    /// Every topic, largest first
    pub topics: Vec<Topic>,
}

impl TopicFit {
    pub fn topic(&self, id: i64) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Keywords of the topic assigned to document `index` (empty if none).
    pub fn document_keywords(&self, index: usize) -> &[(String, f64)] {
        self.assignments
            .get(index)
            .and_then(|&id| self.topic(id))
            .map(|t| t.keywords.as_slice())
            .unwrap_or(&[])
    }
}

/// Trait for fitting topics over a small corpus.
pub trait TopicModel: Send + Sync {
    /// Fit topics over `documents`. Errors when the corpus can't support a fit.
    fn fit(&self, documents: &[String]) -> Result<TopicFit>;
}
