// Entity recognizer trait and the entity mention type.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entity mention as found in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    /// Category label, e.g. `PER`, `ORG`, `LOC`, `MISC`
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Trait for extracting entity mentions. Async because inference is offloaded
/// to a blocking thread.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Entities in document order, duplicates kept. Empty text yields none.
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Stand-in used when the NER model isn't on disk. Every call fails.
pub struct UnavailableRecognizer {
    reason: String,
}

impl UnavailableRecognizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl EntityRecognizer for UnavailableRecognizer {
    async fn recognize(&self, _text: &str) -> Result<Vec<Entity>> {
        anyhow::bail!("Entity recognition model unavailable: {}", self.reason)
    }
}
