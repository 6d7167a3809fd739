// Language model trait: swap-ready abstraction over the LLM service.
//
// The judge and the README generator both talk to the model through this
// trait, so tests inject canned replies and the Gemini client can be replaced
// without touching either caller.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for single-prompt text generation. Async because every real provider
/// is an HTTP API.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt and return the model's reply text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Used when no API key is configured. Every call fails, so the judge
/// reports its fallback object instead of a rubric.
pub struct UnconfiguredModel;

#[async_trait]
impl LanguageModel for UnconfiguredModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("No language model configured. Set GEMINI_API_KEY to enable the AI judge.")
    }
}
