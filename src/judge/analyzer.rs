// ai_judge: rubric scoring by the language model.
//
// The reply goes through the staged parser, and a failed request becomes an
// `{error, raw}` object. This analyzer never returns Err.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::pipeline::{AnalysisValue, Analyzer, DocumentPair};

use super::parse::{parse_reply, request_failure, ParseStage};
use super::prompt::render_prompt;
use super::traits::LanguageModel;

pub struct JudgeAnalyzer {
    model: Arc<dyn LanguageModel>,
}

impl JudgeAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Analyzer for JudgeAnalyzer {
    fn name(&self) -> &'static str {
        "ai_judge"
    }

    async fn analyze(&self, pair: &DocumentPair) -> Result<AnalysisValue> {
        let prompt = render_prompt(&pair.generated, &pair.reference);

        let reply = match self.model.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "AI judge request failed");
                return Ok(AnalysisValue::Json(request_failure(&format!(
                    "AI judge request failed: {e:#}"
                ))));
            }
        };

        let parsed = parse_reply(&reply);
        match parsed.stage {
            ParseStage::Direct => debug!("Judge reply parsed directly"),
            ParseStage::Extracted => info!("Judge reply parsed after extracting JSON from prose"),
            ParseStage::Fallback => warn!(
                reply_chars = reply.chars().count(),
                "Judge reply could not be parsed"
            ),
        }

        Ok(AnalysisValue::Json(parsed.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedModel {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => anyhow::bail!("{message}"),
            }
        }
    }

    fn pair() -> DocumentPair {
        DocumentPair::new("# Gen\nGenerated text.", "# User\nUser text.")
    }

    #[tokio::test]
    async fn test_fenced_rubric() {
        let model = Arc::new(CannedModel::replying(
            "```json\n{\"Clarity\": 5, \"Coverage\": 5, \"Correctness\": 5, \"Style\": 5, \"Composite\": 100, \"Reasoning\": \"same\"}\n```",
        ));
        let analyzer = JudgeAnalyzer::new(model.clone());

        let value = analyzer.analyze(&pair()).await.unwrap();
        let AnalysisValue::Json(json) = value else {
            panic!("expected JSON");
        };
        assert_eq!(json["Composite"], 100);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Generated text."));
        assert!(prompts[0].contains("User text."));
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_fallback() {
        let analyzer = JudgeAnalyzer::new(Arc::new(CannedModel::replying("I cannot answer this.")));
        let value = analyzer.analyze(&pair()).await.unwrap();
        assert!(value.is_error());
        let AnalysisValue::Json(json) = value else {
            panic!("expected JSON");
        };
        assert_eq!(json["error"], "Failed to parse AI response");
        assert_eq!(json["raw"], "I cannot answer this.");
    }

    #[tokio::test]
    async fn test_request_failure_is_contained() {
        let analyzer = JudgeAnalyzer::new(Arc::new(CannedModel::failing("connection refused")));
        let value = analyzer.analyze(&pair()).await.unwrap();
        let AnalysisValue::Json(json) = value else {
            panic!("expected JSON");
        };
        assert_eq!(json["error"], "AI judge request failed: connection refused");
        assert_eq!(json["raw"], "");
    }

    #[tokio::test]
    async fn test_unconfigured_model() {
        let analyzer = JudgeAnalyzer::new(Arc::new(super::super::traits::UnconfiguredModel));
        let value = analyzer.analyze(&pair()).await.unwrap();
        assert!(value.is_error());
    }
}
