// topic_modeling: per-document topic keywords and a topic summary table.
//
// Fitting topics on two documents is fragile. A failed fit is reported as
// `{error: "Topic modeling failed: .."}` instead of an Err.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::pipeline::traits::{GENERATED_ROLE, REFERENCE_ROLE};
use crate::pipeline::value::Table;
use crate::pipeline::{AnalysisValue, Analyzer, DocumentPair};

use super::traits::{TopicFit, TopicModel};

pub struct TopicAnalyzer {
    model: Arc<dyn TopicModel>,
}

impl TopicAnalyzer {
    pub fn new(model: Arc<dyn TopicModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Analyzer for TopicAnalyzer {
    fn name(&self) -> &'static str {
        "topic_modeling"
    }

    async fn analyze(&self, pair: &DocumentPair) -> Result<AnalysisValue> {
        let documents = [pair.generated.clone(), pair.reference.clone()];

        match self.model.fit(&documents) {
            Ok(fit) => Ok(fit_to_value(&fit)),
            Err(e) => {
                warn!(error = %e, "Topic modeling failed");
                Ok(AnalysisValue::error(format!("Topic modeling failed: {e}")))
            }
        }
    }
}

fn keywords_value(keywords: &[(String, f64)]) -> AnalysisValue {
    AnalysisValue::Seq(
        keywords
            .iter()
            .map(|(w, s)| AnalysisValue::Seq(vec![w.as_str().into(), (*s).into()]))
            .collect(),
    )
}

fn fit_to_value(fit: &TopicFit) -> AnalysisValue {
    let mut info = Table::new(["Topic", "Count", "Name", "Representation"]);
    for topic in &fit.topics {
        let representation: Vec<AnalysisValue> = topic
            .keywords
            .iter()
            .map(|(w, _)| w.as_str().into())
            .collect();
        info.push_row(vec![
            topic.id.into(),
            topic.count.into(),
            topic.name().into(),
            AnalysisValue::Seq(representation),
        ]);
    }

    AnalysisValue::map([
        (
            format!("{GENERATED_ROLE}_topics"),
            keywords_value(fit.document_keywords(0)),
        ),
        (
            format!("{REFERENCE_ROLE}_topics"),
            keywords_value(fit.document_keywords(1)),
        ),
        ("topic_info".to_string(), AnalysisValue::Table(info)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::normalize;
    use crate::topics::traits::Topic;

    struct FixedModel(Option<TopicFit>);

    impl TopicModel for FixedModel {
        fn fit(&self, _documents: &[String]) -> Result<TopicFit> {
            self.0
                .clone()
                .ok_or_else(|| anyhow::anyhow!("not enough points to cluster"))
        }
    }

    #[tokio::test]
    async fn test_failure_becomes_error_value() {
        let analyzer = TopicAnalyzer::new(Arc::new(FixedModel(None)));
        let value = analyzer
            .analyze(&DocumentPair::new("a", "a"))
            .await
            .unwrap();
        let json = normalize(&value);
        assert_eq!(
            json["error"],
            "Topic modeling failed: not enough points to cluster"
        );
    }

    #[tokio::test]
    async fn test_fit_shape() {
        let fit = TopicFit {
            assignments: vec![0, 1],
            topics: vec![
                Topic {
                    id: 0,
                    count: 1,
                    keywords: vec![("rust".into(), 0.5)],
                },
                Topic {
                    id: 1,
                    count: 1,
                    keywords: vec![("python".into(), 0.25)],
                },
            ],
        };
        let analyzer = TopicAnalyzer::new(Arc::new(FixedModel(Some(fit))));
        let json = normalize(&analyzer.analyze(&DocumentPair::new("x", "y")).await.unwrap());

        assert_eq!(json["generated_readme_topics"], serde_json::json!([["rust", 0.5]]));
        assert_eq!(json["user_readme_topics"], serde_json::json!([["python", 0.25]]));
        assert_eq!(json["topic_info"][1]["Name"], "1_python");
        assert_eq!(json["topic_info"][0]["Representation"], serde_json::json!(["rust"]));
    }
}
