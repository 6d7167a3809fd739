// Composition tests: the full pipeline over fake collaborators.
//
// These tests exercise the data flow from DocumentPair through every analyzer,
// the normalizer and the orchestrator into an EvaluationReport, without any
// model files, network calls, or filesystem side effects.

mod common;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use common::{collaborators, fake_pipeline, FailingTopicModel};
use lectern::judge::rubric::RubricScore;
use lectern::pipeline::normalize::normalize_json;
use lectern::pipeline::{
    build_pipeline, AnalysisValue, Analyzer, AnalyzerSet, DocumentPair, EvaluationReport, Pipeline,
};
use lectern::readability::analyzer::ReadabilityAnalyzer;
use lectern::similarity::embeddings::UnavailableEmbedder;

const FIBONACCI: &str = "This project computes fibonacci numbers.";

fn score(section: &Value, key: &str) -> f64 {
    section[key]
        .as_f64()
        .unwrap_or_else(|| panic!("{key} is not a number in {section}"))
}

fn keywords(section: &Value, key: &str) -> Vec<String> {
    section[key]
        .as_array()
        .unwrap_or_else(|| panic!("{key} is not a list in {section}"))
        .iter()
        .map(|pair| pair[0].as_str().unwrap().to_string())
        .collect()
}

// ============================================================
// Report shape
// ============================================================

#[tokio::test]
async fn report_has_exactly_five_keys_in_order() {
    let report = fake_pipeline()
        .evaluate(DocumentPair::new(FIBONACCI, "A different README entirely."))
        .await
        .unwrap();

    let text = serde_json::to_string(&report).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&str> = parsed.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, EvaluationReport::KEYS);
}

#[tokio::test]
async fn report_is_already_normalized() {
    let report = fake_pipeline()
        .evaluate(DocumentPair::new(
            "# Lectern\n\nLectern evaluates generated READMEs. Run it with Cargo.",
            "# Lectern\n\nA tool that scores README files against each other.",
        ))
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(normalize_json(&value), value);
}

#[tokio::test]
async fn empty_documents_still_produce_every_section() {
    let report = fake_pipeline()
        .evaluate(DocumentPair::new("", ""))
        .await
        .unwrap();

    assert_eq!(score(&report.text_similarity, "tfidf_cosine_similarity"), 0.0);
    assert_eq!(score(&report.text_similarity, "semantic_cosine_similarity"), 0.0);
    assert_eq!(
        score(&report.readability_metrics["generated_readme"], "flesch_reading_ease"),
        0.0
    );
    assert!(report.topic_modeling["error"]
        .as_str()
        .unwrap()
        .starts_with("Topic modeling failed:"));
    assert_eq!(
        report.named_entity_recognition,
        json!({"generated_readme_entities": [], "user_readme_entities": []})
    );
}

// ============================================================
// Identical documents
// ============================================================

#[tokio::test]
async fn identical_documents_score_as_identical() {
    let report = fake_pipeline()
        .evaluate(DocumentPair::new(FIBONACCI, FIBONACCI))
        .await
        .unwrap();

    assert!((score(&report.text_similarity, "tfidf_cosine_similarity") - 1.0).abs() < 1e-9);
    assert!((score(&report.text_similarity, "semantic_cosine_similarity") - 1.0).abs() < 1e-9);

    let generated = &report.readability_metrics["generated_readme"];
    let user = &report.readability_metrics["user_readme"];
    assert_eq!(generated, user);
    assert!(score(generated, "flesch_reading_ease").is_finite());
    assert!(score(generated, "gunning_fog_index").is_finite());

    assert_eq!(
        report.named_entity_recognition["generated_readme_entities"],
        report.named_entity_recognition["user_readme_entities"]
    );

    let rubric = RubricScore::from_value(&report.ai_judge).expect("rubric parsed");
    assert!(rubric.is_within_bounds());
    assert_eq!(rubric.composite, 90.0);
}

// ============================================================
// Role symmetry
// ============================================================

#[tokio::test]
async fn swapping_roles_mirrors_per_document_sections() {
    let pair = DocumentPair::new(
        "Lectern compares generated documentation against reference documentation using several metrics.",
        "Install Rust, then build the binary with Cargo. The server listens on port eight thousand.",
    );
    let pipeline = fake_pipeline();
    let forward = pipeline.evaluate(pair.clone()).await.unwrap();
    let backward = pipeline.evaluate(pair.swapped()).await.unwrap();

    for key in ["tfidf_cosine_similarity", "semantic_cosine_similarity"] {
        let a = score(&forward.text_similarity, key);
        let b = score(&backward.text_similarity, key);
        assert!((a - b).abs() < 1e-12, "{key}: {a} vs {b}");
    }

    assert_eq!(
        forward.readability_metrics["generated_readme"],
        backward.readability_metrics["user_readme"]
    );
    assert_eq!(
        forward.named_entity_recognition["generated_readme_entities"],
        backward.named_entity_recognition["user_readme_entities"]
    );
    assert_eq!(
        keywords(&forward.topic_modeling, "generated_readme_topics"),
        keywords(&backward.topic_modeling, "user_readme_topics")
    );
}

// ============================================================
// Failure isolation
// ============================================================

#[tokio::test]
async fn topic_failure_leaves_other_sections_intact() {
    let mut parts = collaborators(common::RUBRIC_REPLY);
    parts.topic_model = Arc::new(FailingTopicModel);
    let report = build_pipeline(parts)
        .evaluate(DocumentPair::new(FIBONACCI, FIBONACCI))
        .await
        .unwrap();

    assert_eq!(
        report.topic_modeling,
        json!({"error": "Topic modeling failed: not enough documents"})
    );
    assert_eq!(report.degraded(), vec!["topic_modeling"]);
    assert!(RubricScore::from_value(&report.ai_judge).is_some());
}

#[tokio::test]
async fn unavailable_embedder_keeps_lexical_similarity() {
    let mut parts = collaborators(common::RUBRIC_REPLY);
    parts.embedder = Arc::new(UnavailableEmbedder::new("model.onnx missing"));
    let report = build_pipeline(parts)
        .evaluate(DocumentPair::new(FIBONACCI, FIBONACCI))
        .await
        .unwrap();

    assert!((score(&report.text_similarity, "tfidf_cosine_similarity") - 1.0).abs() < 1e-9);
    let error = report.text_similarity["semantic_cosine_similarity"]["error"]
        .as_str()
        .unwrap();
    assert!(error.contains("model.onnx missing"), "{error}");
    assert!(report.text_similarity.get("error").is_none());

    let degraded = report.degraded();
    assert!(!degraded.contains(&"text_similarity"));
    for key in ["readability_metrics", "named_entity_recognition", "ai_judge"] {
        assert!(!degraded.contains(&key), "{key} degraded");
    }
}

#[tokio::test]
async fn unparseable_judge_reply_is_a_fallback_not_a_failure() {
    let report = build_pipeline(collaborators("I cannot answer this."))
        .evaluate(DocumentPair::new(FIBONACCI, FIBONACCI))
        .await
        .unwrap();

    assert_eq!(
        report.ai_judge,
        json!({"error": "Failed to parse AI response", "raw": "I cannot answer this."})
    );
    assert!((score(&report.text_similarity, "tfidf_cosine_similarity") - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn rubric_with_null_error_field_is_not_degraded() {
    let reply = r#"{"Clarity": 4, "Coverage": 4, "Correctness": 5, "Style": 4, "Composite": 85, "Reasoning": "Solid.", "error": null}"#;
    let report = build_pipeline(collaborators(reply))
        .evaluate(DocumentPair::new(FIBONACCI, FIBONACCI))
        .await
        .unwrap();

    assert_eq!(report.ai_judge["Composite"], 85);
    assert!(report.ai_judge["error"].is_null());
    assert!(!report.degraded().contains(&"ai_judge"));
}

struct PanickingAnalyzer;

#[async_trait]
impl Analyzer for PanickingAnalyzer {
    fn name(&self) -> &'static str {
        "ai_judge"
    }

    async fn analyze(&self, _pair: &DocumentPair) -> Result<AnalysisValue> {
        panic!("analyzer bug");
    }
}

#[tokio::test]
async fn panicking_analyzer_is_fatal() {
    let readability: Arc<dyn Analyzer> = Arc::new(ReadabilityAnalyzer);
    let pipeline = Pipeline::new(AnalyzerSet {
        text_similarity: readability.clone(),
        topic_modeling: readability.clone(),
        readability_metrics: readability.clone(),
        named_entity_recognition: readability,
        ai_judge: Arc::new(PanickingAnalyzer),
    });

    let err = pipeline
        .evaluate(DocumentPair::new(FIBONACCI, FIBONACCI))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ai_judge analyzer panicked"));
}
