// Unit tests for the AI judge reply handling.
//
// Tests the staged reply parser against the shapes LLMs actually produce
// (fenced, chatty, truncated, refusals) and the typed rubric view over the
// results.

use serde_json::json;

use lectern::judge::parse::{parse_reply, strip_fences, ParseStage, PARSE_FAILURE};
use lectern::judge::prompt::render_prompt;
use lectern::judge::rubric::RubricScore;

const RUBRIC: &str = r#"{"Clarity": 4, "Coverage": 4, "Correctness": 5, "Style": 3, "Composite": 80, "Reasoning": "Mostly complete; misses the license section."}"#;

// ============================================================
// parse_reply: accepted shapes
// ============================================================

#[test]
fn fences_do_not_change_the_result() {
    let plain = parse_reply(RUBRIC);
    for wrapped in [
        format!("```json\n{RUBRIC}\n```"),
        format!("```Json {RUBRIC} ```"),
        format!("\n\n```\n{RUBRIC}\n```\n"),
    ] {
        let parsed = parse_reply(&wrapped);
        assert_eq!(parsed.value, plain.value, "reply: {wrapped:?}");
        assert_eq!(parsed.stage, ParseStage::Direct);
    }
}

#[test]
fn chatty_reply_is_extracted() {
    let reply = format!("Sure! Here's the evaluation you asked for:\n\n{RUBRIC}\n\nLet me know if you need more.");
    let parsed = parse_reply(&reply);
    assert_eq!(parsed.stage, ParseStage::Extracted);
    assert_eq!(parsed.value, serde_json::from_str::<serde_json::Value>(RUBRIC).unwrap());
}

#[test]
fn fenced_reply_with_prose_is_extracted() {
    let reply = format!("Evaluation:\n```json\n{RUBRIC}\n```");
    let parsed = parse_reply(&reply);
    assert_eq!(parsed.value["Composite"], 80);
}

#[test]
fn nested_braces_inside_strings_survive() {
    let reply = r#"Result: {"Clarity": 3, "Coverage": 3, "Correctness": 3, "Style": 3, "Composite": 60, "Reasoning": "Uses {placeholders} in examples"}"#;
    let parsed = parse_reply(reply);
    assert_eq!(parsed.stage, ParseStage::Extracted);
    assert_eq!(parsed.value["Reasoning"], "Uses {placeholders} in examples");
}

// ============================================================
// parse_reply: fallback
// ============================================================

#[test]
fn refusal_becomes_fallback_with_raw_text() {
    let parsed = parse_reply("I cannot answer this.");
    assert_eq!(parsed.stage, ParseStage::Fallback);
    assert_eq!(
        parsed.value,
        json!({"error": "Failed to parse AI response", "raw": "I cannot answer this."})
    );
}

#[test]
fn empty_reply_becomes_fallback() {
    let parsed = parse_reply("   ");
    assert_eq!(parsed.value, json!({"error": PARSE_FAILURE, "raw": ""}));
}

#[test]
fn json_array_is_not_a_rubric() {
    let parsed = parse_reply("[1, 2, 3]");
    assert_eq!(parsed.stage, ParseStage::Fallback);
}

#[test]
fn truncated_reply_keeps_original_text() {
    let reply = "```json\n{\"Clarity\": 4, \"Coverage\":";
    let parsed = parse_reply(reply);
    assert_eq!(parsed.stage, ParseStage::Fallback);
    assert_eq!(parsed.value["raw"], reply);
}

#[test]
fn strip_fences_removes_markers_anywhere() {
    assert_eq!(strip_fences("```JSON\n{}\n```"), "{}");
    assert_eq!(strip_fences("no fences"), "no fences");
}

// ============================================================
// RubricScore over parsed replies
// ============================================================

#[test]
fn parsed_rubric_reads_as_typed_score() {
    let rubric = RubricScore::from_value(&parse_reply(RUBRIC).value).unwrap();
    assert_eq!(rubric.criteria()[2], ("Correctness", 5));
    assert!(rubric.is_within_bounds());
}

#[test]
fn mistyped_rubric_passes_parser_but_not_typed_view() {
    let parsed = parse_reply(r#"{"Clarity": "four", "Coverage": 4, "Correctness": 5, "Style": 3, "Composite": 80}"#);
    assert_eq!(parsed.stage, ParseStage::Direct);
    assert!(RubricScore::from_value(&parsed.value).is_none());
}

// ============================================================
// Prompt
// ============================================================

#[test]
fn prompt_asks_for_strict_json_rubric() {
    let prompt = render_prompt("gen", "user");
    assert!(prompt.contains("1–5 rubric"));
    assert!(prompt.contains("composite score"));
    assert!(prompt.contains("Respond in Strict JSON format NO extra text"));
}
