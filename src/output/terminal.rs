// Colored terminal output for evaluation reports.
//
// Reads the normalized report sections, so anything the JSON output shows
// can be shown here. Sections in the `{error: ..}` state print their message
// instead of their metrics.

use colored::Colorize;
use serde_json::Value;

use crate::judge::rubric::RubricScore;
use crate::pipeline::EvaluationReport;

/// Display a full evaluation report in the terminal.
pub fn display_report(report: &EvaluationReport) {
    println!("\n{}", "=== README Evaluation ===".bold());

    section_header("Text similarity");
    if !print_error(&report.text_similarity) {
        print_score("TF-IDF cosine", &report.text_similarity["tfidf_cosine_similarity"]);
        print_score("Semantic cosine", &report.text_similarity["semantic_cosine_similarity"]);
    }

    section_header("Topics");
    if !print_error(&report.topic_modeling) {
        print_keywords("Generated", &report.topic_modeling["generated_readme_topics"]);
        print_keywords("Reference", &report.topic_modeling["user_readme_topics"]);
    }

    section_header("Readability");
    if !print_error(&report.readability_metrics) {
        println!(
            "  {:<12} {:>14}  {:>11}",
            "",
            "Flesch ease".dimmed(),
            "Fog index".dimmed()
        );
        for (label, key) in [("Generated", "generated_readme"), ("Reference", "user_readme")] {
            let scores = &report.readability_metrics[key];
            println!(
                "  {:<12} {:>14}  {:>11}",
                label,
                number(&scores["flesch_reading_ease"]),
                number(&scores["gunning_fog_index"]),
            );
        }
    }

    section_header("Named entities");
    if !print_error(&report.named_entity_recognition) {
        print_entities("Generated", &report.named_entity_recognition["generated_readme_entities"]);
        print_entities("Reference", &report.named_entity_recognition["user_readme_entities"]);
    }

    section_header("AI judge");
    display_judge(&report.ai_judge);

    let degraded = report.degraded();
    if !degraded.is_empty() {
        println!(
            "\n  {} {} section(s) degraded: {}",
            "!".yellow().bold(),
            degraded.len(),
            degraded.join(", ")
        );
    }
    println!();
}

fn display_judge(judge: &Value) {
    match RubricScore::from_value(judge) {
        Some(rubric) => {
            for (name, score) in rubric.criteria() {
                println!("  {:<12} {}", name, colorize_criterion(score));
            }
            println!("  {:<12} {:.1}/100", "Composite", rubric.composite);
            if !rubric.reasoning.is_empty() {
                let preview = super::truncate_chars(&rubric.reasoning, 200);
                println!("  {}", preview.dimmed());
            }
            if !rubric.is_within_bounds() {
                println!("  {}", "scores fall outside the rubric range".yellow());
            }
        }
        None => {
            if !print_error(judge) {
                // Parsed, but not in rubric shape
                println!("  {}", judge.to_string().dimmed());
            }
            if let Some(raw) = judge.get("raw").and_then(Value::as_str) {
                if !raw.is_empty() {
                    println!("  raw: {}", super::truncate_chars(raw, 140).dimmed());
                }
            }
        }
    }
}

fn section_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Print a section's error message. Returns true when there was one.
fn print_error(section: &Value) -> bool {
    match section.get("error") {
        Some(error) => {
            let message = error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
            println!("  {} {}", "error:".red().bold(), message);
            true
        }
        None => false,
    }
}

fn print_score(label: &str, value: &Value) {
    let text = match (value.as_f64(), value.get("error").and_then(Value::as_str)) {
        (Some(score), _) => colorize_similarity(score).to_string(),
        (None, Some(error)) => error.red().to_string(),
        (None, None) => "n/a".dimmed().to_string(),
    };
    println!("  {:<16} {}", label, text);
}

fn print_keywords(label: &str, topics: &Value) {
    let words: Vec<&str> = topics
        .as_array()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|pair| pair.get(0).and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    let listing = if words.is_empty() {
        "(none)".dimmed().to_string()
    } else {
        words.join(", ")
    };
    println!("  {:<10} {}", label, listing);
}

fn print_entities(label: &str, entities: &Value) {
    let entities = entities.as_array().map(Vec::as_slice).unwrap_or_default();
    println!("  {} ({})", label, entities.len());
    for entity in entities {
        let text = entity["text"].as_str().unwrap_or_default();
        let tag = entity["label"].as_str().unwrap_or_default();
        println!("    {:<6} {}", tag.cyan(), text);
    }
}

fn number(value: &Value) -> String {
    value
        .as_f64()
        .map(|n| format!("{n:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Colorize a cosine similarity: green when close, yellow when loose, red otherwise.
fn colorize_similarity(score: f64) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.75 {
        text.green()
    } else if score >= 0.4 {
        text.yellow()
    } else {
        text.red()
    }
}

/// Colorize a 1-5 rubric score.
fn colorize_criterion(score: i64) -> colored::ColoredString {
    let text = format!("{score}/5");
    match score {
        5 | 4 => text.green(),
        3 => text.yellow(),
        _ => text.red(),
    }
}
