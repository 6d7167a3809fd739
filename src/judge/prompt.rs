// Rubric prompt for the AI judge.

/// Render the evaluation prompt with both documents embedded.
///
/// Substitution is a single pass, so braces inside either README are never
/// interpreted as placeholders.
pub fn render_prompt(generated_readme: &str, user_readme: &str) -> String {
    format!(
        r#"You are an expert evaluator. Your task is to rate the quality of a generated README file compared to a user-provided README on software documentation metrics.

## Evaluation Criteria:
- **Clarity**: how understandable is the generated README?
- **Coverage**: how well does it cover the same topics/information?
- **Correctness**: factual consistency and accuracy.
- **Style**: structure, tone, formatting consistent with typical README style.

Use a **1–5 rubric** for each metric:
5 = Excellent, 4 = Good, 3 = Fair, 2 = Poor, 1 = Very poor.

## User Inputs:
### Generated README:
{generated_readme}

### User README:
{user_readme}

## Instructions:
1. For each criterion, assign a score (1–5) and explain briefly.
2. Finally, compute a **composite score** (0–100) as a weighted average (e.g. equal weights).
3. Respond in Strict JSON format NO extra text.:
{{
"Clarity": score,
"Coverage": score,
"Correctness": score,
"Style": score,
"Composite": final_score,
"Reasoning": "..."
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeds_both_documents() {
        let prompt = render_prompt("GENERATED BODY", "USER BODY");
        let generated_at = prompt.find("GENERATED BODY").unwrap();
        let user_at = prompt.find("USER BODY").unwrap();
        assert!(generated_at < user_at);
    }

    #[test]
    fn test_names_every_criterion() {
        let prompt = render_prompt("a", "b");
        for key in ["Clarity", "Coverage", "Correctness", "Style", "Composite", "Reasoning"] {
            assert!(prompt.contains(&format!("\"{key}\"")), "missing {key}");
        }
        assert!(prompt.contains("Strict JSON"));
    }

    #[test]
    fn test_braces_in_documents_survive() {
        let prompt = render_prompt("fn main() { {generated_readme} }", "{}");
        assert!(prompt.contains("fn main() { {generated_readme} }"));
        assert!(prompt.contains("### User README:\n{}\n"));
    }
}
