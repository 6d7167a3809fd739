// Typed view of a judge rubric.
//
// The report carries the judge's object as-is; this view is for callers that
// want to read or check the scores (terminal output, tests).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RubricScore {
    pub clarity: i64,
    pub coverage: i64,
    pub correctness: i64,
    pub style: i64,
    pub composite: f64,
    #[serde(default)]
    pub reasoning: String,
}

impl RubricScore {
    /// Read a rubric from a parsed judge reply. `None` for the fallback
    /// object or any reply with missing or mistyped fields.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Criteria in 1..=5 and composite in 0..=100.
    pub fn is_within_bounds(&self) -> bool {
        self.criteria().iter().all(|(_, s)| (1..=5).contains(s))
            && (0.0..=100.0).contains(&self.composite)
    }

    pub fn criteria(&self) -> [(&'static str, i64); 4] {
        [
            ("Clarity", self.clarity),
            ("Coverage", self.coverage),
            ("Correctness", self.correctness),
            ("Style", self.style),
        ]
    }
}
