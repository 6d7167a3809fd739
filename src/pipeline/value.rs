// AnalysisValue: the tagged tree every analyzer returns.
//
// Analyzers produce whatever shapes are natural for them: f32 vectors straight
// out of an ONNX tensor, columnar tables, nested maps. None of these are
// guaranteed to serialize as plain JSON (f32 widening, NaN, tables), so they are
// carried in this enum until the normalizer flattens them.

use serde_json::Value;

/// Raw analyzer output before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Single-precision scalar, typically read from a model tensor
    Float32(f32),
    Text(String),
    /// Dense numeric vector, e.g. an embedding row
    Vector(Vec<f32>),
    Seq(Vec<AnalysisValue>),
    /// String-keyed mapping; entry order is preserved through normalization
    Map(Vec<(String, AnalysisValue)>),
    Table(Table),
    /// Already-structured JSON (e.g. a parsed LLM reply), walked as-is
    Json(Value),
}

/// Column-oriented summary table, flattened to a list of records on output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<AnalysisValue>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<AnalysisValue>) {
        self.rows.push(row);
    }
}

impl AnalysisValue {
    /// Build a map from `(key, value)` pairs, keeping their order.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, AnalysisValue)>,
    {
        AnalysisValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The degraded-result shape: `{"error": message}`.
    pub fn error(message: impl Into<String>) -> Self {
        AnalysisValue::map([("error", AnalysisValue::Text(message.into()))])
    }

    /// Whether this value is a degraded result (a map whose `error` is a string).
    pub fn is_error(&self) -> bool {
        match self {
            AnalysisValue::Map(entries) => entries
                .iter()
                .any(|(k, v)| k == "error" && matches!(v, AnalysisValue::Text(_))),
            AnalysisValue::Json(Value::Object(obj)) => obj.get("error").is_some_and(Value::is_string),
            _ => false,
        }
    }

    /// Look up a key in a map value.
    pub fn get(&self, key: &str) -> Option<&AnalysisValue> {
        match self {
            AnalysisValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<f64> for AnalysisValue {
    fn from(v: f64) -> Self {
        AnalysisValue::Float(v)
    }
}

impl From<f32> for AnalysisValue {
    fn from(v: f32) -> Self {
        AnalysisValue::Float32(v)
    }
}

impl From<i64> for AnalysisValue {
    fn from(v: i64) -> Self {
        AnalysisValue::Int(v)
    }
}

impl From<usize> for AnalysisValue {
    fn from(v: usize) -> Self {
        AnalysisValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<bool> for AnalysisValue {
    fn from(v: bool) -> Self {
        AnalysisValue::Bool(v)
    }
}

impl From<&str> for AnalysisValue {
    fn from(v: &str) -> Self {
        AnalysisValue::Text(v.to_string())
    }
}

impl From<String> for AnalysisValue {
    fn from(v: String) -> Self {
        AnalysisValue::Text(v)
    }
}

impl From<Value> for AnalysisValue {
    fn from(v: Value) -> Self {
        AnalysisValue::Json(v)
    }
}

impl<T: Into<AnalysisValue>> From<Vec<T>> for AnalysisValue {
    fn from(v: Vec<T>) -> Self {
        AnalysisValue::Seq(v.into_iter().map(Into::into).collect())
    }
}
