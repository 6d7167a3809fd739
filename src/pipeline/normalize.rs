// Result normalizer: flattens analyzer output into plain JSON.
//
// Rules:
//   Map      -> object, key order kept
//   Seq      -> array, element order kept
//   Vector   -> array of numbers
//   Table    -> array of records ({column: cell}), column order kept
//   Float32  -> widened to f64
//   NaN/inf  -> null (JSON has no representation for them)
//   Json     -> walked with the same float rules
//
// normalize_json is the identity on anything normalize already produced, which
// is what makes normalization idempotent.

use serde_json::{Map, Number, Value};

use super::value::{AnalysisValue, Table};

/// Convert an analyzer result into a JSON-safe tree.
pub fn normalize(value: &AnalysisValue) -> Value {
    match value {
        AnalysisValue::Null => Value::Null,
        AnalysisValue::Bool(b) => Value::Bool(*b),
        AnalysisValue::Int(i) => Value::Number((*i).into()),
        AnalysisValue::Float(f) => float(*f),
        AnalysisValue::Float32(f) => float(*f as f64),
        AnalysisValue::Text(s) => Value::String(s.clone()),
        AnalysisValue::Vector(v) => Value::Array(v.iter().map(|&f| float(f as f64)).collect()),
        AnalysisValue::Seq(items) => Value::Array(items.iter().map(normalize).collect()),
        AnalysisValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect::<Map<String, Value>>(),
        ),
        AnalysisValue::Table(table) => table_records(table),
        AnalysisValue::Json(json) => normalize_json(json),
    }
}

/// Walk an existing JSON tree, keeping it JSON-safe.
///
/// serde_json numbers are always finite, so this only rebuilds containers;
/// it exists so passthrough values get the same treatment as typed ones.
pub fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize_json).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), normalize_json(v)))
                .collect(),
        ),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => float(f),
            _ => Value::Number(n.clone()),
        },
        other => other.clone(),
    }
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

fn table_records(table: &Table) -> Value {
    let records = table
        .rows
        .iter()
        .map(|row| {
            let record: Map<String, Value> = table
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let cell = row.get(i).map(normalize).unwrap_or(Value::Null);
                    (col.clone(), cell)
                })
                .collect();
            Value::Object(record)
        })
        .collect();
    Value::Array(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(normalize(&AnalysisValue::Int(3)), json!(3));
        assert_eq!(normalize(&AnalysisValue::Bool(true)), json!(true));
        assert_eq!(normalize(&AnalysisValue::Text("x".into())), json!("x"));
        assert_eq!(normalize(&AnalysisValue::Null), Value::Null);
    }

    #[test]
    fn test_float32_widens() {
        let v = normalize(&AnalysisValue::Float32(0.5));
        assert_eq!(v, json!(0.5));
    }

    #[test]
    fn test_non_finite_becomes_null() {
        assert_eq!(normalize(&AnalysisValue::Float(f64::NAN)), Value::Null);
        assert_eq!(normalize(&AnalysisValue::Float32(f32::INFINITY)), Value::Null);
    }

    #[test]
    fn test_vector_to_list() {
        let v = normalize(&AnalysisValue::Vector(vec![1.0, 2.5]));
        assert_eq!(v, json!([1.0, 2.5]));
    }

    #[test]
    fn test_table_to_records() {
        let mut table = Table::new(["Topic", "Count"]);
        table.push_row(vec![AnalysisValue::Int(0), AnalysisValue::Int(2)]);
        table.push_row(vec![AnalysisValue::Int(1)]);
        let v = normalize(&AnalysisValue::Table(table));
        assert_eq!(
            v,
            json!([{"Topic": 0, "Count": 2}, {"Topic": 1, "Count": null}])
        );
    }

    #[test]
    fn test_map_order_preserved() {
        let v = normalize(&AnalysisValue::map([
            ("zeta", AnalysisValue::Int(1)),
            ("alpha", AnalysisValue::Int(2)),
        ]));
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_idempotent() {
        let mut table = Table::new(["Name"]);
        table.push_row(vec!["0_rust_cargo".into()]);
        let raw = AnalysisValue::map([
            ("scores", AnalysisValue::Vector(vec![0.25, f32::NAN])),
            ("table", AnalysisValue::Table(table)),
            ("nested", AnalysisValue::Json(json!({"b": [1, 2.5], "a": null}))),
        ]);
        let once = normalize(&raw);
        let twice = normalize(&AnalysisValue::Json(once.clone()));
        assert_eq!(once, twice);
        assert_eq!(normalize_json(&once), once);
    }
}
