//! Per-batch schema unification
//!
//! Rectangular sinks need every row in a batch to share one column set.
//! The union is recomputed per batch rather than globally so the stream
//! never has to be buffered in full.

use crate::stream::{Record, stringify};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Bool,
    Number,
    String,
    Structured,
}

fn kind(value: &Value) -> Option<ValueKind> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(ValueKind::Bool),
        Value::Number(_) => Some(ValueKind::Number),
        Value::String(_) => Some(ValueKind::String),
        Value::Array(_) | Value::Object(_) => Some(ValueKind::Structured),
    }
}

/// Unify the records of one batch onto a shared column set.
///
/// Computes the union of all keys in first-seen order, rebuilds every
/// record with the full column set in that order, and fills absent keys
/// with `null`. A column whose non-null values disagree on scalar type, or
/// that holds any non-scalar value, falls back to string form instead of
/// failing, so heterogeneous batches keep flowing.
///
/// Returns the unified column set in order.
///
/// # Example
/// ```
/// use connector_kit::normalize::schema;
/// use serde_json::json;
///
/// let mut batch = vec![
///     json!({"a": 1}).as_object().unwrap().clone(),
///     json!({"b": 2}).as_object().unwrap().clone(),
/// ];
///
/// let columns = schema::unify(&mut batch);
/// assert_eq!(columns, vec!["a", "b"]);
/// assert_eq!(batch[0]["b"], json!(null));
/// assert_eq!(batch[1]["a"], json!(null));
/// ```
pub fn unify(records: &mut [Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for record in records.iter() {
        for key in record.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }

    // columns with conflicting value types are coerced to strings
    let coerce: Vec<bool> = columns
        .iter()
        .map(|column| {
            let mut kinds = records.iter().filter_map(|record| record.get(column)).filter_map(kind);
            match kinds.next() {
                None => false,
                Some(first) => first == ValueKind::Structured || kinds.any(|k| k != first),
            }
        })
        .collect();

    for record in records.iter_mut() {
        let mut row = Record::new();
        for (column, coerce_to_string) in columns.iter().zip(&coerce) {
            let value = record.remove(column).unwrap_or(Value::Null);
            let value = if *coerce_to_string && !value.is_null() {
                Value::String(stringify(&value))
            } else {
                value
            };
            row.insert(column.clone(), value);
        }
        *record = row;
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().expect("test record must be an object").clone()
    }

    #[test]
    fn test_heterogeneous_batch_shares_union_of_keys() {
        let mut batch = vec![
            record(json!({"a": 1, "b": 2})),
            record(json!({"b": 3, "c": 4})),
            record(json!({"d": 5})),
        ];

        let columns = unify(&mut batch);

        assert_eq!(columns, vec!["a", "b", "c", "d"]);
        for row in &batch {
            assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        }
        assert_eq!(batch[0]["c"], json!(null));
        assert_eq!(batch[0]["d"], json!(null));
        assert_eq!(batch[1]["a"], json!(null));
        assert_eq!(batch[2]["a"], json!(null));
        assert_eq!(batch[2]["d"], json!(5));
    }

    #[test]
    fn test_uniform_columns_keep_native_types() {
        let mut batch = vec![
            record(json!({"n": 1, "flag": true})),
            record(json!({"n": 2.5, "flag": false})),
        ];

        unify(&mut batch);

        assert_eq!(batch[0]["n"], json!(1));
        assert_eq!(batch[1]["n"], json!(2.5));
        assert_eq!(batch[0]["flag"], json!(true));
    }

    #[test]
    fn test_conflicting_types_coerce_to_string() {
        let mut batch = vec![
            record(json!({"v": 1})),
            record(json!({"v": "two"})),
            record(json!({"v": null})),
        ];

        unify(&mut batch);

        assert_eq!(batch[0]["v"], json!("1"));
        assert_eq!(batch[1]["v"], json!("two"));
        // nulls stay null, they are absence not a type
        assert_eq!(batch[2]["v"], json!(null));
    }

    #[test]
    fn test_structured_values_coerce_to_string() {
        // a key holding a scalar in one record and a mapping in another
        let mut batch = vec![
            record(json!({"v": "plain"})),
            record(json!({"v": {"nested": 1}})),
        ];

        unify(&mut batch);

        assert_eq!(batch[0]["v"], json!("plain"));
        assert_eq!(batch[1]["v"], json!(r#"{"nested":1}"#));
    }

    #[test]
    fn test_empty_batch() {
        let mut batch: Vec<Record> = Vec::new();
        assert!(unify(&mut batch).is_empty());
    }
}
