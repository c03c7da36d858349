//! Record type and value helpers

use serde_json::{Map, Value};

/// One semi-structured unit of source data.
///
/// A record is an ordered mapping from string keys to JSON values, where a
/// value may be a scalar (string, number, boolean, null), a nested mapping,
/// or a list. Records in the same stream are not required to share a key set.
///
/// Key order is preserved end to end (`serde_json` is built with the
/// `preserve_order` feature), so the wire form and any rectangular output
/// keep the order fields were produced in.
pub type Record = Map<String, Value>;

/// Whether a value is a scalar: string, number, boolean, or null
pub fn is_scalar(value: &Value) -> bool {
    !(value.is_object() || value.is_array())
}

/// Render a value in its plain string form.
///
/// Strings are returned without quotes; every other value renders as its
/// JSON text (`1`, `true`, `null`, `{"a":1}`).
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_scalar() {
        assert!(is_scalar(&json!("text")));
        assert!(is_scalar(&json!(42)));
        assert!(is_scalar(&json!(true)));
        assert!(is_scalar(&json!(null)));
        assert!(!is_scalar(&json!({"a": 1})));
        assert!(!is_scalar(&json!([1, 2])));
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("text")), "text");
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(null)), "null");
        assert_eq!(stringify(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
