//! Defensive string coercion for loosely-typed reply data.
//!
//! The tutor service is asked to emit a fixed JSON schema but is not
//! guaranteed to honor it. Rather than rejecting a reply whose segment
//! fields have the wrong primitive type, the fields are coerced to a safe
//! string representation at the boundary.

use serde_json::Value;

/// Coerces an untyped JSON value into a plain string.
///
/// Rules:
/// - strings pass through unchanged
/// - numbers and booleans are stringified
/// - `null` (and absent values mapped to `Value::Null`) become `""`
/// - arrays and objects are JSON-serialized as a last resort
pub fn safe_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Looks up `key` in a JSON object and coerces the result.
///
/// Missing keys and non-object values yield `""`.
pub fn safe_field(value: &Value, key: &str) -> String {
    value.get(key).map(safe_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_passes_through() {
        assert_eq!(safe_string(&json!("猫")), "猫");
    }

    #[test]
    fn test_primitives_are_stringified() {
        assert_eq!(safe_string(&json!(42)), "42");
        assert_eq!(safe_string(&json!(1.5)), "1.5");
        assert_eq!(safe_string(&json!(true)), "true");
        assert_eq!(safe_string(&json!(false)), "false");
    }

    #[test]
    fn test_null_becomes_empty() {
        assert_eq!(safe_string(&Value::Null), "");
    }

    #[test]
    fn test_objects_are_serialized() {
        assert_eq!(safe_string(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(safe_string(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_safe_field_missing_key() {
        assert_eq!(safe_field(&json!({"text": "は"}), "reading"), "");
        assert_eq!(safe_field(&json!("not an object"), "text"), "");
    }
}
