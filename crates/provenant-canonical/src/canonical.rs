//! Canonical JSON serialization

use crate::error::CanonicalError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Write as FmtWrite;

/// Rebuild a JSON value in canonical form
///
/// Every object has its entries re-emitted in byte-wise key order, at every
/// nesting depth. Arrays keep their element order (order is meaningful
/// there) with each element canonicalized in place. Scalars are returned
/// unchanged.
///
/// Canonicalization is total and idempotent: canonicalizing a canonical
/// value yields an identical value.
///
/// # Example
///
/// ```rust
/// use provenant_canonical::canonicalize;
///
/// let value = serde_json::json!({"z": 1, "a": {"c": 2, "b": 3}});
/// let canonical = canonicalize(&value);
/// assert_eq!(canonicalize(&canonical), canonical);
/// ```
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(arr) => Value::Array(arr.iter().map(canonicalize).collect()),
        Value::Object(obj) => {
            let mut entries: Vec<(&String, &Value)> = obj.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

            let mut sorted = Map::new();
            for (key, val) in entries {
                sorted.insert(key.clone(), canonicalize(val));
            }
            Value::Object(sorted)
        }
        scalar => scalar.clone(),
    }
}

/// Serialize a value to canonical JSON bytes
///
/// # Rules
///
/// - Object keys sorted lexicographically by UTF-8 bytes
/// - Arrays preserve order
/// - No whitespace
/// - Integers as plain decimals, doubles as shortest round-trip decimals
///
/// # Errors
///
/// Returns `CanonicalError::Malformed` if the value cannot be converted to
/// a JSON value (e.g., a map with non-string keys).
///
/// # Example
///
/// ```rust
/// use provenant_canonical::to_canonical_json;
///
/// let value = serde_json::json!({"z": 1, "a": 2});
/// let canonical = to_canonical_json(&value).unwrap();
/// assert_eq!(canonical, b"{\"a\":2,\"z\":1}");
/// ```
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalError> {
    let json_value = serde_json::to_value(value)?;
    Ok(to_canonical_json_value(&json_value))
}

/// Serialize a serde_json::Value to canonical JSON bytes
///
/// Total: a `Value` is well-formed JSON by construction.
pub fn to_canonical_json_value(value: &Value) -> Vec<u8> {
    let mut output = Vec::new();
    write_canonical_value(&mut output, value);
    output
}

/// Serialize a value to a canonical JSON string
pub fn to_canonical_json_string<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let bytes = to_canonical_json(value)?;
    // Safe because we only produce valid UTF-8
    Ok(String::from_utf8(bytes).expect("canonical JSON is always valid UTF-8"))
}

/// Write a JSON value in canonical form
fn write_canonical_value(output: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => {
            output.extend_from_slice(b"null");
        }
        Value::Bool(b) => {
            if *b {
                output.extend_from_slice(b"true");
            } else {
                output.extend_from_slice(b"false");
            }
        }
        Value::Number(n) => {
            // serde_json renders i64/u64 as plain decimals and finite f64
            // via Ryu (shortest round-trip); Value cannot hold non-finite
            // numbers
            output.extend_from_slice(n.to_string().as_bytes());
        }
        Value::String(s) => {
            write_canonical_string(output, s);
        }
        Value::Array(arr) => {
            output.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    output.push(b',');
                }
                write_canonical_value(output, item);
            }
            output.push(b']');
        }
        Value::Object(obj) => {
            write_canonical_object(output, obj);
        }
    }
}

/// Write a JSON object with sorted keys
fn write_canonical_object(output: &mut Vec<u8>, obj: &Map<String, Value>) {
    output.push(b'{');

    // Sort keys lexicographically by UTF-8 bytes
    let mut keys: Vec<&String> = obj.keys().collect();
    keys.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            output.push(b',');
        }

        // Write key
        write_canonical_string(output, key);
        output.push(b':');

        // Write value
        if let Some(value) = obj.get(*key) {
            write_canonical_value(output, value);
        }
    }

    output.push(b'}');
}

/// Write a JSON string with proper escaping
fn write_canonical_string(output: &mut Vec<u8>, s: &str) {
    output.push(b'"');

    for c in s.chars() {
        match c {
            '"' => output.extend_from_slice(b"\\\""),
            '\\' => output.extend_from_slice(b"\\\\"),
            '\n' => output.extend_from_slice(b"\\n"),
            '\r' => output.extend_from_slice(b"\\r"),
            '\t' => output.extend_from_slice(b"\\t"),
            c if c.is_control() => {
                // Escape control characters as \uXXXX
                let mut hex_buf = String::new();
                write!(hex_buf, "\\u{:04x}", c as u32).unwrap();
                output.extend_from_slice(hex_buf.as_bytes());
            }
            c => {
                // Write UTF-8 bytes directly
                let mut buf = [0u8; 4];
                let encoded = c.encode_utf8(&mut buf);
                output.extend_from_slice(encoded.as_bytes());
            }
        }
    }

    output.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sorted_keys() {
        let value = json!({"z": 1, "a": 2, "m": 3});
        let canonical = to_canonical_json_string(&value).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let value = json!({
            "b": {"y": 1, "x": 2},
            "a": {"z": 3, "w": 4}
        });
        let canonical = to_canonical_json_string(&value).unwrap();
        assert_eq!(canonical, r#"{"a":{"w":4,"z":3},"b":{"x":2,"y":1}}"#);
    }

    #[test]
    fn test_arrays_preserve_order() {
        let value = json!([3, 1, 2]);
        let canonical = to_canonical_json_string(&value).unwrap();
        assert_eq!(canonical, "[3,1,2]");
    }

    #[test]
    fn test_no_whitespace() {
        let value = json!({"a": [1, 2], "b": {"c": 3}});
        let canonical = to_canonical_json_string(&value).unwrap();

        // No spaces, newlines, or tabs
        assert!(!canonical.contains(' '));
        assert!(!canonical.contains('\n'));
        assert!(!canonical.contains('\t'));
    }

    #[test]
    fn test_canonicalize_sorts_all_depths() {
        let value = json!({
            "outer": {"z": 1, "a": 2},
            "list": [{"b": 1, "a": 2}]
        });
        let canonical = canonicalize(&value);

        let rendered = to_canonical_json_string(&canonical).unwrap();
        assert_eq!(rendered, r#"{"list":[{"a":2,"b":1}],"outer":{"a":2,"z":1}}"#);
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let value = json!({
            "c": [3, {"y": 1, "x": 2}],
            "a": {"m": null, "b": true}
        });

        let once = canonicalize(&value);
        let twice = canonicalize(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonicalize_scalars_unchanged() {
        for scalar in [json!(null), json!(true), json!(42), json!("text")] {
            assert_eq!(canonicalize(&scalar), scalar);
        }
    }

    #[test]
    fn test_canonicalize_empty_containers() {
        assert_eq!(canonicalize(&json!({})), json!({}));
        assert_eq!(canonicalize(&json!([])), json!([]));
    }

    #[test]
    fn test_integer_formatting() {
        let value = json!({"count": 42, "offset": -7, "zero": 0});
        let canonical = to_canonical_json_string(&value).unwrap();
        assert_eq!(canonical, r#"{"count":42,"offset":-7,"zero":0}"#);
    }

    #[test]
    fn test_double_formatting() {
        // Shortest round-trip rendering, stable across runs
        let value = json!({"ratio": 0.7, "unit": 1.0});
        let canonical = to_canonical_json_string(&value).unwrap();
        assert_eq!(canonical, r#"{"ratio":0.7,"unit":1.0}"#);
    }

    #[test]
    fn test_string_escaping() {
        let value = json!({"text": "line1\nline2\ttab\"quote\\backslash"});
        let canonical = to_canonical_json_string(&value).unwrap();
        assert!(canonical.contains("\\n"));
        assert!(canonical.contains("\\t"));
        assert!(canonical.contains("\\\""));
        assert!(canonical.contains("\\\\"));
    }

    #[test]
    fn test_null_value() {
        let value = json!({"empty": null});
        let canonical = to_canonical_json_string(&value).unwrap();
        assert_eq!(canonical, r#"{"empty":null}"#);
    }

    #[test]
    fn test_boolean_values() {
        let value = json!({"yes": true, "no": false});
        let canonical = to_canonical_json_string(&value).unwrap();
        // Keys sorted, booleans lowercase
        assert_eq!(canonical, r#"{"no":false,"yes":true}"#);
    }

    #[test]
    fn test_empty_object() {
        let value = json!({});
        let canonical = to_canonical_json_string(&value).unwrap();
        assert_eq!(canonical, "{}");
    }

    #[test]
    fn test_empty_array() {
        let value = json!([]);
        let canonical = to_canonical_json_string(&value).unwrap();
        assert_eq!(canonical, "[]");
    }

    #[test]
    fn test_unicode() {
        let value = json!({"greeting": "Hello 世界 🌍"});
        let canonical = to_canonical_json_string(&value).unwrap();
        // Unicode should be preserved as UTF-8
        assert!(canonical.contains("世界"));
        assert!(canonical.contains("🌍"));
    }

    #[test]
    fn test_determinism() {
        let value = json!({"c": 3, "a": 1, "b": 2});

        // Multiple calls should produce identical output
        let c1 = to_canonical_json(&value).unwrap();
        let c2 = to_canonical_json(&value).unwrap();
        let c3 = to_canonical_json(&value).unwrap();

        assert_eq!(c1, c2);
        assert_eq!(c2, c3);
    }

    #[test]
    fn test_large_integers() {
        let value = json!({"large": 9007199254740991_i64});
        let canonical = to_canonical_json_string(&value).unwrap();
        assert!(canonical.contains("9007199254740991"));
    }

    #[test]
    fn test_non_string_map_keys_rejected() {
        use std::collections::BTreeMap;

        let mut map: BTreeMap<Vec<u8>, u32> = BTreeMap::new();
        map.insert(vec![1, 2], 3);

        let result = to_canonical_json(&map);
        assert!(matches!(result, Err(CanonicalError::Malformed(_))));
    }
}
