//! JSON document ⇄ attribute-value translation for the DynamoDB backend.
//!
//! Mirrors a document-client configuration: empty strings convert to NULL
//! when `convert_empty_values` is set, JSON nulls are dropped from objects
//! when `remove_undefined_values` is set (read paths never produce them
//! here, the store is read-only), and numbers unmarshal to plain JSON
//! numbers unless `wrap_numbers` asks for their exact string form.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine;

use crate::store::Document;

/// Options applied when converting JSON values into attribute values.
#[derive(Debug, Clone, Copy)]
pub struct MarshallOptions {
    /// Convert empty strings to NULL attribute values.
    pub convert_empty_values: bool,
    /// Drop null-valued entries from objects instead of writing NULL.
    pub remove_undefined_values: bool,
}

impl Default for MarshallOptions {
    fn default() -> Self {
        Self {
            convert_empty_values: true,
            remove_undefined_values: true,
        }
    }
}

/// Options applied when converting attribute values into JSON values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnmarshallOptions {
    /// When set, numbers keep their exact string representation instead of
    /// being parsed into JSON numbers.
    pub wrap_numbers: bool,
}

/// Convert a JSON value into an attribute value.
///
/// Returns `None` for a null value when `remove_undefined_values` is set;
/// callers dropping map entries use this to omit the attribute entirely.
#[must_use]
pub fn marshall_value(value: &serde_json::Value, opts: &MarshallOptions) -> Option<AttributeValue> {
    match value {
        serde_json::Value::Null => {
            if opts.remove_undefined_values {
                None
            } else {
                Some(AttributeValue::Null(true))
            }
        }
        serde_json::Value::Bool(b) => Some(AttributeValue::Bool(*b)),
        serde_json::Value::Number(n) => Some(AttributeValue::N(n.to_string())),
        serde_json::Value::String(s) => {
            if s.is_empty() && opts.convert_empty_values {
                Some(AttributeValue::Null(true))
            } else {
                Some(AttributeValue::S(s.clone()))
            }
        }
        serde_json::Value::Array(items) => {
            let list = items
                .iter()
                .map(|item| marshall_value(item, opts).unwrap_or(AttributeValue::Null(true)))
                .collect();
            Some(AttributeValue::L(list))
        }
        serde_json::Value::Object(map) => Some(AttributeValue::M(marshall_map(map, opts))),
    }
}

/// Convert a JSON value into an attribute value, writing NULL for dropped
/// values. Used for expression bindings and key maps, where an attribute
/// cannot simply be omitted.
#[must_use]
pub fn marshall_value_required(
    value: &serde_json::Value,
    opts: &MarshallOptions,
) -> AttributeValue {
    marshall_value(value, opts).unwrap_or(AttributeValue::Null(true))
}

fn marshall_map(
    map: &serde_json::Map<String, serde_json::Value>,
    opts: &MarshallOptions,
) -> HashMap<String, AttributeValue> {
    map.iter()
        .filter_map(|(k, v)| marshall_value(v, opts).map(|av| (k.clone(), av)))
        .collect()
}

/// Convert a whole document into an attribute-value map.
#[must_use]
pub fn marshall_document(
    document: &Document,
    opts: &MarshallOptions,
) -> HashMap<String, AttributeValue> {
    marshall_map(document, opts)
}

/// Convert an attribute value into a JSON value.
#[must_use]
pub fn unmarshall_value(value: &AttributeValue, opts: &UnmarshallOptions) -> serde_json::Value {
    match value {
        AttributeValue::S(s) => serde_json::Value::String(s.clone()),
        AttributeValue::N(n) => unmarshall_number(n, opts),
        AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
        AttributeValue::Null(_) => serde_json::Value::Null,
        AttributeValue::L(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| unmarshall_value(item, opts))
                .collect(),
        ),
        AttributeValue::M(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), unmarshall_value(v, opts)))
                .collect(),
        ),
        AttributeValue::Ss(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|s| serde_json::Value::String(s.clone()))
                .collect(),
        ),
        AttributeValue::Ns(items) => serde_json::Value::Array(
            items.iter().map(|n| unmarshall_number(n, opts)).collect(),
        ),
        AttributeValue::B(blob) => serde_json::Value::String(
            base64::engine::general_purpose::STANDARD.encode(blob.as_ref()),
        ),
        AttributeValue::Bs(blobs) => serde_json::Value::Array(
            blobs
                .iter()
                .map(|blob| {
                    serde_json::Value::String(
                        base64::engine::general_purpose::STANDARD.encode(blob.as_ref()),
                    )
                })
                .collect(),
        ),
        _ => serde_json::Value::Null,
    }
}

/// Convert an attribute-value map into a document.
#[must_use]
pub fn unmarshall_item(
    item: &HashMap<String, AttributeValue>,
    opts: &UnmarshallOptions,
) -> Document {
    item.iter()
        .map(|(k, v)| (k.clone(), unmarshall_value(v, opts)))
        .collect()
}

/// Parse a number string, preferring integers, falling back to floats, and
/// keeping the string form when neither fits or wrapping was requested.
fn unmarshall_number(n: &str, opts: &UnmarshallOptions) -> serde_json::Value {
    if opts.wrap_numbers {
        return serde_json::Value::String(n.to_owned());
    }
    if let Ok(int) = n.parse::<i64>() {
        return serde_json::Value::Number(int.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(
            || serde_json::Value::String(n.to_owned()),
            serde_json::Value::Number,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_should_marshall_scalars() {
        let opts = MarshallOptions::default();
        assert_eq!(
            marshall_value(&json!("hello"), &opts),
            Some(AttributeValue::S("hello".to_owned()))
        );
        assert_eq!(
            marshall_value(&json!(42), &opts),
            Some(AttributeValue::N("42".to_owned()))
        );
        assert_eq!(
            marshall_value(&json!(true), &opts),
            Some(AttributeValue::Bool(true))
        );
    }

    #[test]
    fn test_should_convert_empty_string_to_null() {
        let opts = MarshallOptions::default();
        assert_eq!(
            marshall_value(&json!(""), &opts),
            Some(AttributeValue::Null(true))
        );

        let opts = MarshallOptions {
            convert_empty_values: false,
            ..MarshallOptions::default()
        };
        assert_eq!(
            marshall_value(&json!(""), &opts),
            Some(AttributeValue::S(String::new()))
        );
    }

    #[test]
    fn test_should_drop_null_entries_from_documents() {
        let opts = MarshallOptions::default();
        let item = marshall_document(&doc(json!({"movieId": 1, "note": null})), &opts);
        assert!(item.contains_key("movieId"));
        assert!(!item.contains_key("note"));

        let opts = MarshallOptions {
            remove_undefined_values: false,
            ..MarshallOptions::default()
        };
        let item = marshall_document(&doc(json!({"note": null})), &opts);
        assert_eq!(item.get("note"), Some(&AttributeValue::Null(true)));
    }

    #[test]
    fn test_should_unmarshall_numbers_as_plain_json_numbers() {
        let opts = UnmarshallOptions::default();
        assert_eq!(
            unmarshall_value(&AttributeValue::N("42".to_owned()), &opts),
            json!(42)
        );
        assert_eq!(
            unmarshall_value(&AttributeValue::N("7.5".to_owned()), &opts),
            json!(7.5)
        );
    }

    #[test]
    fn test_should_keep_number_strings_when_wrapping() {
        let opts = UnmarshallOptions { wrap_numbers: true };
        assert_eq!(
            unmarshall_value(&AttributeValue::N("42".to_owned()), &opts),
            json!("42")
        );
    }

    #[test]
    fn test_should_fall_back_to_float_for_oversized_integers() {
        let opts = UnmarshallOptions::default();
        let huge = "99999999999999999999999999999999999999";
        // Does not fit i64; falls back to f64 with accepted precision loss,
        // but stays a JSON number rather than a string.
        let value = unmarshall_value(&AttributeValue::N(huge.to_owned()), &opts);
        assert!(value.is_f64());
    }

    #[test]
    fn test_should_roundtrip_nested_document() {
        let original = doc(json!({
            "movieId": 1,
            "title": "Heat",
            "meta": {"year": 1995, "tags": ["crime", "drama"]}
        }));
        let marshalled = marshall_document(&original, &MarshallOptions::default());
        let back = unmarshall_item(&marshalled, &UnmarshallOptions::default());
        assert_eq!(back, original);
    }

    #[test]
    fn test_should_marshall_bindings_with_required_fallback() {
        let opts = MarshallOptions::default();
        assert_eq!(
            marshall_value_required(&json!(null), &opts),
            AttributeValue::Null(true)
        );
    }
}
