//! Dynamically-typed filter values as they arrive from a request body.
//!
//! Request clients send arbitrary JSON in `match[].value` and in the set
//! clauses. [`FilterValue`] closes that open union into the shapes the
//! coercer knows how to handle, so every unsupported shape is an explicit
//! variant instead of a fallthrough.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request value after structural classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// A nested `{ "key": ..., "value": ... }` object.
    Pair(Box<Pair>),
    Array(Vec<FilterValue>),
    /// Any JSON the compiler cannot use (e.g. an object without a `key`).
    Unsupported(Value),
}

/// A nested key/value expression, e.g. `{"key": "$gt", "value": 18}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: String,
    pub value: FilterValue,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: FilterValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// `$`-prefixed keys longer than the bare `$` name an operator, not a field.
    pub fn is_operator(&self) -> bool {
        self.key.len() > 1 && self.key.starts_with('$')
    }
}

impl FilterValue {
    pub fn pair(key: impl Into<String>, value: FilterValue) -> Self {
        FilterValue::Pair(Box::new(Pair::new(key, value)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            FilterValue::Pair(pair) => Some(pair),
            _ => None,
        }
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FilterValue::Null,
            Value::Bool(b) => FilterValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FilterValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    FilterValue::Float(f)
                } else {
                    FilterValue::Unsupported(Value::Number(n))
                }
            }
            Value::String(s) => FilterValue::String(s),
            Value::Array(items) => {
                FilterValue::Array(items.into_iter().map(FilterValue::from).collect())
            }
            Value::Object(mut obj) => {
                // A pair needs a non-empty string `key`; `value` may be absent.
                let key = match obj.get("key") {
                    Some(Value::String(k)) if !k.is_empty() => k.clone(),
                    _ => return FilterValue::Unsupported(Value::Object(obj)),
                };
                let value = obj.remove("value").map(FilterValue::from);
                FilterValue::pair(key, value.unwrap_or(FilterValue::Null))
            }
        }
    }
}

impl From<FilterValue> for Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Null => Value::Null,
            FilterValue::Bool(b) => Value::Bool(b),
            FilterValue::Int(i) => Value::from(i),
            FilterValue::Float(f) => Value::from(f),
            FilterValue::String(s) => Value::String(s),
            FilterValue::Pair(pair) => {
                let Pair { key, value } = *pair;
                serde_json::json!({ "key": key, "value": Value::from(value) })
            }
            FilterValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            FilterValue::Unsupported(raw) => raw,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Int(i)
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_with_key_become_pairs() {
        let v = FilterValue::from(json!({"key": "$gt", "value": 18}));
        let pair = v.as_pair().unwrap();
        assert_eq!(pair.key, "$gt");
        assert_eq!(pair.value, FilterValue::Int(18));
        assert!(pair.is_operator());
    }

    #[test]
    fn missing_value_is_null() {
        let v = FilterValue::from(json!({"key": "status"}));
        assert_eq!(v.as_pair().unwrap().value, FilterValue::Null);
    }

    #[test]
    fn objects_without_string_key_are_unsupported() {
        for raw in [
            json!({"value": 1}),
            json!({"key": "", "value": 1}),
            json!({"key": 5, "value": 1}),
            json!({"$gt": 5}),
        ] {
            assert!(
                matches!(FilterValue::from(raw.clone()), FilterValue::Unsupported(_)),
                "{raw} should not destructure into a pair"
            );
        }
    }

    #[test]
    fn bare_dollar_is_not_an_operator() {
        assert!(!Pair::new("$", FilterValue::Null).is_operator());
        assert!(Pair::new("$ne", FilterValue::Null).is_operator());
    }

    #[test]
    fn numbers_keep_integer_precision() {
        assert_eq!(FilterValue::from(json!(42)), FilterValue::Int(42));
        assert_eq!(FilterValue::from(json!(4.5)), FilterValue::Float(4.5));
        assert_eq!(
            FilterValue::from(json!(u64::MAX)),
            FilterValue::Float(u64::MAX as f64)
        );
    }

    #[test]
    fn deserializes_nested_arrays() {
        let v: FilterValue =
            serde_json::from_value(json!([{"key": "$gt", "value": 1}, "x", null])).unwrap();
        match v {
            FilterValue::Array(items) => {
                assert_eq!(items.len(), 3);
                assert!(items[0].as_pair().is_some());
                assert_eq!(items[1], FilterValue::String("x".to_string()));
                assert!(items[2].is_null());
            }
            other => panic!("expected array, got {other:?}"),
        }
    }
}
