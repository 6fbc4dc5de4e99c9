//! Clause document model.
//!
//! A [`ClauseMap`] is the compiled query handed to a MongoDB-style driver:
//! dotted field paths mapped to a value or to an operator sub-document.
//! Serialization uses canonical extended JSON so regular expressions
//! survive a trip through plain JSON tooling.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

pub const OP_GT: &str = "$gt";
pub const OP_LT: &str = "$lt";
pub const OP_GTE: &str = "$gte";
pub const OP_LTE: &str = "$lte";
pub const OP_IN: &str = "$in";
pub const OP_NIN: &str = "$nin";
pub const OP_ALL: &str = "$all";
pub const OP_ELEM_MATCH: &str = "$elemMatch";

const CASE_INSENSITIVE: &str = "i";

/// A regular expression in driver form: source text plus option flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    pub pattern: String,
    pub options: String,
}

impl Pattern {
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            options: options.into(),
        }
    }

    /// Anchored, case-insensitive equality: `/^value$/i`.
    ///
    /// The value is not escaped; clients may rely on regex syntax inside it.
    pub fn exact(value: &str) -> Self {
        Self::new(format!("^{value}$"), CASE_INSENSITIVE)
    }

    /// Unanchored, case-insensitive substring match: `/.*value.*/i`.
    pub fn contains(value: &str) -> Self {
        Self::new(format!(".*{value}.*"), CASE_INSENSITIVE)
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.options.contains('i')
    }

    /// Compile into a [`regex::Regex`], honoring the `i`, `m`, `s` and `x` flags.
    pub fn to_regex(&self) -> Result<regex::Regex, regex::Error> {
        regex::RegexBuilder::new(&self.pattern)
            .case_insensitive(self.is_case_insensitive())
            .multi_line(self.options.contains('m'))
            .dot_matches_new_line(self.options.contains('s'))
            .ignore_whitespace(self.options.contains('x'))
            .build()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.options)
    }
}

/// A value inside the compiled query document.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Regex(Pattern),
    Array(Vec<ClauseValue>),
    Document(ClauseMap),
}

impl ClauseValue {
    /// Single-entry sub-document, e.g. `{"$in": [...]}`.
    pub fn operator(op: impl Into<String>, value: ClauseValue) -> Self {
        let mut doc = ClauseMap::new();
        doc.insert(op, value);
        ClauseValue::Document(doc)
    }

    pub fn as_document(&self) -> Option<&ClauseMap> {
        match self {
            ClauseValue::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&Pattern> {
        match self {
            ClauseValue::Regex(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ClauseValue]> {
        match self {
            ClauseValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        // Serializing into serde_json::Value cannot fail: every key is a string.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Range bounds arrive as raw JSON and are passed through untouched.
impl From<Value> for ClauseValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ClauseValue::Null,
            Value::Bool(b) => ClauseValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ClauseValue::Int(i),
                None => ClauseValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ClauseValue::String(s),
            Value::Array(items) => {
                ClauseValue::Array(items.into_iter().map(ClauseValue::from).collect())
            }
            Value::Object(obj) => ClauseValue::Document(
                obj.into_iter()
                    .map(|(k, v)| (k, ClauseValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Pattern> for ClauseValue {
    fn from(p: Pattern) -> Self {
        ClauseValue::Regex(p)
    }
}

impl From<ClauseMap> for ClauseValue {
    fn from(doc: ClauseMap) -> Self {
        ClauseValue::Document(doc)
    }
}

impl Serialize for ClauseValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClauseValue::Null => serializer.serialize_unit(),
            ClauseValue::Bool(b) => serializer.serialize_bool(*b),
            ClauseValue::Int(i) => serializer.serialize_i64(*i),
            ClauseValue::Float(f) => serializer.serialize_f64(*f),
            ClauseValue::String(s) => serializer.serialize_str(s),
            ClauseValue::Regex(p) => {
                #[derive(Serialize)]
                struct RegularExpression<'a> {
                    pattern: &'a str,
                    options: &'a str,
                }
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    "$regularExpression",
                    &RegularExpression {
                        pattern: &p.pattern,
                        options: &p.options,
                    },
                )?;
                map.end()
            }
            ClauseValue::Array(items) => items.serialize(serializer),
            ClauseValue::Document(doc) => doc.serialize(serializer),
        }
    }
}

/// Field path to clause value. Keys are unique; the last write wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseMap(BTreeMap<String, ClauseValue>);

impl ClauseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a clause, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: ClauseValue) -> Option<ClauseValue> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&ClauseValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ClauseValue> {
        self.0.iter()
    }

    /// Render as canonical extended JSON.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }
}

impl Serialize for ClauseMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl FromIterator<(String, ClauseValue)> for ClauseMap {
    fn from_iter<I: IntoIterator<Item = (String, ClauseValue)>>(iter: I) -> Self {
        ClauseMap(iter.into_iter().collect())
    }
}

impl IntoIterator for ClauseMap {
    type Item = (String, ClauseValue);
    type IntoIter = btree_map::IntoIter<String, ClauseValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClauseMap {
    type Item = (&'a String, &'a ClauseValue);
    type IntoIter = btree_map::Iter<'a, String, ClauseValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
