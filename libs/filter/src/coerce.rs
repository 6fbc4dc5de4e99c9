//! Value coercion from request values into clause values.
//!
//! Two mutually recursive entry points:
//! - [`coerce_value`]: the value sits under a literal field. Strings become
//!   anchored case-insensitive patterns, and arrays of pairs merge into one document.
//! - [`coerce_operator_value`]: the value is an operator's operand. Strings stay
//!   literal, and arrays stay positional lists (e.g. the argument of `$in`).
//!
//! `None` means "no usable clause". Callers drop it and never write a null.
//! Elements dropped from inside a value are recorded by [`Coercer`].

use crate::clause::{ClauseMap, ClauseValue, Pattern};
use crate::diagnostics::DiagnosticKind;
use crate::value::{FilterValue, Pair};

/// Part of a value the coercer left out, keyed by the field path it sat under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceIssue {
    pub path: String,
    pub kind: DiagnosticKind,
}

/// Coercion pass that records every element it drops.
///
/// The value as a whole coming back `None` is not recorded; the caller
/// decides how to report that.
#[derive(Debug, Default)]
pub struct Coercer {
    issues: Vec<CoerceIssue>,
}

impl Coercer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coerce a value that appears under the literal field `path`.
    pub fn coerce_value(&mut self, path: &str, value: &FilterValue) -> Option<ClauseValue> {
        match value {
            FilterValue::Bool(b) => Some(ClauseValue::Bool(*b)),
            FilterValue::Int(i) => Some(ClauseValue::Int(*i)),
            FilterValue::Float(f) => Some(ClauseValue::Float(*f)),
            FilterValue::String(s) => Some(ClauseValue::Regex(Pattern::exact(s))),
            FilterValue::Pair(pair) => self.coerce_pair(path, pair),
            FilterValue::Array(items) => self.merge_pairs(path, items),
            FilterValue::Null | FilterValue::Unsupported(_) => None,
        }
    }

    /// Coerce the operand of a `$`-operator applied to the field `path`.
    pub fn coerce_operator_value(
        &mut self,
        path: &str,
        value: &FilterValue,
    ) -> Option<ClauseValue> {
        match value {
            FilterValue::Bool(b) => Some(ClauseValue::Bool(*b)),
            FilterValue::Int(i) => Some(ClauseValue::Int(*i)),
            FilterValue::Float(f) => Some(ClauseValue::Float(*f)),
            FilterValue::String(s) => Some(ClauseValue::String(s.clone())),
            FilterValue::Pair(pair) => self.coerce_pair(path, pair),
            FilterValue::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match self.coerce_value(path, item) {
                        Some(v) => list.push(v),
                        None => self.record(path, DiagnosticKind::DroppedElement { index }),
                    }
                }
                Some(ClauseValue::Array(list))
            }
            FilterValue::Null | FilterValue::Unsupported(_) => None,
        }
    }

    pub fn issues(&self) -> &[CoerceIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<CoerceIssue> {
        self.issues
    }

    /// `{key, value}` becomes `{key: coerced}`; an operator with a nil operand yields nothing.
    fn coerce_pair(&mut self, path: &str, pair: &Pair) -> Option<ClauseValue> {
        let inner = if pair.is_operator() {
            if pair.value.is_null() {
                return None;
            }
            self.coerce_operator_value(path, &pair.value)?
        } else {
            self.coerce_value(&join(path, &pair.key), &pair.value)?
        };
        Some(ClauseValue::operator(pair.key.clone(), inner))
    }

    /// Merge every pair element into one document, e.g. `$gt` and `$lt` side by side.
    fn merge_pairs(&mut self, path: &str, items: &[FilterValue]) -> Option<ClauseValue> {
        let mut doc = ClauseMap::new();
        for (index, item) in items.iter().enumerate() {
            let Some(pair) = item.as_pair() else {
                self.record(path, DiagnosticKind::DroppedElement { index });
                continue;
            };

            if pair.is_operator() {
                if pair.value.is_null() {
                    self.record(
                        path,
                        DiagnosticKind::EmptyOperand {
                            operator: pair.key.clone(),
                        },
                    );
                    continue;
                }
                match self.coerce_operator_value(path, &pair.value) {
                    Some(v) => {
                        doc.insert(pair.key.clone(), v);
                    }
                    None => self.record(path, DiagnosticKind::UnsupportedValue),
                }
            } else {
                let sub = join(path, &pair.key);
                match self.coerce_value(&sub, &pair.value) {
                    Some(v) => {
                        doc.insert(pair.key.clone(), v);
                    }
                    None => self.record(&sub, DiagnosticKind::UnsupportedValue),
                }
            }
        }

        if doc.is_empty() {
            None
        } else {
            Some(ClauseValue::Document(doc))
        }
    }

    fn record(&mut self, path: &str, kind: DiagnosticKind) {
        self.issues.push(CoerceIssue {
            path: path.to_string(),
            kind,
        });
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Coerce a value that appears under a literal field name, discarding drop records.
pub fn coerce_value(value: &FilterValue) -> Option<ClauseValue> {
    Coercer::new().coerce_value("", value)
}

/// Coerce the operand of a `$`-operator, discarding drop records.
pub fn coerce_operator_value(value: &FilterValue) -> Option<ClauseValue> {
    Coercer::new().coerce_operator_value("", value)
}
