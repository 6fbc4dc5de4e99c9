use std::collections::HashMap;

use crate::clause::{ClauseMap, ClauseValue};
use crate::diagnostics::{ClauseKind, Diagnostic, DiagnosticKind};

/// Shared write target for every clause builder of one compilation.
#[derive(Debug, Default)]
pub(crate) struct ClauseSink {
    clauses: ClauseMap,
    origins: HashMap<String, ClauseKind>,
    diagnostics: Vec<Diagnostic>,
}

impl ClauseSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write `key -> value`, replacing whatever an earlier clause wrote there.
    pub(crate) fn write(&mut self, clause: ClauseKind, key: &str, value: ClauseValue) {
        self.check_patterns(clause, key, &value);
        if self.clauses.insert(key, value).is_some() {
            let previous = self.origins.get(key).copied().unwrap_or(clause);
            self.report(clause, key, DiagnosticKind::Overwritten { previous });
        }
        self.origins.insert(key.to_string(), clause);
    }

    pub(crate) fn report(&mut self, clause: ClauseKind, key: &str, kind: DiagnosticKind) {
        tracing::debug!(clause = %clause, key, diagnostic = ?kind, "filter clause degraded");
        self.diagnostics.push(Diagnostic::new(clause, key, kind));
    }

    /// Re-home diagnostics from a nested compilation under `clause` and `prefix`.
    pub(crate) fn absorb(&mut self, clause: ClauseKind, prefix: &str, nested: Vec<Diagnostic>) {
        for d in nested {
            let key = if d.key.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix}.{}", d.key)
            };
            self.diagnostics.push(Diagnostic::new(clause, key, d.kind));
        }
    }

    pub(crate) fn into_parts(self) -> (ClauseMap, Vec<Diagnostic>) {
        (self.clauses, self.diagnostics)
    }

    fn check_patterns(&mut self, clause: ClauseKind, key: &str, value: &ClauseValue) {
        let mut errors = Vec::new();
        collect_pattern_errors(value, &mut errors);
        for message in errors {
            self.report(clause, key, DiagnosticKind::InvalidPattern { message });
        }
    }
}

fn collect_pattern_errors(value: &ClauseValue, out: &mut Vec<String>) {
    match value {
        ClauseValue::Regex(p) => {
            if let Err(e) = p.to_regex() {
                out.push(e.to_string());
            }
        }
        ClauseValue::Array(items) => items.iter().for_each(|v| collect_pattern_errors(v, out)),
        ClauseValue::Document(doc) => doc
            .iter()
            .for_each(|(_, v)| collect_pattern_errors(v, out)),
        _ => {}
    }
}
