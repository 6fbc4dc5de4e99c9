use crate::clause::{ClauseValue, Pattern, OP_ALL, OP_IN, OP_NIN};
use crate::diagnostics::{ClauseKind, DiagnosticKind};
use crate::params::SetFilter;
use crate::value::FilterValue;

use super::{is_blank, ClauseSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::compiler) enum SetOperator {
    In,
    NotIn,
    All,
}

impl SetOperator {
    fn operator(self) -> &'static str {
        match self {
            SetOperator::In => OP_IN,
            SetOperator::NotIn => OP_NIN,
            SetOperator::All => OP_ALL,
        }
    }

    fn clause(self) -> ClauseKind {
        match self {
            SetOperator::In => ClauseKind::In,
            SetOperator::NotIn => ClauseKind::NotIn,
            SetOperator::All => ClauseKind::All,
        }
    }
}

/// Set clauses: `key -> {$in|$nin|$all: [...]}`.
///
/// Strings become anchored case-insensitive patterns, numbers and booleans
/// pass through, and any other element is dropped from the list.
pub(in crate::compiler) fn build_set_clauses(
    op: SetOperator,
    sets: &[SetFilter],
    sink: &mut ClauseSink,
) -> usize {
    let clause = op.clause();
    let mut parsed = 0;
    for set in sets {
        if is_blank(&set.key) {
            sink.report(clause, &set.key, DiagnosticKind::BlankKey);
            continue;
        }
        let Some(values) = &set.value else {
            sink.report(clause, &set.key, DiagnosticKind::MissingValue);
            continue;
        };

        let mut items = Vec::with_capacity(values.len());
        for (index, v) in values.iter().enumerate() {
            match v {
                FilterValue::String(s) => items.push(ClauseValue::Regex(Pattern::exact(s))),
                FilterValue::Int(i) => items.push(ClauseValue::Int(*i)),
                FilterValue::Float(f) => items.push(ClauseValue::Float(*f)),
                FilterValue::Bool(b) => items.push(ClauseValue::Bool(*b)),
                _ => sink.report(clause, &set.key, DiagnosticKind::DroppedElement { index }),
            }
        }

        sink.write(
            clause,
            &set.key,
            ClauseValue::operator(op.operator(), ClauseValue::Array(items)),
        );
        parsed += 1;
    }

    parsed
}
