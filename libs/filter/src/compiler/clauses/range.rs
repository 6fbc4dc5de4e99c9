use crate::clause::{ClauseMap, ClauseValue, OP_GT, OP_GTE, OP_LT, OP_LTE};
use crate::diagnostics::{ClauseKind, DiagnosticKind};
use crate::params::Range;

use super::{is_blank, ClauseSink};

/// Range clauses: `key -> {$gt?, $lt?, $gte?, $lte?}`; bounds pass through as given.
pub(in crate::compiler) fn build_range_clauses(ranges: &[Range], sink: &mut ClauseSink) -> usize {
    let mut parsed = 0;
    for range in ranges {
        if is_blank(&range.key) {
            sink.report(ClauseKind::Range, &range.key, DiagnosticKind::BlankKey);
            continue;
        }
        let Some(bounds) = &range.value else {
            sink.report(ClauseKind::Range, &range.key, DiagnosticKind::MissingValue);
            continue;
        };

        let mut doc = ClauseMap::new();
        for (op, bound) in [
            (OP_GT, &bounds.gt),
            (OP_LT, &bounds.lt),
            (OP_GTE, &bounds.gte),
            (OP_LTE, &bounds.lte),
        ] {
            if let Some(v) = bound.as_ref().filter(|v| !v.is_null()) {
                doc.insert(op, ClauseValue::from(v.clone()));
            }
        }
        if doc.is_empty() {
            sink.report(ClauseKind::Range, &range.key, DiagnosticKind::EmptyRange);
        }

        sink.write(ClauseKind::Range, &range.key, ClauseValue::Document(doc));
        parsed += 1;
    }

    parsed
}
