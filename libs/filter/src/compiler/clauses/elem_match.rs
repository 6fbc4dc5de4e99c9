use crate::clause::{ClauseValue, OP_ELEM_MATCH};
use crate::diagnostics::{ClauseKind, DiagnosticKind};
use crate::params::ElemMatch;

use super::{build_match_clauses, is_blank, ClauseSink};

/// Array-element clauses: the sub-matches compile in isolation into
/// `key -> {$elemMatch: {...}}`.
pub(in crate::compiler) fn build_elem_match_clauses(
    elem_matches: &[ElemMatch],
    sink: &mut ClauseSink,
) -> usize {
    let mut parsed = 0;
    for em in elem_matches {
        if is_blank(&em.key) {
            sink.report(ClauseKind::ElemMatch, &em.key, DiagnosticKind::BlankKey);
            continue;
        }

        let mut nested = ClauseSink::new();
        build_match_clauses(ClauseKind::Match, &em.value, &mut nested);
        let (sub, diagnostics) = nested.into_parts();
        sink.absorb(ClauseKind::ElemMatch, &em.key, diagnostics);

        sink.write(
            ClauseKind::ElemMatch,
            &em.key,
            ClauseValue::operator(OP_ELEM_MATCH, ClauseValue::Document(sub)),
        );
        parsed += 1;
    }

    parsed
}
