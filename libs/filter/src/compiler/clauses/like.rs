use crate::clause::{ClauseValue, Pattern};
use crate::diagnostics::{ClauseKind, DiagnosticKind};
use crate::params::Like;

use super::{is_blank, ClauseSink};

/// Substring clauses: `key -> /.*value.*/i`.
pub(in crate::compiler) fn build_like_clauses(likes: &[Like], sink: &mut ClauseSink) -> usize {
    let mut parsed = 0;
    for like in likes {
        if is_blank(&like.key) {
            sink.report(ClauseKind::Like, &like.key, DiagnosticKind::BlankKey);
            continue;
        }
        if is_blank(&like.value) {
            sink.report(ClauseKind::Like, &like.key, DiagnosticKind::BlankPattern);
            continue;
        }
        sink.write(
            ClauseKind::Like,
            &like.key,
            ClauseValue::Regex(Pattern::contains(&like.value)),
        );
        parsed += 1;
    }

    parsed
}
