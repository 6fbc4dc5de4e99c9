use crate::clause::ClauseValue;
use crate::coerce::Coercer;
use crate::diagnostics::{ClauseKind, DiagnosticKind};
use crate::params::Match;
use crate::value::FilterValue;

use super::{is_blank, ClauseSink};

/// Equality / operator clauses.
///
/// - `{key: "$op", value}` nested under a field writes `field -> {$op: operand}`
/// - `{key: "sub", value}` nested under a field writes `field.sub -> value`
/// - anything else writes `field -> value`
///
/// Entries count as parsed once their key is non-blank, even when the value
/// turns out to be unusable. Elements the coercer drops from inside the value
/// are reported before the clause is written.
pub(in crate::compiler) fn build_match_clauses(
    clause: ClauseKind,
    matches: &[Match],
    sink: &mut ClauseSink,
) -> usize {
    let mut parsed = 0;
    for m in matches {
        if is_blank(&m.key) {
            sink.report(clause, &m.key, DiagnosticKind::BlankKey);
            continue;
        }
        parsed += 1;

        let mut coercer = Coercer::new();
        let (path, coerced) = match &m.value {
            FilterValue::Pair(pair) if pair.is_operator() => {
                if pair.value.is_null() {
                    sink.report(
                        clause,
                        &m.key,
                        DiagnosticKind::EmptyOperand {
                            operator: pair.key.clone(),
                        },
                    );
                    continue;
                }
                let operand = coercer.coerce_operator_value(&m.key, &pair.value);
                (
                    m.key.clone(),
                    operand.map(|v| ClauseValue::operator(pair.key.clone(), v)),
                )
            }
            FilterValue::Pair(pair) => {
                let path = format!("{}.{}", m.key, pair.key);
                let value = coercer.coerce_value(&path, &pair.value);
                (path, value)
            }
            other => (m.key.clone(), coercer.coerce_value(&m.key, other)),
        };

        for issue in coercer.into_issues() {
            sink.report(clause, &issue.path, issue.kind);
        }
        match coerced {
            Some(v) => sink.write(clause, &path, v),
            None => sink.report(clause, &path, DiagnosticKind::UnsupportedValue),
        }
    }

    parsed
}
