//! Records of clauses that compiled to less than the request asked for.
//!
//! Compilation is best effort: a malformed entry never aborts the request.
//! Each degradation is reported here so callers can log or surface it.

use std::fmt;

use serde::Serialize;

/// Clause category, in compilation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseKind {
    Match,
    Like,
    ElemMatch,
    Range,
    In,
    NotIn,
    All,
}

impl ClauseKind {
    /// Fixed processing order; later categories overwrite earlier ones on key collision.
    pub const ORDER: [ClauseKind; 7] = [
        ClauseKind::Match,
        ClauseKind::Like,
        ClauseKind::ElemMatch,
        ClauseKind::Range,
        ClauseKind::In,
        ClauseKind::NotIn,
        ClauseKind::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseKind::Match => "match",
            ClauseKind::Like => "like",
            ClauseKind::ElemMatch => "elem_match",
            ClauseKind::Range => "range",
            ClauseKind::In => "in",
            ClauseKind::NotIn => "nin",
            ClauseKind::All => "all",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Key empty after trimming; entry skipped and not counted.
    BlankKey,
    /// `like` value empty after trimming; entry skipped and not counted.
    BlankPattern,
    /// Nil range or set value; entry skipped and not counted.
    MissingValue,
    /// Value shape the coercer cannot use; nothing written.
    UnsupportedValue,
    /// Operator expression whose operand was nil.
    EmptyOperand { operator: String },
    /// Set element of an unsupported type dropped from the list.
    DroppedElement { index: usize },
    /// Range with no bounds; written as an empty document.
    EmptyRange,
    /// Pattern the `regex` crate rejects; written anyway, the driver may still refuse it.
    InvalidPattern { message: String },
    /// Replaced a clause written earlier for the same key.
    Overwritten { previous: ClauseKind },
}

/// One degraded clause entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub clause: ClauseKind,
    pub key: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(clause: ClauseKind, key: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            clause,
            key: key.into(),
            kind,
        }
    }

    /// Whether the entry was skipped before it could count as parsed.
    pub fn is_skip(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::BlankKey | DiagnosticKind::BlankPattern | DiagnosticKind::MissingValue
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': ", self.clause, self.key)?;
        match &self.kind {
            DiagnosticKind::BlankKey => f.write_str("blank key, skipped"),
            DiagnosticKind::BlankPattern => f.write_str("blank pattern, skipped"),
            DiagnosticKind::MissingValue => f.write_str("missing value, skipped"),
            DiagnosticKind::UnsupportedValue => f.write_str("unsupported value, no clause written"),
            DiagnosticKind::EmptyOperand { operator } => {
                write!(f, "operator {operator} has no operand, no clause written")
            }
            DiagnosticKind::DroppedElement { index } => {
                write!(f, "unsupported element at index {index} dropped")
            }
            DiagnosticKind::EmptyRange => f.write_str("range has no bounds"),
            DiagnosticKind::InvalidPattern { message } => {
                write!(f, "pattern does not compile: {message}")
            }
            DiagnosticKind::Overwritten { previous } => {
                write!(f, "overwrote earlier {previous} clause")
            }
        }
    }
}
