#![forbid(unsafe_code)]

//! Declarative filter compiler.
//!
//! Turns a JSON request body describing match / like / elem_match / range /
//! in / nin / all criteria into a MongoDB-style query document.
//!
//! ```text
//! request JSON
//!      |
//!   Params (v2 or v3 wire shape, one canonical struct)
//!      |
//!   clause builders -> value coercer
//!      |
//!   ClauseMap + parsed count + diagnostics
//! ```
//!
//! Compilation is pure and synchronous. Malformed entries are dropped and
//! reported as [`Diagnostic`]s instead of failing the request. The only
//! error is the optional "at least one clause" check.

pub mod clause;
pub mod coerce;
pub mod compiler;
pub mod diagnostics;
pub mod error;
pub mod options;
pub mod params;
pub mod value;

pub use clause::{ClauseMap, ClauseValue, Pattern};
pub use coerce::{coerce_operator_value, coerce_value, CoerceIssue, Coercer};
pub use compiler::{compile, CompileOptions, Compiled, Compiler};
pub use diagnostics::{ClauseKind, Diagnostic, DiagnosticKind};
pub use error::{Error, Result, REQUIRED_CLAUSE_MESSAGE};
pub use options::{FindOptions, SortKey, SortOrder};
pub use params::{
    ApiVersion, ElemMatch, Filter, Like, Limit, Match, Params, Query, Range, RangeValue,
    SetFilter, Sort,
};
pub use value::{FilterValue, Pair};
