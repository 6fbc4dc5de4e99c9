//! Clause builders, one per request clause category.
//!
//! Every builder walks its entries, writes into the shared [`ClauseSink`]
//! and returns how many entries passed its gate (the "parsed" count).

mod elem_match;
mod like;
mod matching;
mod range;
mod set;

use super::sink::ClauseSink;

pub(in crate::compiler) use elem_match::build_elem_match_clauses;
pub(in crate::compiler) use like::build_like_clauses;
pub(in crate::compiler) use matching::build_match_clauses;
pub(in crate::compiler) use range::build_range_clauses;
pub(in crate::compiler) use set::{build_set_clauses, SetOperator};

/// Keys that are empty after trimming never produce a clause.
fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
