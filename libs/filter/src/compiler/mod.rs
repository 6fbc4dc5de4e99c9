//! Params to clause-document compiler.
//!
//! Runs every clause builder in a fixed order (match, like, elem_match,
//! range, in, nin, all) against one shared clause map. On key collisions the
//! later category wins. The parsed count tallies entries that passed their
//! builder's gate and backs the optional "at least one clause" check.

mod clauses;
mod sink;

use serde::Serialize;

use crate::clause::ClauseMap;
use crate::diagnostics::{ClauseKind, Diagnostic};
use crate::params::Params;
use crate::{Error, Result};

use clauses::SetOperator;
use sink::ClauseSink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail when no clause entry was parsed.
    pub required: bool,
}

impl CompileOptions {
    pub fn required() -> Self {
        Self { required: true }
    }
}

/// Result of one compilation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Compiled {
    /// The query document for the driver.
    pub clauses: ClauseMap,
    /// Entries that passed their builder's gate.
    pub parsed: usize,
    /// Entries that were skipped or degraded.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compiled {
    /// Diagnostics for one clause category.
    pub fn diagnostics_for(&self, clause: ClauseKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.clause == clause)
    }
}

/// Stateless compiler; one instance may serve any number of requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn compile(&self, params: &Params) -> Result<Compiled> {
        let mut sink = ClauseSink::new();
        let mut parsed = 0;

        for kind in ClauseKind::ORDER {
            parsed += match kind {
                ClauseKind::Match => {
                    clauses::build_match_clauses(kind, &params.query.matches, &mut sink)
                }
                ClauseKind::Like => clauses::build_like_clauses(&params.query.like, &mut sink),
                ClauseKind::ElemMatch => {
                    clauses::build_elem_match_clauses(&params.query.elem_match, &mut sink)
                }
                ClauseKind::Range => clauses::build_range_clauses(&params.filter.range, &mut sink),
                ClauseKind::In => {
                    clauses::build_set_clauses(SetOperator::In, &params.filter.r#in, &mut sink)
                }
                ClauseKind::NotIn => {
                    clauses::build_set_clauses(SetOperator::NotIn, &params.filter.not_in, &mut sink)
                }
                ClauseKind::All => {
                    clauses::build_set_clauses(SetOperator::All, &params.filter.all, &mut sink)
                }
            };
        }

        let (clauses, diagnostics) = sink.into_parts();

        tracing::trace!(
            version = %params.version,
            parsed,
            clauses = clauses.len(),
            dropped = diagnostics.len(),
            "compiled filter params"
        );

        if self.options.required && parsed == 0 {
            return Err(Error::required_clause());
        }

        Ok(Compiled {
            clauses,
            parsed,
            diagnostics,
        })
    }
}

/// Compile `params` into a clause map, failing when `required` and nothing was parsed.
pub fn compile(params: &Params, required: bool) -> Result<ClauseMap> {
    Compiler::new(CompileOptions { required })
        .compile(params)
        .map(|compiled| compiled.clauses)
}
