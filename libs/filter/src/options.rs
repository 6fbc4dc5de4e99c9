//! Sort and pagination options derived from the request's `sort` and `limit`.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::params::{Params, Sort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// `desc`, `descending` and `-1` sort descending; anything else ascends.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" | "-1" => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }

    /// Driver direction: `1` or `-1`.
    pub fn direction(&self) -> i64 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

/// Options a driver needs alongside the filter document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FindOptions {
    pub sort: Vec<SortKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn from_params(params: &Params) -> Self {
        Self {
            sort: sort_keys(&params.sort),
            skip: positive(params.limit.offset),
            limit: positive(params.limit.rows),
        }
    }

    /// Sort as a driver document, `field -> 1 | -1`, in request order.
    pub fn sort_document(&self) -> Map<String, Value> {
        self.sort
            .iter()
            .map(|k| (k.field.clone(), Value::from(k.order.direction())))
            .collect()
    }
}

fn sort_keys(sort: &[Sort]) -> Vec<SortKey> {
    let mut seen = HashSet::new();
    sort.iter()
        .filter(|s| !s.key.trim().is_empty())
        .filter(|s| seen.insert(s.key.clone()))
        .map(|s| SortKey {
            field: s.key.clone(),
            order: SortOrder::parse(&s.value),
        })
        .collect()
}

fn positive(n: i64) -> Option<u64> {
    u64::try_from(n).ok().filter(|n| *n > 0)
}
