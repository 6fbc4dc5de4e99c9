//! Legacy v2 request shape.
//!
//! v2 only knew string equality matches and `gt`/`lt` ranges. It also carried
//! `*_attributes` lists for filtering flattened attribute maps, which no
//! compiler ever consumed; they are accepted and dropped.

use serde::Deserialize;
use serde_json::Value;

use super::{
    null_as_default, ApiVersion, Filter, FilterValue, Limit, Match, Params, Query, Range,
    RangeValue, Sort,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchV2 {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeValueV2 {
    #[serde(default)]
    pub gt: Option<Value>,
    #[serde(default)]
    pub lt: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeV2 {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default)]
    pub value: Option<RangeValueV2>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryV2 {
    #[serde(default, rename = "match", deserialize_with = "null_as_default")]
    pub matches: Vec<MatchV2>,
    #[serde(default, rename = "match_attributes", deserialize_with = "null_as_default")]
    pub match_attributes: Vec<MatchV2>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterV2 {
    #[serde(default, deserialize_with = "null_as_default")]
    pub range: Vec<RangeV2>,
    #[serde(default, rename = "range_attributes", deserialize_with = "null_as_default")]
    pub range_attributes: Vec<RangeV2>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamsV2 {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: QueryV2,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter: FilterV2,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort: Vec<Sort>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limit: Limit,
    #[serde(default, rename = "filter_attributes", deserialize_with = "null_as_default")]
    pub filter_attributes: Vec<FilterV2>,
}

impl ParamsV2 {
    fn attribute_clause_count(&self) -> usize {
        self.query.match_attributes.len()
            + self.filter.range_attributes.len()
            + self
                .filter_attributes
                .iter()
                .map(|f| f.range.len() + f.range_attributes.len())
                .sum::<usize>()
    }
}

impl From<RangeV2> for Range {
    fn from(r: RangeV2) -> Self {
        Range {
            key: r.key,
            value: r.value.map(|v| RangeValue {
                gt: v.gt.filter(|b| !b.is_null()),
                lt: v.lt.filter(|b| !b.is_null()),
                gte: None,
                lte: None,
            }),
        }
    }
}

impl From<ParamsV2> for Params {
    fn from(legacy: ParamsV2) -> Self {
        let ignored = legacy.attribute_clause_count();
        if ignored > 0 {
            tracing::warn!(
                ignored,
                "v2 attribute filters are not supported and were dropped"
            );
        }

        Params {
            query: Query {
                matches: legacy
                    .query
                    .matches
                    .into_iter()
                    .map(|m| Match {
                        key: m.key,
                        value: FilterValue::String(m.value),
                    })
                    .collect(),
                like: Vec::new(),
                elem_match: Vec::new(),
            },
            filter: Filter {
                range: legacy.filter.range.into_iter().map(Range::from).collect(),
                ..Filter::default()
            },
            sort: legacy.sort,
            limit: legacy.limit,
            data: None,
            version: ApiVersion::V2,
        }
    }
}
