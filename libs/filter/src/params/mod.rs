//! Request parameter schema.
//!
//! `Params` is the canonical (v3) envelope decoded from a request body:
//! - `query`: equality (`match`), substring (`like`) and array-element (`elem_match`) clauses
//! - `filter`: `range`, `in`, `nin` and `all` clauses
//! - `sort` / `limit`: consumed by [`crate::FindOptions`], not by the compiler
//!
//! Older v2 bodies decode through [`v2::ParamsV2`] and are lifted into the
//! same canonical shape, with [`Params::version`] recording where they came from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::FilterValue;
use crate::Result;

pub mod v2;

/// Wire version of a request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V2,
    #[default]
    V3,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" | "2" => Ok(ApiVersion::V2),
            "v3" | "3" => Ok(ApiVersion::V3),
            other => Err(format!("unknown API version '{other}' (expected v2 or v3)")),
        }
    }
}

/// Equality clause; `value` may be a scalar, a nested pair or an array of pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default = "null_value")]
    pub value: FilterValue,
}

fn null_value() -> FilterValue {
    FilterValue::Null
}

impl Match {
    pub fn new(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Case-insensitive substring clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Like {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

impl Like {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Matches documents whose array field has an element satisfying every sub-match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElemMatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: Vec<Match>,
}

/// Independently optional range bounds. A JSON `null` bound counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<Value>,
}

impl RangeValue {
    pub fn is_empty(&self) -> bool {
        self.gt.is_none() && self.lt.is_none() && self.gte.is_none() && self.lte.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default)]
    pub value: Option<RangeValue>,
}

/// Set clause shared by `in`, `nin` and `all`. `None` means the value was nil.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetFilter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default)]
    pub value: Option<Vec<FilterValue>>,
}

impl SetFilter {
    pub fn new(key: impl Into<String>, values: Vec<FilterValue>) -> Self {
        Self {
            key: key.into(),
            value: Some(values),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, rename = "match", deserialize_with = "null_as_default")]
    pub matches: Vec<Match>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub like: Vec<Like>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub elem_match: Vec<ElemMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub range: Vec<Range>,
    #[serde(default, rename = "in", deserialize_with = "null_as_default")]
    pub r#in: Vec<SetFilter>,
    #[serde(default, rename = "nin", deserialize_with = "null_as_default")]
    pub not_in: Vec<SetFilter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub all: Vec<SetFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: i64,
}

/// Canonical request envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: Query,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter: Filter,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort: Vec<Sort>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limit: Limit,
    /// Opaque payload carried alongside the query; never inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Wire version the params were decoded from.
    #[serde(skip)]
    pub version: ApiVersion,
}

impl Params {
    pub fn from_json_str(input: &str, version: ApiVersion) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json_value(value, version)
    }

    pub fn from_json_value(value: Value, version: ApiVersion) -> Result<Self> {
        if value.is_null() {
            return Ok(Params {
                version,
                ..Default::default()
            });
        }
        match version {
            ApiVersion::V3 => {
                let mut params: Params = serde_json::from_value(value)?;
                params.version = ApiVersion::V3;
                Ok(params)
            }
            ApiVersion::V2 => {
                let legacy: v2::ParamsV2 = serde_json::from_value(value)?;
                Ok(legacy.into())
            }
        }
    }

    /// True when no query or filter clause is declared at all.
    pub fn is_empty(&self) -> bool {
        self.query.matches.is_empty()
            && self.query.like.is_empty()
            && self.query.elem_match.is_empty()
            && self.filter.range.is_empty()
            && self.filter.r#in.is_empty()
            && self.filter.not_in.is_empty()
            && self.filter.all.is_empty()
    }
}

/// `null` decodes like an absent field, so one null entry field reaches the
/// builder gates instead of failing the whole body.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
