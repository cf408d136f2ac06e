//! Elasticsearch Query DSL types
//!
//! The subset of the engine's request body that the compilers emit. Every
//! type serializes to exactly the JSON the engine expects.

use crate::query::types::Direction;
use crate::Warning;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A compiled search request, ready to hand to a transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireQuery {
    /// Engine index name
    pub index: String,
    pub body: SearchBody,
    /// Non-fatal problems met while compiling
    #[serde(skip)]
    pub warnings: Vec<Warning>,
}

/// Search request body
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchBody {
    pub from: usize,
    pub size: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortClause>,

    pub query: Clause,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggs: BTreeMap<String, Aggregation>,

    #[serde(default, rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFilter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_total_hits: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SourceFilter {
    pub excludes: Vec<String>,
}

/// `{ "<field>": "asc" | "desc" }`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SortClause(pub BTreeMap<String, Direction>);

impl SortClause {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), direction);
        Self(map)
    }
}

/// Query clauses
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// Match all documents
    MatchAll(MatchAllQuery),

    /// Exact match, not analyzed
    Term(BTreeMap<String, Value>),

    /// Exact match against any of several values
    Terms(BTreeMap<String, Vec<Value>>),

    Range(BTreeMap<String, RangeParams>),

    Exists(ExistsQuery),

    /// Bool query (must, should, must_not, filter)
    Bool(BoolQuery),

    /// Query string (Lucene syntax)
    QueryString(QueryStringQuery),

    MoreLikeThis(MoreLikeThisQuery),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchAllQuery {}

/// Range bounds; an unset bound serializes as `null`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RangeParams {
    pub from: Option<Value>,
    pub to: Option<Value>,
    pub include_lower: bool,
    pub include_upper: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BoolQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must: Option<QueryList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should: Option<QueryList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_not: Option<QueryList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<QueryList>,
}

/// One clause or a list of clauses
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum QueryList {
    Single(Box<Clause>),
    Multiple(Vec<Clause>),
}

impl QueryList {
    pub fn into_vec(self) -> Vec<Clause> {
        match self {
            QueryList::Single(q) => vec![*q],
            QueryList::Multiple(v) => v,
        }
    }

    /// Append a clause, turning a single clause into a list
    pub fn push(self, clause: Clause) -> QueryList {
        let mut clauses = self.into_vec();
        clauses.push(clause);
        QueryList::Multiple(clauses)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExistsQuery {
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueryStringQuery {
    pub query: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MoreLikeThisQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlike: Option<String>,
    pub fields: Vec<String>,
    pub max_query_terms: u32,
    pub min_doc_freq: u32,
    pub min_term_freq: u32,
}

impl Clause {
    pub fn match_all() -> Self {
        Clause::MatchAll(MatchAllQuery {})
    }

    pub fn term(field: impl Into<String>, value: Value) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), value);
        Clause::Term(map)
    }

    pub fn terms(field: impl Into<String>, values: Vec<Value>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), values);
        Clause::Terms(map)
    }

    pub fn range(field: impl Into<String>, params: RangeParams) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), params);
        Clause::Range(map)
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Clause::Exists(ExistsQuery {
            field: field.into(),
        })
    }

    /// `{bool: {must_not: <clause>}}`
    pub fn must_not(clause: Clause) -> Self {
        Clause::Bool(BoolQuery {
            must_not: Some(QueryList::Single(Box::new(clause))),
            ..Default::default()
        })
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Clause::MatchAll(_))
    }
}

/// Aggregation request
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Aggregation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<TermsAggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalAggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggs: Option<BTreeMap<String, Aggregation>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TermsAggregation {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GlobalAggregation {}
