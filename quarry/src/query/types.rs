//! Engine-agnostic search request types
//!
//! These are what callers build (or deserialize from JSON) and hand to
//! [`QueryParamBuilder`](super::QueryParamBuilder).

use crate::QuarryError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Default number of buckets requested per facet
pub const DEFAULT_FACET_LIMIT: usize = 10;

/// A complete search request
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchRequest {
    /// Filter conditions
    #[serde(default)]
    pub conditions: ConditionGroup,

    /// Full-text keys
    #[serde(default)]
    pub keys: Option<KeyNode>,

    /// Restrict full-text search to these fields (default: all full-text fields)
    #[serde(default)]
    pub fulltext_fields: Option<Vec<String>>,

    /// Sort order, applied in sequence
    #[serde(default)]
    pub sorts: Vec<SortSpec>,

    /// Starting offset (default 0)
    #[serde(default)]
    pub offset: Option<usize>,

    /// Maximum number of results (default 10)
    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub facets: Vec<FacetSpec>,

    #[serde(default)]
    pub more_like_this: Option<MoreLikeThisSpec>,

    /// Source fields to leave out of returned hits
    #[serde(default)]
    pub exclude_source_fields: Vec<String>,

    /// Restrict results to these languages
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

impl SearchRequest {
    /// True when the request carries at least one non-blank full-text term
    pub fn has_keys(&self) -> bool {
        self.keys.as_ref().is_some_and(|k| !k.is_empty())
    }
}

/// How the members of a group combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

impl FromStr for Conjunction {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Conjunction::And),
            "OR" => Ok(Conjunction::Or),
            _ => Err(QuarryError::InvalidConjunction(s.to_string())),
        }
    }
}

impl TryFrom<String> for Conjunction {
    type Error = QuarryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Conjunction> for String {
    fn from(c: Conjunction) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===================================================================
// Filter conditions
// ===================================================================

/// Boolean combination of conditions and nested groups
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionGroup {
    #[serde(default)]
    pub conjunction: Conjunction,
    #[serde(default, alias = "negation")]
    pub negated: bool,
    #[serde(default, alias = "conditions")]
    pub members: Vec<ConditionMember>,
}

/// A condition (an object with a `field`) or a nested group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConditionMember {
    Condition(Condition),
    Group(ConditionGroup),
}

impl<'de> Deserialize<'de> for ConditionMember {
    // Dispatch on `field` so errors inside nested members surface as-is
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let is_condition = map.contains_key("field");
        let value = Value::Object(map);

        let member = if is_condition {
            serde_json::from_value(value).map(ConditionMember::Condition)
        } else {
            serde_json::from_value(value).map(ConditionMember::Group)
        };
        member.map_err(de::Error::custom)
    }
}

/// A single field comparison
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Condition {
    pub field: String,
    #[serde(default)]
    pub operator: Option<Operator>,
    /// Scalar, list (`IN`), pair (`BETWEEN`) or null ("is empty" checks)
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Eq,
    NotEq,
    In,
    NotIn,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    NotBetween,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
        }
    }
}

impl FromStr for Operator {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" | "==" => Ok(Operator::Eq),
            "<>" | "!=" => Ok(Operator::NotEq),
            "IN" => Ok(Operator::In),
            "NOT IN" => Ok(Operator::NotIn),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            "BETWEEN" => Ok(Operator::Between),
            "NOT BETWEEN" => Ok(Operator::NotBetween),
            _ => Err(QuarryError::UnsupportedOperator(format!("'{}'", s))),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = QuarryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator),
            value: value.into(),
        }
    }
}

impl ConditionGroup {
    pub fn new(conjunction: Conjunction) -> Self {
        Self {
            conjunction,
            ..Default::default()
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.members.push(ConditionMember::Condition(condition));
        self
    }

    pub fn group(mut self, group: ConditionGroup) -> Self {
        self.members.push(ConditionMember::Group(group));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ===================================================================
// Full-text keys
// ===================================================================

/// A node of the full-text keys tree.
///
/// Accepts a bare string, a list (OR-combined), a `{value, negation}` term
/// or a `{conjunction, negation, keys}` group.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum KeyNode {
    Term(String),
    List(Vec<KeyNode>),
    Keyword(Keyword),
    Group(KeyGroup),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Keyword {
    pub value: String,
    #[serde(default, alias = "negated")]
    pub negation: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyGroup {
    /// Defaults to OR
    #[serde(default)]
    pub conjunction: Option<Conjunction>,
    #[serde(default, alias = "negated")]
    pub negation: bool,
    #[serde(alias = "children")]
    pub keys: Vec<KeyNode>,
}

impl KeyNode {
    pub fn term(value: impl Into<String>) -> Self {
        KeyNode::Term(value.into())
    }

    pub fn negated(value: impl Into<String>) -> Self {
        KeyNode::Keyword(Keyword {
            value: value.into(),
            negation: true,
        })
    }

    pub fn group(conjunction: Conjunction, keys: Vec<KeyNode>) -> Self {
        KeyNode::Group(KeyGroup {
            conjunction: Some(conjunction),
            negation: false,
            keys,
        })
    }

    /// True when no term in the tree has visible content
    pub fn is_empty(&self) -> bool {
        match self {
            KeyNode::Term(t) => t.trim().is_empty(),
            KeyNode::Keyword(k) => k.value.trim().is_empty(),
            KeyNode::List(keys) => keys.iter().all(KeyNode::is_empty),
            KeyNode::Group(g) => g.keys.iter().all(KeyNode::is_empty),
        }
    }
}

impl From<&str> for KeyNode {
    fn from(value: &str) -> Self {
        KeyNode::term(value)
    }
}

// ===================================================================
// Sorts, facets, more-like-this
// ===================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = QuarryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(QuarryError::InvalidRequest(format!(
                "Invalid sort direction '{}'",
                s
            ))),
        }
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// How selected values of one facet combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetOperator {
    #[default]
    #[serde(alias = "AND")]
    And,
    #[serde(alias = "OR")]
    Or,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FacetSpec {
    pub id: String,
    pub field: String,
    #[serde(default)]
    pub operator: FacetOperator,
    /// Maximum buckets to return, 0 = engine default
    #[serde(default = "default_facet_limit")]
    pub limit: usize,
}

fn default_facet_limit() -> usize {
    DEFAULT_FACET_LIMIT
}

impl FacetSpec {
    pub fn new(id: impl Into<String>, field: impl Into<String>, operator: FacetOperator) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            operator,
            limit: DEFAULT_FACET_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MoreLikeThisSpec {
    /// Single id or list of ids; takes precedence over `ids`
    #[serde(default)]
    pub id: Option<OneOrMany>,
    #[serde(default)]
    pub ids: Option<Vec<String>>,
    #[serde(default)]
    pub like: Option<String>,
    #[serde(default)]
    pub unlike: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}
