//! Search request compiler for Elasticsearch-compatible engines
//!
//! This crate translates an engine-agnostic search request into the
//! Elasticsearch Query DSL, and translates the raw engine response back into
//! a structured result set.
//!
//! # Compilers
//!
//! - [`query::FilterBuilder`] - condition trees to `bool`/`term`/`range` filters
//! - [`query::SearchParamBuilder`] - full-text keys to a `query_string` clause
//! - [`query::SortBuilder`] - sort specs, including relevance and id pseudo-fields
//! - [`query::FacetParamBuilder`] - facet specs to `terms` (and `global`) aggregations
//! - [`query::MoreLikeThisParamBuilder`] - `more_like_this` clauses
//! - [`query::QueryParamBuilder`] - composes all of the above into a [`query::WireQuery`]
//! - [`mapping::FieldMapper`] - index field schema to engine field mappings
//!
//! # Parsers
//!
//! - [`response::QueryResultParser`] - hits and aggregations to a [`response::ResultSet`]
//! - [`response::FacetResultParser`] - aggregation buckets to facet values
//!
//! Nothing here talks to the network. Execution is delegated to a
//! [`client::SearchTransport`] supplied by the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod mapping;
pub mod query;
pub mod response;
pub mod schema;

pub use client::{SearchClient, SearchTransport, TransportError};
pub use config::{Config, Settings};
pub use error::{QuarryError, Warning};
pub use hooks::Hooks;
pub use query::{QueryParamBuilder, SearchRequest, WireQuery};
pub use response::{RawResponse, ResultSet};
pub use schema::{FieldSchema, FieldType, IndexSchema};

/// Result type for quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;
