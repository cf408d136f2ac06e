//! Search request compilation
//!
//! Compiles engine-agnostic [`SearchRequest`]s into the engine's query DSL.

mod builder;
pub mod dsl;
mod facet;
mod filter;
mod fulltext;
mod mlt;
mod sort;
pub mod types;

pub use builder::{QueryParamBuilder, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use dsl::{Aggregation, BoolQuery, Clause, QueryList, SearchBody, SortClause, WireQuery};
pub use facet::{FacetParamBuilder, GLOBAL_SUFFIX};
pub use filter::FilterBuilder;
pub use fulltext::SearchParamBuilder;
pub use mlt::MoreLikeThisParamBuilder;
pub use sort::{SortBuilder, RELEVANCE_FIELD};
pub use types::*;
