//! Engine response parsing

mod facets;
mod parser;
mod types;

pub use facets::FacetResultParser;
pub use parser::QueryResultParser;
pub use types::*;
