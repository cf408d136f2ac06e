//! Index field schema

mod loader;
mod types;

pub use loader::SchemaLoader;
pub use types::*;
