//! Extension points
//!
//! Each hook is a plain function run exactly once at a fixed point of
//! compilation. Unset hooks pass their input through unchanged.

use crate::mapping::FieldMapping;
use crate::query::{Clause, WireQuery};
use crate::schema::FieldSchema;
use std::fmt;
use std::sync::Arc;

pub type ClauseHook = Arc<dyn Fn(Option<Clause>) -> Option<Clause> + Send + Sync>;
pub type FieldMappingHook = Arc<dyn Fn(&FieldSchema, FieldMapping) -> FieldMapping + Send + Sync>;
pub type WireQueryHook = Arc<dyn Fn(WireQuery) -> WireQuery + Send + Sync>;

#[derive(Clone, Default)]
pub struct Hooks {
    filters: Option<ClauseHook>,
    full_text: Option<ClauseHook>,
    field_mapping: Option<FieldMappingHook>,
    wire_query: Option<WireQueryHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs after the condition tree is compiled
    pub fn on_filters<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<Clause>) -> Option<Clause> + Send + Sync + 'static,
    {
        self.filters = Some(Arc::new(hook));
        self
    }

    /// Runs after the full-text keys are compiled
    pub fn on_full_text<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<Clause>) -> Option<Clause> + Send + Sync + 'static,
    {
        self.full_text = Some(Arc::new(hook));
        self
    }

    /// Runs once per mapped field
    pub fn on_field_mapping<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FieldSchema, FieldMapping) -> FieldMapping + Send + Sync + 'static,
    {
        self.field_mapping = Some(Arc::new(hook));
        self
    }

    /// Runs on the finished wire query
    pub fn on_wire_query<F>(mut self, hook: F) -> Self
    where
        F: Fn(WireQuery) -> WireQuery + Send + Sync + 'static,
    {
        self.wire_query = Some(Arc::new(hook));
        self
    }

    pub(crate) fn apply_filters(&self, clause: Option<Clause>) -> Option<Clause> {
        match &self.filters {
            Some(hook) => hook(clause),
            None => clause,
        }
    }

    pub(crate) fn apply_full_text(&self, clause: Option<Clause>) -> Option<Clause> {
        match &self.full_text {
            Some(hook) => hook(clause),
            None => clause,
        }
    }

    pub(crate) fn apply_field_mapping(&self, field: &FieldSchema, mapping: FieldMapping) -> FieldMapping {
        match &self.field_mapping {
            Some(hook) => hook(field, mapping),
            None => mapping,
        }
    }

    pub(crate) fn apply_wire_query(&self, query: WireQuery) -> WireQuery {
        match &self.wire_query {
            Some(hook) => hook(query),
            None => query,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("filters", &self.filters.is_some())
            .field("full_text", &self.full_text.is_some())
            .field("field_mapping", &self.field_mapping.is_some())
            .field("wire_query", &self.wire_query.is_some())
            .finish()
    }
}
