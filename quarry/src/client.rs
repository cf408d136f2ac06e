//! Search execution over a pluggable transport

use crate::config::Settings;
use crate::hooks::Hooks;
use crate::mapping::{FieldMapper, MappingRequest};
use crate::query::{QueryParamBuilder, SearchRequest, WireQuery};
use crate::response::{QueryResultParser, RawResponse, ResultSet};
use crate::schema::IndexSchema;
use crate::{QuarryError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Error returned by a transport
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Sends a compiled query to the engine.
///
/// Implementations own connection handling; the client never retries.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn search(&self, query: &WireQuery) -> std::result::Result<RawResponse, TransportError>;
}

/// Compiles, executes and parses searches against one backend
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn SearchTransport>,
    settings: Settings,
    hooks: Hooks,
}

impl SearchClient {
    pub fn new(transport: Arc<dyn SearchTransport>, settings: Settings) -> Self {
        Self {
            transport,
            settings,
            hooks: Hooks::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Engine index name for a schema
    pub fn index_id(&self, schema: &IndexSchema) -> String {
        self.settings.index_id(&schema.index)
    }

    /// Compile a request with exact hit counting enabled
    pub fn build_query(&self, schema: &IndexSchema, request: &SearchRequest) -> Result<WireQuery> {
        QueryParamBuilder::build_search(schema, request, &self.settings, &self.hooks)
    }

    pub fn mapping(&self, schema: &IndexSchema) -> MappingRequest {
        FieldMapper::map_field_params(&self.index_id(schema), schema, &self.hooks)
    }

    /// Run a search and parse the response.
    ///
    /// Compile warnings come first in the result's warnings, followed by any
    /// raised while parsing.
    pub async fn search(&self, schema: &IndexSchema, request: &SearchRequest) -> Result<ResultSet> {
        let query = self.build_query(schema, request)?;

        let start = Instant::now();
        let response = self.transport.search(&query).await.map_err(|source| {
            tracing::error!(index = %query.index, error = %source, "Search request failed");
            QuarryError::Transport {
                index: query.index.clone(),
                source,
            }
        })?;
        tracing::debug!(
            index = %query.index,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search executed"
        );

        let mut results = QueryResultParser::parse(request, response);
        let mut warnings = query.warnings;
        warnings.append(&mut results.warnings);
        results.warnings = warnings;
        Ok(results)
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("settings", &self.settings)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
