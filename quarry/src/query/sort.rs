use crate::query::dsl::SortClause;
use crate::query::types::SortSpec;
use crate::schema::{IndexSchema, ITEM_ID_FIELD};
use crate::Warning;

/// Relevance pseudo-field and its short alias
pub const RELEVANCE_FIELD: &str = "search_api_relevance";
const RELEVANCE_ALIAS: &str = "relevance";

/// Short alias for the item id pseudo-field
const ITEM_ID_ALIAS: &str = "id";

/// Engine document id and its alias
const ENGINE_ID_FIELD: &str = "_id";
const ENGINE_ID_ALIAS: &str = "engine_id";

pub struct SortBuilder;

impl SortBuilder {
    /// Compile sort specs in order.
    ///
    /// Unknown fields are dropped and reported as warnings. Relevance sorting
    /// is only emitted when the request searches for something.
    pub fn build(
        sorts: &[SortSpec],
        schema: &IndexSchema,
        has_keys: bool,
    ) -> (Vec<SortClause>, Vec<Warning>) {
        let mut clauses = Vec::with_capacity(sorts.len());
        let mut warnings = Vec::new();

        for sort in sorts {
            let field = sort.field.as_str();
            let target = match field {
                RELEVANCE_FIELD | RELEVANCE_ALIAS => has_keys.then(|| "_score".to_string()),
                ITEM_ID_FIELD | ITEM_ID_ALIAS => Some("id".to_string()),
                ENGINE_ID_FIELD | ENGINE_ID_ALIAS => Some(ENGINE_ID_FIELD.to_string()),
                _ if schema.is_fulltext(field) => Some(format!("{}.keyword", field)),
                _ if schema.resolves(field) => Some(field.to_string()),
                _ => {
                    tracing::warn!(field = %field, index = %schema.index, "Dropping sort on unknown field");
                    warnings.push(Warning::UnsupportedSortField {
                        field: field.to_string(),
                    });
                    None
                }
            };

            if let Some(target) = target {
                clauses.push(SortClause::new(target, sort.direction));
            }
        }

        (clauses, warnings)
    }
}
