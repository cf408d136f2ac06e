use crate::query::dsl::{Aggregation, GlobalAggregation, TermsAggregation};
use crate::query::types::{FacetOperator, FacetSpec};
use crate::schema::IndexSchema;
use crate::Warning;
use std::collections::BTreeMap;

/// Suffix of the wrapper aggregation that lifts an OR facet out of the filter scope
pub const GLOBAL_SUFFIX: &str = "_global";

/// Compiles facet requests into terms aggregations
pub struct FacetParamBuilder;

impl FacetParamBuilder {
    pub fn build(
        facets: &[FacetSpec],
        schema: &IndexSchema,
    ) -> (BTreeMap<String, Aggregation>, Vec<Warning>) {
        let mut aggs = BTreeMap::new();
        let mut warnings = Vec::new();

        for facet in facets {
            if !schema.resolves(&facet.field) {
                tracing::warn!(
                    facet = %facet.id,
                    field = %facet.field,
                    index = %schema.index,
                    "Unknown facet field"
                );
                warnings.push(Warning::UnknownFacetField {
                    facet: facet.id.clone(),
                    field: facet.field.clone(),
                });
                continue;
            }

            let terms = Aggregation {
                terms: Some(TermsAggregation {
                    field: facet.field.clone(),
                    size: (facet.limit > 0).then_some(facet.limit),
                }),
                ..Default::default()
            };

            match facet.operator {
                FacetOperator::And => {
                    aggs.insert(facet.id.clone(), terms);
                }
                FacetOperator::Or => {
                    // Counts for OR facets ignore the active filters
                    let mut inner = BTreeMap::new();
                    inner.insert(facet.id.clone(), terms);
                    aggs.insert(
                        format!("{}{}", facet.id, GLOBAL_SUFFIX),
                        Aggregation {
                            global: Some(GlobalAggregation {}),
                            aggs: Some(inner),
                            ..Default::default()
                        },
                    );
                }
            }
        }

        (aggs, warnings)
    }
}
