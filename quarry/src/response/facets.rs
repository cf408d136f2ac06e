use crate::query::{FacetOperator, FacetSpec, GLOBAL_SUFFIX};
use crate::response::types::{Bucket, FacetValue};
use crate::Warning;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Turns aggregation buckets back into facet values
pub struct FacetResultParser;

impl FacetResultParser {
    pub fn parse(
        facets: &[FacetSpec],
        aggregations: &Map<String, Value>,
    ) -> (BTreeMap<String, Vec<FacetValue>>, Vec<Warning>) {
        let mut parsed = BTreeMap::new();
        let mut warnings = Vec::new();

        for facet in facets {
            let (name, aggregation) = match facet.operator {
                FacetOperator::And => (facet.id.clone(), aggregations.get(&facet.id)),
                FacetOperator::Or => {
                    let global = format!("{}{}", facet.id, GLOBAL_SUFFIX);
                    let inner = aggregations.get(&global).and_then(|g| g.get(&facet.id));
                    (format!("{}.{}", global, facet.id), inner)
                }
            };

            let buckets = aggregation
                .and_then(|agg| agg.get("buckets"))
                .and_then(|b| Vec::<Bucket>::deserialize(b).ok());

            match buckets {
                Some(buckets) => {
                    let values = buckets
                        .into_iter()
                        .map(|bucket| FacetValue {
                            count: bucket.doc_count,
                            filter_value: filter_value(&bucket.key),
                        })
                        .collect();
                    parsed.insert(facet.id.clone(), values);
                }
                None => {
                    tracing::warn!(facet = %facet.id, aggregation = %name, "Missing facet aggregation");
                    warnings.push(Warning::MissingFacetAggregation {
                        facet: facet.id.clone(),
                        aggregation: name,
                    });
                }
            }
        }

        (parsed, warnings)
    }
}

fn filter_value(key: &Value) -> String {
    match key {
        Value::String(s) => format!("\"{}\"", s),
        other => format!("\"{}\"", other),
    }
}
