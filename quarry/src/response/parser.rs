use crate::query::SearchRequest;
use crate::response::facets::FacetResultParser;
use crate::response::types::{Hit, RawResponse, ResultItem, ResultSet};
use crate::schema::DATASOURCE_FIELD;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parses a raw engine response into a [`ResultSet`]
pub struct QueryResultParser;

impl QueryResultParser {
    pub fn parse(request: &SearchRequest, response: RawResponse) -> ResultSet {
        let total = response.hits.total.value();
        let items: Vec<ResultItem> = response.hits.hits.into_iter().map(Self::parse_hit).collect();

        let (facets, warnings) = match &response.aggregations {
            Some(aggregations) if !aggregations.is_empty() && !request.facets.is_empty() => {
                FacetResultParser::parse(&request.facets, aggregations)
            }
            _ => Default::default(),
        };

        tracing::debug!(
            total,
            items = items.len(),
            facets = facets.len(),
            took_ms = ?response.took,
            "Parsed search response"
        );

        ResultSet {
            total,
            items,
            facets,
            warnings,
        }
    }

    fn parse_hit(hit: Hit) -> ResultItem {
        let datasource_id = hit
            .source
            .get(DATASOURCE_FIELD)
            .and_then(first_string)
            .or_else(|| hit.id.split_once('/').map(|(prefix, _)| prefix.to_string()));

        let fields = hit
            .source
            .into_iter()
            .map(|(name, value)| (name, into_list(value)))
            .collect::<BTreeMap<_, _>>();

        ResultItem {
            id: hit.id,
            score: hit.score,
            datasource_id,
            fields,
        }
    }
}

fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(values) => values,
        other => vec![other],
    }
}

fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(values) => values.first().and_then(first_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FacetOperator, FacetSpec};
    use serde_json::json;

    fn response(value: Value) -> RawResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_hits() {
        let raw = response(json!({
            "took": 3,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "max_score": 1.5,
                "hits": [
                    {
                        "_id": "entity:node/1:en",
                        "_score": 1.5,
                        "_source": {"title": "Hello", "tags": ["a", "b"], "empty": null}
                    },
                    {
                        "_id": "plain",
                        "_score": null,
                        "_source": {"search_api_datasource": ["entity:user"]}
                    }
                ]
            }
        }));

        let results = QueryResultParser::parse(&SearchRequest::default(), raw);
        assert_eq!(results.total, 2);
        assert_eq!(results.items.len(), 2);

        let first = &results.items[0];
        assert_eq!(first.id, "entity:node/1:en");
        assert_eq!(first.score, Some(1.5));
        assert_eq!(first.datasource_id.as_deref(), Some("entity:node"));
        assert_eq!(first.fields["title"], vec![json!("Hello")]);
        assert_eq!(first.fields["tags"], vec![json!("a"), json!("b")]);
        assert!(first.fields["empty"].is_empty());

        let second = &results.items[1];
        assert_eq!(second.score, None);
        assert_eq!(second.datasource_id.as_deref(), Some("entity:user"));
    }

    #[test]
    fn test_legacy_total_and_missing_id_prefix() {
        let raw = response(json!({
            "hits": {"total": 7, "hits": [{"_id": "abc", "_source": {}}]}
        }));
        let results = QueryResultParser::parse(&SearchRequest::default(), raw);
        assert_eq!(results.total, 7);
        assert_eq!(results.items[0].datasource_id, None);
        assert!(results.facets.is_empty());
    }

    #[test]
    fn test_facets_parsed_when_requested() {
        let request = SearchRequest {
            facets: vec![FacetSpec::new("type", "type", FacetOperator::And)],
            ..Default::default()
        };
        let raw = response(json!({
            "hits": {"total": 0, "hits": []},
            "aggregations": {"type": {"buckets": [{"key": "page", "doc_count": 2}]}}
        }));

        let results = QueryResultParser::parse(&request, raw);
        assert_eq!(results.facets["type"][0].count, 2);
        assert!(results.warnings.is_empty());
    }

    #[test]
    fn test_empty_response() {
        let results = QueryResultParser::parse(&SearchRequest::default(), response(json!({})));
        assert_eq!(results, ResultSet::default());
    }
}
