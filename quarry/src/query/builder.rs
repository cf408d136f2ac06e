//! Search request orchestration
//!
//! Runs every compiler over a [`SearchRequest`] and assembles the wire body.

use crate::config::Settings;
use crate::hooks::Hooks;
use crate::query::dsl::{BoolQuery, Clause, QueryList, SearchBody, SourceFilter, WireQuery};
use crate::query::facet::FacetParamBuilder;
use crate::query::filter::FilterBuilder;
use crate::query::fulltext::SearchParamBuilder;
use crate::query::mlt::MoreLikeThisParamBuilder;
use crate::query::sort::SortBuilder;
use crate::query::types::{
    Condition, ConditionGroup, ConditionMember, Conjunction, Operator, SearchRequest,
};
use crate::schema::{IndexSchema, LANGUAGE_FIELD};
use crate::Result;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Starting offset when the request does not set one
pub const DEFAULT_OFFSET: usize = 0;
/// Page size when the request does not set one
pub const DEFAULT_LIMIT: usize = 10;

pub struct QueryParamBuilder;

impl QueryParamBuilder {
    /// Compile a search request for `index`.
    ///
    /// Fails on invalid filters or an invalid more-like-this request. Sort
    /// and facet problems become warnings on the returned query.
    pub fn build(
        index: &str,
        schema: &IndexSchema,
        request: &SearchRequest,
        settings: &Settings,
        hooks: &Hooks,
    ) -> Result<WireQuery> {
        let (sort, mut warnings) = SortBuilder::build(&request.sorts, schema, request.has_keys());

        let conditions = Self::with_languages(&request.conditions, request.languages.as_deref());
        let filters = hooks.apply_filters(FilterBuilder::build(&conditions, schema)?);
        let text = hooks.apply_full_text(SearchParamBuilder::build(request, schema, settings));

        let mut query = match (text, filters) {
            (Some(text), Some(filters)) => Clause::Bool(BoolQuery {
                must: Some(QueryList::Single(Box::new(text))),
                filter: Some(QueryList::Single(Box::new(filters))),
                ..Default::default()
            }),
            (Some(text), None) => text,
            (None, Some(filters)) => Clause::Bool(BoolQuery {
                filter: Some(QueryList::Single(Box::new(filters))),
                ..Default::default()
            }),
            (None, None) => Clause::match_all(),
        };

        if let Some(mlt) = &request.more_like_this {
            query = Self::push_must(query, MoreLikeThisParamBuilder::build(mlt)?);
        }

        let aggs = if request.facets.is_empty() {
            BTreeMap::new()
        } else {
            let (aggs, facet_warnings) = FacetParamBuilder::build(&request.facets, schema);
            warnings.extend(facet_warnings);
            aggs
        };

        let source = (!request.exclude_source_fields.is_empty()).then(|| SourceFilter {
            excludes: request.exclude_source_fields.clone(),
        });

        let wire = WireQuery {
            index: index.to_string(),
            body: SearchBody {
                from: request.offset.unwrap_or(DEFAULT_OFFSET),
                size: request.limit.unwrap_or(DEFAULT_LIMIT),
                sort,
                query,
                aggs,
                source,
                track_total_hits: None,
            },
            warnings,
        };

        tracing::debug!(
            index = %index,
            from = wire.body.from,
            size = wire.body.size,
            warnings = wire.warnings.len(),
            "Compiled search request"
        );

        Ok(hooks.apply_wire_query(wire))
    }

    /// Compile a request against the settings' prefixed index, with exact
    /// hit counting enabled
    pub fn build_search(
        schema: &IndexSchema,
        request: &SearchRequest,
        settings: &Settings,
        hooks: &Hooks,
    ) -> Result<WireQuery> {
        let index = settings.index_id(&schema.index);
        let mut query = Self::build(&index, schema, request, settings, hooks)?;
        query.body.track_total_hits = Some(true);
        Ok(query)
    }

    /// Add the language restriction to the condition tree
    fn with_languages<'a>(
        conditions: &'a ConditionGroup,
        languages: Option<&[String]>,
    ) -> Cow<'a, ConditionGroup> {
        let Some(languages) = languages else {
            return Cow::Borrowed(conditions);
        };

        let values = languages.iter().cloned().map(Value::String).collect::<Vec<_>>();
        let condition = Condition::new(LANGUAGE_FIELD, Operator::In, Value::Array(values));

        if conditions.conjunction == Conjunction::And && !conditions.negated {
            let mut group = conditions.clone();
            group.members.push(ConditionMember::Condition(condition));
            Cow::Owned(group)
        } else {
            Cow::Owned(
                ConditionGroup::new(Conjunction::And)
                    .group(conditions.clone())
                    .condition(condition),
            )
        }
    }

    /// Add a clause to `bool.must`, wrapping or replacing the current query
    fn push_must(query: Clause, clause: Clause) -> Clause {
        match query {
            Clause::Bool(mut bool_query) => {
                bool_query.must = Some(match bool_query.must.take() {
                    Some(must) => must.push(clause),
                    None => QueryList::Multiple(vec![clause]),
                });
                Clause::Bool(bool_query)
            }
            Clause::MatchAll(_) => Clause::Bool(BoolQuery {
                must: Some(QueryList::Multiple(vec![clause])),
                ..Default::default()
            }),
            other => Clause::Bool(BoolQuery {
                must: Some(QueryList::Multiple(vec![other, clause])),
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::{FacetOperator, FacetSpec, MoreLikeThisSpec};
    use crate::schema::{FieldSchema, FieldType};
    use crate::Warning;
    use serde_json::json;

    fn schema() -> IndexSchema {
        IndexSchema::new(
            "articles",
            vec![
                FieldSchema::new("title", FieldType::Text).with_boost(2.0),
                FieldSchema::new("status", FieldType::Boolean),
                FieldSchema::new("type", FieldType::Token),
            ],
        )
    }

    fn build(request: &SearchRequest) -> WireQuery {
        QueryParamBuilder::build(
            "articles",
            &schema(),
            request,
            &Settings::default(),
            &Hooks::new(),
        )
        .unwrap()
    }

    fn body(request: &SearchRequest) -> Value {
        serde_json::to_value(build(request).body).unwrap()
    }

    fn status_filter() -> ConditionGroup {
        ConditionGroup::default().condition(Condition::new("status", Operator::Eq, json!(true)))
    }

    #[test]
    fn test_empty_request_matches_all() {
        assert_eq!(
            body(&SearchRequest::default()),
            json!({"from": 0, "size": 10, "query": {"match_all": {}}})
        );
    }

    #[test]
    fn test_text_and_filters_combined() {
        let request = SearchRequest {
            conditions: status_filter(),
            keys: Some("rust".into()),
            offset: Some(20),
            limit: Some(5),
            ..Default::default()
        };
        assert_eq!(
            body(&request),
            json!({
                "from": 20,
                "size": 5,
                "query": {"bool": {
                    "must": {"query_string": {"query": "rust~", "fields": ["title^2"]}},
                    "filter": {"term": {"status": true}}
                }}
            })
        );
    }

    #[test]
    fn test_filters_only() {
        let request = SearchRequest {
            conditions: status_filter(),
            ..Default::default()
        };
        assert_eq!(
            body(&request)["query"],
            json!({"bool": {"filter": {"term": {"status": true}}}})
        );
    }

    #[test]
    fn test_languages_appended_to_and_root() {
        let request = SearchRequest {
            conditions: status_filter(),
            languages: Some(vec!["en".into(), "de".into()]),
            ..Default::default()
        };
        assert_eq!(
            body(&request)["query"],
            json!({"bool": {"filter": {"bool": {"must": [
                {"term": {"status": true}},
                {"terms": {"search_api_language": ["en", "de"]}}
            ]}}}})
        );
    }

    #[test]
    fn test_languages_wrap_or_root() {
        let request = SearchRequest {
            conditions: ConditionGroup::new(Conjunction::Or)
                .condition(Condition::new("type", Operator::Eq, json!("page")))
                .condition(Condition::new("type", Operator::Eq, json!("post"))),
            languages: Some(vec!["en".into()]),
            ..Default::default()
        };
        assert_eq!(
            body(&request)["query"],
            json!({"bool": {"filter": {"bool": {"must": [
                {"bool": {"should": [
                    {"term": {"type": "page"}},
                    {"term": {"type": "post"}}
                ]}},
                {"terms": {"search_api_language": ["en"]}}
            ]}}}})
        );
    }

    #[test]
    fn test_more_like_this_replaces_match_all() {
        let request = SearchRequest {
            more_like_this: Some(MoreLikeThisSpec {
                ids: Some(vec!["1".into()]),
                fields: vec!["title".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let query = &body(&request)["query"];
        assert_eq!(query["bool"]["must"][0]["more_like_this"]["ids"], json!(["1"]));
        assert!(query["bool"].get("filter").is_none());
    }

    #[test]
    fn test_more_like_this_joins_existing_must() {
        let request = SearchRequest {
            conditions: status_filter(),
            keys: Some("rust".into()),
            more_like_this: Some(MoreLikeThisSpec {
                ids: Some(vec!["1".into()]),
                fields: vec!["title".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let query = &body(&request)["query"]["bool"];
        let must = query["must"].as_array().unwrap();
        assert_eq!(must.len(), 2);
        assert!(must[0].get("query_string").is_some());
        assert!(must[1].get("more_like_this").is_some());
        assert_eq!(query["filter"], json!({"term": {"status": true}}));
    }

    #[test]
    fn test_more_like_this_wraps_text_only_query() {
        let request = SearchRequest {
            keys: Some("rust".into()),
            more_like_this: Some(MoreLikeThisSpec {
                ids: Some(vec!["1".into()]),
                fields: vec!["title".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let must = body(&request)["query"]["bool"]["must"].clone();
        assert_eq!(must.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_facets_sorts_and_source() {
        let request = SearchRequest {
            facets: vec![
                FacetSpec::new("type", "type", FacetOperator::And),
                FacetSpec::new("color", "color", FacetOperator::Or),
            ],
            sorts: vec![crate::query::SortSpec::new("nope", Default::default())],
            exclude_source_fields: vec!["body".into()],
            ..Default::default()
        };
        let wire = build(&request);
        let value = serde_json::to_value(&wire.body).unwrap();

        assert_eq!(value["aggs"], json!({"type": {"terms": {"field": "type", "size": 10}}}));
        assert_eq!(value["_source"], json!({"excludes": ["body"]}));
        assert!(value.get("sort").is_none());
        assert_eq!(wire.warnings.len(), 2);
        assert!(matches!(wire.warnings[0], Warning::UnsupportedSortField { .. }));
        assert!(matches!(wire.warnings[1], Warning::UnknownFacetField { .. }));
    }

    #[test]
    fn test_filter_errors_abort() {
        let request = SearchRequest {
            conditions: ConditionGroup::default().condition(Condition::new("bogus", Operator::Eq, json!(1))),
            ..Default::default()
        };
        let result = QueryParamBuilder::build("a", &schema(), &request, &Settings::default(), &Hooks::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_hooks_run_in_place() {
        let hooks = Hooks::new()
            .on_filters(|_| Some(Clause::exists("type")))
            .on_full_text(|_| None)
            .on_wire_query(|mut wire| {
                wire.body.size = 99;
                wire
            });
        let request = SearchRequest {
            keys: Some("ignored".into()),
            ..Default::default()
        };
        let wire =
            QueryParamBuilder::build("a", &schema(), &request, &Settings::default(), &hooks).unwrap();
        let value = serde_json::to_value(&wire.body).unwrap();

        assert_eq!(value["size"], 99);
        assert_eq!(value["query"], json!({"bool": {"filter": {"exists": {"field": "type"}}}}));
    }

    #[test]
    fn test_build_search_prefixes_and_counts() {
        let settings = Settings::default().with_prefix("dev_");
        let wire =
            QueryParamBuilder::build_search(&schema(), &SearchRequest::default(), &settings, &Hooks::new())
                .unwrap();
        assert_eq!(wire.index, "dev_articles");
        assert_eq!(
            serde_json::to_value(&wire.body).unwrap(),
            json!({"from": 0, "size": 10, "query": {"match_all": {}}, "track_total_hits": true})
        );
    }
}
