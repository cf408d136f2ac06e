//! Condition tree to filter clause compiler

use crate::query::dsl::{BoolQuery, Clause, QueryList, RangeParams};
use crate::query::types::{Condition, ConditionGroup, ConditionMember, Conjunction, Operator};
use crate::schema::{FieldType, IndexSchema};
use crate::{QuarryError, Result};
use serde_json::Value;

/// Compiles condition groups into filter clauses
pub struct FilterBuilder;

impl FilterBuilder {
    /// Compile a condition group.
    ///
    /// Returns `None` when nothing in the group produces a clause.
    pub fn build(group: &ConditionGroup, schema: &IndexSchema) -> Result<Option<Clause>> {
        let mut clauses = group
            .members
            .iter()
            .map(|member| match member {
                ConditionMember::Condition(condition) => {
                    Self::build_condition(condition, schema).map(Some)
                }
                ConditionMember::Group(nested) => Self::build(nested, schema),
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let combined = match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(Self::combine(clauses, group.conjunction)),
        };

        tracing::debug!(
            conjunction = %group.conjunction,
            negated = group.negated,
            members = group.members.len(),
            compiled = combined.is_some(),
            "Compiled condition group"
        );

        Ok(combined.map(|clause| {
            if group.negated {
                Clause::must_not(clause)
            } else {
                clause
            }
        }))
    }

    fn combine(clauses: Vec<Clause>, conjunction: Conjunction) -> Clause {
        let list = Some(QueryList::Multiple(clauses));
        let query = match conjunction {
            Conjunction::And => BoolQuery {
                must: list,
                ..Default::default()
            },
            Conjunction::Or => BoolQuery {
                should: list,
                ..Default::default()
            },
        };
        Clause::Bool(query)
    }

    fn build_condition(condition: &Condition, schema: &IndexSchema) -> Result<Clause> {
        let field = condition.field.as_str();
        if field.is_empty() || !schema.resolves(field) {
            return Err(QuarryError::InvalidFilterField(field.to_string()));
        }

        let operator = condition
            .operator
            .ok_or_else(|| QuarryError::MissingOperator(field.to_string()))?;

        let is_boolean = schema
            .field(field)
            .is_some_and(|f| f.field_type == FieldType::Boolean);

        if is_boolean {
            Self::build_filter_term(field, operator, &coerce_bool(&condition.value))
        } else {
            Self::build_filter_term(field, operator, &condition.value)
        }
    }

    /// Compile a single `field operator value` comparison
    pub fn build_filter_term(field: &str, operator: Operator, value: &Value) -> Result<Clause> {
        if value.is_null() {
            return match operator {
                Operator::NotEq => Ok(Clause::exists(field)),
                Operator::Eq => Ok(Clause::must_not(Clause::exists(field))),
                other => Err(QuarryError::UnsupportedOperator(format!(
                    "'{}' with an empty value on field '{}'",
                    other, field
                ))),
            };
        }

        let clause = match operator {
            Operator::Eq => Clause::term(field, value.clone()),
            Operator::NotEq => Clause::must_not(Clause::term(field, value.clone())),
            Operator::In => Clause::terms(field, as_list(value)),
            Operator::NotIn => Clause::must_not(Clause::terms(field, as_list(value))),
            Operator::Gt => Clause::range(
                field,
                RangeParams {
                    from: Some(value.clone()),
                    ..Default::default()
                },
            ),
            Operator::Gte => Clause::range(
                field,
                RangeParams {
                    from: Some(value.clone()),
                    include_lower: true,
                    ..Default::default()
                },
            ),
            Operator::Lt => Clause::range(
                field,
                RangeParams {
                    to: Some(value.clone()),
                    ..Default::default()
                },
            ),
            Operator::Lte => Clause::range(
                field,
                RangeParams {
                    to: Some(value.clone()),
                    include_upper: true,
                    ..Default::default()
                },
            ),
            Operator::Between => Self::between(field, value)?,
            Operator::NotBetween => Clause::must_not(Self::between(field, value)?),
        };
        Ok(clause)
    }

    fn between(field: &str, value: &Value) -> Result<Clause> {
        let bounds = value.as_array().ok_or_else(|| {
            QuarryError::InvalidRequest(format!(
                "BETWEEN on field '{}' expects a two-element value, got {}",
                field, value
            ))
        })?;

        // Only a missing or null element leaves that side open; 0 is a bound.
        let bound = |i: usize| bounds.get(i).filter(|v| !v.is_null()).cloned();

        Ok(Clause::range(
            field,
            RangeParams {
                from: bound(0),
                to: bound(1),
                include_lower: false,
                include_upper: false,
            },
        ))
    }
}

fn as_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values.clone(),
        other => vec![other.clone()],
    }
}

/// Coerce a value to booleans for a boolean field.
///
/// Null stays null so "is empty" checks keep working.
fn coerce_bool(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Array(values) => Value::Array(
            values
                .iter()
                .map(|v| Value::Bool(truthy(v)))
                .collect(),
        ),
        other => Value::Bool(truthy(other)),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;
    use serde_json::json;

    fn schema() -> IndexSchema {
        IndexSchema::new(
            "articles",
            vec![
                FieldSchema::new("title", FieldType::Text),
                FieldSchema::new("tags", FieldType::Token),
                FieldSchema::new("price", FieldType::Decimal),
                FieldSchema::new("published", FieldType::Boolean),
            ],
        )
    }

    fn compile(group: &ConditionGroup) -> Value {
        let clause = FilterBuilder::build(group, &schema()).unwrap();
        serde_json::to_value(clause).unwrap()
    }

    fn single(field: &str, op: Operator, value: Value) -> Value {
        compile(&ConditionGroup::default().condition(Condition::new(field, op, value)))
    }

    #[test]
    fn test_empty_group_is_absent() {
        assert_eq!(compile(&ConditionGroup::default()), Value::Null);
    }

    #[test]
    fn test_single_condition_is_not_wrapped() {
        assert_eq!(
            single("tags", Operator::Eq, json!("rust")),
            json!({"term": {"tags": "rust"}})
        );
    }

    #[test]
    fn test_not_equal() {
        assert_eq!(
            single("tags", Operator::NotEq, json!("rust")),
            json!({"bool": {"must_not": {"term": {"tags": "rust"}}}})
        );
    }

    #[test]
    fn test_null_value_existence_checks() {
        assert_eq!(
            single("title", Operator::NotEq, Value::Null),
            json!({"exists": {"field": "title"}})
        );
        assert_eq!(
            single("title", Operator::Eq, Value::Null),
            json!({"bool": {"must_not": {"exists": {"field": "title"}}}})
        );

        let group = ConditionGroup::default().condition(Condition::new("price", Operator::Gt, Value::Null));
        let err = FilterBuilder::build(&group, &schema()).unwrap_err();
        assert!(matches!(err, QuarryError::UnsupportedOperator(_)));
    }

    #[test]
    fn test_in_wraps_scalar() {
        assert_eq!(
            single("tags", Operator::In, json!("a")),
            json!({"terms": {"tags": ["a"]}})
        );
        assert_eq!(
            single("tags", Operator::NotIn, json!(["a", "b"])),
            json!({"bool": {"must_not": {"terms": {"tags": ["a", "b"]}}}})
        );
    }

    #[test]
    fn test_comparison_ranges() {
        assert_eq!(
            single("price", Operator::Gt, json!(5)),
            json!({"range": {"price": {"from": 5, "to": null, "include_lower": false, "include_upper": false}}})
        );
        assert_eq!(
            single("price", Operator::Gte, json!(5)),
            json!({"range": {"price": {"from": 5, "to": null, "include_lower": true, "include_upper": false}}})
        );
        assert_eq!(
            single("price", Operator::Lt, json!(5)),
            json!({"range": {"price": {"from": null, "to": 5, "include_lower": false, "include_upper": false}}})
        );
        assert_eq!(
            single("price", Operator::Lte, json!(5)),
            json!({"range": {"price": {"from": null, "to": 5, "include_lower": false, "include_upper": true}}})
        );
    }

    #[test]
    fn test_between_treats_zero_as_bound() {
        assert_eq!(
            single("price", Operator::Between, json!([0, 100])),
            json!({"range": {"price": {"from": 0, "to": 100, "include_lower": false, "include_upper": false}}})
        );
        assert_eq!(
            single("price", Operator::Between, json!([null, 100])),
            json!({"range": {"price": {"from": null, "to": 100, "include_lower": false, "include_upper": false}}})
        );
        assert_eq!(
            single("price", Operator::NotBetween, json!([1])),
            json!({"bool": {"must_not": {"range": {"price": {"from": 1, "to": null, "include_lower": false, "include_upper": false}}}}})
        );
    }

    #[test]
    fn test_between_requires_pair() {
        let group = ConditionGroup::default().condition(Condition::new("price", Operator::Between, json!(3)));
        let err = FilterBuilder::build(&group, &schema()).unwrap_err();
        assert!(matches!(err, QuarryError::InvalidRequest(_)));
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(
            single("published", Operator::Eq, json!("0")),
            json!({"term": {"published": false}})
        );
        assert_eq!(
            single("published", Operator::Eq, json!(1)),
            json!({"term": {"published": true}})
        );
        assert_eq!(
            single("published", Operator::In, json!(["", "yes", 0])),
            json!({"terms": {"published": [false, true, false]}})
        );
    }

    #[test]
    fn test_conjunctions() {
        let and = ConditionGroup::new(Conjunction::And)
            .condition(Condition::new("tags", Operator::Eq, json!("a")))
            .condition(Condition::new("tags", Operator::Eq, json!("b")));
        assert_eq!(
            compile(&and),
            json!({"bool": {"must": [{"term": {"tags": "a"}}, {"term": {"tags": "b"}}]}})
        );

        let or = ConditionGroup::new(Conjunction::Or)
            .condition(Condition::new("tags", Operator::Eq, json!("a")))
            .condition(Condition::new("tags", Operator::Eq, json!("b")));
        assert_eq!(
            compile(&or),
            json!({"bool": {"should": [{"term": {"tags": "a"}}, {"term": {"tags": "b"}}]}})
        );
    }

    #[test]
    fn test_nested_and_negated_groups() {
        let group = ConditionGroup::new(Conjunction::And)
            .condition(Condition::new("tags", Operator::Eq, json!("a")))
            .group(ConditionGroup::new(Conjunction::And))
            .group(
                ConditionGroup::new(Conjunction::Or)
                    .negate()
                    .condition(Condition::new("price", Operator::Lt, json!(1)))
                    .condition(Condition::new("search_api_language", Operator::Eq, json!("en"))),
            );

        assert_eq!(
            compile(&group),
            json!({"bool": {"must": [
                {"term": {"tags": "a"}},
                {"bool": {"must_not": {"bool": {"should": [
                    {"range": {"price": {"from": null, "to": 1, "include_lower": false, "include_upper": false}}},
                    {"term": {"search_api_language": "en"}}
                ]}}}}
            ]}})
        );
    }

    #[test]
    fn test_unknown_field_and_missing_operator() {
        let group = ConditionGroup::default().condition(Condition::new("nope", Operator::Eq, json!(1)));
        let err = FilterBuilder::build(&group, &schema()).unwrap_err();
        assert!(matches!(err, QuarryError::InvalidFilterField(f) if f == "nope"));

        let mut condition = Condition::new("tags", Operator::Eq, json!(1));
        condition.operator = None;
        let group = ConditionGroup::default().condition(condition);
        let err = FilterBuilder::build(&group, &schema()).unwrap_err();
        assert!(matches!(err, QuarryError::MissingOperator(f) if f == "tags"));
    }
}
