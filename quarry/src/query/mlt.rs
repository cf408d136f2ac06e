use crate::query::dsl::{Clause, MoreLikeThisQuery};
use crate::query::types::{MoreLikeThisSpec, OneOrMany};
use crate::{QuarryError, Result};

/// Compiles a more-like-this request
pub struct MoreLikeThisParamBuilder;

impl MoreLikeThisParamBuilder {
    pub fn build(spec: &MoreLikeThisSpec) -> Result<Clause> {
        if spec.fields.is_empty() {
            return Err(QuarryError::InvalidRequest(
                "more_like_this requires at least one field".to_string(),
            ));
        }

        let ids = match &spec.id {
            Some(OneOrMany::One(id)) => Some(vec![id.clone()]),
            Some(OneOrMany::Many(ids)) => Some(ids.clone()),
            None => spec.ids.clone(),
        };

        Ok(Clause::MoreLikeThis(MoreLikeThisQuery {
            ids,
            like: spec.like.clone(),
            unlike: spec.unlike.clone(),
            fields: spec.fields.clone(),
            max_query_terms: 1,
            min_doc_freq: 1,
            min_term_freq: 1,
        }))
    }
}
