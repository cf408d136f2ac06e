//! Full-text keys to query-string compiler

use crate::config::Settings;
use crate::query::dsl::{Clause, QueryStringQuery};
use crate::query::types::{Conjunction, KeyNode, SearchRequest};
use crate::schema::IndexSchema;

/// Characters with a meaning in query-string syntax
const RESERVED_CHARS: &str = "+-&|!(){}[]^\"~*?:\\/";

/// Words the query-string parser reads as operators
const OPERATOR_WORDS: [&str; 3] = ["AND", "OR", "NOT"];

/// Compiles full-text keys into a `query_string` clause
pub struct SearchParamBuilder;

impl SearchParamBuilder {
    /// Compile the request's keys, or `None` when there is nothing to search for
    pub fn build(
        request: &SearchRequest,
        schema: &IndexSchema,
        settings: &Settings,
    ) -> Option<Clause> {
        let keys = request.keys.as_ref()?;
        let query = Self::build_search_string(keys, settings.fuzziness());
        if query.is_empty() {
            return None;
        }

        let fields = Self::query_fields(schema, request.fulltext_fields.as_deref());
        tracing::debug!(query = %query, fields = ?fields, "Compiled full-text keys");

        Some(Clause::QueryString(QueryStringQuery { query, fields }))
    }

    /// Boosted full-text fields to search, in index order.
    ///
    /// With a non-empty `requested` list only those fields are kept.
    pub fn query_fields(schema: &IndexSchema, requested: Option<&[String]>) -> Vec<String> {
        schema
            .fulltext_fields()
            .filter(|field| {
                requested.map_or(true, |r| r.is_empty() || r.iter().any(|id| *id == field.id))
            })
            .map(|field| format!("{}^{}", field.id, field.boost))
            .collect()
    }

    /// Render a keys tree as a query string (empty when nothing compiles)
    pub fn build_search_string(keys: &KeyNode, fuzziness: Option<&str>) -> String {
        Self::compile_node(keys, fuzziness, false).unwrap_or_default()
    }

    fn compile_node(node: &KeyNode, fuzziness: Option<&str>, negated: bool) -> Option<String> {
        match node {
            KeyNode::Term(term) => Self::compile_term(term, false, fuzziness, negated),
            KeyNode::Keyword(keyword) => {
                Self::compile_term(&keyword.value, keyword.negation, fuzziness, negated)
            }
            KeyNode::List(keys) => {
                Self::compile_group(keys, Conjunction::Or, false, fuzziness, negated)
            }
            KeyNode::Group(group) => Self::compile_group(
                &group.keys,
                group.conjunction.unwrap_or(Conjunction::Or),
                group.negation,
                fuzziness,
                negated,
            ),
        }
    }

    fn compile_group(
        keys: &[KeyNode],
        conjunction: Conjunction,
        negation: bool,
        fuzziness: Option<&str>,
        inherited_negation: bool,
    ) -> Option<String> {
        let under_negation = inherited_negation || negation;
        let mut parts: Vec<String> = keys
            .iter()
            .filter_map(|key| Self::compile_node(key, fuzziness, under_negation))
            .collect();

        let compiled = match parts.len() {
            0 => return None,
            1 => {
                let only = parts.pop()?;
                // A negated lone child under a negated group cancels out.
                // Only negation produces a leading '-'; escaped dashes are `\-`.
                if negation {
                    if let Some(included) = only.strip_prefix('-') {
                        return Some(included.to_string());
                    }
                }
                only
            }
            _ => format!("({})", parts.join(&format!(" {} ", conjunction))),
        };

        Some(if negation {
            format!("-{}", compiled)
        } else {
            compiled
        })
    }

    fn compile_term(
        term: &str,
        negation: bool,
        fuzziness: Option<&str>,
        inherited_negation: bool,
    ) -> Option<String> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let mut out = if term.contains(char::is_whitespace) || OPERATOR_WORDS.contains(&term) {
            format!("\"{}\"", escape_phrase(term))
        } else {
            escape_term(term)
        };

        // Fuzzy matching makes no sense on excluded terms
        if !(negation || inherited_negation) {
            if let Some(fuzziness) = fuzziness {
                out.push_str(&fuzzy_suffix(fuzziness));
            }
        }

        if negation {
            out.insert(0, '-');
        }
        Some(out)
    }
}

fn fuzzy_suffix(fuzziness: &str) -> String {
    if fuzziness.parse::<u32>().is_ok() {
        format!("~{}", fuzziness)
    } else {
        "~".to_string()
    }
}

/// Escape a phrase body: backslashes, quotes and word-leading dashes
fn escape_phrase(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '-' if prev.map_or(true, char::is_whitespace) => out.push_str("\\-"),
            _ => out.push(c),
        }
        prev = Some(c);
    }
    out
}

fn escape_term(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if RESERVED_CHARS.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
