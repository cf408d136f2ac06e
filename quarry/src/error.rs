//! Error and warning types

use serde::Serialize;

/// Hard failures. Any of these aborts compilation of the whole request.
#[derive(Debug, thiserror::Error)]
pub enum QuarryError {
    #[error("Invalid field '{0}' in search filter")]
    InvalidFilterField(String),

    #[error("Unspecified filter operator for field '{0}'")]
    MissingOperator(String),

    #[error("Unsupported filter operator: {0}")]
    UnsupportedOperator(String),

    #[error("Unknown filter conjunction '{0}'. Valid values are 'AND' or 'OR'")]
    InvalidConjunction(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Error querying index {index}: {source}")]
    Transport {
        index: String,
        #[source]
        source: crate::client::TransportError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Recoverable problems. The offending sort or facet entry is dropped and
/// compilation or parsing carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("Invalid sorting field: {field}")]
    UnsupportedSortField { field: String },

    #[error("Unknown facet field '{field}' for facet '{facet}'")]
    UnknownFacetField { facet: String, field: String },

    #[error("Missing aggregation '{aggregation}' for facet '{facet}'")]
    MissingFacetAggregation { facet: String, aggregation: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QuarryError::InvalidFilterField("nope".to_string());
        assert_eq!(err.to_string(), "Invalid field 'nope' in search filter");

        let err = QuarryError::InvalidConjunction("XOR".to_string());
        assert!(err.to_string().contains("'XOR'"));
    }

    #[test]
    fn test_warning_serializes_with_kind() {
        let warning = Warning::UnknownFacetField {
            facet: "tags".to_string(),
            field: "missing".to_string(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unknown_facet_field");
        assert_eq!(json["field"], "missing");
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let source: crate::client::TransportError = "connection refused".into();
        let err = QuarryError::Transport {
            index: "dev_articles".to_string(),
            source,
        };
        assert!(err.to_string().contains("dev_articles"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
