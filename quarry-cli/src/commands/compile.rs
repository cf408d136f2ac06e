use super::{read_input, to_json};
use anyhow::{Context, Result};
use quarry::schema::SchemaLoader;
use quarry::{Config, Hooks, QueryParamBuilder, SearchRequest};
use std::path::Path;

/// Compile a search request against a schema and print the wire query
pub fn run_compile(config: &Config, schema_path: &Path, request: &str, pretty: bool) -> Result<()> {
    let output = compile(config, schema_path, &read_input(request)?, pretty)?;
    println!("{}", output);
    Ok(())
}

fn compile(config: &Config, schema_path: &Path, request_json: &str, pretty: bool) -> Result<String> {
    let schema = SchemaLoader::load_schema(schema_path)
        .with_context(|| format!("Failed to load schema {:?}", schema_path))?;
    let request: SearchRequest =
        serde_json::from_str(request_json).context("Invalid search request")?;

    let query = QueryParamBuilder::build_search(&schema, &request, &config.backend, &Hooks::new())?;

    for warning in &query.warnings {
        tracing::warn!("{}", warning);
    }

    to_json(&query, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_compile_prefixes_index() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("articles.yaml");
        std::fs::write(&schema, "index: articles\nfields:\n  - id: title\n    type: text\n").unwrap();

        let mut config = Config::default();
        config.backend.prefix = "dev_".to_string();

        let output = compile(&config, &schema, r#"{"keys": "rust"}"#, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["index"], "dev_articles");
        assert_eq!(value["body"]["track_total_hits"], true);
        assert_eq!(value["body"]["query"]["query_string"]["query"], "rust~");
        assert!(value.get("warnings").is_none());
    }

    #[test]
    fn test_compile_rejects_bad_request() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("a.yaml");
        std::fs::write(&schema, "index: a\n").unwrap();

        assert!(compile(&Config::default(), &schema, "{not json", false).is_err());
    }
}
