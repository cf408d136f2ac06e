use super::to_json;
use anyhow::{Context, Result};
use quarry::mapping::FieldMapper;
use quarry::schema::SchemaLoader;
use quarry::{Config, Hooks};
use std::path::Path;

/// Print the field mapping for a schema
pub fn run_mapping(config: &Config, schema_path: &Path, pretty: bool) -> Result<()> {
    println!("{}", mapping(config, schema_path, pretty)?);
    Ok(())
}

fn mapping(config: &Config, schema_path: &Path, pretty: bool) -> Result<String> {
    let schema = SchemaLoader::load_schema(schema_path)
        .with_context(|| format!("Failed to load schema {:?}", schema_path))?;

    let index = config.backend.index_id(&schema.index);
    let mapping = FieldMapper::map_field_params(&index, &schema, &Hooks::new());
    to_json(&mapping, pretty)
}
