use crate::schema::IndexSchema;
use crate::{QuarryError, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub struct SchemaLoader {
    schemas_dir: PathBuf,
}

impl SchemaLoader {
    pub fn new(schemas_dir: impl AsRef<Path>) -> Self {
        Self {
            schemas_dir: schemas_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load_all(&self) -> Result<HashMap<String, IndexSchema>> {
        let mut schemas = HashMap::new();

        if !self.schemas_dir.exists() {
            return Err(QuarryError::Schema(format!(
                "Schemas directory does not exist: {}",
                self.schemas_dir.display()
            )));
        }

        for entry in fs::read_dir(&self.schemas_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            ) {
                continue;
            }

            let schema = Self::load_schema(&path)?;
            schemas.insert(schema.index.clone(), schema);
        }

        tracing::debug!(
            "Loaded {} index schemas from {}",
            schemas.len(),
            self.schemas_dir.display()
        );
        Ok(schemas)
    }

    pub fn load_schema(path: &Path) -> Result<IndexSchema> {
        let content = fs::read_to_string(path)?;
        let schema: IndexSchema = serde_yaml::from_str(&content)?;
        Ok(schema)
    }

    /// Lint a single schema and return a list of human-readable issues (empty = ok)
    pub fn lint_schema(schema: &IndexSchema) -> Vec<String> {
        let mut issues = Vec::new();
        if schema.index.trim().is_empty() {
            issues.push("index must be set".to_string());
        }

        let mut seen = HashSet::new();
        for field in &schema.fields {
            if field.id.trim().is_empty() {
                issues.push("field id must not be empty".to_string());
                continue;
            }
            if !seen.insert(field.id.as_str()) {
                issues.push(format!("field '{}' is declared more than once", field.id));
            }
            if IndexSchema::is_reserved(&field.id) {
                issues.push(format!(
                    "field '{}' shadows a reserved pseudo-field",
                    field.id
                ));
            }
            if !field.boost.is_finite() || field.boost < 0.0 {
                issues.push(format!(
                    "field '{}' boost must be >= 0 (got {})",
                    field.id, field.boost
                ));
            }
        }
        issues
    }

    /// Lint all loaded schemas and return map index -> issues
    pub fn lint_all(schemas: &HashMap<String, IndexSchema>) -> HashMap<String, Vec<String>> {
        let mut map = HashMap::new();
        for (name, schema) in schemas {
            let issues = SchemaLoader::lint_schema(schema);
            if !issues.is_empty() {
                map.insert(name.clone(), issues);
            }
        }
        map
    }
}
