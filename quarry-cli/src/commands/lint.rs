use anyhow::Result;
use quarry::schema::SchemaLoader;
use std::path::Path;

/// Lint every schema in a directory, failing if any has issues
pub fn run_lint(schemas_dir: &Path) -> Result<()> {
    let schemas = SchemaLoader::new(schemas_dir).load_all()?;
    let issues = SchemaLoader::lint_all(&schemas);

    if issues.is_empty() {
        println!("{} schemas OK", schemas.len());
        return Ok(());
    }

    let mut names: Vec<&String> = issues.keys().collect();
    names.sort();
    for name in names {
        println!("{}:", name);
        for issue in &issues[name] {
            println!("  - {}", issue);
        }
    }

    anyhow::bail!("{} of {} schemas have issues", issues.len(), schemas.len())
}
