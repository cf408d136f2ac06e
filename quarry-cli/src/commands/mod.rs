pub mod compile;
pub mod lint;
pub mod mapping;
pub mod parse;

pub use compile::run_compile;
pub use lint::run_lint;
pub use mapping::run_mapping;
pub use parse::run_parse;

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;

/// Read a file, or stdin for "-"
pub(crate) fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
