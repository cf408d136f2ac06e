use super::{read_input, to_json};
use anyhow::{Context, Result};
use quarry::response::QueryResultParser;
use quarry::{RawResponse, SearchRequest};

/// Parse an engine response and print the result set
pub fn run_parse(request: Option<&str>, response: &str, pretty: bool) -> Result<()> {
    let request: SearchRequest = match request {
        Some(source) => serde_json::from_str(&read_input(source)?).context("Invalid search request")?,
        None => SearchRequest::default(),
    };
    let response: RawResponse =
        serde_json::from_str(&read_input(response)?).context("Invalid engine response")?;

    let results = QueryResultParser::parse(&request, response);
    for warning in &results.warnings {
        tracing::warn!("{}", warning);
    }

    println!("{}", to_json(&results, pretty)?);
    Ok(())
}
