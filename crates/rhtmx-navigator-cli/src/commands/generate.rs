use std::collections::HashMap;

use anyhow::{bail, Result};
use rhtmx_navigator::{NavigatorConfig, PathMatcher};

/// Builds a path from `pattern` and `name=value` pairs
pub fn execute(config: &NavigatorConfig, pattern: &str, params: &[String]) -> Result<String> {
    let params = parse_params(params)?;
    let matcher = PathMatcher::from_config(config);

    tracing::debug!(pattern, ?params, "generating");
    Ok(matcher.generate_path(pattern, &params)?)
}

fn parse_params(raw: &[String]) -> Result<HashMap<String, String>> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
            _ => bail!("Invalid parameter '{}': expected name=value", pair),
        })
        .collect()
}
