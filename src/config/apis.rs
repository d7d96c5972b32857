use std::collections::BTreeMap;
use std::env;

use crate::error::{Error, Result};

use super::loader::ResolvedConfig;

pub const DATA_MAINTENANCE: &str = "data-maintenance";
pub const PSEUDO_SERVICE: &str = "dapla-pseudo-service";

pub const KNOWN_APIS: [&str; 2] = [DATA_MAINTENANCE, PSEUDO_SERVICE];

/// Base URL of API `name`.
///
/// A configured value of the form `$VAR` is read from environment variable `VAR`.
pub fn api_url(config: &ResolvedConfig, name: &str) -> Result<String> {
    api_url_from_source(config, name, &|key| env::var(key).ok())
}

fn api_url_from_source(
    config: &ResolvedConfig,
    name: &str,
    get: &dyn Fn(&str) -> Option<String>,
) -> Result<String> {
    let configured = config.ensure_api(name)?;
    let Some(var) = configured.strip_prefix('$') else {
        return Ok(configured.to_string());
    };

    get(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::UnresolvedApiUrl {
            api: name.to_string(),
            var: configured.to_string(),
        })
}

/// Every known API with its resolved URL, or the reason it could not be resolved.
pub fn all_api_urls(config: &ResolvedConfig) -> BTreeMap<&'static str, Result<String>> {
    KNOWN_APIS
        .iter()
        .map(|name| (*name, api_url(config, name)))
        .collect()
}
