use std::collections::BTreeMap;
use std::io::{self, Write};

use serde_json::{Value, json};

use crate::config::{ResolvedConfig, all_api_urls};
use crate::error::Result;

use super::context::CliContext;

const REDACTED: &str = "********";

/// Print the report; exits with 1 when any problem was found.
pub fn execute(ctx: &CliContext) -> Result<i32> {
    let mut out = io::stdout().lock();
    let problems = write_report(&mut out, ctx.resolved())?;
    out.flush()?;
    if problems > 0 {
        log::warn!("doctor found {} problem(s)", problems);
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Write the report and return the number of problems in it.
fn write_report(out: &mut dyn Write, config: &ResolvedConfig) -> Result<usize> {
    let mut problems = 0;
    let apis: BTreeMap<&str, String> = all_api_urls(config)
        .into_iter()
        .map(|(name, url)| {
            let url = url.unwrap_or_else(|err| {
                problems += 1;
                format!("<{err}>")
            });
            (name, url)
        })
        .collect();

    writeln!(out, "dapla-cli {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    writeln!(out, "Configuration:")?;
    writeln!(out, "{}", serde_json::to_string_pretty(&config_summary(config))?)?;
    writeln!(out)?;
    writeln!(out, "APIs:")?;
    writeln!(out, "{}", serde_json::to_string_pretty(&apis)?)?;
    Ok(problems)
}

fn config_summary(config: &ResolvedConfig) -> Value {
    json!({
        "configFile": config.config_path.display().to_string(),
        "configFileLoaded": config.config_loaded,
        "debug": config.debug,
        "jupyter": config.jupyter,
        "authtoken": config.authtoken.as_ref().map(|_| REDACTED),
        "apis": config.apis,
    })
}
