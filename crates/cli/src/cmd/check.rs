//! One-shot name uniqueness check

use anyhow::{Context, Result};
use cli_lib::SystemConfig;
use namecheck::{check_name, HttpNameQuery, NameCheckOutcome};
use owo_colors::OwoColorize;

pub async fn run(config: &SystemConfig, name: &str, endpoint: Option<&str>) -> Result<()> {
    let endpoint = endpoint
        .or(config.namecheck.endpoint.as_deref())
        .context("No uniqueness endpoint: pass --endpoint or set namecheck.endpoint")?;

    let query = HttpNameQuery::new(endpoint, config.namecheck.timeout())
        .context("Failed to set up name lookup")?;

    match check_name(&query, Some(name)).await {
        NameCheckOutcome::Available => {
            println!("{} {}", "available".green(), name);
            Ok(())
        }
        NameCheckOutcome::Duplicate => {
            println!("{} {}", "taken".red(), name);
            Ok(())
        }
        NameCheckOutcome::TransportError(e) => {
            anyhow::bail!("Lookup for '{}' failed: {}", name, e)
        }
    }
}
