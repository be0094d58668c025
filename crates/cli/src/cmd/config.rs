//! Configuration management command
//!
//! Provides CLI interface to view and edit the Cycle configuration.

use anyhow::{Context, Result};
use cli_lib::system_config::{self, SystemConfig};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use trail::LabelMatchPolicy;

const KEYS: &[&str] = &[
    "namecheck.endpoint",
    "namecheck.debounce_ms",
    "namecheck.timeout_ms",
    "trail.label_match",
    "log.level",
    "log.file",
];

/// List all configuration values
pub async fn run_list(explicit: Option<&Path>) -> Result<()> {
    let config_path = system_config::config_file_path(explicit)?;
    let config = system_config::load_from(&config_path)?;

    println!("{}", "Cycle Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!("{}", "[namecheck]".yellow());
    println!(
        "  {} = {}",
        "endpoint".cyan(),
        config.namecheck.endpoint.as_deref().unwrap_or("(unset: in-memory names)")
    );
    println!(
        "  {} = {} {}",
        "debounce_ms".cyan(),
        config.namecheck.debounce_ms,
        format!("({:?})", config.namecheck.debounce()).dimmed()
    );
    println!(
        "  {} = {} {}",
        "timeout_ms".cyan(),
        config.namecheck.timeout_ms,
        format!("({:?})", config.namecheck.timeout()).dimmed()
    );

    println!("\n{}", "[trail]".yellow());
    println!(
        "  {} = {}",
        "label_match".cyan(),
        policy_name(config.trail.label_match)
    );

    println!("\n{}", "[log]".yellow());
    println!("  {} = {}", "level".cyan(), config.log.level);
    println!(
        "  {} = {}",
        "file".cyan(),
        config
            .log
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(stderr)".to_string())
    );

    println!("\n{}", "Valid Ranges:".bold());
    println!("  debounce_ms: 0-60000");
    println!("  timeout_ms: 100-120000");
    println!("  label_match: keep | refresh");
    println!("  level: trace | debug | info | warn | error");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(explicit: Option<&Path>, key: &str) -> Result<()> {
    let config = system_config::load(explicit)?;
    println!("{}", get_value(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(explicit: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let config_path = system_config::config_file_path(explicit)?;
    let mut config = system_config::load_from(&config_path)?;

    set_value(&mut config, key, value)?;

    // Validate before saving
    config.validate().context("Invalid configuration value")?;

    system_config::save(&config_path, &config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(explicit: Option<&Path>, create: bool) -> Result<()> {
    let config_path = system_config::config_file_path(explicit)?;

    if create && system_config::init_if_missing(&config_path)? {
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    println!("{}", system_config::example_config());
    Ok(())
}

fn get_value(config: &SystemConfig, key: &str) -> Result<String> {
    let value = match key {
        "namecheck.endpoint" => config.namecheck.endpoint.clone().unwrap_or_default(),
        "namecheck.debounce_ms" => config.namecheck.debounce_ms.to_string(),
        "namecheck.timeout_ms" => config.namecheck.timeout_ms.to_string(),
        "trail.label_match" => policy_name(config.trail.label_match).to_string(),
        "log.level" => config.log.level.clone(),
        "log.file" => config
            .log
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Known keys: {}",
            key,
            KEYS.join(", ")
        ),
    };
    Ok(value)
}

fn set_value(config: &mut SystemConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "namecheck.endpoint" => {
            config.namecheck.endpoint = (!value.is_empty()).then(|| value.to_string());
        }
        "namecheck.debounce_ms" => {
            config.namecheck.debounce_ms = value
                .parse()
                .context("Invalid value: must be a non-negative integer")?;
        }
        "namecheck.timeout_ms" => {
            config.namecheck.timeout_ms = value
                .parse()
                .context("Invalid value: must be a positive integer")?;
        }
        "trail.label_match" => {
            config.trail.label_match = match value {
                "keep" => LabelMatchPolicy::Keep,
                "refresh" => LabelMatchPolicy::Refresh,
                _ => anyhow::bail!("Invalid value: must be 'keep' or 'refresh'"),
            };
        }
        "log.level" => config.log.level = value.to_string(),
        "log.file" => {
            config.log.file = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        _ => anyhow::bail!(
            "Unknown config key: {}. Known keys: {}",
            key,
            KEYS.join(", ")
        ),
    }
    Ok(())
}

fn policy_name(policy: LabelMatchPolicy) -> &'static str {
    match policy {
        LabelMatchPolicy::Keep => "keep",
        LabelMatchPolicy::Refresh => "refresh",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_round_trips() {
        let mut config = SystemConfig::default();
        let values = [
            ("namecheck.endpoint", "http://localhost:8080/isNameValid"),
            ("namecheck.debounce_ms", "250"),
            ("namecheck.timeout_ms", "3000"),
            ("trail.label_match", "refresh"),
            ("log.level", "debug"),
            ("log.file", "/tmp/cycle.log"),
        ];

        for (key, value) in values {
            set_value(&mut config, key, value).unwrap();
            assert_eq!(get_value(&config, key).unwrap(), value, "{}", key);
        }
        assert_eq!(values.len(), KEYS.len());
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut config = SystemConfig::default();
        assert!(get_value(&config, "namecheck.retries").is_err());
        assert!(set_value(&mut config, "namecheck.retries", "1").is_err());
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut config = SystemConfig::default();
        assert!(set_value(&mut config, "namecheck.debounce_ms", "soon").is_err());
        assert!(set_value(&mut config, "trail.label_match", "sometimes").is_err());
    }

    #[test]
    fn test_empty_endpoint_unsets() {
        let mut config = SystemConfig::default();
        set_value(&mut config, "namecheck.endpoint", "http://x/").unwrap();
        set_value(&mut config, "namecheck.endpoint", "").unwrap();
        assert_eq!(config.namecheck.endpoint, None);
    }
}
