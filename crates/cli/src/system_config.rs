//! System configuration (`config.toml`)
//!
//! Default location is `<config dir>/cycle/config.toml`; `--config` or the
//! `CYCLE_CONFIG` environment variable point somewhere else. A missing file
//! means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use trail::LabelMatchPolicy;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "CYCLE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{key} = {value} is out of range ({range})")]
    OutOfRange {
        key: &'static str,
        value: u64,
        range: &'static str,
    },

    #[error("invalid log level '{0}' (expected trace, debug, info, warn or error)")]
    LogLevel(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub namecheck: NameCheckConfig,
    pub trail: TrailConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameCheckConfig {
    /// Uniqueness resource, queried as `GET <endpoint>?name=<candidate>`
    pub endpoint: Option<String>,
    /// Quiet period before a lookup fires (default: 1000)
    pub debounce_ms: u64,
    /// Per-lookup timeout (default: 5000)
    pub timeout_ms: u64,
}

impl Default for NameCheckConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            debounce_ms: 1000,
            timeout_ms: 5000,
        }
    }
}

impl NameCheckConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// `keep` leaves a matching label untouched, `refresh` re-points it
    pub label_match: LabelMatchPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset (default: info)
    pub level: String,
    /// Write logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl SystemConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namecheck.debounce_ms > 60_000 {
            return Err(ConfigError::OutOfRange {
                key: "namecheck.debounce_ms",
                value: self.namecheck.debounce_ms,
                range: "0-60000",
            });
        }

        if !(100..=120_000).contains(&self.namecheck.timeout_ms) {
            return Err(ConfigError::OutOfRange {
                key: "namecheck.timeout_ms",
                value: self.namecheck.timeout_ms,
                range: "100-120000",
            });
        }

        if self.log.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::LogLevel(self.log.level.clone()));
        }

        Ok(())
    }
}

/// Resolve the config file location
///
/// Precedence: explicit path, then `CYCLE_CONFIG`, then the user config dir.
pub fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|dir| dir.join("cycle").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Load and validate the configuration, using defaults if the file is missing
pub fn load(explicit: Option<&Path>) -> Result<SystemConfig, ConfigError> {
    let path = config_file_path(explicit)?;
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<SystemConfig, ConfigError> {
    if !path.exists() {
        return Ok(SystemConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: SystemConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    config.validate()?;
    Ok(config)
}

/// Write the configuration, creating parent directories
pub fn save(path: &Path, config: &SystemConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config)?;

    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, contents).map_err(write_err)
}

/// Create the file with defaults if it does not exist
///
/// Returns true if a file was created.
pub fn init_if_missing(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    save(path, &SystemConfig::default())?;
    Ok(true)
}

/// Annotated example configuration
pub fn example_config() -> &'static str {
    r#"# Cycle configuration

[namecheck]
# Uniqueness resource; unset means names are checked against an in-memory set
endpoint = "http://localhost:8080/cycle/resources/roundtrip/isNameValid"
# Quiet period before a lookup is sent (0-60000)
debounce_ms = 1000
# Per-lookup timeout (100-120000)
timeout_ms = 5000

[trail]
# "keep": a label already in the trail is left as is
# "refresh": the matching entry is re-pointed at the current path
label_match = "keep"

[log]
# Default filter when RUST_LOG is unset
level = "info"
# file = "/tmp/cycle.log"
"#
}
