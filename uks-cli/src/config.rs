//! Configuration management
//!
//! Config directory: ~/.uks/ (cross-platform)
//!
//! Config file format (~/.uks/config.toml):
//! ```toml
//! [arc]
//! service_id = 192
//! data_fragments = 9
//! coding_fragments = 3
//! schema = 12
//! version = 0
//!
//! [output]
//! format = "text"
//! ```
//!
//! Missing keys take their defaults, which can be overridden with `UKS_*`
//! environment variables.

use anyhow::{Context, Result};
use console::style;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use uks_core::arc::DEFAULT_SERVICE_ID;
use uks_core::ArcKeyOptions;

use crate::symbols;

/// Keys accepted by `uks config set`
pub const SETTABLE_KEYS: [&str; 6] = [
    "arc.service_id",
    "arc.data_fragments",
    "arc.coding_fragments",
    "arc.schema",
    "arc.version",
    "output.format",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config key: {0}. Valid keys: {keys}", keys = SETTABLE_KEYS.join(", "))]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Structure of ~/.uks/config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UksConfig {
    /// Defaults for erasure-coded keys
    #[serde(default)]
    pub arc: ArcConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default ARC key parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcConfig {
    #[serde(default = "default_service_id")]
    pub service_id: u32,

    #[serde(default = "default_data_fragments")]
    pub data_fragments: u32,

    #[serde(default = "default_coding_fragments")]
    pub coding_fragments: u32,

    #[serde(default = "default_schema")]
    pub schema: u32,

    #[serde(default = "default_version")]
    pub version: u64,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            service_id: default_service_id(),
            data_fragments: default_data_fragments(),
            coding_fragments: default_coding_fragments(),
            schema: default_schema(),
            version: default_version(),
        }
    }
}

impl ArcConfig {
    /// Builder options for fragment 0
    pub fn options(&self) -> ArcKeyOptions {
        ArcKeyOptions {
            version: self.version,
            service_id: self.service_id,
            data_fragments: self.data_fragments,
            coding_fragments: self.coding_fragments,
            schema: self.schema,
            replica: 0,
        }
    }
}

/// Read a default from the environment, falling back to `fallback`
fn env_or<T: FromStr>(var: &str, fallback: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

fn default_service_id() -> u32 {
    env_or("UKS_ARC_SERVICE_ID", DEFAULT_SERVICE_ID)
}

fn default_data_fragments() -> u32 {
    env_or("UKS_ARC_DATA_FRAGMENTS", 9)
}

fn default_coding_fragments() -> u32 {
    env_or("UKS_ARC_CODING_FRAGMENTS", 3)
}

fn default_schema() -> u32 {
    env_or("UKS_ARC_SCHEMA", 12)
}

fn default_version() -> u64 {
    env_or("UKS_ARC_VERSION", 0)
}

/// How results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(()),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

fn default_output_format() -> OutputFormat {
    env_or("UKS_OUTPUT_FORMAT", OutputFormat::Text)
}

impl UksConfig {
    /// Update one value by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let number = || value.parse::<u32>().map_err(|_| invalid());

        match key {
            "arc.service_id" => self.arc.service_id = number()?,
            "arc.data_fragments" => self.arc.data_fragments = number()?,
            "arc.coding_fragments" => self.arc.coding_fragments = number()?,
            "arc.schema" => self.arc.schema = number()?,
            "arc.version" => self.arc.version = value.parse().map_err(|_| invalid())?,
            "output.format" => self.output.format = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

/// Get the config directory path (~/.uks/)
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_dir = home.join(".uks");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).context("Failed to create config directory ~/.uks/")?;
    }

    Ok(config_dir)
}

/// Get the config file path
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load configuration, falling back to defaults if the file is missing
pub fn load_config() -> UksConfig {
    match config_file_path() {
        Ok(path) => load_config_from(&path),
        Err(_) => UksConfig::default(),
    }
}

/// Load configuration from `path`. A malformed file is reported and ignored.
pub fn load_config_from(path: &Path) -> UksConfig {
    if !path.exists() {
        return UksConfig::default();
    }
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "{} Failed to parse config file: {}",
                    style(symbols::WARN).yellow(),
                    e
                );
                UksConfig::default()
            }
        },
        Err(e) => {
            eprintln!(
                "{} Failed to read config file: {}",
                style(symbols::WARN).yellow(),
                e
            );
            UksConfig::default()
        }
    }
}

/// Save configuration to the default path
pub fn save_config(config: &UksConfig) -> Result<()> {
    save_config_to(&config_file_path()?, config)
}

/// Save configuration to `path`
pub fn save_config_to(path: &Path, config: &UksConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, content).context("Failed to write config file")?;
    Ok(())
}
