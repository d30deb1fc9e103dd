//! ARC Command
//!
//! Builds an erasure-coded key from a content hash.

use crate::commands::print_json;
use crate::config::OutputFormat;
use anyhow::{Context, Result};
use console::style;
use uks_core::{ArcKeyBuilder, ArcKeyOptions, Key};

/// ARC configuration; unset fields come from the config file
pub struct ArcConfig {
    pub hash: String,
    pub defaults: ArcKeyOptions,
    pub version: Option<u64>,
    pub service_id: Option<u32>,
    pub data_fragments: Option<u32>,
    pub coding_fragments: Option<u32>,
    pub schema: Option<u32>,
    pub replica: Option<u32>,
    pub all_fragments: bool,
    pub format: OutputFormat,
}

impl ArcConfig {
    /// Flags layered over the configured defaults
    pub fn options(&self) -> ArcKeyOptions {
        let d = self.defaults;
        ArcKeyOptions {
            version: self.version.unwrap_or(d.version),
            service_id: self.service_id.unwrap_or(d.service_id),
            data_fragments: self.data_fragments.unwrap_or(d.data_fragments),
            coding_fragments: self.coding_fragments.unwrap_or(d.coding_fragments),
            schema: self.schema.unwrap_or(d.schema),
            replica: self.replica.unwrap_or(d.replica),
        }
    }
}

/// Build the key described by `config`
pub fn build(config: &ArcConfig) -> Result<Key> {
    let key = ArcKeyBuilder::from_hex(&config.hash)
        .context("Invalid content hash")?
        .with_options(config.options())
        .build()
        .context("Invalid ARC parameters")?;
    Ok(key)
}

/// Run arc command
pub fn run(config: ArcConfig) -> Result<()> {
    let key = build(&config)?;
    let keys = if config.all_fragments {
        key.replicas(true, None)?
    } else {
        vec![key]
    };

    match config.format {
        OutputFormat::Json if config.all_fragments => print_json(&keys),
        OutputFormat::Json => print_json(&key),
        OutputFormat::Text => {
            for k in &keys {
                if config.all_fragments {
                    println!("{:<4} {}", style(k.replica_number()).dim(), k);
                } else {
                    println!("{}", k);
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hash: &str) -> ArcConfig {
        ArcConfig {
            hash: hash.to_string(),
            defaults: ArcKeyOptions::default(),
            version: None,
            service_id: None,
            data_fragments: None,
            coding_fragments: None,
            schema: None,
            replica: None,
            all_fragments: false,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn test_build_with_defaults() {
        let key = build(&config("ABC")).unwrap();
        assert_eq!(key.to_hex_padded(), "0000000000000000000abc00000000c02430c070");
    }

    #[test]
    fn test_flags_override_defaults() {
        let cfg = ArcConfig {
            data_fragments: Some(3),
            coding_fragments: Some(3),
            schema: Some(6),
            replica: Some(1),
            ..config("124")
        };
        let key = build(&cfg).unwrap();
        assert_eq!(key.to_hex_padded(), "000000000000000000012400000000c00c306071");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(build(&config("-1")).is_err());
        let cfg = ArcConfig {
            service_id: Some(300),
            ..config("1")
        };
        let err = build(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid service id: 300"));
    }
}
