//! Inspect Command
//!
//! Decodes the placement fields carried by a key.

use crate::commands::{parse_key, print_json};
use crate::config::OutputFormat;
use crate::symbols;
use anyhow::Result;
use console::style;
use serde::Serialize;
use uks_core::{Key, RainParams};

/// Inspect configuration
pub struct InspectConfig {
    pub key: String,
    pub format: OutputFormat,
}

/// Decoded view of a key
#[derive(Debug, Serialize)]
pub struct KeyReport {
    pub key: Key,
    pub class: u8,
    pub class_valid: bool,
    pub replica: u8,
    /// Set size under the default class-1 translation, when the class is known
    pub replica_count: Option<u32>,
    pub class1_translation: bool,
    pub rain: Option<RainParams>,
}

impl KeyReport {
    pub fn new(key: Key) -> Self {
        let translate = key.default_class1_translation();
        Self {
            key,
            class: key.raw_class(),
            class_valid: key.class().is_some(),
            replica: key.replica_number(),
            replica_count: key.replica_count(translate).ok(),
            class1_translation: translate,
            rain: key.rain_params(),
        }
    }
}

/// Run inspect command
pub fn run(config: InspectConfig) -> Result<()> {
    let report = KeyReport::new(parse_key(&config.key)?);

    if config.format == OutputFormat::Json {
        return print_json(&report);
    }

    println!("{}", style(report.key.to_hex_padded()).bold());
    println!("{}", symbols::HLINE);

    let class = if report.class_valid {
        style(report.class.to_string()).cyan()
    } else {
        style(format!("{} (undefined)", report.class)).red()
    };
    println!("  Class:        {}", class);
    println!("  Replica:      {}", style(report.replica).cyan());

    match report.replica_count {
        Some(count) => println!("  Set size:     {}", style(count).cyan()),
        None => println!("  Set size:     {}", style("-").dim()),
    }
    if report.class1_translation {
        println!("  {}", style("class 1 keys ending in 12 use the three-replica layout").dim());
    }

    if let Some(rain) = report.rain {
        println!();
        println!("  {}", style("RAIN").bold());
        println!("  Data:         {}", style(rain.data_fragments).cyan());
        println!("  Coding:       {}", style(rain.coding_fragments).cyan());
        println!("  Schema:       {}", style(rain.schema).cyan());
    }

    Ok(())
}
