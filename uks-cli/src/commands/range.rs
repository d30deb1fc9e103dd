//! Range Commands
//!
//! Ring membership and intersection of key ranges.

use crate::commands::{parse_key, print_json};
use crate::config::OutputFormat;
use crate::symbols;
use anyhow::Result;
use console::style;
use serde::Serialize;
use uks_core::{Key, KeyRange};

/// Between configuration
pub struct BetweenConfig {
    pub key: String,
    pub lo: String,
    pub hi: String,
    pub format: OutputFormat,
}

/// Overlap configuration
pub struct OverlapConfig {
    pub a: (String, String),
    pub b: (String, String),
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct BetweenResult {
    key: Key,
    range: KeyRange,
    between: bool,
}

fn parse_range(start: &str, end: &str) -> Result<KeyRange> {
    Ok(KeyRange {
        start: parse_key(start)?,
        end: parse_key(end)?,
    })
}

/// Run between command
pub fn run_between(config: BetweenConfig) -> Result<()> {
    let key = parse_key(&config.key)?;
    let range = parse_range(&config.lo, &config.hi)?;
    let between = range.contains(&key);

    if config.format == OutputFormat::Json {
        return print_json(&BetweenResult {
            key,
            range,
            between,
        });
    }

    if between {
        println!("{} {} is in {}", style(symbols::CHECK).green(), key, range);
    } else {
        println!("{} {} is not in {}", style(symbols::CROSS).red(), key, range);
    }
    Ok(())
}

/// Intersection of two ranges given as endpoint pairs
pub fn intersect(a: (&str, &str), b: (&str, &str)) -> Result<Vec<KeyRange>> {
    let a = parse_range(a.0, a.1)?;
    let b = parse_range(b.0, b.1)?;
    Ok(a.overlap(&b))
}

/// Run overlap command
pub fn run_overlap(config: OverlapConfig) -> Result<()> {
    let arcs = intersect(
        (&config.a.0, &config.a.1),
        (&config.b.0, &config.b.1),
    )?;

    if config.format == OutputFormat::Json {
        return print_json(&arcs);
    }

    if arcs.is_empty() {
        println!("{} no overlap", style(symbols::CROSS).red());
        return Ok(());
    }
    for arc in &arcs {
        println!("{} {}", style(symbols::CHECK).green(), arc);
    }
    Ok(())
}
