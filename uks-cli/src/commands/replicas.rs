//! Replica Commands
//!
//! Lists the sibling replicas (or RAIN fragments) of a key, or steps to the
//! next or previous one.

use crate::commands::{parse_key, print_json};
use crate::config::OutputFormat;
use crate::symbols;
use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use tracing::debug;
use uks_core::Key;

/// Replicas configuration
pub struct ReplicasConfig {
    pub key: String,
    pub include_self: bool,
    pub translate_class1: Option<bool>,
    pub format: OutputFormat,
}

/// Direction for a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Prev,
}

#[derive(Serialize)]
struct ReplicaListing {
    key: Key,
    replicas: Vec<Key>,
}

/// Run replicas command
pub fn run(config: ReplicasConfig) -> Result<()> {
    let key = parse_key(&config.key)?;
    let replicas = key
        .replicas(config.include_self, config.translate_class1)
        .with_context(|| format!("Cannot derive replicas of {}", key))?;
    debug!(key = %key, count = replicas.len(), "derived replicas");

    if config.format == OutputFormat::Json {
        return print_json(&ReplicaListing { key, replicas });
    }

    if replicas.is_empty() {
        println!(
            "{} {} has no sibling replicas",
            style(symbols::WARN).yellow(),
            key
        );
        return Ok(());
    }

    println!(
        "{:<8} {}",
        style("REPLICA").bold(),
        style("KEY").bold()
    );
    for replica in &replicas {
        let marker = if *replica == key {
            style(symbols::ARROW).green().to_string()
        } else {
            String::new()
        };
        println!("{:<8} {} {}", replica.replica_number(), replica, marker);
    }

    Ok(())
}

/// Neighbour of `key` in its replica set
pub fn neighbour(key: &Key, step: Step) -> Result<Option<Key>> {
    let found = match step {
        Step::Next => key.next_replica(),
        Step::Prev => key.prev_replica(),
    };
    found.with_context(|| format!("Cannot derive replicas of {}", key))
}

/// Run next/prev command
pub fn run_step(key: &str, step: Step, format: OutputFormat) -> Result<()> {
    let key = parse_key(key)?;
    let found = neighbour(&key, step)?;

    match format {
        OutputFormat::Json => print_json(&found),
        OutputFormat::Text => {
            match found {
                Some(k) => println!("{}", k),
                None => println!(
                    "{} {} has no sibling replicas",
                    style(symbols::WARN).yellow(),
                    key
                ),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours() {
        let key = parse_key("B5EE17AD7B2BBB71A0ACB8829403866370B50D20").unwrap();
        let next = neighbour(&key, Step::Next).unwrap().unwrap();
        assert_eq!(next.replica_number(), 1);
        assert_eq!(neighbour(&next, Step::Prev).unwrap(), Some(key));
    }

    #[test]
    fn test_neighbours_of_lonely_key() {
        let key = parse_key("014").unwrap();
        assert_eq!(neighbour(&key, Step::Next).unwrap(), None);
    }

    #[test]
    fn test_undefined_class_is_reported() {
        let key = parse_key("ABCD").unwrap();
        let err = neighbour(&key, Step::Next).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid class: 12"));
    }

    #[test]
    fn test_listing_json() {
        let key = parse_key("B5EE17AD7B2BBB71A0ACB8829403866370B50D20").unwrap();
        let listing = ReplicaListing {
            key,
            replicas: key.replicas(true, None).unwrap(),
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["replicas"].as_array().unwrap().len(), 3);
        assert_eq!(json["replicas"][0], json["key"]);
    }
}
