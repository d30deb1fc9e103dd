//! Random and Txid Commands
//!
//! Generates fresh keys and transaction ids.

use crate::commands::print_json;
use crate::config::OutputFormat;
use anyhow::{Context, Result};
use uks_core::{ArcKeyOptions, Key};
use uks_support::{random_arc_key, random_key, random_plain_key, TransactionIdSource, TxIdGenerator};

/// What kind of key to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomKind {
    /// Any plain class 0..=5
    Plain,
    /// A fixed class
    Class(u8),
    /// Erasure-coded, with these options
    Arc(ArcKeyOptions),
}

/// Random configuration
pub struct RandomConfig {
    pub kind: RandomKind,
    pub count: usize,
    pub format: OutputFormat,
}

/// Generate `count` keys of `kind`
pub fn generate(kind: RandomKind, count: usize) -> Result<Vec<Key>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| match kind {
            RandomKind::Plain => Ok(random_plain_key(&mut rng)),
            RandomKind::Class(class) => {
                random_key(&mut rng, class).context("Cannot generate key for this class")
            }
            RandomKind::Arc(options) => {
                random_arc_key(&mut rng, options).context("Invalid ARC parameters")
            }
        })
        .collect()
}

/// Run random command
pub fn run_random(config: RandomConfig) -> Result<()> {
    let keys = generate(config.kind, config.count)?;
    match config.format {
        OutputFormat::Json => print_json(&keys),
        OutputFormat::Text => {
            for key in &keys {
                println!("{}", key);
            }
            Ok(())
        }
    }
}

/// Take `count` ids from `source`
pub fn take_ids(source: &dyn TransactionIdSource, count: usize) -> Vec<u64> {
    (0..count).map(|_| source.next_id()).collect()
}

/// Run txid command
pub fn run_txid(count: usize, seed: Option<u64>, format: OutputFormat) -> Result<()> {
    let source = match seed {
        Some(seed) => TxIdGenerator::with_seed(seed),
        None => TxIdGenerator::new(),
    };
    let ids = take_ids(&source, count);

    match format {
        OutputFormat::Json => print_json(&ids),
        OutputFormat::Text => {
            for id in ids {
                println!("{}", id);
            }
            Ok(())
        }
    }
}
