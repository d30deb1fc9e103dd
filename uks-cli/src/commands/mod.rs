//! CLI Commands

pub mod arc;
pub mod cos;
pub mod ids;
pub mod inspect;
pub mod range;
pub mod replicas;

use anyhow::{Context, Result};
use serde::Serialize;
use uks_core::Key;

/// Parse a key argument: hex digits, optionally prefixed with `0x`
pub fn parse_key(arg: &str) -> Result<Key> {
    let hex = arg
        .strip_prefix("0x")
        .or_else(|| arg.strip_prefix("0X"))
        .unwrap_or(arg);
    Key::from_hex(hex).with_context(|| format!("Invalid key '{}'", arg))
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        let k = parse_key("0xB5EE17AD7B2BBB71A0ACB8829403866370B50D12").unwrap();
        assert_eq!(k, parse_key("b5ee17ad7b2bbb71a0acb8829403866370b50d12").unwrap());
        assert!(parse_key("xyz").is_err());
        assert!(parse_key("-1").is_err());
    }
}
