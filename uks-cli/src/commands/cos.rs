//! CoS Command
//!
//! Re-encodes a key under a class of service.

use crate::commands::{parse_key, print_json};
use crate::config::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use uks_core::{ClassOfService, Key};

/// CoS configuration
pub struct CosConfig {
    pub spec: String,
    pub key: String,
    pub schema: Option<u32>,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct Transformed {
    cos: String,
    from: Key,
    to: Key,
}

/// Parse `spec` and transform `key` under it
pub fn transform(spec: &str, key: &Key, schema: Option<u32>) -> Result<(ClassOfService, Key)> {
    let cos = ClassOfService::parse(spec, schema)
        .with_context(|| format!("Invalid class of service '{}'", spec))?;
    let to = cos
        .transform(key)
        .with_context(|| format!("Cannot transform {} under {}", key, cos))?;
    Ok((cos, to))
}

/// Run cos command
pub fn run(config: CosConfig) -> Result<()> {
    let from = parse_key(&config.key)?;
    let (cos, to) = transform(&config.spec, &from, config.schema)?;

    match config.format {
        OutputFormat::Json => print_json(&Transformed {
            cos: cos.to_string(),
            from,
            to,
        }),
        OutputFormat::Text => {
            println!("{}", to);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Key {
        parse_key("B5EE17AD7B2BBB71A0ACB8829403866370B50D43").unwrap()
    }

    #[test]
    fn test_classic() {
        let (cos, to) = transform("2", &key(), None).unwrap();
        assert_eq!(cos, ClassOfService::Classic { class: 2 });
        assert_eq!(to.to_hex_padded(), "b5ee17ad7b2bbb71a0acb8829403866370b50d20");
    }

    #[test]
    fn test_arc() {
        let (_, to) = transform("ARC14+4", &key(), Some(24)).unwrap();
        assert_eq!(to.to_hex_padded(), "b5ee17ad7b2bbb71a0acb800000000c038418070");
    }

    #[test]
    fn test_errors_carry_context() {
        let err = transform("ARC14+4", &key(), Some(12)).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("ARC14+4"));
        assert!(message.contains("Invalid schema"));
    }
}
