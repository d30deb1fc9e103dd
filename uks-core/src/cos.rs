//! Class of service
//!
//! A class of service names the replication policy a key should follow:
//! either plain replication (`"0"` to `"7"`) or erasure coding
//! (`"ARC<k>+<m>"` together with a schema). Transforming a key re-encodes it
//! under that policy.

use crate::arc::{ArcKeyBuilder, ArcKeyOptions, HASH_BITS};
use crate::error::{Result, UksError};
use crate::key::{Key, CLASS_OFFSET, CLASS_RAIN, PLAIN_METADATA_BITS};
use crate::uint::{U160, KEY_BITS};
use std::fmt;

const ARC_PREFIX: &str = "ARC";

/// Parsed class of service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassOfService {
    /// Replication under a fixed class
    Classic { class: u8 },
    /// Erasure coding with `k` data and `m` coding fragments
    Arc { k: u8, m: u8, schema: u32 },
}

impl ClassOfService {
    /// Parse a CoS string. ARC specs need a schema of at least `k + m`.
    pub fn parse(spec: &str, schema: Option<u32>) -> Result<Self> {
        if let Ok(value) = spec.parse::<i64>() {
            return match u8::try_from(value) {
                Ok(class) if class <= CLASS_RAIN => Ok(ClassOfService::Classic { class }),
                _ => Err(UksError::UnrecognizedCos(spec.to_string())),
            };
        }

        if let Some(shape) = spec.strip_prefix(ARC_PREFIX) {
            let (k, m) = shape
                .split_once('+')
                .and_then(|(k, m)| Some((parse_fragments(k)?, parse_fragments(m)?)))
                .ok_or_else(|| UksError::UnrecognizedCos(spec.to_string()))?;

            let schema = schema.ok_or_else(|| {
                UksError::InvalidSchema(format!("{} requires a schema", spec))
            })?;
            if k as u32 + m as u32 > schema {
                return Err(UksError::InvalidSchema(format!(
                    "schema {} too low for {}",
                    schema, spec
                )));
            }
            return Ok(ClassOfService::Arc { k, m, schema });
        }

        Err(UksError::UnrecognizedCos(spec.to_string()))
    }

    /// Re-encode `key` under this class of service.
    ///
    /// Classic keeps the entropy and sets the class with replica 0. ARC takes
    /// the top 88 bits as the content hash and builds fragment 0 with default
    /// version and service id.
    pub fn transform(&self, key: &Key) -> Result<Key> {
        match *self {
            ClassOfService::Classic { class } => {
                let entropy = key.value() >> PLAIN_METADATA_BITS << PLAIN_METADATA_BITS;
                let metadata = U160::from_u64((class as u64) << CLASS_OFFSET);
                Ok(Key::from_value(entropy | metadata))
            }
            ClassOfService::Arc { k, m, schema } => {
                let hash = key.value() >> (KEY_BITS - HASH_BITS);
                ArcKeyBuilder::new(hash)
                    .with_options(ArcKeyOptions {
                        data_fragments: k as u32,
                        coding_fragments: m as u32,
                        schema,
                        ..Default::default()
                    })
                    .build()
            }
        }
    }
}

/// One or two decimal digits, no leading zero
fn parse_fragments(s: &str) -> Option<u8> {
    let valid = matches!(s.len(), 1 | 2)
        && !s.starts_with('0')
        && s.bytes().all(|b| b.is_ascii_digit());
    if valid {
        s.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for ClassOfService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassOfService::Classic { class } => write!(f, "{}", class),
            ClassOfService::Arc { k, m, .. } => write!(f, "{}{}+{}", ARC_PREFIX, k, m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classic() {
        assert_eq!(
            ClassOfService::parse("2", None).unwrap(),
            ClassOfService::Classic { class: 2 }
        );
        assert_eq!(
            ClassOfService::parse(&2.to_string(), None).unwrap(),
            ClassOfService::Classic { class: 2 }
        );
        assert!(matches!(
            ClassOfService::parse("9", None),
            Err(UksError::UnrecognizedCos(_))
        ));
        assert!(matches!(
            ClassOfService::parse("-1", None),
            Err(UksError::UnrecognizedCos(_))
        ));
    }

    #[test]
    fn test_parse_arc() {
        assert_eq!(
            ClassOfService::parse("ARC14+4", Some(18)).unwrap(),
            ClassOfService::Arc {
                k: 14,
                m: 4,
                schema: 18
            }
        );
        assert!(ClassOfService::parse("ARC14+4", Some(24)).is_ok());
    }

    #[test]
    fn test_parse_arc_schema_too_low() {
        assert!(matches!(
            ClassOfService::parse("ARC14+4", Some(12)),
            Err(UksError::InvalidSchema(_))
        ));
        assert!(matches!(
            ClassOfService::parse("ARC14+4", None),
            Err(UksError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_parse_unrecognized() {
        let specs = [
            "azeb", "", "ARC", "ARC14", "ARC0+4", "ARC100+4", "ARC14+", "ARC14-4", "arc14+4",
            " 2 ", "2\n", " ARC14+4", "ARC14+4 ",
        ];
        for spec in specs {
            assert!(
                matches!(
                    ClassOfService::parse(spec, Some(200)),
                    Err(UksError::UnrecognizedCos(_))
                ),
                "{} should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_transform_classic() {
        let k = Key::new("B5EE17AD7B2BBB71A0ACB8829403866370B50D00").unwrap();
        let cos = ClassOfService::parse("2", None).unwrap();
        let t = cos.transform(&k).unwrap();
        assert_eq!(t.to_hex_padded(), "b5ee17ad7b2bbb71a0acb8829403866370b50d20");
        assert_eq!(t.class(), Some(2));
        assert_eq!(t.replica_number(), 0);
    }

    #[test]
    fn test_transform_arc() {
        let k = Key::new("B5EE17AD7B2BBB71A0ACB8829403866370B50D00").unwrap();
        let cos = ClassOfService::parse("ARC14+4", Some(24)).unwrap();
        let t = cos.transform(&k).unwrap();
        assert_eq!(t.to_hex_padded(), "b5ee17ad7b2bbb71a0acb800000000c038418070");
    }

    #[test]
    fn test_transform_arc_rejects_oversized_fragments() {
        let k = Key::new("B5EE17AD7B2BBB71A0ACB8829403866370B50D00").unwrap();
        let cos = ClassOfService::parse("ARC70+4", Some(100)).unwrap();
        assert_eq!(cos.transform(&k), Err(UksError::InvalidDataFragments(70)));
    }

    #[test]
    fn test_display() {
        assert_eq!(ClassOfService::Classic { class: 3 }.to_string(), "3");
        let cos = ClassOfService::parse("ARC9+3", Some(12)).unwrap();
        assert_eq!(cos.to_string(), "ARC9+3");
    }
}
