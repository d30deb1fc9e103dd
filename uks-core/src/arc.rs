//! Erasure-coded (ARC) key construction
//!
//! Layout of the 40 hex digits, most significant first:
//!
//! | digits | field |
//! |---|---|
//! | 22 | content hash (88 bits) |
//! | 8 | version |
//! | 2 | service id |
//! | 3 | `(k << 6) + m` |
//! | 2 | schema |
//! | 1 | replica high nibble |
//! | 1 | class marker `7` |
//! | 1 | replica low nibble |

use crate::error::{Result, UksError};
use crate::key::{
    Key, CLASS_OFFSET, CLASS_RAIN, RAIN_CODING_OFFSET, RAIN_REPLICA_HIGH_OFFSET,
    RAIN_SCHEMA_OFFSET,
};
use crate::uint::U160;
use serde::{Deserialize, Serialize};

/// Width of the content hash field
pub const HASH_BITS: u32 = 88;

/// Highest data or coding fragment count (6-bit fields)
pub const MAX_FRAGMENTS: u32 = 63;

/// Default service id
pub const DEFAULT_SERVICE_ID: u32 = 0xC0;

const VERSION_OFFSET: u32 = 40;
const SERVICE_ID_OFFSET: u32 = 32;
const HASH_OFFSET: u32 = 72;

/// Parameters of an ARC key, everything but the hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcKeyOptions {
    /// Object version, 32 bits
    pub version: u64,
    /// Service id, 8 bits
    pub service_id: u32,
    /// Data fragments (k), 1..=63
    pub data_fragments: u32,
    /// Coding fragments (m), 1..=63
    pub coding_fragments: u32,
    /// Ring divisor, 1..=255 and at least `k + m`
    pub schema: u32,
    /// Fragment number, below `k + m`
    pub replica: u32,
}

impl Default for ArcKeyOptions {
    fn default() -> Self {
        Self {
            version: 0,
            service_id: DEFAULT_SERVICE_ID,
            data_fragments: 9,
            coding_fragments: 3,
            schema: 12,
            replica: 0,
        }
    }
}

impl ArcKeyOptions {
    /// Check every field range
    pub fn validate(&self) -> Result<()> {
        if self.service_id > 0xFF {
            return Err(UksError::InvalidServiceId(self.service_id));
        }
        if self.version > u32::MAX as u64 {
            return Err(UksError::InvalidVersion(self.version));
        }
        if self.data_fragments == 0 || self.data_fragments > MAX_FRAGMENTS {
            return Err(UksError::InvalidDataFragments(self.data_fragments));
        }
        if self.coding_fragments == 0 || self.coding_fragments > MAX_FRAGMENTS {
            return Err(UksError::InvalidCodingFragments(self.coding_fragments));
        }
        if self.replica > 0xFF {
            return Err(UksError::InvalidReplica {
                replica: self.replica,
                fragments: self.fragments(),
            });
        }
        if self.fragments() > self.schema {
            return Err(UksError::InvalidSchema(format!(
                "schema {} too low for {}+{}",
                self.schema, self.data_fragments, self.coding_fragments
            )));
        }
        if self.schema == 0 || self.schema > 0xFF {
            return Err(UksError::InvalidSchema(format!(
                "schema {} out of range 1..=255",
                self.schema
            )));
        }
        if self.replica >= self.fragments() {
            return Err(UksError::InvalidReplica {
                replica: self.replica,
                fragments: self.fragments(),
            });
        }
        Ok(())
    }

    /// k + m, saturating for unvalidated options
    pub fn fragments(&self) -> u32 {
        self.data_fragments.saturating_add(self.coding_fragments)
    }
}

/// Builder for erasure-coded keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcKeyBuilder {
    hash: U160,
    options: ArcKeyOptions,
}

impl ArcKeyBuilder {
    /// Start from a content hash with default options
    pub fn new(hash: U160) -> Self {
        Self {
            hash,
            options: ArcKeyOptions::default(),
        }
    }

    /// Start from a hex content hash (at most 40 digits, no sign)
    pub fn from_hex(hash: &str) -> Result<Self> {
        let hash = U160::from_hex(hash).map_err(|e| UksError::InvalidHash(e.to_string()))?;
        Ok(Self::new(hash))
    }

    /// Replace all options at once
    pub fn with_options(mut self, options: ArcKeyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.options.version = version;
        self
    }

    pub fn with_service_id(mut self, service_id: u32) -> Self {
        self.options.service_id = service_id;
        self
    }

    /// Set data (k) and coding (m) fragment counts
    pub fn with_fragments(mut self, data: u32, coding: u32) -> Self {
        self.options.data_fragments = data;
        self.options.coding_fragments = coding;
        self
    }

    pub fn with_schema(mut self, schema: u32) -> Self {
        self.options.schema = schema;
        self
    }

    pub fn with_replica(mut self, replica: u32) -> Self {
        self.options.replica = replica;
        self
    }

    pub fn options(&self) -> &ArcKeyOptions {
        &self.options
    }

    /// Validate every field and build the key
    pub fn build(&self) -> Result<Key> {
        if self.hash.bits() > HASH_BITS {
            return Err(UksError::InvalidHash(format!(
                "hash {} exceeds {} bits",
                self.hash, HASH_BITS
            )));
        }
        self.options.validate()?;
        Ok(self.build_unchecked())
    }

    /// Build without validation, for callers that already checked the
    /// inputs. Each field is truncated to its width.
    pub fn build_unchecked(&self) -> Key {
        let o = &self.options;
        let replica = o.replica as u64 & 0xFF;
        let packed = ((o.data_fragments as u64 & 0x3F) << 6) + (o.coding_fragments as u64 & 0x3F);
        let low = (packed << RAIN_CODING_OFFSET)
            | ((o.schema as u64 & 0xFF) << RAIN_SCHEMA_OFFSET)
            | ((replica >> 4) << RAIN_REPLICA_HIGH_OFFSET)
            | ((CLASS_RAIN as u64) << CLASS_OFFSET)
            | (replica & 0xF);

        let value = (self.hash.low_bits(HASH_BITS) << HASH_OFFSET)
            | (U160::from_u64(o.version & 0xFFFF_FFFF) << VERSION_OFFSET)
            | (U160::from_u64(o.service_id as u64 & 0xFF) << SERVICE_ID_OFFSET)
            | U160::from_u64(low);
        Key::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(hash: &str, options: ArcKeyOptions) -> Result<Key> {
        ArcKeyBuilder::from_hex(hash)?.with_options(options).build()
    }

    #[test]
    fn test_default_build() {
        let k = build("ABC", ArcKeyOptions::default()).unwrap();
        assert_eq!(
            k.to_hex_padded().to_uppercase(),
            "0000000000000000000ABC00000000C02430C070"
        );

        let k = build("0", ArcKeyOptions::default()).unwrap();
        assert_eq!(k.to_hex_padded(), "000000000000000000000000000000c02430c070");
    }

    #[test]
    fn test_build_with_options() {
        let options = ArcKeyOptions {
            version: 0,
            data_fragments: 3,
            coding_fragments: 3,
            schema: 6,
            replica: 1,
            ..Default::default()
        };
        let k = build("124", options).unwrap();
        assert_eq!(k.to_hex_padded(), "000000000000000000012400000000c00c306071");
        assert!(k.is_rain());
        assert_eq!(k.replica_number(), 1);
        let params = k.rain_params().unwrap();
        assert_eq!((params.data_fragments, params.coding_fragments, params.schema), (3, 3, 6));
    }

    #[test]
    fn test_builder_setters() {
        let k = ArcKeyBuilder::new(U160::from_u64(0x124))
            .with_fragments(3, 3)
            .with_schema(6)
            .with_replica(1)
            .with_version(0)
            .with_service_id(DEFAULT_SERVICE_ID)
            .build()
            .unwrap();
        assert_eq!(k.to_hex_padded(), "000000000000000000012400000000c00c306071");
    }

    #[test]
    fn test_invalid_hash() {
        assert!(matches!(
            ArcKeyBuilder::from_hex("-1"),
            Err(UksError::InvalidHash(_))
        ));
        // 1 << 90
        let k = ArcKeyBuilder::new(U160::ONE << 90).build();
        assert!(matches!(k, Err(UksError::InvalidHash(_))));
        assert!(ArcKeyBuilder::new((U160::ONE << 88).wrapping_sub(U160::ONE)).build().is_ok());
    }

    #[test]
    fn test_invalid_fields() {
        let hash = U160::ONE;
        let b = ArcKeyBuilder::new(hash);

        assert!(matches!(
            b.with_version(1 << 32).build(),
            Err(UksError::InvalidVersion(_))
        ));
        assert!(matches!(
            b.with_service_id(256).build(),
            Err(UksError::InvalidServiceId(256))
        ));
        assert!(matches!(
            b.with_fragments(0, 3).build(),
            Err(UksError::InvalidDataFragments(0))
        ));
        assert!(matches!(
            b.with_fragments(64, 3).with_schema(255).build(),
            Err(UksError::InvalidDataFragments(64))
        ));
        assert!(matches!(
            b.with_fragments(9, 0).build(),
            Err(UksError::InvalidCodingFragments(0))
        ));
        assert!(matches!(
            b.with_schema(0).build(),
            Err(UksError::InvalidSchema(_))
        ));
        assert!(matches!(
            b.with_schema(256).build(),
            Err(UksError::InvalidSchema(_))
        ));
        assert!(matches!(
            b.with_replica(63).build(),
            Err(UksError::InvalidReplica { replica: 63, .. })
        ));
        assert!(matches!(
            b.with_replica(256).build(),
            Err(UksError::InvalidReplica { replica: 256, .. })
        ));
    }

    #[test]
    fn test_oversized_fragment_counts() {
        let options = ArcKeyOptions {
            data_fragments: u32::MAX,
            coding_fragments: 1,
            replica: 300,
            ..Default::default()
        };
        assert_eq!(options.fragments(), u32::MAX);
        assert_eq!(
            options.validate(),
            Err(UksError::InvalidDataFragments(u32::MAX))
        );

        let k = ArcKeyBuilder::new(U160::ONE)
            .with_fragments(9, u32::MAX)
            .with_replica(256)
            .build();
        assert_eq!(k, Err(UksError::InvalidCodingFragments(u32::MAX)));
    }

    #[test]
    fn test_schema_too_low() {
        let k = ArcKeyBuilder::new(U160::ONE)
            .with_fragments(3, 3)
            .with_schema(5)
            .build();
        assert!(matches!(k, Err(UksError::InvalidSchema(_))));
    }

    #[test]
    fn test_unchecked_truncates_fields() {
        let k = ArcKeyBuilder::new(U160::MAX)
            .with_service_id(0x1C0)
            .with_replica(0x1_23)
            .build_unchecked();
        assert_eq!(k.to_hex_padded(), "ffffffffffffffffffffff00000000c02430c273");
        assert_eq!(k.raw_class(), CLASS_RAIN);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ArcKeyOptions = serde_json::from_str(r#"{"schema": 24, "data_fragments": 14, "coding_fragments": 4}"#).unwrap();
        assert_eq!(options.service_id, DEFAULT_SERVICE_ID);
        assert_eq!(options.fragments(), 18);
        assert!(options.validate().is_ok());
    }
}
