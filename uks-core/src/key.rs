//! Object keys
//!
//! A key is a 160-bit value whose low bits carry placement metadata:
//!
//! ```text
//!  159                                   8 7     4 3     0
//! +---------------------------------------+-------+-------+
//! |            entropy (152 bits)         | class |replica|
//! +---------------------------------------+-------+-------+
//!
//! class 7 (RAIN, erasure coded):
//!  159               32 31  26 25  20 19    12 11   8 7   4 3   0
//! +-------------------+------+------+--------+------+-----+-----+
//! | entropy (128 bits)|  k   |  m   | schema | r hi |  7  | r lo|
//! +-------------------+------+------+--------+------+-----+-----+
//! ```
//!
//! Keys are plain values: they never change after construction and can be
//! shared freely between threads.

use crate::error::{Result, UksError};
use crate::scheme;
use crate::uint::{U160, KEY_HEX_DIGITS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Class value of erasure-coded (RAIN) keys
pub const CLASS_RAIN: u8 = 7;

/// Highest class served by plain `class + 1` replication
pub const MAX_PLAIN_CLASS: u8 = 5;

pub(crate) const REPLICA_OFFSET: u32 = 0;
pub(crate) const CLASS_OFFSET: u32 = 4;
pub(crate) const RAIN_REPLICA_HIGH_OFFSET: u32 = 8;
pub(crate) const RAIN_SCHEMA_OFFSET: u32 = 12;
pub(crate) const RAIN_CODING_OFFSET: u32 = 20;
pub(crate) const RAIN_DATA_OFFSET: u32 = 26;

/// Bits of metadata below the entropy field of a plain key
pub const PLAIN_METADATA_BITS: u32 = 8;

/// Bits of metadata below the entropy field of a RAIN key
pub const RAIN_METADATA_BITS: u32 = 32;

/// Erasure-coding shape stored in a RAIN key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RainParams {
    /// Data fragments (k)
    pub data_fragments: u8,
    /// Coding fragments (m)
    pub coding_fragments: u8,
    /// Ring divisor
    pub schema: u8,
}

impl RainParams {
    /// Total fragments (k + m)
    pub fn fragments(&self) -> u32 {
        self.data_fragments as u32 + self.coding_fragments as u32
    }
}

/// Anything a key can be built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    /// Base-16 text, at most 40 digits, no sign
    Hex(String),
    /// Signed integer; negative values are rejected
    Int(i128),
    /// Raw 160-bit value
    Value(U160),
    /// Copy of an existing key
    Key(Key),
}

impl From<&str> for KeyInput {
    fn from(s: &str) -> Self {
        KeyInput::Hex(s.to_string())
    }
}

impl From<String> for KeyInput {
    fn from(s: String) -> Self {
        KeyInput::Hex(s)
    }
}

impl From<&String> for KeyInput {
    fn from(s: &String) -> Self {
        KeyInput::Hex(s.clone())
    }
}

impl From<i32> for KeyInput {
    fn from(v: i32) -> Self {
        KeyInput::Int(v as i128)
    }
}

impl From<i64> for KeyInput {
    fn from(v: i64) -> Self {
        KeyInput::Int(v as i128)
    }
}

impl From<u32> for KeyInput {
    fn from(v: u32) -> Self {
        KeyInput::Int(v as i128)
    }
}

impl From<u64> for KeyInput {
    fn from(v: u64) -> Self {
        KeyInput::Int(v as i128)
    }
}

impl From<u128> for KeyInput {
    fn from(v: u128) -> Self {
        KeyInput::Value(U160::from_u128(v))
    }
}

impl From<U160> for KeyInput {
    fn from(v: U160) -> Self {
        KeyInput::Value(v)
    }
}

impl From<Key> for KeyInput {
    fn from(k: Key) -> Self {
        KeyInput::Key(k)
    }
}

impl From<&Key> for KeyInput {
    fn from(k: &Key) -> Self {
        KeyInput::Key(*k)
    }
}

impl TryFrom<&serde_json::Value> for KeyInput {
    type Error = UksError;

    /// Accept JSON strings and integers; every other JSON type is rejected
    fn try_from(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::String(s) => Ok(KeyInput::Hex(s.clone())),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(KeyInput::Int(v as i128))
                } else if let Some(v) = n.as_i64() {
                    Ok(KeyInput::Int(v as i128))
                } else {
                    Err(UksError::InvalidKeyValue(format!(
                        "not an integer: {}",
                        n
                    )))
                }
            }
            Value::Null => Err(UksError::InvalidKeyType("null".to_string())),
            Value::Bool(_) => Err(UksError::InvalidKeyType("boolean".to_string())),
            Value::Array(_) => Err(UksError::InvalidKeyType("array".to_string())),
            Value::Object(_) => Err(UksError::InvalidKeyType("object".to_string())),
        }
    }
}

/// 160-bit object key
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(U160);

impl Key {
    /// Build a key from any supported input
    pub fn new(input: impl Into<KeyInput>) -> Result<Self> {
        match input.into() {
            KeyInput::Hex(s) => Self::from_hex(&s),
            KeyInput::Int(v) => {
                if v < 0 {
                    return Err(UksError::InvalidKeyValue(format!(
                        "value must not be negative: {}",
                        v
                    )));
                }
                Ok(Self(U160::from_u128(v as u128)))
            }
            KeyInput::Value(v) => Ok(Self(v)),
            KeyInput::Key(k) => Ok(k),
        }
    }

    /// Parse from hex (at most 40 digits, either case)
    pub fn from_hex(hex: &str) -> Result<Self> {
        U160::from_hex(hex).map(Self)
    }

    /// Wrap a raw 160-bit value
    pub const fn from_value(value: U160) -> Self {
        Self(value)
    }

    /// The key as an integer
    pub fn value(&self) -> U160 {
        self.0
    }

    /// Class nibble (bits 4-7), whether or not it is a known class
    pub fn raw_class(&self) -> u8 {
        self.0.field(CLASS_OFFSET, 4) as u8
    }

    /// Class of the key, or `None` when the class nibble is not a known class
    pub fn class(&self) -> Option<u8> {
        let class = self.raw_class();
        is_valid_class(class).then_some(class)
    }

    /// Whether this is an erasure-coded key
    pub fn is_rain(&self) -> bool {
        self.raw_class() == CLASS_RAIN
    }

    /// Replica (or fragment) number.
    ///
    /// RAIN keys split it in two nibbles, bits 8-11 high and bits 0-3 low.
    pub fn replica_number(&self) -> u8 {
        let low = self.0.field(REPLICA_OFFSET, 4) as u8;
        if self.is_rain() {
            let high = self.0.field(RAIN_REPLICA_HIGH_OFFSET, 4) as u8;
            (high << 4) | low
        } else {
            low
        }
    }

    /// Data fragment field (bits 26-31), read regardless of class
    pub fn data_fragments(&self) -> u8 {
        self.0.field(RAIN_DATA_OFFSET, 6) as u8
    }

    /// Coding fragment field (bits 20-25), read regardless of class
    pub fn coding_fragments(&self) -> u8 {
        self.0.field(RAIN_CODING_OFFSET, 6) as u8
    }

    /// Schema field (bits 12-19), read regardless of class
    pub fn rain_schema(&self) -> u8 {
        self.0.field(RAIN_SCHEMA_OFFSET, 8) as u8
    }

    pub(crate) fn rain_fields(&self) -> RainParams {
        RainParams {
            data_fragments: self.data_fragments(),
            coding_fragments: self.coding_fragments(),
            schema: self.rain_schema(),
        }
    }

    /// Erasure-coding shape, only for RAIN keys
    pub fn rain_params(&self) -> Option<RainParams> {
        self.is_rain().then(|| self.rain_fields())
    }

    /// Lowercase hex without leading zeros
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Lowercase hex, zero-padded to exactly 40 digits
    pub fn to_hex_padded(&self) -> String {
        self.0.to_hex_padded()
    }

    /// Circular membership in `[lo, hi]`.
    ///
    /// `lo == hi` covers the whole ring. When `lo > hi` the interval wraps
    /// through zero and the key must be above `lo` or at most `hi`.
    pub fn is_between(&self, lo: &Key, hi: &Key) -> bool {
        let (v, lo, hi) = (self.0, lo.0, hi.0);
        if lo == hi {
            true
        } else if lo > hi {
            v > lo || v <= hi
        } else {
            lo <= v && v <= hi
        }
    }
}

/// Whether `class` names a replication policy this crate understands
pub fn is_valid_class(class: u8) -> bool {
    class <= MAX_PLAIN_CLASS || class == CLASS_RAIN || scheme::lookup(class).is_some()
}

impl From<U160> for Key {
    fn from(value: U160) -> Self {
        Self(value)
    }
}

impl FromStr for Key {
    type Err = UksError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.to_hex_padded())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_padded())
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex_padded())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct KeyVisitor;

        impl serde::de::Visitor<'_> for KeyVisitor {
            type Value = Key;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a hex string of at most {} digits or a non-negative integer", KEY_HEX_DIGITS)
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Key, E> {
                Key::from_hex(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<Key, E> {
                Key::new(v).map_err(E::custom)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<Key, E> {
                Key::new(v).map_err(E::custom)
            }

            fn visit_u128<E: serde::de::Error>(self, v: u128) -> std::result::Result<Key, E> {
                Key::new(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}
