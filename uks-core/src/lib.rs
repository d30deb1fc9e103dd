//! UKS Core Library
//!
//! Fixed-width 160-bit object keys for a distributed content store.
//! A key carries its own placement metadata, so any node can compute the keys
//! of all sibling replicas or erasure-coded fragments without a lookup table.
//!
//! This crate provides:
//! - A fixed-width 160-bit unsigned integer ([`U160`])
//! - Keys with class, replica and RAIN field accessors ([`Key`])
//! - Replica/fragment derivation driven by the scheme table ([`scheme`])
//! - Circular keyspace ranges and their intersection ([`KeyRange`])
//! - Class-of-service parsing and key transforms ([`ClassOfService`])
//! - Erasure-coded key construction ([`ArcKeyBuilder`])

pub mod arc;
pub mod cos;
pub mod error;
pub mod key;
pub mod range;
pub mod replica;
pub mod scheme;
pub mod uint;

pub use arc::{ArcKeyBuilder, ArcKeyOptions};
pub use cos::ClassOfService;
pub use error::{Result, UksError};
pub use key::{is_valid_class, Key, KeyInput, RainParams, CLASS_RAIN};
pub use range::KeyRange;
pub use scheme::{Placement, ReplicaScheme, SCHEME_TABLE};
pub use uint::{U160, KEY_BITS, KEY_HEX_DIGITS};
