//! UKS Support Library
//!
//! The pieces that sit next to the key algebra without being part of it:
//! - Transaction id generation ([`TxIdGenerator`])
//! - Random hex strings and keys ([`random`])
//! - Portable float packing ([`pack754`], [`unpack754`])
//! - The fixed-layout object metadata record ([`ObjectMetadata`])

pub mod error;
pub mod ieee754;
pub mod metadata;
pub mod random;
pub mod txid;

pub use error::{Result, SupportError};
pub use ieee754::{pack754, unpack754};
pub use metadata::ObjectMetadata;
pub use random::{random_arc_key, random_hex, random_key, random_plain_key};
pub use txid::{TransactionIdSource, TxIdGenerator};
