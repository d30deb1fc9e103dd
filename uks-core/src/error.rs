//! Error types for UKS
//!
//! Every constructor and transform in this crate either returns a fully valid
//! value or one of these errors. None of them are transient.

use thiserror::Error;

/// Result type alias for key operations
pub type Result<T> = std::result::Result<T, UksError>;

/// Unified error type for key construction and derivation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UksError {
    // ===== Key Construction Errors =====
    #[error("Invalid key type: {0}")]
    InvalidKeyType(String),

    #[error("Invalid key value: {0}")]
    InvalidKeyValue(String),

    #[error("Invalid class: {0}")]
    InvalidClass(u8),

    // ===== Class of Service Errors =====
    #[error("CoS not recognized: {0}")]
    UnrecognizedCos(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    // ===== ARC Key Builder Errors =====
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Invalid version: {0} (max: 4294967295)")]
    InvalidVersion(u64),

    #[error("Invalid service id: {0} (max: 255)")]
    InvalidServiceId(u32),

    #[error("Invalid number of data fragments: {0} (expected 1..=63)")]
    InvalidDataFragments(u32),

    #[error("Invalid number of coding fragments: {0} (expected 1..=63)")]
    InvalidCodingFragments(u32),

    #[error("Invalid replica number: {replica} (fragments: {fragments})")]
    InvalidReplica { replica: u32, fragments: u32 },

    // ===== Range Errors =====
    #[error("Wrong number of arguments: expected {expected}, got {actual}")]
    WrongArity { expected: usize, actual: usize },
}
