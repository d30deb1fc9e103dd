//! Error types for the support crate

use thiserror::Error;
use uks_core::UksError;

/// Result type alias for support operations
pub type Result<T> = std::result::Result<T, SupportError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SupportError {
    #[error("Key error: {0}")]
    Key(#[from] UksError),

    // ===== Float Packing Errors =====
    #[error("Invalid float layout: {bits} bits with {expbits} exponent bits")]
    InvalidLayout { bits: u32, expbits: u32 },

    #[error("Cannot pack non-finite value: {0}")]
    NonFinite(f64),

    #[error("Exponent of {value} does not fit in {expbits} bits")]
    ExponentOutOfRange { value: f64, expbits: u32 },

    // ===== Metadata Record Errors =====
    #[error("Metadata truncated while reading {0}")]
    Truncated(&'static str),

    #[error("Unexpected metadata tag {tag} before {field}")]
    UnexpectedTag { field: &'static str, tag: u8 },

    #[error("Unexpected metadata field: expected {expected}, found {found}")]
    UnexpectedField { expected: &'static str, found: String },

    #[error("Unexpected length for {field}: expected {expected}, got {actual}")]
    UnexpectedLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0} trailing bytes after metadata record")]
    TrailingBytes(usize),
}
