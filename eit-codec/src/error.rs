//! Error types for EIT decoding.

use thiserror::Error;

/// Errors raised while decoding an EIT buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EitError {
    /// A length field promised more bytes than the buffer holds.
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },
}
