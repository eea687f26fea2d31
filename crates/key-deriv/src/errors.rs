//! Errors for key derivation and key operations.

use coinkey_algebra::AlgebraError;
use thiserror::Error;

/// Error while deriving a key or decoding key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// An extended-key payload is not exactly 78 bytes long.
    #[error("extended-key payload must be 78 bytes, got {0}")]
    InvalidPayloadLength(usize),

    /// A payload's 4-byte version matches neither extended-key version of
    /// the profile it was tried against.
    #[error("version bytes {0:02x?} do not belong to this network profile")]
    UnknownVersion([u8; 4]),

    /// A secret exponent is malformed, zero, or not below the curve order.
    #[error("secret exponent out of range")]
    InvalidSecret,

    /// Point bytes failed curve validation.
    #[error(transparent)]
    InvalidPoint(#[from] AlgebraError),

    /// A derivation path segment is malformed or out of range.
    #[error("invalid derivation path segment {0:?}")]
    InvalidPath(String),

    /// Hardened child indices require the parent's secret exponent.
    #[error("hardened derivation requires a private parent key")]
    HardenedDerivationRequiresPrivateKey,

    /// A legacy seed is not the expected fixed-length hex text.
    #[error("invalid legacy seed: {0}")]
    InvalidSeed(&'static str),

    /// Extended keys cannot be derived past depth 255.
    #[error("maximum derivation depth exceeded")]
    MaxDepthExceeded,
}

/// Error surfaced by key value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The requested operation is meaningless for this key's shape.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// A derivation invoked through the key failed.
    #[error(transparent)]
    Derivation(#[from] DerivationError),
}
