//! Errors for the curve algebra.

use thiserror::Error;

/// Error while validating or transforming curve points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    /// The bytes (or coordinates) do not describe a point on the curve.
    #[error("not a valid curve point: {0}")]
    InvalidPoint(&'static str),
}
