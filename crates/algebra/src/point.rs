//! Affine curve points.

use num_bigint::BigUint;

/// A point on a short-Weierstrass curve: either the group identity or an
/// affine coordinate pair reduced modulo the field prime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Point {
    /// The group identity (point at infinity).
    Infinity,
    /// An affine point.
    Affine {
        /// The x coordinate.
        x: BigUint,
        /// The y coordinate.
        y: BigUint,
    },
}

impl Point {
    /// Returns `true` for the group identity.
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// The affine coordinates, or `None` for the identity.
    pub fn coords(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            Point::Infinity => None,
            Point::Affine { x, y } => Some((x, y)),
        }
    }
}
