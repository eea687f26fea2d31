//! Elliptic-curve key algebra over prime fields.
//!
//! Affine point arithmetic, scalar multiplication, and SEC-style point
//! serialization for the curves referenced by the network profile registry.
//! All arithmetic is modular over [`num_bigint::BigUint`]; there is no
//! floating point, and the multiplication loop always walks a full 256-bit
//! window rather than exiting at the scalar's bit length.

pub mod curve;
pub mod errors;
pub mod point;
pub mod scalar;

pub use curve::{secp256k1, Curve};
pub use errors::AlgebraError;
pub use point::Point;
pub use scalar::{from_bytes_32, to_bytes_32};
