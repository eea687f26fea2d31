//! Key derivation engines and key value objects.
//!
//! Two derivation schemes share the curve algebra: the tree-structured
//! extended-key scheme (hardened and normal children, arbitrary path depth)
//! and the flat legacy scheme (a stretched seed plus a sequence index and a
//! change flag). [`Key`] is the immutable sum type callers hold; every
//! derivation produces a new value.

pub mod electrum;
pub mod errors;
pub mod hd;
pub mod key;
pub mod paths;

pub use electrum::ElectrumKey;
pub use errors::{DerivationError, KeyError};
pub use hd::HdKey;
pub use key::{AddressKey, Key, WifKey};
pub use paths::HARDENED_OFFSET;
