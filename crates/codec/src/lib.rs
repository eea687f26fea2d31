//! Checksum-guarded text encoding and the digest conventions shared by the
//! key byte layouts.
//!
//! The codec is base-58 with a trailing 4-byte double-SHA-256 checksum.
//! Encoding and decoding are pure transforms; decoding fails loudly on any
//! non-alphabet glyph or checksum disagreement and never panics on foreign
//! input.

pub mod base58;
pub mod digest;
pub mod errors;

pub use base58::{decode_check, encode_check};
pub use digest::{double_sha256, hash160};
pub use errors::CodecError;
