//! Errors for the checksum codec.

use thiserror::Error;

/// Error while decoding checksum-guarded text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The text contains a glyph outside the base-58 alphabet.
    #[error("invalid character {character:?} at position {index}")]
    InvalidCharacter {
        /// The offending glyph.
        character: char,
        /// Byte position of the glyph in the input text.
        index: usize,
    },

    /// The trailing 4 checksum bytes disagree with the payload, or the
    /// decoded blob is too short to carry a checksum at all.
    #[error("checksum mismatch")]
    ChecksumMismatch,
}
