//! Derivation path text.

use crate::errors::DerivationError;

/// First index of the hardened child space.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Parses `/`-separated derivation path text into child indices.
///
/// Each segment is an unsigned index below 2^31, optionally suffixed with a
/// hardening marker (`'`, `h`, or `H`); hardened segments map into the upper
/// index space. A leading `m` segment is accepted and ignored.
pub fn parse_path(path: &str) -> Result<Vec<u32>, DerivationError> {
    let mut segments = path.split('/').peekable();
    if segments.peek() == Some(&"m") {
        segments.next();
    }
    segments.map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Result<u32, DerivationError> {
    let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H']) {
        Some(digits) => (digits, true),
        None => (segment, false),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DerivationError::InvalidPath(segment.to_owned()));
    }
    let index: u32 = digits
        .parse()
        .map_err(|_| DerivationError::InvalidPath(segment.to_owned()))?;
    if index >= HARDENED_OFFSET {
        return Err(DerivationError::InvalidPath(segment.to_owned()));
    }
    Ok(if hardened { index + HARDENED_OFFSET } else { index })
}
