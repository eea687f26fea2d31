//! Fixed-width big-endian scalar encoding.

use num_bigint::BigUint;

/// Encodes `v` as exactly 32 big-endian bytes, zero-padded on the left.
///
/// Callers reduce modulo the curve order or field prime first; anything
/// wider than 256 bits keeps only its low 256 bits.
pub fn to_bytes_32(v: &BigUint) -> [u8; 32] {
    let raw = v.to_bytes_be();
    let mut out = [0u8; 32];
    if raw.len() >= 32 {
        out.copy_from_slice(&raw[raw.len() - 32..]);
    } else {
        out[32 - raw.len()..].copy_from_slice(&raw);
    }
    out
}

/// Decodes 32 big-endian bytes into an unsigned integer.
pub fn from_bytes_32(bytes: &[u8; 32]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_and_pads() {
        let one = BigUint::from(1u32);
        let encoded = to_bytes_32(&one);
        assert_eq!(encoded[..31], [0u8; 31]);
        assert_eq!(encoded[31], 1);
        assert_eq!(from_bytes_32(&encoded), one);
    }

    #[test]
    fn keeps_low_bits_of_wide_values() {
        let wide = BigUint::from(1u32) << 256usize;
        assert_eq!(to_bytes_32(&wide), [0u8; 32]);
        assert_eq!(to_bytes_32(&(wide + 5u32))[31], 5);
    }
}
