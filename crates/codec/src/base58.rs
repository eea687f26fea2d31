//! Base-58 text with a trailing double-SHA-256 checksum.

use crate::{digest::double_sha256, errors::CodecError};

/// Number of checksum bytes appended to every payload.
const CHECKSUM_LEN: usize = 4;

/// Encodes `payload` as base-58 text with its 4-byte checksum appended.
///
/// Leading zero bytes of the payload are preserved as leading `1` glyphs.
pub fn encode_check(payload: &[u8]) -> String {
    let mut buf = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&double_sha256(payload)[..CHECKSUM_LEN]);
    bs58::encode(buf).into_string()
}

/// Decodes checksum-guarded base-58 text back into its payload bytes.
pub fn decode_check(text: &str) -> Result<Vec<u8>, CodecError> {
    let decoded = bs58::decode(text).into_vec().map_err(|err| match err {
        bs58::decode::Error::InvalidCharacter { character, index } => {
            CodecError::InvalidCharacter { character, index }
        }
        bs58::decode::Error::NonAsciiCharacter { index } => invalid_character(text, index),
        // remaining variants concern fixed-size output buffers and cannot
        // occur when decoding into a Vec
        _ => CodecError::ChecksumMismatch,
    })?;

    if decoded.len() < CHECKSUM_LEN {
        return Err(CodecError::ChecksumMismatch);
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if double_sha256(payload)[..CHECKSUM_LEN] != *checksum {
        return Err(CodecError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

fn invalid_character(text: &str, index: usize) -> CodecError {
    let character = text
        .get(index..)
        .and_then(|tail| tail.chars().next())
        .unwrap_or('\u{fffd}');
    CodecError::InvalidCharacter { character, index }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

    #[test]
    fn known_address_text_round_trips() {
        let payload = decode_check("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").unwrap();
        assert_eq!(payload.len(), 21);
        assert_eq!(payload[0], 0x00);
        assert_eq!(encode_check(&payload), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    }

    #[test]
    fn leading_zero_bytes_become_leading_ones() {
        let text = encode_check(&[0x00, 0x00, 0x01]);
        assert!(text.starts_with("11"));
        assert_eq!(decode_check(&text).unwrap(), vec![0x00, 0x00, 0x01]);
    }

    #[test]
    fn rejects_non_alphabet_glyphs() {
        assert_eq!(
            decode_check("0pqr"),
            Err(CodecError::InvalidCharacter { character: '0', index: 0 })
        );
        assert!(matches!(
            decode_check("1Bgé"),
            Err(CodecError::InvalidCharacter { character: 'é', .. })
        ));
    }

    #[test]
    fn rejects_tampered_checksums() {
        // flip the final glyph of a valid encoding to another alphabet glyph
        let text = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMJ";
        assert_eq!(decode_check(text), Err(CodecError::ChecksumMismatch));
    }

    #[test]
    fn rejects_text_shorter_than_a_checksum() {
        assert_eq!(decode_check(""), Err(CodecError::ChecksumMismatch));
        assert_eq!(decode_check("2"), Err(CodecError::ChecksumMismatch));
    }

    proptest! {
        #[test]
        fn round_trips_payloads_up_to_80_bytes(
            payload in proptest::collection::vec(any::<u8>(), 0..=80),
        ) {
            let text = encode_check(&payload);
            prop_assert_eq!(decode_check(&text).unwrap(), payload);
        }

        #[test]
        fn any_single_glyph_substitution_fails_to_decode(
            payload in proptest::collection::vec(any::<u8>(), 1..=40),
            position in any::<prop::sample::Index>(),
        ) {
            let text = encode_check(&payload);
            let position = position.index(text.len());
            let original = text.as_bytes()[position] as char;
            let substitute = {
                let at = ALPHABET.find(original).expect("encoder output is in-alphabet");
                ALPHABET.as_bytes()[(at + 1) % ALPHABET.len()] as char
            };
            let mut corrupted = text.clone();
            corrupted.replace_range(position..=position, &substitute.to_string());
            prop_assert!(decode_check(&corrupted).is_err());
        }
    }
}
