//! Text parsing and format/network dispatch.
//!
//! Given only a string and an ordered list of network profiles, the
//! dispatcher determines which of the mutually exclusive key encodings the
//! text represents and which network it belongs to. Foreign and malformed
//! input yields `None`; no probe failure escapes to the caller.

use coinkey_codec::decode_check;
use coinkey_key_deriv::{
    electrum::MASTER_HEX_LEN, AddressKey, DerivationError, ElectrumKey, HdKey, Key, WifKey,
};
use coinkey_params::NetworkProfile;
use num_bigint::BigUint;
use thiserror::Error;
use tracing::{debug, trace};

/// Marker prefix of legacy-seed text.
const ELECTRUM_MARKER: &str = "E:";

/// The encodings the dispatcher probes, in their fixed order.
const KINDS: [Kind; 4] = [Kind::Hd, Kind::Wif, Kind::Electrum, Kind::Address];

#[derive(Clone, Copy, Debug)]
enum Kind {
    Hd,
    Wif,
    Electrum,
    Address,
}

/// Why one `kind × profile` candidate was rejected. Consumed internally and
/// only ever surfaced as a trace event.
#[derive(Debug, Error)]
enum Reject {
    /// The payload shape (length, markers, trailing bytes) does not fit the
    /// probed kind.
    #[error("payload shape does not fit this kind")]
    Shape,

    /// The version byte belongs to no encoding of the probed profile.
    #[error("version byte does not belong to this profile")]
    Version,

    /// The candidate was structurally plausible but its key material failed
    /// validation.
    #[error(transparent)]
    Derivation(#[from] DerivationError),
}

/// Parses `text` against each encoding kind in fixed order (extended key,
/// WIF, legacy-seed marker form, address) and each profile in the
/// caller-supplied order, returning the first key that fully validates.
///
/// When a payload validates under two profiles with colliding version bytes,
/// the earlier profile in `networks` wins; the scan is sequential and
/// deterministic.
pub fn key_from_text(text: &str, networks: &[&'static NetworkProfile]) -> Option<Key> {
    // the checksum transform is profile-independent, so run it only once
    let payload = decode_check(text).ok();

    for kind in KINDS {
        for network in networks {
            let attempt = match (kind, payload.as_deref()) {
                (Kind::Hd, Some(payload)) => parse_hd(payload, network),
                (Kind::Wif, Some(payload)) => parse_wif(payload, network),
                (Kind::Electrum, _) => parse_electrum(text, network),
                (Kind::Address, Some(payload)) => parse_address(payload, network),
                _ => continue,
            };
            match attempt {
                Ok(key) => {
                    debug!(network = network.code(), ?kind, "parsed key text");
                    return Some(key);
                }
                Err(reason) => {
                    trace!(network = network.code(), ?kind, %reason, "candidate rejected");
                }
            }
        }
    }
    None
}

fn parse_hd(payload: &[u8], network: &'static NetworkProfile) -> Result<Key, Reject> {
    Ok(Key::Hd(HdKey::from_bytes(payload, network)?))
}

fn parse_wif(payload: &[u8], network: &'static NetworkProfile) -> Result<Key, Reject> {
    let (version, rest) = payload.split_first().ok_or(Reject::Shape)?;
    let (secret_bytes, compressed) = match rest.len() {
        32 => (rest, false),
        33 if rest[32] == 0x01 => (&rest[..32], true),
        _ => return Err(Reject::Shape),
    };
    if *version != network.versions().wif {
        return Err(Reject::Version);
    }
    let secret = BigUint::from_bytes_be(secret_bytes);
    Ok(Key::Wif(WifKey::from_secret_exponent(
        secret, compressed, network,
    )?))
}

fn parse_electrum(text: &str, network: &'static NetworkProfile) -> Result<Key, Reject> {
    let body = text.strip_prefix(ELECTRUM_MARKER).ok_or(Reject::Shape)?;
    let key = if body.len() == MASTER_HEX_LEN {
        ElectrumKey::from_master_secret_hex(body, network)?
    } else {
        ElectrumKey::from_seed(body, network)?
    };
    Ok(Key::Electrum(key))
}

fn parse_address(payload: &[u8], network: &'static NetworkProfile) -> Result<Key, Reject> {
    match payload {
        [version, hash @ ..] if hash.len() == 20 => {
            if *version != network.versions().address {
                return Err(Reject::Version);
            }
            let mut hash160 = [0u8; 20];
            hash160.copy_from_slice(hash);
            Ok(Key::Address(AddressKey::new(hash160, network)))
        }
        _ => Err(Reject::Shape),
    }
}

#[cfg(test)]
mod tests {
    use coinkey_params::lookup;

    use super::*;

    const MAINNET_XPRV: &str = "xprv9s21ZrQH143K31AgNK5pyVvW23gHnkBq2wh5aEk6g1s496M8ZMjxncCKZKgb5jZoY5eSJMJ2Vbyvi2hbmQnCuHBujZ2WXGTux1X2k9Krdtq";
    const MAINNET_XPUB: &str = "xpub661MyMwAqRbcFVF9ULcqLdsEa5WnCCugQAcgNd9iEMQ31tgH6u4DLQWoQayvtSVYFvXz2vPPpbXE1qpjoUFidhjFj82pVShWu9curWmb2zy";
    const TESTNET_TPRV: &str = "tprv8ZgxMBicQKsPdpQD2swL99YVLB6W2GDqNVcCSfAZ9zMXvh6DYj5iJMZmUVrF66x7uXBDJSunexZjAtFLtd89iLTWGCEpBdBxs7GTBnEksxV";
    const SECRET_HEX: &str = "91880b0e3017ba586b735fe7d04f1790f3c46b818a2151fb2def5f14dd2fd9c3";

    fn networks() -> Vec<&'static NetworkProfile> {
        vec![lookup("BTC").unwrap(), lookup("XTN").unwrap()]
    }

    fn secret_of(key: &Key) -> String {
        format!("{:064x}", key.secret_exponent().unwrap())
    }

    #[test]
    fn parses_a_mainnet_private_extended_key() {
        let key = key_from_text(MAINNET_XPRV, &networks()).unwrap();
        assert_eq!(key.network().code(), "BTC");
        assert_eq!(secret_of(&key), SECRET_HEX);
        assert_eq!(key.address(false), "19Vqc8uLTfUonmxUEZac7fz1M5c5ZZbAii");
        assert_eq!(key.address(true), "1MwkRkogzBRMehBntgcq2aJhXCXStJTXHT");

        let child = key.subkey_for_path("0").unwrap();
        assert_eq!(child.address(false), "1NV3j6NgeAkWBytXiQkWxMFLBtTdbef1rp");
    }

    #[test]
    fn parses_a_mainnet_public_extended_key() {
        let key = key_from_text(MAINNET_XPUB, &networks()).unwrap();
        assert_eq!(key.secret_exponent(), None);
        assert_eq!(key.address(false), "19Vqc8uLTfUonmxUEZac7fz1M5c5ZZbAii");
        assert_eq!(key.address(true), "1MwkRkogzBRMehBntgcq2aJhXCXStJTXHT");

        let child = key.subkey_for_path("0").unwrap();
        assert_eq!(child.address(false), "1NV3j6NgeAkWBytXiQkWxMFLBtTdbef1rp");
    }

    #[test]
    fn parses_the_same_material_under_a_testnet_profile() {
        let key = key_from_text(TESTNET_TPRV, &networks()).unwrap();
        assert_eq!(key.network().code(), "XTN");
        assert_eq!(secret_of(&key), SECRET_HEX);
        assert_eq!(key.address(false), "mp1nuBzKGgv4ZtS5x8YywbCLD5CnVfT7hV");
        assert_eq!(key.address(true), "n2ThiotfoCrcRofQcFbCrVX2PC89s2KUjh");

        let child = key.subkey_for_path("0").unwrap();
        assert_eq!(child.address(false), "n31129TfTCBky6N9RyitnGTf3t4LYwCV6A");
    }

    #[test]
    fn profile_order_only_breaks_genuine_ties() {
        // version bytes disambiguate these, so reversing the caller's order
        // still lands on the right profile
        let reversed = vec![lookup("XTN").unwrap(), lookup("BTC").unwrap()];
        let key = key_from_text(MAINNET_XPRV, &reversed).unwrap();
        assert_eq!(key.network().code(), "BTC");
    }

    #[test]
    fn parses_wif_text() {
        let key = key_from_text("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn", &networks())
            .unwrap();
        assert_eq!(key.secret_exponent(), Some(&BigUint::from(1u32)));
        assert!(matches!(key, Key::Wif(_)));
    }

    #[test]
    fn parses_legacy_seed_text() {
        let key = key_from_text("E:00000000000000000000000000000001", &networks()).unwrap();
        assert_eq!(
            secret_of(&key),
            "2ccdb632d4630c8e5a417858f70876afe5585c15b1c0940771af9ac160201b1d"
        );
        assert_eq!(key.address(true), "16e8FARWaEo7Cf2rYxzr8Lg3S8JP2dwBxh");
        // the marker form carries no version byte, so the first profile claims it
        assert_eq!(key.network().code(), "BTC");

        let child = key.subkey(1, false).unwrap();
        assert_eq!(
            child.wif(true).unwrap(),
            "5KYqyRxoMGnwsXfEFWtVifAKTzU9RcAZu1hme6GLMECKdWHybns"
        );
    }

    #[test]
    fn parses_an_already_stretched_legacy_master() {
        let key = key_from_text(
            "E:0000000000000000000000000000000000000000000000000000000000000001",
            &networks(),
        )
        .unwrap();
        assert_eq!(key.secret_exponent(), Some(&BigUint::from(1u32)));
    }

    #[test]
    fn parses_address_text_to_an_address_only_key() {
        let text = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
        let key = key_from_text(text, &networks()).unwrap();
        assert!(matches!(key, Key::Address(_)));
        assert_eq!(key.secret_exponent(), None);
        assert_eq!(key.address(false), text);
        assert_eq!(key.address(true), text);
    }

    #[test]
    fn rejects_corrupted_text_of_every_kind() {
        // each is a valid encoding with its final character changed
        for corrupted in [
            "xprv9s21ZrQH143K31AgNK5pyVvW23gHnkBq2wh5aEk6g1s496M8ZMjxncCKZKgb5jZoY5eSJMJ2Vbyvi2hbmQnCuHBujZ2WXGTux1X2k9Krdtr",
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWo",
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMW",
            "E:0000000000000000000000000000000g",
        ] {
            assert!(key_from_text(corrupted, &networks()).is_none());
        }
    }

    #[test]
    fn every_single_glyph_substitution_of_a_wif_fails_to_parse() {
        let text = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";
        for position in 0..text.len() {
            let mut corrupted = text.as_bytes().to_vec();
            corrupted[position] = if corrupted[position] == b'2' { b'3' } else { b'2' };
            let corrupted = String::from_utf8(corrupted).unwrap();
            assert!(
                key_from_text(&corrupted, &networks()).is_none(),
                "substitution at {position} should not parse"
            );
        }
    }

    #[test]
    fn rejects_foreign_input_outright() {
        for text in ["", "hello world", "E:", "E:zz", "m/44'/0'/0'", "🔑"] {
            assert!(key_from_text(text, &networks()).is_none());
        }
    }

    #[test]
    fn rejects_keys_from_unlisted_networks() {
        let mainnet_only = vec![lookup("BTC").unwrap()];
        assert!(key_from_text(TESTNET_TPRV, &mainnet_only).is_none());
        let testnet_only = vec![lookup("XTN").unwrap()];
        assert!(key_from_text(MAINNET_XPRV, &testnet_only).is_none());
    }
}
