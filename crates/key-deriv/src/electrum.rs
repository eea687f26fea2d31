//! Flat legacy derivation from stretched seeds.
//!
//! Structurally distinct from the tree scheme: there is no chain code and no
//! path, only a master secret plus `(sequence index, change flag)` children.
//! Keys of this scheme canonically serialize uncompressed.

use coinkey_algebra::Point;
use coinkey_codec::double_sha256;
use coinkey_params::NetworkProfile;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::{errors::DerivationError, hd::validate_scalar};

/// Rounds of single-hash stretching applied to a raw seed.
const STRETCH_ROUNDS: usize = 100_000;

/// Text length of a raw (unstretched) seed in hex digits.
pub const SEED_HEX_LEN: usize = 32;

/// Text length of an already-stretched master secret in hex digits.
pub const MASTER_HEX_LEN: usize = 64;

/// A legacy flat-scheme key: a master secret or one of its sequence
/// children. Always private.
#[derive(Clone, Debug)]
pub struct ElectrumKey {
    network: &'static NetworkProfile,
    secret: BigUint,
    point: Point,
    sequence: Option<(u32, bool)>,
}

impl ElectrumKey {
    /// Builds a master key by stretching raw seed text (exactly
    /// [`SEED_HEX_LEN`] hex digits).
    pub fn from_seed(
        seed: &str,
        network: &'static NetworkProfile,
    ) -> Result<Self, DerivationError> {
        check_hex(seed, SEED_HEX_LEN)?;
        let secret = stretch_seed(seed) % network.curve().order();
        validate_scalar(&secret, network.curve())?;
        Ok(Self::new(secret, None, network))
    }

    /// Wraps an already-stretched master secret (exactly [`MASTER_HEX_LEN`]
    /// hex digits), bypassing the stretch.
    pub fn from_master_secret_hex(
        text: &str,
        network: &'static NetworkProfile,
    ) -> Result<Self, DerivationError> {
        check_hex(text, MASTER_HEX_LEN)?;
        let secret = BigUint::parse_bytes(text.as_bytes(), 16)
            .ok_or(DerivationError::InvalidSeed("seed text contains a non-hex glyph"))?;
        validate_scalar(&secret, network.curve())?;
        Ok(Self::new(secret, None, network))
    }

    fn new(secret: BigUint, sequence: Option<(u32, bool)>, network: &'static NetworkProfile) -> Self {
        let curve = network.curve();
        let point = curve.multiply(&secret, curve.generator());
        Self {
            network,
            secret,
            point,
            sequence,
        }
    }

    /// Derives the flat-sequence child at `(index, is_change)`.
    ///
    /// The offset is the double hash of `"{index}:{change}:"` followed by
    /// the key's uncompressed point coordinates.
    pub fn subkey(&self, index: u32, is_change: bool) -> Self {
        let offset = BigUint::from_bytes_be(&double_sha256(&self.subkey_message(index, is_change)));
        let secret = (&self.secret + offset) % self.network.curve().order();
        Self::new(secret, Some((index, is_change)), self.network)
    }

    /// Derives along path text of the form `"index"` or `"index/change"`
    /// with a change component of `0` or `1`.
    pub fn subkey_for_path(&self, path: &str) -> Result<Self, DerivationError> {
        let invalid = || DerivationError::InvalidPath(path.to_owned());
        let (index_text, change_text) = match path.split_once('/') {
            Some((index_text, change_text)) => (index_text, Some(change_text)),
            None => (path, None),
        };
        if index_text.is_empty() || !index_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let index: u32 = index_text.parse().map_err(|_| invalid())?;
        let is_change = match change_text {
            None | Some("0") => false,
            Some("1") => true,
            Some(_) => return Err(invalid()),
        };
        Ok(self.subkey(index, is_change))
    }

    fn subkey_message(&self, index: u32, is_change: bool) -> Vec<u8> {
        let mpk = self
            .network
            .curve()
            .serialize_point(&self.point, false)
            .expect("key points are never the identity");
        let mut message = format!("{}:{}:", index, u8::from(is_change)).into_bytes();
        message.extend_from_slice(&mpk[1..]);
        message
    }

    /// The profile this key belongs to.
    pub fn network(&self) -> &'static NetworkProfile {
        self.network
    }

    /// The secret exponent.
    pub fn secret_exponent(&self) -> &BigUint {
        &self.secret
    }

    /// The public point.
    pub fn public_point(&self) -> &Point {
        &self.point
    }

    /// The `(index, change)` position of a derived child; `None` on masters.
    pub fn sequence(&self) -> Option<(u32, bool)> {
        self.sequence
    }
}

/// 100k-round digest stretch over the ASCII seed text, as the legacy scheme
/// defined it.
fn stretch_seed(seed: &str) -> BigUint {
    let seed = seed.as_bytes();
    let mut running = seed.to_vec();
    for _ in 0..STRETCH_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(&running);
        hasher.update(seed);
        running = hasher.finalize().to_vec();
    }
    BigUint::from_bytes_be(&running)
}

fn check_hex(text: &str, expected_len: usize) -> Result<(), DerivationError> {
    if text.len() != expected_len {
        return Err(DerivationError::InvalidSeed("seed text has the wrong length"));
    }
    if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DerivationError::InvalidSeed("seed text contains a non-hex glyph"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use coinkey_params::lookup;
    use num_traits::One;

    use super::*;

    const SEED: &str = "00000000000000000000000000000001";

    fn btc() -> &'static NetworkProfile {
        lookup("BTC").unwrap()
    }

    #[test]
    fn stretching_the_known_seed_yields_the_known_master() {
        let key = ElectrumKey::from_seed(SEED, btc()).unwrap();
        let expected = BigUint::parse_bytes(
            b"2ccdb632d4630c8e5a417858f70876afe5585c15b1c0940771af9ac160201b1d",
            16,
        )
        .unwrap();
        assert_eq!(key.secret_exponent(), &expected);
        assert_eq!(key.sequence(), None);
    }

    #[test]
    fn an_already_stretched_master_bypasses_the_stretch() {
        let text = "0000000000000000000000000000000000000000000000000000000000000001";
        let key = ElectrumKey::from_master_secret_hex(text, btc()).unwrap();
        assert!(key.secret_exponent().is_one());
    }

    #[test]
    fn subkey_path_text_maps_to_sequence_positions() {
        let key = ElectrumKey::from_master_secret_hex(
            "0000000000000000000000000000000000000000000000000000000000000001",
            btc(),
        )
        .unwrap();
        assert_eq!(key.subkey_for_path("3").unwrap().sequence(), Some((3, false)));
        assert_eq!(key.subkey_for_path("3/0").unwrap().sequence(), Some((3, false)));
        assert_eq!(key.subkey_for_path("3/1").unwrap().sequence(), Some((3, true)));
        assert_eq!(
            key.subkey_for_path("3/1").unwrap().secret_exponent(),
            key.subkey(3, true).secret_exponent()
        );

        for bad in ["", "3/2", "x", "3/", "-1", "3/1/0"] {
            assert!(matches!(
                key.subkey_for_path(bad),
                Err(DerivationError::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn rejects_malformed_seed_text() {
        for bad in ["", "00", "0000000000000000000000000000000g", "0000000000000000000000000000000"] {
            assert!(matches!(
                ElectrumKey::from_seed(bad, btc()),
                Err(DerivationError::InvalidSeed(_))
            ));
        }
        assert!(matches!(
            ElectrumKey::from_master_secret_hex(SEED, btc()),
            Err(DerivationError::InvalidSeed(_))
        ));
        // an all-zero stretched master is out of range
        let zeros = "0".repeat(MASTER_HEX_LEN);
        assert!(matches!(
            ElectrumKey::from_master_secret_hex(&zeros, btc()),
            Err(DerivationError::InvalidSecret)
        ));
    }
}
