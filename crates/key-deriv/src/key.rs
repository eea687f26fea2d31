//! Key value objects: the sum type callers hold and its accessors.

use std::fmt;

use coinkey_algebra::{to_bytes_32, Point};
use coinkey_codec::{encode_check, hash160};
use coinkey_params::NetworkProfile;
use num_bigint::BigUint;

use crate::{
    electrum::ElectrumKey,
    errors::{DerivationError, KeyError},
    hd::{validate_scalar, HdKey},
};

/// A simple private key: secret exponent and point, no chain code and no
/// tree or sequence structure.
#[derive(Clone, Debug)]
pub struct WifKey {
    network: &'static NetworkProfile,
    secret: BigUint,
    point: Point,
    compressed: bool,
}

impl WifKey {
    /// Builds a simple key from a secret exponent in `[1, n-1]`.
    pub fn from_secret_exponent(
        secret: BigUint,
        compressed: bool,
        network: &'static NetworkProfile,
    ) -> Result<Self, DerivationError> {
        validate_scalar(&secret, network.curve())?;
        let curve = network.curve();
        let point = curve.multiply(&secret, curve.generator());
        Ok(Self {
            network,
            secret,
            point,
            compressed,
        })
    }

    /// The secret exponent.
    pub fn secret_exponent(&self) -> &BigUint {
        &self.secret
    }

    /// The public point.
    pub fn public_point(&self) -> &Point {
        &self.point
    }

    /// Whether the key's canonical serialization is compressed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
}

/// A key known only by its hashed public key: no exponent, no point.
#[derive(Clone, Debug)]
pub struct AddressKey {
    network: &'static NetworkProfile,
    hash160: [u8; 20],
}

impl AddressKey {
    /// Wraps a 20-byte hashed public key.
    pub fn new(hash160: [u8; 20], network: &'static NetworkProfile) -> Self {
        Self { network, hash160 }
    }

    /// The stored hashed public key.
    pub fn hash160(&self) -> &[u8; 20] {
        &self.hash160
    }

    /// The checksum-encoded address text.
    pub fn to_text(&self) -> String {
        let mut payload = vec![self.network.versions().address];
        payload.extend_from_slice(&self.hash160);
        encode_check(&payload)
    }
}

/// Any parsed or derived key, tagged by shape. Immutable; derivation
/// operations return new values.
#[derive(Clone, Debug)]
pub enum Key {
    /// An extended tree-structured key, private or public.
    Hd(HdKey),
    /// A simple private key.
    Wif(WifKey),
    /// A legacy flat-scheme key.
    Electrum(ElectrumKey),
    /// An address-only key.
    Address(AddressKey),
}

impl Key {
    /// The profile this key belongs to.
    pub fn network(&self) -> &'static NetworkProfile {
        match self {
            Key::Hd(key) => key.network(),
            Key::Wif(key) => key.network,
            Key::Electrum(key) => key.network(),
            Key::Address(key) => key.network,
        }
    }

    /// The secret exponent, present iff this key is private.
    pub fn secret_exponent(&self) -> Option<&BigUint> {
        match self {
            Key::Hd(key) => key.secret_exponent(),
            Key::Wif(key) => Some(key.secret_exponent()),
            Key::Electrum(key) => Some(key.secret_exponent()),
            Key::Address(_) => None,
        }
    }

    /// The public point; address-only keys have none.
    pub fn public_point(&self) -> Option<&Point> {
        match self {
            Key::Hd(key) => Some(key.public_point()),
            Key::Wif(key) => Some(key.public_point()),
            Key::Electrum(key) => Some(key.public_point()),
            Key::Address(_) => None,
        }
    }

    /// Whether a secret exponent is present.
    pub fn is_private(&self) -> bool {
        self.secret_exponent().is_some()
    }

    /// The checksum-encoded address text.
    ///
    /// Keys with a point hash the chosen point serialization under the
    /// network's address version byte; address-only keys return their stored
    /// value regardless of the flag.
    pub fn address(&self, use_uncompressed: bool) -> String {
        match self {
            Key::Address(key) => key.to_text(),
            _ => {
                let point = self
                    .public_point()
                    .expect("every non-address key carries a point");
                encode_address(point, !use_uncompressed, self.network())
            }
        }
    }

    /// The WIF text of the secret exponent, failing without one.
    pub fn wif(&self, use_uncompressed: bool) -> Result<String, KeyError> {
        let secret = self.secret_exponent().ok_or(KeyError::UnsupportedOperation(
            "no secret exponent to serialize",
        ))?;
        Ok(encode_wif(secret, !use_uncompressed, self.network()))
    }

    /// Derives along path text; tree keys walk child indices, legacy keys
    /// accept the `"index"`/`"index/change"` form. Simple and address-only
    /// keys have nothing to extend.
    pub fn subkey_for_path(&self, path: &str) -> Result<Key, KeyError> {
        match self {
            Key::Hd(key) => Ok(Key::Hd(key.subkey_for_path(path)?)),
            Key::Electrum(key) => Ok(Key::Electrum(key.subkey_for_path(path)?)),
            Key::Wif(_) | Key::Address(_) => Err(KeyError::UnsupportedOperation(
                "this key shape has no derivation structure",
            )),
        }
    }

    /// Derives a flat-sequence child; only legacy keys carry a sequence
    /// space.
    pub fn subkey(&self, index: u32, is_change: bool) -> Result<Key, KeyError> {
        match self {
            Key::Electrum(key) => Ok(Key::Electrum(key.subkey(index, is_change))),
            Key::Hd(_) | Key::Wif(_) | Key::Address(_) => Err(KeyError::UnsupportedOperation(
                "flat-sequence derivation needs a legacy key",
            )),
        }
    }
}

impl fmt::Display for Key {
    /// Renders the key's canonical text form: extended-key text for tree
    /// keys, WIF for private simple/legacy keys, the address for
    /// address-only keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Hd(key) => f.write_str(&key.to_text()),
            Key::Wif(key) => f.write_str(&encode_wif(
                key.secret_exponent(),
                key.is_compressed(),
                key.network,
            )),
            Key::Electrum(key) => f.write_str(&encode_wif(
                key.secret_exponent(),
                false,
                key.network(),
            )),
            Key::Address(key) => f.write_str(&key.to_text()),
        }
    }
}

/// Address text for `point` under `network`'s address version byte.
pub(crate) fn encode_address(
    point: &Point,
    compressed: bool,
    network: &'static NetworkProfile,
) -> String {
    let sec = network
        .curve()
        .serialize_point(point, compressed)
        .expect("key points are never the identity");
    let mut payload = vec![network.versions().address];
    payload.extend_from_slice(&hash160(&sec));
    encode_check(&payload)
}

/// WIF text for `secret` under `network`'s WIF version byte.
pub(crate) fn encode_wif(
    secret: &BigUint,
    compressed: bool,
    network: &'static NetworkProfile,
) -> String {
    let mut payload = vec![network.versions().wif];
    payload.extend_from_slice(&to_bytes_32(secret));
    if compressed {
        payload.push(0x01);
    }
    encode_check(&payload)
}
