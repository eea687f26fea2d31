//! Tree-structured extended keys and parent→child derivation.

use coinkey_algebra::{to_bytes_32, Curve, Point};
use coinkey_codec::{encode_check, hash160};
use coinkey_params::NetworkProfile;
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::Sha512;
use tracing::debug;

use crate::{
    errors::DerivationError,
    paths::{parse_path, HARDENED_OFFSET},
};

type HmacSha512 = Hmac<Sha512>;

/// Keyed-hash key used to bootstrap a master key from seed entropy.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Byte length of a serialized extended key, pre-checksum.
pub const EXTENDED_KEY_LEN: usize = 78;

/// An extended (tree-structured) key: private when a secret exponent is
/// present, public-only otherwise. Immutable; derivation returns new keys.
#[derive(Clone, Debug)]
pub struct HdKey {
    network: &'static NetworkProfile,
    secret: Option<BigUint>,
    point: Point,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: u32,
}

impl HdKey {
    /// Builds the master key of `network` from seed entropy.
    pub fn from_master_seed(
        seed: &[u8],
        network: &'static NetworkProfile,
    ) -> Result<Self, DerivationError> {
        let digest = keyed_hash(MASTER_HMAC_KEY, seed);
        let (left, chain_code) = split_digest(&digest);
        let secret = BigUint::from_bytes_be(&left);
        validate_scalar(&secret, network.curve())?;
        Ok(Self::new_private(secret, chain_code, 0, [0; 4], 0, network))
    }

    fn new_private(
        secret: BigUint,
        chain_code: [u8; 32],
        depth: u8,
        parent_fingerprint: [u8; 4],
        child_index: u32,
        network: &'static NetworkProfile,
    ) -> Self {
        let curve = network.curve();
        let point = curve.multiply(&secret, curve.generator());
        Self {
            network,
            secret: Some(secret),
            point,
            chain_code,
            depth,
            parent_fingerprint,
            child_index,
        }
    }

    /// Parses a decoded 78-byte extended-key payload against one profile.
    pub fn from_bytes(
        payload: &[u8],
        network: &'static NetworkProfile,
    ) -> Result<Self, DerivationError> {
        if payload.len() != EXTENDED_KEY_LEN {
            return Err(DerivationError::InvalidPayloadLength(payload.len()));
        }
        let version = array_4(&payload[0..4]);
        let depth = payload[4];
        let parent_fingerprint = array_4(&payload[5..9]);
        let child_index = u32::from_be_bytes(array_4(&payload[9..13]));
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&payload[13..45]);
        let key_material = &payload[45..78];

        let versions = network.versions();
        if version == versions.hd_private {
            if key_material[0] != 0x00 {
                return Err(DerivationError::InvalidSecret);
            }
            let secret = BigUint::from_bytes_be(&key_material[1..]);
            validate_scalar(&secret, network.curve())?;
            Ok(Self::new_private(
                secret,
                chain_code,
                depth,
                parent_fingerprint,
                child_index,
                network,
            ))
        } else if version == versions.hd_public {
            let point = network.curve().deserialize_point(key_material)?;
            Ok(Self {
                network,
                secret: None,
                point,
                chain_code,
                depth,
                parent_fingerprint,
                child_index,
            })
        } else {
            Err(DerivationError::UnknownVersion(version))
        }
    }

    /// The 78-byte extended-key payload, in the private form iff a secret
    /// exponent is present.
    pub fn to_bytes(&self) -> Vec<u8> {
        let versions = self.network.versions();
        let mut out = Vec::with_capacity(EXTENDED_KEY_LEN);
        out.extend_from_slice(match self.secret {
            Some(_) => &versions.hd_private,
            None => &versions.hd_public,
        });
        out.push(self.depth);
        out.extend_from_slice(&self.parent_fingerprint);
        out.extend_from_slice(&self.child_index.to_be_bytes());
        out.extend_from_slice(&self.chain_code);
        match &self.secret {
            Some(secret) => {
                out.push(0x00);
                out.extend_from_slice(&to_bytes_32(secret));
            }
            None => out.extend_from_slice(&self.serialized_point()),
        }
        out
    }

    /// The checksum-encoded extended-key text.
    pub fn to_text(&self) -> String {
        encode_check(&self.to_bytes())
    }

    /// The public-only view of this key: same point, chain code, and tree
    /// position, with the secret exponent dropped.
    pub fn public_copy(&self) -> Self {
        Self {
            secret: None,
            ..self.clone()
        }
    }

    /// Derives the child at `index`; hardened indices (`>= 2^31`) require a
    /// private parent. The degenerate offsets the derivation function can
    /// produce (out-of-range left half, zero secret, identity point) step to
    /// the next index in the same space instead of yielding an unusable key.
    pub fn derive_child(&self, index: u32) -> Result<Self, DerivationError> {
        let hardened = index >= HARDENED_OFFSET;
        if hardened && self.secret.is_none() {
            return Err(DerivationError::HardenedDerivationRequiresPrivateKey);
        }
        let depth = self
            .depth
            .checked_add(1)
            .ok_or(DerivationError::MaxDepthExceeded)?;
        let curve = self.network.curve();
        let parent_sec = self.serialized_point();
        let fingerprint = array_4(&hash160(&parent_sec)[..4]);

        let mut index = index;
        loop {
            let mut message = Vec::with_capacity(37);
            match (&self.secret, hardened) {
                (Some(secret), true) => {
                    message.push(0x00);
                    message.extend_from_slice(&to_bytes_32(secret));
                }
                _ => message.extend_from_slice(&parent_sec),
            }
            message.extend_from_slice(&index.to_be_bytes());

            let digest = keyed_hash(&self.chain_code, &message);
            let (left, chain_code) = split_digest(&digest);
            let offset = BigUint::from_bytes_be(&left);

            if offset >= *curve.order() {
                debug!(index, "derivation offset beyond the curve order, stepping to the next index");
                index = next_index(index, hardened);
                continue;
            }

            match &self.secret {
                Some(secret) => {
                    let child_secret = (&offset + secret) % curve.order();
                    if child_secret.is_zero() {
                        debug!(index, "derived child secret is zero, stepping to the next index");
                        index = next_index(index, hardened);
                        continue;
                    }
                    return Ok(Self::new_private(
                        child_secret,
                        chain_code,
                        depth,
                        fingerprint,
                        index,
                        self.network,
                    ));
                }
                None => {
                    let child_point =
                        curve.add(&curve.multiply(&offset, curve.generator()), &self.point);
                    if child_point.is_infinity() {
                        debug!(index, "derived child point is the identity, stepping to the next index");
                        index = next_index(index, hardened);
                        continue;
                    }
                    return Ok(Self {
                        network: self.network,
                        secret: None,
                        point: child_point,
                        chain_code,
                        depth,
                        parent_fingerprint: fingerprint,
                        child_index: index,
                    });
                }
            }
        }
    }

    /// Applies [`derive_child`](Self::derive_child) along a parsed path,
    /// left to right.
    pub fn subkey_for_path(&self, path: &str) -> Result<Self, DerivationError> {
        let mut key = self.clone();
        for index in parse_path(path)? {
            key = key.derive_child(index)?;
        }
        Ok(key)
    }

    /// The profile this key belongs to.
    pub fn network(&self) -> &'static NetworkProfile {
        self.network
    }

    /// The secret exponent, absent on public-only keys.
    pub fn secret_exponent(&self) -> Option<&BigUint> {
        self.secret.as_ref()
    }

    /// The public point.
    pub fn public_point(&self) -> &Point {
        &self.point
    }

    /// Whether a secret exponent is present.
    pub fn is_private(&self) -> bool {
        self.secret.is_some()
    }

    /// The 32-byte chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Number of derivations between this key and its master.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The child index this key was derived at (0 for a master key).
    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    /// First 4 bytes of the parent's key hash (all zero for a master key).
    pub fn parent_fingerprint(&self) -> &[u8; 4] {
        &self.parent_fingerprint
    }

    /// First 4 bytes of this key's own key hash.
    pub fn fingerprint(&self) -> [u8; 4] {
        array_4(&hash160(&self.serialized_point())[..4])
    }

    /// The compressed point serialization used in payloads, fingerprints,
    /// and derivation messages.
    fn serialized_point(&self) -> Vec<u8> {
        self.network
            .curve()
            .serialize_point(&self.point, true)
            .expect("key points are never the identity")
    }
}

/// Checks a secret exponent lies in `[1, n-1]`.
pub(crate) fn validate_scalar(secret: &BigUint, curve: &Curve) -> Result<(), DerivationError> {
    if secret.is_zero() || secret >= curve.order() {
        return Err(DerivationError::InvalidSecret);
    }
    Ok(())
}

pub(crate) fn array_4(slice: &[u8]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(slice);
    out
}

fn keyed_hash(key: &[u8], message: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(message);
    let digest = mac.finalize().into_bytes();
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    out
}

fn split_digest(digest: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&digest[..32]);
    right.copy_from_slice(&digest[32..]);
    (left, right)
}

/// The next candidate index within the same hardened/normal space.
fn next_index(index: u32, hardened: bool) -> u32 {
    let next = index.wrapping_add(1);
    if hardened {
        if next == 0 {
            HARDENED_OFFSET
        } else {
            next
        }
    } else {
        next % HARDENED_OFFSET
    }
}
