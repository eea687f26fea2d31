//! Types for the network parameter profiles.

use coinkey_algebra::Curve;
use serde::{Deserialize, Serialize};

/// Version-byte constants for one network's text encodings.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct VersionBytes {
    /// Prefix byte of simple private-key (WIF) payloads.
    pub wif: u8,
    /// Prefix byte of address payloads.
    pub address: u8,
    /// 4-byte version of private extended-key payloads.
    pub hd_private: [u8; 4],
    /// 4-byte version of public extended-key payloads.
    pub hd_public: [u8; 4],
}

/// One network's parameters: its code, version bytes, and the curve its keys
/// live on. Immutable once registered.
#[derive(Clone, Debug)]
pub struct NetworkProfile {
    code: &'static str,
    versions: VersionBytes,
    curve: &'static Curve,
}

impl NetworkProfile {
    /// Creates a new profile.
    pub const fn new(code: &'static str, versions: VersionBytes, curve: &'static Curve) -> Self {
        Self { code, versions, curve }
    }

    /// The network code, e.g. `"BTC"`.
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// The version-byte constants for this network's encodings.
    pub const fn versions(&self) -> &VersionBytes {
        &self.versions
    }

    /// The curve this network's keys live on.
    pub const fn curve(&self) -> &'static Curve {
        self.curve
    }
}
