//! The process-wide profile table.

use std::sync::LazyLock;

use coinkey_algebra::secp256k1;

use crate::{
    default::{BTC_VERSIONS, XTN_VERSIONS},
    errors::RegistryError,
    types::NetworkProfile,
};

static PROFILES: LazyLock<Vec<NetworkProfile>> = LazyLock::new(|| {
    vec![
        NetworkProfile::new("BTC", BTC_VERSIONS, secp256k1()),
        NetworkProfile::new("XTN", XTN_VERSIONS, secp256k1()),
    ]
});

/// All registered profiles, in canonical order.
pub fn all() -> &'static [NetworkProfile] {
    &PROFILES
}

/// Looks up a profile by network code.
pub fn lookup(code: &str) -> Result<&'static NetworkProfile, RegistryError> {
    PROFILES
        .iter()
        .find(|profile| profile.code() == code)
        .ok_or_else(|| RegistryError::NotFound(code.to_owned()))
}
