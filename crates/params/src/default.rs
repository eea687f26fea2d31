//! Version-byte tables for the registered networks.

use crate::types::VersionBytes;

/// Version bytes for the main network.
pub(crate) const BTC_VERSIONS: VersionBytes = VersionBytes {
    wif: 0x80,
    address: 0x00,
    hd_private: [0x04, 0x88, 0xAD, 0xE4],
    hd_public: [0x04, 0x88, 0xB2, 0x1E],
};

/// Version bytes for the test network.
pub(crate) const XTN_VERSIONS: VersionBytes = VersionBytes {
    wif: 0xEF,
    address: 0x6F,
    hd_private: [0x04, 0x35, 0x83, 0x94],
    hd_public: [0x04, 0x35, 0x87, 0xCF],
};
