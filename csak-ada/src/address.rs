//! Shelley addresses (CIP-19).
//!
//! The first byte is a header: the address type in the high nibble and the
//! network id in the low nibble. Key credentials are Blake2b-224 hashes of
//! Ed25519 public keys.

use core::fmt;

use crate::encoding::{bech32_decode, bech32_encode};
use crate::hash::HASH_224_LEN;
use crate::keys::PublicKey;
use crate::network::Network;
use crate::{Error, Result};

const TYPE_BASE: u8 = 0b0000;
const TYPE_ENTERPRISE: u8 = 0b0110;
const TYPE_REWARD: u8 = 0b1110;

/// Address family, taken from the header's type nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Payment and stake credentials (types 0-3).
    Base,
    /// Payment credential and a chain pointer (types 4-5).
    Pointer,
    /// Payment credential only (types 6-7).
    Enterprise,
    /// Stake credential only (types 14-15).
    Reward,
}

impl AddressKind {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Pointer => "pointer",
            Self::Enterprise => "enterprise",
            Self::Reward => "reward",
        }
    }

    fn from_header(header: u8) -> Result<Self> {
        match header >> 4 {
            0..=3 => Ok(Self::Base),
            4 | 5 => Ok(Self::Pointer),
            6 | 7 => Ok(Self::Enterprise),
            14 | 15 => Ok(Self::Reward),
            8 => Err(Error::UnsupportedAddressFormat("Byron bootstrap address".into())),
            other => Err(Error::UnsupportedAddressFormat(format!(
                "unknown header type {other}"
            ))),
        }
    }

    fn length_ok(self, len: usize) -> bool {
        match self {
            Self::Base => len == 1 + 2 * HASH_224_LEN,
            Self::Enterprise | Self::Reward => len == 1 + HASH_224_LEN,
            // Three variable-length naturals, at least one byte each.
            Self::Pointer => len >= 1 + HASH_224_LEN + 3,
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Shelley-era address in its raw byte form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    bytes: Vec<u8>,
}

impl Address {
    /// Base address: payment key hash followed by stake key hash.
    #[must_use]
    pub fn base(network: Network, payment: &PublicKey, stake: &PublicKey) -> Self {
        let mut bytes = Vec::with_capacity(1 + 2 * HASH_224_LEN);
        bytes.push((TYPE_BASE << 4) | network.network_id());
        bytes.extend_from_slice(&payment.hash());
        bytes.extend_from_slice(&stake.hash());
        Self { bytes }
    }

    /// Enterprise address: payment key hash only.
    #[must_use]
    pub fn enterprise(network: Network, payment: &PublicKey) -> Self {
        Self::single(TYPE_ENTERPRISE, network, payment)
    }

    /// Reward (stake) address: stake key hash only.
    #[must_use]
    pub fn reward(network: Network, stake: &PublicKey) -> Self {
        Self::single(TYPE_REWARD, network, stake)
    }

    fn single(kind: u8, network: Network, key: &PublicKey) -> Self {
        let mut bytes = Vec::with_capacity(1 + HASH_224_LEN);
        bytes.push((kind << 4) | network.network_id());
        bytes.extend_from_slice(&key.hash());
        Self { bytes }
    }

    /// Validate raw address bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAddress`] if empty or the length does not fit the type.
    /// - [`Error::UnsupportedAddressFormat`] for Byron and unknown header types.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = *bytes
            .first()
            .ok_or_else(|| Error::InvalidAddress("empty address".into()))?;
        let kind = AddressKind::from_header(header)?;
        if !kind.length_ok(bytes.len()) {
            return Err(Error::InvalidAddress(format!(
                "{kind} address cannot be {} bytes",
                bytes.len()
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Parse a bech32 address.
    ///
    /// # Errors
    ///
    /// Returns an error on a bad checksum, invalid payload, or a prefix that
    /// does not match the header.
    pub fn from_bech32(encoded: &str) -> Result<Self> {
        let (hrp, data) = bech32_decode(encoded)?;
        let address = Self::from_bytes(&data)?;
        if hrp != address.hrp() {
            return Err(Error::InvalidAddress(format!(
                "prefix '{hrp}' does not match a {} address for network id {}",
                address.kind(),
                address.network_id()
            )));
        }
        Ok(address)
    }

    /// Bech32 rendering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the bech32 encoder fails.
    pub fn to_bech32(&self) -> Result<String> {
        bech32_encode(self.hrp(), &self.bytes)
    }

    /// Raw bytes including the header.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex of the raw bytes.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Address family. Always valid because construction checks the header.
    #[must_use]
    pub fn kind(&self) -> AddressKind {
        match self.bytes[0] >> 4 {
            0..=3 => AddressKind::Base,
            4 | 5 => AddressKind::Pointer,
            6 | 7 => AddressKind::Enterprise,
            _ => AddressKind::Reward,
        }
    }

    /// Network id from the header's low nibble.
    #[must_use]
    pub fn network_id(&self) -> u8 {
        self.bytes[0] & 0x0f
    }

    /// Whether the network id denotes mainnet.
    #[must_use]
    pub fn is_mainnet(&self) -> bool {
        self.network_id() == Network::Mainnet.network_id()
    }

    /// Bech32 human-readable prefix.
    #[must_use]
    pub fn hrp(&self) -> &'static str {
        match (self.kind(), self.is_mainnet()) {
            (AddressKind::Reward, true) => "stake",
            (AddressKind::Reward, false) => "stake_test",
            (_, true) => "addr",
            (_, false) => "addr_test",
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Address")
            .field("kind", &self.kind())
            .field("network_id", &self.network_id())
            .field("bytes", &self.to_hex())
            .finish()
    }
}
