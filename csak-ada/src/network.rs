//! Cardano network types.

use core::fmt;
use core::str::FromStr;

use crate::Error;

/// Supported Cardano networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Cardano mainnet.
    #[default]
    Mainnet,
    /// Pre-production testnet.
    Preprod,
    /// Preview testnet.
    Preview,
    /// Legacy public testnet.
    Testnet,
}

impl Network {
    /// Network id carried in the low nibble of an address header.
    #[inline]
    #[must_use]
    pub const fn network_id(self) -> u8 {
        match self {
            Self::Mainnet => 1,
            Self::Preprod | Self::Preview | Self::Testnet => 0,
        }
    }

    /// Protocol magic used in the node handshake.
    #[inline]
    #[must_use]
    pub const fn protocol_magic(self) -> u32 {
        match self {
            Self::Mainnet => 764_824_073,
            Self::Preprod => 1,
            Self::Preview => 2,
            Self::Testnet => 1_097_911_063,
        }
    }

    /// Whether this is the production network.
    #[inline]
    #[must_use]
    pub const fn is_mainnet(self) -> bool {
        matches!(self, Self::Mainnet)
    }

    /// Get network name as string.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Preprod => "preprod",
            Self::Preview => "preview",
            Self::Testnet => "testnet",
        }
    }

    /// All recognized networks.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Mainnet, Self::Preprod, Self::Preview, Self::Testnet]
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "preprod" => Ok(Self::Preprod),
            "preview" => Ok(Self::Preview),
            "testnet" => Ok(Self::Testnet),
            _ => Err(Error::InvalidNetwork(s.into())),
        }
    }
}
