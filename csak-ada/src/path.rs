//! CIP-1852 derivation paths.
//!
//! Shelley wallets derive every key at `m/1852'/1815'/account'/role/index`.
//! Purpose, coin type and account are hardened; role and index are not, so
//! they can be walked from an account public key alone.

use core::fmt;
use core::str::FromStr;

use crate::{Error, Result};

/// CIP-1852 purpose.
pub const PURPOSE: u32 = 1852;

/// SLIP-44 coin type for ADA.
pub const COIN_TYPE: u32 = 1815;

/// A child index in a derivation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChildIndex {
    /// Soft index: 0 to 2^31 - 1.
    Normal(u32),
    /// Hardened index, stored without the offset and displayed as `n'`.
    Hardened(u32),
}

impl ChildIndex {
    /// The offset for hardened indices (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// Create a soft child index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if `index >= 2^31`.
    pub fn normal(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            return Err(Error::InvalidDerivationPath(format!("index {index} out of range")));
        }
        Ok(Self::Normal(index))
    }

    /// Create a hardened child index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if `index >= 2^31`.
    pub fn hardened(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            return Err(Error::InvalidDerivationPath(format!("index {index}' out of range")));
        }
        Ok(Self::Hardened(index))
    }

    /// Check if this is a hardened index.
    pub const fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// The raw 32-bit value fed into child key derivation.
    pub const fn to_u32(&self) -> u32 {
        match self {
            Self::Normal(i) => *i,
            Self::Hardened(i) => *i | Self::HARDENED_OFFSET,
        }
    }
}

impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        if value >= Self::HARDENED_OFFSET {
            Self::Hardened(value & !Self::HARDENED_OFFSET)
        } else {
            Self::Normal(value)
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{i}"),
            Self::Hardened(i) => write!(f, "{i}'"),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidDerivationPath(format!("bad segment '{s}'"));
        match s.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => Self::hardened(digits.parse().map_err(|_| invalid())?),
            None => Self::normal(s.parse().map_err(|_| invalid())?),
        }
    }
}

/// Key role within an account (the fourth path level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// External payment chain.
    External,
    /// Internal payment chain (change).
    Internal,
    /// Staking key.
    Staking,
    /// DRep key (CIP-105).
    DRep,
    /// Constitutional committee cold key.
    CommitteeCold,
    /// Constitutional committee hot key.
    CommitteeHot,
}

impl Role {
    /// Every role in path order.
    pub const ALL: [Self; 6] = [
        Self::External,
        Self::Internal,
        Self::Staking,
        Self::DRep,
        Self::CommitteeCold,
        Self::CommitteeHot,
    ];

    /// Numeric path segment.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Human-readable label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::External => "payment",
            Self::Internal => "change",
            Self::Staking => "stake",
            Self::DRep => "drep",
            Self::CommitteeCold => "cc-cold",
            Self::CommitteeHot => "cc-hot",
        }
    }
}

impl TryFrom<u32> for Role {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::InvalidDerivationPath(format!("unknown role {value}")))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A hierarchical derivation path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath {
    indices: Vec<ChildIndex>,
}

impl DerivationPath {
    /// Create an empty derivation path (root key).
    pub fn master() -> Self {
        Self::default()
    }

    /// Create a path from child indices.
    pub fn new(indices: Vec<ChildIndex>) -> Self {
        Self { indices }
    }

    /// Parse paths like `m/1852'/1815'/0'/0/0`; `h` and `H` also mark hardened segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] for malformed segments.
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();
        if path.is_empty() || path == "m" || path == "M" {
            return Ok(Self::master());
        }

        let rest = path
            .strip_prefix("m/")
            .or_else(|| path.strip_prefix("M/"))
            .unwrap_or(path);

        let indices = rest
            .split('/')
            .filter(|c| !c.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ChildIndex>>>()?;
        Ok(Self { indices })
    }

    /// CIP-1852 account path: `m/1852'/1815'/account'`.
    ///
    /// # Errors
    ///
    /// Returns an error if `account >= 2^31`.
    pub fn account(account: u32) -> Result<Self> {
        Ok(Self {
            indices: vec![
                ChildIndex::Hardened(PURPOSE),
                ChildIndex::Hardened(COIN_TYPE),
                ChildIndex::hardened(account)?,
            ],
        })
    }

    /// Full CIP-1852 key path: `m/1852'/1815'/account'/role/index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `account` or `index` is `>= 2^31`.
    pub fn cip1852(account: u32, role: Role, index: u32) -> Result<Self> {
        let mut path = Self::account(account)?;
        path.indices.push(ChildIndex::Normal(role.index()));
        path.indices.push(ChildIndex::normal(index)?);
        Ok(path)
    }

    /// Get the child indices in this path.
    pub fn indices(&self) -> &[ChildIndex] {
        &self.indices
    }

    /// Get the number of levels in this path.
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    /// Append a child index to the path.
    #[must_use]
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.indices {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
