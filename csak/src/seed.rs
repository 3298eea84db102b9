//! Icarus root key material.
//!
//! Cardano Shelley wallets do not use the BIP-39 seed. Instead the mnemonic
//! entropy is stretched with PBKDF2-HMAC-SHA512 (4096 rounds, passphrase as the
//! password, entropy as the salt) into 96 bytes, laid out as `kL || kR || cc`.
//! The first scalar half is clamped so the result is a valid BIP32-Ed25519
//! extended private key.

use core::fmt;

use hmac::Hmac;
use sha2::Sha512;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{Error, Result};

/// Length of an Icarus root key.
pub const SEED_LEN: usize = 96;

/// PBKDF2 rounds used by the Icarus scheme.
pub const PBKDF2_ROUNDS: u32 = 4096;

/// The 96-byte root extended private key: scalar (32) || nonce prefix (32) || chain code (32).
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    /// Stretch mnemonic entropy into a root key.
    ///
    /// An absent passphrase and an empty one produce the same seed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyDerivation`] if PBKDF2 rejects the output length.
    pub fn from_entropy(entropy: &[u8], passphrase: Option<&str>) -> Result<Self> {
        let password = passphrase.unwrap_or_default();
        let mut out = Zeroizing::new([0u8; SEED_LEN]);
        pbkdf2::pbkdf2::<Hmac<Sha512>>(
            password.as_bytes(),
            entropy,
            PBKDF2_ROUNDS,
            out.as_mut_slice(),
        )
        .map_err(|_| Error::KeyDerivation)?;

        out[0] &= 0b1111_1000;
        out[31] &= 0b0001_1111;
        out[31] |= 0b0100_0000;

        tracing::trace!(passphrase = !password.is_empty(), "stretched entropy into root key");
        Ok(Self(out))
    }

    /// Wrap raw root key bytes without re-clamping.
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// All 96 bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// The 64-byte extended scalar `kL || kR`.
    #[inline]
    #[must_use]
    pub fn extended_key(&self) -> &[u8] {
        &self.0[..64]
    }

    /// The trailing 32-byte chain code.
    #[inline]
    #[must_use]
    pub fn chain_code(&self) -> &[u8] {
        &self.0[64..]
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl Eq for Seed {}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED; 96])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_24_ROOT: &str = "b07ff3e63c17cd2e0504e4bfd52a98c47abde183ccd0738efc385e764fd91d4bd7d399eeef3c4df68facb3f11e4a4d45513ea1e2a8018aa35b3c078714cfdcedccc42249e17984c44cf380b489f62c57f84089e150245bf49c436d0b9709c58f";

    #[test]
    fn test_known_root_key() {
        let seed = Seed::from_entropy(&[0u8; 32], None).unwrap();
        assert_eq!(hex::encode(seed.as_bytes()), ZERO_24_ROOT);
    }

    #[test]
    fn test_clamping_bits() {
        for entropy in [[0u8; 20].as_slice(), [0xffu8; 32].as_slice(), b"0123456789abcdefghij"] {
            let seed = Seed::from_entropy(entropy, Some("pass")).unwrap();
            let k = seed.as_bytes();
            assert_eq!(k[0] & 0b0000_0111, 0);
            assert_eq!(k[31] & 0b1110_0000, 0b0100_0000);
        }
    }

    #[test]
    fn test_empty_passphrase_equals_none() {
        let a = Seed::from_entropy(&[7u8; 20], None).unwrap();
        let b = Seed::from_entropy(&[7u8; 20], Some("")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let a = Seed::from_entropy(&[7u8; 20], None).unwrap();
        let b = Seed::from_entropy(&[7u8; 20], Some("foo")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_split_views() {
        let seed = Seed::from_entropy(&[0u8; 32], None).unwrap();
        assert_eq!(seed.extended_key().len(), 64);
        assert_eq!(hex::encode(seed.chain_code()), &ZERO_24_ROOT[128..]);
    }

    #[test]
    fn test_debug_redacted() {
        let seed = Seed::from_entropy(&[0u8; 32], None).unwrap();
        assert_eq!(format!("{seed:?}"), "Seed([REDACTED; 96])");
    }
}
