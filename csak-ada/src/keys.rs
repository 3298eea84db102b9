//! Ed25519 key and signature types.
//!
//! Two private key shapes are handled:
//!
//! - **Standard**: a 32-byte RFC 8032 seed, hashed with SHA-512 to obtain the
//!   signing scalar and nonce prefix.
//! - **Extended**: the 64-byte `kL || kR` produced by BIP32-Ed25519. `kL` is
//!   used as the scalar directly and `kR` is the nonce prefix, so both halves
//!   take part in signing.

use core::fmt;

use curve25519_dalek::scalar::Scalar;
use ed25519_dalek::hazmat::{ExpandedSecretKey, raw_sign};
use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::encoding::{cbor_unwrap, cbor_wrap, decode_hex};
use crate::hash::{HASH_224_LEN, blake2b_224};
use crate::{Error, Result};

/// Length of an Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// An Ed25519 signing key.
#[derive(Clone)]
pub enum PrivateKey {
    /// 32-byte RFC 8032 seed.
    Standard(Zeroizing<[u8; 32]>),
    /// 64-byte BIP32-Ed25519 extended key `kL || kR`.
    Extended(Zeroizing<[u8; 64]>),
}

impl PrivateKey {
    /// Build from raw bytes, picking the shape by length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] unless `bytes` is 32 or 64 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            32 => {
                let mut key = Zeroizing::new([0u8; 32]);
                key.copy_from_slice(bytes);
                Ok(Self::Standard(key))
            }
            64 => {
                let mut key = Zeroizing::new([0u8; 64]);
                key.copy_from_slice(bytes);
                Ok(Self::Extended(key))
            }
            actual => Err(Error::InvalidKeyLength {
                kind: "private key",
                expected: "32 or 64",
                actual,
            }),
        }
    }

    /// Parse plain hex.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid hex or an unsupported length.
    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = Zeroizing::new(decode_hex(input)?);
        Self::from_bytes(&bytes)
    }

    /// Parse hex of a CBOR byte string wrapping the key (`5820…` or `5840…`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyEncoding`] if the CBOR wrapper is malformed.
    pub fn from_cbor_hex(input: &str) -> Result<Self> {
        let cbor = Zeroizing::new(decode_hex(input)?);
        let bytes = Zeroizing::new(cbor_unwrap(&cbor)?);
        Self::from_bytes(&bytes)
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Standard(k) => &k[..],
            Self::Extended(k) => &k[..],
        }
    }

    /// Whether this is a 64-byte extended key.
    #[must_use]
    pub const fn is_extended(&self) -> bool {
        matches!(self, Self::Extended(_))
    }

    /// Lowercase hex of the raw key.
    #[must_use]
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.as_bytes()))
    }

    /// Hex of the key wrapped in a CBOR byte string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the CBOR writer fails.
    pub fn to_cbor_hex(&self) -> Result<Zeroizing<String>> {
        let cbor = Zeroizing::new(cbor_wrap(self.as_bytes())?);
        Ok(Zeroizing::new(hex::encode(&*cbor)))
    }

    /// The matching public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        let verifying = match self {
            Self::Standard(seed) => SigningKey::from_bytes(seed).verifying_key(),
            Self::Extended(key) => VerifyingKey::from(&expand(key)),
        };
        PublicKey(verifying.to_bytes())
    }

    /// Sign `message` deterministically.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signature = match self {
            Self::Standard(seed) => SigningKey::from_bytes(seed).sign(message),
            Self::Extended(key) => {
                let esk = expand(key);
                let verifying = VerifyingKey::from(&esk);
                raw_sign::<Sha512>(&esk, message, &verifying)
            }
        };
        Signature(signature.to_bytes())
    }
}

/// Scalar `kL` (reduced, not clamped) and nonce prefix `kR`.
///
/// Both halves are written straight into the key, which wipes itself on drop.
fn expand(key: &[u8; 64]) -> ExpandedSecretKey {
    let mut esk = ExpandedSecretKey {
        scalar: Scalar::ZERO,
        hash_prefix: [0u8; 32],
    };
    let mut kl = Zeroizing::new([0u8; 32]);
    kl.copy_from_slice(&key[..32]);
    esk.scalar = Scalar::from_bytes_mod_order(*kl);
    esk.hash_prefix.copy_from_slice(&key[32..]);
    esk
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_extended() { "Extended" } else { "Standard" };
        write!(f, "PrivateKey::{kind}([REDACTED])")
    }
}

/// A 32-byte Ed25519 public key.
///
/// Construction only checks the length; whether the bytes are a curve point
/// is decided at verification time.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Wrap a 32-byte array.
    #[inline]
    #[must_use]
    pub const fn from_array(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] unless `bytes` is 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; PUBLIC_KEY_LEN] =
            bytes.try_into().map_err(|_| Error::InvalidKeyLength {
                kind: "public key",
                expected: "32",
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Parse plain hex.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid hex or a length other than 32 bytes.
    pub fn from_hex(input: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(input)?)
    }

    /// Raw key bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Blake2b-224 key hash used as an address credential.
    #[must_use]
    pub fn hash(&self) -> [u8; HASH_224_LEN] {
        blake2b_224(&self.0)
    }

    /// Lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Hex of the key wrapped in a CBOR byte string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the CBOR writer fails.
    pub fn to_cbor_hex(&self) -> Result<String> {
        Ok(hex::encode(cbor_wrap(&self.0)?))
    }

    /// Check `signature` over `message`. Keys that are not curve points never verify.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying) = VerifyingKey::from_bytes(&self.0) else {
            tracing::debug!(key = %self.to_hex(), "public key is not a curve point");
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        verifying.verify(message, &signature).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    /// Build from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] unless `bytes` is 64 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SIGNATURE_LEN] =
            bytes.try_into().map_err(|_| Error::InvalidKeyLength {
                kind: "signature",
                expected: "64",
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Raw signature bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}
