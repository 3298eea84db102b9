//! BIP32-Ed25519 hierarchical key derivation (Khovratovich-Law, V2 indexing).
//!
//! Extended private keys are `kL || kR` plus a chain code. Child keys are
//! computed as
//!
//! ```text
//! Z   = HMAC-SHA512(cc, tag || data || index_le)
//! kL' = 8 * ZL[0..28] + kL
//! kR' = ZR + kR  (mod 2^256)
//! ```
//!
//! with tag `0x00`/`0x01` over `kL || kR` for hardened children and
//! `0x02`/`0x03` over the public key for soft children. Soft children can
//! also be derived from the parent public key: `A' = A + (8 * ZL[0..28])B`.

use core::fmt;

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use csak::Seed;

use crate::keys::{PrivateKey, PublicKey};
use crate::path::{ChildIndex, DerivationPath};
use crate::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

const TAG_HARDENED_KEY: u8 = 0x00;
const TAG_HARDENED_CHAIN: u8 = 0x01;
const TAG_SOFT_KEY: u8 = 0x02;
const TAG_SOFT_CHAIN: u8 = 0x03;

/// Extended private key: 64-byte `kL || kR` and a 32-byte chain code.
#[derive(Clone)]
pub struct XPrv {
    key: Zeroizing<[u8; 64]>,
    chain_code: Zeroizing<[u8; 32]>,
}

/// Extended public key: 32-byte point and a 32-byte chain code.
#[derive(Clone, PartialEq, Eq)]
pub struct XPub {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl XPrv {
    /// Root key from an Icarus seed.
    #[must_use]
    pub fn from_seed(seed: &Seed) -> Self {
        let bytes = seed.as_bytes();
        let mut key = Zeroizing::new([0u8; 64]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&bytes[..64]);
        chain_code.copy_from_slice(&bytes[64..]);
        Self { key, chain_code }
    }

    /// Assemble from raw parts.
    #[must_use]
    pub fn from_parts(key: [u8; 64], chain_code: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(key),
            chain_code: Zeroizing::new(chain_code),
        }
    }

    /// The 64-byte extended scalar `kL || kR`.
    #[inline]
    #[must_use]
    pub fn extended_key(&self) -> &[u8; 64] {
        &self.key
    }

    /// The chain code.
    #[inline]
    #[must_use]
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Signing key for this node.
    #[must_use]
    pub fn private_key(&self) -> PrivateKey {
        PrivateKey::Extended(self.key.clone())
    }

    /// Public half of this node.
    #[must_use]
    pub fn public(&self) -> XPub {
        XPub {
            key: public_from_scalar(&self.key[..32]),
            chain_code: *self.chain_code,
        }
    }

    /// Derive one child.
    ///
    /// # Errors
    ///
    /// Only fails if HMAC rejects the chain code, which cannot happen for 32 bytes.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        let raw = index.to_u32().to_le_bytes();
        let (z, cc) = if index.is_hardened() {
            (
                self.hmac(TAG_HARDENED_KEY, &self.key[..], &raw)?,
                self.hmac(TAG_HARDENED_CHAIN, &self.key[..], &raw)?,
            )
        } else {
            let public = public_from_scalar(&self.key[..32]);
            (
                self.hmac(TAG_SOFT_KEY, &public, &raw)?,
                self.hmac(TAG_SOFT_CHAIN, &public, &raw)?,
            )
        };

        let mut key = Zeroizing::new([0u8; 64]);
        add_28_mul8(&self.key[..32], &z[..28], &mut key[..32]);
        add_256(&self.key[32..], &z[32..], &mut key[32..]);

        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&cc[32..]);

        Ok(Self { key, chain_code })
    }

    /// Walk every segment of `path` from this key.
    ///
    /// # Errors
    ///
    /// Same as [`XPrv::derive_child`].
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let derived = path
            .indices()
            .iter()
            .try_fold(self.clone(), |key, index| key.derive_child(*index))?;
        tracing::trace!(%path, "derived private key");
        Ok(derived)
    }

    fn hmac(&self, tag: u8, data: &[u8], index: &[u8; 4]) -> Result<Zeroizing<[u8; 64]>> {
        hmac_sha512(&self.chain_code[..], tag, data, index)
    }
}

impl fmt::Debug for XPrv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XPrv")
            .field("public", &self.public())
            .finish_non_exhaustive()
    }
}

impl XPub {
    /// Assemble from a public key and chain code.
    #[must_use]
    pub const fn from_parts(key: [u8; 32], chain_code: [u8; 32]) -> Self {
        Self { key, chain_code }
    }

    /// The 32-byte public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_array(self.key)
    }

    /// The chain code.
    #[inline]
    #[must_use]
    pub const fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Public key followed by chain code.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.key);
        out[32..].copy_from_slice(&self.chain_code);
        out
    }

    /// Derive one soft child from the public key alone.
    ///
    /// # Errors
    ///
    /// - [`Error::HardenedFromPublic`] for hardened indices.
    /// - [`Error::InvalidPublicKey`] if the parent is not a curve point.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        if index.is_hardened() {
            return Err(Error::HardenedFromPublic);
        }
        let raw = index.to_u32().to_le_bytes();
        let z = hmac_sha512(&self.chain_code, TAG_SOFT_KEY, &self.key, &raw)?;
        let cc = hmac_sha512(&self.chain_code, TAG_SOFT_CHAIN, &self.key, &raw)?;

        let parent = CompressedEdwardsY(self.key)
            .decompress()
            .ok_or(Error::InvalidPublicKey)?;

        let mut tweak = [0u8; 32];
        add_28_mul8(&[0u8; 32], &z[..28], &mut tweak);
        let child = parent + EdwardsPoint::mul_base(&Scalar::from_bytes_mod_order(tweak));

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&cc[32..]);
        Ok(Self {
            key: child.compress().to_bytes(),
            chain_code,
        })
    }

    /// Walk every segment of `path`, all of which must be soft.
    ///
    /// # Errors
    ///
    /// Same as [`XPub::derive_child`].
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.indices()
            .iter()
            .try_fold(self.clone(), |key, index| key.derive_child(*index))
    }
}

impl fmt::Debug for XPub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XPub")
            .field("key", &hex::encode(self.key))
            .field("chain_code", &hex::encode(self.chain_code))
            .finish()
    }
}

fn hmac_sha512(key: &[u8], tag: u8, data: &[u8], index: &[u8; 4]) -> Result<Zeroizing<[u8; 64]>> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|_| Error::InvalidKeyLength {
        kind: "chain code",
        expected: "32",
        actual: key.len(),
    })?;
    mac.update(&[tag]);
    mac.update(data);
    mac.update(index);
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// `A = kL * B`; `kL` may exceed the group order, so it is reduced first.
pub(crate) fn public_from_scalar(kl: &[u8]) -> [u8; 32] {
    let mut bytes = Zeroizing::new([0u8; 32]);
    bytes.copy_from_slice(kl);
    let scalar = Zeroizing::new(Scalar::from_bytes_mod_order(*bytes));
    EdwardsPoint::mul_base(&scalar).compress().to_bytes()
}

/// `out = x + 8 * y[0..28]` as little-endian integers.
fn add_28_mul8(x: &[u8], y: &[u8], out: &mut [u8]) {
    let mut carry: u16 = 0;
    for i in 0..32 {
        let yi = if i < 28 { u16::from(y[i]) << 3 } else { 0 };
        let r = u16::from(x[i]) + yi + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
}

/// `out = x + y mod 2^256` as little-endian integers.
fn add_256(x: &[u8], y: &[u8], out: &mut [u8]) {
    let mut carry: u16 = 0;
    for i in 0..32 {
        let r = u16::from(x[i]) + u16::from(y[i]) + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Role;

    fn root() -> XPrv {
        XPrv::from_seed(&Seed::from_entropy(&[0u8; 32], None).unwrap())
    }

    #[test]
    fn test_account_xpub() {
        let account = root().derive_path(&DerivationPath::account(0).unwrap()).unwrap();
        let xpub = account.public();
        assert_eq!(
            hex::encode(xpub.public_key().as_bytes()),
            "b3f8aad750c8f498d2882d1ecd74bf550e81870e89acaed82e8e10ef58718870"
        );
        assert_eq!(
            hex::encode(xpub.chain_code()),
            "91286d601ecfe0aafc2121154db787bf489ccf35c6b5db5d60096052c8b34c2f"
        );
    }

    #[test]
    fn test_payment_key() {
        let path = DerivationPath::cip1852(0, Role::External, 0).unwrap();
        let key = root().derive_path(&path).unwrap();
        assert_eq!(
            hex::encode(key.extended_key()),
            "30ba2b88bffe5a25379c7ac72be48f5b196ff45a0758a83c6980a5e15fd91d4b5ebbb2983ef0a2c3f42c45f081416632ec304b4ad84c667bcfe56acc9d9f0dfc"
        );
        assert_eq!(
            hex::encode(key.chain_code()),
            "5c14266e275b08f6f43344741fe15b2de913d64470294434ac0d44da655ef071"
        );
        assert_eq!(
            hex::encode(key.public().public_key().as_bytes()),
            "63c5d69570349e4233a0575811464f0e8a3fd329abe76e9bdc3d3f1b95982179"
        );
    }

    #[test]
    fn test_public_derivation_matches_private() {
        let account = root().derive_path(&DerivationPath::account(0).unwrap()).unwrap();
        let soft: DerivationPath = "m/0/0".parse().unwrap();
        let from_private = account.derive_path(&soft).unwrap().public();
        let from_public = account.public().derive_path(&soft).unwrap();
        assert_eq!(from_private, from_public);
    }

    #[test]
    fn test_hardened_from_public_fails() {
        let xpub = root().public();
        assert!(matches!(
            xpub.derive_child(ChildIndex::Hardened(0)),
            Err(Error::HardenedFromPublic)
        ));
    }

    #[test]
    fn test_path_is_compositional() {
        let root = root();
        let whole = root
            .derive_path(&DerivationPath::cip1852(1, Role::Staking, 3).unwrap())
            .unwrap();
        let stepwise = root
            .derive_path(&DerivationPath::account(1).unwrap())
            .unwrap()
            .derive_child(ChildIndex::Normal(2))
            .unwrap()
            .derive_child(ChildIndex::Normal(3))
            .unwrap();
        assert_eq!(whole.extended_key(), stepwise.extended_key());
        assert_eq!(whole.chain_code(), stepwise.chain_code());
    }

    #[test]
    fn test_add_28_mul8_carries() {
        let mut out = [0u8; 32];
        let mut y = [0u8; 28];
        y[0] = 0xff;
        add_28_mul8(&[0x08; 32], &y, &mut out);
        // 0x08 + 0xff * 8 = 0x800
        assert_eq!(out[0], 0x00);
        assert_eq!(out[1], 0x10);
        assert_eq!(out[2], 0x08);
    }

    #[test]
    fn test_debug_hides_private_key() {
        let debug = format!("{:?}", root());
        assert!(!debug.contains("b07ff3e6"));
    }
}
