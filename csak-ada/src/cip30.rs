//! CIP-30 `signData` / CIP-8 message signing over `COSE_Sign1`.
//!
//! The protected header carries the algorithm, the signer's address and the
//! `hashed` flag; the unprotected header carries the public key (label 4).
//! In hashed mode the payload is the Blake2b-224 digest of the message.

use crate::address::Address;
use crate::cose::{ALG_EDDSA, CoseKey, CoseSign1, HeaderMap};
use crate::encoding::decode_hex;
use crate::hash::blake2b_224;
use crate::keys::{PUBLIC_KEY_LEN, PrivateKey, PublicKey, Signature};
use crate::{Error, Result};

/// Output of [`sign`]: the envelope and the key a verifier needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSignature {
    /// Serialized `COSE_Sign1`.
    pub cose_sign1: Vec<u8>,
    /// Serialized `COSE_Key` of the signer.
    pub cose_key: Vec<u8>,
    /// Signer's public key.
    pub public_key: PublicKey,
    /// Raw Ed25519 signature inside the envelope.
    pub signature: Signature,
}

impl DataSignature {
    /// `COSE_Sign1` hex, as returned by wallets in `DataSignature.signature`.
    #[must_use]
    pub fn signature_hex(&self) -> String {
        hex::encode(&self.cose_sign1)
    }

    /// `COSE_Key` hex, as returned by wallets in `DataSignature.key`.
    #[must_use]
    pub fn key_hex(&self) -> String {
        hex::encode(&self.cose_key)
    }
}

/// What [`verify`] found in an envelope.
///
/// A forged or tampered signature is reported through `valid`, never as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the signature checks out against `public_key`.
    pub valid: bool,
    /// Whether the payload is a Blake2b-224 digest of the original message.
    pub is_hashed: bool,
    /// Raw address bytes from the protected header, if any.
    pub address: Option<Vec<u8>>,
    /// The payload as signed: the message itself, or its digest when hashed.
    pub message: Vec<u8>,
    /// Key the signature was checked against.
    pub public_key: PublicKey,
    /// The envelope's signature.
    pub signature: Signature,
}

impl VerificationResult {
    /// Bech32 form of the signer address, when it parses as a Shelley address.
    #[must_use]
    pub fn address_bech32(&self) -> Option<String> {
        let bytes = self.address.as_deref()?;
        Address::from_bytes(bytes).ok()?.to_bech32().ok()
    }

    /// Whether `original` is the message this envelope signed.
    ///
    /// For hashed envelopes `original` is hashed before comparing.
    #[must_use]
    pub fn matches_payload(&self, original: &[u8]) -> bool {
        if self.is_hashed {
            blake2b_224(original).as_slice() == self.message.as_slice()
        } else {
            original == self.message.as_slice()
        }
    }
}

/// Sign `payload` on behalf of `address`, CIP-30 `signData` style.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if CBOR serialization fails.
pub fn sign(
    address: &[u8],
    payload: &[u8],
    key: &PrivateKey,
    hashed: bool,
) -> Result<DataSignature> {
    let public_key = key.public_key();

    let protected = HeaderMap {
        algorithm: Some(ALG_EDDSA),
        address: Some(address.to_vec()),
        hashed: Some(hashed),
        ..HeaderMap::default()
    };
    let unprotected = HeaderMap {
        key_id: Some(public_key.as_bytes().to_vec()),
        hashed: Some(hashed),
        ..HeaderMap::default()
    };
    let payload = if hashed {
        blake2b_224(payload).to_vec()
    } else {
        payload.to_vec()
    };

    let protected_bytes = protected.to_bytes()?;
    let to_sign = CoseSign1::sig_structure(&protected_bytes, &payload)?;
    let signature = key.sign(&to_sign);
    tracing::debug!(
        hashed,
        payload_len = payload.len(),
        public_key = %public_key,
        "signed COSE_Sign1"
    );

    let envelope = CoseSign1::new(protected_bytes, unprotected, payload, signature)?;
    Ok(DataSignature {
        cose_sign1: envelope.to_bytes()?,
        cose_key: CoseKey::new(public_key).to_bytes()?,
        public_key,
        signature,
    })
}

/// Parse and check a `COSE_Sign1` envelope.
///
/// The verifying key is `public_key` when given, otherwise label 4 of the
/// unprotected header, then of the protected header.
///
/// # Errors
///
/// - [`Error::MalformedEnvelope`] if the envelope cannot be parsed, names an
///   algorithm other than EdDSA, or carries a key id that is not 32 bytes.
/// - [`Error::MissingPublicKey`] if no key is available.
pub fn verify(envelope: &[u8], public_key: Option<&PublicKey>) -> Result<VerificationResult> {
    let envelope = CoseSign1::from_bytes(envelope)?;
    let protected = envelope.protected();
    let unprotected = envelope.unprotected();

    match protected.algorithm {
        Some(ALG_EDDSA) | None => {}
        Some(alg) => {
            return Err(Error::MalformedEnvelope(format!(
                "unsupported algorithm {alg}"
            )));
        }
    }

    let public_key = match public_key {
        Some(key) => *key,
        None => {
            let kid = unprotected
                .key_id
                .as_deref()
                .or(protected.key_id.as_deref())
                .ok_or(Error::MissingPublicKey)?;
            if kid.len() != PUBLIC_KEY_LEN {
                return Err(Error::MalformedEnvelope(format!(
                    "key id is {} bytes, expected {PUBLIC_KEY_LEN}",
                    kid.len()
                )));
            }
            PublicKey::from_bytes(kid)?
        }
    };

    let is_hashed = protected.hashed.or(unprotected.hashed).unwrap_or(false);
    let valid = public_key.verify(&envelope.signed_data()?, envelope.signature());
    tracing::debug!(valid, is_hashed, public_key = %public_key, "verified COSE_Sign1");

    Ok(VerificationResult {
        valid,
        is_hashed,
        address: protected.address.clone(),
        message: envelope.payload().to_vec(),
        public_key,
        signature: *envelope.signature(),
    })
}

/// Parse a verifying key given as raw 32-byte hex or as `COSE_Key` hex.
///
/// # Errors
///
/// Returns an error if the input is neither.
pub fn public_key_from_hex(input: &str) -> Result<PublicKey> {
    let bytes = decode_hex(input)?;
    if bytes.len() == PUBLIC_KEY_LEN {
        return PublicKey::from_bytes(&bytes);
    }
    Ok(*CoseKey::from_bytes(&bytes)?.public_key())
}

#[cfg(test)]
mod tests {
    use csak::Wallet;

    use super::*;
    use crate::deriver::Deriver;
    use crate::network::Network;

    const ZERO_24: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";
    const PUB: &str = "63c5d69570349e4233a0575811464f0e8a3fd329abe76e9bdc3d3f1b95982179";
    const ADDRESS: &str = "0100b7847c89d5721592fc0cc8932f50a8f8258b39b93861140a1b99fbc2f45a16a6685616e566c00fc081fe59f8bd7ab679ee15e9ce2034";

    const ENVELOPE_RAW: &str = "84584ea30127676164647265737358390100b7847c89d5721592fc0cc8932f50a8f8258b39b93861140a1b99fbc2f45a16a6685616e566c00fc081fe59f8bd7ab679ee15e9ce20344666686173686564f4a204582063c5d69570349e4233a0575811464f0e8a3fd329abe76e9bdc3d3f1b9598217966686173686564f44d68656c6c6f2063617264616e6f584051ab4cd6959a34079293688b32ea881e461fcbb442cd271bdace4632d0ffe5dafc35089b646eeb9dd26228b317d2e1f6d67d2df9c8394a051667704f7510210c";
    const ENVELOPE_HASHED: &str = "84584ea30127676164647265737358390100b7847c89d5721592fc0cc8932f50a8f8258b39b93861140a1b99fbc2f45a16a6685616e566c00fc081fe59f8bd7ab679ee15e9ce20344666686173686564f5a204582063c5d69570349e4233a0575811464f0e8a3fd329abe76e9bdc3d3f1b9598217966686173686564f5581c90a206e416397fc64637feee177845a91084169afefc6b1d4277556c584010b4dd28c7e6e2754fd699bd08176c1ef8694546722636b5d8c4cebae8cd9597a8b6879d30ccb6c039aeb5117cf35942a71a41c3821db288ae1b41380049130a";

    fn payment_key() -> PrivateKey {
        let wallet = Wallet::from_mnemonic(ZERO_24, None).unwrap();
        Deriver::new(&wallet, Network::Mainnet).payment_key(0).unwrap()
    }

    fn address() -> Vec<u8> {
        hex::decode(ADDRESS).unwrap()
    }

    #[test]
    fn test_sign_known_envelope() {
        let signed = sign(&address(), b"hello cardano", &payment_key(), false).unwrap();
        assert_eq!(signed.signature_hex(), ENVELOPE_RAW);
        assert_eq!(signed.key_hex(), format!("a4010103272006215820{PUB}"));
        assert_eq!(signed.public_key.to_hex(), PUB);
    }

    #[test]
    fn test_sign_known_envelope_hashed() {
        let signed = sign(&address(), b"hello cardano", &payment_key(), true).unwrap();
        assert_eq!(signed.signature_hex(), ENVELOPE_HASHED);
    }

    #[test]
    fn test_verify_known_envelope() {
        let result = verify(&hex::decode(ENVELOPE_RAW).unwrap(), None).unwrap();
        assert!(result.valid);
        assert!(!result.is_hashed);
        assert_eq!(result.message, b"hello cardano");
        assert_eq!(result.public_key.to_hex(), PUB);
        assert_eq!(result.address.as_deref(), Some(address().as_slice()));
        assert!(result.matches_payload(b"hello cardano"));
        assert!(!result.matches_payload(b"hello cardano!"));
        assert_eq!(
            result.address_bech32().unwrap(),
            Address::from_bytes(&address()).unwrap().to_bech32().unwrap()
        );
    }

    #[test]
    fn test_verify_hashed_returns_digest() {
        let result = verify(&hex::decode(ENVELOPE_HASHED).unwrap(), None).unwrap();
        assert!(result.valid);
        assert!(result.is_hashed);
        assert_eq!(
            hex::encode(&result.message),
            "90a206e416397fc64637feee177845a91084169afefc6b1d4277556c"
        );
        assert!(result.matches_payload(b"hello cardano"));
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let mut bytes = hex::decode(ENVELOPE_RAW).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let result = verify(&bytes, None).unwrap();
        assert!(!result.valid);
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let signed = sign(&address(), b"hello cardano", &payment_key(), false).unwrap();
        let hex = signed.signature_hex().replace(
            &hex::encode(b"hello cardano"),
            &hex::encode(b"jello cardano"),
        );
        let result = verify(&hex::decode(hex).unwrap(), None).unwrap();
        assert!(!result.valid);
        assert_eq!(result.message, b"jello cardano");
    }

    #[test]
    fn test_override_key() {
        let envelope = hex::decode(ENVELOPE_RAW).unwrap();
        let other = PrivateKey::from_bytes(&[7; 32]).unwrap().public_key();
        assert!(!verify(&envelope, Some(&other)).unwrap().valid);

        let own = PublicKey::from_hex(PUB).unwrap();
        assert!(verify(&envelope, Some(&own)).unwrap().valid);
    }

    #[test]
    fn test_standard_key_round_trip() {
        let key = PrivateKey::from_bytes(&[42; 32]).unwrap();
        let signed = sign(&address(), b"", &key, false).unwrap();
        let result = verify(&signed.cose_sign1, None).unwrap();
        assert!(result.valid);
        assert!(result.message.is_empty());
    }

    #[test]
    fn test_key_from_protected_header() {
        let key = payment_key();
        let protected = HeaderMap {
            algorithm: Some(ALG_EDDSA),
            key_id: Some(key.public_key().as_bytes().to_vec()),
            ..HeaderMap::default()
        }
        .to_bytes()
        .unwrap();
        let signature = key.sign(&CoseSign1::sig_structure(&protected, b"msg").unwrap());
        let envelope = CoseSign1::new(protected, HeaderMap::default(), b"msg".to_vec(), signature)
            .unwrap()
            .to_bytes()
            .unwrap();

        let result = verify(&envelope, None).unwrap();
        assert!(result.valid);
        assert!(!result.is_hashed);
        assert_eq!(result.address, None);
        assert_eq!(result.address_bech32(), None);
    }

    #[test]
    fn test_missing_key() {
        let protected = HeaderMap {
            algorithm: Some(ALG_EDDSA),
            ..HeaderMap::default()
        }
        .to_bytes()
        .unwrap();
        let envelope = CoseSign1::new(
            protected,
            HeaderMap::default(),
            b"msg".to_vec(),
            Signature::from_bytes(&[0; 64]).unwrap(),
        )
        .unwrap()
        .to_bytes()
        .unwrap();
        assert!(matches!(verify(&envelope, None), Err(Error::MissingPublicKey)));
    }

    #[test]
    fn test_rejects_other_algorithm() {
        let protected = HeaderMap {
            algorithm: Some(-7),
            ..HeaderMap::default()
        }
        .to_bytes()
        .unwrap();
        let envelope = CoseSign1::new(
            protected,
            HeaderMap {
                key_id: Some(vec![1; 32]),
                ..HeaderMap::default()
            },
            b"msg".to_vec(),
            Signature::from_bytes(&[0; 64]).unwrap(),
        )
        .unwrap()
        .to_bytes()
        .unwrap();
        assert!(matches!(
            verify(&envelope, None),
            Err(Error::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(verify(&[], None), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(
            verify(b"not cbor at all", None),
            Err(Error::MalformedEnvelope(_))
        ));
        let truncated = hex::decode(ENVELOPE_RAW).unwrap();
        assert!(matches!(
            verify(&truncated[..truncated.len() - 10], None),
            Err(Error::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_public_key_from_hex() {
        assert_eq!(public_key_from_hex(PUB).unwrap().to_hex(), PUB);
        assert_eq!(
            public_key_from_hex(&format!("a4010103272006215820{PUB}"))
                .unwrap()
                .to_hex(),
            PUB
        );
        assert!(public_key_from_hex("abcd").is_err());
    }
}
