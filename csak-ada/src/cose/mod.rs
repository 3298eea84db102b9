//! Minimal COSE (RFC 9052) support for CIP-8 message signing.
//!
//! Only what CIP-30 `signData` needs is covered: `COSE_Sign1` envelopes with
//! EdDSA, the header labels wallets actually use, and Ed25519 `COSE_Key`s.
//! Header maps must have a definite length.

mod key;

use minicbor::data::Type;
use minicbor::{Decoder, Encoder};

use crate::keys::Signature;
use crate::{Error, Result};

pub use key::CoseKey;

/// COSE algorithm id for EdDSA.
pub const ALG_EDDSA: i64 = -8;

/// CBOR tag for `COSE_Sign1`.
pub const TAG_COSE_SIGN1: u64 = 18;

const LABEL_ALG: i64 = 1;
const LABEL_KID: i64 = 4;
const LABEL_ADDRESS: &str = "address";
const LABEL_HASHED: &str = "hashed";

/// The header fields this toolbox reads and writes. Unknown labels are skipped on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    /// Label 1.
    pub algorithm: Option<i64>,
    /// Label 4; CIP-30 wallets put the signer's public key here.
    pub key_id: Option<Vec<u8>>,
    /// Text label `address`: raw address bytes.
    pub address: Option<Vec<u8>>,
    /// Text label `hashed`: whether the payload is a Blake2b-224 digest.
    pub hashed: Option<bool>,
}

impl HeaderMap {
    fn len(&self) -> u64 {
        [
            self.algorithm.is_some(),
            self.key_id.is_some(),
            self.address.is_some(),
            self.hashed.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count() as u64
    }

    fn encode<W: minicbor::encode::Write>(&self, e: &mut Encoder<W>) -> Result<()>
    where
        W::Error: core::fmt::Display,
    {
        e.map(self.len())?;
        if let Some(alg) = self.algorithm {
            e.i64(LABEL_ALG)?.i64(alg)?;
        }
        if let Some(kid) = &self.key_id {
            e.i64(LABEL_KID)?.bytes(kid)?;
        }
        if let Some(address) = &self.address {
            e.str(LABEL_ADDRESS)?.bytes(address)?;
        }
        if let Some(hashed) = self.hashed {
            e.str(LABEL_HASHED)?.bool(hashed)?;
        }
        Ok(())
    }

    /// Serialize as a standalone CBOR map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the CBOR writer fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut e = Encoder::new(Vec::new());
        self.encode(&mut e)?;
        Ok(e.into_writer())
    }

    fn decode(d: &mut Decoder<'_>) -> Result<Self> {
        let len = d
            .map()?
            .ok_or_else(|| malformed("indefinite-length header map"))?;
        let mut header = Self::default();
        for _ in 0..len {
            match d.datatype()? {
                Type::String => match d.str()? {
                    LABEL_ADDRESS => header.address = Some(d.bytes()?.to_vec()),
                    LABEL_HASHED => header.hashed = Some(d.bool()?),
                    _ => d.skip()?,
                },
                Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16
                | Type::I32 | Type::I64 => match d.i64()? {
                    LABEL_ALG => header.algorithm = Some(d.i64()?),
                    LABEL_KID => header.key_id = Some(d.bytes()?.to_vec()),
                    _ => d.skip()?,
                },
                _ => {
                    d.skip()?;
                    d.skip()?;
                }
            }
        }
        Ok(header)
    }

    /// Decode a serialized protected header. An empty byte string is an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEnvelope`] if the bytes are not one CBOR map.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        let mut d = Decoder::new(bytes);
        let header = Self::decode(&mut d)?;
        ensure_consumed(&d, bytes.len(), "protected header")?;
        Ok(header)
    }
}

/// A `COSE_Sign1` structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoseSign1 {
    protected_bytes: Vec<u8>,
    protected: HeaderMap,
    unprotected: HeaderMap,
    payload: Vec<u8>,
    signature: Signature,
}

impl CoseSign1 {
    /// Bytes that get signed for `protected` and `payload` (`Sig_structure`, empty external AAD).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the CBOR writer fails.
    pub fn sig_structure(protected_bytes: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let mut e = Encoder::new(Vec::new());
        e.array(4)?
            .str("Signature1")?
            .bytes(protected_bytes)?
            .bytes(&[])?
            .bytes(payload)?;
        Ok(e.into_writer())
    }

    /// Assemble from parts; `protected_bytes` must be the exact bytes that were signed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEnvelope`] if `protected_bytes` is not a header map.
    pub fn new(
        protected_bytes: Vec<u8>,
        unprotected: HeaderMap,
        payload: Vec<u8>,
        signature: Signature,
    ) -> Result<Self> {
        let protected = HeaderMap::from_bytes(&protected_bytes)?;
        Ok(Self {
            protected_bytes,
            protected,
            unprotected,
            payload,
            signature,
        })
    }

    /// Parse an envelope, with or without the CBOR tag 18 prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEnvelope`] on any structural problem, including a
    /// detached (`nil`) payload, trailing bytes, or a signature that is not 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut d = Decoder::new(bytes);

        if d.datatype()? == Type::Tag {
            let tag = d.tag()?;
            if tag.as_u64() != TAG_COSE_SIGN1 {
                return Err(malformed(&format!("unexpected tag {}", tag.as_u64())));
            }
        }

        match d.array()? {
            Some(4) => {}
            Some(n) => return Err(malformed(&format!("expected 4 elements, found {n}"))),
            None => return Err(malformed("indefinite-length array")),
        }

        let protected_bytes = d.bytes()?.to_vec();
        let protected = HeaderMap::from_bytes(&protected_bytes)?;
        let unprotected = HeaderMap::decode(&mut d)?;

        if d.datatype()? == Type::Null {
            return Err(malformed("detached payload is not supported"));
        }
        let payload = d.bytes()?.to_vec();

        let signature = Signature::from_bytes(d.bytes()?)
            .map_err(|e| malformed(&e.to_string()))?;

        ensure_consumed(&d, bytes.len(), "envelope")?;

        Ok(Self {
            protected_bytes,
            protected,
            unprotected,
            payload,
            signature,
        })
    }

    /// Parse hex input (whitespace and `0x` tolerated).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEnvelope`] for bad hex or structure.
    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = crate::encoding::decode_hex(input).map_err(|e| malformed(&e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Serialize as an untagged CBOR array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the CBOR writer fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut e = Encoder::new(Vec::new());
        e.array(4)?.bytes(&self.protected_bytes)?;
        self.unprotected.encode(&mut e)?;
        e.bytes(&self.payload)?.bytes(self.signature.as_bytes())?;
        Ok(e.into_writer())
    }

    /// `Sig_structure` for this envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the CBOR writer fails.
    pub fn signed_data(&self) -> Result<Vec<u8>> {
        Self::sig_structure(&self.protected_bytes, &self.payload)
    }

    /// Serialized protected header exactly as received.
    #[must_use]
    pub fn protected_bytes(&self) -> &[u8] {
        &self.protected_bytes
    }

    /// Decoded protected header.
    #[must_use]
    pub const fn protected(&self) -> &HeaderMap {
        &self.protected
    }

    /// Unprotected header.
    #[must_use]
    pub const fn unprotected(&self) -> &HeaderMap {
        &self.unprotected
    }

    /// Payload as carried in the envelope.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The Ed25519 signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }
}

fn malformed(reason: &str) -> Error {
    Error::MalformedEnvelope(reason.to_owned())
}

fn ensure_consumed(d: &Decoder<'_>, len: usize, what: &str) -> Result<()> {
    if d.position() == len {
        Ok(())
    } else {
        Err(malformed(&format!(
            "{} trailing bytes after {what}",
            len - d.position()
        )))
    }
}
