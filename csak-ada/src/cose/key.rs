//! Ed25519 `COSE_Key` (OKP key type) as returned by CIP-30 `signData`.

use minicbor::data::Type;
use minicbor::{Decoder, Encoder};

use super::ALG_EDDSA;
use crate::keys::PublicKey;
use crate::{Error, Result};

const LABEL_KTY: i64 = 1;
const LABEL_ALG: i64 = 3;
const LABEL_CRV: i64 = -1;
const LABEL_X: i64 = -2;

const KTY_OKP: i64 = 1;
const CRV_ED25519: i64 = 6;

/// An Ed25519 public key in `COSE_Key` form: `{1: 1, 3: -8, -1: 6, -2: key}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoseKey {
    public_key: PublicKey,
}

impl CoseKey {
    /// Wrap a public key.
    #[must_use]
    pub const fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// The wrapped public key.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Serialize as a CBOR map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the CBOR writer fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut e = Encoder::new(Vec::new());
        e.map(4)?
            .i64(LABEL_KTY)?
            .i64(KTY_OKP)?
            .i64(LABEL_ALG)?
            .i64(ALG_EDDSA)?
            .i64(LABEL_CRV)?
            .i64(CRV_ED25519)?
            .i64(LABEL_X)?
            .bytes(self.public_key.as_bytes())?;
        Ok(e.into_writer())
    }

    /// Parse a `COSE_Key` map.
    ///
    /// Key type and curve must be OKP/Ed25519 when present; `x` is required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyEncoding`] for anything else.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(bytes).map_err(|e| match e {
            Error::MalformedEnvelope(reason) => Error::InvalidKeyEncoding(reason),
            other => other,
        })
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut d = Decoder::new(bytes);
        let len = d
            .map()?
            .ok_or_else(|| invalid("indefinite-length map"))?;

        let mut x = None;
        for _ in 0..len {
            if !matches!(
                d.datatype()?,
                Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16 | Type::I32 | Type::I64
            ) {
                d.skip()?;
                d.skip()?;
                continue;
            }
            match d.i64()? {
                LABEL_KTY => expect_int(&mut d, KTY_OKP, "key type")?,
                LABEL_ALG => expect_int(&mut d, ALG_EDDSA, "algorithm")?,
                LABEL_CRV => expect_int(&mut d, CRV_ED25519, "curve")?,
                LABEL_X => x = Some(PublicKey::from_bytes(d.bytes()?)?),
                _ => d.skip()?,
            }
        }
        if d.position() != bytes.len() {
            return Err(invalid("trailing bytes after COSE_Key"));
        }

        let public_key = x.ok_or_else(|| invalid("missing x coordinate (label -2)"))?;
        Ok(Self { public_key })
    }
}

fn expect_int(d: &mut Decoder<'_>, expected: i64, what: &str) -> Result<()> {
    let value = d.i64()?;
    if value == expected {
        Ok(())
    } else {
        Err(invalid(&format!("unsupported {what} {value}")))
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidKeyEncoding(reason.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUB: &str = "63c5d69570349e4233a0575811464f0e8a3fd329abe76e9bdc3d3f1b95982179";

    #[test]
    fn test_layout() {
        let key = CoseKey::new(PublicKey::from_hex(PUB).unwrap());
        assert_eq!(
            hex::encode(key.to_bytes().unwrap()),
            format!("a4010103272006215820{PUB}")
        );
    }

    #[test]
    fn test_parse() {
        let bytes = hex::decode(format!("a4010103272006215820{PUB}")).unwrap();
        let key = CoseKey::from_bytes(&bytes).unwrap();
        assert_eq!(key.public_key().to_hex(), PUB);
    }

    #[test]
    fn test_parse_minimal() {
        // Only kty and x.
        let bytes = hex::decode(format!("a201012158 20{PUB}").replace(' ', "")).unwrap();
        assert!(CoseKey::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_rejects_other_curve() {
        // crv = 1 (P-256)
        let bytes = hex::decode(format!("a4010103272001215820{PUB}")).unwrap();
        assert!(matches!(
            CoseKey::from_bytes(&bytes),
            Err(Error::InvalidKeyEncoding(_))
        ));
    }

    #[test]
    fn test_rejects_missing_x() {
        let bytes = hex::decode("a3010103272006").unwrap();
        assert!(matches!(
            CoseKey::from_bytes(&bytes),
            Err(Error::InvalidKeyEncoding(_))
        ));
    }

    #[test]
    fn test_rejects_short_x() {
        let bytes = hex::decode("a4010103272006215801aa").unwrap();
        assert!(matches!(
            CoseKey::from_bytes(&bytes),
            Err(Error::InvalidKeyLength { actual: 1, .. })
        ));
    }
}
