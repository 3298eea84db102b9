//! Error types for Cardano key, address and signature operations.

/// Errors that can occur during Cardano wallet operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Network name not recognized.
    #[error("invalid network '{0}', expected one of: mainnet, preprod, preview, testnet")]
    InvalidNetwork(String),

    /// Key or signature material has the wrong length.
    #[error("invalid {kind} length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// What was being decoded ("private key", "public key", "signature").
        kind: &'static str,
        /// Accepted length(s), rendered for humans.
        expected: &'static str,
        /// Length actually supplied.
        actual: usize,
    },

    /// Input was not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Bytes do not decode to a point on the Ed25519 curve.
    #[error("public key is not a valid Ed25519 point")]
    InvalidPublicKey,

    /// A hardened child was requested from a public key.
    #[error("hardened derivation requires a private key")]
    HardenedFromPublic,

    /// Derivation path string could not be parsed.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    /// Address string or bytes are not a well-formed Shelley address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address decodes but is of a type this toolbox does not handle.
    #[error("unsupported address format: {0}")]
    UnsupportedAddressFormat(String),

    /// Signature envelope could not be parsed.
    #[error("malformed COSE_Sign1 envelope: {0}")]
    MalformedEnvelope(String),

    /// Envelope carries no public key and none was supplied.
    #[error("no public key in the envelope headers and none supplied")]
    MissingPublicKey,

    /// A CBOR-wrapped key or COSE_Key could not be decoded.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// CBOR or bech32 output could not be produced.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Mnemonic or seed failure.
    #[error(transparent)]
    Wallet(#[from] csak::Error),
}

impl From<bech32::primitives::decode::CheckedHrpstringError> for Error {
    fn from(err: bech32::primitives::decode::CheckedHrpstringError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

impl From<minicbor::decode::Error> for Error {
    fn from(err: minicbor::decode::Error) -> Self {
        Self::MalformedEnvelope(err.to_string())
    }
}

impl<E: core::fmt::Display> From<minicbor::encode::Error<E>> for Error {
    fn from(err: minicbor::encode::Error<E>) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<bech32::EncodeError> for Error {
    fn from(err: bech32::EncodeError) -> Self {
        Self::Encoding(err.to_string())
    }
}

/// A convenient Result type alias for csak-ada operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_key_length() {
        let err = Error::InvalidKeyLength {
            kind: "public key",
            expected: "32",
            actual: 31,
        };
        assert_eq!(
            err.to_string(),
            "invalid public key length: expected 32 bytes, got 31"
        );
    }

    #[test]
    fn test_wallet_error_is_transparent() {
        let err: Error = csak::Error::InvalidWordCount(12).into();
        assert_eq!(err.to_string(), "invalid word count 12, must be 15 or 24");
    }
}
