//! Encoding helpers for keys and addresses.

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use minicbor::{Decoder, Encoder};

use crate::{Error, Result};

/// Decode user-supplied hex: whitespace anywhere is ignored and a `0x` prefix is allowed.
///
/// # Errors
///
/// Returns [`Error::InvalidHex`] for odd lengths or non-hex characters.
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    Ok(hex::decode(digits)?)
}

/// Encode bytes as Bech32 (not Bech32m) under `hrp`.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the HRP is invalid or the result is too long.
pub fn bech32_encode(hrp: &str, data: &[u8]) -> Result<String> {
    let hrp = Hrp::parse(hrp).map_err(|e| Error::Encoding(e.to_string()))?;
    Ok(bech32::encode::<Bech32>(hrp, data)?)
}

/// Decode a Bech32 string into its lowercase HRP and data bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] on a bad checksum or character set.
pub fn bech32_decode(encoded: &str) -> Result<(String, Vec<u8>)> {
    let checked = CheckedHrpstring::new::<Bech32>(encoded.trim())?;
    Ok((checked.hrp().to_lowercase(), checked.byte_iter().collect()))
}

/// Wrap raw bytes in a single CBOR byte string.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the CBOR writer fails.
pub fn cbor_wrap(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(Vec::with_capacity(bytes.len() + 3));
    encoder.bytes(bytes)?;
    Ok(encoder.into_writer())
}

/// Unwrap a single CBOR byte string, rejecting trailing data.
///
/// # Errors
///
/// Returns [`Error::InvalidKeyEncoding`] if the input is not exactly one byte string.
pub fn cbor_unwrap(cbor: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = Decoder::new(cbor);
    let inner = decoder
        .bytes()
        .map_err(|e| Error::InvalidKeyEncoding(e.to_string()))?;
    if decoder.position() != cbor.len() {
        return Err(Error::InvalidKeyEncoding(format!(
            "{} trailing bytes after CBOR byte string",
            cbor.len() - decoder.position()
        )));
    }
    Ok(inner.to_vec())
}
