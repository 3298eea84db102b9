//! Error types for mnemonic and seed operations.

/// Errors that can occur while validating a mnemonic or stretching it into a seed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The phrase does not have an accepted number of words.
    #[error("invalid word count {0}, must be 15 or 24")]
    InvalidWordCount(usize),

    /// Raw entropy does not map to an accepted word count.
    #[error("invalid entropy length {0} bytes, must be 20 or 32")]
    InvalidEntropyLength(usize),

    /// A word is not part of the BIP-39 English dictionary.
    #[error("word #{position} (\"{word}\") is not in the BIP-39 word list")]
    UnknownWord {
        /// One-based position of the offending word.
        position: usize,
        /// The rejected word.
        word: String,
    },

    /// The dictionary accepted every word but rejected the phrase (checksum, entropy).
    #[error("mnemonic error: {0}")]
    Mnemonic(#[from] bip39::Error),

    /// PBKDF2 refused the requested output length.
    #[error("PBKDF2 key derivation failed")]
    KeyDerivation,
}

/// A convenient Result type alias for csak operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_word_count() {
        assert_eq!(
            Error::InvalidWordCount(14).to_string(),
            "invalid word count 14, must be 15 or 24"
        );
    }

    #[test]
    fn test_display_entropy_length() {
        assert_eq!(
            Error::InvalidEntropyLength(21).to_string(),
            "invalid entropy length 21 bytes, must be 20 or 32"
        );
    }

    #[test]
    fn test_display_unknown_word() {
        let err = Error::UnknownWord {
            position: 3,
            word: "cardano".into(),
        };
        assert_eq!(
            err.to_string(),
            "word #3 (\"cardano\") is not in the BIP-39 word list"
        );
    }
}
