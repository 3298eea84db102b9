//! BIP-39 mnemonic validation with the Cardano word-count policy.
//!
//! Shelley-era wallets accept 15-word (Daedalus/Yoroi) and 24-word phrases.
//! The word count is checked before any dictionary lookup so that malformed
//! input is rejected without touching the word list or the checksum.
//!
//! # Example
//!
//! ```
//! use csak::Mnemonic;
//!
//! let mnemonic = Mnemonic::parse(
//!     "abandon abandon abandon abandon abandon abandon abandon abandon \
//!      abandon abandon abandon abandon abandon abandon address",
//! )?;
//! assert_eq!(mnemonic.word_count(), 15);
//! assert_eq!(mnemonic.entropy(), &[0u8; 20]);
//! # Ok::<(), csak::Error>(())
//! ```

use core::fmt;

use bip39::Language;
use zeroize::Zeroizing;

use crate::{Error, Result, Seed};

/// Word counts accepted when validating a phrase.
pub const ACCEPTED_WORD_COUNTS: [usize; 2] = [15, 24];

/// Entropy lengths in bytes, matching [`ACCEPTED_WORD_COUNTS`].
pub const ACCEPTED_ENTROPY_LENGTHS: [usize; 2] = [20, 32];

/// Word count of freshly generated phrases.
pub const GENERATED_WORD_COUNT: usize = 24;

/// A validated BIP-39 mnemonic.
///
/// Holds the normalized phrase and its raw entropy, both wiped on drop.
/// Once constructed the phrase can no longer change.
pub struct Mnemonic {
    phrase: Zeroizing<String>,
    entropy: Zeroizing<Vec<u8>>,
    word_count: usize,
}

impl Mnemonic {
    /// Validate an ordered sequence of words.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidWordCount`] if there are not exactly 15 or 24 words.
    /// - [`Error::UnknownWord`] if a word is missing from the English list.
    /// - [`Error::Mnemonic`] if the checksum does not match.
    pub fn validate<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        if !ACCEPTED_WORD_COUNTS.contains(&words.len()) {
            return Err(Error::InvalidWordCount(words.len()));
        }

        let mut normalized = Zeroizing::new(String::new());
        for (i, word) in words.iter().enumerate() {
            let word = Zeroizing::new(word.as_ref().trim().to_lowercase());
            if Language::English.find_word(&word).is_none() {
                return Err(Error::UnknownWord {
                    position: i + 1,
                    word: word.to_string(),
                });
            }
            if i > 0 {
                normalized.push(' ');
            }
            normalized.push_str(&word);
        }

        let inner = bip39::Mnemonic::parse_in_normalized(Language::English, &normalized)?;
        Ok(Self::from_inner(&inner))
    }

    /// Validate a whitespace-separated phrase.
    ///
    /// # Errors
    ///
    /// Same as [`Mnemonic::validate`].
    pub fn parse(phrase: &str) -> Result<Self> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        Self::validate(&words)
    }

    /// Build a mnemonic from raw entropy (20 bytes for 15 words, 32 bytes for 24).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntropyLength`] for any other entropy length.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        if !ACCEPTED_ENTROPY_LENGTHS.contains(&entropy.len()) {
            return Err(Error::InvalidEntropyLength(entropy.len()));
        }
        let inner = bip39::Mnemonic::from_entropy_in(Language::English, entropy)?;
        Ok(Self::from_inner(&inner))
    }

    /// Generate a fresh 24-word mnemonic from the operating system RNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the dictionary collaborator fails to build the phrase.
    #[cfg(feature = "rand")]
    pub fn generate() -> Result<Self> {
        let inner = bip39::Mnemonic::generate_in(Language::English, GENERATED_WORD_COUNT)?;
        tracing::debug!(words = GENERATED_WORD_COUNT, "generated mnemonic");
        Ok(Self::from_inner(&inner))
    }

    fn from_inner(inner: &bip39::Mnemonic) -> Self {
        Self {
            phrase: Zeroizing::new(inner.to_string()),
            entropy: Zeroizing::new(inner.to_entropy()),
            word_count: inner.word_count(),
        }
    }

    /// The normalized phrase, words separated by single spaces.
    ///
    /// **Security Warning**: this phrase reconstructs every derived key.
    #[inline]
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Raw entropy encoded by the phrase.
    #[inline]
    #[must_use]
    pub fn entropy(&self) -> &[u8] {
        &self.entropy
    }

    /// Number of words in the phrase.
    #[inline]
    #[must_use]
    pub const fn word_count(&self) -> usize {
        self.word_count
    }

    /// Stretch this mnemonic into a root [`Seed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyDerivation`] if PBKDF2 fails.
    pub fn to_seed(&self, passphrase: Option<&str>) -> Result<Seed> {
        Seed::from_entropy(self.entropy(), passphrase)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("word_count", &self.word_count)
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}
