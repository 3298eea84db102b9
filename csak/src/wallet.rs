//! Wallet type pairing a validated mnemonic with its Icarus root key.

use crate::{Mnemonic, Result, Seed};

/// An HD wallet root for Cardano key derivation.
///
/// Holds a validated mnemonic and the 96-byte root key stretched from it.
/// Account, role and address derivation live in `csak-ada`.
///
/// # Passphrase Support
///
/// The optional passphrase is the PBKDF2 password. The same mnemonic with a
/// different passphrase yields an unrelated wallet.
#[derive(Debug)]
pub struct Wallet {
    mnemonic: Mnemonic,
    seed: Seed,
    has_passphrase: bool,
}

impl Wallet {
    /// Generate a new wallet with a random 24-word mnemonic.
    ///
    /// # Errors
    ///
    /// Returns an error if mnemonic generation or seed stretching fails.
    #[cfg(feature = "rand")]
    pub fn generate(passphrase: Option<&str>) -> Result<Self> {
        Self::new(Mnemonic::generate()?, passphrase)
    }

    /// Restore a wallet from a whitespace-separated phrase.
    ///
    /// # Errors
    ///
    /// Returns an error if the phrase is not a valid 15 or 24 word mnemonic.
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        Self::new(Mnemonic::parse(phrase)?, passphrase)
    }

    /// Restore a wallet from an ordered word sequence.
    ///
    /// # Errors
    ///
    /// Same as [`Wallet::from_mnemonic`].
    pub fn from_words<S: AsRef<str>>(words: &[S], passphrase: Option<&str>) -> Result<Self> {
        Self::new(Mnemonic::validate(words)?, passphrase)
    }

    /// Build a wallet from raw entropy (20 or 32 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidEntropyLength`] unless the entropy is 20 or 32 bytes.
    pub fn from_entropy(entropy: &[u8], passphrase: Option<&str>) -> Result<Self> {
        Self::new(Mnemonic::from_entropy(entropy)?, passphrase)
    }

    fn new(mnemonic: Mnemonic, passphrase: Option<&str>) -> Result<Self> {
        let seed = mnemonic.to_seed(passphrase)?;
        Ok(Self {
            mnemonic,
            seed,
            has_passphrase: passphrase.is_some_and(|p| !p.is_empty()),
        })
    }

    /// Get the mnemonic phrase.
    ///
    /// **Security Warning**: Handle this value carefully as it can
    /// reconstruct all derived keys.
    #[inline]
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        self.mnemonic.phrase()
    }

    /// Get the root key.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Check if a non-empty passphrase was used.
    #[must_use]
    pub const fn has_passphrase(&self) -> bool {
        self.has_passphrase
    }

    /// Get the word count of the mnemonic.
    #[inline]
    #[must_use]
    pub const fn word_count(&self) -> usize {
        self.mnemonic.word_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon address";

    #[cfg(feature = "rand")]
    #[test]
    fn test_generate() {
        let wallet = Wallet::generate(None).unwrap();
        assert_eq!(wallet.word_count(), 24);
        assert!(!wallet.has_passphrase());
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_generate_with_passphrase() {
        let wallet = Wallet::generate(Some("secret")).unwrap();
        assert!(wallet.has_passphrase());
    }

    #[test]
    fn test_from_mnemonic() {
        let wallet = Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap();
        assert_eq!(wallet.mnemonic(), TEST_MNEMONIC);
        assert_eq!(wallet.word_count(), 15);
    }

    #[test]
    fn test_from_words_matches_phrase() {
        let words: Vec<&str> = TEST_MNEMONIC.split(' ').collect();
        let a = Wallet::from_words(&words, None).unwrap();
        let b = Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap();
        assert_eq!(a.seed(), b.seed());
    }

    #[test]
    fn test_invalid_entropy_length() {
        let result = Wallet::from_entropy(&[0u8; 16], None);
        assert!(matches!(result, Err(Error::InvalidEntropyLength(16))));
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let wallet1 = Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap();
        let wallet2 = Wallet::from_mnemonic(TEST_MNEMONIC, Some("password")).unwrap();
        assert_ne!(wallet1.seed(), wallet2.seed());
        assert!(wallet2.has_passphrase());
    }

    #[test]
    fn test_empty_passphrase_is_no_passphrase() {
        let wallet = Wallet::from_mnemonic(TEST_MNEMONIC, Some("")).unwrap();
        assert!(!wallet.has_passphrase());
    }

    #[test]
    fn test_deterministic_seed() {
        let wallet1 = Wallet::from_mnemonic(TEST_MNEMONIC, Some("test")).unwrap();
        let wallet2 = Wallet::from_mnemonic(TEST_MNEMONIC, Some("test")).unwrap();
        assert_eq!(wallet1.seed(), wallet2.seed());
    }
}
