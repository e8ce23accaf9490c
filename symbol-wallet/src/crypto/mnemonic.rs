//! Mnemonic phrase generation and handling

use std::fmt;
use std::str::FromStr;

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words24 => 32,
        }
    }
}

/// A validated BIP-39 mnemonic pass phrase.
///
/// The phrase is immutable once created. Its `Debug` output never shows the
/// words.
#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicPassPhrase {
    inner: Mnemonic,
}

impl MnemonicPassPhrase {
    /// Generate a new random mnemonic with the specified strength
    pub fn generate(strength: MnemonicStrength) -> Result<Self> {
        let mut entropy = Zeroizing::new(vec![0u8; strength.entropy_bytes()]);
        OsRng.fill_bytes(&mut entropy);

        let inner = Mnemonic::from_entropy(&entropy).map_err(|e| Error::Mnemonic(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parse a phrase, normalizing whitespace and checking the checksum
    pub fn parse(phrase: &str) -> Result<Self> {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        let inner = Mnemonic::parse_normalized(&normalized).map_err(|e| Error::Mnemonic(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Number of words in the phrase
    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// The words as a single space-separated string
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.inner.to_string())
    }

    /// Convert to the 64-byte BIP-39 seed with an empty passphrase
    pub fn to_seed(&self) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.inner.to_seed(""))
    }
}

impl FromStr for MnemonicPassPhrase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for MnemonicPassPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicPassPhrase")
            .field("words", &self.word_count())
            .finish_non_exhaustive()
    }
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> bool {
    MnemonicPassPhrase::parse(phrase).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_mnemonic() {
        let mnemonic = MnemonicPassPhrase::generate(MnemonicStrength::Words12).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        assert!(validate_mnemonic(&mnemonic.phrase()));

        let mnemonic = MnemonicPassPhrase::generate(MnemonicStrength::Words24).unwrap();
        assert_eq!(mnemonic.word_count(), 24);
    }

    #[test]
    fn test_validate_mnemonic() {
        let invalid = "invalid mnemonic phrase test test test test test test test test test";

        assert!(validate_mnemonic(ABANDON));
        assert!(!validate_mnemonic(invalid));
        assert!(matches!(MnemonicPassPhrase::parse(invalid), Err(Error::Mnemonic(_))));
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let spaced = format!("  {}  ", ABANDON.replace(' ', "   "));
        let mnemonic: MnemonicPassPhrase = spaced.parse().unwrap();
        assert_eq!(mnemonic.phrase().as_str(), ABANDON);
    }

    #[test]
    fn test_mnemonic_to_seed() {
        let mnemonic = MnemonicPassPhrase::parse(ABANDON).unwrap();
        let seed = mnemonic.to_seed();

        assert_eq!(
            hex::encode(&seed[..]),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_debug_hides_words() {
        let mnemonic = MnemonicPassPhrase::parse(ABANDON).unwrap();
        let debug = format!("{:?}", mnemonic);
        assert!(!debug.contains("abandon"));
    }
}
