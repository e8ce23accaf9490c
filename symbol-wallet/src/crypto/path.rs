//! Derivation path validation and arithmetic
//!
//! Symbol accounts live at `m/purpose'/coin_type'/account'/chain'/address_index'`.
//! SLIP-0010 only defines hardened child derivation for Ed25519, so every one of
//! the five levels must carry the `'` marker.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default wallet derivation path
pub const DEFAULT_WALLET_PATH: &str = "m/44'/43'/0'/0'/0'";

/// Number of levels below the master node
pub const PATH_DEPTH: usize = 5;

/// Offset of hardened child numbers
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Largest index a single level may carry
pub const MAX_INDEX: u32 = HARDENED_OFFSET - 1;

/// Named levels of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Purpose,
    CoinType,
    Account,
    Chain,
    AddressIndex,
}

impl Level {
    /// All levels in path order
    pub const ALL: [Level; PATH_DEPTH] = [
        Level::Purpose,
        Level::CoinType,
        Level::Account,
        Level::Chain,
        Level::AddressIndex,
    ];

    fn position(self) -> usize {
        match self {
            Level::Purpose => 0,
            Level::CoinType => 1,
            Level::Account => 2,
            Level::Chain => 3,
            Level::AddressIndex => 4,
        }
    }
}

/// One level of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex {
    index: u32,
    hardened: bool,
}

impl ChildIndex {
    /// A hardened index, `None` if it does not fit in 31 bits
    pub fn hardened(index: u32) -> Option<Self> {
        (index <= MAX_INDEX).then_some(Self { index, hardened: true })
    }

    /// The index without the hardened offset
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// The BIP-32 child number, hardened offset included
    pub fn child_number(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }

    fn parse_segment(segment: &str) -> Option<Self> {
        let (digits, hardened) = match segment.strip_suffix('\'') {
            Some(digits) => (digits, true),
            None => (segment, false),
        };

        // u32::from_str accepts a leading '+', which is not valid path syntax
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let index = digits.parse::<u32>().ok()?;
        if index > MAX_INDEX {
            return None;
        }

        Some(Self { index, hardened })
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// A parsed, schema-checked derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    levels: [ChildIndex; PATH_DEPTH],
}

impl DerivationPath {
    /// Parse and validate a path string
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = || Error::InvalidPath(path.to_string());

        let mut segments = path.split('/');
        if segments.next() != Some("m") {
            return Err(invalid());
        }

        let mut levels = [ChildIndex { index: 0, hardened: true }; PATH_DEPTH];
        let mut count = 0;
        for segment in segments {
            if count == PATH_DEPTH {
                return Err(invalid());
            }
            let child = ChildIndex::parse_segment(segment).ok_or_else(invalid)?;
            if !child.is_hardened() {
                return Err(invalid());
            }
            levels[count] = child;
            count += 1;
        }

        if count != PATH_DEPTH {
            return Err(invalid());
        }

        Ok(Self { levels })
    }

    /// Build a path from raw level values, all hardened
    pub fn from_indices(purpose: u32, coin_type: u32, account: u32, chain: u32, address_index: u32) -> Result<Self> {
        let mut levels = [ChildIndex { index: 0, hardened: true }; PATH_DEPTH];
        for (slot, value) in levels
            .iter_mut()
            .zip([purpose, coin_type, account, chain, address_index])
        {
            *slot = ChildIndex::hardened(value)
                .ok_or_else(|| Error::InvalidPath(format!("level value {} exceeds {}", value, MAX_INDEX)))?;
        }
        Ok(Self { levels })
    }

    /// The default Symbol wallet path
    pub fn default_wallet() -> Self {
        Self {
            levels: [
                ChildIndex { index: 44, hardened: true },
                ChildIndex { index: 43, hardened: true },
                ChildIndex { index: 0, hardened: true },
                ChildIndex { index: 0, hardened: true },
                ChildIndex { index: 0, hardened: true },
            ],
        }
    }

    pub fn level(&self, level: Level) -> ChildIndex {
        self.levels[level.position()]
    }

    /// BIP-32 child numbers from the master node down
    pub fn child_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.iter().map(ChildIndex::child_number)
    }

    /// The sibling path with `level` incremented by one
    pub fn incremented(&self, level: Level) -> Result<Self> {
        let current = self.levels[level.position()];
        if current.index >= MAX_INDEX {
            return Err(Error::InvalidPath(format!(
                "{} cannot be incremented at {:?}: index would exceed {}",
                self, level, MAX_INDEX
            )));
        }

        let mut next = *self;
        next.levels[level.position()] = ChildIndex {
            index: current.index + 1,
            hardened: current.hardened,
        };
        Ok(next)
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self::default_wallet()
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for level in &self.levels {
            write!(f, "/{}", level)?;
        }
        Ok(())
    }
}

/// Check whether `path` is a valid five-level, fully hardened derivation path
pub fn validate(path: &str) -> bool {
    DerivationPath::parse(path).is_ok()
}

/// Increment `level` of `path` by one, keeping every other level unchanged
pub fn increment_level(path: &str, level: Level) -> Result<String> {
    let parsed = DerivationPath::parse(path)?;
    Ok(parsed.incremented(level)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_paths() {
        assert!(validate(DEFAULT_WALLET_PATH));
        assert!(validate("m/44'/43'/1'/0'/7'"));
        assert!(validate("m/0'/0'/0'/0'/0'"));
        assert!(validate("m/44'/43'/0'/0'/2147483647'"));
    }

    #[test]
    fn test_invalid_paths() {
        // four levels
        assert!(!validate("m/44'/43'/0'/0'"));
        // six levels
        assert!(!validate("m/44'/43'/0'/0'/0'/0'"));
        // unhardened level
        assert!(!validate("m/44/43'/0'/0'/0'"));
        assert!(!validate("m/44'/43'/0'/0'/0"));
        // overflow of the 31-bit range
        assert!(!validate("m/44'/43'/0'/0'/2147483648'"));
        assert!(!validate("m/44'/43'/0'/0'/99999999999'"));
        // syntax
        assert!(!validate(""));
        assert!(!validate("m"));
        assert!(!validate("M/44'/43'/0'/0'/0'"));
        assert!(!validate("44'/43'/0'/0'/0'"));
        assert!(!validate("m/44'/43'//0'/0'"));
        assert!(!validate("m/44'/43'/0'/0'/0'/"));
        assert!(!validate("m/44'/+43'/0'/0'/0'"));
        assert!(!validate("m/44'/-1'/0'/0'/0'"));
        assert!(!validate("m/44'/43'/0'/0'/ 0'"));
        assert!(!validate("m/44''/43'/0'/0'/0'"));
        assert!(!validate("m/44h/43'/0'/0'/0'"));
    }

    #[test]
    fn test_increment_address_index() {
        assert_eq!(
            increment_level(DEFAULT_WALLET_PATH, Level::AddressIndex).unwrap(),
            "m/44'/43'/0'/0'/1'"
        );
    }

    #[test]
    fn test_increment_each_level() {
        assert_eq!(increment_level(DEFAULT_WALLET_PATH, Level::Purpose).unwrap(), "m/45'/43'/0'/0'/0'");
        assert_eq!(increment_level(DEFAULT_WALLET_PATH, Level::CoinType).unwrap(), "m/44'/44'/0'/0'/0'");
        assert_eq!(increment_level(DEFAULT_WALLET_PATH, Level::Account).unwrap(), "m/44'/43'/1'/0'/0'");
        assert_eq!(increment_level(DEFAULT_WALLET_PATH, Level::Chain).unwrap(), "m/44'/43'/0'/1'/0'");
    }

    #[test]
    fn test_increment_rejects_invalid_input() {
        let result = increment_level("m/44'/43'/0'/0'", Level::AddressIndex);
        assert_eq!(result, Err(Error::InvalidPath("m/44'/43'/0'/0'".to_string())));
    }

    #[test]
    fn test_increment_at_max_index_fails() {
        let result = increment_level("m/44'/43'/0'/0'/2147483647'", Level::AddressIndex);
        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_from_indices_and_default() {
        let path = DerivationPath::from_indices(44, 43, 0, 0, 0).unwrap();
        assert_eq!(path, DerivationPath::default_wallet());
        assert_eq!(path.to_string(), DEFAULT_WALLET_PATH);
        assert!(DerivationPath::from_indices(44, 43, 0, 0, HARDENED_OFFSET).is_err());
    }

    #[test]
    fn test_child_numbers() {
        let path: DerivationPath = DEFAULT_WALLET_PATH.parse().unwrap();
        let numbers: Vec<u32> = path.child_numbers().collect();
        assert_eq!(
            numbers,
            vec![HARDENED_OFFSET + 44, HARDENED_OFFSET + 43, HARDENED_OFFSET, HARDENED_OFFSET, HARDENED_OFFSET]
        );
        assert_eq!(path.level(Level::CoinType).index(), 43);
    }

    proptest! {
        #[test]
        fn prop_formatted_paths_round_trip(levels in proptest::array::uniform5(0u32..=MAX_INDEX)) {
            let path = format!(
                "m/{}'/{}'/{}'/{}'/{}'",
                levels[0], levels[1], levels[2], levels[3], levels[4]
            );
            prop_assert!(validate(&path));
            prop_assert_eq!(DerivationPath::parse(&path).unwrap().to_string(), path);
        }

        #[test]
        fn prop_increment_touches_one_level(
            levels in proptest::array::uniform5(0u32..MAX_INDEX),
            which in 0usize..PATH_DEPTH,
        ) {
            let path = DerivationPath::from_indices(levels[0], levels[1], levels[2], levels[3], levels[4]).unwrap();
            let level = Level::ALL[which];
            let next = path.incremented(level).unwrap();

            for other in Level::ALL {
                if other == level {
                    prop_assert_eq!(next.level(other).index(), path.level(other).index() + 1);
                } else {
                    prop_assert_eq!(next.level(other), path.level(other));
                }
                prop_assert!(next.level(other).is_hardened());
            }
        }

        #[test]
        fn prop_validate_never_panics(input in ".*") {
            let _ = validate(&input);
        }
    }
}
