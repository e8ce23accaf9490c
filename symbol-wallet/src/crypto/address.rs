//! Symbol address encoding
//!
//! An address is `network byte || RIPEMD160(SHA3-256(public key)) || checksum`
//! where the checksum is the first three bytes of SHA3-256 over the preceding
//! 21 bytes. The 24 raw bytes are base32 encoded without padding (39 chars).

use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::error::{Error, Result};

const RIPEMD_LENGTH: usize = 20;
const CHECKSUM_LENGTH: usize = 3;
const RAW_ADDRESS_LENGTH: usize = 1 + RIPEMD_LENGTH + CHECKSUM_LENGTH;

/// Length of an encoded address
pub const ADDRESS_LENGTH: usize = 39;

/// Symbol network types; the discriminant is the address prefix byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum NetworkType {
    MainNet = 0x68,
    TestNet = 0x98,
    Mijin = 0x60,
    MijinTest = 0x90,
}

impl NetworkType {
    pub fn prefix_byte(self) -> u8 {
        self as u8
    }

    pub fn from_prefix_byte(byte: u8) -> Option<Self> {
        match byte {
            0x68 => Some(Self::MainNet),
            0x98 => Some(Self::TestNet),
            0x60 => Some(Self::Mijin),
            0x90 => Some(Self::MijinTest),
            _ => None,
        }
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "mainnet" => Ok(Self::MainNet),
            "testnet" => Ok(Self::TestNet),
            "mijin" => Ok(Self::Mijin),
            "mijintest" => Ok(Self::MijinTest),
            _ => Err(Error::Config(format!("Unknown network type: {}", s))),
        }
    }
}

/// A Symbol address
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    raw: [u8; RAW_ADDRESS_LENGTH],
}

impl Address {
    /// Derive the address of a 32-byte public key on `network_type`
    pub fn from_public_key(public_key: &[u8; 32], network_type: NetworkType) -> Self {
        let sha3_hash = Sha3_256::digest(public_key);
        let ripemd_hash = Ripemd160::digest(sha3_hash);

        let mut raw = [0u8; RAW_ADDRESS_LENGTH];
        raw[0] = network_type.prefix_byte();
        raw[1..1 + RIPEMD_LENGTH].copy_from_slice(&ripemd_hash);

        let checksum = Sha3_256::digest(&raw[..1 + RIPEMD_LENGTH]);
        raw[1 + RIPEMD_LENGTH..].copy_from_slice(&checksum[..CHECKSUM_LENGTH]);

        Self { raw }
    }

    /// Derive an address from a hex encoded public key
    pub fn from_public_key_hex(public_key: &str, network_type: NetworkType) -> Result<Self> {
        let bytes = decode_public_key(public_key)?;
        Ok(Self::from_public_key(&bytes, network_type))
    }

    /// Parse a plain or dash-separated address, verifying its checksum
    pub fn parse(address: &str) -> Result<Self> {
        let plain: String = address.trim().chars().filter(|c| *c != '-').collect::<String>().to_ascii_uppercase();
        let invalid = |reason: &str| Error::InvalidAddress(format!("{}: {}", address, reason));

        if plain.len() != ADDRESS_LENGTH {
            return Err(invalid("wrong length"));
        }

        let decoded = BASE32_NOPAD
            .decode(plain.as_bytes())
            .map_err(|_| invalid("not base32"))?;
        let raw: [u8; RAW_ADDRESS_LENGTH] = decoded.try_into().map_err(|_| invalid("wrong length"))?;

        if NetworkType::from_prefix_byte(raw[0]).is_none() {
            return Err(invalid("unknown network"));
        }

        let checksum = Sha3_256::digest(&raw[..1 + RIPEMD_LENGTH]);
        if checksum[..CHECKSUM_LENGTH] != raw[1 + RIPEMD_LENGTH..] {
            return Err(invalid("checksum mismatch"));
        }

        Ok(Self { raw })
    }

    pub fn network_type(&self) -> NetworkType {
        // prefix byte is checked on every construction path
        NetworkType::from_prefix_byte(self.raw[0]).unwrap_or(NetworkType::MainNet)
    }

    /// 39-character base32 form
    pub fn plain(&self) -> String {
        BASE32_NOPAD.encode(&self.raw)
    }

    /// Plain form split into dash-separated groups of six
    pub fn pretty(&self) -> String {
        let plain = self.plain();
        plain
            .as_bytes()
            .chunks(6)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.plain())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.plain())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Decode a 64-character hex public key
pub fn decode_public_key(public_key: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(public_key.trim()).map_err(|e| Error::InvalidPublicKey(format!("{}: {}", public_key, e)))?;
    bytes
        .try_into()
        .map_err(|_| Error::InvalidPublicKey(format!("{}: expected 32 bytes", public_key)))
}
