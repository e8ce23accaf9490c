//! SLIP-0010 Ed25519 extended keys

use std::fmt;

use ed25519_dalek::SigningKey;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use crate::crypto::path::{DerivationPath, HARDENED_OFFSET};
use crate::error::{Error, Result};

/// HD network parameters used for master key generation and key serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HdNetwork {
    /// Catapult (Symbol) keys over Ed25519
    Catapult,
}

impl HdNetwork {
    /// HMAC key used to turn a seed into the master node
    pub fn seed_key(self) -> &'static [u8] {
        match self {
            HdNetwork::Catapult => b"ed25519 seed",
        }
    }

    /// Version prefix of serialized private extended keys
    pub fn private_version(self) -> u32 {
        match self {
            HdNetwork::Catapult => 0x0488_ade4,
        }
    }
}

/// An extended private key: key material plus chain code and tree position
#[derive(Clone)]
pub struct ExtendedKey {
    private_key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
    network: HdNetwork,
}

impl ExtendedKey {
    /// Derive the master key from a BIP-39 seed
    pub fn from_seed(seed: &[u8], network: HdNetwork) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Error::KeyDerivation(format!(
                "Invalid seed length: expected 16 to 64 bytes, got {}",
                seed.len()
            )));
        }

        let (private_key, chain_code) = hmac_sha512_split(network.seed_key(), &[seed])?;

        Ok(Self {
            private_key,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
            network,
        })
    }

    /// Derive a hardened child key
    pub fn derive_child(&self, child_number: u32) -> Result<Self> {
        if child_number < HARDENED_OFFSET {
            return Err(Error::KeyDerivation(format!(
                "Ed25519 only supports hardened derivation, got child number {}",
                child_number
            )));
        }
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| Error::KeyDerivation("Maximum derivation depth reached".to_string()))?;

        let (private_key, chain_code) = hmac_sha512_split(
            &self.chain_code[..],
            &[&[0u8][..], &self.private_key[..], &child_number.to_be_bytes()[..]],
        )?;

        Ok(Self {
            private_key,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_number,
            network: self.network,
        })
    }

    /// Walk every level of `path` from this key
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.child_numbers()
            .try_fold(self.clone(), |key, child_number| key.derive_child(child_number))
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn public_key(&self) -> [u8; 32] {
        SigningKey::from_bytes(&self.private_key).verifying_key().to_bytes()
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn network(&self) -> HdNetwork {
        self.network
    }

    /// First four bytes of HASH160 over the 0x00-prefixed public key
    pub fn fingerprint(&self) -> [u8; 4] {
        let mut prefixed = [0u8; 33];
        prefixed[1..].copy_from_slice(&self.public_key());
        let hash = Ripemd160::digest(Sha256::digest(prefixed));

        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&hash[..4]);
        fingerprint
    }

    /// Base58check serialization in the BIP-32 `xprv` layout
    pub fn to_base58(&self) -> Zeroizing<String> {
        let mut data = Zeroizing::new(Vec::with_capacity(78));
        data.extend_from_slice(&self.network.private_version().to_be_bytes());
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_number.to_be_bytes());
        data.extend_from_slice(&self.chain_code[..]);
        data.push(0);
        data.extend_from_slice(&self.private_key[..]);

        Zeroizing::new(bs58::encode(&data[..]).with_check().into_string())
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.depth)
            .field("child_number", &self.child_number)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

/// HMAC-SHA512 over the concatenated `parts`, split into (key, chain code)
fn hmac_sha512_split(key: &[u8], parts: &[&[u8]]) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(key)
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;
    for part in parts {
        hmac.update(part);
    }
    let mut result = Zeroizing::new([0u8; 64]);
    result.copy_from_slice(&hmac.finalize().into_bytes());

    let mut left = Zeroizing::new([0u8; 32]);
    let mut right = Zeroizing::new([0u8; 32]);
    left.copy_from_slice(&result[0..32]);
    right.copy_from_slice(&result[32..64]);

    Ok((left, right))
}
