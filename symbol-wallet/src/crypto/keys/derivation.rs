//! Account derivation from mnemonics and extended keys

use std::fmt;

use ed25519_dalek::SigningKey;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use crate::crypto::address::{Address, NetworkType};
use crate::crypto::mnemonic::MnemonicPassPhrase;
use crate::crypto::path::{DerivationPath, Level};
use crate::error::{Error, Result};

use super::ed25519::{ExtendedKey, HdNetwork};

/// A Symbol account: key pair plus the address it encodes to
#[derive(Clone)]
pub struct Account {
    /// The raw private key bytes
    private_key: Zeroizing<[u8; 32]>,
    /// The raw public key bytes
    public_key: [u8; 32],
    address: Address,
    network_type: NetworkType,
}

impl Account {
    /// Create an account from raw private key bytes
    pub fn from_private_key(private_key: [u8; 32], network_type: NetworkType) -> Self {
        let private_key = Zeroizing::new(private_key);
        let public_key = SigningKey::from_bytes(&private_key).verifying_key().to_bytes();
        let address = Address::from_public_key(&public_key, network_type);

        Self {
            private_key,
            public_key,
            address,
            network_type,
        }
    }

    /// Create an account from a 64-character hex private key
    pub fn from_private_key_hex(private_key: &str, network_type: NetworkType) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(private_key.trim()).map_err(|e| Error::InvalidPrivateKey(e.to_string()))?,
        );
        if bytes.len() != 32 {
            return Err(Error::InvalidPrivateKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        let account = Self::from_private_key(key, network_type);
        zeroize::Zeroize::zeroize(&mut key);
        Ok(account)
    }

    /// Get the raw private key bytes
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// Get the raw public key bytes
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Upper-case hex public key, the form Symbol tooling displays
    pub fn public_key_hex(&self) -> String {
        hex::encode_upper(self.public_key)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("public_key", &self.public_key_hex())
            .field("address", &self.address)
            .field("network_type", &self.network_type)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.private_key[..] == other.private_key[..]
            && self.public_key == other.public_key
            && self.network_type == other.network_type
    }
}

impl Eq for Account {}

/// Derive the master extended key of `mnemonic`
pub fn master_key_from_mnemonic(mnemonic: &MnemonicPassPhrase, network: HdNetwork) -> Result<ExtendedKey> {
    let seed = mnemonic.to_seed();
    ExtendedKey::from_seed(&seed[..], network)
}

/// Derive the account at `path` below `extended_key`
#[instrument(level = "debug", skip(extended_key))]
pub fn derive_account(extended_key: &ExtendedKey, path: &str, network_type: NetworkType) -> Result<Account> {
    let path = DerivationPath::parse(path)?;
    derive_account_at(extended_key, &path, network_type)
}

fn derive_account_at(extended_key: &ExtendedKey, path: &DerivationPath, network_type: NetworkType) -> Result<Account> {
    let leaf = extended_key.derive_path(path)?;
    Ok(Account::from_private_key(*leaf.private_key(), network_type))
}

/// Derive the account at `path` directly from a mnemonic
pub fn derive_account_from_mnemonic(
    mnemonic: &MnemonicPassPhrase,
    network: HdNetwork,
    path: &str,
    network_type: NetworkType,
) -> Result<Account> {
    // validate before touching the seed
    let path = DerivationPath::parse(path)?;
    let master = master_key_from_mnemonic(mnemonic, network)?;
    derive_account_at(&master, &path, network_type)
}

/// Paths obtained by incrementing the address index of `start_path` 1..=count times
pub fn sequence_paths(start_path: &str, count: usize) -> Result<Vec<DerivationPath>> {
    let mut current = DerivationPath::parse(start_path)?;
    let mut paths = Vec::with_capacity(count);
    for _ in 0..count {
        current = current.incremented(Level::AddressIndex)?;
        paths.push(current);
    }
    Ok(paths)
}

/// Derive `count` accounts following `start_path`.
///
/// The first account lives at `start_path` with its address index incremented
/// once; `start_path` itself is never part of the output. A zero count yields
/// an empty vector once the start path has been validated.
pub fn derive_account_sequence(
    mnemonic: &MnemonicPassPhrase,
    network: HdNetwork,
    network_type: NetworkType,
    start_path: &str,
    count: usize,
) -> Result<Vec<Account>> {
    let paths = sequence_paths(start_path, count)?;
    debug!(start_path, count, "Deriving account sequence");

    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let master = master_key_from_mnemonic(mnemonic, network)?;
    paths
        .iter()
        .map(|path| derive_account_at(&master, path, network_type))
        .collect()
}

/// Derive one account per path, in input order
pub fn derive_account_sequence_from_paths<S: AsRef<str>>(
    mnemonic: &MnemonicPassPhrase,
    network: HdNetwork,
    network_type: NetworkType,
    paths: &[S],
) -> Result<Vec<Account>> {
    let parsed = paths
        .iter()
        .map(|path| DerivationPath::parse(path.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = parsed.len(), "Deriving accounts from explicit paths");

    if parsed.is_empty() {
        return Ok(Vec::new());
    }

    let master = master_key_from_mnemonic(mnemonic, network)?;
    parsed
        .iter()
        .map(|path| derive_account_at(&master, path, network_type))
        .collect()
}

/// Addresses of the accounts `derive_account_sequence` would return
pub fn derive_addresses(
    mnemonic: &MnemonicPassPhrase,
    network: HdNetwork,
    network_type: NetworkType,
    start_path: &str,
    count: usize,
) -> Result<Vec<Address>> {
    Ok(derive_account_sequence(mnemonic, network, network_type, start_path, count)?
        .into_iter()
        .map(|account| account.address)
        .collect())
}
