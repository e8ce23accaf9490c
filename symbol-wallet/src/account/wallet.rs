//! Wallet records and the factory that builds them

use serde::{Deserialize, Serialize};
use tracing::info;
use zeroize::Zeroizing;

use crate::config::WalletConfig;
use crate::crypto::address::{Address, NetworkType};
use crate::crypto::encryption::{decrypt_private_key, encrypt_private_key, EncryptedSecret, Password};
use crate::crypto::keys::{derive_account_from_mnemonic, Account, HdNetwork};
use crate::crypto::mnemonic::MnemonicPassPhrase;
use crate::crypto::path::{DerivationPath, DEFAULT_WALLET_PATH};
use crate::error::{Error, Result};

/// How a wallet's key was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    /// Derived at the default path of the account mnemonic
    Seed,
    /// Derived at a caller-chosen path of the account mnemonic
    PathDerived,
    /// Imported from a raw private key
    Imported,
}

/// A persistable wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// The wallet's unique identifier
    pub id: String,
    /// Identifier of the owning account
    pub account_name: String,
    /// Display name
    pub name: String,
    #[serde(rename = "type")]
    pub wallet_type: WalletType,
    pub address: Address,
    /// Upper-case hex public key
    pub public_key: String,
    pub encrypted_private_key: EncryptedSecret,
    /// Derivation path, empty for imported wallets
    pub path: String,
    pub is_multisig: bool,
}

impl WalletRecord {
    /// Network the wallet address belongs to
    pub fn network_type(&self) -> NetworkType {
        self.address.network_type()
    }

    /// Decrypt the private key with `password`
    pub fn decrypt_private_key(&self, password: &Password) -> Result<Zeroizing<[u8; 32]>> {
        decrypt_private_key(&self.encrypted_private_key, password)
    }

    /// Decrypt the key and rebuild the account it belongs to
    pub fn unlock(&self, password: &Password) -> Result<Account> {
        let key = self.decrypt_private_key(password)?;
        let account = Account::from_private_key(*key, self.network_type());
        if account.public_key_hex() != self.public_key {
            return Err(Error::Decryption(format!(
                "decrypted key does not match public key of wallet {}",
                self.id
            )));
        }
        Ok(account)
    }
}

/// Builds wallet records from mnemonics or private keys
#[derive(Debug, Clone, Default)]
pub struct WalletRecordFactory {
    config: WalletConfig,
}

impl WalletRecordFactory {
    pub fn new(config: WalletConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Build the wallet at the default path of `mnemonic`
    pub fn build_seed_wallet(
        &self,
        parent_account_id: &str,
        mnemonic: &MnemonicPassPhrase,
        password: &Password,
        network_type: NetworkType,
    ) -> Result<WalletRecord> {
        let account = derive_account_from_mnemonic(mnemonic, HdNetwork::Catapult, DEFAULT_WALLET_PATH, network_type)?;
        self.build_record(
            parent_account_id,
            &self.config.seed_wallet_name,
            WalletType::Seed,
            &account,
            password,
            DEFAULT_WALLET_PATH.to_string(),
        )
    }

    /// Build a wallet at an arbitrary path of `mnemonic`
    pub fn build_child_wallet(
        &self,
        parent_account_id: &str,
        password: &Password,
        mnemonic: &MnemonicPassPhrase,
        path: &str,
        network_type: NetworkType,
        name: &str,
    ) -> Result<WalletRecord> {
        let path = DerivationPath::parse(path)?.to_string();
        let account = derive_account_from_mnemonic(mnemonic, HdNetwork::Catapult, &path, network_type)?;
        self.build_record(parent_account_id, name, WalletType::PathDerived, &account, password, path)
    }

    /// Build a wallet around an existing hex private key
    pub fn build_imported_wallet(
        &self,
        parent_account_id: &str,
        password: &Password,
        name: &str,
        private_key_hex: &str,
        network_type: NetworkType,
    ) -> Result<WalletRecord> {
        let account = Account::from_private_key_hex(private_key_hex, network_type)?;
        self.build_record(parent_account_id, name, WalletType::Imported, &account, password, String::new())
    }

    fn build_record(
        &self,
        parent_account_id: &str,
        name: &str,
        wallet_type: WalletType,
        account: &Account,
        password: &Password,
        path: String,
    ) -> Result<WalletRecord> {
        let encrypted_private_key = encrypt_private_key(account.private_key(), password, &self.config)?;

        let record = WalletRecord {
            id: format!("wallet_{}", hex::encode(rand::random::<[u8; 8]>())),
            account_name: parent_account_id.to_string(),
            name: name.to_string(),
            wallet_type,
            address: *account.address(),
            public_key: account.public_key_hex(),
            encrypted_private_key,
            path,
            is_multisig: false,
        };

        info!(
            wallet_id = %record.id,
            wallet_type = ?record.wallet_type,
            address = %record.address,
            "Built wallet record"
        );
        Ok(record)
    }
}

/// A user-facing label for `public_key`: the name of the known wallet that owns
/// it, or its plain address
pub fn wallet_label(public_key: &str, network_type: NetworkType, known_wallets: &[WalletRecord]) -> Result<String> {
    let address = Address::from_public_key_hex(public_key, network_type)?;

    Ok(known_wallets
        .iter()
        .find(|wallet| wallet.public_key.eq_ignore_ascii_case(public_key.trim()))
        .map(|wallet| wallet.name.clone())
        .unwrap_or_else(|| address.plain()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn factory() -> WalletRecordFactory {
        WalletRecordFactory::new(WalletConfig {
            kdf_iterations: 1_000,
            ..WalletConfig::default()
        })
    }

    #[test]
    fn test_seed_wallet() {
        let mnemonic = MnemonicPassPhrase::parse(ABANDON).unwrap();
        let password = Password::from("password1");
        let record = factory()
            .build_seed_wallet("account-1", &mnemonic, &password, NetworkType::TestNet)
            .unwrap();

        assert_eq!(record.account_name, "account-1");
        assert_eq!(record.name, "Seed Wallet 1");
        assert_eq!(record.wallet_type, WalletType::Seed);
        assert_eq!(record.path, DEFAULT_WALLET_PATH);
        assert_eq!(record.address.plain(), "TBNJLWDDAODXT37IEG26DCIZSWSJSI4KJIDX6TY");
        assert!(!record.is_multisig);
        assert!(record.id.starts_with("wallet_"));

        let account = record.unlock(&password).unwrap();
        assert_eq!(account.public_key_hex(), record.public_key);
    }

    #[test]
    fn test_child_wallet_invalid_path_fails_fast() {
        let mnemonic = MnemonicPassPhrase::parse(ABANDON).unwrap();
        // a short password would fail encryption; the path error must win
        let result = factory().build_child_wallet(
            "account-1",
            &Password::from("x"),
            &mnemonic,
            "m/44'/43'/0'",
            NetworkType::TestNet,
            "Child",
        );
        assert_eq!(result, Err(Error::InvalidPath("m/44'/43'/0'".to_string())));
    }

    #[test]
    fn test_imported_wallet() {
        let record = factory()
            .build_imported_wallet(
                "account-1",
                &Password::from("password1"),
                "Imported",
                "8D39F23A822163FF3EA57B005162EDD228BD9BFDB34B8A85EC93C8CE6FEED9B5",
                NetworkType::TestNet,
            )
            .unwrap();

        assert_eq!(record.wallet_type, WalletType::Imported);
        assert_eq!(record.path, "");
        assert_eq!(
            record.public_key,
            "868E04E684E900E51E67EFF6E55F54F93FC0D39345C4D6F595EC9BC3B0A1847D"
        );
    }

    #[test]
    fn test_encryption_error_surfaces() {
        let result = factory().build_imported_wallet(
            "account-1",
            &Password::from("short"),
            "Imported",
            "8D39F23A822163FF3EA57B005162EDD228BD9BFDB34B8A85EC93C8CE6FEED9B5",
            NetworkType::TestNet,
        );
        assert!(matches!(result, Err(Error::Encryption(_))));
    }

    #[test]
    fn test_wallet_label() {
        let record = factory()
            .build_imported_wallet(
                "account-1",
                &Password::from("password1"),
                "Savings",
                "8D39F23A822163FF3EA57B005162EDD228BD9BFDB34B8A85EC93C8CE6FEED9B5",
                NetworkType::TestNet,
            )
            .unwrap();
        let known = vec![record];

        let label = wallet_label(
            "868e04e684e900e51e67eff6e55f54f93fc0d39345c4d6f595ec9bc3b0a1847d",
            NetworkType::TestNet,
            &known,
        )
        .unwrap();
        assert_eq!(label, "Savings");

        let other = "05BD4D1938F546B6CFF9D457164837FDCC5C037B3798D0A1C165E72E6E25F9D8";
        assert_eq!(
            wallet_label(other, NetworkType::TestNet, &known).unwrap(),
            "TCG4YWQLRXDQM7YQ7Z3E4B56ZAXLFY2KI23PHMY"
        );
    }
}
