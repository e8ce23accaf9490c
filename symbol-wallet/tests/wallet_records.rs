//! Tests for wallet record creation

use symbol_wallet::account::*;
use symbol_wallet::crypto::*;
use symbol_wallet::{Error, WalletConfig};

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn factory() -> WalletRecordFactory {
    WalletRecordFactory::new(WalletConfig {
        kdf_iterations: 1_000,
        ..WalletConfig::default()
    })
}

#[test]
fn test_seed_and_child_wallets_share_mnemonic() {
    let mnemonic = MnemonicPassPhrase::parse(ABANDON).unwrap();
    let password = Password::from("correct horse");
    let factory = factory();

    let seed = factory
        .build_seed_wallet("acct", &mnemonic, &password, NetworkType::TestNet)
        .unwrap();
    let child = factory
        .build_child_wallet("acct", &password, &mnemonic, "m/44'/43'/0'/0'/1'", NetworkType::TestNet, "Second")
        .unwrap();

    assert_eq!(seed.wallet_type, WalletType::Seed);
    assert_eq!(child.wallet_type, WalletType::PathDerived);
    assert_eq!(child.name, "Second");
    assert_eq!(child.path, "m/44'/43'/0'/0'/1'");
    assert_eq!(child.address.plain(), "TCG4YWQLRXDQM7YQ7Z3E4B56ZAXLFY2KI23PHMY");
    assert_ne!(seed.id, child.id);
}

#[test]
fn test_record_unlocks_with_password_only() {
    let record = factory()
        .build_imported_wallet(
            "acct",
            &Password::from("correct horse"),
            "Imported",
            "8D39F23A822163FF3EA57B005162EDD228BD9BFDB34B8A85EC93C8CE6FEED9B5",
            NetworkType::MainNet,
        )
        .unwrap();

    let account = record.unlock(&Password::from("correct horse")).unwrap();
    assert_eq!(
        hex::encode_upper(account.private_key()),
        "8D39F23A822163FF3EA57B005162EDD228BD9BFDB34B8A85EC93C8CE6FEED9B5"
    );
    assert_eq!(record.address.plain(), "NBNJLWDDAODXT37IEG26DCIZSWSJSI4KJKZKRLY");

    let wrong = record.unlock(&Password::from("battery staple"));
    assert!(matches!(wrong, Err(Error::Decryption(_))));
}

#[test]
fn test_same_key_encrypts_differently() {
    let factory = factory();
    let password = Password::from("correct horse");
    let key = "8D39F23A822163FF3EA57B005162EDD228BD9BFDB34B8A85EC93C8CE6FEED9B5";

    let first = factory
        .build_imported_wallet("acct", &password, "One", key, NetworkType::TestNet)
        .unwrap();
    let second = factory
        .build_imported_wallet("acct", &password, "Two", key, NetworkType::TestNet)
        .unwrap();

    assert_eq!(first.public_key, second.public_key);
    assert_ne!(first.encrypted_private_key, second.encrypted_private_key);
}

#[test]
fn test_invalid_private_key_rejected() {
    let result = factory().build_imported_wallet(
        "acct",
        &Password::from("correct horse"),
        "Broken",
        "not-a-key",
        NetworkType::TestNet,
    );
    assert!(matches!(result, Err(Error::InvalidPrivateKey(_))));
}

#[test]
fn test_record_json_shape() {
    let record = factory()
        .build_imported_wallet(
            "acct",
            &Password::from("correct horse"),
            "Imported",
            "8D39F23A822163FF3EA57B005162EDD228BD9BFDB34B8A85EC93C8CE6FEED9B5",
            NetworkType::TestNet,
        )
        .unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["accountName"], "acct");
    assert_eq!(json["type"], "imported");
    assert_eq!(json["isMultisig"], false);
    assert_eq!(json["path"], "");
    assert!(json["encryptedPrivateKey"]["encryptedKey"].is_string());

    let restored: WalletRecord = serde_json::from_value(json).unwrap();
    assert_eq!(restored, record);
}
