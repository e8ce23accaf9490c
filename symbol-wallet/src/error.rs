//! Error types for the symbol-wallet library

use thiserror::Error;

/// Custom error type for symbol-wallet operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Public key {0} is already a cosignatory or pending addition")]
    DuplicateCosignatory(String),

    #[error("Multisig tracker is not bound to an account")]
    UnboundTracker,

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for symbol-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
