//! Symbol Wallet Core - HD key derivation and multisig bookkeeping
//!
//! This library derives Symbol accounts from BIP-39 mnemonics along SLIP-0010
//! Ed25519 paths, builds wallet records with password-encrypted private keys,
//! and tracks pending cosignatory changes of multisig accounts.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod multisig;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use config::WalletConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
