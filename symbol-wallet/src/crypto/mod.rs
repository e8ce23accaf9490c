//! Cryptographic primitives and operations
//!
//! This module provides functionality for mnemonic handling, derivation paths,
//! key derivation, address encoding and private key encryption.

pub mod address;
pub mod encryption;
pub mod keys;
pub mod mnemonic;
pub mod path;

pub use address::*;
pub use encryption::*;
pub use keys::*;
pub use mnemonic::*;
pub use path::{increment_level, validate, DerivationPath, Level, DEFAULT_WALLET_PATH};
