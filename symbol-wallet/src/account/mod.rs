//! Account management functionality
//!
//! This module builds the persistable wallet records that sit under a user
//! account: the seed wallet, path-derived child wallets and wallets imported
//! from a private key.

mod wallet;

pub use wallet::*;
