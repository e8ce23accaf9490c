//! Key derivation and management
//!
//! This module provides SLIP-0010 Ed25519 extended keys and the account
//! derivation built on top of them.

pub mod ed25519;
mod derivation;

pub use derivation::*;
pub use ed25519::{ExtendedKey, HdNetwork};
