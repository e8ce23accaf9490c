//! Multisig cosignatory reconciliation
//!
//! A [`MultisigModificationTracker`] holds the cosignatory additions and
//! removals a user has queued but not yet submitted, on top of the
//! node-confirmed [`MultisigSnapshot`].

mod tracker;
mod types;

pub use tracker::*;
pub use types::*;
