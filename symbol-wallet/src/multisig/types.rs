//! Multisig account state types

use serde::{Deserialize, Serialize};

use crate::crypto::address::{decode_public_key, Address, NetworkType};
use crate::error::Result;

/// A public key together with the network it is used on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    /// Upper-case hex public key
    pub public_key: String,
    pub address: Address,
}

impl PublicAccount {
    /// Build from a hex public key, normalizing it to upper case
    pub fn from_public_key(public_key: &str, network_type: NetworkType) -> Result<Self> {
        let bytes = decode_public_key(public_key)?;
        Ok(Self {
            public_key: hex::encode_upper(bytes),
            address: Address::from_public_key(&bytes, network_type),
        })
    }

    pub fn network_type(&self) -> NetworkType {
        self.address.network_type()
    }
}

/// One party to a multisig account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosignatoryEntry {
    pub public_key: String,
    /// Dash-grouped address, as shown to users
    pub address: String,
}

impl CosignatoryEntry {
    pub fn from_public_key(public_key: &str, network_type: NetworkType) -> Result<Self> {
        Ok(PublicAccount::from_public_key(public_key, network_type)?.into())
    }

    /// Whether this entry refers to `public_key`, ignoring hex case
    pub fn matches(&self, public_key: &str) -> bool {
        self.public_key.eq_ignore_ascii_case(public_key)
    }
}

impl From<PublicAccount> for CosignatoryEntry {
    fn from(account: PublicAccount) -> Self {
        Self {
            address: account.address.pretty(),
            public_key: account.public_key,
        }
    }
}

impl From<&PublicAccount> for CosignatoryEntry {
    fn from(account: &PublicAccount) -> Self {
        account.clone().into()
    }
}

/// Node-confirmed state of a multisig account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigSnapshot {
    /// The multisig account itself
    pub account: PublicAccount,
    pub min_approval: u32,
    pub min_removal: u32,
    /// Cosignatories in node order
    pub cosignatories: Vec<PublicAccount>,
    /// Multisig accounts this account cosigns
    #[serde(default)]
    pub multisig_accounts: Vec<PublicAccount>,
}

impl MultisigSnapshot {
    pub fn new(account: PublicAccount, cosignatories: Vec<PublicAccount>) -> Self {
        Self {
            account,
            min_approval: 0,
            min_removal: 0,
            cosignatories,
            multisig_accounts: Vec::new(),
        }
    }

    pub fn with_thresholds(mut self, min_approval: u32, min_removal: u32) -> Self {
        self.min_approval = min_approval;
        self.min_removal = min_removal;
        self
    }

    /// Whether both snapshots describe the same multisig account
    pub fn same_account(&self, other: &MultisigSnapshot) -> bool {
        self.account.public_key.eq_ignore_ascii_case(&other.account.public_key)
            && self.account.address == other.account.address
    }
}

/// A queued, unsubmitted change to the cosignatory set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "cosignatory", rename_all = "snake_case")]
pub enum PendingModification {
    Add(CosignatoryEntry),
    Remove(CosignatoryEntry),
}

impl PendingModification {
    pub fn entry(&self) -> &CosignatoryEntry {
        match self {
            PendingModification::Add(entry) | PendingModification::Remove(entry) => entry,
        }
    }
}

/// Notifications emitted by the tracker for every accepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Add(PublicAccount),
    Remove(String),
    Undo(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A: &str = "868E04E684E900E51E67EFF6E55F54F93FC0D39345C4D6F595EC9BC3B0A1847D";

    #[test]
    fn test_public_account_normalizes_case() {
        let account = PublicAccount::from_public_key(&KEY_A.to_lowercase(), NetworkType::TestNet).unwrap();
        assert_eq!(account.public_key, KEY_A);
        assert_eq!(account.address.plain(), "TBNJLWDDAODXT37IEG26DCIZSWSJSI4KJIDX6TY");
    }

    #[test]
    fn test_cosignatory_entry_uses_pretty_address() {
        let entry = CosignatoryEntry::from_public_key(KEY_A, NetworkType::TestNet).unwrap();
        assert_eq!(entry.address, "TBNJLW-DDAODX-T37IEG-26DCIZ-SWSJSI-4KJIDX-6TY");
        assert!(entry.matches(&KEY_A.to_lowercase()));
    }

    #[test]
    fn test_pending_modification_serialization() {
        let entry = CosignatoryEntry::from_public_key(KEY_A, NetworkType::TestNet).unwrap();
        let json = serde_json::to_value(PendingModification::Add(entry)).unwrap();
        assert_eq!(json["action"], "add");
        assert_eq!(json["cosignatory"]["publicKey"], KEY_A);
    }
}
