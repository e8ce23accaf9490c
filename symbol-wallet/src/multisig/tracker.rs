//! Pending cosignatory modifications layered over a multisig snapshot

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::crypto::address::NetworkType;
use crate::error::{Error, Result};

use super::types::{CosignatoryEntry, MultisigSnapshot, PendingModification, PublicAccount, TrackerEvent};

/// Callback receiving tracker events
pub type EventListener = Box<dyn FnMut(&TrackerEvent) + Send>;

/// What a call to [`MultisigModificationTracker::bind`] did to pending state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// First snapshot for an unbound tracker
    Initial,
    /// Same multisig account; pending modifications kept
    Refresh,
    /// Different multisig account; pending modifications cleared
    Reset,
}

/// Tracks cosignatory additions and removals for one multisig account at a time
pub struct MultisigModificationTracker {
    network_type: NetworkType,
    snapshot: Option<MultisigSnapshot>,
    added: Vec<CosignatoryEntry>,
    removed: Vec<CosignatoryEntry>,
    listener: Option<EventListener>,
}

impl MultisigModificationTracker {
    /// Create an unbound tracker for accounts on `network_type`
    pub fn new(network_type: NetworkType) -> Self {
        Self {
            network_type,
            snapshot: None,
            added: Vec::new(),
            removed: Vec::new(),
            listener: None,
        }
    }

    /// Register the callback that receives add, remove and undo events,
    /// replacing any previous one
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&TrackerEvent) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn is_bound(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&MultisigSnapshot> {
        self.snapshot.as_ref()
    }

    /// Replace the canonical snapshot.
    ///
    /// Pending modifications survive only if `snapshot` describes the same
    /// multisig account as the one currently bound.
    pub fn bind(&mut self, snapshot: MultisigSnapshot) -> BindOutcome {
        let outcome = match &self.snapshot {
            None => BindOutcome::Initial,
            Some(current) if current.same_account(&snapshot) => BindOutcome::Refresh,
            Some(_) => BindOutcome::Reset,
        };

        match outcome {
            BindOutcome::Reset => {
                info!(
                    account = %snapshot.account.address,
                    dropped_adds = self.added.len(),
                    dropped_removes = self.removed.len(),
                    "Multisig account changed, discarding pending modifications"
                );
                self.clear_pending();
            }
            BindOutcome::Initial => {
                // nothing can be pending before the first snapshot
                self.clear_pending();
                debug!(account = %snapshot.account.address, "Tracker bound");
            }
            BindOutcome::Refresh => {
                debug!(account = %snapshot.account.address, "Multisig snapshot refreshed");
            }
        }

        self.snapshot = Some(snapshot);
        outcome
    }

    /// Drop the snapshot and every pending modification
    pub fn unbind(&mut self) -> Option<MultisigSnapshot> {
        self.clear_pending();
        self.snapshot.take()
    }

    /// Canonical cosignatories minus pending removals, in snapshot order
    pub fn effective_cosignatories(&self) -> Result<Vec<CosignatoryEntry>> {
        let snapshot = self.bound()?;
        Ok(snapshot
            .cosignatories
            .iter()
            .filter(|c| !self.removed.iter().any(|r| r.matches(&c.public_key)))
            .map(CosignatoryEntry::from)
            .collect())
    }

    /// Effective cosignatories followed by pending additions
    pub fn effective_view(&self) -> Result<Vec<CosignatoryEntry>> {
        let mut view = self.effective_cosignatories()?;
        view.extend(self.added.iter().cloned());
        Ok(view)
    }

    /// Pending additions in request order
    pub fn add_modifications(&self) -> &[CosignatoryEntry] {
        &self.added
    }

    /// Pending removals in request order
    pub fn remove_modifications(&self) -> &[CosignatoryEntry] {
        &self.removed
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Additions then removals, ready for a modification transaction
    pub fn pending_modifications(&self) -> Result<Vec<PendingModification>> {
        self.bound()?;
        Ok(self
            .added
            .iter()
            .cloned()
            .map(PendingModification::Add)
            .chain(self.removed.iter().cloned().map(PendingModification::Remove))
            .collect())
    }

    /// Queue `account` as a new cosignatory.
    ///
    /// A pending removal of the same key is retracted instead of queueing an
    /// addition next to it.
    pub fn request_add(&mut self, account: &PublicAccount) -> Result<()> {
        self.bound()?;
        if self.removed.iter().any(|r| r.matches(&account.public_key)) {
            self.removed.retain(|r| !r.matches(&account.public_key));
            debug!(public_key = %account.public_key, "Retracted pending cosignatory removal");
            self.emit(TrackerEvent::Add(account.clone()));
            return Ok(());
        }

        let already_present = self
            .effective_cosignatories()?
            .iter()
            .any(|c| c.matches(&account.public_key));
        let already_pending = self.added.iter().any(|c| c.matches(&account.public_key));

        if already_present || already_pending {
            warn!(public_key = %account.public_key, "Rejected duplicate cosignatory");
            return Err(Error::DuplicateCosignatory(account.public_key.clone()));
        }

        self.added.push(CosignatoryEntry::from(account));
        debug!(public_key = %account.public_key, "Queued cosignatory addition");
        self.emit(TrackerEvent::Add(account.clone()));
        Ok(())
    }

    /// Queue removal of the cosignatory with `public_key`.
    ///
    /// Repeated requests for the same key are stored once but each one emits
    /// an event. A pending addition of the key is retracted instead.
    pub fn request_remove(&mut self, public_key: &str) -> Result<()> {
        self.bound()?;
        let entry = CosignatoryEntry::from_public_key(public_key, self.network_type)?;

        if self.added.iter().any(|a| a.matches(&entry.public_key)) {
            self.added.retain(|a| !a.matches(&entry.public_key));
            debug!(public_key = %entry.public_key, "Retracted pending cosignatory addition");
        } else if !self.removed.iter().any(|r| r.matches(&entry.public_key)) {
            debug!(public_key = %entry.public_key, "Queued cosignatory removal");
            self.removed.push(entry.clone());
        }

        self.emit(TrackerEvent::Remove(entry.public_key));
        Ok(())
    }

    /// Withdraw every pending addition of `public_key`
    pub fn undo_add(&mut self, public_key: &str) -> Result<()> {
        self.bound()?;
        self.added.retain(|c| !c.matches(public_key));
        self.emit(TrackerEvent::Undo(public_key.to_string()));
        Ok(())
    }

    /// Withdraw every pending removal of `public_key`
    pub fn undo_remove(&mut self, public_key: &str) -> Result<()> {
        self.bound()?;
        self.removed.retain(|c| !c.matches(public_key));
        self.emit(TrackerEvent::Undo(public_key.to_string()));
        Ok(())
    }

    fn bound(&self) -> Result<&MultisigSnapshot> {
        self.snapshot.as_ref().ok_or_else(|| {
            error!("Multisig tracker used before a snapshot was bound");
            Error::UnboundTracker
        })
    }

    fn clear_pending(&mut self) {
        self.added.clear();
        self.removed.clear();
    }

    fn emit(&mut self, event: TrackerEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

impl fmt::Debug for MultisigModificationTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultisigModificationTracker")
            .field("network_type", &self.network_type)
            .field("snapshot", &self.snapshot)
            .field("added", &self.added)
            .field("removed", &self.removed)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
