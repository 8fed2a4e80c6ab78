//! Shared fetch-state cell
//!
//! Written by the provider's completion path, read by the tick loop.
//! Backed by a watch channel so consumers can either poll `get()` or
//! `subscribe()` for changes.

use tokio::sync::watch;

use crate::countdown::AnchorSet;

/// Lifecycle of the day's anchor fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    /// No provider call has settled yet.
    Loading,
    /// Today's anchors are available.
    Ready(AnchorSet),
    /// The last provider call failed; carries a human-readable reason.
    Error(String),
}

impl FetchState {
    pub fn is_ready(&self) -> bool {
        matches!(self, FetchState::Ready(_))
    }

    pub fn anchors(&self) -> Option<AnchorSet> {
        match self {
            FetchState::Ready(anchors) => Some(*anchors),
            _ => None,
        }
    }
}

/// Single-writer/multiple-reader container for the fetch state.
#[derive(Debug)]
pub struct StateCell {
    tx: watch::Sender<FetchState>,
}

impl StateCell {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FetchState::Loading);
        Self { tx }
    }

    /// Replace the current state; wakes all subscribers.
    pub fn set(&self, state: FetchState) {
        self.tx.send_replace(state);
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> FetchState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.tx.subscribe()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
