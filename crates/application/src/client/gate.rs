//! Refresh coalescing primitive.
//!
//! A guarded single-slot cell: `Idle`, or a handle to the outcome of the
//! refresh currently in flight. The first 401 caller becomes the leader
//! and runs the refresh; every concurrent caller attaches to the same
//! handle instead of starting new work. The slot is cleared when the
//! operation settles, so a later 401 starts a fresh refresh.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

/// `None` while the refresh is in flight, `Some(outcome)` once settled.
type OutcomeRx = watch::Receiver<Option<bool>>;

enum Role {
    Leader(watch::Sender<Option<bool>>),
    Follower(OutcomeRx),
}

/// At-most-one-in-flight gate for the token refresh.
#[derive(Debug, Default)]
pub struct RefreshGate {
    slot: Mutex<Option<OutcomeRx>>,
}

impl RefreshGate {
    /// Creates an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `refresh` unless one is already in flight; concurrent callers
    /// all receive the outcome of the single underlying execution.
    ///
    /// The slot lock is held only to inspect or install the handle, never
    /// across an await.
    pub async fn run<F, Fut>(&self, refresh: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        let role = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(rx) = slot.as_ref() {
                Role::Follower(rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                *slot = Some(rx);
                Role::Leader(tx)
            }
        };

        match role {
            Role::Leader(tx) => {
                let ok = refresh().await;
                // Clear the slot before broadcasting so a 401 arriving
                // after settle starts a fresh refresh.
                *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
                let _ = tx.send(Some(ok));
                ok
            }
            Role::Follower(mut rx) => loop {
                if let Some(ok) = *rx.borrow() {
                    return ok;
                }
                if rx.changed().await.is_err() {
                    // Leader dropped without settling; treat as failure.
                    return (*rx.borrow()).unwrap_or(false);
                }
            },
        }
    }
}
