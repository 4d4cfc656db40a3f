//! Per-request bookkeeping for in-flight dispatches
//!
//! Every dispatched request gets its own pending entry, so overlapping
//! requests on one connection never share a timer. An entry is removed
//! exactly once: whichever of "handler settled" and "timer fired" completes it
//! first owns the response.

use crate::cancel::CancellationToken;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Handle for one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Pending {
    id: Value,
    method: String,
    started: Instant,
    cancel: CancellationToken,
}

type PendingMap = Arc<Mutex<HashMap<Ticket, Pending>>>;

fn lock(map: &PendingMap) -> MutexGuard<'_, HashMap<Ticket, Pending>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-flight request table
#[derive(Debug, Default)]
pub struct DispatchContext {
    next_ticket: AtomicU64,
    pending: PendingMap,
}

impl DispatchContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request
    ///
    /// Duplicate request ids get distinct tickets. Dropping the returned
    /// guard before the entry was completed cancels the request, so a caller
    /// that stops waiting never leaves an entry behind.
    pub fn begin(&self, id: Value, method: &str) -> InFlight {
        let ticket = Ticket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();
        lock(&self.pending).insert(
            ticket,
            Pending {
                id,
                method: method.to_string(),
                started: Instant::now(),
                cancel: cancel.clone(),
            },
        );
        InFlight {
            pending: Arc::clone(&self.pending),
            ticket,
            cancel,
        }
    }

    /// Remove the entry, returning its age if this call removed it
    ///
    /// `None` means the request was already completed, committed or
    /// cancelled, so the caller must not emit a timeout for it.
    pub fn complete(&self, ticket: Ticket) -> Option<Duration> {
        remove(&self.pending, ticket)
    }

    /// Number of requests still in flight
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Cancel and clear every pending entry, returning how many there were
    ///
    /// Used when the input stream closes.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<Pending> = lock(&self.pending).drain().map(|(_, p)| p).collect();
        for entry in &drained {
            debug!(
                "Cancelling pending {} (id {}) after {:?}",
                entry.method,
                entry.id,
                entry.started.elapsed()
            );
            entry.cancel.cancel();
        }
        drained.len()
    }
}

fn remove(pending: &PendingMap, ticket: Ticket) -> Option<Duration> {
    lock(pending)
        .remove(&ticket)
        .map(|entry| entry.started.elapsed())
}

/// Pending entry owned by the dispatch that registered it
#[derive(Debug)]
pub struct InFlight {
    pending: PendingMap,
    ticket: Ticket,
    cancel: CancellationToken,
}

impl InFlight {
    /// Ticket of the entry
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Token cancelled when the request is abandoned
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Handle a tool uses to take the entry before committing work
    pub fn commit_handle(&self) -> CommitHandle {
        CommitHandle {
            pending: Arc::clone(&self.pending),
            ticket: self.ticket,
            committed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Remove the entry, returning its age if this call removed it
    pub fn complete(&self) -> Option<Duration> {
        remove(&self.pending, self.ticket)
    }

    /// Remove the entry and cancel its token; `false` if it was already gone
    pub fn abandon(&self) -> bool {
        if self.complete().is_some() {
            self.cancel.cancel();
            true
        } else {
            false
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.abandon() {
            debug!("Request abandoned before it settled, ticket {:?}", self.ticket);
        }
    }
}

/// Lets a handler claim its request's entry before an irreversible write
///
/// Once claimed, the timer can no longer answer the request with a timeout;
/// the handler's own result is sent instead.
#[derive(Debug, Clone)]
pub struct CommitHandle {
    pending: PendingMap,
    ticket: Ticket,
    committed: Arc<AtomicBool>,
}

impl CommitHandle {
    /// Claim the entry; `false` if the request already timed out or was
    /// cancelled. Repeated calls after a successful claim return `true`.
    pub fn claim(&self) -> bool {
        if self.committed.load(Ordering::SeqCst) {
            return true;
        }
        let claimed = remove(&self.pending, self.ticket).is_some();
        if claimed {
            self.committed.store(true, Ordering::SeqCst);
        }
        claimed
    }
}
