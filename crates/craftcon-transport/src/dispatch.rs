//! The request dispatcher: correlation-id allocation and the pending
//! request table.
//!
//! Every command sent on a connection gets a fresh correlation id and
//! exactly one entry in the pending table. The connection's read task
//! routes each inbound response frame to the entry whose id matches and
//! removes it; a timed-out command removes its own entry. An entry is
//! therefore removed exactly once — on resolve, on timeout, or when the
//! whole connection is torn down — and can never be claimed twice.
//!
//! # Concurrency note
//!
//! The table is guarded by a `std::sync::Mutex`, not an async one: it is
//! only held for a map insert/remove, never across an `await`. Concurrent
//! `exec` calls contend only for those few instructions; their *waits*
//! happen independently on oneshot channels.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::oneshot;

/// Allocates correlation ids and tracks one pending waiter per in-flight id.
pub struct Dispatcher {
    /// The next correlation id to hand out. Starts at 1 — id 0 is used
    /// by the auth handshake and must never collide with a command.
    next_id: AtomicI32,

    /// Pending requests, keyed by correlation id. The `oneshot::Sender`
    /// is the resolve callback: sending on it wakes the one caller
    /// awaiting that id.
    pending: Mutex<HashMap<i32, oneshot::Sender<String>>>,
}

impl Dispatcher {
    /// Creates an empty dispatcher whose first id will be 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// A poisoned lock only means some thread panicked mid-mutation; the
    /// map itself is still structurally sound, so recover rather than
    /// propagate the panic.
    fn pending(&self) -> MutexGuard<'_, HashMap<i32, oneshot::Sender<String>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Allocates the next correlation id and registers a pending entry
    /// for it. Returns the id and the receiver the caller awaits.
    pub fn register(&self) -> (i32, oneshot::Receiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending().insert(id, tx);
        (id, rx)
    }

    /// Resolves the pending entry for `id` with the response body.
    ///
    /// Returns `false` when no entry matches — the caller (the read
    /// task) logs that instead of dropping the frame silently.
    pub fn complete(&self, id: i32, body: String) -> bool {
        match self.pending().remove(&id) {
            Some(tx) => {
                // A send error means the waiter gave up (timed out) in
                // the instant between routing and delivery; the entry is
                // gone either way.
                let _ = tx.send(body);
                true
            }
            None => false,
        }
    }

    /// Removes the pending entry for `id` without resolving it.
    /// Used on the timeout and write-failure paths.
    pub fn forget(&self, id: i32) -> bool {
        self.pending().remove(&id).is_some()
    }

    /// Drops every pending entry. Each waiter observes its channel
    /// closing and reports the connection as closed. Called exactly when
    /// the connection dies, so no entry can outlive its connection.
    pub fn fail_all(&self) {
        self.pending().clear();
    }

    /// Number of requests currently awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.pending().len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
