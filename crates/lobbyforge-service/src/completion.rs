//! One-shot completion delivery between the session service and a flow.
//!
//! Every asynchronous service operation (create, find, join) reports back
//! through a [`CompletionSlot`]. The discipline is deliberately strict:
//!
//! - at most ONE watcher per slot at a time — a second watch attempt is
//!   refused, which is how "one concurrent operation of each kind" is
//!   enforced at the service boundary
//! - a watch is cleared explicitly on every exit path, identified by its
//!   [`WatchId`] so nobody can clear a registration they don't own
//! - a completion fires at most once; a completion with no watcher (e.g.
//!   after a synchronous rejection already cleared the watch) is dropped,
//!   never delivered late

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::oneshot;

/// Counter for generating unique watch IDs.
static NEXT_WATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one watch registration on a [`CompletionSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

impl std::fmt::Display for WatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "watch-{}", self.0)
    }
}

/// The receiving half of a watch: awaits the completion value.
#[derive(Debug)]
pub struct CompletionWatch<T> {
    id: WatchId,
    rx: oneshot::Receiver<T>,
}

impl<T> CompletionWatch<T> {
    /// The ID to pass to [`CompletionSlot::clear`] on exit paths.
    pub fn id(&self) -> WatchId {
        self.id
    }

    /// Waits for the completion. Returns `None` if the slot was torn down
    /// without ever completing (the service dropped the operation).
    pub async fn recv(self) -> Option<T> {
        self.rx.await.ok()
    }
}

/// A single-occupancy completion channel owned by the session service.
///
/// The flow registers with [`watch`](Self::watch) BEFORE submitting the
/// request, so a completion can never race the registration. The service
/// fires [`complete`](Self::complete) exactly once per accepted request.
pub struct CompletionSlot<T> {
    pending: Mutex<Option<(WatchId, oneshot::Sender<T>)>>,
}

impl<T> CompletionSlot<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Registers a watcher. Returns `None` if the slot is already watched,
    /// i.e. another operation of this kind is in flight.
    pub fn watch(&self) -> Option<CompletionWatch<T>> {
        let mut pending = self.pending.lock().expect("completion slot poisoned");
        if pending.is_some() {
            return None;
        }

        let id = WatchId(NEXT_WATCH_ID.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        *pending = Some((id, tx));
        Some(CompletionWatch { id, rx })
    }

    /// Removes the registration identified by `id`, if it is still the one
    /// pending. Returns `true` if a registration was removed.
    ///
    /// Clearing an already-fired or already-cleared watch is a no-op, which
    /// lets every exit path clear unconditionally.
    pub fn clear(&self, id: WatchId) -> bool {
        let mut pending = self.pending.lock().expect("completion slot poisoned");
        match pending.as_ref() {
            Some((pending_id, _)) if *pending_id == id => {
                *pending = None;
                true
            }
            _ => false,
        }
    }

    /// Delivers the completion value to the pending watcher, consuming the
    /// registration. Returns `true` if a watcher received it.
    ///
    /// A completion arriving after the watch was cleared (the
    /// rejected-then-completed defect) lands here with no watcher and is
    /// dropped rather than delivered to a flow the caller believes is dead.
    pub fn complete(&self, value: T) -> bool {
        let taken = self
            .pending
            .lock()
            .expect("completion slot poisoned")
            .take();

        match taken {
            Some((id, tx)) => {
                let delivered = tx.send(value).is_ok();
                if !delivered {
                    tracing::debug!(%id, "completion watcher gone before delivery");
                }
                delivered
            }
            None => {
                tracing::debug!("completion dropped: no watcher registered");
                false
            }
        }
    }

    /// Returns `true` if a watcher is currently registered.
    pub fn is_watched(&self) -> bool {
        self.pending
            .lock()
            .expect("completion slot poisoned")
            .is_some()
    }
}

impl<T> Default for CompletionSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
