//! The search registry: the one piece of state shared across flows.
//!
//! A successful find publishes its raw result set here; a later join
//! resolves its pick by `(SearchId, index)`. The registry is the strong
//! owner of the set — nothing else keeps it alive — and holds AT MOST ONE
//! publication at a time: publishing replaces the previous set, and every
//! summary minted from the old set becomes unresolvable.
//!
//! # Concurrency note
//!
//! Writer (a find completing) and readers (later joins) share one logical
//! timeline, so a plain `std::sync::Mutex` suffices. The lock is only held
//! for map-sized work and never across an await.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use lobbyforge_service::DiscoveredSession;
use serde::{Deserialize, Serialize};

use crate::FlowError;

/// Identifies one publication. Monotonically increasing, so a summary
/// minted from an older search can never resolve against a newer one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SearchId(u64);

impl std::fmt::Display for SearchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "search-{}", self.0)
    }
}

/// The currently published raw result set, tagged with its generation.
struct PublishedSearch {
    id: SearchId,
    results: Vec<DiscoveredSession>,
}

/// Owns the most recently published search result set.
pub struct SearchRegistry {
    current: Mutex<Option<PublishedSearch>>,
    next_id: AtomicU64,
}

impl SearchRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Publishes a raw result set, replacing any previous publication, and
    /// returns the ID that pins summaries to it.
    pub fn publish(&self, results: Vec<DiscoveredSession>) -> SearchId {
        let id = SearchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let count = results.len();

        let mut current = self.current.lock().expect("search registry poisoned");
        if let Some(previous) = current.take() {
            tracing::debug!(replaced = %previous.id, "previous search publication discarded");
        }
        *current = Some(PublishedSearch { id, results });

        tracing::info!(%id, count, "search results published");
        id
    }

    /// Discards the current publication, if any. Pending summaries become
    /// unresolvable.
    pub fn discard(&self) {
        let mut current = self.current.lock().expect("search registry poisoned");
        if let Some(previous) = current.take() {
            tracing::debug!(id = %previous.id, "search publication discarded");
        }
    }

    /// The ID of the current publication, if one exists.
    pub fn current_id(&self) -> Option<SearchId> {
        self.current
            .lock()
            .expect("search registry poisoned")
            .as_ref()
            .map(|p| p.id)
    }

    /// Resolves one record by `(search, index)`, returning an owned copy
    /// to hand to the service.
    ///
    /// # Errors
    /// [`FlowError::StaleSearchResult`] when nothing is published, the ID
    /// belongs to a superseded publication, or the index is out of bounds.
    pub fn resolve(
        &self,
        search: SearchId,
        index: usize,
    ) -> Result<DiscoveredSession, FlowError> {
        let current = self.current.lock().expect("search registry poisoned");
        let published = current
            .as_ref()
            .filter(|p| p.id == search)
            .ok_or(FlowError::StaleSearchResult)?;

        published
            .results
            .get(index)
            .cloned()
            .ok_or(FlowError::StaleSearchResult)
    }

    /// Makes the targeted record's presence flags agree: if either of
    /// `uses_presence` / `uses_native_groups` is set, both are set.
    ///
    /// Compensates for hosts that advertise a record joinable through only
    /// one of two overlapping mechanisms; without this some joins
    /// spuriously fail. Returns `true` if the record changed.
    ///
    /// # Errors
    /// Same staleness rules as [`resolve`](Self::resolve).
    pub fn normalize_presence_flags(
        &self,
        search: SearchId,
        index: usize,
    ) -> Result<bool, FlowError> {
        let mut current = self.current.lock().expect("search registry poisoned");
        let published = current
            .as_mut()
            .filter(|p| p.id == search)
            .ok_or(FlowError::StaleSearchResult)?;

        let record = published
            .results
            .get_mut(index)
            .ok_or(FlowError::StaleSearchResult)?;

        let either = record.uses_presence || record.uses_native_groups;
        let changed = either
            && !(record.uses_presence && record.uses_native_groups);
        record.uses_presence = either;
        record.uses_native_groups = either;
        Ok(changed)
    }

    /// Runs `f` over the published records of `search` under the lock.
    ///
    /// # Errors
    /// [`FlowError::StaleSearchResult`] when `search` is not the current
    /// publication.
    pub fn with_results<R>(
        &self,
        search: SearchId,
        f: impl FnOnce(&[DiscoveredSession]) -> R,
    ) -> Result<R, FlowError> {
        let current = self.current.lock().expect("search registry poisoned");
        let published = current
            .as_ref()
            .filter(|p| p.id == search)
            .ok_or(FlowError::StaleSearchResult)?;

        Ok(f(&published.results))
    }
}

impl Default for SearchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
