//! The find flow: search for joinable sessions and publish the result set.

use std::sync::Arc;

use lobbyforge_service::SearchRequest;

use crate::context::FlowContext;
use crate::error::FlowError;
use crate::project::{summarize, SessionSummary};

/// Lifecycle of a [`FindFlow`].
///
/// ```text
/// Idle ──(activate)──→ Searching ──→ Completed
///                          │
///                          └───────→ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindPhase {
    Idle,
    Searching,
    Completed,
    Failed,
}

/// One-shot filtered session search.
///
/// On success the ENTIRE raw result set is published to the shared
/// [`SearchRegistry`](crate::SearchRegistry) — filtered-out records
/// included, since summary indices refer to original positions — and the
/// registry is what keeps the set alive for a later join.
pub struct FindFlow {
    ctx: Arc<FlowContext>,
    phase: FindPhase,
}

impl FindFlow {
    /// Creates an idle flow.
    pub fn new(ctx: Arc<FlowContext>) -> Self {
        Self {
            ctx,
            phase: FindPhase::Idle,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> FindPhase {
        self.phase
    }

    /// Issues an online, presence-filtered search capped at `max_results`,
    /// awaits completion, publishes the raw set, and returns summaries of
    /// the records matching `keyword`.
    ///
    /// A non-empty `keyword` must case-insensitively equal a record's own
    /// tag for it to be included; skipped records still consume their index
    /// slot. An empty `keyword` includes everything. An empty return value
    /// is a successful "no sessions found" report, not an error.
    ///
    /// On failure the registry is left untouched: a previously published
    /// search, if any, stays joinable.
    pub async fn activate(
        &mut self,
        max_results: u32,
        keyword: &str,
    ) -> Result<Vec<SessionSummary>, FlowError> {
        if self.phase != FindPhase::Idle {
            return Err(FlowError::AlreadyActivated);
        }
        self.phase = FindPhase::Searching;

        let outcome = self.run(max_results, keyword).await;
        self.phase = match outcome {
            Ok(_) => FindPhase::Completed,
            Err(_) => FindPhase::Failed,
        };
        outcome
    }

    async fn run(
        &self,
        max_results: u32,
        keyword: &str,
    ) -> Result<Vec<SessionSummary>, FlowError> {
        let service = self
            .ctx
            .accessor
            .session_service()
            .ok_or(FlowError::ServiceUnavailable)?;

        let request = SearchRequest::presence_lobbies(max_results);

        let watch = service
            .on_find_complete()
            .watch()
            .ok_or(FlowError::OperationInFlight("find"))?;
        let watch_id = watch.id();

        if !service.find_sessions(self.ctx.user, &request) {
            service.on_find_complete().clear(watch_id);
            tracing::debug!("find request rejected synchronously");
            return Err(FlowError::RequestRejected("find"));
        }
        drop(service);

        let completion = watch.recv().await.ok_or(FlowError::CompletionLost)?;

        if let Some(service) = self.ctx.accessor.session_service() {
            service.on_find_complete().clear(watch_id);
        }

        if !completion.succeeded {
            return Err(FlowError::SearchFailed);
        }

        // Publish first: the registry is the strong owner of the raw set
        // from here on, and the summaries are minted against its ID.
        let search = self.ctx.registry.publish(completion.results);

        let summaries = self.ctx.registry.with_results(search, |records| {
            let mut rows = Vec::with_capacity(records.len());
            for (index, record) in records.iter().enumerate() {
                if !keyword.is_empty() {
                    let tag = record.keyword().unwrap_or("");
                    if !tag.eq_ignore_ascii_case(keyword) {
                        continue;
                    }
                }
                rows.push(summarize(search, index, record, keyword));
            }
            rows
        })?;

        if summaries.is_empty() {
            tracing::info!(%search, "search completed: no matching sessions");
        } else {
            tracing::info!(%search, count = summaries.len(), "search completed");
        }

        Ok(summaries)
    }
}
