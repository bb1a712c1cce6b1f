//! The join flow: join a previously discovered session and travel to it.

use std::sync::Arc;

use lobbyforge_service::GAME_SESSION;

use crate::context::FlowContext;
use crate::error::FlowError;
use crate::project::SessionSummary;

/// Lifecycle of a [`JoinFlow`].
///
/// ```text
/// Idle ──(activate)──→ Joining ──→ Succeeded
///                         │
///                         └──────→ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPhase {
    Idle,
    Joining,
    Succeeded,
    Failed,
}

/// One-shot request to join a session picked from a published search.
///
/// Success means "joined AND traveling": after the service confirms the
/// join, the flow resolves the session's connection target and hands it to
/// the travel driver. A join the client cannot travel to is reported as a
/// failure.
pub struct JoinFlow {
    ctx: Arc<FlowContext>,
    phase: JoinPhase,
}

impl JoinFlow {
    /// Creates an idle flow.
    pub fn new(ctx: Arc<FlowContext>) -> Self {
        Self {
            ctx,
            phase: JoinPhase::Idle,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> JoinPhase {
        self.phase
    }

    /// Joins the session `pick` refers to.
    ///
    /// The pick is resolved against the shared registry by
    /// `(pick.search, pick.index)`; if the publication was replaced or
    /// discarded, or the index is out of range, the flow fails with
    /// [`FlowError::StaleSearchResult`] and the service's join path is
    /// never contacted.
    ///
    /// With `normalize_flags` set, the targeted raw record's presence
    /// flags are reconciled (both set if either was) before the request is
    /// built — some hosts advertise records joinable through only one of
    /// two overlapping mechanisms, and those joins spuriously fail without
    /// normalization.
    pub async fn activate(
        &mut self,
        pick: &SessionSummary,
        normalize_flags: bool,
    ) -> Result<(), FlowError> {
        if self.phase != JoinPhase::Idle {
            return Err(FlowError::AlreadyActivated);
        }
        self.phase = JoinPhase::Joining;

        let outcome = self.run(pick, normalize_flags).await;
        self.phase = match outcome {
            Ok(()) => JoinPhase::Succeeded,
            Err(_) => JoinPhase::Failed,
        };
        outcome
    }

    async fn run(
        &self,
        pick: &SessionSummary,
        normalize_flags: bool,
    ) -> Result<(), FlowError> {
        let service = self
            .ctx
            .accessor
            .session_service()
            .ok_or(FlowError::ServiceUnavailable)?;

        if normalize_flags {
            let changed = self
                .ctx
                .registry
                .normalize_presence_flags(pick.search, pick.index)?;
            if changed {
                tracing::debug!(
                    search = %pick.search,
                    index = pick.index,
                    "normalized presence flags before join"
                );
            }
        }

        let target = self.ctx.registry.resolve(pick.search, pick.index)?;

        let watch = service
            .on_join_complete()
            .watch()
            .ok_or(FlowError::OperationInFlight("join"))?;
        let watch_id = watch.id();

        if !service.join_session(self.ctx.user, GAME_SESSION, &target) {
            service.on_join_complete().clear(watch_id);
            tracing::debug!("join request rejected synchronously");
            return Err(FlowError::RequestRejected("join"));
        }
        drop(service);

        let completion = watch.recv().await.ok_or(FlowError::CompletionLost)?;

        // Unregister first; the service may have gone away while we
        // waited, so it is re-resolved and kept for the travel step.
        let service = self.ctx.accessor.session_service();
        if let Some(service) = &service {
            service.on_join_complete().clear(watch_id);
        }

        if !completion.result.is_success() {
            return Err(FlowError::JoinRefused(completion.result));
        }

        let service = service.ok_or(FlowError::ServiceUnavailable)?;
        let connect = service
            .resolved_connect_string(GAME_SESSION)
            .ok_or_else(|| {
                FlowError::UnresolvableConnectTarget(GAME_SESSION.to_string())
            })?;

        let travel = self
            .ctx
            .travel
            .as_ref()
            .ok_or(FlowError::TravelUnavailable)?;
        travel.travel_absolute(&connect)?;

        tracing::info!(session = %completion.session_name, "joined session, travel issued");
        Ok(())
    }
}
