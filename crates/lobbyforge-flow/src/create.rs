//! The create flow: advertise a session under the well-known name.

use std::sync::Arc;

use lobbyforge_service::{SessionConfiguration, GAME_SESSION};

use crate::context::FlowContext;
use crate::error::FlowError;

/// Lifecycle of a [`CreateFlow`].
///
/// ```text
/// Idle ──(activate)──→ Requesting ──→ Succeeded
///                           │
///                           └───────→ Failed
/// ```
///
/// Terminal states are final: the flow is one-shot and a second
/// `activate` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePhase {
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

/// One-shot request to create and advertise a named session.
pub struct CreateFlow {
    ctx: Arc<FlowContext>,
    phase: CreatePhase,
}

impl CreateFlow {
    /// Creates an idle flow.
    pub fn new(ctx: Arc<FlowContext>) -> Self {
        Self {
            ctx,
            phase: CreatePhase::Idle,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> CreatePhase {
        self.phase
    }

    /// Requests creation of a session advertised per `config`, awaits the
    /// service's completion, and reports exactly one terminal outcome.
    ///
    /// The configuration's build token is overwritten with the context's
    /// before submission — host and joiner must derive it identically or
    /// no joiner can ever match.
    ///
    /// # Errors
    /// - [`FlowError::AlreadyActivated`] — the flow was used before
    /// - [`FlowError::ServiceUnavailable`] — no backend subsystem
    /// - [`FlowError::SessionAlreadyExists`] — a session already holds the
    ///   well-known name (the async create path is never contacted)
    /// - [`FlowError::OperationInFlight`] — another create holds the watch
    /// - [`FlowError::RequestRejected`] — synchronous rejection
    /// - [`FlowError::CreateFailed`] — asynchronous failure
    pub async fn activate(
        &mut self,
        config: SessionConfiguration,
    ) -> Result<(), FlowError> {
        if self.phase != CreatePhase::Idle {
            return Err(FlowError::AlreadyActivated);
        }
        self.phase = CreatePhase::Requesting;

        let outcome = self.run(config).await;
        self.phase = match outcome {
            Ok(()) => CreatePhase::Succeeded,
            Err(_) => CreatePhase::Failed,
        };
        outcome
    }

    async fn run(&self, mut config: SessionConfiguration) -> Result<(), FlowError> {
        let service = self
            .ctx
            .accessor
            .session_service()
            .ok_or(FlowError::ServiceUnavailable)?;

        if service.named_session(GAME_SESSION).is_some() {
            return Err(FlowError::SessionAlreadyExists(GAME_SESSION.to_string()));
        }

        config.build_token = self.ctx.build_token.clone();

        let watch = service
            .on_create_complete()
            .watch()
            .ok_or(FlowError::OperationInFlight("create"))?;
        let watch_id = watch.id();

        if !service.create_session(self.ctx.user, GAME_SESSION, &config) {
            service.on_create_complete().clear(watch_id);
            tracing::debug!("create request rejected synchronously");
            return Err(FlowError::RequestRejected("create"));
        }
        drop(service);

        let completion = watch.recv().await.ok_or(FlowError::CompletionLost)?;

        // Unregister first, success or failure. The service is re-resolved
        // because availability may have changed while we waited.
        if let Some(service) = self.ctx.accessor.session_service() {
            service.on_create_complete().clear(watch_id);
        }

        if !completion.succeeded {
            return Err(FlowError::CreateFailed);
        }

        tracing::info!(session = %completion.session_name, "session created");
        Ok(())
    }
}
