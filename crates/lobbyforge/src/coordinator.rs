//! `SessionCoordinator` builder and lifecycle facade.
//!
//! This is the entry point for embedding Lobbyforge. It ties together the
//! layers: service access → flows → search registry → travel.

use std::sync::Arc;

use lobbyforge_flow::{
    CreateFlow, FindFlow, FlowContext, JoinFlow, SessionSummary, TravelDriver,
};
use lobbyforge_service::{
    CompatibilityToken, LocalUserId, ServiceAccessor, SessionConfiguration,
};

use crate::LobbyforgeError;

/// Builder for configuring a [`SessionCoordinator`].
///
/// # Example
///
/// ```rust,ignore
/// use lobbyforge::prelude::*;
///
/// let coordinator = SessionCoordinator::builder()
///     .travel(my_travel)
///     .user(LocalUserId(0))
///     .build(my_accessor);
/// ```
pub struct SessionCoordinatorBuilder {
    travel: Option<Arc<dyn TravelDriver>>,
    user: LocalUserId,
    build_token: CompatibilityToken,
}

impl SessionCoordinatorBuilder {
    /// Creates a new builder with default settings: user 0, the current
    /// build's compatibility token, and no travel driver.
    pub fn new() -> Self {
        Self {
            travel: None,
            user: LocalUserId(0),
            build_token: CompatibilityToken::current(),
        }
    }

    /// Sets the travel driver handed the connect string after a join.
    ///
    /// Without one, a confirmed join is reported as a failure: the
    /// coordinator's contract is "joined AND traveling".
    pub fn travel(mut self, driver: Arc<dyn TravelDriver>) -> Self {
        self.travel = Some(driver);
        self
    }

    /// Sets the local participant issuing requests.
    pub fn user(mut self, user: LocalUserId) -> Self {
        self.user = user;
        self
    }

    /// Overrides the compatibility token stamped into hosted sessions.
    pub fn build_token(mut self, token: CompatibilityToken) -> Self {
        self.build_token = token;
        self
    }

    /// Builds the coordinator against the given service accessor.
    ///
    /// The accessor is consulted at each operation, never cached, so the
    /// backend may come and go over the coordinator's lifetime.
    pub fn build(self, accessor: Arc<dyn ServiceAccessor>) -> SessionCoordinator {
        let mut ctx = FlowContext::new(accessor)
            .with_user(self.user)
            .with_build_token(self.build_token);
        if let Some(driver) = self.travel {
            ctx = ctx.with_travel(driver);
        }
        SessionCoordinator { ctx: Arc::new(ctx) }
    }
}

impl Default for SessionCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Facade over the create/find/join flows.
///
/// Each operation spawns a fresh one-shot flow over a context shared by
/// all of them, so a find's published results are visible to a later
/// join. The coordinator itself is cheap to share: all state lives behind
/// the `Arc`ed context.
pub struct SessionCoordinator {
    ctx: Arc<FlowContext>,
}

impl SessionCoordinator {
    /// Creates a new builder.
    pub fn builder() -> SessionCoordinatorBuilder {
        SessionCoordinatorBuilder::new()
    }

    /// The shared flow context, for callers that drive flows directly.
    pub fn context(&self) -> &Arc<FlowContext> {
        &self.ctx
    }

    /// Creates and advertises a session under the well-known name, with
    /// hosting defaults (online, advertised, presence-enabled) and the
    /// given slot counts and search keyword.
    pub async fn create_session(
        &self,
        public_slots: u32,
        private_slots: u32,
        keyword: &str,
    ) -> Result<(), LobbyforgeError> {
        let config = SessionConfiguration::hosting_defaults(
            public_slots,
            private_slots,
            keyword,
        );
        CreateFlow::new(Arc::clone(&self.ctx)).activate(config).await?;
        Ok(())
    }

    /// Searches for presence-advertised sessions, publishes the raw set
    /// for a later join, and returns summaries matching `keyword` (empty
    /// keyword matches everything).
    pub async fn find_sessions(
        &self,
        max_results: u32,
        keyword: &str,
    ) -> Result<Vec<SessionSummary>, LobbyforgeError> {
        let summaries = FindFlow::new(Arc::clone(&self.ctx))
            .activate(max_results, keyword)
            .await?;
        Ok(summaries)
    }

    /// Joins the session a previous find's summary refers to and travels
    /// to it. `normalize_flags` reconciles the record's presence flags
    /// before the request is built.
    pub async fn join_session(
        &self,
        pick: &SessionSummary,
        normalize_flags: bool,
    ) -> Result<(), LobbyforgeError> {
        JoinFlow::new(Arc::clone(&self.ctx))
            .activate(pick, normalize_flags)
            .await?;
        Ok(())
    }
}
