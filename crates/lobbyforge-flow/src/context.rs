//! Shared environment the flows run in.

use std::sync::Arc;

use lobbyforge_service::{CompatibilityToken, LocalUserId, ServiceAccessor};

use crate::registry::SearchRegistry;
use crate::travel::TravelDriver;

/// Everything a flow needs besides its own per-operation input: how to
/// reach the service, where find publishes and join resolves results, the
/// travel seam, and the identity/compatibility values stamped into
/// requests.
///
/// One context is built per coordinator and shared (via `Arc`) by every
/// flow it spawns, so all of them see the same registry.
pub struct FlowContext {
    /// Resolves the session service at call time (never cached).
    pub accessor: Arc<dyn ServiceAccessor>,
    /// The find-to-join handoff registry.
    pub registry: Arc<SearchRegistry>,
    /// Transport-travel collaborator. `None` means no execution context is
    /// reachable; a successful join will then report failure.
    pub travel: Option<Arc<dyn TravelDriver>>,
    /// The local participant issuing requests.
    pub user: LocalUserId,
    /// Stamped into every hosted session so mismatched builds cannot join
    /// each other.
    pub build_token: CompatibilityToken,
}

impl FlowContext {
    /// Creates a context with a fresh registry, user 0, the current
    /// build's compatibility token, and no travel driver.
    pub fn new(accessor: Arc<dyn ServiceAccessor>) -> Self {
        Self {
            accessor,
            registry: Arc::new(SearchRegistry::new()),
            travel: None,
            user: LocalUserId(0),
            build_token: CompatibilityToken::current(),
        }
    }

    /// Sets the travel driver.
    pub fn with_travel(mut self, driver: Arc<dyn TravelDriver>) -> Self {
        self.travel = Some(driver);
        self
    }

    /// Sets the local participant.
    pub fn with_user(mut self, user: LocalUserId) -> Self {
        self.user = user;
        self
    }

    /// Overrides the build-compatibility token.
    pub fn with_build_token(mut self, token: CompatibilityToken) -> Self {
        self.build_token = token;
        self
    }
}
