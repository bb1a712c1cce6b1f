//! The session-service traits: what the backend implements and how the
//! flow layer resolves a handle to it.
//!
//! Lobbyforge doesn't implement matchmaking itself — that's the backend's
//! job (Steam, or any presence-based service). The [`SessionService`] trait
//! captures exactly the contract the flows rely on: synchronous
//! accept/reject on each request, plus a one-shot completion slot per
//! operation kind.
//!
//! The backend subsystem can appear and disappear across calls (it may not
//! be initialized yet, or may be torn down mid-game), so nothing caches a
//! service handle: every touch goes through a [`ServiceAccessor`].

use std::sync::{Arc, RwLock};

use crate::completion::CompletionSlot;
use crate::types::{
    CreateCompletion, DiscoveredSession, FindCompletion, JoinCompletion,
    LocalUserId, NamedSessionInfo, SearchRequest, SessionConfiguration,
};

/// The matchmaking backend's contract.
///
/// Request methods return `true` if the request was accepted for
/// asynchronous processing; the matching completion slot then fires exactly
/// once. A `false` return means the request was rejected synchronously and
/// NO completion will follow — callers must clear any watch they
/// registered.
pub trait SessionService: Send + Sync + 'static {
    /// Looks up a session the local participant has registered under a
    /// well-known name. `None` if no such session exists.
    fn named_session(&self, name: &str) -> Option<NamedSessionInfo>;

    /// Requests creation of an advertised session.
    fn create_session(
        &self,
        user: LocalUserId,
        name: &str,
        config: &SessionConfiguration,
    ) -> bool;

    /// Completion slot for create requests.
    fn on_create_complete(&self) -> &CompletionSlot<CreateCompletion>;

    /// Issues a session search.
    fn find_sessions(&self, user: LocalUserId, request: &SearchRequest) -> bool;

    /// Completion slot for search requests.
    fn on_find_complete(&self) -> &CompletionSlot<FindCompletion>;

    /// Requests to join the given discovered session under a well-known
    /// name.
    fn join_session(
        &self,
        user: LocalUserId,
        name: &str,
        target: &DiscoveredSession,
    ) -> bool;

    /// Completion slot for join requests.
    fn on_join_complete(&self) -> &CompletionSlot<JoinCompletion>;

    /// Resolves the connection target for a joined named session.
    /// `None` if the session has no resolvable address.
    fn resolved_connect_string(&self, name: &str) -> Option<String>;
}

/// Resolves a live handle to the session service at call time.
///
/// Returns `None` when no backend subsystem is currently available. No
/// other failure modes, no side effects — and no caching by callers, since
/// availability can change between calls.
pub trait ServiceAccessor: Send + Sync + 'static {
    /// The current service handle, if the backend is up.
    fn session_service(&self) -> Option<Arc<dyn SessionService>>;
}

/// A [`ServiceAccessor`] whose service can be installed and removed at
/// runtime, modeling a backend subsystem that comes and goes.
#[derive(Default)]
pub struct SharedAccessor {
    service: RwLock<Option<Arc<dyn SessionService>>>,
}

impl SharedAccessor {
    /// Creates an accessor with no service installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accessor with `service` already installed.
    pub fn with_service(service: Arc<dyn SessionService>) -> Self {
        Self {
            service: RwLock::new(Some(service)),
        }
    }

    /// Installs (or replaces) the service.
    pub fn install(&self, service: Arc<dyn SessionService>) {
        *self.service.write().expect("service slot poisoned") = Some(service);
    }

    /// Removes the service; subsequent resolutions return `None`.
    pub fn clear(&self) {
        *self.service.write().expect("service slot poisoned") = None;
    }
}

impl ServiceAccessor for SharedAccessor {
    fn session_service(&self) -> Option<Arc<dyn SessionService>> {
        self.service
            .read()
            .expect("service slot poisoned")
            .clone()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// A service that accepts nothing — just enough to test the accessor.
    struct NullService {
        create_slot: CompletionSlot<CreateCompletion>,
        find_slot: CompletionSlot<FindCompletion>,
        join_slot: CompletionSlot<JoinCompletion>,
    }

    impl NullService {
        fn new() -> Self {
            Self {
                create_slot: CompletionSlot::new(),
                find_slot: CompletionSlot::new(),
                join_slot: CompletionSlot::new(),
            }
        }
    }

    impl SessionService for NullService {
        fn named_session(&self, _name: &str) -> Option<NamedSessionInfo> {
            None
        }

        fn create_session(
            &self,
            _user: LocalUserId,
            _name: &str,
            _config: &SessionConfiguration,
        ) -> bool {
            false
        }

        fn on_create_complete(&self) -> &CompletionSlot<CreateCompletion> {
            &self.create_slot
        }

        fn find_sessions(
            &self,
            _user: LocalUserId,
            _request: &SearchRequest,
        ) -> bool {
            false
        }

        fn on_find_complete(&self) -> &CompletionSlot<FindCompletion> {
            &self.find_slot
        }

        fn join_session(
            &self,
            _user: LocalUserId,
            _name: &str,
            _target: &DiscoveredSession,
        ) -> bool {
            false
        }

        fn on_join_complete(&self) -> &CompletionSlot<JoinCompletion> {
            &self.join_slot
        }

        fn resolved_connect_string(&self, _name: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_shared_accessor_empty_resolves_none() {
        let accessor = SharedAccessor::new();
        assert!(accessor.session_service().is_none());
    }

    #[test]
    fn test_shared_accessor_install_makes_service_available() {
        let accessor = SharedAccessor::new();
        accessor.install(Arc::new(NullService::new()));

        assert!(accessor.session_service().is_some());
    }

    #[test]
    fn test_shared_accessor_clear_removes_service() {
        let accessor =
            SharedAccessor::with_service(Arc::new(NullService::new()));
        assert!(accessor.session_service().is_some());

        accessor.clear();

        assert!(accessor.session_service().is_none());
    }

    #[test]
    fn test_shared_accessor_resolves_fresh_handle_each_call() {
        // Availability is never cached: clearing between two resolutions
        // must be observed by the second one.
        let accessor =
            SharedAccessor::with_service(Arc::new(NullService::new()));

        let first = accessor.session_service();
        accessor.clear();
        let second = accessor.session_service();

        assert!(first.is_some());
        assert!(second.is_none());
    }
}
