//! End-to-end tests driving the coordinator through a full host/search/join
//! lifecycle against a scripted backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lobbyforge::prelude::*;
use lobbyforge_service::{
    CompletionSlot, CreateCompletion, FindCompletion, JoinCompletion,
    NamedSessionInfo, SearchRequest, SettingsMap, SETTING_MAP_NAME,
    SETTING_SEARCH_KEYWORDS,
};

// =========================================================================
// Scripted backend
// =========================================================================

struct ScriptedService {
    create_slot: CompletionSlot<CreateCompletion>,
    find_slot: CompletionSlot<FindCompletion>,
    join_slot: CompletionSlot<JoinCompletion>,
    results: Mutex<Vec<DiscoveredSession>>,
    join_result: Mutex<JoinResultCode>,
    hosting: AtomicBool,
}

impl ScriptedService {
    fn new(results: Vec<DiscoveredSession>) -> Arc<Self> {
        Arc::new(Self {
            create_slot: CompletionSlot::new(),
            find_slot: CompletionSlot::new(),
            join_slot: CompletionSlot::new(),
            results: Mutex::new(results),
            join_result: Mutex::new(JoinResultCode::Success),
            hosting: AtomicBool::new(false),
        })
    }
}

impl SessionService for ScriptedService {
    fn named_session(&self, name: &str) -> Option<NamedSessionInfo> {
        if self.hosting.load(Ordering::SeqCst) && name == GAME_SESSION {
            Some(NamedSessionInfo {
                name: GAME_SESSION.to_string(),
            })
        } else {
            None
        }
    }

    fn create_session(
        &self,
        _user: LocalUserId,
        name: &str,
        _config: &SessionConfiguration,
    ) -> bool {
        self.hosting.store(true, Ordering::SeqCst);
        self.create_slot.complete(CreateCompletion {
            session_name: name.to_string(),
            succeeded: true,
        });
        true
    }

    fn on_create_complete(&self) -> &CompletionSlot<CreateCompletion> {
        &self.create_slot
    }

    fn find_sessions(&self, _user: LocalUserId, _request: &SearchRequest) -> bool {
        self.find_slot.complete(FindCompletion {
            succeeded: true,
            results: self.results.lock().unwrap().clone(),
        });
        true
    }

    fn on_find_complete(&self) -> &CompletionSlot<FindCompletion> {
        &self.find_slot
    }

    fn join_session(
        &self,
        _user: LocalUserId,
        name: &str,
        _target: &DiscoveredSession,
    ) -> bool {
        self.join_slot.complete(JoinCompletion {
            session_name: name.to_string(),
            result: *self.join_result.lock().unwrap(),
        });
        true
    }

    fn on_join_complete(&self) -> &CompletionSlot<JoinCompletion> {
        &self.join_slot
    }

    fn resolved_connect_string(&self, _name: &str) -> Option<String> {
        Some("192.0.2.10:7777".to_string())
    }
}

#[derive(Default)]
struct RecordingTravel {
    calls: Mutex<Vec<String>>,
}

impl TravelDriver for RecordingTravel {
    fn travel_absolute(&self, connect: &str) -> Result<(), TravelError> {
        self.calls.lock().unwrap().push(connect.to_string());
        Ok(())
    }
}

fn record(owner: &str, map: &str, keyword: &str) -> DiscoveredSession {
    let mut settings = SettingsMap::new();
    settings.set_text(SETTING_MAP_NAME, map);
    if !keyword.is_empty() {
        settings.set_text(SETTING_SEARCH_KEYWORDS, keyword);
    }
    DiscoveredSession {
        owner_name: owner.to_string(),
        settings,
        public_slots: 4,
        private_slots: 0,
        open_public_slots: 3,
        uses_presence: true,
        uses_native_groups: true,
        ping_ms: 20,
    }
}

fn coordinator(
    service: &Arc<ScriptedService>,
    travel: &Arc<RecordingTravel>,
) -> SessionCoordinator {
    let accessor = SharedAccessor::with_service(
        Arc::clone(service) as Arc<dyn SessionService>
    );
    SessionCoordinator::builder()
        .travel(Arc::clone(travel) as Arc<dyn TravelDriver>)
        .user(LocalUserId(7))
        .build_token(CompatibilityToken::new("it-build"))
        .build(Arc::new(accessor))
}

// =========================================================================
// Lifecycle
// =========================================================================

#[tokio::test]
async fn test_host_lifecycle_create_then_duplicate_is_rejected() {
    lobbyforge::init_tracing();
    let service = ScriptedService::new(Vec::new());
    let travel = Arc::new(RecordingTravel::default());
    let coord = coordinator(&service, &travel);

    coord
        .create_session(4, 0, "Ranked")
        .await
        .expect("first create should succeed");

    // The backend now reports a named session; a second create is
    // refused before the async path is contacted.
    let second = coord.create_session(4, 0, "Ranked").await;
    assert!(matches!(
        second,
        Err(LobbyforgeError::Flow(FlowError::SessionAlreadyExists(_)))
    ));
}

#[tokio::test]
async fn test_client_lifecycle_find_then_join_travels() {
    let service = ScriptedService::new(vec![
        record("Alice", "Docks", "Ranked"),
        record("Bob", "Quarry", "Casual"),
    ]);
    let travel = Arc::new(RecordingTravel::default());
    let coord = coordinator(&service, &travel);

    let found = coord
        .find_sessions(100, "Ranked")
        .await
        .expect("find should succeed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].display_name, "Alice — Docks  [Ranked]");

    coord
        .join_session(&found[0], true)
        .await
        .expect("join should succeed");

    assert_eq!(
        *travel.calls.lock().unwrap(),
        vec!["192.0.2.10:7777".to_string()]
    );
}

#[tokio::test]
async fn test_join_from_superseded_search_is_stale() {
    let service = ScriptedService::new(vec![record("Alice", "Docks", "")]);
    let travel = Arc::new(RecordingTravel::default());
    let coord = coordinator(&service, &travel);

    let first = coord.find_sessions(100, "").await.expect("find 1");
    let _second = coord.find_sessions(100, "").await.expect("find 2");

    let result = coord.join_session(&first[0], false).await;
    assert!(matches!(
        result,
        Err(LobbyforgeError::Flow(FlowError::StaleSearchResult))
    ));
    assert!(travel.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_join_refusal_surfaces_reason_text() {
    let service = ScriptedService::new(vec![record("Alice", "Docks", "")]);
    *service.join_result.lock().unwrap() = JoinResultCode::SessionDoesNotExist;
    let travel = Arc::new(RecordingTravel::default());
    let coord = coordinator(&service, &travel);

    let found = coord.find_sessions(100, "").await.expect("find");
    let err = coord
        .join_session(&found[0], false)
        .await
        .expect_err("join should be refused");

    assert_eq!(err.to_string(), "Session does not exist");
}

#[tokio::test]
async fn test_operations_without_backend_fail_uniformly() {
    let accessor: Arc<dyn ServiceAccessor> = Arc::new(SharedAccessor::new());
    let coord = SessionCoordinator::builder().build(accessor);

    let create = coord.create_session(4, 0, "").await;
    let find = coord.find_sessions(100, "").await;

    assert!(matches!(
        create,
        Err(LobbyforgeError::Flow(FlowError::ServiceUnavailable))
    ));
    assert!(matches!(
        find,
        Err(LobbyforgeError::Flow(FlowError::ServiceUnavailable))
    ));
}
