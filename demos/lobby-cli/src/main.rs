use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lobbyforge::prelude::*;
use lobbyforge_service::{
    CompletionSlot, CreateCompletion, FindCompletion, JoinCompletion,
    NamedSessionInfo, SearchRequest, SettingsMap, SETTING_MAP_NAME,
    SETTING_SEARCH_KEYWORDS,
};

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// A toy session service: one hostable slot plus a canned neighborhood of
/// discoverable sessions. Completions fire synchronously, which is enough
/// to walk the whole lifecycle in a single process.
struct InMemoryService {
    create_slot: CompletionSlot<CreateCompletion>,
    find_slot: CompletionSlot<FindCompletion>,
    join_slot: CompletionSlot<JoinCompletion>,
    hosting: AtomicBool,
    neighborhood: Mutex<Vec<DiscoveredSession>>,
}

impl InMemoryService {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            create_slot: CompletionSlot::new(),
            find_slot: CompletionSlot::new(),
            join_slot: CompletionSlot::new(),
            hosting: AtomicBool::new(false),
            neighborhood: Mutex::new(vec![
                discovered("Alice", "Docks", "ranked", 12),
                discovered("Bob", "Quarry", "casual", 48),
                discovered("Carol", "Docks", "ranked", 31),
            ]),
        })
    }
}

fn discovered(owner: &str, map: &str, keyword: &str, ping_ms: u32) -> DiscoveredSession {
    let mut settings = SettingsMap::new();
    settings.set_text(SETTING_MAP_NAME, map);
    settings.set_text(SETTING_SEARCH_KEYWORDS, keyword);
    DiscoveredSession {
        owner_name: owner.to_string(),
        settings,
        public_slots: 4,
        private_slots: 0,
        open_public_slots: 2,
        uses_presence: true,
        uses_native_groups: false, // lopsided on purpose, normalized on join
        ping_ms,
    }
}

impl SessionService for InMemoryService {
    fn named_session(&self, name: &str) -> Option<NamedSessionInfo> {
        (self.hosting.load(Ordering::SeqCst) && name == GAME_SESSION)
            .then(|| NamedSessionInfo { name: name.to_string() })
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
            results: self.neighborhood.lock().unwrap().clone(),
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
            result: JoinResultCode::Success,
        });
        true
    }

    fn on_join_complete(&self) -> &CompletionSlot<JoinCompletion> {
        &self.join_slot
    }

    fn resolved_connect_string(&self, _name: &str) -> Option<String> {
        Some("192.0.2.44:7777".to_string())
    }
}

struct PrintlnTravel;

impl TravelDriver for PrintlnTravel {
    fn travel_absolute(&self, connect: &str) -> Result<(), TravelError> {
        println!("  -> traveling to {connect}");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lifecycle walkthrough
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lobbyforge::init_tracing();

    let service = InMemoryService::new();
    let accessor = SharedAccessor::with_service(
        Arc::clone(&service) as Arc<dyn SessionService>
    );
    let coordinator = SessionCoordinator::builder()
        .travel(Arc::new(PrintlnTravel))
        .user(LocalUserId(1))
        .build(Arc::new(accessor));

    println!("hosting a ranked session...");
    coordinator.create_session(4, 0, "ranked").await?;

    println!("searching for ranked sessions...");
    let found = coordinator.find_sessions(100, "ranked").await?;
    for summary in &found {
        println!(
            "  [{}] {} ({} open, {}ms)",
            summary.index, summary.display_name, summary.open_slots, summary.ping_ms
        );
    }

    let pick = found
        .iter()
        .min_by_key(|s| s.ping_ms)
        .ok_or("no sessions found")?;
    println!("joining {}...", pick.display_name);
    coordinator.join_session(pick, true).await?;

    Ok(())
}
