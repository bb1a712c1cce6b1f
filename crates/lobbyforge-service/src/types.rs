//! Data model shared between the flow layer and the session service.
//!
//! These types cross the service boundary in both directions: the flow layer
//! submits a [`SessionConfiguration`] or [`SearchRequest`], and the backend
//! answers with completion payloads carrying [`DiscoveredSession`] records
//! or a [`JoinResultCode`]. Everything here is plain data — no behavior
//! beyond small accessors — so the backend can be swapped or mocked freely.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Well-known names and setting keys
// ---------------------------------------------------------------------------

/// The well-known name every advertised session uses. Only one named
/// session per local participant can be active at a time.
pub const GAME_SESSION: &str = "GameSession";

/// Settings key for the map a host is advertising.
pub const SETTING_MAP_NAME: &str = "MAPNAME";

/// Settings key for the host's display name override.
pub const SETTING_OWNER_NAME: &str = "OWNERNAME";

/// Settings key for the free-text discovery tag. Hosts advertise it,
/// finders filter on it.
pub const SETTING_SEARCH_KEYWORDS: &str = "SEARCHKEYWORDS";

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Index of a local participant on this machine.
///
/// Most clients only ever have one (index 0), but the service contract is
/// per-user, so the index travels with every request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LocalUserId(pub u32);

impl fmt::Display for LocalUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// Build-compatibility identifier stamped into every hosted session.
///
/// A join is only considered valid when host and joiner carry the same
/// token, which prevents cross-version joins. [`CompatibilityToken::current`]
/// bakes the crate version in at compile time, so any two binaries built
/// from the same release agree without runtime coordination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityToken(String);

impl CompatibilityToken {
    /// The token for the running build.
    pub fn current() -> Self {
        Self(concat!("lobbyforge/", env!("CARGO_PKG_VERSION")).to_string())
    }

    /// An explicit token, for deployments that version sessions separately
    /// from the crate (or for tests).
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CompatibilityToken {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for CompatibilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Settings map
// ---------------------------------------------------------------------------

/// A typed value in a session's advertised settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum SettingValue {
    Text(String),
    Number(i64),
    Flag(bool),
}

/// String-keyed settings advertised with a session.
///
/// The service treats these as opaque; the flow layer only reads the
/// well-known keys ([`SETTING_MAP_NAME`], [`SETTING_OWNER_NAME`],
/// [`SETTING_SEARCH_KEYWORDS`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsMap(HashMap<String, SettingValue>);

impl SettingsMap {
    /// Creates an empty settings map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: SettingValue) {
        self.0.insert(key.into(), value);
    }

    /// Stores a text value under `key`.
    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, SettingValue::Text(value.into()));
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    /// Looks up a text value by key. Returns `None` if the key is absent
    /// or holds a non-text value.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(SettingValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SessionConfiguration
// ---------------------------------------------------------------------------

/// How a hosted session is advertised.
///
/// Built once per create operation and never mutated after the create
/// request is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfiguration {
    /// Publicly joinable slots.
    pub public_slots: u32,
    /// Invite/reserved slots.
    pub private_slots: u32,

    /// LAN match instead of the online service.
    pub lan_match: bool,
    /// Advertise the session so searches can discover it.
    pub advertise: bool,
    /// Allow joins after the match has started.
    pub allow_join_in_progress: bool,
    /// Allow invites to this session.
    pub allow_invites: bool,
    /// Associate the session with the host's online presence.
    pub uses_presence: bool,
    /// Allow joining through a presence association.
    pub allow_join_via_presence: bool,
    /// Restrict presence joins to friends.
    pub presence_friends_only: bool,
    /// Use the backend's native grouping primitive (lobbies) when available.
    pub uses_native_groups: bool,
    /// Hosted on a dedicated server.
    pub dedicated: bool,

    /// Must match between host and joiner. Stamped by the create flow just
    /// before submission.
    pub build_token: CompatibilityToken,

    /// Free-text discovery tag. Also mirrored into [`Self::settings`] under
    /// [`SETTING_SEARCH_KEYWORDS`] so finders can filter on it.
    pub keyword: String,

    /// Advertised settings (map name, owner name, keyword tag, ...).
    pub settings: SettingsMap,
}

impl SessionConfiguration {
    /// The fixed configuration for hosting a presence-advertised lobby:
    /// online (not LAN), advertised, join-in-progress allowed, invites off,
    /// presence on with open presence joins, native grouping on, not
    /// dedicated.
    pub fn hosting_defaults(
        public_slots: u32,
        private_slots: u32,
        keyword: &str,
    ) -> Self {
        let mut settings = SettingsMap::new();
        settings.set_text(SETTING_SEARCH_KEYWORDS, keyword);

        Self {
            public_slots,
            private_slots,
            lan_match: false,
            advertise: true,
            allow_join_in_progress: true,
            allow_invites: false,
            uses_presence: true,
            allow_join_via_presence: true,
            presence_friends_only: false,
            uses_native_groups: true,
            dedicated: false,
            build_token: CompatibilityToken::current(),
            keyword: keyword.to_string(),
            settings,
        }
    }

    /// Total player capacity (public + private).
    pub fn max_players(&self) -> u32 {
        self.public_slots + self.private_slots
    }
}

// ---------------------------------------------------------------------------
// Search types
// ---------------------------------------------------------------------------

/// Parameters for a session search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Cap on the number of raw records the service returns.
    pub max_results: u32,
    /// Search the LAN instead of the online service.
    pub lan_query: bool,
    /// Only return sessions discoverable through presence. Required for
    /// backends whose grouping primitive is presence-based rather than a
    /// plain listing.
    pub require_presence: bool,
}

impl SearchRequest {
    /// An online, presence-filtered search — the shape every find
    /// operation in this system issues.
    pub fn presence_lobbies(max_results: u32) -> Self {
        Self {
            max_results,
            lan_query: false,
            require_presence: true,
        }
    }
}

/// One raw record returned by a search. Owned by whoever holds the result
/// set; the flow layer reads a handful of fields and otherwise treats it
/// as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredSession {
    /// The owning user's display name as reported by the service.
    pub owner_name: String,
    /// Advertised settings (map name, owner override, keyword tag, ...).
    pub settings: SettingsMap,
    /// Publicly joinable slots.
    pub public_slots: u32,
    /// Invite/reserved slots.
    pub private_slots: u32,
    /// Public slots still open.
    pub open_public_slots: u32,
    /// The record advertises a presence association.
    pub uses_presence: bool,
    /// The record advertises the backend's native grouping primitive.
    pub uses_native_groups: bool,
    /// Round-trip latency estimate to the host.
    pub ping_ms: u32,
}

impl DiscoveredSession {
    /// The record's own discovery tag, if it advertises one.
    pub fn keyword(&self) -> Option<&str> {
        self.settings.text(SETTING_SEARCH_KEYWORDS)
    }

    /// Total player capacity (public + private).
    pub fn max_players(&self) -> u32 {
        self.public_slots + self.private_slots
    }
}

/// A session the local participant currently has registered under a
/// well-known name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSessionInfo {
    /// The well-known name the session is registered under.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Completion payloads
// ---------------------------------------------------------------------------

/// Delivered when an asynchronous create request finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCompletion {
    /// The well-known name the session was created under.
    pub session_name: String,
    /// Whether the session is now registered and advertised.
    pub succeeded: bool,
}

/// Delivered when an asynchronous search finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct FindCompletion {
    /// Whether the search ran to completion.
    pub succeeded: bool,
    /// The raw result set, in the service's original order. Empty on
    /// failure or when nothing was found.
    pub results: Vec<DiscoveredSession>,
}

/// Delivered when an asynchronous join request finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCompletion {
    /// The well-known name the join targeted.
    pub session_name: String,
    /// The service's verdict.
    pub result: JoinResultCode,
}

/// The service's verdict on a join request.
///
/// `Display` renders the fixed human-readable taxonomy the scripting layer
/// shows on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinResultCode {
    Success,
    SessionIsFull,
    SessionDoesNotExist,
    CouldNotRetrieveAddress,
    AlreadyInSession,
    UnknownError,
    /// Anything the service reports that doesn't fit the named cases.
    Failed,
}

impl JoinResultCode {
    /// Returns `true` for the success verdict.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for JoinResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "Success",
            Self::SessionIsFull => "Session is full",
            Self::SessionDoesNotExist => "Session does not exist",
            Self::CouldNotRetrieveAddress => "Could not retrieve address",
            Self::AlreadyInSession => "Already in a session",
            Self::UnknownError => "Unknown error",
            Self::Failed => "Join failed",
        };
        f.write_str(text)
    }
}

// =========================================================================
// Tests
// =========================================================================
