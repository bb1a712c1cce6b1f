//! The session-service boundary for Lobbyforge.
//!
//! This crate defines everything the matchmaking backend and the flow layer
//! agree on:
//!
//! 1. **Data model** — session configurations, discovered-session records,
//!    search requests, and completion payloads ([`types`])
//! 2. **Completion plumbing** — one-shot, at-most-one-watcher delivery of
//!    asynchronous results ([`CompletionSlot`])
//! 3. **Service traits** — [`SessionService`] (the backend's contract) and
//!    [`ServiceAccessor`] (how callers resolve a live handle to it)
//!
//! # How it fits in the stack
//!
//! ```text
//! Scripting layer (above)  ← triggers create/find/join, renders summaries
//!     ↕
//! Flow layer (lobbyforge-flow)  ← one-shot state machines per operation
//!     ↕
//! Service boundary (this crate)  ← traits + types the backend implements
//! ```
//!
//! The backend itself (Steam, or anything presence-based) lives outside this
//! workspace; it implements [`SessionService`] and fires completions into
//! the slots this crate provides.

mod completion;
mod service;
mod types;

pub use completion::{CompletionSlot, CompletionWatch, WatchId};
pub use service::{ServiceAccessor, SessionService, SharedAccessor};
pub use types::{
    CompatibilityToken, CreateCompletion, DiscoveredSession, FindCompletion,
    JoinCompletion, JoinResultCode, LocalUserId, NamedSessionInfo,
    SearchRequest, SessionConfiguration, SettingValue, SettingsMap,
    GAME_SESSION, SETTING_MAP_NAME, SETTING_OWNER_NAME,
    SETTING_SEARCH_KEYWORDS,
};
