//! Pure projection of raw search records into user-facing summaries.

use lobbyforge_service::{
    DiscoveredSession, SETTING_MAP_NAME, SETTING_OWNER_NAME,
};
use serde::{Deserialize, Serialize};

use crate::registry::SearchId;

/// Fallback display name when a record advertises nothing usable.
const FALLBACK_DISPLAY_NAME: &str = "Steam Lobby";

/// What the scripting layer shows per discovered session, and what it
/// hands back to a join.
///
/// `search` and `index` together are the only stable handle into the raw
/// result set: `index` is the record's ORIGINAL position (records filtered
/// out of the summary list still consume their slot), and `search` pins
/// the summary to the publication that produced it so a join after a newer
/// find fails cleanly instead of joining the wrong session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The publication this summary was minted from.
    pub search: SearchId,
    /// Original position in the raw result set.
    pub index: usize,
    /// Composed display line: `Owner — Map  [Keyword]`, with fallbacks.
    pub display_name: String,
    /// Host display name.
    pub owner_name: String,
    /// Advertised map, empty if none.
    pub map_name: String,
    /// The record's discovery tag (or the caller's filter as fallback).
    pub keyword: String,
    /// Total capacity (public + private).
    pub max_players: u32,
    /// Public slots still open.
    pub open_slots: u32,
    /// Latency estimate to the host.
    pub ping_ms: u32,
}

/// The host name a record should display: the advertised override wins,
/// otherwise the owning user's name from the service.
fn owner_name(record: &DiscoveredSession) -> String {
    match record.settings.text(SETTING_OWNER_NAME) {
        Some(owner) if !owner.is_empty() => owner.to_string(),
        _ => record.owner_name.clone(),
    }
}

fn map_name(record: &DiscoveredSession) -> String {
    record
        .settings
        .text(SETTING_MAP_NAME)
        .unwrap_or_default()
        .to_string()
}

/// Composes the display line for one record.
///
/// `Owner — Map` when both are present, either alone otherwise, and
/// `Steam Lobby` when neither is. A keyword (the record's own tag, falling
/// back to the caller's filter) is appended as `  [Keyword]`.
pub fn display_name(record: &DiscoveredSession, filter_keyword: &str) -> String {
    let owner = owner_name(record);
    let map = map_name(record);

    let mut name = String::new();
    if !owner.is_empty() {
        name.push_str(&owner);
    }
    if !map.is_empty() {
        if !name.is_empty() {
            name.push_str(" — ");
        }
        name.push_str(&map);
    }
    if name.is_empty() {
        name.push_str(FALLBACK_DISPLAY_NAME);
    }

    let keyword = match record.keyword() {
        Some(tag) if !tag.is_empty() => tag,
        _ => filter_keyword,
    };
    if !keyword.is_empty() {
        name.push_str("  [");
        name.push_str(keyword);
        name.push(']');
    }

    name
}

/// Projects one raw record into a summary row.
///
/// `index` must be the record's position in the ORIGINAL result set, not
/// its position among the filtered rows — it is the handle a later join
/// uses.
pub fn summarize(
    search: SearchId,
    index: usize,
    record: &DiscoveredSession,
    filter_keyword: &str,
) -> SessionSummary {
    let keyword = match record.keyword() {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ => filter_keyword.to_string(),
    };

    SessionSummary {
        search,
        index,
        display_name: display_name(record, filter_keyword),
        owner_name: owner_name(record),
        map_name: map_name(record),
        keyword,
        max_players: record.max_players(),
        open_slots: record.open_public_slots,
        ping_ms: record.ping_ms,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SearchRegistry;
    use lobbyforge_service::{SettingsMap, SETTING_SEARCH_KEYWORDS};

    fn record(owner: &str, map: &str, keyword: &str) -> DiscoveredSession {
        let mut settings = SettingsMap::new();
        if !map.is_empty() {
            settings.set_text(SETTING_MAP_NAME, map);
        }
        if !keyword.is_empty() {
            settings.set_text(SETTING_SEARCH_KEYWORDS, keyword);
        }
        DiscoveredSession {
            owner_name: owner.to_string(),
            settings,
            public_slots: 4,
            private_slots: 2,
            open_public_slots: 3,
            uses_presence: true,
            uses_native_groups: true,
            ping_ms: 42,
        }
    }

    fn any_search_id() -> SearchId {
        SearchRegistry::new().publish(vec![])
    }

    // =====================================================================
    // display_name()
    // =====================================================================

    #[test]
    fn test_display_name_owner_map_keyword() {
        let r = record("Alice", "Docks", "Ranked");
        assert_eq!(display_name(&r, ""), "Alice — Docks  [Ranked]");
    }

    #[test]
    fn test_display_name_all_empty_falls_back() {
        let r = record("", "", "");
        assert_eq!(display_name(&r, ""), "Steam Lobby");
    }

    #[test]
    fn test_display_name_owner_only() {
        let r = record("Alice", "", "");
        assert_eq!(display_name(&r, ""), "Alice");
    }

    #[test]
    fn test_display_name_map_only() {
        let r = record("", "Docks", "");
        assert_eq!(display_name(&r, ""), "Docks");
    }

    #[test]
    fn test_display_name_filter_keyword_used_when_record_has_none() {
        // The caller searched for a tag; a matching record that didn't
        // advertise one still shows the tag it matched under.
        let r = record("Alice", "Docks", "");
        assert_eq!(display_name(&r, "Ranked"), "Alice — Docks  [Ranked]");
    }

    #[test]
    fn test_display_name_record_keyword_wins_over_filter() {
        let r = record("Alice", "", "Casual");
        assert_eq!(display_name(&r, "Ranked"), "Alice  [Casual]");
    }

    #[test]
    fn test_display_name_owner_setting_overrides_service_name() {
        let mut r = record("ServiceName", "Docks", "");
        r.settings.set_text(SETTING_OWNER_NAME, "Override");
        assert_eq!(display_name(&r, ""), "Override — Docks");
    }

    // =====================================================================
    // summarize()
    // =====================================================================

    #[test]
    fn test_summarize_copies_slot_counts_and_ping() {
        let search = any_search_id();
        let row = summarize(search, 3, &record("Alice", "Docks", "Ranked"), "");

        assert_eq!(row.search, search);
        assert_eq!(row.index, 3);
        assert_eq!(row.owner_name, "Alice");
        assert_eq!(row.map_name, "Docks");
        assert_eq!(row.keyword, "Ranked");
        assert_eq!(row.max_players, 6);
        assert_eq!(row.open_slots, 3);
        assert_eq!(row.ping_ms, 42);
    }

    #[test]
    fn test_summarize_keyword_falls_back_to_filter() {
        let row = summarize(any_search_id(), 0, &record("A", "", ""), "Ranked");
        assert_eq!(row.keyword, "Ranked");
    }

    #[test]
    fn test_session_summary_round_trips_through_json() {
        // The scripting layer marshals summaries out and back in; the
        // (search, index) handle must survive the trip intact.
        let row = summarize(any_search_id(), 2, &record("A", "B", "C"), "");
        let bytes = serde_json::to_vec(&row).unwrap();
        let decoded: SessionSummary = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(row, decoded);
    }
}
