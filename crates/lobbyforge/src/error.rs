//! Unified error type for the Lobbyforge crates.

use lobbyforge_flow::{FlowError, TravelError};

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `lobbyforge` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LobbyforgeError {
    /// A flow-level error (service reachability, lifecycle, join taxonomy).
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// A travel-level error raised outside a flow.
    #[error(transparent)]
    Travel(#[from] TravelError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobbyforge_service::JoinResultCode;

    #[test]
    fn test_from_flow_error() {
        let err = FlowError::ServiceUnavailable;
        let top: LobbyforgeError = err.into();
        assert!(matches!(top, LobbyforgeError::Flow(_)));
        assert!(top.to_string().contains("not available"));
    }

    #[test]
    fn test_from_flow_error_preserves_join_reason() {
        let err = FlowError::JoinRefused(JoinResultCode::SessionIsFull);
        let top: LobbyforgeError = err.into();
        assert_eq!(top.to_string(), "Session is full");
    }

    #[test]
    fn test_from_travel_error() {
        let err = TravelError::Rejected("no map".into());
        let top: LobbyforgeError = err.into();
        assert!(matches!(top, LobbyforgeError::Travel(_)));
        assert!(top.to_string().contains("no map"));
    }
}
