//! # Lobbyforge
//!
//! Asynchronous multiplayer session lifecycle coordination.
//!
//! Lobbyforge drives the three one-shot flows of a session's life —
//! create, find, join — against a pluggable session service, with a
//! shared registry handing search results from find to join and a travel
//! seam carrying the client into the joined session.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lobbyforge::prelude::*;
//!
//! // Implement SessionService and TravelDriver for your backend, then:
//! // let coordinator = SessionCoordinator::builder()
//! //     .travel(my_travel)
//! //     .build(my_accessor);
//! //
//! // coordinator.create_session(4, 0, "Ranked").await?;
//! // let found = coordinator.find_sessions(100, "Ranked").await?;
//! // coordinator.join_session(&found[0], true).await?;
//! ```

mod coordinator;
mod error;
mod telemetry;

pub use coordinator::{SessionCoordinator, SessionCoordinatorBuilder};
pub use error::LobbyforgeError;
pub use telemetry::init_tracing;

/// The most commonly used types, re-exported for a single glob import.
pub mod prelude {
    pub use crate::{LobbyforgeError, SessionCoordinator, SessionCoordinatorBuilder};

    pub use lobbyforge_flow::{
        FlowContext, FlowError, SearchId, SessionSummary, TravelDriver,
        TravelError,
    };
    pub use lobbyforge_service::{
        CompatibilityToken, DiscoveredSession, JoinResultCode, LocalUserId,
        ServiceAccessor, SessionConfiguration, SessionService, SharedAccessor,
        GAME_SESSION,
    };
}
