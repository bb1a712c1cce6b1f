//! Error types for the flow layer.

use lobbyforge_service::JoinResultCode;

use crate::travel::TravelError;

/// Errors a flow can report. All are terminal for the flow instance that
/// raised them — there are no internal retries — and each carries the
/// human-readable text the scripting layer shows.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// No backend subsystem is currently available.
    #[error("session service not available")]
    ServiceUnavailable,

    /// A session already exists under the well-known name. Reported
    /// without contacting the service's asynchronous create path.
    #[error("session '{0}' already exists")]
    SessionAlreadyExists(String),

    /// Another operation of the same kind already holds the completion
    /// watch.
    #[error("another {0} operation is already in flight")]
    OperationInFlight(&'static str),

    /// The flow instance was activated a second time. Flows are one-shot;
    /// create a new instance per operation.
    #[error("flow has already been activated")]
    AlreadyActivated,

    /// The service refused the request synchronously; no completion will
    /// follow (the watch was already cleared when this is reported).
    #[error("{0} request was rejected by the session service")]
    RequestRejected(&'static str),

    /// The service accepted the create request but reported failure.
    #[error("session creation failed")]
    CreateFailed,

    /// The service accepted the search but reported failure.
    #[error("session search failed")]
    SearchFailed,

    /// A join referenced a search publication that is gone: never
    /// published, replaced by a newer search, or an out-of-range index.
    #[error("stale or invalid search result")]
    StaleSearchResult,

    /// The service completed the join with a non-success verdict.
    #[error("{0}")]
    JoinRefused(JoinResultCode),

    /// The join succeeded but the session's connection target could not be
    /// resolved.
    #[error("could not resolve connect string for session '{0}'")]
    UnresolvableConnectTarget(String),

    /// The join succeeded but no transport-travel collaborator is
    /// reachable. The contract is "joined AND traveling", so this is an
    /// overall failure.
    #[error("no transport travel driver is available")]
    TravelUnavailable,

    /// The transport-travel collaborator refused the handoff.
    #[error(transparent)]
    Travel(#[from] TravelError),

    /// The service dropped the operation without ever completing it.
    #[error("the session service dropped the operation before completing")]
    CompletionLost,
}
