//! Transport-travel handoff: the seam between "joined" and "playing".
//!
//! After a successful join, the flow resolves a connection target and
//! hands it to a [`TravelDriver`] — the game-level transport that actually
//! moves the client to the host. Lobbyforge doesn't implement that
//! transport; the embedding game provides the driver, and tests provide a
//! recording one.

/// Carries the client to a resolved connection target.
pub trait TravelDriver: Send + Sync + 'static {
    /// Requests an absolute-mode transfer to `connect` (host:port or
    /// backend-specific address). Fire-and-forget from the flow's
    /// perspective: a returned `Ok` means the transfer was issued, not
    /// that it arrived.
    fn travel_absolute(&self, connect: &str) -> Result<(), TravelError>;
}

/// Why a travel handoff could not be issued.
#[derive(Debug, thiserror::Error)]
pub enum TravelError {
    /// No execution context (world, player controller) exists to travel.
    #[error("no execution context is available to travel")]
    NoContext,

    /// The transport refused the transfer.
    #[error("travel rejected: {0}")]
    Rejected(String),
}
