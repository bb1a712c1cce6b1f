//! The session lifecycle flows: create, find, join.
//!
//! Each operation is a one-shot state machine that:
//!
//! 1. resolves the session service through a
//!    [`ServiceAccessor`](lobbyforge_service::ServiceAccessor)
//! 2. registers exactly one completion watch with the service
//! 3. submits the request, clearing the watch immediately if the service
//!    rejects it synchronously
//! 4. awaits the completion, unregisters, and reports exactly one terminal
//!    outcome
//!
//! The one piece of state shared across operations is the
//! [`SearchRegistry`]: [`FindFlow`] publishes the raw result set there on
//! success, and a later [`JoinFlow`] resolves its pick by
//! `(SearchId, index)` — failing cleanly when the publication has been
//! replaced or discarded instead of touching stale data.

mod context;
mod create;
mod error;
mod find;
mod join;
mod project;
mod registry;
mod travel;

pub use context::FlowContext;
pub use create::{CreateFlow, CreatePhase};
pub use error::FlowError;
pub use find::{FindFlow, FindPhase};
pub use join::{JoinFlow, JoinPhase};
pub use project::{display_name, summarize, SessionSummary};
pub use registry::{SearchId, SearchRegistry};
pub use travel::{TravelDriver, TravelError};
