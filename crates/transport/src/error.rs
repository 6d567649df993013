//! Transport error taxonomy.

use tether_substrate::SubstrateError;

use crate::connection::ConnectionId;

/// Errors surfaced by transport lifecycle and send operations.
///
/// Admission refusals, unknown-peer packets, and repeated shutdowns are not
/// errors; they degrade to silent drops or no-ops by design.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No valid local peer identity was available at initialization.
    #[error("no valid local peer identity is available")]
    MissingIdentity,
    /// The substrate failed to come up; the session stays uninitialized and
    /// the caller may retry.
    #[error(transparent)]
    Substrate(#[from] SubstrateError),
    /// The operation requires an initialized session.
    #[error("transport is not initialized")]
    NotInitialized,
    /// The operation requires `run` to have fixed a role.
    #[error("transport is not running")]
    NotRunning,
    /// The handle does not resolve to an active connection.
    #[error("connection {0} is not active")]
    UnknownConnection(ConnectionId),
}
