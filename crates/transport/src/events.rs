//! Session enums and the engine-facing notification sink.

use serde::{Deserialize, Serialize};
use tether_substrate::Reliability;

use crate::connection::ConnectionRef;

/// Transport role, fixed for the lifetime of a session. Determines the
/// admission policy and which identifier maps are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Role {
    Server,
    Client,
}

impl Role {
    pub fn is_server(self) -> bool {
        matches!(self, Role::Server)
    }
}

/// Lifecycle state of the transport core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SessionState {
    Uninitialized,
    Initialized,
    Running,
    ShutDown,
}

/// Delivery guarantee the engine requests for a data send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum DeliveryMode {
    Unreliable,
    ReliableOrdered,
}

impl DeliveryMode {
    pub fn reliability(self) -> Reliability {
        match self {
            DeliveryMode::Unreliable => Reliability::UnreliableUnordered,
            DeliveryMode::ReliableOrdered => Reliability::ReliableOrdered,
        }
    }
}

/// Why a bound connection went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum DisconnectReason {
    Shutdown,
}

/// Why an outbound connect attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ConnectFailedReason {
    Refused,
    Timeout,
}

/// Ordered notifications the transport surfaces to the engine.
///
/// Invoked synchronously on the transport thread, in reconciled order: one
/// `on_connected` per bound peer, matched by at most one `on_disconnected`.
/// `on_receive` payloads borrow the transport's reusable scratch buffer and
/// must be consumed (or copied) before the call returns.
pub trait TransportSink {
    fn on_connected(&mut self, conn: ConnectionRef);
    fn on_disconnected(&mut self, conn: ConnectionRef, reason: DisconnectReason);
    fn on_connect_failed(&mut self, reason: ConnectFailedReason);
    fn on_receive(&mut self, conn: ConnectionRef, payload: &[u8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_mode_mapping() {
        assert_eq!(
            DeliveryMode::Unreliable.reliability(),
            Reliability::UnreliableUnordered
        );
        assert_eq!(
            DeliveryMode::ReliableOrdered.reliability(),
            Reliability::ReliableOrdered
        );
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::Server.is_server());
        assert!(!Role::Client.is_server());
    }
}
