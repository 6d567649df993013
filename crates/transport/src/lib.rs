//! Fixed-capacity transport core over a peer-to-peer messaging substrate.
//!
//! Maps the substrate's unordered, callback-driven connection and packet
//! events onto the identifier-addressed model a replication engine consumes:
//! stable peer identifiers are translated to small locally-assigned connection
//! identifiers, connections draw from a pre-allocated slot pool with hard
//! admission control, and asymmetric open/close notifications are reconciled
//! into an ordered connected/disconnected/received contract.

pub mod buffer;
pub mod config;
pub mod connection;
pub mod error;
pub mod events;
pub mod pool;
pub mod registry;
pub mod transport;

pub use config::TransportConfig;
pub use connection::{ConnectionId, ConnectionRef};
pub use error::TransportError;
pub use events::{
    ConnectFailedReason, DeliveryMode, DisconnectReason, Role, SessionState, TransportSink,
};
pub use pool::{ConnectionPool, ConnectionSlot, PoolExhausted};
pub use registry::PeerRegistry;
pub use transport::Transport;
