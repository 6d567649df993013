//! Connection identifiers, handles, and the per-peer send path.

use core::fmt;

use serde::{Deserialize, Serialize};
use tether_substrate::{ChannelName, PeerId, Reliability, Substrate};

use crate::buffer::ScratchBuffer;

/// Locally-assigned identifier the engine uses to address one connection
/// without seeing substrate-specific peer identifiers.
///
/// Unique among currently-known peers on a host. Server-side assignment is
/// monotonic starting at 1; 0 is reserved for [`ConnectionId::SERVER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// The server, as addressed from a client.
    pub const SERVER: Self = Self(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for one bound connection, carried in every transport notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionRef {
    pub id: ConnectionId,
    pub peer: PeerId,
}

impl fmt::Display for ConnectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.peer)
    }
}

/// Stages `payload` in the reusable send buffer and queues it on the
/// substrate, tagged with the bound peer and the transport channel.
pub(crate) fn dispatch<S: Substrate>(
    substrate: &mut S,
    scratch: &mut ScratchBuffer,
    channel: &ChannelName,
    peer: PeerId,
    payload: &[u8],
    reliability: Reliability,
) {
    let staged = scratch.stage(payload);
    substrate.send_packet(peer, channel, staged, 0, false, reliability);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_id_is_zero() {
        assert_eq!(ConnectionId::SERVER.raw(), 0);
        assert_eq!(ConnectionId::new(7).raw(), 7);
    }

    #[test]
    fn test_display() {
        let conn = ConnectionRef {
            id: ConnectionId::new(3),
            peer: PeerId::from_bytes([0x01; 16]),
        };
        let text = conn.to_string();
        assert!(text.starts_with("3@01"));
    }
}
