//! Channel, reliability, and packet types shared across the substrate boundary.

use core::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::peer::PeerId;

/// Channel name every transport-owned connection and packet is scoped to.
pub const DEFAULT_CHANNEL: &str = "/tether/p2p/1.0.0";

/// Name of a logical channel: a named sub-socket within a peer-to-peer
/// connection, used to scope which requests and packets belong to a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChannelName {
    fn default() -> Self {
        Self(DEFAULT_CHANNEL.to_owned())
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery guarantee for an outbound packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Reliability {
    UnreliableUnordered,
    ReliableUnordered,
    ReliableOrdered,
}

/// Relay routing policy: whether traffic may be routed through an intermediary
/// when no direct path between peers is available. Applied once at substrate
/// initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
pub enum RelayControl {
    NoRelays,
    #[default]
    AllowRelays,
    ForceRelays,
}

/// A packet pulled from the substrate's inbound queue.
#[derive(Debug, Clone)]
pub struct InboundPacket {
    pub peer: PeerId,
    pub channel_index: u8,
    pub payload: Bytes,
}
