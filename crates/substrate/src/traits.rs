//! The messaging-substrate contract consumed by the transport core.

use crate::packet::{ChannelName, InboundPacket, RelayControl, Reliability};
use crate::peer::PeerId;

/// Error surfaced by a substrate implementation.
#[derive(Debug, thiserror::Error)]
pub enum SubstrateError {
    #[error("substrate failed to initialize: {0}")]
    Init(String),
    #[error("substrate session is unavailable: {0}")]
    Unavailable(String),
}

/// A peer-to-peer messaging substrate.
///
/// The substrate owns logical connections (per peer, per channel) and packet
/// queues in both directions. The transport drives it from a single thread and
/// expects connection lifecycle changes to be routed back into the transport's
/// `handle_*` methods on that same thread, so every method takes `&mut self`
/// and none of them may block.
pub trait Substrate {
    /// Brings the substrate session up. Safe to retry after a failure.
    fn initialize(&mut self) -> Result<(), SubstrateError>;

    /// Tears the substrate session down, dropping all logical connections.
    fn shutdown(&mut self);

    /// The local participant's identity, if a session context exists.
    fn local_peer(&self) -> Option<PeerId>;

    /// Applies the relay routing policy for subsequent connections.
    fn set_relay_control(&mut self, control: RelayControl);

    /// Initiates a logical connection to `peer` on `channel`, or accepts a
    /// pending incoming request for that pair. Returns false if the request
    /// could not even be initiated.
    fn open_connection(&mut self, peer: PeerId, channel: &ChannelName) -> bool;

    /// Tears down (or rejects) the logical connection to `peer` on `channel`.
    /// `immediate` skips flushing queued outbound packets.
    fn close_connection(&mut self, peer: PeerId, channel: &ChannelName, immediate: bool);

    /// Queues one outbound packet.
    fn send_packet(
        &mut self,
        peer: PeerId,
        channel: &ChannelName,
        payload: &[u8],
        channel_index: u8,
        allow_delayed: bool,
        reliability: Reliability,
    );

    /// Pops the next queued inbound packet, if any. Never waits.
    fn try_receive_packet(&mut self) -> Option<InboundPacket>;

    /// Largest payload a single packet may carry.
    fn max_packet_size(&self) -> usize;
}
