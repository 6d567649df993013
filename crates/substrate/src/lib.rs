//! Substrate boundary for the tether transport.
//!
//! The transport core never talks to a concrete peer-to-peer SDK; it is
//! written against the [`Substrate`] contract defined here. A substrate owns
//! logical connections between peers, queues packets in both directions, and
//! reports connection lifecycle changes to whoever drives it.

pub mod packet;
pub mod peer;
pub mod traits;

pub use packet::{ChannelName, InboundPacket, RelayControl, Reliability};
pub use peer::{InvalidPeerId, PeerId};
pub use traits::{Substrate, SubstrateError};
