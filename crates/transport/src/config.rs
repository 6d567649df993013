//! Transport configuration.

use serde::{Deserialize, Serialize};
use tether_substrate::{ChannelName, PeerId, RelayControl};
use web_time::Duration;

/// Default number of server connection slots.
pub const DEFAULT_MAX_CLIENTS: usize = 32;

/// Default bound on how long an outbound connect may stay unanswered.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Connection-slot capacity when running as a server. A client always
    /// runs with a single slot.
    pub max_clients: usize,
    /// Logical channel all transport traffic is scoped to; events naming any
    /// other channel are ignored or rejected.
    pub channel: ChannelName,
    /// Relay routing policy applied at initialization.
    pub relay_control: RelayControl,
    /// How long an outbound connect may stay unanswered before a single
    /// connect-failed notification is raised.
    pub connect_timeout: Duration,
    /// Overrides the substrate's local identity, for running several clients
    /// on one host.
    pub local_peer_override: Option<PeerId>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_clients: DEFAULT_MAX_CLIENTS,
            channel: ChannelName::default(),
            relay_control: RelayControl::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            local_peer_override: None,
        }
    }
}
