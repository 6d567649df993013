//! Transport core: reconciles substrate connection events into the engine's
//! ordered connect/disconnect/receive contract.

use tether_substrate::{ChannelName, PeerId, Reliability, Substrate};
use tracing::{debug, trace, warn};
use web_time::Instant;

use crate::buffer::ScratchBuffer;
use crate::config::TransportConfig;
use crate::connection::{self, ConnectionId, ConnectionRef};
use crate::error::TransportError;
use crate::events::{
    ConnectFailedReason, DeliveryMode, DisconnectReason, Role, SessionState, TransportSink,
};
use crate::pool::ConnectionPool;
use crate::registry::PeerRegistry;

/// Initial scratch-buffer size; both buffers grow on demand and never shrink.
const INITIAL_SCRATCH: usize = 1024;

/// Fixed-capacity transport over a peer-to-peer messaging substrate.
///
/// Single-threaded and callback-driven: the host calls [`Transport::poll_events`]
/// once per simulation tick and routes the substrate's lifecycle callbacks into
/// [`Transport::handle_incoming_request`], [`Transport::handle_opened`] and
/// [`Transport::handle_closed`] on that same thread. Nothing here blocks;
/// `connect` only initiates a request, completion arrives through the handlers.
pub struct Transport<S, E> {
    substrate: S,
    sink: E,
    config: TransportConfig,
    state: SessionState,
    role: Option<Role>,
    registry: PeerRegistry,
    pool: ConnectionPool,
    /// Locked at the first connect attempt; immutable until shutdown.
    server_peer: Option<PeerId>,
    connect_deadline: Option<Instant>,
    send_scratch: ScratchBuffer,
    recv_scratch: ScratchBuffer,
}

impl<S: Substrate, E: TransportSink> Transport<S, E> {
    pub fn new(substrate: S, config: TransportConfig, sink: E) -> Self {
        Self {
            substrate,
            sink,
            config,
            state: SessionState::Uninitialized,
            role: None,
            registry: PeerRegistry::new(),
            pool: ConnectionPool::new(0),
            server_peer: None,
            connect_deadline: None,
            send_scratch: ScratchBuffer::with_capacity(INITIAL_SCRATCH),
            recv_scratch: ScratchBuffer::with_capacity(INITIAL_SCRATCH),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The configured override if valid, otherwise the substrate's identity.
    pub fn local_peer(&self) -> Option<PeerId> {
        self.config
            .local_peer_override
            .filter(PeerId::is_valid)
            .or_else(|| self.substrate.local_peer())
    }

    /// Largest payload one packet may carry on the substrate.
    pub fn mtu(&self) -> usize {
        self.substrate.max_packet_size()
    }

    pub fn connected_count(&self) -> usize {
        self.pool.active_len()
    }

    /// Validates the local identity, brings the substrate up and applies the
    /// relay policy. On failure the session stays `Uninitialized`; retrying is
    /// caller-driven and safe. Calling on an initialized session is a no-op.
    pub fn initialize(&mut self) -> Result<(), TransportError> {
        if matches!(
            self.state,
            SessionState::Initialized | SessionState::Running
        ) {
            return Ok(());
        }
        self.state = SessionState::Uninitialized;

        let identity = self
            .local_peer()
            .filter(PeerId::is_valid)
            .ok_or(TransportError::MissingIdentity)?;
        self.substrate.initialize()?;
        self.substrate.set_relay_control(self.config.relay_control);

        self.registry.clear();
        self.server_peer = None;
        self.connect_deadline = None;
        self.state = SessionState::Initialized;
        debug!(identity = %identity, "transport initialized");
        Ok(())
    }

    /// Fixes the role for the session and pre-builds the slot pool: one slot
    /// for a client, `max_clients` for a server. Performs no I/O.
    pub fn run(&mut self, role: Role) -> Result<(), TransportError> {
        if self.state != SessionState::Initialized {
            return Err(TransportError::NotInitialized);
        }
        let capacity = match role {
            Role::Server => self.config.max_clients,
            Role::Client => 1,
        };
        self.pool = ConnectionPool::new(capacity);
        self.role = Some(role);
        self.state = SessionState::Running;
        debug!(%role, capacity, "transport running");
        Ok(())
    }

    fn is_server(&self) -> bool {
        matches!(self.role, Some(Role::Server))
    }

    /// Initiates an outbound connection to the peer encoded in `address`.
    ///
    /// A malformed or invalid address, or a synchronous substrate refusal,
    /// surfaces exactly one `on_connect_failed(Refused)` without retry. A
    /// valid target is locked in as the server peer; later calls cannot
    /// retarget the session. Completion is asynchronous via the handlers.
    pub fn connect(&mut self, address: &str) -> Result<(), TransportError> {
        if self.state != SessionState::Running {
            return Err(TransportError::NotRunning);
        }
        let parsed = match address.parse::<PeerId>() {
            Ok(peer) => peer,
            Err(err) => {
                warn!(%err, "connect target rejected");
                self.sink.on_connect_failed(ConnectFailedReason::Refused);
                return Ok(());
            }
        };
        let target = *self.server_peer.get_or_insert(parsed);

        if !self.substrate.open_connection(target, &self.config.channel) {
            warn!(peer = %target, "substrate refused to initiate connection");
            self.sink.on_connect_failed(ConnectFailedReason::Refused);
            return Ok(());
        }
        self.connect_deadline = Some(Instant::now() + self.config.connect_timeout);
        debug!(peer = %target, "connect initiated");
        Ok(())
    }

    /// Substrate callback: a remote peer asked to open a connection (open
    /// remotely, not yet locally). Decides accept/reject only; no connection
    /// record is created here.
    pub fn handle_incoming_request(&mut self, peer: PeerId, channel: &ChannelName) {
        if self.state != SessionState::Running {
            return;
        }
        if !self.is_server() || channel != &self.config.channel {
            trace!(peer = %peer, %channel, "rejecting connection request");
            self.substrate.close_connection(peer, channel, false);
            return;
        }
        if self.pool.is_exhausted() {
            trace!(peer = %peer, "admission refused, pool exhausted");
            self.substrate.close_connection(peer, channel, false);
            return;
        }
        self.substrate.open_connection(peer, channel);
    }

    /// Substrate callback: a connection is now open both locally and remotely.
    ///
    /// Binds a slot and raises `on_connected` exactly once per peer. The pool
    /// is re-checked here even though admission already checked it: between
    /// request and open another peer can take the last slot, so an exhausted
    /// pool at this point forcibly closes the connection with no notification.
    pub fn handle_opened(&mut self, peer: PeerId, channel: &ChannelName) {
        if self.state != SessionState::Running || channel != &self.config.channel {
            return;
        }
        if self.pool.get(&peer).is_some() {
            return;
        }

        let id = if self.is_server() {
            // Registered on first open, not at request time, so rejected or
            // abandoned requests never consume identifier space.
            self.registry.register(peer)
        } else {
            self.connect_deadline = None;
            ConnectionId::SERVER
        };

        let slot = match self.pool.acquire() {
            Ok(slot) => slot,
            Err(_) => {
                warn!(peer = %peer, "pool exhausted at open, closing connection");
                self.substrate.close_connection(peer, channel, true);
                return;
            }
        };
        let handle = self.pool.bind(slot, ConnectionRef { id, peer });
        debug!(%handle, "connection opened");
        self.sink.on_connected(handle);
    }

    /// Substrate callback: a fully opened connection has closed. A peer with
    /// no active slot (closed before fully opening, or already torn down) is
    /// a silent no-op.
    pub fn handle_closed(&mut self, peer: PeerId, channel: &ChannelName) {
        if channel != &self.config.channel {
            return;
        }
        let Some(handle) = self.pool.handle_for(&peer) else {
            return;
        };
        self.sink
            .on_disconnected(handle, DisconnectReason::Shutdown);
        self.pool.release(&peer);
        debug!(%handle, "connection closed");
    }

    /// Drains every currently queued inbound packet; never waits for more.
    ///
    /// Expected once per simulation tick. Also enforces the connect-timeout
    /// policy, since the substrate has no reject callback for an outbound
    /// connect the remote never answers.
    pub fn poll_events(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.check_connect_deadline();

        while let Some(packet) = self.substrate.try_receive_packet() {
            let Some(handle) = self.pool.handle_for(&packet.peer) else {
                // Benign race: the connection record is already gone.
                trace!(peer = %packet.peer, "dropping packet from unknown peer");
                continue;
            };
            let staged = self.recv_scratch.stage(&packet.payload);
            self.sink.on_receive(handle, staged);
        }
    }

    fn check_connect_deadline(&mut self) {
        let Some(deadline) = self.connect_deadline else {
            return;
        };
        if Instant::now() < deadline {
            return;
        }
        self.connect_deadline = None;

        let Some(peer) = self.server_peer else {
            return;
        };
        if self.pool.get(&peer).is_some() {
            return;
        }
        warn!(peer = %peer, "outbound connect timed out");
        self.substrate
            .close_connection(peer, &self.config.channel, true);
        self.sink.on_connect_failed(ConnectFailedReason::Timeout);
    }

    /// Sends on the engine's default path (always unreliable/unordered).
    pub fn send(&mut self, conn: ConnectionRef, payload: &[u8]) -> Result<(), TransportError> {
        self.send_with(conn, payload, Reliability::UnreliableUnordered)
    }

    /// Sends engine data with the requested delivery guarantee.
    pub fn send_data(
        &mut self,
        conn: ConnectionRef,
        payload: &[u8],
        mode: DeliveryMode,
    ) -> Result<(), TransportError> {
        self.send_with(conn, payload, mode.reliability())
    }

    fn send_with(
        &mut self,
        conn: ConnectionRef,
        payload: &[u8],
        reliability: Reliability,
    ) -> Result<(), TransportError> {
        if self.state != SessionState::Running {
            return Err(TransportError::NotRunning);
        }
        let handle = self
            .pool
            .handle_for(&conn.peer)
            .ok_or(TransportError::UnknownConnection(conn.id))?;
        connection::dispatch(
            &mut self.substrate,
            &mut self.send_scratch,
            &self.config.channel,
            handle.peer,
            payload,
            reliability,
        );
        Ok(())
    }

    /// Closes the connection behind `conn`. A client always closes its sole
    /// connection to the server, regardless of the handle passed. Local state
    /// is reclaimed when the substrate delivers the closed callback.
    pub fn disconnect(&mut self, conn: ConnectionRef) {
        if self.state != SessionState::Running {
            return;
        }
        let peer = if self.is_server() {
            Some(conn.peer)
        } else {
            self.server_peer
        };
        if let Some(peer) = peer {
            self.substrate
                .close_connection(peer, &self.config.channel, true);
        }
    }

    /// Idempotent session teardown: shuts the substrate down and clears the
    /// registry, pool, and locked server peer. The instance can be
    /// re-initialized afterwards.
    pub fn shutdown(&mut self) {
        if matches!(
            self.state,
            SessionState::Uninitialized | SessionState::ShutDown
        ) {
            return;
        }
        self.substrate.shutdown();
        self.registry.clear();
        self.pool.reset();
        self.server_peer = None;
        self.connect_deadline = None;
        self.role = None;
        self.state = SessionState::ShutDown;
        debug!("transport shut down");
    }

    /// Resolves a connection identifier to its peer. On a client every
    /// identifier resolves to the server peer; a client has no registry.
    pub fn peer_for(&self, conn: ConnectionId) -> Option<PeerId> {
        if self.is_server() {
            self.registry.peer_for(conn)
        } else {
            self.server_peer
        }
    }

    /// Resolves a peer to its connection identifier. On a client the server
    /// is always [`ConnectionId::SERVER`].
    pub fn connection_for(&self, peer: &PeerId) -> Option<ConnectionId> {
        if self.is_server() {
            self.registry.connection_for(peer)
        } else {
            Some(ConnectionId::SERVER)
        }
    }
}
