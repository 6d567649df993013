//! Bidirectional peer ↔ connection identifier registry (server role only).

use std::collections::HashMap;

use tether_substrate::PeerId;
use tracing::debug;

use crate::connection::ConnectionId;

/// Bidirectional `PeerId` ↔ `ConnectionId` mapping.
///
/// Identifiers are assigned monotonically starting at 1 ([`ConnectionId::SERVER`]
/// is 0) and are never reused: an entry persists after its peer disconnects, so
/// a reconnecting peer resolves to the same identifier. Entries only go away
/// with [`PeerRegistry::clear`] at session shutdown.
#[derive(Debug)]
pub struct PeerRegistry {
    next_id: u64,
    by_connection: HashMap<ConnectionId, PeerId>,
    by_peer: HashMap<PeerId, ConnectionId>,
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            by_connection: HashMap::new(),
            by_peer: HashMap::new(),
        }
    }

    /// Registers `peer`, returning its existing identifier if already known.
    pub fn register(&mut self, peer: PeerId) -> ConnectionId {
        if let Some(id) = self.by_peer.get(&peer) {
            return *id;
        }
        let id = ConnectionId::new(self.next_id);
        self.next_id += 1;
        self.by_connection.insert(id, peer);
        self.by_peer.insert(peer, id);
        debug!(peer = %peer, conn = %id, "registered peer");
        id
    }

    pub fn peer_for(&self, id: ConnectionId) -> Option<PeerId> {
        self.by_connection.get(&id).copied()
    }

    pub fn connection_for(&self, peer: &PeerId) -> Option<ConnectionId> {
        self.by_peer.get(peer).copied()
    }

    pub fn contains_peer(&self, peer: &PeerId) -> bool {
        self.by_peer.contains_key(peer)
    }

    pub fn len(&self) -> usize {
        self.by_peer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_peer.is_empty()
    }

    /// Session shutdown only; identifier assignment restarts at 1.
    pub fn clear(&mut self) {
        self.by_connection.clear();
        self.by_peer.clear();
        self.next_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(n: u8) -> PeerId {
        PeerId::from_bytes([n; 16])
    }

    #[test]
    fn test_register_roundtrip() {
        let mut registry = PeerRegistry::new();
        let id = registry.register(peer(1));

        assert_eq!(registry.peer_for(id), Some(peer(1)));
        assert_eq!(registry.connection_for(&peer(1)), Some(id));
    }

    #[test]
    fn test_ids_are_monotonic_from_one() {
        let mut registry = PeerRegistry::new();
        assert_eq!(registry.register(peer(1)), ConnectionId::new(1));
        assert_eq!(registry.register(peer(2)), ConnectionId::new(2));
        assert_eq!(registry.register(peer(3)), ConnectionId::new(3));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = PeerRegistry::new();
        let first = registry.register(peer(1));
        let second = registry.register(peer(1));

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_zero_is_never_assigned() {
        let mut registry = PeerRegistry::new();
        for n in 1..=10 {
            assert_ne!(registry.register(peer(n)), ConnectionId::SERVER);
        }
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = PeerRegistry::new();
        assert_eq!(registry.peer_for(ConnectionId::new(1)), None);
        assert_eq!(registry.connection_for(&peer(1)), None);
    }

    #[test]
    fn test_clear_restarts_assignment() {
        let mut registry = PeerRegistry::new();
        registry.register(peer(1));
        registry.register(peer(2));

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.register(peer(3)), ConnectionId::new(1));
    }
}
