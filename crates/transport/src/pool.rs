//! Fixed-capacity pool of reusable connection slots.

use std::collections::HashMap;

use tether_substrate::PeerId;

use crate::connection::ConnectionRef;

/// No free slot remains; the caller must reject the offending connection at
/// the substrate level. Capacity is a hard admission boundary, not a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("connection pool exhausted")]
pub struct PoolExhausted;

/// One reusable transport connection slot.
///
/// Built once at pool construction and only ever re-bound; never allocated or
/// freed per connection.
#[derive(Debug)]
pub struct ConnectionSlot {
    binding: Option<ConnectionRef>,
}

impl ConnectionSlot {
    fn parked() -> Self {
        Self { binding: None }
    }

    /// The bound handle; `None` while parked in the free list.
    pub fn handle(&self) -> Option<ConnectionRef> {
        self.binding
    }
}

/// Free list plus active map over a fixed set of pre-built slots.
///
/// The two structures are disjoint and together always hold exactly
/// `capacity` slots.
#[derive(Debug)]
pub struct ConnectionPool {
    free: Vec<ConnectionSlot>,
    active: HashMap<PeerId, ConnectionSlot>,
    capacity: usize,
}

impl ConnectionPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: (0..capacity).map(|_| ConnectionSlot::parked()).collect(),
            active: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Takes a slot off the free list.
    pub fn acquire(&mut self) -> Result<ConnectionSlot, PoolExhausted> {
        self.free.pop().ok_or(PoolExhausted)
    }

    /// Binds an acquired slot and files it in the active map.
    pub fn bind(&mut self, mut slot: ConnectionSlot, handle: ConnectionRef) -> ConnectionRef {
        debug_assert!(
            !self.active.contains_key(&handle.peer),
            "peer already holds a slot"
        );
        slot.binding = Some(handle);
        self.active.insert(handle.peer, slot);
        handle
    }

    /// Unbinds the peer's slot and parks it back on the free list. Returns the
    /// handle that was bound, or `None` if the peer held no slot.
    pub fn release(&mut self, peer: &PeerId) -> Option<ConnectionRef> {
        let mut slot = self.active.remove(peer)?;
        let handle = slot.binding.take();
        self.free.push(slot);
        handle
    }

    pub fn get(&self, peer: &PeerId) -> Option<&ConnectionSlot> {
        self.active.get(peer)
    }

    pub fn handle_for(&self, peer: &PeerId) -> Option<ConnectionRef> {
        self.active.get(peer).and_then(ConnectionSlot::handle)
    }

    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Returns every active slot to the free list.
    pub fn reset(&mut self) {
        for (_, mut slot) in self.active.drain() {
            slot.binding = None;
            self.free.push(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::connection::ConnectionId;

    use super::*;

    fn peer(n: u8) -> PeerId {
        PeerId::from_bytes([n; 16])
    }

    fn handle(n: u8) -> ConnectionRef {
        ConnectionRef {
            id: ConnectionId::new(n as u64),
            peer: peer(n),
        }
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool = ConnectionPool::new(2);

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_matches!(pool.acquire(), Err(PoolExhausted));

        pool.bind(a, handle(1));
        pool.bind(b, handle(2));
        assert_eq!(pool.active_len(), 2);
        assert!(pool.is_exhausted());
    }

    #[test]
    fn test_active_never_exceeds_capacity() {
        let mut pool = ConnectionPool::new(3);
        for n in 1..=10 {
            if let Ok(slot) = pool.acquire() {
                pool.bind(slot, handle(n));
            }
            assert!(pool.active_len() <= pool.capacity());
            assert_eq!(pool.active_len() + pool.free_len(), pool.capacity());
        }
        assert_eq!(pool.active_len(), 3);
    }

    #[test]
    fn test_release_returns_slot_to_free_list() {
        let mut pool = ConnectionPool::new(1);
        let slot = pool.acquire().unwrap();
        pool.bind(slot, handle(1));
        assert!(pool.is_exhausted());

        assert_eq!(pool.release(&peer(1)), Some(handle(1)));
        assert_eq!(pool.free_len(), 1);
        assert!(pool.handle_for(&peer(1)).is_none());

        // The reclaimed slot is usable for a different peer.
        let slot = pool.acquire().unwrap();
        pool.bind(slot, handle(2));
        assert_eq!(pool.handle_for(&peer(2)), Some(handle(2)));
    }

    #[test]
    fn test_release_unknown_peer_is_none() {
        let mut pool = ConnectionPool::new(1);
        assert_eq!(pool.release(&peer(9)), None);
        assert_eq!(pool.free_len(), 1);
    }

    #[test]
    fn test_reset_reclaims_all_slots() {
        let mut pool = ConnectionPool::new(2);
        for n in 1..=2 {
            let slot = pool.acquire().unwrap();
            pool.bind(slot, handle(n));
        }

        pool.reset();
        assert_eq!(pool.active_len(), 0);
        assert_eq!(pool.free_len(), 2);
    }
}
