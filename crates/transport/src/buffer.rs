//! Grow-only scratch buffers for packet staging.

/// Reusable byte buffer shared by every packet on one path (send or receive).
///
/// Staging copies the payload in so the substrate or engine never borrows the
/// caller's buffer. When a payload exceeds the current backing storage, the
/// storage is replaced with one of exactly that size; it never shrinks, so a
/// steady-state tick performs no allocation.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
}

impl ScratchBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
        }
    }

    /// Copies `payload` in and returns the staged view of it.
    pub fn stage(&mut self, payload: &[u8]) -> &[u8] {
        if self.buf.len() < payload.len() {
            self.buf = vec![0; payload.len()];
        }
        let staged = &mut self.buf[..payload.len()];
        staged.copy_from_slice(payload);
        staged
    }

    /// Size of the backing storage (not of the last staged payload).
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_copies_payload() {
        let mut scratch = ScratchBuffer::with_capacity(8);
        assert_eq!(scratch.stage(b"hello"), b"hello");
        assert_eq!(scratch.capacity(), 8);
    }

    #[test]
    fn test_grows_to_payload_size() {
        let mut scratch = ScratchBuffer::with_capacity(4);
        let payload = vec![0xA5u8; 100];
        assert_eq!(scratch.stage(&payload), payload.as_slice());
        assert_eq!(scratch.capacity(), 100);
    }

    #[test]
    fn test_never_shrinks() {
        let mut scratch = ScratchBuffer::with_capacity(4);
        scratch.stage(&[1u8; 64]);
        assert_eq!(scratch.capacity(), 64);
        assert_eq!(scratch.stage(&[2u8; 3]), &[2u8; 3]);
        assert_eq!(scratch.capacity(), 64);
    }
}
