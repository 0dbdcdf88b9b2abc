//! Terminator-delimited frame accumulation
//!
//! The CAT stream has no length fields or checksums: a frame is simply
//! every byte up to the next `;`. [`FrameBuffer`] is the one place that
//! scanning logic lives; the transaction engine and the simulator both
//! feed raw reads through it.

use crate::TERMINATOR;

/// Upper bound on buffered bytes before the oldest are dropped
///
/// A healthy radio never comes close; this guards against a wedged stream
/// spraying noise with no terminator in it.
const MAX_BUFFER_LEN: usize = 256;

/// Streaming frame scanner for `;`-terminated CAT traffic
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buffer: Vec<u8>,
}

impl FrameBuffer {
    /// Create an empty frame buffer
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
        }
    }

    /// Push raw bytes read from the channel
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);

        if self.buffer.len() > MAX_BUFFER_LEN {
            let excess = self.buffer.len() - MAX_BUFFER_LEN;
            tracing::warn!("frame buffer overflow, dropping {} stale bytes", excess);
            self.buffer.drain(..excess);
        }
    }

    /// Extract the next complete frame, without its terminator
    ///
    /// Returns `None` while no terminator has been seen; partial data stays
    /// buffered for the next read.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        let term_pos = self.buffer.iter().position(|&b| b == TERMINATOR)?;
        let mut frame: Vec<u8> = self.buffer.drain(..=term_pos).collect();
        frame.pop(); // strip terminator
        Some(frame)
    }

    /// Number of buffered bytes not yet part of a returned frame
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Discard everything buffered
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut buf = FrameBuffer::new();
        buf.push_bytes(b"FA014074000;");
        assert_eq!(buf.next_frame().unwrap(), b"FA014074000");
        assert!(buf.next_frame().is_none());
    }

    #[test]
    fn test_partial_then_complete() {
        let mut buf = FrameBuffer::new();
        buf.push_bytes(b"FA014");
        assert!(buf.next_frame().is_none());
        assert_eq!(buf.pending(), 5);

        buf.push_bytes(b"074000;");
        assert_eq!(buf.next_frame().unwrap(), b"FA014074000");
        assert_eq!(buf.pending(), 0);
    }

    #[test]
    fn test_multiple_frames_in_one_read() {
        let mut buf = FrameBuffer::new();
        buf.push_bytes(b"TX0;SM0042;MD0");
        assert_eq!(buf.next_frame().unwrap(), b"TX0");
        assert_eq!(buf.next_frame().unwrap(), b"SM0042");
        assert!(buf.next_frame().is_none());
        assert_eq!(buf.pending(), 3);
    }

    #[test]
    fn test_empty_frame() {
        let mut buf = FrameBuffer::new();
        buf.push_bytes(b";");
        assert_eq!(buf.next_frame().unwrap(), b"");
    }

    #[test]
    fn test_overflow_keeps_newest_bytes() {
        let mut buf = FrameBuffer::new();
        buf.push_bytes(&[b'x'; 300]);
        assert!(buf.pending() <= 256);

        buf.push_bytes(b"FA014074000;");
        // Junk has no terminator, so the first frame found is the junk run
        // up to the real frame's terminator; the scan still recovers.
        let frame = buf.next_frame().unwrap();
        assert!(frame.ends_with(b"FA014074000"));
    }

    #[test]
    fn test_clear() {
        let mut buf = FrameBuffer::new();
        buf.push_bytes(b"FA0140");
        buf.clear();
        buf.push_bytes(b"TX0;");
        assert_eq!(buf.next_frame().unwrap(), b"TX0");
    }
}
