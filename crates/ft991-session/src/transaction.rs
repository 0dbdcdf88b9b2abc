//! CAT transaction engine
//!
//! One request/response cycle at a time over an exclusively-owned stream.
//! Each transaction walks the same sequence: wait out the minimum
//! inter-command spacing, write the terminated command bytes, then (for
//! queries) accumulate reads until a terminator arrives or the reply
//! deadline elapses. A deadline miss is [`CatError::Timeout`], never a
//! parsed zero.
//!
//! The wire protocol has no transaction IDs, so interleaving is undefined
//! behavior on the real device; exclusivity here comes from `&mut self`.
//! Set commands are unacknowledged by the radio and skip the read phase
//! entirely. Any bytes still buffered from an abandoned exchange are
//! dropped before the next send, and query replies are matched against
//! the expected echo prefix so a stale frame cannot masquerade as the
//! answer.

use std::time::Instant;

use ft991_protocol::{parse_reply, CatCommand, CatReply, FrameBuffer};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::config::SessionConfig;
use crate::error::CatError;

/// Drives single CAT transactions over an owned I/O stream
pub struct TransactionEngine<T> {
    io: T,
    frames: FrameBuffer,
    read_buf: [u8; 256],
    last_send: Option<Instant>,
    min_interval: std::time::Duration,
    reply_timeout: std::time::Duration,
}

impl<T> TransactionEngine<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Create an engine owning `io`, with timing from `config`
    pub fn new(io: T, config: &SessionConfig) -> Self {
        Self {
            io,
            frames: FrameBuffer::new(),
            read_buf: [0u8; 256],
            last_send: None,
            min_interval: config.min_command_interval(),
            reply_timeout: config.reply_timeout(),
        }
    }

    /// Run a full query transaction and parse the reply
    pub async fn query(&mut self, cmd: &CatCommand) -> Result<CatReply, CatError> {
        let prefix = cmd
            .reply_prefix()
            .ok_or_else(|| CatError::UnexpectedReply(format!("{} is not a query", cmd.mnemonic())))?;

        self.dispatch(cmd).await?;

        let deadline = Instant::now() + self.reply_timeout;
        loop {
            let frame = self.read_frame(deadline).await?;
            if frame.starts_with(prefix.as_bytes()) {
                trace!("RX {:?}", String::from_utf8_lossy(&frame));
                return Ok(parse_reply(cmd, &frame)?);
            }
            // A leftover frame from an abandoned exchange; keep waiting
            // for the echo of this query within the same deadline.
            debug!("discarding stale frame {:?}", String::from_utf8_lossy(&frame));
        }
    }

    /// Send a set command; the radio does not acknowledge these
    pub async fn send(&mut self, cmd: &CatCommand) -> Result<(), CatError> {
        self.dispatch(cmd).await
    }

    /// Rate-wait, then write the fully-terminated command bytes
    async fn dispatch(&mut self, cmd: &CatCommand) -> Result<(), CatError> {
        self.rate_wait().await;

        // Anything still buffered belongs to an abandoned transaction
        if self.frames.pending() > 0 {
            debug!("dropping {} stale buffered bytes", self.frames.pending());
        }
        self.frames.clear();

        let bytes = cmd.encode();
        trace!("TX {:?}", String::from_utf8_lossy(&bytes));
        self.io.write_all(&bytes).await?;
        self.io.flush().await?;
        self.last_send = Some(Instant::now());
        Ok(())
    }

    /// Sleep out the remainder of the minimum inter-command interval
    async fn rate_wait(&mut self) {
        if let Some(last) = self.last_send {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
    }

    /// Accumulate reads until a terminated frame or the deadline
    async fn read_frame(&mut self, deadline: Instant) -> Result<Vec<u8>, CatError> {
        loop {
            if let Some(frame) = self.frames.next_frame() {
                return Ok(frame);
            }

            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(d) if !d.is_zero() => d,
                _ => return Err(CatError::Timeout(self.reply_timeout.as_millis() as u64)),
            };

            match tokio::time::timeout(remaining, self.io.read(&mut self.read_buf)).await {
                Ok(Ok(0)) => {
                    return Err(CatError::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "serial channel closed",
                    )))
                }
                Ok(Ok(n)) => self.frames.push_bytes(&self.read_buf[..n]),
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
                Ok(Err(e)) => return Err(CatError::Io(e)),
                Err(_) => return Err(CatError::Timeout(self.reply_timeout.as_millis() as u64)),
            }
        }
    }
}
