//! Duplex-stream pump for the virtual radio
//!
//! Spawns a task that owns the device end of a `tokio::io::duplex` pair,
//! scanning received bytes for terminated frames and writing the radio's
//! replies back. The host end is handed to the caller and plugs into a
//! `CatSession` exactly where a serial stream would.

use ft991_protocol::FrameBuffer;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tracing::debug;

use crate::radio::SimRadio;

/// Spawn a pump task for `radio`, returning the host-side stream
pub fn spawn(radio: SimRadio) -> DuplexStream {
    let (host, device) = tokio::io::duplex(256);
    tokio::spawn(run(radio, device));
    host
}

/// Pump loop: read, frame, reply. Ends when the host side closes.
pub async fn run(radio: SimRadio, mut device: DuplexStream) {
    let mut frames = FrameBuffer::new();
    let mut buf = [0u8; 256];

    loop {
        match device.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                frames.push_bytes(&buf[..n]);
                while let Some(frame) = frames.next_frame() {
                    if let Some(reply) = radio.handle_frame(&frame) {
                        if device.write_all(&reply).await.is_err() {
                            return;
                        }
                    }
                }
            }
            Err(e) => {
                debug!("sim pump read error: {}", e);
                break;
            }
        }
    }
    debug!("sim pump ended");
}
