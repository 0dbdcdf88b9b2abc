//! Composite status snapshot
//!
//! Bundles the common dashboard readings into one struct with one call.
//! Fields are gathered in a fixed order, each by its own transaction, so
//! a snapshot is not atomic; the radio may retune between sub-queries.
//! A field whose sub-query times out or parses badly is reported as
//! `None` rather than failing the whole snapshot, while channel-level
//! failures abort immediately.

use ft991_protocol::DecodedMode;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::error::CatError;
use crate::session::CatSession;

/// One point-in-time reading of the radio's operating state
#[derive(Debug, Clone, Serialize)]
pub struct RadioStatus {
    /// VFO-A frequency in Hz
    pub frequency_a: Option<u64>,
    /// VFO-B frequency in Hz
    pub frequency_b: Option<u64>,
    /// Operating mode (the wire code is kept even when unrecognized)
    pub mode: Option<DecodedMode>,
    /// Whether the transmitter is keyed
    pub tx_active: Option<bool>,
    /// Squelch open flag from the composite status block
    pub squelch_open: Option<bool>,
    /// S-meter reading, 0-255
    pub s_meter: Option<u16>,
    /// Configured RF power output in watts
    pub power_output: Option<u8>,
    /// SWR meter reading, 0-255
    pub swr: Option<u16>,
}

impl<T> CatSession<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Gather a full status snapshot
    ///
    /// Sub-queries run in a fixed order: frequencies, mode, transmit
    /// state, squelch, then meters. Expect the whole pass to take at
    /// least eight command intervals.
    pub async fn status(&mut self) -> Result<RadioStatus, CatError> {
        Ok(RadioStatus {
            frequency_a: field(self.get_frequency_a().await, "frequency_a")?,
            frequency_b: field(self.get_frequency_b().await, "frequency_b")?,
            mode: field(self.get_mode().await, "mode")?,
            tx_active: field(self.is_transmitting().await, "tx_active")?,
            squelch_open: field(self.get_squelch_status().await, "squelch_open")?,
            s_meter: field(self.get_s_meter().await, "s_meter")?,
            power_output: field(self.get_power_level().await, "power_output")?,
            swr: field(self.get_swr_meter().await, "swr")?,
        })
    }
}

/// Degrade a per-field failure to `None`; abort on channel failures
fn field<V>(result: Result<V, CatError>, name: &str) -> Result<Option<V>, CatError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e @ (CatError::Timeout(_) | CatError::Parse(_) | CatError::UnexpectedReply(_))) => {
            debug!("snapshot field {} unavailable: {}", name, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
