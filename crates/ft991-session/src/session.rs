//! Radio session: connection lifecycle and the typed operation set
//!
//! A [`CatSession`] is either disconnected or holds a transaction engine.
//! Every operation checks that state up front and fails with
//! [`CatError::NotConnected`] instead of letting a null-channel error
//! surface from deep inside the I/O path.
//!
//! Exactly one transaction is in flight at a time: every operation takes
//! `&mut self`, so concurrent callers serialize behind whatever owns the
//! session (a mutex, an actor task).

use ft991_protocol::{
    bands, CatCommand, CatReply, DecodedMode, InfoStatus, OperatingMode,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_serial::SerialStream;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::CatError;
use crate::transaction::TransactionEngine;
use crate::transport;

/// A control session with one FT-991A
pub struct CatSession<T> {
    config: SessionConfig,
    engine: Option<TransactionEngine<T>>,
}

impl CatSession<SerialStream> {
    /// Create a disconnected session for a serial port
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            engine: None,
        }
    }

    /// Open the serial channel and probe the radio
    ///
    /// Returns `Ok(false)` when the port opened but the radio did not
    /// answer the liveness probe, a normal outcome during setup (wrong
    /// baud menu setting, radio powered off) and distinct from a failure
    /// to open the port at all. The port stays open either way so a later
    /// [`disconnect`](Self::disconnect) is safe.
    pub async fn connect(&mut self) -> Result<bool, CatError> {
        if self.engine.is_some() {
            return self.probe().await;
        }

        let stream = transport::open_serial(&self.config)?;
        self.engine = Some(TransactionEngine::new(stream, &self.config));
        self.probe().await
    }
}

impl<T> CatSession<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a session over an already-open stream (virtual radios, tests)
    pub fn with_io(io: T, config: SessionConfig) -> Self {
        let engine = TransactionEngine::new(io, &config);
        Self {
            config,
            engine: Some(engine),
        }
    }

    /// Whether the channel is open (says nothing about radio liveness)
    pub fn is_connected(&self) -> bool {
        self.engine.is_some()
    }

    /// The configuration this session was built with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Liveness probe: one VFO-A frequency read
    pub async fn probe(&mut self) -> Result<bool, CatError> {
        match self.get_frequency_a().await {
            Ok(hz) => {
                info!("radio answered probe, VFO-A {:.6} MHz", hz as f64 / 1e6);
                Ok(true)
            }
            Err(CatError::Timeout(_)) => {
                warn!("port open but radio silent (check power and baud menu 031)");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Release the channel, de-asserting transmit first
    ///
    /// The PTT-off attempt is best effort: its failure is logged and
    /// swallowed so disconnect always completes. Idempotent.
    pub async fn disconnect(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.send(&CatCommand::PttOff).await {
                warn!("PTT de-assert on disconnect failed: {}", e);
            }
            info!("disconnected");
        }
        // Dropping the engine closes the stream
        self.engine = None;
    }

    fn engine(&mut self) -> Result<&mut TransactionEngine<T>, CatError> {
        self.engine.as_mut().ok_or(CatError::NotConnected)
    }

    // ── Frequency ───────────────────────────────────────────────

    /// VFO-A frequency in Hz
    pub async fn get_frequency_a(&mut self) -> Result<u64, CatError> {
        match self.engine()?.query(&CatCommand::FrequencyA).await? {
            CatReply::Frequency(hz) => Ok(hz),
            other => Err(unexpected(other)),
        }
    }

    /// VFO-B frequency in Hz
    pub async fn get_frequency_b(&mut self) -> Result<u64, CatError> {
        match self.engine()?.query(&CatCommand::FrequencyB).await? {
            CatReply::Frequency(hz) => Ok(hz),
            other => Err(unexpected(other)),
        }
    }

    /// Tune VFO-A; out-of-range frequencies are rejected before any bytes go out
    pub async fn set_frequency_a(&mut self, hz: u64) -> Result<(), CatError> {
        let cmd = CatCommand::set_frequency_a(hz)?;
        self.engine()?.send(&cmd).await
    }

    /// Tune VFO-B
    pub async fn set_frequency_b(&mut self, hz: u64) -> Result<(), CatError> {
        let cmd = CatCommand::set_frequency_b(hz)?;
        self.engine()?.send(&cmd).await
    }

    // ── Mode ────────────────────────────────────────────────────

    /// Current operating mode; an unrecognized wire code is reported, not an error
    pub async fn get_mode(&mut self) -> Result<DecodedMode, CatError> {
        match self.engine()?.query(&CatCommand::Mode).await? {
            CatReply::Mode(mode) => Ok(mode),
            other => Err(unexpected(other)),
        }
    }

    /// Set the operating mode
    pub async fn set_mode(&mut self, mode: OperatingMode) -> Result<(), CatError> {
        self.engine()?.send(&CatCommand::SetMode(mode)).await
    }

    // ── Transmit control ────────────────────────────────────────

    /// Key the transmitter. CAUTION: emits RF.
    ///
    /// Callers must obtain operator confirmation out of band before
    /// invoking this; the session only makes the hazard unmistakable.
    pub async fn ptt_on(&mut self) -> Result<(), CatError> {
        warn!("PTT ON: keying transmitter");
        self.engine()?.send(&CatCommand::PttOn).await
    }

    /// Unkey the transmitter
    pub async fn ptt_off(&mut self) -> Result<(), CatError> {
        self.engine()?.send(&CatCommand::PttOff).await
    }

    /// Whether the radio is currently transmitting
    pub async fn is_transmitting(&mut self) -> Result<bool, CatError> {
        match self.engine()?.query(&CatCommand::TransmitState).await? {
            CatReply::Transmitting(tx) => Ok(tx),
            other => Err(unexpected(other)),
        }
    }

    // ── Power & meters ──────────────────────────────────────────

    /// RF power output setting in watts
    pub async fn get_power_level(&mut self) -> Result<u8, CatError> {
        match self.engine()?.query(&CatCommand::PowerLevel).await? {
            CatReply::PowerLevel(watts) => Ok(watts),
            other => Err(unexpected(other)),
        }
    }

    /// Set RF power output, clamped to 5–100 W; returns the value sent
    pub async fn set_power_level(&mut self, watts: u8) -> Result<u8, CatError> {
        let cmd = CatCommand::set_power_level(watts);
        let sent = match cmd {
            CatCommand::SetPowerLevel(w) => w,
            _ => watts,
        };
        if sent != watts {
            info!("power request {} W clamped to {} W", watts, sent);
        }
        self.engine()?.send(&cmd).await?;
        Ok(sent)
    }

    /// S-meter reading, 0–255
    pub async fn get_s_meter(&mut self) -> Result<u16, CatError> {
        self.meter(CatCommand::SMeter).await
    }

    /// Power output meter reading, 0–255
    pub async fn get_power_meter(&mut self) -> Result<u16, CatError> {
        self.meter(CatCommand::PowerMeter).await
    }

    /// SWR meter reading, 0–255
    pub async fn get_swr_meter(&mut self) -> Result<u16, CatError> {
        self.meter(CatCommand::SwrMeter).await
    }

    async fn meter(&mut self, cmd: CatCommand) -> Result<u16, CatError> {
        match self.engine()?.query(&cmd).await? {
            CatReply::Meter(raw) => Ok(raw),
            other => Err(unexpected(other)),
        }
    }

    // ── VFO ─────────────────────────────────────────────────────

    /// Swap VFO-A and VFO-B
    pub async fn swap_vfo(&mut self) -> Result<(), CatError> {
        self.engine()?.send(&CatCommand::SwapVfo).await
    }

    /// Copy VFO-A to VFO-B
    pub async fn copy_vfo_a_to_b(&mut self) -> Result<(), CatError> {
        self.engine()?.send(&CatCommand::CopyAToB).await
    }

    // ── Status & identification ─────────────────────────────────

    /// Composite status block from the `IF` command
    pub async fn get_info(&mut self) -> Result<InfoStatus, CatError> {
        match self.engine()?.query(&CatCommand::Info).await? {
            CatReply::Info(info) => Ok(info),
            other => Err(unexpected(other)),
        }
    }

    /// Squelch open flag (signal present), from the composite status block
    pub async fn get_squelch_status(&mut self) -> Result<bool, CatError> {
        Ok(self.get_info().await?.squelch_open)
    }

    /// Model identification body (`0670` for the FT-991A)
    pub async fn get_id(&mut self) -> Result<String, CatError> {
        match self.engine()?.query(&CatCommand::Id).await? {
            CatReply::Id(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    /// Send a raw CAT command and return the raw reply frame (diagnostics)
    pub async fn raw(&mut self, command: &str) -> Result<String, CatError> {
        let cmd = CatCommand::Raw(command.to_string());
        match self.engine()?.query(&cmd).await? {
            CatReply::Raw(text) => Ok(text),
            other => Err(unexpected(other)),
        }
    }

    // ── Convenience ─────────────────────────────────────────────

    /// Tune to a band's FT8 dial frequency in DATA-USB; returns the dial Hz
    pub async fn tune_ft8(&mut self, band: &str) -> Result<u64, CatError> {
        self.tune_digital("FT8", bands::ft8_frequency(band), band).await
    }

    /// Tune to a band's FT4 dial frequency in DATA-USB
    pub async fn tune_ft4(&mut self, band: &str) -> Result<u64, CatError> {
        self.tune_digital("FT4", bands::ft4_frequency(band), band).await
    }

    /// Tune to a band's JS8Call dial frequency in DATA-USB
    pub async fn tune_js8(&mut self, band: &str) -> Result<u64, CatError> {
        self.tune_digital("JS8", bands::js8_frequency(band), band).await
    }

    async fn tune_digital(
        &mut self,
        label: &str,
        dial: Option<u64>,
        band: &str,
    ) -> Result<u64, CatError> {
        let hz = dial.ok_or_else(|| CatError::UnknownBand(band.to_string()))?;
        self.set_frequency_a(hz).await?;
        self.set_mode(OperatingMode::DataUsb).await?;
        info!(
            "tuned {} on {}: {:.6} MHz (DATA-USB)",
            label,
            band,
            hz as f64 / 1e6
        );
        Ok(hz)
    }
}

fn unexpected(reply: CatReply) -> CatError {
    CatError::UnexpectedReply(format!("{:?}", reply))
}
