//! Band activity scanning
//!
//! Steps a session's VFO-A across a frequency range, sampling the
//! S-meter at each stop. The radio's original frequency and mode are
//! saved before the sweep and restored afterward, including on error.
//! Sweeps are slow by construction: every step costs at least one
//! command interval plus the dwell time.

use std::time::Duration;

use ft991_protocol::bands::HF_VOICE_BANDS;
use ft991_protocol::{DecodedMode, OperatingMode};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use crate::error::CatError;
use crate::session::CatSession;

/// S-meter units per S-unit on the 0-255 raw scale
const RAW_PER_S_UNIT: u16 = 28;

/// One S-meter sample from a sweep
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScanPoint {
    pub frequency_hz: u64,
    pub s_meter: u16,
}

/// A sweep sample whose signal strength cleared the activity threshold
#[derive(Debug, Clone, Serialize)]
pub struct ActivityHit {
    pub band: &'static str,
    pub frequency_hz: u64,
    pub s_meter: u16,
    pub s_units: u8,
}

/// Sweeps a borrowed session across frequency ranges
pub struct BandScanner<'a, T> {
    session: &'a mut CatSession<T>,
}

impl<'a, T> BandScanner<'a, T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(session: &'a mut CatSession<T>) -> Self {
        Self { session }
    }

    /// Sweep `start_hz..=end_hz` in `step_hz` increments, dwelling at
    /// each stop before sampling the S-meter
    ///
    /// VFO-A frequency and mode are restored when the sweep finishes or
    /// fails partway.
    pub async fn scan_band(
        &mut self,
        start_hz: u64,
        end_hz: u64,
        step_hz: u64,
        dwell: Duration,
    ) -> Result<Vec<ScanPoint>, CatError> {
        let saved_freq = self.session.get_frequency_a().await?;
        let saved_mode = self.session.get_mode().await?;

        let result = self.sweep(start_hz, end_hz, step_hz, dwell).await;
        self.restore(saved_freq, saved_mode).await?;
        result
    }

    async fn sweep(
        &mut self,
        start_hz: u64,
        end_hz: u64,
        step_hz: u64,
        dwell: Duration,
    ) -> Result<Vec<ScanPoint>, CatError> {
        let step = step_hz.max(1);
        let mut points = Vec::new();
        let mut hz = start_hz;
        info!(
            "scanning {:.6}-{:.6} MHz in {} Hz steps",
            start_hz as f64 / 1e6,
            end_hz as f64 / 1e6,
            step
        );

        while hz <= end_hz {
            self.session.set_frequency_a(hz).await?;
            tokio::time::sleep(dwell).await;
            let s_meter = self.session.get_s_meter().await?;
            debug!("{} Hz: S-meter {}", hz, s_meter);
            points.push(ScanPoint {
                frequency_hz: hz,
                s_meter,
            });
            hz += step;
        }

        Ok(points)
    }

    async fn restore(&mut self, freq_hz: u64, mode: DecodedMode) -> Result<(), CatError> {
        self.session.set_frequency_a(freq_hz).await?;
        if let Some(mode) = mode.known() {
            self.session.set_mode(mode).await?;
        }
        Ok(())
    }

    /// Sweep the HF voice band segments and report stops whose signal
    /// strength reaches `threshold` (raw S-meter units)
    ///
    /// The pre-sweep frequency and mode are saved before any retuning
    /// and restored once at the end, so the operator gets their radio
    /// back exactly as it was.
    pub async fn find_activity(
        &mut self,
        threshold: u16,
        dwell: Duration,
    ) -> Result<Vec<ActivityHit>, CatError> {
        let saved_freq = self.session.get_frequency_a().await?;
        let saved_mode = self.session.get_mode().await?;

        let result = self.activity_sweep(threshold, dwell).await;
        self.restore(saved_freq, saved_mode).await?;
        result
    }

    async fn activity_sweep(
        &mut self,
        threshold: u16,
        dwell: Duration,
    ) -> Result<Vec<ActivityHit>, CatError> {
        let mut hits = Vec::new();

        for &(band, start_hz, end_hz) in HF_VOICE_BANDS {
            // Cap the step so narrow segments still get a useful number
            // of samples.
            let step = ((end_hz - start_hz) / 20).clamp(1, 25_000);
            let mode = if start_hz < 10_000_000 {
                OperatingMode::Lsb
            } else {
                OperatingMode::Usb
            };
            self.session.set_mode(mode).await?;

            for point in self.sweep(start_hz, end_hz, step, dwell).await? {
                if point.s_meter >= threshold {
                    hits.push(ActivityHit {
                        band,
                        frequency_hz: point.frequency_hz,
                        s_meter: point.s_meter,
                        s_units: s_units(point.s_meter),
                    });
                }
            }
        }

        info!("found {} active frequencies", hits.len());
        Ok(hits)
    }
}

/// Approximate S-units from a raw 0-255 S-meter reading, capped at S9
pub fn s_units(raw: u16) -> u8 {
    ((raw / RAW_PER_S_UNIT) as u8).min(9)
}
