//! Virtual radio state machine
//!
//! Models the device side of the CAT exchange: queries are answered with
//! the echo-prefixed value frame, set commands are applied silently (the
//! FT-991A never acknowledges them), and unrecognized commands get the
//! radio's `?;` rejection frame.

use std::sync::{Arc, Mutex, MutexGuard};

use ft991_protocol::{OperatingMode, FT991A_ID, POWER_MAX_W, POWER_MIN_W};
use serde::{Deserialize, Serialize};

/// Initial state for a simulated radio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Initial VFO-A frequency in Hz
    pub frequency_a: u64,
    /// Initial VFO-B frequency in Hz
    pub frequency_b: u64,
    /// Initial operating mode
    pub mode: OperatingMode,
    /// Initial RF power setting in watts
    pub power_level: u8,
    /// S-meter reading the radio reports
    pub s_meter: u16,
    /// Squelch open flag
    pub squelch_open: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frequency_a: 14_250_000, // 20m
            frequency_b: 7_074_000,
            mode: OperatingMode::Usb,
            power_level: 100,
            s_meter: 0,
            squelch_open: false,
        }
    }
}

/// Mutable radio state, shared between the pump task and test code
#[derive(Debug)]
pub struct SimState {
    pub frequency_a: u64,
    pub frequency_b: u64,
    pub mode: OperatingMode,
    pub power_level: u8,
    pub ptt: bool,
    pub s_meter: u16,
    pub power_meter: u16,
    pub swr_meter: u16,
    pub squelch_open: bool,
    /// When set, the radio goes silent: frames are dropped unanswered
    pub muted: bool,
    /// Exact frames to drop unanswered while everything else still works
    pub muted_frames: Vec<String>,
    /// Every frame received, terminator stripped, in arrival order
    pub frames_seen: Vec<String>,
}

/// A simulated FT-991A
///
/// Cheaply cloneable; all clones share one state so a test can hold a
/// handle while the pump task owns another.
#[derive(Debug, Clone)]
pub struct SimRadio {
    state: Arc<Mutex<SimState>>,
}

impl SimRadio {
    /// Create a radio with the given initial state
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                frequency_a: config.frequency_a,
                frequency_b: config.frequency_b,
                mode: config.mode,
                power_level: config.power_level,
                ptt: false,
                s_meter: config.s_meter,
                power_meter: 0,
                swr_meter: 0,
                squelch_open: config.squelch_open,
                muted: false,
                muted_frames: Vec::new(),
                frames_seen: Vec::new(),
            })),
        }
    }

    /// Lock the shared state for inspection or adjustment
    pub fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().expect("sim state lock poisoned")
    }

    /// Silence the radio: subsequent frames are recorded but never answered
    pub fn set_muted(&self, muted: bool) {
        self.state().muted = muted;
    }

    /// Drop one specific frame unanswered (e.g. `"SM0"`) while the rest
    /// of the command table keeps working
    pub fn mute_frame(&self, frame: &str) {
        self.state().muted_frames.push(frame.to_string());
    }

    /// Process one received frame (terminator already stripped)
    ///
    /// Returns the fully-terminated reply bytes, or `None` when the command
    /// is a set (unacknowledged) or the radio is muted.
    pub fn handle_frame(&self, frame: &[u8]) -> Option<Vec<u8>> {
        let text = String::from_utf8_lossy(frame).to_string();
        let mut state = self.state();
        state.frames_seen.push(text.clone());

        if state.muted || state.muted_frames.iter().any(|f| f == &text) {
            tracing::debug!("sim muted, dropping {:?}", text);
            return None;
        }

        let reply = match text.as_str() {
            "FA" => Some(format!("FA{:09};", state.frequency_a)),
            "FB" => Some(format!("FB{:09};", state.frequency_b)),
            "MD0" => Some(format!("MD0{};", state.mode.wire_code())),
            "PC" => Some(format!("PC{:03};", state.power_level)),
            "SM0" => Some(format!("SM0{:03};", state.s_meter)),
            "RM1" => Some(format!("RM1{:03};", state.power_meter)),
            "RM2" => Some(format!("RM2{:03};", state.swr_meter)),
            "TX" => Some(format!("TX{};", if state.ptt { 1 } else { 0 })),
            "TX0" => {
                state.ptt = false;
                None
            }
            "TX1" => {
                state.ptt = true;
                None
            }
            "SV" => {
                // Reborrow so both field borrows go through one deref
                let state = &mut *state;
                std::mem::swap(&mut state.frequency_a, &mut state.frequency_b);
                None
            }
            "AB" => {
                state.frequency_b = state.frequency_a;
                None
            }
            "IF" => Some(info_frame(&state)),
            "ID" => Some(format!("ID{};", FT991A_ID)),
            other => self.handle_set(&mut state, other),
        };

        reply.map(String::into_bytes)
    }

    /// Parameterized set commands (and anything unrecognized)
    fn handle_set(&self, state: &mut SimState, text: &str) -> Option<String> {
        if let Some(digits) = text.strip_prefix("FA") {
            if let Ok(hz) = digits.parse::<u64>() {
                state.frequency_a = hz;
                return None;
            }
        } else if let Some(digits) = text.strip_prefix("FB") {
            if let Ok(hz) = digits.parse::<u64>() {
                state.frequency_b = hz;
                return None;
            }
        } else if let Some(code) = text.strip_prefix("MD0") {
            if let Some(mode) = code.chars().next().and_then(OperatingMode::from_wire_code) {
                state.mode = mode;
                return None;
            }
        } else if let Some(digits) = text.strip_prefix("PC") {
            if let Ok(watts) = digits.parse::<u8>() {
                // Firmware clamps from its menu rather than rejecting
                state.power_level = watts.clamp(POWER_MIN_W, POWER_MAX_W);
                return None;
            }
        }

        // The radio answers anything it does not understand with "?;"
        tracing::debug!("sim rejecting unrecognized frame {:?}", text);
        Some("?;".to_string())
    }
}

/// Compose the 27-character `IF` status frame
fn info_frame(state: &SimState) -> String {
    format!(
        "IF001{freq:09}+0000{clar_rx}{clar_tx}{mode}{vfo}{sql}00{shift};",
        freq = state.frequency_a,
        clar_rx = 0,
        clar_tx = 0,
        mode = state.mode.wire_code(),
        vfo = 0,
        sql = if state.squelch_open { 1 } else { 0 },
        shift = 0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft991_protocol::{parse_reply, CatCommand, CatReply, DecodedMode};

    #[test]
    fn test_frequency_query_and_set() {
        let radio = SimRadio::new(SimConfig::default());
        assert_eq!(radio.handle_frame(b"FA").unwrap(), b"FA014250000;");

        assert!(radio.handle_frame(b"FA007074000").is_none());
        assert_eq!(radio.state().frequency_a, 7_074_000);
        assert_eq!(radio.handle_frame(b"FA").unwrap(), b"FA007074000;");
    }

    #[test]
    fn test_mode_query_and_set() {
        let radio = SimRadio::new(SimConfig::default());
        assert_eq!(radio.handle_frame(b"MD0").unwrap(), b"MD02;");

        assert!(radio.handle_frame(b"MD0C").is_none());
        assert_eq!(radio.state().mode, OperatingMode::DataUsb);
    }

    #[test]
    fn test_ptt_set_and_query() {
        let radio = SimRadio::new(SimConfig::default());
        assert!(radio.handle_frame(b"TX1").is_none());
        assert!(radio.state().ptt);
        assert_eq!(radio.handle_frame(b"TX").unwrap(), b"TX1;");

        assert!(radio.handle_frame(b"TX0").is_none());
        assert!(!radio.state().ptt);
        assert_eq!(radio.handle_frame(b"TX").unwrap(), b"TX0;");
    }

    #[test]
    fn test_power_set_clamps_like_firmware() {
        let radio = SimRadio::new(SimConfig::default());
        assert!(radio.handle_frame(b"PC003").is_none());
        assert_eq!(radio.state().power_level, 5);
        assert_eq!(radio.handle_frame(b"PC").unwrap(), b"PC005;");
    }

    #[test]
    fn test_vfo_operations() {
        let radio = SimRadio::new(SimConfig::default());
        radio.handle_frame(b"SV");
        assert_eq!(radio.state().frequency_a, 7_074_000);
        assert_eq!(radio.state().frequency_b, 14_250_000);

        radio.handle_frame(b"AB");
        assert_eq!(radio.state().frequency_b, 7_074_000);
    }

    #[test]
    fn test_info_frame_parses() {
        let radio = SimRadio::new(SimConfig {
            squelch_open: true,
            ..SimConfig::default()
        });
        let reply = radio.handle_frame(b"IF").unwrap();
        assert_eq!(*reply.last().unwrap(), b';');

        let frame = &reply[..reply.len() - 1];
        assert_eq!(frame.len(), 27);
        match parse_reply(&CatCommand::Info, frame).unwrap() {
            CatReply::Info(info) => {
                assert_eq!(info.frequency_hz, 14_250_000);
                assert!(info.squelch_open);
                assert_eq!(info.mode, DecodedMode::Known(OperatingMode::Usb));
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        let radio = SimRadio::new(SimConfig::default());
        assert_eq!(radio.handle_frame(b"QQ9").unwrap(), b"?;");
    }

    #[test]
    fn test_muted_radio_stays_silent() {
        let radio = SimRadio::new(SimConfig::default());
        radio.set_muted(true);
        assert!(radio.handle_frame(b"FA").is_none());
        assert!(radio.handle_frame(b"ID").is_none());
        assert_eq!(radio.state().frames_seen, vec!["FA", "ID"]);
    }

    #[test]
    fn test_single_frame_mute_leaves_the_rest_working() {
        let radio = SimRadio::new(SimConfig::default());
        radio.mute_frame("SM0");
        assert!(radio.handle_frame(b"SM0").is_none());
        assert_eq!(radio.handle_frame(b"FA").unwrap(), b"FA014250000;");
    }

    #[test]
    fn test_frames_are_logged() {
        let radio = SimRadio::new(SimConfig::default());
        radio.handle_frame(b"PC100");
        radio.handle_frame(b"FA");
        let state = radio.state();
        assert_eq!(state.frames_seen, vec!["PC100", "FA"]);
    }
}
