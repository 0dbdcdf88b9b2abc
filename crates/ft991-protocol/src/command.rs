//! CAT command table and wire encoding
//!
//! Every command the session can issue is a [`CatCommand`] value object:
//! built once through a validating constructor, encoded once, sent once.
//! This module is the single source of truth for mnemonics and field
//! widths; no other layer may re-derive them.
//!
//! | Mnemonic | Parameter        | Semantics                  |
//! |----------|------------------|----------------------------|
//! | `FA`/`FB`| 9-digit Hz       | VFO-A/B frequency get/set  |
//! | `MD0`    | 1 mode char      | Operating mode get/set     |
//! | `PC`     | 3-digit watts    | RF power output get/set    |
//! | `SM0`    | —                | S-meter read (0–255)       |
//! | `RM1`/`RM2` | —             | Power / SWR meter read     |
//! | `TX0`/`TX1` | —             | PTT off / on (set)         |
//! | `TX`     | —                | Transmit state query       |
//! | `SV`     | —                | Swap VFO A/B               |
//! | `AB`     | —                | Copy VFO-A to VFO-B        |
//! | `IF`     | —                | Composite status query     |
//! | `ID`     | —                | Model identification query |

use crate::error::CommandError;
use crate::mode::OperatingMode;
use crate::{FREQ_MAX_HZ, FREQ_MIN_HZ, POWER_MAX_W, POWER_MIN_W};

/// An outbound CAT command
///
/// Queries carry no parameter field; setters carry a fixed-width one.
/// Construct frequency and power setters through [`CatCommand::set_frequency_a`],
/// [`CatCommand::set_frequency_b`] and [`CatCommand::set_power_level`] so the
/// domain checks run before any bytes exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatCommand {
    /// Query VFO-A frequency: `FA;`
    FrequencyA,
    /// Set VFO-A frequency: `FAxxxxxxxxx;`
    SetFrequencyA(u64),
    /// Query VFO-B frequency: `FB;`
    FrequencyB,
    /// Set VFO-B frequency: `FBxxxxxxxxx;`
    SetFrequencyB(u64),
    /// Query operating mode (main receiver): `MD0;`
    Mode,
    /// Set operating mode: `MD0x;`
    SetMode(OperatingMode),
    /// Query RF power output setting: `PC;`
    PowerLevel,
    /// Set RF power output: `PCxxx;`
    SetPowerLevel(u8),
    /// Read S-meter (main receiver): `SM0;`
    SMeter,
    /// Read power output meter: `RM1;`
    PowerMeter,
    /// Read SWR meter: `RM2;`
    SwrMeter,
    /// Query transmit state: `TX;`
    TransmitState,
    /// Key the transmitter: `TX1;` (emits RF)
    PttOn,
    /// Unkey the transmitter: `TX0;`
    PttOff,
    /// Swap VFO-A and VFO-B: `SV;`
    SwapVfo,
    /// Copy VFO-A to VFO-B: `AB;`
    CopyAToB,
    /// Composite status query: `IF;`
    Info,
    /// Model identification query: `ID;`
    Id,
    /// Raw pass-through for diagnostics (terminator appended if missing)
    Raw(String),
}

impl CatCommand {
    /// Build a VFO-A frequency setter, rejecting out-of-range input
    pub fn set_frequency_a(hz: u64) -> Result<Self, CommandError> {
        check_frequency(hz)?;
        Ok(CatCommand::SetFrequencyA(hz))
    }

    /// Build a VFO-B frequency setter, rejecting out-of-range input
    pub fn set_frequency_b(hz: u64) -> Result<Self, CommandError> {
        check_frequency(hz)?;
        Ok(CatCommand::SetFrequencyB(hz))
    }

    /// Build a power setter, clamping to the radio's 5–100 W range
    ///
    /// Clamping mirrors the radio's own menu behavior; the value actually
    /// sent is recoverable from the returned command.
    pub fn set_power_level(watts: u8) -> Self {
        CatCommand::SetPowerLevel(clamp_power(watts))
    }

    /// Encode to the fully-terminated wire bytes
    pub fn encode(&self) -> Vec<u8> {
        let cmd = match self {
            CatCommand::FrequencyA => "FA".to_string(),
            CatCommand::SetFrequencyA(hz) => format!("FA{:09}", hz),
            CatCommand::FrequencyB => "FB".to_string(),
            CatCommand::SetFrequencyB(hz) => format!("FB{:09}", hz),
            CatCommand::Mode => "MD0".to_string(),
            CatCommand::SetMode(mode) => format!("MD0{}", mode.wire_code()),
            CatCommand::PowerLevel => "PC".to_string(),
            CatCommand::SetPowerLevel(watts) => format!("PC{:03}", watts),
            CatCommand::SMeter => "SM0".to_string(),
            CatCommand::PowerMeter => "RM1".to_string(),
            CatCommand::SwrMeter => "RM2".to_string(),
            CatCommand::TransmitState => "TX".to_string(),
            CatCommand::PttOn => "TX1".to_string(),
            CatCommand::PttOff => "TX0".to_string(),
            CatCommand::SwapVfo => "SV".to_string(),
            CatCommand::CopyAToB => "AB".to_string(),
            CatCommand::Info => "IF".to_string(),
            CatCommand::Id => "ID".to_string(),
            CatCommand::Raw(s) => s.trim_end_matches(';').to_string(),
        };
        format!("{};", cmd).into_bytes()
    }

    /// Mnemonic for logging and error reporting
    pub fn mnemonic(&self) -> &'static str {
        match self {
            CatCommand::FrequencyA | CatCommand::SetFrequencyA(_) => "FA",
            CatCommand::FrequencyB | CatCommand::SetFrequencyB(_) => "FB",
            CatCommand::Mode | CatCommand::SetMode(_) => "MD",
            CatCommand::PowerLevel | CatCommand::SetPowerLevel(_) => "PC",
            CatCommand::SMeter => "SM",
            CatCommand::PowerMeter | CatCommand::SwrMeter => "RM",
            CatCommand::TransmitState | CatCommand::PttOn | CatCommand::PttOff => "TX",
            CatCommand::SwapVfo => "SV",
            CatCommand::CopyAToB => "AB",
            CatCommand::Info => "IF",
            CatCommand::Id => "ID",
            CatCommand::Raw(_) => "RAW",
        }
    }

    /// Echo prefix a reply frame must carry, or `None` for set commands
    ///
    /// The FT-991A answers queries by echoing the mnemonic (including the
    /// fixed sub-parameter digit where one exists) followed by the value.
    /// Set commands produce no reply at all.
    pub fn reply_prefix(&self) -> Option<&'static str> {
        match self {
            CatCommand::FrequencyA => Some("FA"),
            CatCommand::FrequencyB => Some("FB"),
            CatCommand::Mode => Some("MD0"),
            CatCommand::PowerLevel => Some("PC"),
            CatCommand::SMeter => Some("SM0"),
            CatCommand::PowerMeter => Some("RM1"),
            CatCommand::SwrMeter => Some("RM2"),
            CatCommand::TransmitState => Some("TX"),
            CatCommand::Info => Some("IF"),
            CatCommand::Id => Some("ID"),
            CatCommand::Raw(_) => Some(""),
            CatCommand::SetFrequencyA(_)
            | CatCommand::SetFrequencyB(_)
            | CatCommand::SetMode(_)
            | CatCommand::SetPowerLevel(_)
            | CatCommand::PttOn
            | CatCommand::PttOff
            | CatCommand::SwapVfo
            | CatCommand::CopyAToB => None,
        }
    }

    /// True if a terminated reply frame is expected
    pub fn expects_reply(&self) -> bool {
        self.reply_prefix().is_some()
    }

    /// True for the commands that can energize the transmitter
    pub fn keys_transmitter(&self) -> bool {
        matches!(self, CatCommand::PttOn)
    }
}

/// Validate a frequency against the tunable range
pub fn check_frequency(hz: u64) -> Result<(), CommandError> {
    if (FREQ_MIN_HZ..=FREQ_MAX_HZ).contains(&hz) {
        Ok(())
    } else {
        Err(CommandError::FrequencyOutOfRange {
            hz,
            min: FREQ_MIN_HZ,
            max: FREQ_MAX_HZ,
        })
    }
}

/// Clamp a requested power level to the radio's 5–100 W range
pub fn clamp_power(watts: u8) -> u8 {
    watts.clamp(POWER_MIN_W, POWER_MAX_W)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_frequency_set() {
        let cmd = CatCommand::set_frequency_a(14_074_000).unwrap();
        assert_eq!(cmd.encode(), b"FA014074000;");
    }

    #[test]
    fn test_encode_frequency_set_b() {
        let cmd = CatCommand::set_frequency_b(7_074_000).unwrap();
        assert_eq!(cmd.encode(), b"FB007074000;");
    }

    #[test]
    fn test_frequency_out_of_range_rejected() {
        assert!(matches!(
            CatCommand::set_frequency_a(29_999),
            Err(CommandError::FrequencyOutOfRange { hz: 29_999, .. })
        ));
        assert!(matches!(
            CatCommand::set_frequency_a(470_000_001),
            Err(CommandError::FrequencyOutOfRange { .. })
        ));
        // Boundaries are valid
        assert!(CatCommand::set_frequency_a(30_000).is_ok());
        assert!(CatCommand::set_frequency_a(470_000_000).is_ok());
    }

    #[test]
    fn test_encode_queries_have_no_parameter() {
        assert_eq!(CatCommand::FrequencyA.encode(), b"FA;");
        assert_eq!(CatCommand::Mode.encode(), b"MD0;");
        assert_eq!(CatCommand::SMeter.encode(), b"SM0;");
        assert_eq!(CatCommand::PowerMeter.encode(), b"RM1;");
        assert_eq!(CatCommand::SwrMeter.encode(), b"RM2;");
        assert_eq!(CatCommand::TransmitState.encode(), b"TX;");
        assert_eq!(CatCommand::Info.encode(), b"IF;");
        assert_eq!(CatCommand::Id.encode(), b"ID;");
    }

    #[test]
    fn test_encode_mode_set() {
        let cmd = CatCommand::SetMode(OperatingMode::DataUsb);
        assert_eq!(cmd.encode(), b"MD0C;");
    }

    #[test]
    fn test_encode_ptt() {
        assert_eq!(CatCommand::PttOn.encode(), b"TX1;");
        assert_eq!(CatCommand::PttOff.encode(), b"TX0;");
        assert!(CatCommand::PttOn.keys_transmitter());
        assert!(!CatCommand::PttOff.keys_transmitter());
    }

    #[test]
    fn test_encode_vfo_commands() {
        assert_eq!(CatCommand::SwapVfo.encode(), b"SV;");
        assert_eq!(CatCommand::CopyAToB.encode(), b"AB;");
    }

    #[test]
    fn test_power_is_clamped() {
        assert_eq!(
            CatCommand::set_power_level(150),
            CatCommand::SetPowerLevel(100)
        );
        assert_eq!(CatCommand::set_power_level(150).encode(), b"PC100;");
        assert_eq!(CatCommand::set_power_level(0).encode(), b"PC005;");
        assert_eq!(CatCommand::set_power_level(50).encode(), b"PC050;");
    }

    #[test]
    fn test_set_commands_expect_no_reply() {
        assert!(!CatCommand::PttOn.expects_reply());
        assert!(!CatCommand::SwapVfo.expects_reply());
        assert!(!CatCommand::SetMode(OperatingMode::Cw).expects_reply());
        assert!(CatCommand::FrequencyA.expects_reply());
        assert!(CatCommand::SMeter.expects_reply());
    }

    #[test]
    fn test_raw_terminator_normalized() {
        assert_eq!(CatCommand::Raw("FA;".into()).encode(), b"FA;");
        assert_eq!(CatCommand::Raw("FA".into()).encode(), b"FA;");
    }

    proptest! {
        /// In-range frequencies encode to exactly 9 zero-padded digits
        /// that parse back to the input value.
        #[test]
        fn prop_frequency_encoding(hz in 30_000u64..=470_000_000) {
            let cmd = CatCommand::set_frequency_a(hz).unwrap();
            let wire = cmd.encode();
            prop_assert_eq!(wire.len(), 12); // "FA" + 9 digits + ';'
            prop_assert_eq!(&wire[..2], b"FA");
            prop_assert_eq!(wire[11], b';');
            let digits = std::str::from_utf8(&wire[2..11]).unwrap();
            prop_assert!(digits.bytes().all(|b| b.is_ascii_digit()));
            prop_assert_eq!(digits.parse::<u64>().unwrap(), hz);
        }

        /// Out-of-range frequencies never produce a command.
        #[test]
        fn prop_out_of_range_rejected(hz in prop_oneof![0u64..30_000, 470_000_001u64..u64::MAX]) {
            prop_assert!(CatCommand::set_frequency_a(hz).is_err());
        }
    }
}
