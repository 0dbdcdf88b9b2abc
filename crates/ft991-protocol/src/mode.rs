//! Operating mode enumerants and their wire codes
//!
//! The FT-991A encodes its operating mode as a single hex-like character in
//! the `MD` command (`MD0x;` where `x` is the mode code). The table is fixed
//! and bijective; decode of a code outside the table is represented, not
//! rejected, so a firmware surprise never crashes a status poll.

/// Operating modes of the FT-991A (`MD` command parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperatingMode {
    /// Lower Sideband
    Lsb,
    /// Upper Sideband
    Usb,
    /// Continuous Wave
    Cw,
    /// Frequency Modulation
    Fm,
    /// Amplitude Modulation
    Am,
    /// RTTY Lower Sideband
    RttyLsb,
    /// CW Reverse
    CwR,
    /// Data Lower Sideband
    DataLsb,
    /// RTTY Upper Sideband
    RttyUsb,
    /// Data FM
    DataFm,
    /// FM Narrow
    FmN,
    /// Data Upper Sideband (FT8, PSK, etc.)
    DataUsb,
    /// AM Narrow
    AmN,
    /// C4FM digital voice
    C4fm,
}

/// All modes, in wire-code order
pub const ALL_MODES: [OperatingMode; 14] = [
    OperatingMode::Lsb,
    OperatingMode::Usb,
    OperatingMode::Cw,
    OperatingMode::Fm,
    OperatingMode::Am,
    OperatingMode::RttyLsb,
    OperatingMode::CwR,
    OperatingMode::DataLsb,
    OperatingMode::RttyUsb,
    OperatingMode::DataFm,
    OperatingMode::FmN,
    OperatingMode::DataUsb,
    OperatingMode::AmN,
    OperatingMode::C4fm,
];

impl OperatingMode {
    /// Wire code character for this mode
    pub fn wire_code(&self) -> char {
        match self {
            OperatingMode::Lsb => '1',
            OperatingMode::Usb => '2',
            OperatingMode::Cw => '3',
            OperatingMode::Fm => '4',
            OperatingMode::Am => '5',
            OperatingMode::RttyLsb => '6',
            OperatingMode::CwR => '7',
            OperatingMode::DataLsb => '8',
            OperatingMode::RttyUsb => '9',
            OperatingMode::DataFm => 'A',
            OperatingMode::FmN => 'B',
            OperatingMode::DataUsb => 'C',
            OperatingMode::AmN => 'D',
            OperatingMode::C4fm => 'E',
        }
    }

    /// Look up a mode by wire code character
    pub fn from_wire_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            '1' => Some(OperatingMode::Lsb),
            '2' => Some(OperatingMode::Usb),
            '3' => Some(OperatingMode::Cw),
            '4' => Some(OperatingMode::Fm),
            '5' => Some(OperatingMode::Am),
            '6' => Some(OperatingMode::RttyLsb),
            '7' => Some(OperatingMode::CwR),
            '8' => Some(OperatingMode::DataLsb),
            '9' => Some(OperatingMode::RttyUsb),
            'A' => Some(OperatingMode::DataFm),
            'B' => Some(OperatingMode::FmN),
            'C' => Some(OperatingMode::DataUsb),
            'D' => Some(OperatingMode::AmN),
            'E' => Some(OperatingMode::C4fm),
            _ => None,
        }
    }

    /// Look up a mode by its display name (e.g. "DATA-USB", case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_MODES
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Display name matching the radio's front-panel labeling
    pub fn name(&self) -> &'static str {
        match self {
            OperatingMode::Lsb => "LSB",
            OperatingMode::Usb => "USB",
            OperatingMode::Cw => "CW",
            OperatingMode::Fm => "FM",
            OperatingMode::Am => "AM",
            OperatingMode::RttyLsb => "RTTY-LSB",
            OperatingMode::CwR => "CW-R",
            OperatingMode::DataLsb => "DATA-LSB",
            OperatingMode::RttyUsb => "RTTY-USB",
            OperatingMode::DataFm => "DATA-FM",
            OperatingMode::FmN => "FM-N",
            OperatingMode::DataUsb => "DATA-USB",
            OperatingMode::AmN => "AM-N",
            OperatingMode::C4fm => "C4FM",
        }
    }

    /// Returns whether this is a voice mode
    pub fn is_voice(&self) -> bool {
        matches!(
            self,
            Self::Lsb | Self::Usb | Self::Am | Self::AmN | Self::Fm | Self::FmN | Self::C4fm
        )
    }

    /// Returns whether this is a digital/data mode
    pub fn is_digital(&self) -> bool {
        matches!(
            self,
            Self::DataLsb | Self::DataUsb | Self::DataFm | Self::RttyLsb | Self::RttyUsb
        )
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of decoding a mode wire code
///
/// An unrecognized code is preserved rather than treated as an error; the
/// radio is the authority on its own mode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodedMode {
    /// A mode from the fixed table
    Known(OperatingMode),
    /// A wire code outside the table
    Unknown(char),
}

impl DecodedMode {
    /// Decode a wire code character
    pub fn from_wire_code(c: char) -> Self {
        match OperatingMode::from_wire_code(c) {
            Some(m) => DecodedMode::Known(m),
            None => DecodedMode::Unknown(c),
        }
    }

    /// The known mode, if this code was in the table
    pub fn known(&self) -> Option<OperatingMode> {
        match self {
            DecodedMode::Known(m) => Some(*m),
            DecodedMode::Unknown(_) => None,
        }
    }
}

impl std::fmt::Display for DecodedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodedMode::Known(m) => write!(f, "{}", m),
            DecodedMode::Unknown(c) => write!(f, "UNKNOWN({})", c),
        }
    }
}
