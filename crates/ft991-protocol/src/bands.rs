//! Amateur band tables and digital-mode dial frequencies
//!
//! Static tables only; tuning logic lives in the session crate.

/// Common amateur bands with their base frequencies in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Band {
    M160,
    M80,
    M60,
    M40,
    M30,
    M20,
    M17,
    M15,
    M12,
    M10,
    M6,
    M2,
    Cm70,
}

impl Band {
    /// Band base frequency in Hz
    pub fn base_hz(&self) -> u64 {
        match self {
            Band::M160 => 1_800_000,
            Band::M80 => 3_500_000,
            Band::M60 => 5_330_500,
            Band::M40 => 7_000_000,
            Band::M30 => 10_100_000,
            Band::M20 => 14_000_000,
            Band::M17 => 18_068_000,
            Band::M15 => 21_000_000,
            Band::M12 => 24_890_000,
            Band::M10 => 28_000_000,
            Band::M6 => 50_000_000,
            Band::M2 => 144_000_000,
            Band::Cm70 => 420_000_000,
        }
    }

    /// Conventional band name ("20m", "70cm", ...)
    pub fn name(&self) -> &'static str {
        match self {
            Band::M160 => "160m",
            Band::M80 => "80m",
            Band::M60 => "60m",
            Band::M40 => "40m",
            Band::M30 => "30m",
            Band::M20 => "20m",
            Band::M17 => "17m",
            Band::M15 => "15m",
            Band::M12 => "12m",
            Band::M10 => "10m",
            Band::M6 => "6m",
            Band::M2 => "2m",
            Band::Cm70 => "70cm",
        }
    }

    /// Look up a band by name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [Band; 13] = [
            Band::M160,
            Band::M80,
            Band::M60,
            Band::M40,
            Band::M30,
            Band::M20,
            Band::M17,
            Band::M15,
            Band::M12,
            Band::M10,
            Band::M6,
            Band::M2,
            Band::Cm70,
        ];
        ALL.iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// FT8 dial frequencies by band name, in Hz
pub const FT8_FREQUENCIES: &[(&str, u64)] = &[
    ("160m", 1_840_000),
    ("80m", 3_573_000),
    ("60m", 5_357_000),
    ("40m", 7_074_000),
    ("30m", 10_136_000),
    ("20m", 14_074_000),
    ("17m", 18_100_000),
    ("15m", 21_074_000),
    ("12m", 24_915_000),
    ("10m", 28_074_000),
    ("6m", 50_313_000),
    ("2m", 144_174_000),
];

/// FT4 dial frequencies by band name, in Hz
pub const FT4_FREQUENCIES: &[(&str, u64)] = &[
    ("160m", 1_840_000),
    ("80m", 3_575_000),
    ("60m", 5_357_000),
    ("40m", 7_047_500),
    ("30m", 10_140_000),
    ("20m", 14_080_000),
    ("17m", 18_104_000),
    ("15m", 21_140_000),
    ("12m", 24_919_000),
    ("10m", 28_180_000),
    ("6m", 50_318_000),
];

/// JS8Call dial frequencies by band name, in Hz
pub const JS8_FREQUENCIES: &[(&str, u64)] = &[
    ("160m", 1_842_000),
    ("80m", 3_578_000),
    ("60m", 5_357_000),
    ("40m", 7_078_000),
    ("30m", 10_130_000),
    ("20m", 14_078_000),
    ("17m", 18_104_000),
    ("15m", 21_078_000),
    ("12m", 24_922_000),
    ("10m", 28_078_000),
    ("6m", 50_318_000),
];

/// HF amateur band voice segments (band, start, end) in Hz, 160m through 10m
pub const HF_VOICE_BANDS: &[(&str, u64, u64)] = &[
    ("160m", 1_800_000, 2_000_000),
    ("80m", 3_500_000, 4_000_000),
    ("60m", 5_330_000, 5_404_000),
    ("40m", 7_000_000, 7_300_000),
    ("30m", 10_100_000, 10_150_000),
    ("20m", 14_000_000, 14_350_000),
    ("17m", 18_068_000, 18_168_000),
    ("15m", 21_000_000, 21_450_000),
    ("12m", 24_890_000, 24_990_000),
    ("10m", 28_000_000, 29_700_000),
];

/// FT8 dial frequency for a band name, if the band carries FT8
pub fn ft8_frequency(band: &str) -> Option<u64> {
    lookup(FT8_FREQUENCIES, band)
}

/// FT4 dial frequency for a band name
pub fn ft4_frequency(band: &str) -> Option<u64> {
    lookup(FT4_FREQUENCIES, band)
}

/// JS8Call dial frequency for a band name
pub fn js8_frequency(band: &str) -> Option<u64> {
    lookup(JS8_FREQUENCIES, band)
}

fn lookup(table: &[(&str, u64)], band: &str) -> Option<u64> {
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(band))
        .map(|(_, hz)| *hz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::check_frequency;

    #[test]
    fn test_ft8_lookup() {
        assert_eq!(ft8_frequency("20m"), Some(14_074_000));
        assert_eq!(ft8_frequency("20M"), Some(14_074_000));
        assert_eq!(ft8_frequency("23cm"), None);
    }

    #[test]
    fn test_band_roundtrip() {
        assert_eq!(Band::from_name("70cm"), Some(Band::Cm70));
        assert_eq!(Band::M20.base_hz(), 14_000_000);
        assert_eq!(Band::from_name(Band::M6.name()), Some(Band::M6));
    }

    #[test]
    fn test_all_dial_frequencies_are_tunable() {
        for (_, hz) in FT8_FREQUENCIES
            .iter()
            .chain(FT4_FREQUENCIES)
            .chain(JS8_FREQUENCIES)
        {
            assert!(check_frequency(*hz).is_ok(), "{} Hz out of range", hz);
        }
        for (_, start, end) in HF_VOICE_BANDS {
            assert!(check_frequency(*start).is_ok());
            assert!(check_frequency(*end).is_ok());
        }
    }
}
