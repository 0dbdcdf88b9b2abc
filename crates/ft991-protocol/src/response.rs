//! Reply frame parsing
//!
//! A reply frame is the byte run accumulated up to (but excluding) the
//! terminator. Parsing is keyed on the command that was issued: the radio
//! echoes the query mnemonic followed by a fixed-width value field.
//!
//! Partial frames never reach this module; the transaction engine reports
//! them as timeouts. A frame that arrived terminated but has the wrong
//! shape is a [`ParseError`], which is a different failure class entirely
//! (protocol/firmware mismatch rather than a momentarily silent radio).

use crate::command::CatCommand;
use crate::error::ParseError;
use crate::mode::DecodedMode;
use crate::FREQ_DIGITS;

/// Minimum length of a full `IF` frame including the `IF` prefix
const INFO_FRAME_LEN: usize = 27;

/// Byte offset of the squelch flag within the full `IF` frame
const INFO_SQUELCH_OFFSET: usize = 23;

/// A parsed reply to a query command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatReply {
    /// VFO frequency in Hz
    Frequency(u64),
    /// Operating mode (possibly unrecognized)
    Mode(DecodedMode),
    /// RF power output setting in watts
    PowerLevel(u8),
    /// Raw meter reading, 0–255
    Meter(u16),
    /// Transmit state (true = transmitting)
    Transmitting(bool),
    /// Composite status block
    Info(InfoStatus),
    /// Model identification body (FT-991A reports `0670`)
    Id(String),
    /// Raw frame text (diagnostic pass-through)
    Raw(String),
}

/// Fields extracted from the composite `IF` status frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoStatus {
    /// Memory channel number
    pub memory_channel: u16,
    /// Dial frequency in Hz
    pub frequency_hz: u64,
    /// Signed clarifier offset in Hz
    pub clarifier_hz: i32,
    /// Operating mode
    pub mode: DecodedMode,
    /// Squelch open flag (byte offset 23 of the frame)
    pub squelch_open: bool,
}

/// Parse a terminated reply frame for the command that was issued
pub fn parse_reply(cmd: &CatCommand, frame: &[u8]) -> Result<CatReply, ParseError> {
    let prefix = match cmd.reply_prefix() {
        Some(p) => p,
        None => return Err(ParseError::NoReplyExpected(cmd.mnemonic())),
    };

    let text = std::str::from_utf8(frame)
        .map_err(|_| ParseError::NotAscii(frame.to_vec()))?
        .to_string();
    if !text.is_ascii() {
        return Err(ParseError::NotAscii(frame.to_vec()));
    }

    if !text.starts_with(prefix) {
        return Err(ParseError::UnexpectedPrefix {
            expected: prefix.to_string(),
            got: text,
        });
    }
    let body = &text[prefix.len()..];

    match cmd {
        CatCommand::FrequencyA | CatCommand::FrequencyB => {
            if body.len() != FREQ_DIGITS {
                return Err(ParseError::TooShort {
                    command: cmd.mnemonic(),
                    len: frame.len(),
                });
            }
            Ok(CatReply::Frequency(decode_integer(body)?))
        }
        CatCommand::Mode => {
            let code = body.chars().next().ok_or(ParseError::TooShort {
                command: "MD",
                len: frame.len(),
            })?;
            Ok(CatReply::Mode(DecodedMode::from_wire_code(code)))
        }
        CatCommand::PowerLevel => {
            let watts = decode_integer(body)?;
            Ok(CatReply::PowerLevel(watts.min(u8::MAX as u64) as u8))
        }
        CatCommand::SMeter | CatCommand::PowerMeter | CatCommand::SwrMeter => {
            let raw = decode_integer(body)?;
            Ok(CatReply::Meter(raw.min(u16::MAX as u64) as u16))
        }
        CatCommand::TransmitState => {
            let digit = body.chars().next().ok_or(ParseError::TooShort {
                command: "TX",
                len: frame.len(),
            })?;
            if !digit.is_ascii_digit() {
                return Err(ParseError::NonNumeric(body.to_string()));
            }
            Ok(CatReply::Transmitting(digit != '0'))
        }
        CatCommand::Info => Ok(CatReply::Info(parse_info(&text, frame.len())?)),
        CatCommand::Id => Ok(CatReply::Id(body.to_string())),
        CatCommand::Raw(_) => Ok(CatReply::Raw(text)),
        _ => Err(ParseError::NoReplyExpected(cmd.mnemonic())),
    }
}

/// Parse a fixed-width decimal field
///
/// Distinct from a timeout by construction: this is only reached for frames
/// that arrived fully terminated.
pub fn decode_integer(body: &str) -> Result<u64, ParseError> {
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::NonNumeric(body.to_string()));
    }
    body.parse::<u64>()
        .map_err(|_| ParseError::NonNumeric(body.to_string()))
}

/// Parse the composite `IF` frame (text includes the `IF` prefix)
fn parse_info(text: &str, frame_len: usize) -> Result<InfoStatus, ParseError> {
    if text.len() < INFO_FRAME_LEN {
        return Err(ParseError::TooShort {
            command: "IF",
            len: frame_len,
        });
    }
    let bytes = text.as_bytes();

    let memory_channel = decode_integer(&text[2..5])? as u16;
    let frequency_hz = decode_integer(&text[5..14])?;

    let clar_sign = match bytes[14] {
        b'+' => 1i32,
        b'-' => -1i32,
        _ => 0,
    };
    let clarifier_hz = decode_integer(&text[15..19])? as i32 * clar_sign;

    let mode = DecodedMode::from_wire_code(bytes[21] as char);
    let squelch_open = bytes[INFO_SQUELCH_OFFSET] == b'1';

    Ok(InfoStatus {
        memory_channel,
        frequency_hz,
        clarifier_hz,
        mode,
        squelch_open,
    })
}
