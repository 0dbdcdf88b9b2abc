//! Error types for CAT command building and response parsing

use thiserror::Error;

/// Errors raised while building a command, before any bytes are sent
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Frequency outside the radio's tunable range
    #[error("frequency {hz} Hz outside range {min}..={max}")]
    FrequencyOutOfRange { hz: u64, min: u64, max: u64 },
}

/// Errors raised while parsing a terminated response frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Frame does not start with the echo of the issued command's mnemonic
    #[error("unexpected reply prefix: expected {expected:?}, got {got:?}")]
    UnexpectedPrefix { expected: String, got: String },

    /// Frame is shorter than the fixed width the command requires
    #[error("reply too short for {command}: {len} bytes")]
    TooShort { command: &'static str, len: usize },

    /// Numeric field contains non-digit characters
    #[error("non-numeric field in reply: {0:?}")]
    NonNumeric(String),

    /// Frame bytes are not ASCII
    #[error("reply is not ASCII: {0:?}")]
    NotAscii(Vec<u8>),

    /// Command does not produce a reply (set commands are unacknowledged)
    #[error("command {0} has no reply to parse")]
    NoReplyExpected(&'static str),
}
