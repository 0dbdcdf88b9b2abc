//! FT-991A CAT Protocol Library
//!
//! Encoding and parsing for the Yaesu FT-991A's CAT (Computer Aided
//! Transceiver) protocol: ASCII commands terminated by `;`, carried over a
//! 38400-baud serial link (must match radio menu item 031).
//!
//! This crate is pure: it owns the command table, the numeric formatting
//! rules, and the mode enumerant table, but performs no I/O. The session
//! crate drives it over a serial channel.
//!
//! # Example
//!
//! ```rust
//! use ft991_protocol::{CatCommand, CatReply, parse_reply};
//!
//! // Build the wire bytes for a VFO-A frequency set
//! let cmd = CatCommand::set_frequency_a(14_074_000).unwrap();
//! assert_eq!(cmd.encode(), b"FA014074000;");
//!
//! // Parse the radio's answer to a frequency query
//! let query = CatCommand::FrequencyA;
//! let reply = parse_reply(&query, b"FA014074000").unwrap();
//! assert_eq!(reply, CatReply::Frequency(14_074_000));
//! ```
//!
//! # Reference
//! FT-991A CAT Operation Reference Manual (Yaesu 1711-D).

pub mod bands;
pub mod command;
pub mod error;
pub mod frame;
pub mod mode;
pub mod response;

pub use command::{clamp_power, CatCommand};
pub use error::{CommandError, ParseError};
pub use frame::FrameBuffer;
pub use mode::{DecodedMode, OperatingMode};
pub use response::{parse_reply, CatReply, InfoStatus};

/// Terminator byte ending every CAT command and response
pub const TERMINATOR: u8 = b';';

/// Lowest tunable frequency in Hz (receiver lower bound)
pub const FREQ_MIN_HZ: u64 = 30_000;

/// Highest tunable frequency in Hz (70cm upper bound)
pub const FREQ_MAX_HZ: u64 = 470_000_000;

/// Minimum RF power setting in watts
pub const POWER_MIN_W: u8 = 5;

/// Maximum RF power setting in watts (HF/6m paths)
pub const POWER_MAX_W: u8 = 100;

/// Frequency parameter width: 9 zero-padded decimal digits (1 Hz resolution)
pub const FREQ_DIGITS: usize = 9;

/// ID response body for the FT-991A
pub const FT991A_ID: &str = "0670";
