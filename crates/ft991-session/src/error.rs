//! Error types for the session layer

use ft991_protocol::{CommandError, ParseError};
use thiserror::Error;

/// Errors surfaced by the session and transaction engine
#[derive(Debug, Error)]
pub enum CatError {
    /// Operation attempted on a disconnected session
    #[error("not connected to radio")]
    NotConnected,

    /// Serial port could not be opened
    #[error("failed to open serial port {port}: {source}")]
    Connection {
        port: String,
        #[source]
        source: tokio_serial::Error,
    },

    /// A read or write on the channel failed; the connection is suspect
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No terminated reply within the deadline
    ///
    /// Expected during normal operation (radio busy, cable noise) and
    /// never conflated with a zero-value reading.
    #[error("no response from radio within {0} ms")]
    Timeout(u64),

    /// Terminated reply arrived but does not match the issued command
    #[error("protocol error: {0}")]
    Parse(#[from] ParseError),

    /// Caller-supplied value rejected before any bytes were sent
    #[error("invalid request: {0}")]
    Command(#[from] CommandError),

    /// Band name outside the dial-frequency tables
    #[error("unknown band: {0:?}")]
    UnknownBand(String),

    /// Reply parsed to a shape the operation cannot use
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
}

impl CatError {
    /// True for the "radio went quiet" outcome a polling loop retries
    pub fn is_timeout(&self) -> bool {
        matches!(self, CatError::Timeout(_))
    }
}
