//! FT-991A CAT session
//!
//! This crate drives the CAT protocol over a serial channel: it owns the
//! connection lifecycle, the one-at-a-time transaction discipline (50 ms
//! minimum inter-command spacing, terminator-bounded reads, distinguished
//! timeouts), and the typed operation set of the radio.
//!
//! The session is generic over its I/O stream. Real hardware uses
//! `tokio_serial::SerialStream`; tests and demos plug in a
//! `tokio::io::DuplexStream` backed by the `ft991-sim` virtual radio.
//!
//! # Example
//!
//! ```rust,no_run
//! use ft991_session::{CatSession, SessionConfig};
//!
//! # async fn demo() -> Result<(), ft991_session::CatError> {
//! let mut session = CatSession::new(SessionConfig {
//!     port: "/dev/ttyUSB0".into(),
//!     ..SessionConfig::default()
//! });
//!
//! if session.connect().await? {
//!     let hz = session.get_frequency_a().await?;
//!     println!("VFO-A: {:.6} MHz", hz as f64 / 1e6);
//! }
//! session.disconnect().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Safety invariant
//!
//! [`CatSession::disconnect`] always attempts to de-assert PTT before
//! releasing the port, and always releases the port even when that
//! attempt fails. [`CatSession::ptt_on`] is the single operation that
//! emits RF; it logs at `warn` severity and collaborators are expected to
//! gate it behind operator confirmation.

pub mod config;
pub mod error;
pub mod scanner;
pub mod session;
pub mod snapshot;
pub mod transaction;
pub mod transport;

pub use config::SessionConfig;
pub use error::CatError;
pub use scanner::{ActivityHit, BandScanner, ScanPoint};
pub use session::CatSession;
pub use snapshot::RadioStatus;
pub use transaction::TransactionEngine;
