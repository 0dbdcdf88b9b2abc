//! Simulated FT-991A
//!
//! A protocol-accurate virtual radio for exercising the session stack
//! without hardware. [`SimRadio`] models the device state machine and
//! answers the CAT command table bit-exactly; [`task::spawn`] pumps it
//! over a `tokio::io::duplex` stream so it plugs in anywhere a serial
//! port would.
//!
//! # Example
//!
//! ```rust,no_run
//! use ft991_sim::{SimConfig, SimRadio};
//!
//! let radio = SimRadio::new(SimConfig::default());
//! let io = ft991_sim::task::spawn(radio.clone());
//! // hand `io` to a CatSession; inspect `radio` from the test afterwards
//! ```

pub mod radio;
pub mod task;

pub use radio::{SimConfig, SimRadio};
