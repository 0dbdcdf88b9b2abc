//! Session configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default baud rate; must match radio menu item 031
pub const DEFAULT_BAUD: u32 = 38_400;

/// Minimum spacing between commands, in milliseconds
///
/// The radio drops or corrupts responses to commands issued faster than
/// this: a firmware constraint, not a tuning knob to lower.
pub const MIN_COMMAND_INTERVAL_MS: u64 = 50;

/// Configuration for a [`crate::CatSession`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Serial port path (e.g. `/dev/ttyUSB0`, `COM3`)
    pub port: String,
    /// Baud rate
    pub baud: u32,
    /// Overall deadline for one reply, in milliseconds
    pub reply_timeout_ms: u64,
    /// Minimum inter-command spacing, in milliseconds
    pub min_command_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud: DEFAULT_BAUD,
            reply_timeout_ms: 1_000,
            min_command_interval_ms: MIN_COMMAND_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    /// Reply deadline as a [`Duration`]
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    /// Inter-command spacing as a [`Duration`]
    pub fn min_command_interval(&self) -> Duration {
        Duration::from_millis(self.min_command_interval_ms)
    }
}
