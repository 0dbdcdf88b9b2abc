//! Serial channel setup
//!
//! The FT-991A's USB CAT interface (CP2105 dual UART) wants 8 data bits,
//! no parity, two stop bits, and no hardware flow control. A baud-rate
//! mismatch with radio menu item 031 produces total silence rather than
//! an error, which the session surfaces as a failed liveness probe.

use std::time::Duration;

use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::info;

use crate::config::SessionConfig;
use crate::error::CatError;

/// Open the serial channel with the radio's framing
pub fn open_serial(config: &SessionConfig) -> Result<SerialStream, CatError> {
    let stream = tokio_serial::new(&config.port, config.baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::Two)
        .flow_control(FlowControl::None)
        .timeout(Duration::from_millis(100))
        .open_native_async()
        .map_err(|source| CatError::Connection {
            port: config.port.clone(),
            source,
        })?;

    info!("opened {} at {} baud (8N2)", config.port, config.baud);
    Ok(stream)
}
