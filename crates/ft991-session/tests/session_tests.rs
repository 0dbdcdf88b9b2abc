//! Session integration tests against the virtual radio
//!
//! Each test wires a `CatSession` to a `SimRadio` over an in-memory
//! duplex stream, then checks both the session's view and the radio's
//! internal state (including the exact frames that crossed the wire).

use std::time::{Duration, Instant};

use ft991_protocol::{DecodedMode, OperatingMode};
use ft991_session::{BandScanner, CatError, CatSession, SessionConfig};
use ft991_sim::{SimConfig, SimRadio};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

fn test_config() -> SessionConfig {
    SessionConfig {
        port: "sim".to_string(),
        reply_timeout_ms: 500,
        min_command_interval_ms: 5,
        ..SessionConfig::default()
    }
}

fn sim_session(radio: &SimRadio, config: SessionConfig) -> CatSession<DuplexStream> {
    let io = ft991_sim::task::spawn(radio.clone());
    CatSession::with_io(io, config)
}

#[tokio::test]
async fn frequency_get_and_set_roundtrip() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    assert_eq!(session.get_frequency_a().await.unwrap(), 14_250_000);

    session.set_frequency_a(7_074_000).await.unwrap();
    assert_eq!(session.get_frequency_a().await.unwrap(), 7_074_000);
    assert_eq!(radio.state().frequency_a, 7_074_000);

    session.set_frequency_b(3_573_000).await.unwrap();
    assert_eq!(session.get_frequency_b().await.unwrap(), 3_573_000);
}

#[tokio::test]
async fn out_of_range_frequency_rejected_before_sending() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    let err = session.set_frequency_a(500_000_000).await.unwrap_err();
    assert!(matches!(err, CatError::Command(_)));

    // Nothing reached the radio
    assert!(radio.state().frames_seen.is_empty());
}

#[tokio::test]
async fn mode_get_and_set() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    assert_eq!(
        session.get_mode().await.unwrap(),
        DecodedMode::Known(OperatingMode::Usb)
    );

    session.set_mode(OperatingMode::DataUsb).await.unwrap();
    // Set commands are unacknowledged; let the sim pump process the frame
    tokio::task::yield_now().await;
    assert_eq!(radio.state().mode, OperatingMode::DataUsb);
    assert_eq!(
        session.get_mode().await.unwrap(),
        DecodedMode::Known(OperatingMode::DataUsb)
    );
}

#[tokio::test]
async fn power_request_is_clamped_on_the_wire() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    let sent = session.set_power_level(150).await.unwrap();
    assert_eq!(sent, 100);
    assert_eq!(session.get_power_level().await.unwrap(), 100);

    let sent = session.set_power_level(0).await.unwrap();
    assert_eq!(sent, 5);

    // Set commands are unacknowledged; let the sim pump process the frame
    tokio::task::yield_now().await;
    let frames = radio.state().frames_seen.clone();
    assert!(frames.contains(&"PC100".to_string()));
    assert!(frames.contains(&"PC005".to_string()));
    // The raw request values never crossed the wire
    assert!(!frames.iter().any(|f| f == "PC150" || f == "PC000"));
}

#[tokio::test]
async fn meters_and_transmit_state() {
    let radio = SimRadio::new(SimConfig {
        s_meter: 120,
        ..SimConfig::default()
    });
    let mut session = sim_session(&radio, test_config());

    assert_eq!(session.get_s_meter().await.unwrap(), 120);
    assert_eq!(session.get_power_meter().await.unwrap(), 0);
    assert!(!session.is_transmitting().await.unwrap());

    session.ptt_on().await.unwrap();
    assert!(session.is_transmitting().await.unwrap());
    session.ptt_off().await.unwrap();
    assert!(!session.is_transmitting().await.unwrap());
}

#[tokio::test]
async fn ptt_off_is_idempotent() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    session.ptt_off().await.unwrap();
    session.ptt_off().await.unwrap();
    // Set commands are unacknowledged; let the sim pump process the frames
    tokio::task::yield_now().await;
    assert!(!radio.state().ptt);
    assert_eq!(radio.state().frames_seen, vec!["TX0", "TX0"]);
}

#[tokio::test]
async fn squelch_and_id() {
    let radio = SimRadio::new(SimConfig {
        squelch_open: true,
        ..SimConfig::default()
    });
    let mut session = sim_session(&radio, test_config());

    assert!(session.get_squelch_status().await.unwrap());
    assert_eq!(session.get_id().await.unwrap(), "0670");
}

#[tokio::test]
async fn vfo_swap_and_copy() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    session.swap_vfo().await.unwrap();
    assert_eq!(session.get_frequency_a().await.unwrap(), 7_074_000);
    assert_eq!(session.get_frequency_b().await.unwrap(), 14_250_000);

    session.copy_vfo_a_to_b().await.unwrap();
    assert_eq!(session.get_frequency_b().await.unwrap(), 7_074_000);
}

#[tokio::test]
async fn commands_are_rate_spaced() {
    let radio = SimRadio::new(SimConfig::default());
    let config = SessionConfig {
        min_command_interval_ms: 50,
        ..test_config()
    };
    let mut session = sim_session(&radio, config);

    let start = Instant::now();
    session.get_frequency_a().await.unwrap();
    session.get_frequency_a().await.unwrap();
    session.get_frequency_a().await.unwrap();

    // Two enforced gaps between three commands
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn silent_radio_times_out_distinguishably() {
    let radio = SimRadio::new(SimConfig::default());
    radio.set_muted(true);
    let config = SessionConfig {
        reply_timeout_ms: 100,
        ..test_config()
    };
    let mut session = sim_session(&radio, config);

    let err = session.get_frequency_a().await.unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(err, CatError::Timeout(100)));
}

#[tokio::test]
async fn partial_frame_without_terminator_times_out() {
    // A device that answers with valid digits but never the terminator.
    let (host, mut device) = tokio::io::duplex(256);
    tokio::spawn(async move {
        let mut buf = [0u8; 64];
        if device.read(&mut buf).await.is_ok() {
            let _ = device.write_all(b"FA014074000").await;
        }
        // Hold the stream open past the session's deadline
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let config = SessionConfig {
        reply_timeout_ms: 150,
        ..test_config()
    };
    let mut session = CatSession::with_io(host, config);

    // The partial frame must never be parsed as a frequency
    let err = session.get_frequency_a().await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn stale_frames_are_discarded_before_the_reply() {
    // A device that floods an unrelated frame ahead of the real answer.
    let (host, mut device) = tokio::io::duplex(256);
    tokio::spawn(async move {
        let mut buf = [0u8; 64];
        if device.read(&mut buf).await.is_ok() {
            let _ = device.write_all(b"SM0042;FA014074000;").await;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let mut session = CatSession::with_io(host, test_config());
    assert_eq!(session.get_frequency_a().await.unwrap(), 14_074_000);
}

#[tokio::test]
async fn probe_reports_silent_radio_without_failing() {
    let radio = SimRadio::new(SimConfig::default());
    radio.set_muted(true);
    let config = SessionConfig {
        reply_timeout_ms: 100,
        ..test_config()
    };
    let mut session = sim_session(&radio, config);

    assert!(!session.probe().await.unwrap());
    assert!(session.is_connected());

    radio.set_muted(false);
    assert!(session.probe().await.unwrap());
}

#[tokio::test]
async fn disconnect_always_unkeys_the_transmitter() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    session.ptt_on().await.unwrap();
    // Set commands are unacknowledged; let the sim pump process the frame
    tokio::task::yield_now().await;
    assert!(radio.state().ptt);

    session.disconnect().await;

    tokio::task::yield_now().await;
    let state = radio.state();
    assert!(!state.ptt);
    assert_eq!(state.frames_seen.last().unwrap(), "TX0");
    drop(state);

    assert!(!session.is_connected());
    assert!(matches!(
        session.get_frequency_a().await.unwrap_err(),
        CatError::NotConnected
    ));

    // Idempotent
    session.disconnect().await;
}

#[tokio::test]
async fn tune_ft8_sets_dial_and_data_mode() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    let dial = session.tune_ft8("20m").await.unwrap();
    assert_eq!(dial, 14_074_000);

    // Set commands are unacknowledged; let the sim pump process the frames
    tokio::task::yield_now().await;
    let state = radio.state();
    assert_eq!(state.frequency_a, 14_074_000);
    assert_eq!(state.mode, OperatingMode::DataUsb);
    drop(state);

    assert!(matches!(
        session.tune_ft8("23cm").await.unwrap_err(),
        CatError::UnknownBand(_)
    ));
}

#[tokio::test]
async fn raw_passthrough_returns_the_reply_frame() {
    let radio = SimRadio::new(SimConfig::default());
    let mut session = sim_session(&radio, test_config());

    assert_eq!(session.raw("ID").await.unwrap(), "ID0670");
    assert_eq!(session.raw("ID;").await.unwrap(), "ID0670");
}

#[tokio::test]
async fn status_snapshot_collects_every_field() {
    let radio = SimRadio::new(SimConfig {
        s_meter: 84,
        squelch_open: true,
        ..SimConfig::default()
    });
    let mut session = sim_session(&radio, test_config());

    let status = session.status().await.unwrap();
    assert_eq!(status.frequency_a, Some(14_250_000));
    assert_eq!(status.frequency_b, Some(7_074_000));
    assert_eq!(status.mode, Some(DecodedMode::Known(OperatingMode::Usb)));
    assert_eq!(status.tx_active, Some(false));
    assert_eq!(status.squelch_open, Some(true));
    assert_eq!(status.s_meter, Some(84));
    assert_eq!(status.power_output, Some(100));
    assert_eq!(status.swr, Some(0));
}

#[tokio::test]
async fn snapshot_reports_a_timed_out_field_as_none() {
    let radio = SimRadio::new(SimConfig {
        s_meter: 84,
        ..SimConfig::default()
    });
    // Only the S-meter query goes unanswered
    radio.mute_frame("SM0");
    let config = SessionConfig {
        reply_timeout_ms: 100,
        ..test_config()
    };
    let mut session = sim_session(&radio, config);

    let status = session.status().await.unwrap();
    assert_eq!(status.s_meter, None);
    assert_eq!(status.frequency_a, Some(14_250_000));
    assert_eq!(status.frequency_b, Some(7_074_000));
    assert_eq!(status.power_output, Some(100));
    assert_eq!(status.swr, Some(0));
}

#[tokio::test]
async fn scan_restores_frequency_and_mode() {
    let radio = SimRadio::new(SimConfig {
        s_meter: 30,
        ..SimConfig::default()
    });
    let mut session = sim_session(&radio, test_config());

    let points = {
        let mut scanner = BandScanner::new(&mut session);
        scanner
            .scan_band(14_000_000, 14_010_000, 5_000, Duration::from_millis(1))
            .await
            .unwrap()
    };

    assert_eq!(points.len(), 3);
    assert_eq!(points[0].frequency_hz, 14_000_000);
    assert_eq!(points[2].frequency_hz, 14_010_000);
    assert!(points.iter().all(|p| p.s_meter == 30));

    // Pre-scan state came back
    let state = radio.state();
    assert_eq!(state.frequency_a, 14_250_000);
    assert_eq!(state.mode, OperatingMode::Usb);
}

#[tokio::test]
async fn find_activity_restores_the_operators_mode() {
    // The sweep retunes through LSB and USB segments; the radio must
    // come back in the mode it started in, not the last scan mode.
    let radio = SimRadio::new(SimConfig {
        frequency_a: 146_520_000,
        mode: OperatingMode::C4fm,
        ..SimConfig::default()
    });
    let config = SessionConfig {
        min_command_interval_ms: 1,
        ..test_config()
    };
    let mut session = sim_session(&radio, config);

    let hits = {
        let mut scanner = BandScanner::new(&mut session);
        scanner
            .find_activity(255, Duration::ZERO)
            .await
            .unwrap()
    };

    // s_meter defaults to 0, so nothing clears the threshold
    assert!(hits.is_empty());

    // Set commands are unacknowledged; let the sim pump process the frames
    tokio::task::yield_now().await;
    let state = radio.state();
    assert_eq!(state.mode, OperatingMode::C4fm);
    assert_eq!(state.frequency_a, 146_520_000);
}
