//! `ft991`: command-line CAT control for the FT-991A
//!
//! Every invocation opens a session, runs one subcommand, and
//! disconnects (which always de-asserts PTT). `--simulate` swaps the
//! serial port for the in-process virtual radio, so the whole command
//! surface works without hardware.

use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use ft991_protocol::OperatingMode;
use ft991_session::{BandScanner, CatSession, SessionConfig};
use ft991_sim::{SimConfig, SimRadio};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ft991", version, about = "Yaesu FT-991A CAT control")]
struct Cli {
    /// Serial port path
    #[arg(short, long, default_value = "/dev/ttyUSB0", global = true)]
    port: String,

    /// Baud rate (must match radio menu item 031)
    #[arg(long, default_value_t = 38_400, global = true)]
    baud: u32,

    /// Reply deadline in milliseconds
    #[arg(long, default_value_t = 1_000, global = true)]
    timeout_ms: u64,

    /// Run against a built-in virtual radio instead of hardware
    #[arg(long, global = true)]
    simulate: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a full status snapshot
    Status {
        /// Emit JSON instead of the human-readable table
        #[arg(long)]
        json: bool,
        /// Repeat every N seconds until interrupted
        #[arg(long, value_name = "SECONDS")]
        watch: Option<u64>,
    },
    /// Get or set the VFO-A frequency in Hz
    Freq {
        /// Frequency to tune to; omit to read the current value
        hz: Option<u64>,
        /// Operate on VFO-B instead
        #[arg(long)]
        vfo_b: bool,
    },
    /// Get or set the operating mode (USB, LSB, CW, DATA-USB, ...)
    Mode { mode: Option<String> },
    /// Get or set the RF power output in watts (5-100)
    Power { watts: Option<u8> },
    /// Key or unkey the transmitter
    Ptt {
        action: PttAction,
        /// Required to key up; `ptt on` without it refuses to transmit
        #[arg(long)]
        confirm: bool,
    },
    /// Sweep a frequency range and report S-meter readings
    Scan {
        start_hz: u64,
        end_hz: u64,
        /// Step size in Hz
        #[arg(long, default_value_t = 5_000)]
        step: u64,
        /// Settle time at each stop, in milliseconds
        #[arg(long, default_value_t = 200)]
        dwell_ms: u64,
    },
    /// Sweep the HF voice segments for signals above a threshold
    Activity {
        /// Raw S-meter threshold (0-255; 28 per S-unit)
        #[arg(long, default_value_t = 56)]
        threshold: u16,
        /// Settle time at each stop, in milliseconds
        #[arg(long, default_value_t = 150)]
        dwell_ms: u64,
    },
    /// Tune to a band's FT8 dial frequency in DATA-USB
    Ft8 { band: String },
    /// Tune to a band's FT4 dial frequency in DATA-USB
    Ft4 { band: String },
    /// Tune to a band's JS8Call dial frequency in DATA-USB
    Js8 { band: String },
    /// Send a raw CAT command and print the reply frame
    Raw { command: String },
    /// List serial ports on this machine
    Ports,
}

#[derive(Clone, Copy, ValueEnum)]
enum PttAction {
    On,
    Off,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if matches!(cli.command, Command::Ports) {
        return list_ports();
    }

    let config = SessionConfig {
        port: cli.port.clone(),
        baud: cli.baud,
        reply_timeout_ms: cli.timeout_ms,
        ..SessionConfig::default()
    };

    if cli.simulate {
        info!("using the built-in simulated radio");
        let radio = SimRadio::new(SimConfig::default());
        let io = ft991_sim::task::spawn(radio);
        let mut session = CatSession::with_io(io, config);
        let result = run(&mut session, &cli.command).await;
        session.disconnect().await;
        result
    } else {
        info!("connecting to {} at {} baud", cli.port, cli.baud);
        let mut session = CatSession::new(config);
        if !session
            .connect()
            .await
            .with_context(|| format!("connecting to {}", cli.port))?
        {
            bail!(
                "{} opened but the radio did not respond; check power and menu item 031",
                cli.port
            );
        }
        let result = run(&mut session, &cli.command).await;
        session.disconnect().await;
        result
    }
}

async fn run<T>(session: &mut CatSession<T>, command: &Command) -> anyhow::Result<()>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    match command {
        Command::Status { json, watch } => loop {
            let status = session.status().await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
            match watch {
                Some(secs) => {
                    tokio::time::sleep(Duration::from_secs(*secs)).await;
                    if !*json {
                        println!();
                    }
                }
                None => break,
            }
        },
        Command::Freq { hz: None, vfo_b } => {
            let hz = if *vfo_b {
                session.get_frequency_b().await?
            } else {
                session.get_frequency_a().await?
            };
            println!("{} Hz ({})", hz, fmt_mhz(hz));
        }
        Command::Freq {
            hz: Some(hz),
            vfo_b,
        } => {
            if *vfo_b {
                session.set_frequency_b(*hz).await?;
            } else {
                session.set_frequency_a(*hz).await?;
            }
            println!("tuned to {}", fmt_mhz(*hz));
        }
        Command::Mode { mode: None } => {
            println!("{}", session.get_mode().await?);
        }
        Command::Mode { mode: Some(name) } => {
            let mode = OperatingMode::from_name(name)
                .with_context(|| format!("unknown mode {:?}", name))?;
            session.set_mode(mode).await?;
            println!("mode set to {}", mode);
        }
        Command::Power { watts: None } => {
            println!("{} W", session.get_power_level().await?);
        }
        Command::Power { watts: Some(watts) } => {
            let sent = session.set_power_level(*watts).await?;
            println!("power set to {} W", sent);
        }
        Command::Ptt { action, confirm } => match action {
            PttAction::On => {
                if !*confirm {
                    bail!("refusing to key the transmitter without --confirm");
                }
                session.ptt_on().await?;
                println!("TRANSMITTING; run `ft991 ptt off` to unkey");
            }
            PttAction::Off => {
                session.ptt_off().await?;
                println!("PTT off");
            }
        },
        Command::Scan {
            start_hz,
            end_hz,
            step,
            dwell_ms,
        } => {
            let mut scanner = BandScanner::new(session);
            let points = scanner
                .scan_band(*start_hz, *end_hz, *step, Duration::from_millis(*dwell_ms))
                .await?;
            for point in &points {
                println!(
                    "{}  S-meter {:3}  ({})",
                    fmt_mhz(point.frequency_hz),
                    point.s_meter,
                    s_bar(point.s_meter)
                );
            }
        }
        Command::Activity {
            threshold,
            dwell_ms,
        } => {
            let mut scanner = BandScanner::new(session);
            let hits = scanner
                .find_activity(*threshold, Duration::from_millis(*dwell_ms))
                .await?;
            if hits.is_empty() {
                println!("no activity above threshold {}", threshold);
            }
            for hit in &hits {
                println!(
                    "{:>4}  {}  S{}  (raw {})",
                    hit.band,
                    fmt_mhz(hit.frequency_hz),
                    hit.s_units,
                    hit.s_meter
                );
            }
        }
        Command::Ft8 { band } => {
            let dial = session.tune_ft8(band).await?;
            println!("FT8 on {}: {}", band, fmt_mhz(dial));
        }
        Command::Ft4 { band } => {
            let dial = session.tune_ft4(band).await?;
            println!("FT4 on {}: {}", band, fmt_mhz(dial));
        }
        Command::Js8 { band } => {
            let dial = session.tune_js8(band).await?;
            println!("JS8 on {}: {}", band, fmt_mhz(dial));
        }
        Command::Raw { command } => {
            println!("{}", session.raw(command).await?);
        }
        // Handled before a session exists; kept total for the match
        Command::Ports => list_ports()?,
    }

    Ok(())
}

fn print_status(status: &ft991_session::RadioStatus) {
    let freq = |hz: Option<u64>| hz.map_or("?".to_string(), fmt_mhz);
    println!("VFO-A:    {}", freq(status.frequency_a));
    println!("VFO-B:    {}", freq(status.frequency_b));
    println!(
        "Mode:     {}",
        status
            .mode
            .as_ref()
            .map_or("?".to_string(), |m| m.to_string())
    );
    println!(
        "TX:       {}",
        match status.tx_active {
            Some(true) => "TRANSMITTING",
            Some(false) => "receiving",
            None => "?",
        }
    );
    println!(
        "Squelch:  {}",
        match status.squelch_open {
            Some(true) => "open (signal)",
            Some(false) => "closed",
            None => "?",
        }
    );
    if let Some(s) = status.s_meter {
        println!("S-meter:  {:3} ({})", s, s_bar(s));
    }
    if let Some(w) = status.power_output {
        println!("Power:    {} W", w);
    }
    if let Some(swr) = status.swr {
        println!("SWR:      {} (raw)", swr);
    }
}

fn fmt_mhz(hz: u64) -> String {
    format!("{:.6} MHz", hz as f64 / 1e6)
}

/// Crude bar graph for raw S-meter readings, one block per S-unit
fn s_bar(raw: u16) -> String {
    let units = ft991_session::scanner::s_units(raw) as usize;
    format!("S{}{}", units, "#".repeat(units))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_ports() -> anyhow::Result<()> {
    let ports = serialport::available_ports().context("enumerating serial ports")?;
    if ports.is_empty() {
        println!("no serial ports found");
        return Ok(());
    }
    for port in ports {
        match port.port_type {
            serialport::SerialPortType::UsbPort(usb) => {
                println!(
                    "{}  USB {:04x}:{:04x}  {}",
                    port.port_name,
                    usb.vid,
                    usb.pid,
                    usb.product.as_deref().unwrap_or("")
                );
            }
            _ => println!("{}", port.port_name),
        }
    }
    Ok(())
}
