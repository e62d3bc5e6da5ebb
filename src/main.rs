//! # AnyRC Bridge
//!
//! Turn keyboard and joystick input into RC servo channels and forward them
//! to a microcontroller over USB serial.
//!
//! Usage: `anyrc-bridge [config.toml]`. Operator commands are read from stdin
//! (see [`anyrc_bridge::input::command`]).

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use anyrc_bridge::config::{Config, SerialConfig};
use anyrc_bridge::display::{publish_all, ChannelSink, TracingDisplay};
use anyrc_bridge::input::Command;
use anyrc_bridge::serial::{LinkStatus, McuSerial};
use anyrc_bridge::session::Session;
use anyrc_bridge::telemetry::JsonlRecorder;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for AnyRC Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (defaults if the file is missing)
///    - Try to open the serial link to the microcontroller
///
/// 2. **Main Loop**
///    - Every tick: check the config file for changes, mix the current
///      inputs, publish to display/recorder, send to the microcontroller
///    - Every reconnect interval: reopen the link if it is down
///    - Apply operator commands from stdin as they arrive
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if the configuration file exists but is invalid, or the
/// telemetry directory cannot be created
#[tokio::main]
async fn main() -> Result<()> {
    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("AnyRC Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = load_config(&config_path)?;
    let mut config_mtime = modified_time(&config_path);

    let mut session = Session::new(&config);
    let mut sinks = build_sinks(&config)?;
    let mut link = connect(&config);

    let mut tick_interval = make_interval(config.mixer.tick_interval_ms);
    let mut reconnect_interval = make_interval(config.serial.reconnect_interval_ms);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    info!(
        "Mixing in {} at {} ms per tick",
        session.engine().mode(),
        config.mixer.tick_interval_ms
    );
    info!("Channels held neutral until a `start` command; press Ctrl+C to exit");

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let mtime = modified_time(&config_path);
                if mtime.is_some() && mtime != config_mtime {
                    config_mtime = mtime;
                    match Config::load(&config_path) {
                        Ok(new_config) => {
                            session.reload(&new_config);
                            if new_config.mixer.tick_interval_ms != config.mixer.tick_interval_ms {
                                tick_interval = make_interval(new_config.mixer.tick_interval_ms);
                            }
                            if new_config.serial.reconnect_interval_ms != config.serial.reconnect_interval_ms {
                                reconnect_interval = make_interval(new_config.serial.reconnect_interval_ms);
                            }
                            if link_settings_changed(&config.serial, &new_config.serial) {
                                info!("Serial settings changed, reopening link");
                                // Release the old port before opening what may be the same device
                                drop(link.take());
                                link = connect(&new_config);
                            }
                            match build_sinks(&new_config) {
                                Ok(new_sinks) => sinks = new_sinks,
                                Err(e) => warn!("Keeping previous sinks: {}", e),
                            }
                            config = new_config;
                        }
                        Err(e) => warn!("Ignoring invalid configuration change: {}", e),
                    }
                }

                if let Some(channels) = session.tick() {
                    publish_all(&mut sinks, session.engine().mode(), &channels);
                }

                if let Some(serial) = link.as_mut().filter(|l| l.is_connected()) {
                    if let Err(e) = serial.send_channels(&session.channels()).await {
                        debug!("Failed to send channels: {}", e);
                    }
                }
            }

            _ = reconnect_interval.tick() => {
                if !link.as_ref().is_some_and(|l| l.is_connected()) {
                    link = connect(&config);
                }
            }

            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => handle_line(&mut session, link.as_ref(), &line),
                    Ok(None) => {
                        debug!("stdin closed, operator commands disabled");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        stdin_open = false;
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total ticks: {}", session.engine().ticks());
                if let Some(serial) = link.as_ref() {
                    info!("Total frames sent: {}", serial.frames_sent());
                }
                break;
            }
        }
    }

    Ok(())
}

/// Loads the configuration, falling back to defaults if the file is absent
fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!("{} not found, using default configuration", path.display());
        return Ok(Config::default());
    }
    let config = Config::load(path)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn make_interval(period_ms: u64) -> Interval {
    let mut ticker = interval(Duration::from_millis(period_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Whether an open link has to be reopened to pick up new settings
fn link_settings_changed(old: &SerialConfig, new: &SerialConfig) -> bool {
    old.port != new.port || old.baud_rate != new.baud_rate || old.timeout_ms != new.timeout_ms
}

fn build_sinks(config: &Config) -> Result<Vec<Box<dyn ChannelSink>>> {
    let mut sinks: Vec<Box<dyn ChannelSink>> = Vec::new();
    if config.display.enabled {
        sinks.push(Box::new(TracingDisplay::new(config.display.every_ticks)));
    }
    if config.telemetry.enabled {
        sinks.push(Box::new(JsonlRecorder::from_config(&config.telemetry)?));
    }
    Ok(sinks)
}

fn connect(config: &Config) -> Option<McuSerial> {
    match McuSerial::open(&config.serial) {
        Ok(serial) => {
            info!("USB Status: {} ({})", LinkStatus::Connected, serial.device_path());
            Some(serial)
        }
        Err(e) => {
            debug!("USB Status: {} ({})", LinkStatus::Disconnected, e);
            None
        }
    }
}

fn handle_line(session: &mut Session, link: Option<&McuSerial>, line: &str) {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return,
        Err(e) => {
            warn!("{}", e);
            return;
        }
    };

    if command == Command::Status {
        let status = link.map_or(LinkStatus::Disconnected, |l| l.status());
        info!("USB Status: {}", status);
    }

    if let Err(e) = session.apply(command) {
        warn!("{}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/anyrc.toml")).unwrap();
        assert_eq!(config.mixer.tick_interval_ms, 100);
    }

    #[test]
    fn test_build_sinks_respects_flags() {
        let mut config = Config::default();
        assert_eq!(build_sinks(&config).unwrap().len(), 1);

        config.display.enabled = false;
        assert!(build_sinks(&config).unwrap().is_empty());
    }

    #[test]
    fn test_handle_line_applies_commands() {
        let mut session = Session::new(&Config::default());
        handle_line(&mut session, None, "start");
        handle_line(&mut session, None, "bind 0 w");
        handle_line(&mut session, None, "press w");
        handle_line(&mut session, None, "not a command");
        handle_line(&mut session, None, "status");
        assert_eq!(session.tick().unwrap()[0], 2000);
    }

    #[test]
    fn test_link_settings_changed() {
        let old = Config::default().serial;

        let mut new = old.clone();
        assert!(!link_settings_changed(&old, &new));

        new.reconnect_interval_ms = 5000;
        assert!(!link_settings_changed(&old, &new));

        new.port = "/dev/ttyUSB1".to_string();
        assert!(link_settings_changed(&old, &new));

        let mut new = old.clone();
        new.baud_rate = 57_600;
        assert!(link_settings_changed(&old, &new));

        let mut new = old.clone();
        new.timeout_ms = 250;
        assert!(link_settings_changed(&old, &new));
    }

    #[test]
    fn test_modified_time_missing_file() {
        assert!(modified_time(Path::new("/nonexistent/anyrc.toml")).is_none());
    }
}
