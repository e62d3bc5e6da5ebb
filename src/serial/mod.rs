//! # Serial Communication Module
//!
//! Handles the serial link to the microcontroller driving the servos.
//!
//! This module handles:
//! - Opening the serial port (configured path or auto-detected candidates)
//! - Encoding channel vectors into text frames
//! - Async, time-bounded writes
//! - Tracking connected/disconnected link status

pub mod encoder;
pub mod port_trait;

use std::fmt;
use std::time::Duration;

use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::config::SerialConfig;
use crate::error::{AnyRcError, Result};
use crate::mixer::protocol::ChannelVector;
use encoder::encode_channels_frame;
use port_trait::{SerialPortIO, TokioSerialPort};

/// Default baud rate of the microcontroller sketch
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default write timeout
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(100);

/// Default device paths to try (in order of preference)
pub const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // Native USB boards (Uno R3, Leonardo)
    "/dev/ttyUSB0", // CH340/FTDI USB-to-serial clones
];

/// Link status as shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Connected => f.write_str("Connected"),
            LinkStatus::Disconnected => f.write_str("Disconnected"),
        }
    }
}

/// Serial link to the microcontroller
///
/// Generic over the port so tests can substitute a mock.
pub struct McuSerial<P: SerialPortIO = TokioSerialPort> {
    /// Serial port handle
    port: P,
    /// Device path (e.g., /dev/ttyACM0)
    device_path: String,
    /// Upper bound for a single write + flush
    write_timeout: Duration,
    /// Cleared on the first failed write
    connected: bool,
    /// Frames written successfully
    frames_sent: u64,
}

impl<P: SerialPortIO> fmt::Debug for McuSerial<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McuSerial")
            .field("device_path", &self.device_path)
            .field("connected", &self.connected)
            .field("frames_sent", &self.frames_sent)
            .finish_non_exhaustive()
    }
}

impl McuSerial<TokioSerialPort> {
    /// Open the link described by the configuration
    ///
    /// An empty `port` tries [`DEFAULT_DEVICE_PATHS`] in order.
    ///
    /// # Errors
    ///
    /// Returns `SerialPortNotFound` if no candidate could be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use anyrc_bridge::config::SerialConfig;
    /// use anyrc_bridge::serial::McuSerial;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let serial = McuSerial::open(&SerialConfig::default())?;
    ///     println!("Connected to: {}", serial.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let link = if config.port.is_empty() {
            Self::open_with_paths(DEFAULT_DEVICE_PATHS, config.baud_rate)?
        } else {
            Self::open_with_paths(&[config.port.as_str()], config.baud_rate)?
        };
        Ok(link.with_write_timeout(timeout))
    }

    /// Open the link trying each path in turn
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyACM0"])
    /// * `baud_rate` - Line speed
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Successfully opened microcontroller at {} ({} baud)", path, baud_rate);
                    return Ok(Self::with_port(TokioSerialPort::new(port), path));
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(AnyRcError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with 8N1 settings
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| AnyRcError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }
}

impl<P: SerialPortIO> McuSerial<P> {
    /// Wrap an already opened port
    pub fn with_port(port: P, device_path: &str) -> Self {
        Self {
            port,
            device_path: device_path.to_string(),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            connected: true,
            frames_sent: 0,
        }
    }

    /// Override the write timeout
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Encode and send one channel vector
    ///
    /// # Errors
    ///
    /// Returns `Serial` if the link is down or the write fails or times out.
    /// A failed write marks the link disconnected.
    pub async fn send_channels(&mut self, channels: &ChannelVector) -> Result<()> {
        let frame = encode_channels_frame(channels);
        self.send_packet(&frame).await
    }

    /// Send a raw frame to the microcontroller
    ///
    /// # Errors
    ///
    /// Returns `Serial` if the link is down or the write fails or times out
    pub async fn send_packet(&mut self, packet: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(AnyRcError::Serial(format!("{} is disconnected", self.device_path)));
        }

        let write_timeout = self.write_timeout;
        let result = tokio::time::timeout(write_timeout, async {
            self.port.write_all(packet).await
                .map_err(|e| AnyRcError::Serial(format!("Failed to write packet: {}", e)))?;
            self.port.flush().await
                .map_err(|e| AnyRcError::Serial(format!("Failed to flush serial port: {}", e)))
        })
        .await
        .unwrap_or_else(|_| {
            Err(AnyRcError::Serial(format!(
                "Write timed out after {} ms",
                write_timeout.as_millis()
            )))
        });

        match result {
            Ok(()) => {
                self.frames_sent += 1;
                debug!("Sent channel frame ({} bytes)", packet.len());
                Ok(())
            }
            Err(e) => {
                warn!("Link to {} lost: {}", self.device_path, e);
                self.connected = false;
                Err(e)
            }
        }
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Whether the last write succeeded
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connection status for display
    pub fn status(&self) -> LinkStatus {
        if self.connected {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }

    /// Frames written successfully since the link was opened
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}
