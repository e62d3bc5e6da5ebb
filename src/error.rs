//! # Error Types
//!
//! Custom error types for AnyRC Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for AnyRC Bridge
#[derive(Debug, Error)]
pub enum AnyRcError {
    /// Input frame did not carry exactly one value per channel
    #[error("Input length mismatch: expected {expected} inputs, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Channel value outside the PWM range
    #[error("Channel {index} value {value} is outside the PWM range 1000-2000")]
    ChannelOutOfRange { index: usize, value: u16 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial transport errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// None of the candidate serial devices could be opened
    #[error("No microcontroller found (tried: {0})")]
    SerialPortNotFound(String),

    /// Malformed operator command
    #[error("Invalid command: {0}")]
    Command(String),

    /// Telemetry record serialization errors
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] serde_json::Error),
}

/// Result type alias for AnyRC Bridge
pub type Result<T> = std::result::Result<T, AnyRcError>;
