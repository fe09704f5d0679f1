//! Error types for the dashboard controller.
//!
//! None of these are fatal.  Fetch errors degrade a reading to its
//! defaults, config errors fall back to [`DashboardConfig::default()`],
//! and display errors are logged and retried on the next render.
//!
//! [`DashboardConfig::default()`]: crate::config::DashboardConfig

use core::fmt;

// ---------------------------------------------------------------------------
// Fetch errors (telemetry sources)
// ---------------------------------------------------------------------------

/// Transport-level failure while talking to a telemetry endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// Connection refused, DNS failure, reset, etc.
    Connect,
    /// The transport timeout fired before a full response arrived.
    Timeout,
    /// The endpoint answered with a non-2xx status code.
    Status(u16),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection failed"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
        }
    }
}

/// Result of a failed [`TelemetrySource::fetch`](crate::app::ports::TelemetrySource::fetch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Network(NetworkError),
    /// Malformed or type-mismatched JSON; carries the parser diagnostic.
    Decode(String),
}

impl FetchError {
    pub fn decode(msg: impl fmt::Display) -> Self {
        Self::Decode(format!("{msg}"))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Decode(msg) => write!(f, "decode: {msg}"),
        }
    }
}

impl From<NetworkError> for FetchError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from [`ConfigPort`](crate::app::ports::ConfigPort) and config validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No stored config was found (first boot, no file).
    NotFound,
    /// Stored config could not be deserialized.
    Corrupted,
    /// A field failed range validation.  The message names the field.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

/// The display driver could not clock data out to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// A GPIO write on the clock or data line failed.
    PinWriteFailed,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinWriteFailed => write!(f, "display pin write failed"),
        }
    }
}
