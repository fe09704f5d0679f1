//! System configuration parameters
//!
//! All tunable parameters for the dashboard controller.  Values come from
//! a JSON document (host) or build-time environment (ESP-IDF); anything
//! not supplied keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Highest brightness level accepted by the display controller.
pub const MAX_BRIGHTNESS: u8 = 7;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    // --- Telemetry endpoints ---
    /// Detector node endpoint serving `{"Persons": n, "Birds": n}`
    pub detection_url: String,
    /// Sensor node endpoint serving `{"temperature": t, "door": "Open"|"Closed"}`
    pub environment_url: String,

    // --- Timing ---
    /// Period between fetch-aggregate-render cycles (milliseconds)
    pub poll_interval_ms: u32,
    /// Main loop tick; also the animation frame and connect retry period (milliseconds)
    pub tick_interval_ms: u32,
    /// Transport timeout for a single fetch (milliseconds)
    pub http_timeout_ms: u32,

    // --- Display ---
    /// Display brightness (0-7), applied once at startup
    pub brightness: u8,

    // --- Association ---
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            // Detector serves /detection_data on :8080
            detection_url: "http://detector.local:8080/detection_data".into(),
            environment_url: "http://sensors.local/data".into(),

            // Timing
            poll_interval_ms: 10_000, // every 10 s
            tick_interval_ms: 200,    // 5 Hz spinner
            http_timeout_ms: 5_000,

            brightness: MAX_BRIGHTNESS,

            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),
        }
    }
}

impl DashboardConfig {
    /// Decode and validate a JSON config document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|e| {
            log::warn!("Config: JSON rejected ({})", e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave the controller unable to poll or render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.detection_url) {
            return Err(ConfigError::ValidationFailed("detection_url must be a plain http:// URL"));
        }
        if !is_http_url(&self.environment_url) {
            return Err(ConfigError::ValidationFailed("environment_url must be a plain http:// URL"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be non-zero"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be non-zero"));
        }
        if self.tick_interval_ms >= self.poll_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "tick_interval_ms must be below poll_interval_ms",
            ));
        }
        if self.http_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("http_timeout_ms must be non-zero"));
        }
        if self.brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::ValidationFailed("brightness must be 0-7"));
        }
        Ok(())
    }
}

/// Both transports are built without TLS, so only `http://` is fetchable.
fn is_http_url(url: &str) -> bool {
    matches!(url.strip_prefix("http://"), Some(host) if !host.is_empty())
}
