//! Configuration sources.
//!
//! Implements [`ConfigPort`].
//!
//! - **`target_os = "espidf"`**: [`BuildConfig`] bakes endpoint URLs and WiFi
//!   credentials in at compile time from `COOPDASH_*` environment variables.
//! - **all other targets**: [`FileConfig`] reads a JSON document from the
//!   path in `COOPDASH_CONFIG`, or starts from defaults with the URL
//!   variables applied on top.

use crate::app::ports::ConfigPort;
use crate::config::DashboardConfig;
use crate::error::ConfigError;

/// Apply URL / credential overrides onto a config.
fn apply_overrides(
    config: &mut DashboardConfig,
    detection_url: Option<&str>,
    environment_url: Option<&str>,
    wifi: Option<(&str, &str)>,
) -> Result<(), ConfigError> {
    if let Some(url) = detection_url {
        config.detection_url = url.into();
    }
    if let Some(url) = environment_url {
        config.environment_url = url.into();
    }
    if let Some((ssid, password)) = wifi {
        config.wifi_ssid = ssid
            .try_into()
            .map_err(|()| ConfigError::ValidationFailed("wifi_ssid longer than 32 bytes"))?;
        config.wifi_password = password
            .try_into()
            .map_err(|()| ConfigError::ValidationFailed("wifi_password longer than 64 bytes"))?;
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Build-time config (firmware)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct BuildConfig;

#[cfg(target_os = "espidf")]
impl ConfigPort for BuildConfig {
    fn load(&self) -> Result<DashboardConfig, ConfigError> {
        let mut config = DashboardConfig::default();
        let wifi = option_env!("COOPDASH_WIFI_SSID")
            .map(|ssid| (ssid, option_env!("COOPDASH_WIFI_PASSWORD").unwrap_or("")));
        apply_overrides(
            &mut config,
            option_env!("COOPDASH_DETECTION_URL"),
            option_env!("COOPDASH_ENVIRONMENT_URL"),
            wifi,
        )?;
        config.validate()?;
        Ok(config)
    }
}

// ───────────────────────────────────────────────────────────────
// File / environment config (host)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct FileConfig {
    path: Option<std::path::PathBuf>,
    detection_url: Option<String>,
    environment_url: Option<String>,
}

#[cfg(not(target_os = "espidf"))]
impl FileConfig {
    /// Read a specific JSON file; no environment overrides.
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            detection_url: None,
            environment_url: None,
        }
    }

    /// `COOPDASH_CONFIG`, `COOPDASH_DETECTION_URL`, `COOPDASH_ENVIRONMENT_URL`.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("COOPDASH_CONFIG").map(Into::into),
            detection_url: std::env::var("COOPDASH_DETECTION_URL").ok(),
            environment_url: std::env::var("COOPDASH_ENVIRONMENT_URL").ok(),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl ConfigPort for FileConfig {
    fn load(&self) -> Result<DashboardConfig, ConfigError> {
        let mut config = match &self.path {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => ConfigError::NotFound,
                    _ => ConfigError::IoError,
                })?;
                DashboardConfig::from_json(&bytes)?
            }
            None => DashboardConfig::default(),
        };
        apply_overrides(
            &mut config,
            self.detection_url.as_deref(),
            self.environment_url.as_deref(),
            None,
        )?;
        config.validate()?;
        Ok(config)
    }
}
