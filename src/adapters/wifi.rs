//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! association.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: ESP-IDF WiFi driver via `esp_idf_svc::wifi::EspWifi`.
//!   Connect is non-blocking so the panel animation keeps running.
//! - **all other targets**: in-memory simulation for host-side tests.
//!   [`HostLink`] stands in on the host simulator, where association is
//!   the operating system's concern.
//!
//! ## Reconnection policy
//!
//! When the link drops, [`ConnectivityPort::poll`] retries with exponential
//! backoff (2 s → 4 s → 8 s … capped at 60 s).  If the lower layer
//! re-associates on its own in the meantime the adapter picks that up too.
//!
//! An initial attempt that is still pending after [`CONNECT_TIMEOUT_MS`] is
//! abandoned and issued again.  ESP-IDF does not retry a failed queued
//! connect by itself.

use core::fmt;
use log::{info, warn};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

pub trait ConnectivityPort {
    /// Start (or continue) an association attempt.  Non-blocking where the
    /// platform allows; check [`is_connected`](Self::is_connected) afterwards.
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Drive loss detection and backoff reconnects.  Call once per tick.
    fn poll(&mut self, now_ms: u64);
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    fn rssi(&self) -> Option<i8>;
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

const INITIAL_BACKOFF_SECS: u32 = 2;
const MAX_BACKOFF_SECS: u32 = 60;

/// How long an initial association attempt may stay pending before it is re-issued.
pub const CONNECT_TIMEOUT_MS: u64 = 10_000;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff_secs: u32,
    next_retry_ms: u64,
    /// Deadline of the pending initial attempt, armed by the first `poll` after it.
    attempt_deadline_ms: Option<u64>,
    last_rssi: Option<i8>,
    #[cfg(target_os = "espidf")]
    driver: Option<esp_idf_svc::wifi::EspWifi<'static>>,
    /// Simulation: whether the fake access point currently has us associated.
    #[cfg(not(target_os = "espidf"))]
    sim_link_up: bool,
    /// Simulation: number of upcoming connect attempts that should fail.
    #[cfg(not(target_os = "espidf"))]
    sim_failures_pending: u32,
    /// Simulation: attempts are accepted but never complete while set.
    #[cfg(not(target_os = "espidf"))]
    sim_ap_absent: bool,
    /// Simulation: attempts handed to the platform layer.
    #[cfg(not(target_os = "espidf"))]
    sim_attempts: u32,
}

impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_secs: INITIAL_BACKOFF_SECS,
            next_retry_ms: 0,
            attempt_deadline_ms: None,
            last_rssi: None,
            #[cfg(target_os = "espidf")]
            driver: None,
            #[cfg(not(target_os = "espidf"))]
            sim_link_up: false,
            #[cfg(not(target_os = "espidf"))]
            sim_failures_pending: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_ap_absent: false,
            #[cfg(not(target_os = "espidf"))]
            sim_attempts: 0,
        }
    }

    /// Take ownership of the ESP-IDF WiFi driver.
    #[cfg(target_os = "espidf")]
    pub fn with_driver(driver: esp_idf_svc::wifi::EspWifi<'static>) -> Self {
        let mut a = Self::new();
        a.driver = Some(driver);
        a
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Promote an in-flight attempt once the platform reports the link up.
    fn refresh(&mut self) {
        if matches!(self.state, WifiState::Connecting | WifiState::Reconnecting { .. })
            && self.platform_link_up()
        {
            let was_reconnecting = matches!(self.state, WifiState::Reconnecting { .. });
            self.state = WifiState::Connected;
            self.backoff_secs = INITIAL_BACKOFF_SECS;
            self.last_rssi = self.platform_rssi();
            if was_reconnecting {
                info!("WiFi: reconnected (RSSI={:?})", self.last_rssi);
            } else {
                info!("WiFi: connected (RSSI={:?})", self.last_rssi);
            }
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let driver = self.driver.as_mut().ok_or(ConnectivityError::ConnectionFailed)?;
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });
        driver
            .set_configuration(&config)
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        if !driver.is_started().unwrap_or(false) {
            driver.start().map_err(|_| ConnectivityError::ConnectionFailed)?;
        }
        // Returns once the request is queued; association completes in the background.
        driver.connect().map_err(|_| ConnectivityError::ConnectionFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        self.sim_attempts += 1;
        if self.sim_failures_pending > 0 {
            self.sim_failures_pending -= 1;
            warn!("WiFi(sim): simulated association failure");
            return Err(ConnectivityError::ConnectionFailed);
        }
        if self.sim_ap_absent {
            info!("WiFi(sim): attempt queued, no access point in range");
            return Ok(());
        }
        self.sim_link_up = true;
        info!("WiFi(sim): associated with '{}'", self.ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            if let Err(e) = driver.disconnect() {
                warn!("WiFi: disconnect failed ({})", e);
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim_link_up = false;
        info!("WiFi(sim): disconnected");
    }

    #[cfg(target_os = "espidf")]
    fn platform_link_up(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|d| d.is_up().unwrap_or(false))
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_link_up(&self) -> bool {
        self.sim_link_up
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        let mut ap_info = esp_idf_svc::sys::wifi_ap_record_t::default();
        // SAFETY: ap_info is a valid out-pointer for the duration of the call.
        let ret = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap_info) };
        (ret == esp_idf_svc::sys::ESP_OK as i32).then_some(ap_info.rssi)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        self.sim_link_up.then_some(-60)
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Simulate the access point dropping us.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.sim_link_up = false;
    }

    /// Make the next `n` association attempts fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, n: u32) {
        self.sim_failures_pending = n;
    }

    /// While `absent`, attempts queue without error but never associate.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_ap_absent(&mut self, absent: bool) {
        self.sim_ap_absent = absent;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_attempts(&self) -> u32 {
        self.sim_attempts
    }
}

impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        match self.state {
            WifiState::Connected if self.platform_link_up() => {
                return Err(ConnectivityError::AlreadyConnected)
            }
            WifiState::Connected => {
                warn!("WiFi: link dropped before it was noticed, starting over");
                self.last_rssi = None;
            }
            WifiState::Connecting => {
                self.refresh();
                return Ok(());
            }
            WifiState::Disconnected | WifiState::Reconnecting { .. } => {}
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.state = WifiState::Connecting;
        self.attempt_deadline_ms = None;
        if let Err(e) = self.platform_connect() {
            self.state = WifiState::Disconnected;
            return Err(e);
        }
        self.refresh();
        Ok(())
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        self.last_rssi = None;
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_link_up()
    }

    fn poll(&mut self, now_ms: u64) {
        match self.state {
            WifiState::Connected => {
                if self.platform_link_up() {
                    self.last_rssi = self.platform_rssi();
                } else {
                    warn!("WiFi: connection lost, retrying in {}s", self.backoff_secs);
                    self.state = WifiState::Reconnecting { attempt: 0 };
                    self.last_rssi = None;
                    self.next_retry_ms = now_ms + u64::from(self.backoff_secs) * 1000;
                }
            }
            WifiState::Reconnecting { attempt } => {
                self.refresh();
                if self.state == WifiState::Connected || now_ms < self.next_retry_ms {
                    return;
                }
                info!("WiFi: reconnect attempt {} (backoff {}s)", attempt + 1, self.backoff_secs);
                if let Err(e) = self.platform_connect() {
                    warn!("WiFi: reconnect failed ({})", e);
                }
                self.refresh();
                if self.state != WifiState::Connected {
                    self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
                    self.next_retry_ms = now_ms + u64::from(self.backoff_secs) * 1000;
                    self.state = WifiState::Reconnecting { attempt: attempt + 1 };
                }
            }
            WifiState::Connecting => {
                self.refresh();
                if self.state == WifiState::Connected {
                    return;
                }
                match self.attempt_deadline_ms {
                    None => self.attempt_deadline_ms = Some(now_ms + CONNECT_TIMEOUT_MS),
                    Some(deadline) if now_ms >= deadline => {
                        warn!("WiFi: no association after {}ms, retrying", CONNECT_TIMEOUT_MS);
                        self.platform_disconnect();
                        if let Err(e) = self.platform_connect() {
                            warn!("WiFi: connect failed ({})", e);
                            self.state = WifiState::Disconnected;
                            self.attempt_deadline_ms = None;
                            return;
                        }
                        self.attempt_deadline_ms = Some(now_ms + CONNECT_TIMEOUT_MS);
                        self.refresh();
                    }
                    Some(_) => {}
                }
            }
            WifiState::Disconnected => {}
        }
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        self.last_rssi
    }
}

// ───────────────────────────────────────────────────────────────
// Host link
// ───────────────────────────────────────────────────────────────

/// Always-associated link for the host simulator.
#[cfg(not(target_os = "espidf"))]
pub struct HostLink;

#[cfg(not(target_os = "espidf"))]
impl ConnectivityPort for HostLink {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        Ok(())
    }

    fn disconnect(&mut self) {}

    fn is_connected(&self) -> bool {
        true
    }

    fn poll(&mut self, _now_ms: u64) {}

    fn set_credentials(&mut self, _ssid: &str, _password: &str) -> Result<(), ConnectivityError> {
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
