//! Mock adapters for integration tests.
//!
//! Each mock records what the service asked of it so tests can assert on
//! the full call history without a network, a panel or a radio.

use std::collections::HashMap;

use coopdash::adapters::wifi::{ConnectivityError, ConnectivityPort};
use coopdash::app::events::AppEvent;
use coopdash::app::ports::{DisplayPort, EventSink, TelemetrySource};
use coopdash::drivers::segment::Segment;
use coopdash::error::{DisplayError, FetchError, NetworkError};
use serde_json::Value;

// ── MockSource ────────────────────────────────────────────────

/// Serves a fixed response per URL.  Unknown URLs fail with `Connect`.
pub struct MockSource {
    responses: HashMap<String, Result<Value, FetchError>>,
    pub requests: Vec<String>,
}

#[allow(dead_code)]
impl MockSource {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requests: Vec::new(),
        }
    }

    pub fn respond(&mut self, url: &str, response: Result<Value, FetchError>) {
        self.responses.insert(url.to_string(), response);
    }

    pub fn requests_for(&self, url: &str) -> usize {
        self.requests.iter().filter(|u| u.as_str() == url).count()
    }
}

impl TelemetrySource for MockSource {
    fn fetch(&mut self, url: &str) -> Result<Value, FetchError> {
        self.requests.push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Network(NetworkError::Connect)))
    }
}

// ── MockDisplay ───────────────────────────────────────────────

pub struct MockDisplay {
    pub brightness: Option<u8>,
    pub frames: Vec<[Segment; 4]>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self {
            brightness: None,
            frames: Vec::new(),
            fail_writes: false,
        }
    }

    pub fn last(&self) -> Option<[Segment; 4]> {
        self.frames.last().copied()
    }

    /// Writes that lit exactly one segment across the whole panel.
    pub fn spinner_frames(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| f.iter().map(|s| s.count_ones()).sum::<u32>() == 1)
            .count()
    }
}

impl DisplayPort for MockDisplay {
    fn init(&mut self, brightness: u8) -> Result<(), DisplayError> {
        self.brightness = Some(brightness);
        Ok(())
    }

    fn write(&mut self, segments: &[Segment; 4]) -> Result<(), DisplayError> {
        if self.fail_writes {
            return Err(DisplayError::PinWriteFailed);
        }
        self.frames.push(*segments);
        Ok(())
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// Association that comes up after a set number of connect attempts.
pub struct MockLink {
    pub up: bool,
    pub connect_calls: u32,
    pub poll_calls: u32,
    /// Connect attempts that fail before one succeeds.
    pub refuse: u32,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self {
            up: false,
            connect_calls: 0,
            poll_calls: 0,
            refuse: 0,
        }
    }

    pub fn refusing(n: u32) -> Self {
        Self {
            refuse: n,
            ..Self::new()
        }
    }
}

impl ConnectivityPort for MockLink {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        self.connect_calls += 1;
        if self.refuse > 0 {
            self.refuse -= 1;
            return Err(ConnectivityError::ConnectionFailed);
        }
        self.up = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.up = false;
    }

    fn is_connected(&self) -> bool {
        self.up
    }

    fn poll(&mut self, _now_ms: u64) {
        self.poll_calls += 1;
    }

    fn set_credentials(&mut self, _ssid: &str, _password: &str) -> Result<(), ConnectivityError> {
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        self.up.then_some(-55)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
