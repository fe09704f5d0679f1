//! Reading aggregator — two independent fetches in, one bounded frame out.
//!
//! ```text
//!  fetch(detection_url) ──▶ DetectionReading ──┐   clamp 0..=9
//!                      (failure → zeros)       ├──▶ DisplayFrame
//!  fetch(environment_url) ─▶ EnvironmentReading┘   round, clamp 0..=99, split
//!                      (failure → 0.0/Unknown)
//! ```
//!
//! [`Aggregator::run_cycle`] is total: every call yields an in-range frame,
//! whatever the sources returned.  Nothing from one cycle feeds the next.

use crate::error::FetchError;
use crate::telemetry::{DetectionReading, EnvironmentReading};

use super::events::{AppEvent, SourceKind};
use super::ports::{EventSink, TelemetrySource};

// ───────────────────────────────────────────────────────────────
// DisplayFrame
// ───────────────────────────────────────────────────────────────

/// Four digits ready for the encoder.  Every field is always 0–9.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayFrame {
    pub persons_digit: u8,
    pub birds_digit: u8,
    pub temp_tens: u8,
    pub temp_ones: u8,
}

impl DisplayFrame {
    /// Build a frame from raw readings, applying the clamping rules.
    pub fn from_readings(detection: &DetectionReading, environment: &EnvironmentReading) -> Self {
        let temp = clamp_temperature(environment.temperature);
        Self {
            persons_digit: clamp_digit(detection.persons),
            birds_digit: clamp_digit(detection.birds),
            temp_tens: temp / 10,
            temp_ones: temp % 10,
        }
    }
}

/// Clamp a count into a single display digit.
pub fn clamp_digit(value: i64) -> u8 {
    value.clamp(0, 9) as u8
}

/// Round half away from zero, then clamp to 0–99.  NaN reads as 0.
pub fn clamp_temperature(celsius: f64) -> u8 {
    if celsius.is_nan() {
        return 0;
    }
    celsius.round().clamp(0.0, 99.0) as u8
}

// ───────────────────────────────────────────────────────────────
// Aggregator
// ───────────────────────────────────────────────────────────────

/// Running failure counters (diagnostics only; never used as cycle input).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    pub cycles: u64,
    pub detection_failures: u64,
    pub environment_failures: u64,
}

/// Owns the two endpoint URLs and turns one poll into one frame.
pub struct Aggregator {
    detection_url: String,
    environment_url: String,
    stats: AggregatorStats,
}

impl Aggregator {
    pub fn new(detection_url: impl Into<String>, environment_url: impl Into<String>) -> Self {
        Self {
            detection_url: detection_url.into(),
            environment_url: environment_url.into(),
            stats: AggregatorStats::default(),
        }
    }

    /// Fetch both sources sequentially and produce a clamped frame.
    pub fn run_cycle(
        &mut self,
        source: &mut impl TelemetrySource,
        sink: &mut impl EventSink,
    ) -> DisplayFrame {
        self.stats.cycles += 1;

        let detection = match fetch_detection(source, &self.detection_url) {
            Ok(reading) => {
                sink.emit(&AppEvent::DetectionReceived(reading));
                reading
            }
            Err(error) => {
                self.stats.detection_failures += 1;
                sink.emit(&AppEvent::SourceFailed {
                    source: SourceKind::Detection,
                    url: self.detection_url.clone(),
                    error,
                });
                DetectionReading::default()
            }
        };

        // Runs regardless of how the detection fetch went.
        let environment = match fetch_environment(source, &self.environment_url) {
            Ok(reading) => {
                sink.emit(&AppEvent::EnvironmentReceived(reading));
                reading
            }
            Err(error) => {
                self.stats.environment_failures += 1;
                sink.emit(&AppEvent::SourceFailed {
                    source: SourceKind::Environment,
                    url: self.environment_url.clone(),
                    error,
                });
                EnvironmentReading::default()
            }
        };

        DisplayFrame::from_readings(&detection, &environment)
    }

    pub fn stats(&self) -> AggregatorStats {
        self.stats
    }
}

fn fetch_detection(
    source: &mut impl TelemetrySource,
    url: &str,
) -> Result<DetectionReading, FetchError> {
    DetectionReading::decode(source.fetch(url)?)
}

fn fetch_environment(
    source: &mut impl TelemetrySource,
    url: &str,
) -> Result<EnvironmentReading, FetchError> {
    EnvironmentReading::decode(source.fetch(url)?)
}
