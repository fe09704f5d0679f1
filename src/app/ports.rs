//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DashboardService (domain)
//! ```
//!
//! Driven adapters (HTTP sources, the segment panel, event sinks, config
//! storage) implement these traits.  The
//! [`DashboardService`](super::service::DashboardService) consumes them via
//! generics, so the domain core never touches the network or GPIO directly.
//!
//! Association (WiFi) is behind
//! [`ConnectivityPort`](crate::adapters::wifi::ConnectivityPort), defined
//! next to its adapter.

use serde_json::Value;

use crate::config::DashboardConfig;
use crate::drivers::segment::Segment;
use crate::error::{ConfigError, DisplayError, FetchError};

// ───────────────────────────────────────────────────────────────
// Telemetry source port (driven adapter: network → domain)
// ───────────────────────────────────────────────────────────────

/// Fetches and parses one JSON document from one endpoint.
///
/// One synchronous request per call: no retry, no caching, no state carried
/// between calls.  Both failure kinds come back as a typed [`FetchError`].
pub trait TelemetrySource {
    fn fetch(&mut self, url: &str) -> Result<Value, FetchError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → segment panel)
// ───────────────────────────────────────────────────────────────

/// A 4-digit segment panel.
pub trait DisplayPort {
    /// Power up the panel at the given brightness (0–7).  Called once at startup.
    fn init(&mut self, brightness: u8) -> Result<(), DisplayError>;

    /// Replace all four positions.
    fn write(&mut self, segments: &[Segment; 4]) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: storage → domain)
// ───────────────────────────────────────────────────────────────

/// Loads the dashboard configuration.
///
/// Implementations MUST validate before returning; an invalid document is
/// reported as an error, never silently clamped.
pub trait ConfigPort {
    fn load(&self) -> Result<DashboardConfig, ConfigError>;
}
