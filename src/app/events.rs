//! Outbound application events.
//!
//! The aggregator and [`DashboardService`](super::service::DashboardService)
//! emit these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use crate::app::aggregator::DisplayFrame;
use crate::error::FetchError;
use crate::fsm::StateId;
use crate::telemetry::{DetectionReading, EnvironmentReading};

/// Which upstream node a reading or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Detection,
    Environment,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Detection => "detection",
            Self::Environment => "environment",
        }
    }
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The scheduler has started (carries initial state).
    Started(StateId),

    /// The scheduler transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// Raw detection reading, before clamping.
    DetectionReceived(DetectionReading),

    /// Raw environment reading, before rounding and clamping.
    EnvironmentReceived(EnvironmentReading),

    /// A fetch or decode failed; that source's fields fall back to defaults.
    SourceFailed {
        source: SourceKind,
        url: String,
        error: FetchError,
    },

    /// A frame was pushed to the panel.
    FrameRendered(DisplayFrame),

    /// A due poll was skipped because association was down.
    CycleSkipped { cycle: u64 },

    AssociationLost,
    AssociationRestored,
}
