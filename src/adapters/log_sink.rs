//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! tagged line to the `log` facade (UART / USB-CDC on the board, stderr on
//! the host simulator).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::telemetry::DoorState;

/// Adapter that logs every [`AppEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

fn door_label(door: DoorState) -> &'static str {
    match door {
        DoorState::Open => "open",
        DoorState::Closed => "closed",
        DoorState::Unknown => "unknown",
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::DetectionReceived(r) => {
                info!("READ  | detection | persons={} birds={}", r.persons, r.birds);
            }
            AppEvent::EnvironmentReceived(r) => {
                info!(
                    "READ  | environment | T={:.2}\u{00b0}C door={}",
                    r.temperature,
                    door_label(r.door_state)
                );
            }
            AppEvent::SourceFailed { source, url, error } => {
                warn!("FAIL  | {} | {} | {}", source.label(), url, error);
            }
            AppEvent::FrameRendered(f) => {
                info!(
                    "FRAME | P={} B={} T={}{}",
                    f.persons_digit, f.birds_digit, f.temp_tens, f.temp_ones
                );
            }
            AppEvent::CycleSkipped { cycle } => {
                warn!("SKIP  | poll #{} skipped, not associated", cycle);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::AssociationLost => {
                warn!("NET   | association lost");
            }
            AppEvent::AssociationRestored => {
                info!("NET   | association restored");
            }
        }
    }
}
