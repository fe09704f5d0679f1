//! Dashboard service — the hexagonal core.
//!
//! [`DashboardService`] owns the scheduler FSM, the aggregator and the
//! connecting animation.  All I/O flows through port traits injected at
//! call sites, so the whole service runs against mocks in tests.
//!
//! ```text
//!  ConnectivityPort ──▶ ┌──────────────────────────┐ ──▶ DisplayPort
//!  TelemetrySource  ──▶ │     DashboardService      │ ──▶ EventSink
//!                       │ FSM · Aggregator · Spinner│
//!                       └──────────────────────────┘
//! ```

use log::{debug, warn};

use crate::adapters::wifi::{ConnectivityError, ConnectivityPort};
use crate::config::DashboardConfig;
use crate::drivers::segment::{self, Segment};
use crate::drivers::spinner::Spinner;
use crate::fsm::context::{SchedulerCommands, SchedulerContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::aggregator::{Aggregator, AggregatorStats, DisplayFrame};
use super::events::AppEvent;
use super::ports::{DisplayPort, EventSink, TelemetrySource};

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub ticks: u64,
    pub cycles_run: u64,
    pub cycles_skipped: u64,
    pub display_errors: u64,
}

pub struct DashboardService {
    fsm: Fsm,
    ctx: SchedulerContext,
    aggregator: Aggregator,
    spinner: Spinner,
    stats: ServiceStats,
    last_frame: Option<DisplayFrame>,
    was_associated: bool,
}

impl DashboardService {
    /// Construct the service.  Does **not** start the FSM; call [`start`](Self::start).
    pub fn new(config: DashboardConfig) -> Self {
        let aggregator = Aggregator::new(config.detection_url.clone(), config.environment_url.clone());
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Connecting),
            ctx: SchedulerContext::new(config),
            aggregator,
            spinner: Spinner::new(),
            stats: ServiceStats::default(),
            last_frame: None,
            was_associated: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initialise the panel and enter `Connecting`.
    pub fn start(&mut self, display: &mut impl DisplayPort, sink: &mut impl EventSink) {
        if let Err(e) = display.init(self.ctx.config.brightness) {
            warn!("Display init failed: {}", e);
            self.stats.display_errors += 1;
        }
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One scheduler step: sample association → FSM → carry out commands.
    pub fn tick(
        &mut self,
        now_ms: u64,
        link: &mut impl ConnectivityPort,
        source: &mut impl TelemetrySource,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        self.stats.ticks += 1;
        let prev_state = self.fsm.current_state();

        // 1. Inputs
        let associated = link.is_connected();
        if associated != self.was_associated {
            // Boot-time association is reported by the state change instead.
            if prev_state != StateId::Connecting {
                let event = if associated {
                    AppEvent::AssociationRestored
                } else {
                    AppEvent::AssociationLost
                };
                sink.emit(&event);
            }
            self.was_associated = associated;
        }
        self.ctx.now_ms = now_ms;
        self.ctx.associated = associated;
        self.ctx.commands = SchedulerCommands::default();

        // 2. FSM step (pure)
        self.fsm.tick(&mut self.ctx);

        // 3. Apply commands via ports
        let cmds = self.ctx.commands;
        if cmds.connect {
            self.attempt_association(link);
        }
        if cmds.animate {
            let frame = self.spinner.next_frame();
            self.write_panel(display, &frame);
        }
        if cmds.poll {
            self.run_cycle(source, display, sink);
        }
        if cmds.skip {
            self.stats.cycles_skipped += 1;
            sink.emit(&AppEvent::CycleSkipped {
                cycle: self.stats.cycles_run + self.stats.cycles_skipped,
            });
        }
        if cmds.link_poll {
            link.poll(now_ms);
        }

        // 4. Report transitions
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats
    }

    pub fn aggregator_stats(&self) -> AggregatorStats {
        self.aggregator.stats()
    }

    /// The frame most recently pushed to the panel, if any cycle has run.
    pub fn last_frame(&self) -> Option<DisplayFrame> {
        self.last_frame
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn attempt_association(&mut self, link: &mut impl ConnectivityPort) {
        if link.is_connected() {
            return;
        }
        match link.connect() {
            Ok(()) | Err(ConnectivityError::AlreadyConnected) => {}
            Err(e) => debug!("Association attempt failed: {}", e),
        }
    }

    fn run_cycle(
        &mut self,
        source: &mut impl TelemetrySource,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        self.stats.cycles_run += 1;
        let frame = self.aggregator.run_cycle(source, sink);
        let segments = segment::encode(&frame);
        if self.write_panel(display, &segments) {
            self.last_frame = Some(frame);
            sink.emit(&AppEvent::FrameRendered(frame));
        }
    }

    fn write_panel(&mut self, display: &mut impl DisplayPort, segments: &[Segment; 4]) -> bool {
        match display.write(segments) {
            Ok(()) => true,
            Err(e) => {
                self.stats.display_errors += 1;
                warn!("Display write failed: {}", e);
                false
            }
        }
    }
}
