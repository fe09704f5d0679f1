//! Inputs and outputs threaded through every scheduler handler.
//!
//! The service writes the inputs (clock, association) before each tick and
//! clears [`SchedulerCommands`]; handlers read the inputs and set commands.

use crate::config::DashboardConfig;

/// What the service should do after this tick.  All flags default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerCommands {
    /// Attempt network association.
    pub connect: bool,
    /// Advance the connecting animation and write it to the panel.
    pub animate: bool,
    /// Run one fetch-aggregate-render cycle.
    pub poll: bool,
    /// A poll was due but association is down; count and report it.
    pub skip: bool,
    /// Drive the association adapter's reconnect/backoff logic.
    pub link_poll: bool,
}

pub struct SchedulerContext {
    // -- Timing --
    /// Ticks since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic milliseconds, set by the service before each tick.
    pub now_ms: u64,
    /// When the last poll was run or skipped.  `None` means poll on the next Running tick.
    pub last_poll_ms: Option<u64>,

    // -- Inputs --
    /// Association state sampled at the start of this tick.
    pub associated: bool,

    // -- Outputs --
    pub commands: SchedulerCommands,

    pub config: DashboardConfig,
}

impl SchedulerContext {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            ticks_in_state: 0,
            now_ms: 0,
            last_poll_ms: None,
            associated: false,
            commands: SchedulerCommands::default(),
            config,
        }
    }

    /// True when a full poll period has elapsed since the last poll (or none has run).
    pub fn poll_due(&self) -> bool {
        self.last_poll_ms.is_none_or(|last| {
            self.now_ms.saturating_sub(last) >= u64::from(self.config.poll_interval_ms)
        })
    }

    /// Record that the due poll slot was consumed (run or skipped).
    pub fn mark_polled(&mut self) {
        self.last_poll_ms = Some(self.now_ms);
    }
}
