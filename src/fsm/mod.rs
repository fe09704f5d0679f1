//! Poll scheduler state machine.
//!
//! Table-driven FSM: each state is a row of plain `fn` pointers.
//!
//! ```text
//! ┌────────────────┬─────────────┬───────────┬──────────────────────┐
//! │ StateId        │ on_enter    │ on_exit   │ on_update            │
//! ├────────────────┼─────────────┼───────────┼──────────────────────┤
//! │ Connecting     │ fn(ctx)     │ fn(ctx)   │ fn(ctx) -> Option<>  │
//! │ Running        │ fn(ctx)     │ —         │ fn(ctx) -> Option<>  │
//! │ Reconnecting   │ fn(ctx)     │ —         │ fn(ctx) -> Option<>  │
//! └────────────────┴─────────────┴───────────┴──────────────────────┘
//! ```
//!
//! Handlers never perform I/O.  They read the inputs in
//! [`SchedulerContext`] (clock, association) and write
//! [`SchedulerCommands`] which the
//! [`DashboardService`](crate::app::service::DashboardService) then carries
//! out against the ports.

pub mod context;
pub mod states;

use context::SchedulerContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Scheduler states.  Must stay in sync with [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// Waiting for network association; display shows the spinner.
    Connecting = 0,
    /// Associated; one fetch-aggregate-render cycle per poll period.
    Running = 1,
    /// Association dropped while running; last frame stays on the panel.
    Reconnecting = 2,
}

impl StateId {
    pub const COUNT: usize = 3;

    /// Convert a table index back to `StateId`.  Out-of-range indices are a
    /// bug; release builds fall back to `Connecting`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Connecting,
            1 => Self::Running,
            2 => Self::Reconnecting,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Connecting
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// Runs exactly once per transition.
pub type StateActionFn = fn(&mut SchedulerContext);

/// Per-tick handler.  `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut SchedulerContext) -> Option<StateId>;

pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
    tick_count: u64,
    state_entry_tick: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run `on_enter` for the initial state.  Call once before the first tick.
    pub fn start(&mut self, ctx: &mut SchedulerContext) {
        info!("Scheduler starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick: run `on_update`, then transition if requested.
    pub fn tick(&mut self, ctx: &mut SchedulerContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;

        if let Some(next) = (self.table[self.current].on_update)(ctx) {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut SchedulerContext) {
        let next_idx = next_id as usize;
        if next_idx == self.current {
            return;
        }

        info!(
            "Scheduler transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
