//! State handler functions and table builder.
//!
//! ```text
//!  CONNECTING ──[associated]──▶ RUNNING ──[poll due, link down]──▶ RECONNECTING
//!                                  ▲                                     │
//!                                  └────────────[associated]─────────────┘
//! ```
//!
//! `Connecting` is only the boot state.  A link lost later is handled by
//! `Reconnecting`, which leaves the last frame on the panel instead of
//! bringing the spinner back.

use super::context::SchedulerContext;
use super::{StateDescriptor, StateId};
use log::{info, warn};

/// Build the state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Connecting
        StateDescriptor {
            id: StateId::Connecting,
            name: "Connecting",
            on_enter: Some(connecting_enter),
            on_exit: Some(connecting_exit),
            on_update: connecting_update,
        },
        // Index 1 — Running
        StateDescriptor {
            id: StateId::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: None,
            on_update: running_update,
        },
        // Index 2 — Reconnecting
        StateDescriptor {
            id: StateId::Reconnecting,
            name: "Reconnecting",
            on_enter: Some(reconnecting_enter),
            on_exit: None,
            on_update: reconnecting_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONNECTING
// ═══════════════════════════════════════════════════════════════════════════

fn connecting_enter(_ctx: &mut SchedulerContext) {
    info!("CONNECTING: waiting for network association");
}

fn connecting_update(ctx: &mut SchedulerContext) -> Option<StateId> {
    if ctx.associated {
        return Some(StateId::Running);
    }
    ctx.commands.connect = true;
    ctx.commands.animate = true;
    // Lets the link time out and re-issue an attempt that never completes.
    ctx.commands.link_poll = true;
    None
}

fn connecting_exit(ctx: &mut SchedulerContext) {
    // First Running tick polls straight away.
    ctx.last_poll_ms = None;
    info!(
        "CONNECTING: associated after {} ticks",
        ctx.ticks_in_state
    );
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut SchedulerContext) {
    info!(
        "RUNNING: polling every {} ms",
        ctx.config.poll_interval_ms
    );
}

fn running_update(ctx: &mut SchedulerContext) -> Option<StateId> {
    if !ctx.poll_due() {
        return None;
    }
    ctx.mark_polled();

    if ctx.associated {
        ctx.commands.poll = true;
        None
    } else {
        ctx.commands.skip = true;
        Some(StateId::Reconnecting)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  RECONNECTING
// ═══════════════════════════════════════════════════════════════════════════

fn reconnecting_enter(ctx: &mut SchedulerContext) {
    ctx.commands.link_poll = true;
    warn!("RECONNECTING: association lost, holding last frame");
}

fn reconnecting_update(ctx: &mut SchedulerContext) -> Option<StateId> {
    if ctx.associated {
        info!("RECONNECTING: association restored");
        return Some(StateId::Running);
    }
    ctx.commands.link_poll = true;
    if ctx.poll_due() {
        ctx.mark_polled();
        ctx.commands.skip = true;
    }
    None
}
