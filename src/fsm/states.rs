//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers.  Handlers only write the
//! entry plan and pick successors; they never block.
//!
//! ```text
//!  STANDBY ──[motion]──▶ POWERING_ON ──▶ UNAUTHORIZED ──[motion]──▶ WARNING ──[motion]──▶ ALARM
//!     ▲                                       │                       │                   │
//!     │                                   [cleared]               [cleared]               │
//!     │                                       ▼                       ▼                   │
//!     └──────────────────────────────── POWERING_DOWN ◀──────────────────────────────────┘
//! ```

use super::context::{FsmContext, LightPlan, Step};
use super::{StateDescriptor, StateId, Transition, TransitionReason};
use crate::sounds::Cue;
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Standby
        StateDescriptor {
            name: "Standby",
            on_enter: Some(standby_enter),
            on_exit: None,
            on_update: standby_update,
        },
        // Index 1 — PoweringOn
        StateDescriptor {
            name: "PoweringOn",
            on_enter: Some(powering_on_enter),
            on_exit: None,
            on_update: powering_on_update,
        },
        // Index 2 — Unauthorized
        StateDescriptor {
            name: "Unauthorized",
            on_enter: Some(unauthorized_enter),
            on_exit: None,
            on_update: unauthorized_update,
        },
        // Index 3 — Warning
        StateDescriptor {
            name: "Warning",
            on_enter: Some(warning_enter),
            on_exit: None,
            on_update: warning_update,
        },
        // Index 4 — Alarm
        StateDescriptor {
            name: "Alarm",
            on_enter: Some(alarm_enter),
            on_exit: None,
            on_update: alarm_update,
        },
        // Index 5 — PoweringDown
        StateDescriptor {
            name: "PoweringDown",
            on_enter: Some(powering_down_enter),
            on_exit: Some(powering_down_exit),
            on_update: powering_down_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  STANDBY — waiting for the PIR to fire
// ═══════════════════════════════════════════════════════════════════════════

fn standby_enter(ctx: &mut FsmContext) {
    ctx.motion = false;
    ctx.set_plan([Step::SampleMotion]);
    info!("STANDBY: system in standby");
}

fn standby_update(ctx: &mut FsmContext) -> Option<Transition> {
    if ctx.motion {
        return Some(Transition::new(
            StateId::PoweringOn,
            TransitionReason::MotionDetected,
        ));
    }
    // Idle wait, then poll again.
    let poll = ctx.timing.standby_poll;
    ctx.set_plan([Step::Wait(poll), Step::SampleMotion]);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  POWERING_ON — flicker up while the power-on clip plays
// ═══════════════════════════════════════════════════════════════════════════

fn powering_on_enter(ctx: &mut FsmContext) {
    let light = LightPlan::Flicker {
        duration: ctx.timing.power_on_flicker,
        intensity: ctx.timing.power_on_intensity,
    };
    ctx.set_plan([Step::Synced {
        cue: Cue::PowerOn,
        light,
    }]);
}

fn powering_on_update(_ctx: &mut FsmContext) -> Option<Transition> {
    Some(Transition::new(
        StateId::Unauthorized,
        TransitionReason::SequenceComplete,
    ))
}

// ═══════════════════════════════════════════════════════════════════════════
//  UNAUTHORIZED — first verbal challenge
// ═══════════════════════════════════════════════════════════════════════════

fn unauthorized_enter(ctx: &mut FsmContext) {
    let (min, max) = ctx.timing.unauthorized_pause;
    let wait = ctx.timing.warning_delay;
    ctx.set_plan([
        Step::Pause { min, max },
        Step::Play(Cue::Unauthorized),
        Step::Wait(wait),
        Step::SampleMotion,
    ]);
}

fn unauthorized_update(ctx: &mut FsmContext) -> Option<Transition> {
    Some(escalate_or_stand_down(ctx, StateId::Warning))
}

// ═══════════════════════════════════════════════════════════════════════════
//  WARNING — second challenge
// ═══════════════════════════════════════════════════════════════════════════

fn warning_enter(ctx: &mut FsmContext) {
    let wait = ctx.timing.alarm_delay;
    ctx.set_plan([Step::Play(Cue::Warning), Step::Wait(wait), Step::SampleMotion]);
}

fn warning_update(ctx: &mut FsmContext) -> Option<Transition> {
    Some(escalate_or_stand_down(ctx, StateId::Alarm))
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALARM
// ═══════════════════════════════════════════════════════════════════════════

fn alarm_enter(ctx: &mut FsmContext) {
    ctx.set_plan([Step::Play(Cue::Alarm)]);
}

fn alarm_update(_ctx: &mut FsmContext) -> Option<Transition> {
    Some(Transition::new(
        StateId::PoweringDown,
        TransitionReason::SequenceComplete,
    ))
}

// ═══════════════════════════════════════════════════════════════════════════
//  POWERING_DOWN — fade out for exactly the power-down clip's length
// ═══════════════════════════════════════════════════════════════════════════

fn powering_down_enter(ctx: &mut FsmContext) {
    ctx.set_plan([Step::Synced {
        cue: Cue::PowerDown,
        light: LightPlan::FadeOverClip,
    }]);
}

fn powering_down_exit(ctx: &mut FsmContext) {
    ctx.completed_cycles += 1;
    info!(
        "POWERING_DOWN: intrusion cycle {} complete",
        ctx.completed_cycles
    );
}

fn powering_down_update(_ctx: &mut FsmContext) -> Option<Transition> {
    Some(Transition::new(
        StateId::Standby,
        TransitionReason::SequenceComplete,
    ))
}

// ═══════════════════════════════════════════════════════════════════════════
//  Helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Escalation gate: a sample taken at the end of the wait window decides
/// between the next tier and standing down.
fn escalate_or_stand_down(ctx: &FsmContext, next_tier: StateId) -> Transition {
    if ctx.motion {
        Transition::new(next_tier, TransitionReason::MotionPersisted)
    } else {
        Transition::new(StateId::PoweringDown, TransitionReason::MotionCleared)
    }
}
