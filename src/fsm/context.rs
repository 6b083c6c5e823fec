//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the blackboard between the pure state handlers and the
//! service that drives hardware.  Handlers write the entry action of the
//! state they enter into [`FsmContext::plan`]; the service executes the
//! plan step by step and records the latest sensor sample in
//! [`FsmContext::motion`] before the next tick.

use std::time::Duration;

use crate::config::{SentryConfig, secs};
use crate::sounds::Cue;

// ---------------------------------------------------------------------------
// Entry actions (written by state handlers; executed by the service)
// ---------------------------------------------------------------------------

/// Light half of a synchronized run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightPlan {
    /// Flicker for a fixed time, ending at `intensity`.
    Flicker { duration: Duration, intensity: u8 },
    /// Fade from full to off over the clip's reported length.
    FadeOverClip,
}

/// One step of a state's entry action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Sleep for a duration drawn uniformly from `[min, max]`.
    Pause { min: Duration, max: Duration },
    /// Play a clip for `cue` to completion.
    Play(Cue),
    /// Play a clip for `cue` while a light pattern runs alongside it.
    Synced { cue: Cue, light: LightPlan },
    /// Fixed sleep.
    Wait(Duration),
    /// Read the PIR sensor into [`FsmContext::motion`].
    SampleMotion,
}

// ---------------------------------------------------------------------------
// Timing snapshot
// ---------------------------------------------------------------------------

/// Config timings pre-converted to [`Duration`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateTiming {
    pub unauthorized_pause: (Duration, Duration),
    pub warning_delay: Duration,
    pub alarm_delay: Duration,
    pub standby_poll: Duration,
    pub power_on_flicker: Duration,
    pub power_on_intensity: u8,
}

impl StateTiming {
    pub fn from_config(config: &SentryConfig) -> Self {
        let t = &config.timing;
        Self {
            unauthorized_pause: (secs(t.unauthorized_pause.0), secs(t.unauthorized_pause.1)),
            warning_delay: secs(t.warning_delay),
            alarm_delay: secs(t.alarm_delay),
            standby_poll: secs(t.standby_poll_secs),
            power_on_flicker: secs(config.effects.power_on_flicker_secs),
            power_on_intensity: config.effects.power_on_intensity.min(100),
        }
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    /// Last PIR sample taken by a [`Step::SampleMotion`].  Read errors are
    /// recorded as `false`.
    pub motion: bool,

    /// Entry action of the current state, in execution order.
    pub plan: Vec<Step>,

    pub timing: StateTiming,

    /// Intrusion cycles that ran through to PoweringDown.
    pub completed_cycles: u64,
}

impl FsmContext {
    pub fn new(config: &SentryConfig) -> Self {
        Self {
            motion: false,
            plan: Vec::new(),
            timing: StateTiming::from_config(config),
            completed_cycles: 0,
        }
    }

    /// Replace the pending plan.
    pub fn set_plan(&mut self, steps: impl IntoIterator<Item = Step>) {
        self.plan.clear();
        self.plan.extend(steps);
    }
}
