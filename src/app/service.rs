//! Application service — the hexagonal core.
//!
//! [`SentryService`] owns the FSM, its context, and every actuator and
//! sensor handle it drives.  Handles are injected at construction; the
//! event sink is passed at call sites, so the whole service runs against
//! mock adapters in tests.
//!
//! ```text
//!  MotionPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │       SentryService       │
//!  LightPort  ◀── │  FSM · plan executor ·    │
//!  AudioPort  ◀── │  run_synced               │
//!                 └──────────────────────────┘
//! ```
//!
//! One [`step`](SentryService::step) executes the current state's entry
//! plan (sleeps, playback, synchronized light runs, sensor samples) and
//! then ticks the FSM.  Nothing in a step propagates an error: playback
//! failures count as "clip finished" and sensor failures as "no motion".

use std::mem;
use std::thread;
use std::time::Duration;

use log::{info, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::config::{FlickerBand, SentryConfig};
use crate::drivers::light_patterns::LightPattern;
use crate::fsm::context::{FsmContext, LightPlan, Step};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateChange, StateId};
use crate::shutdown::{ShutdownCoordinator, ShutdownFlag, ShutdownOutcome, ShutdownReason};
use crate::sounds::{ClipHandle, Cue, SoundSet};
use crate::synchronizer::run_synced;

use super::events::SentryEvent;
use super::ports::{AudioPort, EventSink, LightPort, MotionPort};

// ───────────────────────────────────────────────────────────────
// SentryService
// ───────────────────────────────────────────────────────────────

/// The state machine controller plus the resources it owns.
pub struct SentryService<L, A, M, R = StdRng> {
    fsm: Fsm,
    ctx: FsmContext,
    light: L,
    audio: A,
    motion: M,
    sounds: SoundSet,
    band: FlickerBand,
    rng: R,
}

impl<L, A, M, R> SentryService<L, A, M, R>
where
    L: LightPort,
    A: AudioPort,
    M: MotionPort,
    R: Rng,
{
    /// Construct the service.  Does **not** start the FSM; call
    /// [`start`](Self::start) next.
    pub fn new(config: &SentryConfig, sounds: SoundSet, light: L, audio: A, motion: M, rng: R) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Standby),
            ctx: FsmContext::new(config),
            light,
            audio,
            motion,
            sounds,
            band: config.effects.flicker_band,
            rng,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the initial state (Standby).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        let state = self.fsm.current_state();
        sink.emit(&SentryEvent::Started(state));
        info!("SentryService started in {state}");
    }

    /// Execute the current state's plan to completion, then evaluate the
    /// state.  Returns the transition taken, if any.
    pub fn step(&mut self, sink: &mut impl EventSink) -> Option<StateChange> {
        self.advance(None, sink)
    }

    /// Step until a shutdown is requested through `coordinator`.
    ///
    /// The flag is checked between plan steps; a clip or light run already
    /// in progress always finishes first.
    pub fn run(&mut self, coordinator: &ShutdownCoordinator<'_>, sink: &mut impl EventSink) {
        info!("control loop running");
        while !coordinator.is_requested() {
            self.advance(Some(coordinator.flag()), sink);
        }
        info!("control loop stopping: shutdown requested");
    }

    /// Run the power-down sequence and release every actuator and the
    /// sensor, once.
    ///
    /// Later calls, or calls after another trigger already engaged the
    /// same flag, return [`ShutdownOutcome::AlreadyShuttingDown`] without
    /// touching any hardware.
    pub fn shutdown(
        &mut self,
        coordinator: &ShutdownCoordinator<'_>,
        reason: ShutdownReason,
        sink: &mut impl EventSink,
    ) -> ShutdownOutcome {
        let outcome = coordinator.trigger(reason, || {
            sink.emit(&SentryEvent::ShutdownTriggered(reason));
            self.synced(Cue::PowerDown, LightPlan::FadeOverClip, sink);
            self.light.release();
            self.audio.release();
            self.motion.release();
            sink.emit(&SentryEvent::ResourcesReleased);
            info!(
                "shutdown complete after {} intrusion cycle(s)",
                self.ctx.completed_cycles
            );
        });
        if outcome == ShutdownOutcome::AlreadyShuttingDown {
            sink.emit(&SentryEvent::ShutdownIgnored(reason));
        }
        outcome
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Intrusion cycles that reached the end of PoweringDown.
    pub fn completed_cycles(&self) -> u64 {
        self.ctx.completed_cycles
    }

    pub fn light(&self) -> &L {
        &self.light
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    // ── Internal ──────────────────────────────────────────────

    fn advance(&mut self, stop: Option<&ShutdownFlag>, sink: &mut impl EventSink) -> Option<StateChange> {
        let plan = mem::take(&mut self.ctx.plan);
        for step in plan {
            if stop.is_some_and(ShutdownFlag::is_requested) {
                return None;
            }
            self.execute(step, sink);
        }

        let change = self.fsm.tick(&mut self.ctx)?;
        sink.emit(&SentryEvent::StateChanged {
            from: change.from,
            to: change.to,
            reason: change.reason,
        });
        Some(change)
    }

    fn execute(&mut self, step: Step, sink: &mut impl EventSink) {
        match step {
            Step::Pause { min, max } => {
                let pause = if min < max {
                    self.rng.gen_range(min..=max)
                } else {
                    min
                };
                thread::sleep(pause);
            }
            Step::Play(cue) => self.play(cue, sink),
            Step::Synced { cue, light } => self.synced(cue, light, sink),
            Step::Wait(duration) => thread::sleep(duration),
            Step::SampleMotion => self.sample_motion(sink),
        }
    }

    fn sample_motion(&mut self, sink: &mut impl EventSink) {
        self.ctx.motion = match self.motion.read_motion() {
            Ok(motion) => motion,
            Err(e) => {
                warn!("PIR read failed ({e}); treating as no motion");
                sink.emit(&SentryEvent::SensorFault(e));
                false
            }
        };
    }

    fn pick(&mut self, cue: Cue) -> Option<ClipHandle> {
        let clip = self.sounds.pick(cue, &mut self.rng).cloned();
        if clip.is_none() {
            warn!("no clip registered for cue {cue}");
        }
        clip
    }

    fn play(&mut self, cue: Cue, sink: &mut impl EventSink) {
        let Some(clip) = self.pick(cue) else { return };
        let ok = match self.audio.play_blocking(&clip) {
            Ok(()) => true,
            Err(e) => {
                warn!("playback of {clip} failed ({e}); continuing as if finished");
                false
            }
        };
        sink.emit(&SentryEvent::CuePlayed { cue, clip, ok });
    }

    fn synced(&mut self, cue: Cue, plan: LightPlan, sink: &mut impl EventSink) {
        let Some(clip) = self.pick(cue) else { return };
        let pattern = match plan {
            LightPlan::Flicker {
                duration,
                intensity,
            } => LightPattern::flicker(duration, intensity),
            LightPlan::FadeOverClip => LightPattern::fade_out(self.clip_length(&clip)),
        };

        let seed = self.rng.r#gen::<u64>();
        let ok = match run_synced(
            &mut self.light,
            &mut self.audio,
            &pattern,
            &clip,
            self.band,
            seed,
        ) {
            Ok(()) => true,
            Err(e) => {
                warn!("playback of {clip} failed ({e}); light run completed regardless");
                false
            }
        };
        sink.emit(&SentryEvent::CuePlayed {
            cue,
            clip,
            ok,
        });
        sink.emit(&SentryEvent::EffectRun { cue, pattern });
    }

    /// Reported clip length, or zero (a bare terminal write) if the asset
    /// cannot be probed.
    fn clip_length(&mut self, clip: &ClipHandle) -> Duration {
        match self.audio.clip_duration(clip) {
            Ok(length) => length,
            Err(e) => {
                warn!("could not read length of {clip} ({e}); fading instantly");
                Duration::ZERO
            }
        }
    }
}
