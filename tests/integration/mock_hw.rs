//! Mock adapters for integration tests.
//!
//! Each mock records every call so tests can assert on the full history
//! without GPIO, PWM or an audio device.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sentry::app::events::SentryEvent;
use sentry::app::ports::{AudioPort, EventSink, LightPort, MotionPort};
use sentry::app::service::SentryService;
use sentry::config::{SentryConfig, TimingConfig};
use sentry::error::{PlaybackError, SensorError};
use sentry::fsm::StateId;
use sentry::shutdown::ShutdownFlag;
use sentry::sounds::{ClipHandle, Cue, SoundSet};

// ── Light ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockLight {
    pub writes: Vec<u8>,
    pub releases: usize,
    released: bool,
}

#[allow(dead_code)]
impl MockLight {
    pub fn last(&self) -> Option<u8> {
        self.writes.last().copied()
    }
}

impl LightPort for MockLight {
    fn set_intensity(&mut self, percent: u8) {
        if !self.released {
            self.writes.push(percent);
        }
    }

    fn intensity(&self) -> u8 {
        self.last().unwrap_or(0)
    }

    fn release(&mut self) {
        self.releases += 1;
        self.released = true;
    }
}

// ── Audio ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockAudio {
    pub played: Vec<ClipHandle>,
    /// Reported clip lengths; clips not listed report zero.
    pub durations: HashMap<PathBuf, Duration>,
    /// How long `play_blocking` blocks.
    pub play_time: Duration,
    pub fail_playback: bool,
    pub fail_duration: bool,
    pub releases: usize,
}

#[allow(dead_code)]
impl MockAudio {
    pub fn with_duration(mut self, clip: impl Into<PathBuf>, length: Duration) -> Self {
        self.durations.insert(clip.into(), length);
        self
    }

    /// Clips played that belong to `cue` in `sounds`.
    pub fn plays_of(&self, sounds: &SoundSet, cue: Cue) -> usize {
        let options = sounds.alternatives(cue);
        self.played.iter().filter(|c| options.contains(c)).count()
    }
}

impl AudioPort for MockAudio {
    fn play_blocking(&mut self, clip: &ClipHandle) -> Result<(), PlaybackError> {
        self.played.push(clip.clone());
        if !self.play_time.is_zero() {
            thread::sleep(self.play_time);
        }
        if self.fail_playback {
            return Err(PlaybackError::Output("no device".into()));
        }
        Ok(())
    }

    fn clip_duration(&mut self, clip: &ClipHandle) -> Result<Duration, PlaybackError> {
        if self.fail_duration {
            return Err(PlaybackError::Decode("unknown length".into()));
        }
        Ok(self.durations.get(clip.path()).copied().unwrap_or(Duration::ZERO))
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

// ── Motion ────────────────────────────────────────────────────

/// Replays a script of readings, then repeats `fallback` forever.
#[derive(Debug, Default)]
pub struct ScriptedMotion {
    script: VecDeque<Result<bool, SensorError>>,
    fallback: bool,
    pub reads: usize,
    pub releases: usize,
    /// Request shutdown on this flag once `reads` reaches the count.
    request_after: Option<(usize, Arc<ShutdownFlag>)>,
}

#[allow(dead_code)]
impl ScriptedMotion {
    pub fn always(motion: bool) -> Self {
        Self {
            fallback: motion,
            ..Self::default()
        }
    }

    pub fn script(readings: impl IntoIterator<Item = Result<bool, SensorError>>, then: bool) -> Self {
        Self {
            script: readings.into_iter().collect(),
            fallback: then,
            ..Self::default()
        }
    }

    pub fn request_shutdown_after(mut self, reads: usize, flag: Arc<ShutdownFlag>) -> Self {
        self.request_after = Some((reads, flag));
        self
    }
}

impl MotionPort for ScriptedMotion {
    fn read_motion(&mut self) -> Result<bool, SensorError> {
        self.reads += 1;
        if let Some((after, flag)) = &self.request_after {
            if self.reads >= *after {
                flag.request();
            }
        }
        self.script.pop_front().unwrap_or(Ok(self.fallback))
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SentryEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    /// Initial state followed by the target of every transition.
    pub fn visited(&self) -> Vec<StateId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SentryEvent::Started(s) => Some(*s),
                SentryEvent::StateChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&SentryEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &SentryEvent) {
        self.events.push(event.clone());
    }
}

// ── Service builders ──────────────────────────────────────────

pub type TestService = SentryService<MockLight, MockAudio, ScriptedMotion, StdRng>;

/// Config with every wait at zero and an instant power-on flicker.
#[allow(dead_code)]
pub fn fast_config() -> SentryConfig {
    let mut config = SentryConfig::default();
    config.timing = TimingConfig::immediate();
    config.effects.power_on_flicker_secs = 0.0;
    config
}

#[allow(dead_code)]
pub fn sounds(config: &SentryConfig) -> SoundSet {
    SoundSet::from_paths(&config.sounds).expect("default sounds are valid")
}

#[allow(dead_code)]
pub fn make_service(config: &SentryConfig, audio: MockAudio, motion: ScriptedMotion, seed: u64) -> TestService {
    SentryService::new(
        config,
        sounds(config),
        MockLight::default(),
        audio,
        motion,
        StdRng::seed_from_u64(seed),
    )
}

/// Step until `state` is reached again or `limit` steps have run.
#[allow(dead_code)]
pub fn step_until(service: &mut TestService, sink: &mut RecordingSink, state: StateId, limit: usize) {
    for _ in 0..limit {
        if let Some(change) = service.step(sink) {
            if change.to == state {
                return;
            }
        }
    }
    panic!("did not reach {state} within {limit} steps");
}
