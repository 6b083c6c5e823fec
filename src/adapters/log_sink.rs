//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one line per [`SentryEvent`] to the
//! `log` facade.  The binary routes that to the console and the rotating
//! intrusion log.

use log::{info, warn};

use crate::app::events::SentryEvent;
use crate::app::ports::EventSink;
use crate::drivers::light_patterns::PatternMode;

/// Adapter that logs every [`SentryEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SentryEvent) {
        match event {
            SentryEvent::Started(state) => {
                info!("START | initial_state={state}");
            }
            SentryEvent::StateChanged { from, to, reason } => {
                info!("STATE | {from} -> {to} | reason={reason}");
            }
            SentryEvent::CuePlayed { cue, clip, ok: true } => {
                info!("SOUND | {cue} | clip={clip}");
            }
            SentryEvent::CuePlayed { cue, clip, ok: false } => {
                warn!("SOUND | {cue} | clip={clip} | playback failed");
            }
            SentryEvent::EffectRun { cue, pattern } => {
                let mode = match pattern.mode {
                    PatternMode::Flicker => "flicker",
                    PatternMode::FadeOut => "fade-out",
                };
                info!(
                    "LIGHT | {mode} with {cue} | {:.2}s | ends at {}%",
                    pattern.duration.as_secs_f32(),
                    pattern.terminal_intensity()
                );
            }
            SentryEvent::SensorFault(e) => {
                warn!("SENSOR | {e} | treated as no motion");
            }
            SentryEvent::ShutdownTriggered(reason) => {
                info!("SHUTDOWN | state=PoweringDown | reason={reason}");
            }
            SentryEvent::ShutdownIgnored(reason) => {
                info!("SHUTDOWN | already shutting down | ignored reason={reason}");
            }
            SentryEvent::ResourcesReleased => {
                info!("RELEASE | light, audio and sensor released");
            }
        }
    }
}
