//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SentryService (domain)
//! ```
//!
//! Driven adapters (light, audio, PIR, event sinks, config) implement these
//! traits.  The [`SentryService`](super::service::SentryService) consumes
//! them via generics, so the domain core never touches hardware directly.

use std::time::Duration;

use crate::config::SentryConfig;
use crate::error::{ConfigError, PlaybackError, SensorError};
use crate::sounds::ClipHandle;

// ───────────────────────────────────────────────────────────────
// Light port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the light actuator.
///
/// `Send` because light patterns run on their own worker thread while the
/// control thread blocks on playback.
pub trait LightPort: Send {
    /// Set intensity (0–100).  Assumed to succeed; adapters log failures.
    fn set_intensity(&mut self, percent: u8);

    /// Last intensity written.
    fn intensity(&self) -> u8;

    /// Zero the output and hand the pins back to the OS.  Further writes
    /// are ignored.
    fn release(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Audio port (driven adapter: domain → speaker)
// ───────────────────────────────────────────────────────────────

/// Playback service.  Failures are reported, never panicked.
pub trait AudioPort {
    /// Play `clip` to completion, blocking the caller.
    fn play_blocking(&mut self, clip: &ClipHandle) -> Result<(), PlaybackError>;

    /// Length of `clip` as reported by the asset itself.
    fn clip_duration(&mut self, clip: &ClipHandle) -> Result<Duration, PlaybackError>;

    /// Close the output device.
    fn release(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Motion port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the PIR sensor.
pub trait MotionPort {
    /// Sample the sensor now.  No debouncing.
    fn read_motion(&mut self) -> Result<bool, SensorError>;

    /// Give the input pin back to the OS.  Reads fail afterwards.
    fn release(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`SentryEvent`](super::events::SentryEvent)s
/// through this port.  One-way: nothing is ever read back.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::SentryEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads the startup configuration.
///
/// Implementations MUST validate before returning; every error is fatal
/// to startup.
pub trait ConfigPort {
    fn load(&self) -> Result<SentryConfig, ConfigError>;
}
