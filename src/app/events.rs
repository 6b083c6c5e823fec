//! Outbound application events.
//!
//! The [`SentryService`](super::service::SentryService) and the
//! [`ShutdownCoordinator`](crate::shutdown::ShutdownCoordinator) emit these
//! through the [`EventSink`](super::ports::EventSink) port.

use crate::drivers::light_patterns::LightPattern;
use crate::error::SensorError;
use crate::fsm::{StateId, TransitionReason};
use crate::shutdown::ShutdownReason;
use crate::sounds::{ClipHandle, Cue};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum SentryEvent {
    /// The controller has started (carries initial state).
    Started(StateId),

    /// The FSM moved between states.
    StateChanged {
        from: StateId,
        to: StateId,
        reason: TransitionReason,
    },

    /// A cue finished playing, or failed and was treated as finished.
    CuePlayed { cue: Cue, clip: ClipHandle, ok: bool },

    /// A synchronized light + sound run completed.
    EffectRun { cue: Cue, pattern: LightPattern },

    /// The PIR read failed and was treated as "no motion".
    SensorFault(SensorError),

    /// The shutdown gate was won; power-down is running.
    ShutdownTriggered(ShutdownReason),

    /// A trigger arrived after shutdown had already begun.
    ShutdownIgnored(ShutdownReason),

    /// Light, audio and sensor were released.
    ResourcesReleased,
}
