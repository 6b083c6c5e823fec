//! Actuator synchronizer.
//!
//! [`run_synced`] is the one rendezvous point between light and sound: the
//! pattern runs on a scoped worker thread while the calling thread blocks
//! on playback, and the call returns only after both have finished.
//!
//! ```text
//!  caller ──┬── spawn "light-pattern" ──▶ run_pattern(light) ──┐
//!           │                                                  │
//!           └── audio.play_blocking(clip) ─────────────────────┴── join ──▶ return
//! ```
//!
//! The worker borrows the light for the duration of the scope, so at most
//! one pattern can be writing intensity at any time.

use std::thread;

use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::app::ports::{AudioPort, LightPort};
use crate::config::FlickerBand;
use crate::drivers::light_patterns::{LightPattern, run_pattern};
use crate::error::PlaybackError;
use crate::sounds::ClipHandle;

/// Name given to the per-run light worker.
pub const WORKER_NAME: &str = "light-pattern";

/// Run `pattern` on `light` concurrently with playing `clip`, and block
/// until both complete.
///
/// The playback result is returned as-is; a failed clip does not cut the
/// light pattern short.  On return the light sits at
/// [`LightPattern::terminal_intensity`], even if the worker could not be
/// spawned or panicked.
///
/// `seed` drives the flicker timing on the worker.
pub fn run_synced<L, A>(
    light: &mut L,
    audio: &mut A,
    pattern: &LightPattern,
    clip: &ClipHandle,
    band: FlickerBand,
    seed: u64,
) -> Result<(), PlaybackError>
where
    L: LightPort + ?Sized,
    A: AudioPort + ?Sized,
{
    let pattern = *pattern;

    let (playback, worker_ok) = thread::scope(|s| {
        let worker_light = &mut *light;
        let spawned = thread::Builder::new()
            .name(WORKER_NAME.into())
            .spawn_scoped(s, move || {
                let mut rng = StdRng::seed_from_u64(seed);
                run_pattern(worker_light, &pattern, band, &mut rng);
            });

        let playback = audio.play_blocking(clip);

        let worker_ok = match spawned {
            Ok(handle) => match handle.join() {
                Ok(()) => true,
                Err(_) => {
                    warn!("{WORKER_NAME} worker panicked; forcing terminal intensity");
                    false
                }
            },
            Err(e) => {
                warn!("failed to spawn {WORKER_NAME} worker: {e}");
                false
            }
        };
        (playback, worker_ok)
    });

    if !worker_ok {
        light.set_intensity(pattern.terminal_intensity());
    }
    playback
}
