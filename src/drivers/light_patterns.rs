//! Light pattern engine.
//!
//! Emits a timed sequence of intensity writes to a [`LightPort`] for one
//! synchronized run.  Both modes are paced by a monotonic clock from a
//! recorded start time until the pattern's duration has elapsed, then
//! finish with a single terminal write.
//!
//! | Mode    | Loop body                                        | Terminal |
//! |---------|--------------------------------------------------|----------|
//! | Flicker | base, sleep rand(band), 0, sleep rand(band)      | base     |
//! | FadeOut | round(base × (1 − t/d)) every [`FADE_TICK`]      | 0        |
//!
//! A zero duration skips the loop entirely: one terminal write, no sleep,
//! no division.

use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::app::ports::LightPort;
use crate::config::{FlickerBand, secs};

/// Fade ramp write interval.
pub const FADE_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    Flicker,
    FadeOut,
}

/// One synchronized light run.  Built per state visit, dropped after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightPattern {
    pub mode: PatternMode,
    pub duration: Duration,
    /// Intensity the pattern pulses to (Flicker) or fades from (FadeOut).
    pub base_intensity: u8,
}

impl LightPattern {
    pub fn flicker(duration: Duration, intensity: u8) -> Self {
        Self {
            mode: PatternMode::Flicker,
            duration,
            base_intensity: intensity.min(100),
        }
    }

    /// Full-brightness linear fade to off.
    pub fn fade_out(duration: Duration) -> Self {
        Self {
            mode: PatternMode::FadeOut,
            duration,
            base_intensity: 100,
        }
    }

    /// Intensity the light is left at once the run completes.
    pub fn terminal_intensity(&self) -> u8 {
        match self.mode {
            PatternMode::Flicker => self.base_intensity,
            PatternMode::FadeOut => 0,
        }
    }
}

/// Run `pattern` to completion on the calling thread.
pub fn run_pattern<L, R>(light: &mut L, pattern: &LightPattern, band: FlickerBand, rng: &mut R)
where
    L: LightPort + ?Sized,
    R: Rng + ?Sized,
{
    match pattern.mode {
        PatternMode::Flicker => flicker(light, pattern, band, rng),
        PatternMode::FadeOut => fade_out(light, pattern),
    }
}

/// Ramp level at `elapsed` into a fade of length `duration`.
pub fn fade_level(base: u8, elapsed: Duration, duration: Duration) -> u8 {
    if duration.is_zero() {
        return 0;
    }
    let remaining = 1.0 - elapsed.as_secs_f64() / duration.as_secs_f64();
    (f64::from(base) * remaining.clamp(0.0, 1.0)).round() as u8
}

/// Draw one on/off interval from `band`.
pub fn draw_interval<R: Rng + ?Sized>(band: FlickerBand, rng: &mut R) -> Duration {
    let lo = band.min_secs;
    let hi = band.max_secs.max(lo);
    secs(rng.gen_range(lo..=hi))
}

fn flicker<L, R>(light: &mut L, pattern: &LightPattern, band: FlickerBand, rng: &mut R)
where
    L: LightPort + ?Sized,
    R: Rng + ?Sized,
{
    let start = Instant::now();
    while start.elapsed() < pattern.duration {
        let on_time = draw_interval(band, rng);
        let off_time = draw_interval(band, rng);
        light.set_intensity(pattern.base_intensity);
        thread::sleep(on_time);
        light.set_intensity(0);
        thread::sleep(off_time);
    }
    // Pattern ends "on".
    light.set_intensity(pattern.base_intensity);
}

fn fade_out<L: LightPort + ?Sized>(light: &mut L, pattern: &LightPattern) {
    let duration = pattern.duration;
    if !duration.is_zero() {
        let start = Instant::now();
        loop {
            let elapsed = start.elapsed();
            if elapsed >= duration {
                break;
            }
            light.set_intensity(fade_level(pattern.base_intensity, elapsed, duration));
            thread::sleep(FADE_TICK.min(duration - elapsed));
        }
    }
    light.set_intensity(0);
}
