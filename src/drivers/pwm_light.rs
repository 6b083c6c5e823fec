//! PWM light drivers.
//!
//! Any [`SetDutyCycle`] channel can back a light: [`PwmLight`] for a
//! single LED, [`RgbLight`] for three channels scaled by a fixed colour.
//! Duty writes that fail are logged and otherwise ignored; the last
//! requested intensity is still recorded.
//!
//! After [`LightPort::release`] the channels are zeroed and dropped, and
//! every later write is a no-op.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::{debug, warn};

use crate::app::ports::LightPort;

fn write_percent<P: SetDutyCycle>(channel: &mut P, percent: u8, label: &str) {
    if let Err(e) = channel.set_duty_cycle_percent(percent.min(100)) {
        warn!("{label}: duty write failed: {:?}", e.kind());
    }
}

// ───────────────────────────────────────────────────────────────
// Single channel
// ───────────────────────────────────────────────────────────────

pub struct PwmLight<P> {
    channel: Option<P>,
    level: u8,
}

impl<P: SetDutyCycle> PwmLight<P> {
    /// Wrap `channel` and drive it to off.
    pub fn new(mut channel: P) -> Self {
        write_percent(&mut channel, 0, "light");
        Self {
            channel: Some(channel),
            level: 0,
        }
    }

    pub fn channel(&self) -> Option<&P> {
        self.channel.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.channel.is_none()
    }
}

impl<P: SetDutyCycle + Send> LightPort for PwmLight<P> {
    fn set_intensity(&mut self, percent: u8) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };
        let percent = percent.min(100);
        write_percent(channel, percent, "light");
        self.level = percent;
    }

    fn intensity(&self) -> u8 {
        self.level
    }

    fn release(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            write_percent(&mut channel, 0, "light");
            self.level = 0;
            debug!("light released");
        }
    }
}

// ───────────────────────────────────────────────────────────────
// RGB
// ───────────────────────────────────────────────────────────────

/// Three channels (R, G, B).  Intensity `i` drives channel `c` at
/// `colour[c] × i / 100` percent.
pub struct RgbLight<P> {
    channels: Option<[P; 3]>,
    colour: [u8; 3],
    level: u8,
}

impl<P: SetDutyCycle> RgbLight<P> {
    pub fn new(channels: [P; 3], colour: [u8; 3]) -> Self {
        let mut light = Self {
            channels: Some(channels),
            colour: colour.map(|c| c.min(100)),
            level: 0,
        };
        light.apply(0);
        light
    }

    pub fn channels(&self) -> Option<&[P; 3]> {
        self.channels.as_ref()
    }

    pub fn colour(&self) -> [u8; 3] {
        self.colour
    }

    /// Per-channel duty (percent) for intensity `percent`.
    pub fn mix(&self, percent: u8) -> [u8; 3] {
        let percent = u16::from(percent.min(100));
        self.colour.map(|c| (u16::from(c) * percent / 100) as u8)
    }

    fn apply(&mut self, percent: u8) {
        let mix = self.mix(percent);
        if let Some(channels) = self.channels.as_mut() {
            for ((channel, duty), label) in channels.iter_mut().zip(mix).zip(["red", "green", "blue"]) {
                write_percent(channel, duty, label);
            }
        }
    }
}

impl<P: SetDutyCycle + Send> LightPort for RgbLight<P> {
    fn set_intensity(&mut self, percent: u8) {
        if self.channels.is_none() {
            return;
        }
        let percent = percent.min(100);
        self.apply(percent);
        self.level = percent;
    }

    fn intensity(&self) -> u8 {
        self.level
    }

    fn release(&mut self) {
        if self.channels.is_some() {
            self.apply(0);
            self.channels = None;
            self.level = 0;
            debug!("rgb light released");
        }
    }
}
