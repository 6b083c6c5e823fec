//! System configuration parameters
//!
//! All tunable parameters for the sentry controller, loaded once at startup
//! from a JSON file (see [`adapters::config_file`](crate::adapters::config_file)).
//! The layout keeps the timing keys at the top level so existing
//! `config.json` files keep working:
//!
//! ```json
//! {
//!   "pir_pin": 27,
//!   "led_pin": 17,
//!   "sounds": { "power_on": "...", "unauthorized": ["..."], "warning": ["..."],
//!               "alarm": "...", "power_down": "..." },
//!   "unauthorized_pause": [0.5, 1.0],
//!   "warning_delay": 3,
//!   "alarm_delay": 5
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// Convert a validated seconds value into a [`Duration`].
/// Negative or non-finite input collapses to zero.
pub fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Escalation timing.  Read-only for the lifetime of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Random pause (min, max seconds) before the unauthorized clip.
    pub unauthorized_pause: (f32, f32),
    /// Wait after the unauthorized clip before re-sampling the sensor.
    pub warning_delay: f32,
    /// Wait after the warning clip before re-sampling the sensor.
    pub alarm_delay: f32,
    /// Idle wait between sensor polls in Standby.
    pub standby_poll_secs: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            unauthorized_pause: (0.5, 1.0),
            warning_delay: 3.0,
            alarm_delay: 5.0,
            standby_poll_secs: 1.0,
        }
    }
}

impl TimingConfig {
    /// All-zero timing, useful for simulation and tests.
    pub fn immediate() -> Self {
        Self {
            unauthorized_pause: (0.0, 0.0),
            warning_delay: 0.0,
            alarm_delay: 0.0,
            standby_poll_secs: 0.0,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = self.unauthorized_pause;
        for value in [min, max, self.warning_delay, self.alarm_delay, self.standby_poll_secs] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationFailed(
                    "timing values must be finite and >= 0",
                ));
            }
        }
        if min > max {
            return Err(ConfigError::ValidationFailed(
                "unauthorized_pause min must not exceed max",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Light effects
// ---------------------------------------------------------------------------

/// Range from which flicker on/off times are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlickerBand {
    pub min_secs: f32,
    pub max_secs: f32,
}

impl FlickerBand {
    /// Short, harsh flicker used for the power-on sequence.
    pub const SHARP: Self = Self {
        min_secs: 0.01,
        max_secs: 0.1,
    };
    /// Slower flicker for non-alarm contexts.
    pub const WIDE: Self = Self {
        min_secs: 0.05,
        max_secs: 0.2,
    };

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_secs.is_finite() || !self.max_secs.is_finite() {
            return Err(ConfigError::ValidationFailed("flicker_band must be finite"));
        }
        if self.min_secs <= 0.0 || self.min_secs > self.max_secs {
            return Err(ConfigError::ValidationFailed(
                "flicker_band must satisfy 0 < min_secs <= max_secs",
            ));
        }
        Ok(())
    }
}

impl Default for FlickerBand {
    fn default() -> Self {
        Self::SHARP
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Duration of the power-on flicker (D1).
    pub power_on_flicker_secs: f32,
    /// Intensity the flicker pulses to and rests at afterwards (0-100).
    pub power_on_intensity: u8,
    pub flicker_band: FlickerBand,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            power_on_flicker_secs: 2.0,
            power_on_intensity: 100,
            flicker_band: FlickerBand::default(),
        }
    }
}

impl EffectConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.power_on_flicker_secs.is_finite() || self.power_on_flicker_secs < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "power_on_flicker_secs must be finite and >= 0",
            ));
        }
        if self.power_on_intensity > 100 {
            return Err(ConfigError::ValidationFailed(
                "power_on_intensity must be 0-100",
            ));
        }
        self.flicker_band.validate()
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// How the light is wired.  Untagged so that a plain `led_pin` key selects
/// the single-channel variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LightConfig {
    /// Three PWM channels; intensity scales `colour` (each channel 0-100).
    Rgb {
        red_pin: u8,
        green_pin: u8,
        blue_pin: u8,
        #[serde(default = "default_colour")]
        colour: [u8; 3],
    },
    /// One PWM channel.
    Mono { led_pin: u8 },
}

fn default_colour() -> [u8; 3] {
    [100, 0, 0]
}

impl LightConfig {
    /// Every GPIO the light occupies.
    pub fn pins(&self) -> Vec<u8> {
        match *self {
            Self::Rgb {
                red_pin,
                green_pin,
                blue_pin,
                ..
            } => vec![red_pin, green_pin, blue_pin],
            Self::Mono { led_pin } => vec![led_pin],
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Rgb { colour, .. } if colour.iter().any(|&c| c > 100) => Err(
                ConfigError::ValidationFailed("rgb colour channels must be 0-100"),
            ),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Sounds
// ---------------------------------------------------------------------------

/// Sound-cue file mapping as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundPaths {
    pub power_on: PathBuf,
    pub unauthorized: Vec<PathBuf>,
    pub warning: Vec<PathBuf>,
    pub alarm: PathBuf,
    pub power_down: PathBuf,
}

impl SoundPaths {
    /// Every configured file, in cue order.
    pub fn all(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.power_on)
            .chain(self.unauthorized.iter())
            .chain(self.warning.iter())
            .chain([&self.alarm, &self.power_down])
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.unauthorized.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "sounds.unauthorized must not be empty",
            ));
        }
        if self.warning.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "sounds.warning must not be empty",
            ));
        }
        if self.all().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::ValidationFailed("sound paths must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

/// Core system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentryConfig {
    /// PIR sensor input (BCM).
    pub pir_pin: u8,
    #[serde(flatten)]
    pub light: LightConfig,
    /// Software PWM frequency for every light channel.
    #[serde(default = "default_pwm_frequency")]
    pub pwm_frequency_hz: f64,
    pub sounds: SoundPaths,
    #[serde(flatten)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub effects: EffectConfig,
}

fn default_pwm_frequency() -> f64 {
    pins::LED_PWM_FREQ_HZ
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            pir_pin: pins::PIR_GPIO,
            light: LightConfig::Mono {
                led_pin: pins::LED_GPIO,
            },
            pwm_frequency_hz: pins::LED_PWM_FREQ_HZ,
            sounds: SoundPaths {
                power_on: "sounds/powerup1.mp3".into(),
                unauthorized: vec![
                    "sounds/unauthorized.mp3".into(),
                    "sounds/Unauthorized1.mp3".into(),
                    "sounds/Unauthorized2.mp3".into(),
                    "sounds/Unauthorized3.mp3".into(),
                ],
                warning: vec![
                    "sounds/2ndrequest.mp3".into(),
                    "sounds/2ndrequest1.mp3".into(),
                    "sounds/alert1.mp3".into(),
                    "sounds/Alert2.mp3".into(),
                    "sounds/alert3.mp3".into(),
                ],
                alarm: "sounds/alarm.mp3".into(),
                power_down: "sounds/powerdown.mp3".into(),
            },
            timing: TimingConfig::default(),
            effects: EffectConfig::default(),
        }
    }
}

impl SentryConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.effects.validate()?;
        self.sounds.validate()?;
        self.light.validate()?;

        if !self.pwm_frequency_hz.is_finite() || self.pwm_frequency_hz <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "pwm_frequency_hz must be > 0",
            ));
        }

        let mut used = self.light.pins();
        used.push(self.pir_pin);
        used.sort_unstable();
        if used.windows(2).any(|w| w[0] == w[1]) {
            return Err(ConfigError::ValidationFailed("GPIO pins must be distinct"));
        }
        Ok(())
    }
}
