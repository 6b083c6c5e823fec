//! Hardware adapter — builds the Raspberry Pi light and PIR sensor from
//! [`SentryConfig`].
//!
//! This is the only module that opens GPIO.  The wiring variant decides
//! whether a single PWM LED or an RGB triple is driven; both appear to the
//! domain as one [`LightPort`].

use anyhow::{Context, Result};
use log::info;
use rppal::gpio::{Gpio, InputPin};

use crate::app::ports::LightPort;
use crate::config::{LightConfig, SentryConfig};
use crate::drivers::pir::PirSensor;
use crate::drivers::pwm_light::{PwmLight, RgbLight};
use crate::drivers::soft_pwm::SoftPwm;

/// The light as wired on the board.
pub enum PiLight {
    Mono(PwmLight<SoftPwm>),
    Rgb(RgbLight<SoftPwm>),
}

impl LightPort for PiLight {
    fn set_intensity(&mut self, percent: u8) {
        match self {
            Self::Mono(light) => light.set_intensity(percent),
            Self::Rgb(light) => light.set_intensity(percent),
        }
    }

    fn intensity(&self) -> u8 {
        match self {
            Self::Mono(light) => light.intensity(),
            Self::Rgb(light) => light.intensity(),
        }
    }

    fn release(&mut self) {
        match self {
            Self::Mono(light) => light.release(),
            Self::Rgb(light) => light.release(),
        }
    }
}

/// GPIO-backed light and sensor.
pub struct PiHardware {
    pub light: PiLight,
    pub pir: PirSensor<InputPin>,
}

impl PiHardware {
    pub fn init(config: &SentryConfig) -> Result<Self> {
        let gpio = Gpio::new().context("opening GPIO")?;

        let channel = |pin: u8| -> Result<SoftPwm> {
            let out = gpio
                .get(pin)
                .with_context(|| format!("claiming GPIO {pin} for light"))?
                .into_output_low();
            Ok(SoftPwm::new(out, config.pwm_frequency_hz))
        };

        let light = match config.light {
            LightConfig::Mono { led_pin } => {
                info!("light: single LED on GPIO {led_pin}");
                PiLight::Mono(PwmLight::new(channel(led_pin)?))
            }
            LightConfig::Rgb {
                red_pin,
                green_pin,
                blue_pin,
                colour,
            } => {
                info!("light: RGB on GPIO {red_pin}/{green_pin}/{blue_pin}, colour {colour:?}");
                PiLight::Rgb(RgbLight::new(
                    [channel(red_pin)?, channel(green_pin)?, channel(blue_pin)?],
                    colour,
                ))
            }
        };

        let pir_pin = gpio
            .get(config.pir_pin)
            .with_context(|| format!("claiming GPIO {} for PIR", config.pir_pin))?
            .into_input();
        info!("PIR on GPIO {}", config.pir_pin);

        Ok(Self {
            light,
            pir: PirSensor::new(pir_pin),
        })
    }
}
