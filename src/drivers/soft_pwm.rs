//! Software PWM on a Raspberry Pi GPIO output.
//!
//! rppal drives the waveform from a background thread; this wrapper only
//! exposes it as an [`embedded_hal::pwm::SetDutyCycle`] channel so the
//! light drivers stay hardware-agnostic.  The pin is reset to its
//! original mode when dropped.

use core::fmt;

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};
use rppal::gpio::OutputPin;

/// Duty resolution: one step per 0.1 %.
const MAX_DUTY: u16 = 1000;

#[derive(Debug)]
pub struct SoftPwmError(rppal::gpio::Error);

impl fmt::Display for SoftPwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "software PWM: {}", self.0)
    }
}

impl embedded_hal::pwm::Error for SoftPwmError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct SoftPwm {
    pin: OutputPin,
    frequency_hz: f64,
}

impl SoftPwm {
    pub fn new(pin: OutputPin, frequency_hz: f64) -> Self {
        Self {
            pin,
            frequency_hz,
        }
    }
}

impl ErrorType for SoftPwm {
    type Error = SoftPwmError;
}

impl SetDutyCycle for SoftPwm {
    fn max_duty_cycle(&self) -> u16 {
        MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let duty = duty.min(MAX_DUTY);
        if duty == 0 {
            // A 0 % software PWM still toggles; stop it and hold the pin low.
            self.pin.clear_pwm().map_err(SoftPwmError)?;
            self.pin.set_low();
        } else {
            let fraction = f64::from(duty) / f64::from(MAX_DUTY);
            self.pin
                .set_pwm_frequency(self.frequency_hz, fraction)
                .map_err(SoftPwmError)?;
        }
        Ok(())
    }
}

impl Drop for SoftPwm {
    fn drop(&mut self) {
        let _ = self.pin.clear_pwm();
        self.pin.set_low();
    }
}
