//! PIR motion sensor.
//!
//! A plain digital input: high means motion.  No debouncing or filtering.

use embedded_hal::digital::{Error as _, InputPin};
use log::debug;

use crate::app::ports::MotionPort;
use crate::error::SensorError;

pub struct PirSensor<P> {
    pin: Option<P>,
}

impl<P: InputPin> PirSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin: Some(pin) }
    }
}

impl<P: InputPin> MotionPort for PirSensor<P> {
    fn read_motion(&mut self) -> Result<bool, SensorError> {
        let pin = self.pin.as_mut().ok_or(SensorError::Released)?;
        pin.is_high().map_err(|e| {
            debug!("PIR read error: {:?}", e.kind());
            SensorError::GpioReadFailed
        })
    }

    fn release(&mut self) {
        if self.pin.take().is_some() {
            debug!("PIR pin released");
        }
    }
}
