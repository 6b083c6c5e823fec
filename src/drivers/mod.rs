//! Light and sensor drivers.

pub mod light_patterns;
pub mod pir;
pub mod pwm_light;
#[cfg(feature = "hardware")]
pub mod soft_pwm;
