//! Default GPIO assignments (BCM numbering) for the sentry board.
//!
//! The live values come from the config file; these are the defaults used
//! by [`SentryConfig::default`](crate::config::SentryConfig) and by the
//! sample `config.json`.

// ---------------------------------------------------------------------------
// Motion sensor
// ---------------------------------------------------------------------------

/// HC-SR501 PIR output.  HIGH = motion.
pub const PIR_GPIO: u8 = 27;

// ---------------------------------------------------------------------------
// Light actuators
// ---------------------------------------------------------------------------

/// Single white LED / MOSFET gate, driven by software PWM.
pub const LED_GPIO: u8 = 17;

/// Discrete RGB LED channels (common cathode).  Red shares the mono pin.
pub const LED_R_GPIO: u8 = 17;
pub const LED_G_GPIO: u8 = 22;
pub const LED_B_GPIO: u8 = 24;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Software PWM frequency for the light channels.
pub const LED_PWM_FREQ_HZ: f64 = 100.0;
