//! Sentry controller library.
//!
//! Exposes the state machine, synchronizer, light-pattern engine and
//! shutdown gate for integration testing.  Raspberry Pi specific adapters
//! (GPIO, software PWM, audio output) are behind the `hardware` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod logging;
pub mod pins;
pub mod shutdown;
pub mod sounds;
pub mod synchronizer;
