//! Application core — domain logic behind port traits.
//!
//! The state machine, its context, and the synchronizer talk to hardware
//! only through the traits in [`ports`], which keeps this layer testable
//! without a Raspberry Pi.

pub mod events;
pub mod ports;
pub mod service;
