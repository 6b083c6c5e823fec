//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below exercises one part of the controller against the mock
//! adapters in `mock_hw`.  Everything runs on the host; no GPIO or audio
//! device is needed.

mod log_tests;
mod mock_hw;
mod scenario_tests;
mod state_cycle_tests;
