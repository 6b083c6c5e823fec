//! Shutdown coordination.
//!
//! ```text
//!   signal handler ──request()──▶ ┌──────────────┐
//!                                  │ ShutdownFlag │  ARMED → REQUESTED → SHUTTING_DOWN
//!   main loop ──────try_engage()─▶ └──────────────┘          (CAS)         (terminal)
//! ```
//!
//! [`SHUTDOWN`] is the only process-wide mutable state in the crate.  The
//! signal callback touches nothing else: it performs one atomic
//! compare-and-set and returns.  The power-down sequence itself runs on
//! the main thread once the loop notices the request.
//!
//! [`ShutdownFlag::try_engage`] is the single-execution gate: the first
//! caller to win the compare-and-set runs cleanup, every later caller sees
//! [`ShutdownOutcome::AlreadyShuttingDown`] and returns immediately.

use core::fmt;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};

use log::{debug, warn};

const ARMED: u8 = 0;
const REQUESTED: u8 = 1;
const SHUTTING_DOWN: u8 = 2;

/// Process-wide shutdown flag.  Never reset.
pub static SHUTDOWN: ShutdownFlag = ShutdownFlag::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPhase {
    Armed,
    /// A trigger has asked for shutdown; the main loop has not acted yet.
    Requested,
    ShuttingDown,
}

/// Atomic three-phase flag.  Transitions only move forward.
#[derive(Debug)]
pub struct ShutdownFlag(AtomicU8);

impl ShutdownFlag {
    pub const fn new() -> Self {
        Self(AtomicU8::new(ARMED))
    }

    /// Ask for shutdown.  Async-signal-safe: a single lock-free CAS.
    pub fn request(&self) {
        let _ = self
            .0
            .compare_exchange(ARMED, REQUESTED, Ordering::SeqCst, Ordering::SeqCst);
    }

    /// `true` once any trigger has fired.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst) != ARMED
    }

    /// Claim the right to run cleanup.  Returns `true` for exactly one
    /// caller over the life of the flag.
    pub fn try_engage(&self) -> bool {
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |phase| {
                (phase != SHUTTING_DOWN).then_some(SHUTTING_DOWN)
            })
            .is_ok()
    }

    pub fn phase(&self) -> ShutdownPhase {
        match self.0.load(Ordering::SeqCst) {
            ARMED => ShutdownPhase::Armed,
            REQUESTED => ShutdownPhase::Requested,
            _ => ShutdownPhase::ShuttingDown,
        }
    }
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// What triggered the shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / SIGTERM.
    Interrupt,
    /// The control loop returned or unwound.
    LoopExited,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("interrupt"),
            Self::LoopExited => f.write_str("main loop exited"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// This call ran the power-down sequence and released resources.
    Completed,
    /// Another trigger got there first; nothing was done.
    AlreadyShuttingDown,
}

/// Single-execution gate around the power-down sequence.
#[derive(Debug, Clone, Copy)]
pub struct ShutdownCoordinator<'f> {
    flag: &'f ShutdownFlag,
}

impl ShutdownCoordinator<'static> {
    /// Coordinator bound to the process-wide [`SHUTDOWN`] flag.
    pub fn global() -> Self {
        Self { flag: &SHUTDOWN }
    }
}

impl<'f> ShutdownCoordinator<'f> {
    pub fn new(flag: &'f ShutdownFlag) -> Self {
        Self { flag }
    }

    pub fn flag(&self) -> &'f ShutdownFlag {
        self.flag
    }

    pub fn request(&self) {
        self.flag.request();
    }

    pub fn is_requested(&self) -> bool {
        self.flag.is_requested()
    }

    /// Run `power_down` if and only if this is the first trigger.
    pub fn trigger<F: FnOnce()>(&self, reason: ShutdownReason, power_down: F) -> ShutdownOutcome {
        if !self.flag.try_engage() {
            debug!("shutdown gate already engaged, ignoring {reason}");
            return ShutdownOutcome::AlreadyShuttingDown;
        }
        debug!("shutdown gate engaged by {reason}");
        power_down();
        ShutdownOutcome::Completed
    }
}

/// Route SIGINT and SIGTERM to [`SHUTDOWN`].
///
/// The registered callback only calls [`ShutdownFlag::request`].
pub fn register_signal_handlers() -> io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    for signal in [SIGINT, SIGTERM] {
        // SAFETY: the action is a single atomic compare-exchange on a
        // static: no allocation, no locks, no I/O.
        let registered = unsafe { signal_hook::low_level::register(signal, || SHUTDOWN.request()) };
        if let Err(e) = registered {
            warn!("failed to register handler for signal {signal}: {e}");
            return Err(e);
        }
    }
    Ok(())
}
