//! Error types for the Sentry controller.
//!
//! One enum per concern.  Only [`ConfigError`] is fatal; it stops startup
//! before any hardware is touched.  [`PlaybackError`] and [`SensorError`]
//! are logged by the control loop and then degraded to a safe default
//! (clip finished / no motion).
//!
//! No variant exists for a shutdown race: the shutdown gate is a
//! compare-and-set, so a second power-down cannot be reached.

use core::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading and validating [`SentryConfig`](crate::config::SentryConfig).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The config file does not exist.
    NotFound(PathBuf),
    /// The file is not valid JSON or a required key is missing.
    Malformed(String),
    /// Generic I/O error while reading the file.
    Io(String),
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// A configured sound file is not present on disk.
    MissingClip(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "config not found at {}", path.display()),
            Self::Malformed(msg) => write!(f, "config malformed: {msg}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::MissingClip(path) => write!(f, "sound file missing: {}", path.display()),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Playback errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The clip file could not be opened.
    Open(String),
    /// The clip could not be decoded.
    Decode(String),
    /// The audio output device rejected the stream.
    Output(String),
    /// The playback service has already been released.
    Released,
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(msg) => write!(f, "cannot open clip: {msg}"),
            Self::Decode(msg) => write!(f, "cannot decode clip: {msg}"),
            Self::Output(msg) => write!(f, "audio output failed: {msg}"),
            Self::Released => write!(f, "playback service released"),
        }
    }
}

impl std::error::Error for PlaybackError {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read returned an error.
    GpioReadFailed,
    /// The sensor pin has already been released.
    Released,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::Released => write!(f, "sensor released"),
        }
    }
}

impl std::error::Error for SensorError {}
