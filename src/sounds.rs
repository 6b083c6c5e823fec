//! Sound cues and the clip handles behind them.
//!
//! A [`SoundSet`] is built once from [`SoundPaths`] and never changes.
//! `Unauthorized` and `Warning` carry several alternative clips; one is
//! chosen uniformly at random each time the cue is played.

use core::fmt;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::SoundPaths;
use crate::error::ConfigError;

/// Logical sound cue, one per escalation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    PowerOn,
    Unauthorized,
    Warning,
    Alarm,
    PowerDown,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Self::PowerOn => "power_on",
            Self::Unauthorized => "unauthorized",
            Self::Warning => "warning",
            Self::Alarm => "alarm",
            Self::PowerDown => "power_down",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to one playable clip.  The playback service resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipHandle(PathBuf);

impl ClipHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ClipHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.file_name() {
            Some(name) => write!(f, "{}", name.to_string_lossy()),
            None => write!(f, "{}", self.0.display()),
        }
    }
}

/// Immutable cue → clip mapping.
#[derive(Debug, Clone)]
pub struct SoundSet {
    power_on: ClipHandle,
    unauthorized: Vec<ClipHandle>,
    warning: Vec<ClipHandle>,
    alarm: ClipHandle,
    power_down: ClipHandle,
}

impl SoundSet {
    /// Build from config paths.  The alternative lists must be non-empty.
    pub fn from_paths(paths: &SoundPaths) -> Result<Self, ConfigError> {
        if paths.unauthorized.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "sounds.unauthorized must not be empty",
            ));
        }
        if paths.warning.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "sounds.warning must not be empty",
            ));
        }
        Ok(Self {
            power_on: ClipHandle::new(&paths.power_on),
            unauthorized: paths.unauthorized.iter().map(ClipHandle::new).collect(),
            warning: paths.warning.iter().map(ClipHandle::new).collect(),
            alarm: ClipHandle::new(&paths.alarm),
            power_down: ClipHandle::new(&paths.power_down),
        })
    }

    /// Fail with the first clip whose file is not on disk.
    pub fn ensure_present(&self) -> Result<(), ConfigError> {
        match self.clips().find(|clip| !clip.path().is_file()) {
            Some(missing) => Err(ConfigError::MissingClip(missing.path().to_path_buf())),
            None => Ok(()),
        }
    }

    /// Pick the clip for `cue`, drawing uniformly among alternatives.
    pub fn pick<R: Rng + ?Sized>(&self, cue: Cue, rng: &mut R) -> Option<&ClipHandle> {
        match cue {
            Cue::PowerOn => Some(&self.power_on),
            Cue::Unauthorized => self.unauthorized.choose(rng),
            Cue::Warning => self.warning.choose(rng),
            Cue::Alarm => Some(&self.alarm),
            Cue::PowerDown => Some(&self.power_down),
        }
    }

    /// Alternatives registered for `cue`.
    pub fn alternatives(&self, cue: Cue) -> &[ClipHandle] {
        match cue {
            Cue::PowerOn => core::slice::from_ref(&self.power_on),
            Cue::Unauthorized => &self.unauthorized,
            Cue::Warning => &self.warning,
            Cue::Alarm => core::slice::from_ref(&self.alarm),
            Cue::PowerDown => core::slice::from_ref(&self.power_down),
        }
    }

    /// Every clip in the set, in cue order.
    pub fn clips(&self) -> impl Iterator<Item = &ClipHandle> {
        std::iter::once(&self.power_on)
            .chain(self.unauthorized.iter())
            .chain(self.warning.iter())
            .chain([&self.alarm, &self.power_down])
    }
}
