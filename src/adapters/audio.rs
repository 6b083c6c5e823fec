//! Audio playback adapter backed by `rodio`.
//!
//! One output stream is opened at startup and kept for the process
//! lifetime; each clip gets a fresh [`Sink`] and is played to the end on
//! the calling thread.  Clip lengths come from the decoder and are cached
//! per file.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::app::ports::AudioPort;
use crate::error::PlaybackError;
use crate::sounds::ClipHandle;

pub struct RodioPlayback {
    /// The stream must outlive every sink created from its handle.
    output: Option<(OutputStream, OutputStreamHandle)>,
    durations: HashMap<PathBuf, Duration>,
}

impl RodioPlayback {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, PlaybackError> {
        let output =
            OutputStream::try_default().map_err(|e| PlaybackError::Output(e.to_string()))?;
        info!("audio output opened");
        Ok(Self {
            output: Some(output),
            durations: HashMap::new(),
        })
    }

    fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, PlaybackError> {
        let file = File::open(path).map_err(|e| PlaybackError::Open(format!("{}: {e}", path.display())))?;
        Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::Decode(format!("{}: {e}", path.display())))
    }

    /// Length from the container header, or by counting decoded samples
    /// when the format does not report one (typical for MP3).
    fn measure(path: &Path) -> Result<Duration, PlaybackError> {
        let source = Self::decode(path)?;
        if let Some(total) = source.total_duration() {
            return Ok(total);
        }
        let channels = u64::from(source.channels());
        let rate = u64::from(source.sample_rate());
        if channels == 0 || rate == 0 {
            return Err(PlaybackError::Decode(format!(
                "{}: no channels or sample rate",
                path.display()
            )));
        }
        let samples = source.count() as u64;
        let frames = samples / channels;
        Ok(Duration::from_secs_f64(frames as f64 / rate as f64))
    }
}

impl AudioPort for RodioPlayback {
    fn play_blocking(&mut self, clip: &ClipHandle) -> Result<(), PlaybackError> {
        let (_, handle) = self.output.as_ref().ok_or(PlaybackError::Released)?;
        let source = Self::decode(clip.path())?;
        let sink = Sink::try_new(handle).map_err(|e| PlaybackError::Output(e.to_string()))?;
        debug!("playing {clip}");
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }

    fn clip_duration(&mut self, clip: &ClipHandle) -> Result<Duration, PlaybackError> {
        if let Some(length) = self.durations.get(clip.path()) {
            return Ok(*length);
        }
        let length = Self::measure(clip.path())?;
        debug!("{clip} is {:.2}s long", length.as_secs_f32());
        self.durations.insert(clip.path().to_path_buf(), length);
        Ok(length)
    }

    fn release(&mut self) {
        if self.output.take().is_some() {
            info!("audio output closed");
        }
    }
}
