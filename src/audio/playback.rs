//! Cue playback with wall-clock progress tracking.
//!
//! Rodio owns the decode-to-device path; progress is derived from the time
//! elapsed since playback started against the duration the analyzer reported,
//! the same timebase the match clock runs on. The output device is a single
//! global resource, so starting a new cue implicitly stops the previous one.
//!
//! Device initialization is lazy and failure-tolerant: if no output device
//! can be opened the failure is reported once, audio stays disabled for the
//! session, and the clock keeps running.

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Normalized playback position published to the visualization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackProgress {
    /// Fraction of the track played, in [0, 1].
    pub fraction: f32,
    /// Playhead position as a fraction of the waveform width, in [0, 1].
    pub playhead: f32,
}

impl PlaybackProgress {
    pub fn zero() -> Self {
        Self::default()
    }
}

struct PlaybackSession {
    duration_seconds: f32,
    started_at: Instant,
}

pub struct PlaybackSynchronizer {
    // The stream must stay alive for the sink to produce sound
    stream: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    session: Option<PlaybackSession>,
    device_failed: bool,
}

impl Default for PlaybackSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            session: None,
            device_failed: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// Begin playing `path`. Any prior session is stopped first; overlapping
    /// cues never mix. `known_duration` comes from the analyzer; when it is
    /// zero the decoder's own length report is used, and failing that one
    /// second so progress math stays defined (readings are then meaningless
    /// but harmless).
    pub fn start(&mut self, path: &Path, known_duration: f32) {
        self.stop();

        let Some(handle) = self.ensure_engine() else {
            return;
        };

        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::error!("could not create playback sink: {e}");
                return;
            }
        };

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("could not open {}: {e}", path.display());
                return;
            }
        };

        let decoder = match Decoder::new(BufReader::new(file)) {
            Ok(decoder) => decoder,
            Err(e) => {
                log::warn!("could not decode {}: {e}", path.display());
                return;
            }
        };

        let mut duration_seconds = known_duration;
        if duration_seconds <= 0.0 {
            duration_seconds = decoder
                .total_duration()
                .map(|d| d.as_secs_f32())
                .unwrap_or(0.0);
        }
        if duration_seconds <= 0.0 {
            duration_seconds = 1.0;
        }

        sink.append(decoder);
        self.sink = Some(sink);
        self.session = Some(PlaybackSession {
            duration_seconds,
            started_at: Instant::now(),
        });
        log::info!(
            "playing {} ({duration_seconds:.1}s)",
            path.display()
        );
    }

    /// Sample the current position. `None` while idle. When the engine
    /// reports the track finished, the session is torn down and a zeroed
    /// progress is returned once so the visualization clears.
    pub fn poll(&mut self) -> Option<PlaybackProgress> {
        let (duration_seconds, started_at) = match &self.session {
            Some(session) => (session.duration_seconds, session.started_at),
            None => return None,
        };

        let finished = self.sink.as_ref().is_none_or(|sink| sink.empty());
        if finished {
            self.stop();
            return Some(PlaybackProgress::zero());
        }

        let fraction = progress_fraction(started_at.elapsed().as_secs_f32(), duration_seconds);
        Some(PlaybackProgress {
            fraction,
            playhead: fraction,
        })
    }

    /// Halt output and destroy the session. Idempotent.
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.session = None;
    }

    fn ensure_engine(&mut self) -> Option<OutputStreamHandle> {
        if let Some((_, handle)) = &self.stream {
            return Some(handle.clone());
        }
        if self.device_failed {
            return None;
        }
        match OutputStream::try_default() {
            Ok((stream, handle)) => {
                self.stream = Some((stream, handle.clone()));
                Some(handle)
            }
            Err(e) => {
                // Reported once; the clock and scoring keep working without audio
                log::error!("audio output unavailable, cues disabled: {e}");
                self.device_failed = true;
                None
            }
        }
    }
}

/// Elapsed-over-duration, clamped to [0, 1]. The engine can report a track
/// busy slightly past its nominal length; the overshoot is not shown.
pub fn progress_fraction(elapsed_seconds: f32, duration_seconds: f32) -> f32 {
    (elapsed_seconds / duration_seconds.max(f32::EPSILON)).clamp(0.0, 1.0)
}
