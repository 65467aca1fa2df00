//! Waveform analysis for the cue visualization.
//!
//! Decodes a PCM WAV file into a compact peak envelope plus a duration
//! estimate. Decoding a whole file is proportional to its size, so analysis
//! runs on a worker thread and hands its result back to the control loop
//! through a channel; every request carries a generation number so a stale
//! decode can never overwrite a newer one.
//!
//! Analysis never fails from the caller's point of view: unreadable files,
//! corrupt headers, and unsupported bit depths all collapse into an empty
//! envelope with zero duration.

use crate::constants::{AMPLITUDE_EPSILON, ENVELOPE_LEN, RAW_SAMPLE_TARGET};
use hound::SampleFormat;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

/// Downsampled peak envelope for one audio file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveformProfile {
    /// Peak amplitudes in [0, 1], at most [`ENVELOPE_LEN`] of them.
    pub envelope: Vec<f32>,
    /// Track length in seconds; zero when the file could not be decoded.
    pub duration_seconds: f32,
}

impl WaveformProfile {
    /// The "decode failed or unsupported format" result. Valid, not an error.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.envelope.is_empty()
    }

    /// Normalization factor for drawing. Near-silent envelopes scale by 1.0
    /// so noise is not blown up to full height.
    pub fn max_scale(&self) -> f32 {
        let max = self.envelope.iter().copied().fold(0.0f32, f32::max);
        if max > AMPLITUDE_EPSILON { max } else { 1.0 }
    }
}

/// Completed analysis handed back to the control loop.
pub struct AnalysisResult {
    pub generation: u64,
    pub path: PathBuf,
    pub profile: WaveformProfile,
    /// Start playback once the result is applied (the decode-then-play cue).
    pub play_after: bool,
}

/// Analyze `path` on a worker thread and deliver the result on `tx`.
///
/// The worker computes a pure value; all shared state stays in the control
/// loop, which drops the result if `generation` is no longer current.
pub fn spawn_analysis(
    path: PathBuf,
    generation: u64,
    play_after: bool,
    tx: Sender<AnalysisResult>,
) {
    thread::spawn(move || {
        let profile = analyze_wav(&path);
        // Receiver gone means the surface shut down; nothing to do.
        let _ = tx.send(AnalysisResult {
            generation,
            path,
            profile,
            play_after,
        });
    });
}

/// Decode a WAV file into a [`WaveformProfile`]. Never returns an error;
/// anything undecodable becomes the empty profile.
pub fn analyze_wav(path: &Path) -> WaveformProfile {
    match decode(path) {
        Ok(profile) => profile,
        Err(e) => {
            log::warn!("waveform analysis failed for {}: {e}", path.display());
            WaveformProfile::empty()
        }
    }
}

fn decode(path: &Path) -> Result<WaveformProfile, Box<dyn Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let frames = reader.duration();
    let duration_seconds = frames as f32 / spec.sample_rate as f32;

    // Bound the raw sample volume before reduction
    let stride = (frames / RAW_SAMPLE_TARGET).max(1) as usize;
    let step = stride * spec.channels as usize;

    let amplitudes: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => {
            // 8-bit WAV is unsigned centered at 128; hound exposes it signed
            collect_amplitudes(reader.samples::<i8>(), step, |s: i8| {
                (s as i32).unsigned_abs() as f32 / 128.0
            })?
        }
        (SampleFormat::Int, 16) => collect_amplitudes(reader.samples::<i16>(), step, |s: i16| {
            s.unsigned_abs() as f32 / 32768.0
        })?,
        (SampleFormat::Float, 32) => {
            collect_amplitudes(reader.samples::<f32>(), step, f32::abs)?
        }
        // Other depths degrade to the empty result rather than failing
        _ => return Ok(WaveformProfile::empty()),
    };

    Ok(WaveformProfile {
        envelope: reduce_peaks(&amplitudes, ENVELOPE_LEN),
        duration_seconds,
    })
}

/// Take the first channel of every `step`-th interleaved position and map it
/// to an amplitude, failing on the first decode error.
fn collect_amplitudes<S>(
    samples: impl Iterator<Item = Result<S, hound::Error>>,
    step: usize,
    to_amplitude: impl Fn(S) -> f32,
) -> Result<Vec<f32>, hound::Error> {
    samples
        .step_by(step)
        .map(|s| s.map(&to_amplitude))
        .collect()
}

/// Reduce an amplitude sequence to at most `target` peaks.
///
/// Blocks are contiguous and non-overlapping, every input sample lands in
/// exactly one block, and each output value is its block's maximum. The
/// ceiling block size is what keeps the output within `target` even when the
/// input length is not a multiple of it.
pub fn reduce_peaks(samples: &[f32], target: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let block = samples.len().div_ceil(target.max(1)).max(1);
    samples
        .chunks(block)
        .map(|chunk| chunk.iter().copied().fold(0.0f32, f32::max))
        .collect()
}
