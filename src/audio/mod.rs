//! Audio subsystem: jingle selection, waveform analysis, cue playback.

pub mod analyzer;
pub mod jingles;
pub mod playback;
