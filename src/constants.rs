//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency across the codebase.

use std::time::Duration;

/// Length of the end-of-segment window in which the display turns critical
/// and the automatic cue may fire
pub const CRITICAL_WINDOW_SECS: u32 = 60;

/// Maximum number of peak values in a waveform envelope
pub const ENVELOPE_LEN: usize = 400;

/// Upper bound on raw samples retained before envelope reduction
pub const RAW_SAMPLE_TARGET: u32 = 3000;

/// Envelope maxima below this are treated as silence for redraw scaling
pub const AMPLITUDE_EPSILON: f32 = 0.001;

/// Match clock granularity: one tick per second
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Cadence of the cooperative surface loop (event poll and playback progress)
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Match length used when no configuration is present
pub const DEFAULT_MATCH_MINUTES: u32 = 45;
