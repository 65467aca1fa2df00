//! Match clock state machine.
//!
//! This module owns the timed-segment state for a match: elapsed seconds,
//! target duration, half progression, the one-shot cue trigger, and the two
//! team scores. Every tick and every manual mutation publishes a complete
//! display frame to an injected sink, which is how the mirrored scoreboard
//! stays current without reaching into widget state.
//!
//! The clock never schedules itself; the surface loop calls [`MatchClock::tick`]
//! once per second while the clock is running. Invalid transitions (starting a
//! running clock, advancing a half mid-play) are silent no-ops.

use crate::audio::jingles::JingleLibrary;
use crate::constants::CRITICAL_WINDOW_SECS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// Two halves, advanced manually; the match never ends on its own.
    Normal,
    /// One segment that ends automatically when the target is reached.
    SingleSegment,
}

impl ClockMode {
    pub fn total_halves(self) -> u32 {
        match self {
            ClockMode::Normal => 2,
            ClockMode::SingleSegment => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Ready,
    Running,
    Paused,
    Ended,
}

/// Display color for the clock digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Base,
    Critical,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Home,
    Away,
}

/// One complete scoreboard update: time text, status label, both scores,
/// and the color the time should be drawn in.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    pub time_text: String,
    pub label_text: String,
    pub home_score: u32,
    pub away_score: u32,
    pub color: ColorTag,
}

/// Sink for scoreboard updates. Published exactly once per tick and once per
/// manual mutation, in order, never batched.
pub trait DisplaySink {
    fn publish(&mut self, frame: &DisplayFrame);
}

/// What a single tick asked the orchestrator to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Jingle to decode and play (the one-shot cue fired this tick).
    pub cue: Option<PathBuf>,
    /// The segment ended this tick; stop any active playback and stop ticking.
    pub ended: bool,
}

pub struct MatchClock {
    elapsed_seconds: u32,
    target_seconds: u32,
    configured_minutes: u32,
    configured_mode: ClockMode,
    mode: ClockMode,
    current_half: u32,
    state: ClockState,
    cue_triggered: bool,
    auto_cue: bool,
    home_score: u32,
    away_score: u32,
    sink: Box<dyn DisplaySink>,
}

impl MatchClock {
    pub fn new(sink: Box<dyn DisplaySink>) -> Self {
        let minutes = crate::constants::DEFAULT_MATCH_MINUTES;
        Self {
            elapsed_seconds: 0,
            target_seconds: minutes * 60,
            configured_minutes: minutes,
            configured_mode: ClockMode::Normal,
            mode: ClockMode::Normal,
            current_half: 1,
            state: ClockState::Ready,
            cue_triggered: false,
            auto_cue: true,
            home_score: 0,
            away_score: 0,
            sink,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn target_seconds(&self) -> u32 {
        self.target_seconds
    }

    pub fn current_half(&self) -> u32 {
        self.current_half
    }

    pub fn score(&self, team: Team) -> u32 {
        match team {
            Team::Home => self.home_score,
            Team::Away => self.away_score,
        }
    }

    pub fn auto_cue(&self) -> bool {
        self.auto_cue
    }

    /// Effective from the next start-from-zero or reset.
    pub fn set_target_minutes(&mut self, minutes: u32) {
        self.configured_minutes = minutes.max(1);
    }

    /// Effective from the next start-from-zero or reset.
    pub fn set_mode(&mut self, mode: ClockMode) {
        self.configured_mode = mode;
        self.publish();
    }

    pub fn set_auto_cue(&mut self, enabled: bool) {
        self.auto_cue = enabled;
    }

    /// Advance the clock by one second and publish the resulting frame.
    ///
    /// Returns what the orchestrator must do: begin a cue decode, stop
    /// playback on segment end, or nothing. Does nothing unless running.
    pub fn tick(&mut self, jingles: &JingleLibrary) -> TickOutcome {
        if self.state != ClockState::Running {
            return TickOutcome::default();
        }

        self.elapsed_seconds += 1;

        let boundary = self.segment_boundary();
        let critical = self.elapsed_seconds >= boundary.saturating_sub(CRITICAL_WINDOW_SECS);

        let mut outcome = TickOutcome::default();

        if critical
            && self.mode == ClockMode::SingleSegment
            && !self.cue_triggered
            && self.auto_cue
            && !jingles.is_empty()
        {
            outcome.cue = jingles.pick_random().cloned();
            // Set before the async decode returns so overlapping ticks
            // cannot fire a second request.
            self.cue_triggered = true;
        }

        if self.elapsed_seconds >= boundary && self.mode == ClockMode::SingleSegment {
            self.state = ClockState::Ended;
            outcome.ended = true;
        }

        self.publish();
        outcome
    }

    /// Begin or resume ticking. No-op unless Ready or Paused.
    pub fn start(&mut self) {
        match self.state {
            ClockState::Ready => {
                // Starting from zero picks up the configured duration and mode.
                self.apply_configuration();
                self.cue_triggered = false;
                self.state = ClockState::Running;
                self.publish();
            }
            ClockState::Paused => {
                self.state = ClockState::Running;
                self.publish();
            }
            ClockState::Running | ClockState::Ended => {}
        }
    }

    /// Pause ticking. No-op unless running. Elapsed time is untouched.
    pub fn stop(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
            self.publish();
        }
    }

    /// Force the clock back to the ready state: zero elapsed, first half,
    /// scores cleared, configuration re-applied. The orchestrator stops any
    /// cue playback before calling this.
    pub fn reset(&mut self) {
        self.state = ClockState::Ready;
        self.elapsed_seconds = 0;
        self.current_half = 1;
        self.cue_triggered = false;
        self.home_score = 0;
        self.away_score = 0;
        self.apply_configuration();
        self.publish();
    }

    /// Move to the next half (Normal mode only). Pauses a running clock,
    /// rebases elapsed time to the start of the new half, and re-arms the
    /// cue trigger. No-op in SingleSegment or at the last half.
    pub fn advance_half(&mut self) {
        if self.mode != ClockMode::Normal || self.current_half >= self.mode.total_halves() {
            return;
        }
        if self.state == ClockState::Running {
            self.stop();
        }
        self.current_half += 1;
        self.elapsed_seconds = self.target_seconds * (self.current_half - 1);
        self.cue_triggered = false;
        self.publish();
    }

    /// Adjust a team's score, clamped at zero, and republish immediately so
    /// score buttons reach the mirrored display without waiting for a tick.
    pub fn update_score(&mut self, team: Team, delta: i32) {
        let score = match team {
            Team::Home => &mut self.home_score,
            Team::Away => &mut self.away_score,
        };
        *score = (*score as i64 + delta as i64).max(0) as u32;
        self.publish();
    }

    /// End of the current segment in absolute clock seconds. Each Normal-mode
    /// half spans one target duration; rebasing elapsed time on a half
    /// advance keeps this comparison meaningful for the second half.
    fn segment_boundary(&self) -> u32 {
        self.target_seconds * self.current_half
    }

    fn apply_configuration(&mut self) {
        self.target_seconds = self.configured_minutes.max(1) * 60;
        self.mode = self.configured_mode;
    }

    fn color(&self) -> ColorTag {
        if self.state == ClockState::Ready {
            return ColorTag::Base;
        }
        let boundary = self.segment_boundary();
        if self.elapsed_seconds >= boundary {
            ColorTag::Ended
        } else if self.elapsed_seconds >= boundary.saturating_sub(CRITICAL_WINDOW_SECS) {
            ColorTag::Critical
        } else {
            ColorTag::Base
        }
    }

    fn label(&self) -> &'static str {
        match self.state {
            ClockState::Ready => "MATCH READY",
            ClockState::Paused => "MATCH PAUSED",
            ClockState::Ended => "FULL TIME",
            ClockState::Running => match (self.mode, self.current_half) {
                (ClockMode::SingleSegment, _) => "MATCH RUNNING",
                (ClockMode::Normal, 1) => "FIRST HALF",
                (ClockMode::Normal, _) => "SECOND HALF",
            },
        }
    }

    fn publish(&mut self) {
        let frame = DisplayFrame {
            time_text: format_time(self.elapsed_seconds),
            label_text: self.label().to_string(),
            home_score: self.home_score,
            away_score: self.away_score,
            color: self.color(),
        };
        self.sink.publish(&frame);
    }
}

pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder {
        frames: Rc<RefCell<Vec<DisplayFrame>>>,
    }

    impl DisplaySink for Recorder {
        fn publish(&mut self, frame: &DisplayFrame) {
            self.frames.borrow_mut().push(frame.clone());
        }
    }

    fn clock_with_recorder() -> (MatchClock, Recorder) {
        let recorder = Recorder::default();
        let clock = MatchClock::new(Box::new(recorder.clone()));
        (clock, recorder)
    }

    fn single_segment_clock(minutes: u32) -> (MatchClock, Recorder) {
        let (mut clock, recorder) = clock_with_recorder();
        clock.set_mode(ClockMode::SingleSegment);
        clock.set_target_minutes(minutes);
        clock.reset();
        (clock, recorder)
    }

    #[test]
    fn test_initial_state() {
        let (clock, _) = clock_with_recorder();
        assert_eq!(clock.state(), ClockState::Ready);
        assert_eq!(clock.elapsed_seconds(), 0);
        assert_eq!(clock.current_half(), 1);
        assert_eq!(clock.score(Team::Home), 0);
        assert_eq!(clock.score(Team::Away), 0);
    }

    #[test]
    fn test_tick_does_nothing_unless_running() {
        let (mut clock, _) = clock_with_recorder();
        let jingles = JingleLibrary::new();
        assert_eq!(clock.tick(&jingles), TickOutcome::default());
        assert_eq!(clock.elapsed_seconds(), 0);
    }

    #[test]
    fn test_start_is_noop_while_running() {
        let (mut clock, _) = clock_with_recorder();
        clock.start();
        assert_eq!(clock.state(), ClockState::Running);
        clock.start();
        assert_eq!(clock.state(), ClockState::Running);
    }

    #[test]
    fn test_stop_and_resume_keep_elapsed() {
        let (mut clock, _) = clock_with_recorder();
        let jingles = JingleLibrary::new();
        clock.start();
        for _ in 0..10 {
            clock.tick(&jingles);
        }
        clock.stop();
        assert_eq!(clock.state(), ClockState::Paused);
        assert_eq!(clock.elapsed_seconds(), 10);
        clock.start();
        assert_eq!(clock.state(), ClockState::Running);
        assert_eq!(clock.elapsed_seconds(), 10);
    }

    #[test]
    fn test_single_segment_ends_on_exact_tick() {
        let (mut clock, _) = single_segment_clock(2);
        let jingles = JingleLibrary::new();
        clock.start();
        for _ in 0..119 {
            let outcome = clock.tick(&jingles);
            assert!(!outcome.ended);
        }
        assert_eq!(clock.state(), ClockState::Running);

        let outcome = clock.tick(&jingles);
        assert!(outcome.ended);
        assert_eq!(clock.state(), ClockState::Ended);
        assert_eq!(clock.elapsed_seconds(), 120);

        // Ended clock no longer advances
        clock.tick(&jingles);
        assert_eq!(clock.elapsed_seconds(), 120);
    }

    #[test]
    fn test_cue_fires_once_at_window_entry() {
        let (mut clock, _) = single_segment_clock(12);
        let mut jingles = JingleLibrary::new();
        jingles.set_library(vec![
            PathBuf::from("a.wav"),
            PathBuf::from("b.wav"),
            PathBuf::from("c.wav"),
        ]);
        clock.start();

        let mut cue_ticks = Vec::new();
        for _ in 0..720 {
            let outcome = clock.tick(&jingles);
            if outcome.cue.is_some() {
                cue_ticks.push(clock.elapsed_seconds());
            }
        }
        // 720s target: window opens at 660 and the cue fires exactly once
        assert_eq!(cue_ticks, vec![660]);
        assert_eq!(clock.state(), ClockState::Ended);
    }

    #[test]
    fn test_cue_rearms_after_reset() {
        let (mut clock, _) = single_segment_clock(2);
        let mut jingles = JingleLibrary::new();
        jingles.set_library(vec![PathBuf::from("a.wav")]);

        clock.start();
        let mut fired = 0;
        for _ in 0..120 {
            if clock.tick(&jingles).cue.is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);

        clock.reset();
        clock.start();
        for _ in 0..120 {
            if clock.tick(&jingles).cue.is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_no_cue_when_disabled_or_empty() {
        let (mut clock, _) = single_segment_clock(2);
        let jingles = JingleLibrary::new();
        clock.start();
        for _ in 0..120 {
            assert!(clock.tick(&jingles).cue.is_none());
        }

        let (mut clock, _) = single_segment_clock(2);
        let mut jingles = JingleLibrary::new();
        jingles.set_library(vec![PathBuf::from("a.wav")]);
        clock.set_auto_cue(false);
        clock.start();
        for _ in 0..120 {
            assert!(clock.tick(&jingles).cue.is_none());
        }
    }

    #[test]
    fn test_normal_mode_runs_past_target() {
        let (mut clock, _) = clock_with_recorder();
        clock.set_target_minutes(45);
        clock.reset();
        let jingles = JingleLibrary::new();
        clock.start();
        for _ in 0..2700 {
            let outcome = clock.tick(&jingles);
            assert!(!outcome.ended);
            assert!(outcome.cue.is_none());
        }
        assert_eq!(clock.state(), ClockState::Running);
        assert_eq!(clock.elapsed_seconds(), 2700);

        clock.advance_half();
        assert_eq!(clock.current_half(), 2);
        assert_eq!(clock.elapsed_seconds(), 2700);
        assert_eq!(clock.state(), ClockState::Paused);
    }

    #[test]
    fn test_advance_half_noops() {
        // SingleSegment has no second half
        let (mut clock, _) = single_segment_clock(2);
        clock.advance_half();
        assert_eq!(clock.current_half(), 1);

        // Normal mode stops at the last half
        let (mut clock, _) = clock_with_recorder();
        clock.advance_half();
        assert_eq!(clock.current_half(), 2);
        clock.advance_half();
        assert_eq!(clock.current_half(), 2);
    }

    #[test]
    fn test_second_half_colors_match_first() {
        let (mut clock, recorder) = clock_with_recorder();
        clock.set_target_minutes(2);
        clock.reset();
        let jingles = JingleLibrary::new();
        clock.start();
        for _ in 0..120 {
            clock.tick(&jingles);
        }
        clock.advance_half();
        clock.start();
        recorder.frames.borrow_mut().clear();

        clock.tick(&jingles);
        let frame = recorder.frames.borrow().last().cloned().unwrap();
        // Second half starts over at the base color, not pinned at the end color
        assert_eq!(frame.color, ColorTag::Base);
        assert_eq!(frame.label_text, "SECOND HALF");
    }

    #[test]
    fn test_score_floor_at_zero() {
        let (mut clock, _) = clock_with_recorder();
        clock.update_score(Team::Home, -1);
        assert_eq!(clock.score(Team::Home), 0);
        clock.update_score(Team::Home, 3);
        clock.update_score(Team::Home, -1);
        assert_eq!(clock.score(Team::Home), 2);
        assert_eq!(clock.score(Team::Away), 0);
    }

    #[test]
    fn test_score_update_republishes() {
        let (mut clock, recorder) = clock_with_recorder();
        let before = recorder.frames.borrow().len();
        clock.update_score(Team::Away, 1);
        let frames = recorder.frames.borrow();
        assert_eq!(frames.len(), before + 1);
        assert_eq!(frames.last().unwrap().away_score, 1);
    }

    #[test]
    fn test_publish_once_per_tick_in_order() {
        let (mut clock, recorder) = single_segment_clock(2);
        let jingles = JingleLibrary::new();
        clock.start();
        recorder.frames.borrow_mut().clear();
        for _ in 0..5 {
            clock.tick(&jingles);
        }
        let frames = recorder.frames.borrow();
        let times: Vec<&str> = frames.iter().map(|f| f.time_text.as_str()).collect();
        assert_eq!(times, vec!["00:01", "00:02", "00:03", "00:04", "00:05"]);
    }

    #[test]
    fn test_display_colors_across_segment() {
        let (mut clock, recorder) = single_segment_clock(2);
        let jingles = JingleLibrary::new();
        clock.start();

        for _ in 0..59 {
            clock.tick(&jingles);
        }
        assert_eq!(recorder.frames.borrow().last().unwrap().color, ColorTag::Base);

        // Second 60 enters the critical window of a 120s segment
        clock.tick(&jingles);
        assert_eq!(
            recorder.frames.borrow().last().unwrap().color,
            ColorTag::Critical
        );

        for _ in 0..60 {
            clock.tick(&jingles);
        }
        let frame = recorder.frames.borrow().last().cloned().unwrap();
        assert_eq!(frame.color, ColorTag::Ended);
        assert_eq!(frame.label_text, "FULL TIME");
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut clock, recorder) = single_segment_clock(2);
        let mut jingles = JingleLibrary::new();
        jingles.set_library(vec![PathBuf::from("a.wav")]);
        clock.start();
        for _ in 0..80 {
            clock.tick(&jingles);
        }
        clock.update_score(Team::Home, 2);

        clock.reset();
        assert_eq!(clock.state(), ClockState::Ready);
        assert_eq!(clock.elapsed_seconds(), 0);
        assert_eq!(clock.current_half(), 1);
        assert_eq!(clock.score(Team::Home), 0);
        let frame = recorder.frames.borrow().last().cloned().unwrap();
        assert_eq!(frame.time_text, "00:00");
        assert_eq!(frame.label_text, "MATCH READY");
        assert_eq!(frame.color, ColorTag::Base);
    }

    #[test]
    fn test_new_duration_applies_on_start_from_zero() {
        let (mut clock, _) = single_segment_clock(2);
        let jingles = JingleLibrary::new();
        clock.start();
        clock.tick(&jingles);
        // Mid-run changes do not retarget the active segment
        clock.set_target_minutes(1);
        assert_eq!(clock.target_seconds(), 120);
        clock.stop();
        clock.start();
        assert_eq!(clock.target_seconds(), 120);

        clock.reset();
        assert_eq!(clock.target_seconds(), 60);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(719), "11:59");
        assert_eq!(format_time(2700), "45:00");
    }
}
