//! Application state and control flow for the match clock surface.
//!
//! This module is the central coordinator: it owns the match clock, the
//! jingle library, the playback synchronizer, and the latest analyzed
//! waveform, and drives them all from one cooperative event loop. The loop
//! wakes every 50ms to pump pending work (decode results, due ticks,
//! playback progress), redraws, and then handles at most one key event.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Instant;
use std::{error::Error, io};

use crate::audio::analyzer::{self, AnalysisResult, WaveformProfile};
use crate::audio::jingles::JingleLibrary;
use crate::audio::playback::{PlaybackProgress, PlaybackSynchronizer};
use crate::clock::{ClockMode, ClockState, DisplayFrame, DisplaySink, MatchClock, Team};
use crate::constants::{POLL_INTERVAL, TICK_INTERVAL};

use super::ui;

/// Everything the CLI resolved before handing control to the surface.
pub struct SurfaceOptions {
    pub minutes: u32,
    pub mode: ClockMode,
    pub auto_cue: bool,
    pub jingle_files: Vec<PathBuf>,
    pub home_name: String,
    pub away_name: String,
}

/// Display sink that mirrors every published frame into shared state the
/// renderer reads. The clock pushes; the draw pass only ever observes the
/// latest complete frame.
#[derive(Clone)]
struct Scoreboard {
    frame: Rc<RefCell<DisplayFrame>>,
}

impl Scoreboard {
    fn new() -> Self {
        Self {
            frame: Rc::new(RefCell::new(DisplayFrame {
                time_text: "00:00".to_string(),
                label_text: String::new(),
                home_score: 0,
                away_score: 0,
                color: crate::clock::ColorTag::Base,
            })),
        }
    }
}

impl DisplaySink for Scoreboard {
    fn publish(&mut self, frame: &DisplayFrame) {
        *self.frame.borrow_mut() = frame.clone();
    }
}

pub struct App {
    pub should_quit: bool,
    pub clock: MatchClock,
    pub jingles: JingleLibrary,
    pub playback: PlaybackSynchronizer,
    pub waveform: WaveformProfile,
    pub progress: PlaybackProgress,
    pub current_cue: Option<PathBuf>,
    pub status: Option<String>,
    pub home_name: String,
    pub away_name: String,
    frame: Rc<RefCell<DisplayFrame>>,
    analysis_tx: mpsc::Sender<AnalysisResult>,
    analysis_rx: mpsc::Receiver<AnalysisResult>,
    analysis_generation: u64,
    next_tick_at: Instant,
}

impl App {
    pub fn new(options: SurfaceOptions) -> Self {
        let scoreboard = Scoreboard::new();
        let frame = scoreboard.frame.clone();

        let mut clock = MatchClock::new(Box::new(scoreboard));
        clock.set_target_minutes(options.minutes);
        clock.set_mode(options.mode);
        clock.set_auto_cue(options.auto_cue);
        clock.reset();

        let mut jingles = JingleLibrary::new();
        jingles.set_library(options.jingle_files);

        let (analysis_tx, analysis_rx) = mpsc::channel();

        Self {
            should_quit: false,
            clock,
            jingles,
            playback: PlaybackSynchronizer::new(),
            waveform: WaveformProfile::empty(),
            progress: PlaybackProgress::zero(),
            current_cue: None,
            status: None,
            home_name: options.home_name,
            away_name: options.away_name,
            frame,
            analysis_tx,
            analysis_rx,
            analysis_generation: 0,
            next_tick_at: Instant::now() + TICK_INTERVAL,
        }
    }

    /// Latest scoreboard frame the clock published.
    pub fn display_frame(&self) -> DisplayFrame {
        self.frame.borrow().clone()
    }

    /// One pump of the cooperative loop: drain decode results, fire a due
    /// tick, then sample playback progress. Called once per loop iteration
    /// before drawing.
    pub fn pump(&mut self) {
        self.drain_analysis_results();
        self.advance_clock_if_due();

        if let Some(progress) = self.playback.poll() {
            self.progress = progress;
            if !self.playback.is_playing() {
                // Natural completion: clear the playhead and the cue marker
                self.current_cue = None;
            }
        }
    }

    fn drain_analysis_results(&mut self) {
        while let Ok(result) = self.analysis_rx.try_recv() {
            if result.generation != self.analysis_generation {
                // A reset or newer request superseded this decode
                continue;
            }
            if result.profile.is_empty() {
                self.status = Some(format!(
                    "could not analyze {}",
                    result.path.display()
                ));
            } else {
                self.status = None;
            }
            self.waveform = result.profile;
            if result.play_after {
                self.playback
                    .start(&result.path, self.waveform.duration_seconds);
                self.current_cue = Some(result.path);
            }
        }
    }

    fn advance_clock_if_due(&mut self) {
        if Instant::now() < self.next_tick_at {
            return;
        }
        self.next_tick_at = Instant::now() + TICK_INTERVAL;

        let outcome = self.clock.tick(&self.jingles);
        if let Some(path) = outcome.cue {
            info!("cue fired at {}s", self.clock.elapsed_seconds());
            self.request_analysis(path, true);
        }
        if outcome.ended {
            info!("segment ended at {}s", self.clock.elapsed_seconds());
            self.stop_cue();
        }
    }

    /// Hand a file to the analyzer thread. The bumped generation makes any
    /// in-flight older decode a dead letter.
    fn request_analysis(&mut self, path: PathBuf, play_after: bool) {
        self.analysis_generation += 1;
        self.status = Some(format!("analyzing {}", path.display()));
        analyzer::spawn_analysis(
            path,
            self.analysis_generation,
            play_after,
            self.analysis_tx.clone(),
        );
    }

    pub fn toggle_clock(&mut self) {
        match self.clock.state() {
            ClockState::Running => self.clock.stop(),
            _ => self.clock.start(),
        }
    }

    pub fn reset_match(&mut self) {
        self.stop_cue();
        self.analysis_generation += 1;
        self.waveform = WaveformProfile::empty();
        self.status = None;
        self.clock.reset();
    }

    pub fn play_cue(&mut self) {
        match self.jingles.pick_random().cloned() {
            Some(path) => self.request_analysis(path, true),
            None => self.status = Some("no jingle files loaded".to_string()),
        }
    }

    pub fn stop_cue(&mut self) {
        self.playback.stop();
        self.progress = PlaybackProgress::zero();
        self.current_cue = None;
    }

    pub fn toggle_auto_cue(&mut self) {
        let enabled = !self.clock.auto_cue();
        self.clock.set_auto_cue(enabled);
        info!("auto cue {}", if enabled { "enabled" } else { "disabled" });
    }
}

pub fn run(options: SurfaceOptions) -> Result<(), Box<dyn Error>> {
    init_logging()?;
    info!("Starting match clock surface");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("Error: {e}");
        return Err(e);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.pump();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with a short timeout to allow continuous rendering
        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
        {
            handle_key_event(app, key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: event::KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char(' ') => app.toggle_clock(),
        KeyCode::Char('r') => app.reset_match(),
        KeyCode::Char('n') => app.clock.advance_half(),
        KeyCode::Char('a') => app.clock.update_score(Team::Home, 1),
        KeyCode::Char('z') => app.clock.update_score(Team::Home, -1),
        KeyCode::Char('k') => app.clock.update_score(Team::Away, 1),
        KeyCode::Char('m') => app.clock.update_score(Team::Away, -1),
        KeyCode::Char('p') => app.play_cue(),
        KeyCode::Char('s') => app.stop_cue(),
        KeyCode::Char('c') => app.toggle_auto_cue(),
        _ => {}
    }
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    use simplelog::*;
    use std::fs::File;

    let log_file = "/tmp/matchclock.log";
    CombinedLogger::init(vec![WriteLogger::new(
        LevelFilter::Debug,
        Config::default(),
        File::create(log_file)?,
    )])?;

    Ok(())
}
