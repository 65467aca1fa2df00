use crate::clock::ClockMode;
use crate::config::Config;
use crate::surface::{self, SurfaceOptions};
use std::error::Error;
use std::path::PathBuf;

/// Resolve the surface options from the saved configuration plus command
/// line overrides, then hand control to the interactive loop. Jingle paths
/// on the command line replace the configured set entirely.
pub fn handle_run(
    minutes: Option<u32>,
    single: bool,
    no_auto_cue: bool,
    jingles: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    // Run without init works on defaults; a saved config refines them
    let config = if Config::exists()? {
        Config::load()?
    } else {
        Config::new()
    };

    let jingle_files: Vec<PathBuf> = if jingles.is_empty() {
        config.jingle_files.iter().map(PathBuf::from).collect()
    } else {
        jingles.into_iter().map(PathBuf::from).collect()
    };

    let mode = if single {
        ClockMode::SingleSegment
    } else {
        config.mode
    };

    let options = SurfaceOptions {
        minutes: minutes.unwrap_or(config.match_minutes),
        mode,
        auto_cue: if no_auto_cue { false } else { config.auto_cue },
        jingle_files,
        home_name: config.home_name,
        away_name: config.away_name,
    };

    surface::run(options)
}
