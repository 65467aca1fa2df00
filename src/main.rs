//! Match Clock - Terminal match clock and scoreboard with audio cues.
//!
//! This application drives a timed match from the terminal:
//!
//! 1. **Match Clock**: A one-second-resolution clock with half progression,
//!    a configurable target duration, and team scores mirrored to the
//!    display on every change.
//!
//! 2. **Audio Cues**: A jingle library that fires a randomly chosen file
//!    when the clock enters the final minute of a single-segment match,
//!    with waveform visualization and wall-clock playback progress.
//!
//! The tool is designed for operators running the clock at small-field
//! matches who want a fast, keyboard-driven scoreboard without leaving the
//! terminal.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use std::error::Error;
use std::io;

mod audio;
mod cli;
mod clock;
mod config;
mod constants;
mod surface;

#[derive(Parser)]
#[command(name = "matchclock")]
#[command(about = "Terminal match clock and scoreboard with audio cues")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive match clock surface
    Run {
        /// Minutes per half (overrides the configured value)
        #[arg(short, long)]
        minutes: Option<u32>,
        /// Single timed segment that ends on its own
        #[arg(short, long)]
        single: bool,
        /// Disable the automatic final-minute jingle
        #[arg(long)]
        no_auto_cue: bool,
        /// Jingle files for the cue (replaces the configured set)
        jingles: Vec<String>,
    },
    /// Analyze an audio file and print its waveform envelope
    Analyze {
        /// Path to a WAV file
        file: String,
    },
    /// Initialize match clock configuration
    Init,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "match_minutes",
            "mode",
            "auto_cue",
            "home_name",
            "away_name",
        ]))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            minutes,
            single,
            no_auto_cue,
            jingles,
        } => {
            cli::run::handle_run(minutes, single, no_auto_cue, jingles)?;
        }
        Commands::Analyze { file } => {
            cli::analyze::handle_analyze(&file)?;
        }
        Commands::Init => {
            cli::init::handle_init()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
    }

    Ok(())
}
