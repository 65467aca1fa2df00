//! Application configuration management.
//!
//! This module handles the persistent configuration for matchclock: the match
//! length in minutes, the clock mode, whether the automatic cue is enabled,
//! the jingle file list, and the team names shown on the scoreboard.
//! Configuration is stored in the user's config directory (typically
//! ~/.config/matchclock/config.toml). Values are effective from the next
//! clock start or reset.

use crate::clock::ClockMode;
use crate::constants::DEFAULT_MATCH_MINUTES;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_match_minutes")]
    pub match_minutes: u32,
    #[serde(default = "default_mode")]
    pub mode: ClockMode,
    #[serde(default = "default_auto_cue")]
    pub auto_cue: bool,
    #[serde(default)]
    pub jingle_files: Vec<String>,
    #[serde(default = "default_home_name")]
    pub home_name: String,
    #[serde(default = "default_away_name")]
    pub away_name: String,
}

fn default_match_minutes() -> u32 {
    DEFAULT_MATCH_MINUTES
}

fn default_mode() -> ClockMode {
    ClockMode::Normal
}

fn default_auto_cue() -> bool {
    true
}

fn default_home_name() -> String {
    "HOME".to_string()
}

fn default_away_name() -> String {
    "AWAY".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            match_minutes: default_match_minutes(),
            mode: default_mode(),
            auto_cue: default_auto_cue(),
            jingle_files: Vec::new(),
            home_name: default_home_name(),
            away_name: default_away_name(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("matchclock")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("matchclock")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            // Return default config instead of error
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "match_minutes" => {
                let minutes: u32 = value
                    .parse()
                    .map_err(|_| "Value must be a number of minutes")?;
                if minutes == 0 {
                    return Err("Match length must be at least one minute".into());
                }
                self.match_minutes = minutes;
            }
            "mode" => {
                self.mode = match value {
                    "normal" => ClockMode::Normal,
                    "single_segment" => ClockMode::SingleSegment,
                    _ => return Err("Value must be 'normal' or 'single_segment'".into()),
                };
            }
            "auto_cue" => {
                self.auto_cue = value
                    .parse::<bool>()
                    .map_err(|_| "Value must be 'true' or 'false'")?;
            }
            "home_name" => self.home_name = value.to_string(),
            "away_name" => self.away_name = value.to_string(),
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }
}
