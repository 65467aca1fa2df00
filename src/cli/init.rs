use crate::config::Config;
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_init() -> Result<(), Box<dyn Error>> {
    if Config::exists()? {
        return Err(
            "Already initialized. Use 'matchclock config set <key> <value>' to change settings."
                .into(),
        );
    }

    let config = Config::new();
    config.save()?;

    println!("{} match clock initialized", "✓".green());
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display()
    );
    println!(
        "Defaults: {} minute halves, normal mode, auto cue on",
        config.match_minutes
    );

    Ok(())
}
