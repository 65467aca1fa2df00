use crate::audio::analyzer;
use crate::clock::format_time;
use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const DISPLAY_WIDTH: usize = 80;

/// Offline waveform analysis: decode a file and print its peak envelope as
/// a row of terminal blocks. Uses the same decode path as the surface, so
/// what prints here is what the surface would draw.
pub fn handle_analyze(file: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(file);
    let profile = analyzer::analyze_wav(path);

    if profile.is_empty() {
        println!(
            "{} could not analyze {} (unsupported format or unreadable file)",
            "!".yellow().bold(),
            file
        );
        return Ok(());
    }

    let scale = profile.max_scale();
    let columns = analyzer::reduce_peaks(&profile.envelope, DISPLAY_WIDTH);

    let mut row = String::with_capacity(columns.len() * 3);
    for &peak in &columns {
        let level = (peak / scale).clamp(0.0, 1.0);
        let index = ((level * (BLOCKS.len() - 1) as f32).round() as usize).min(BLOCKS.len() - 1);
        row.push(BLOCKS[index]);
    }

    println!("{}", file.cyan().bold());
    println!("{}", row.green());
    println!(
        "duration {} ({:.1}s), {} envelope peaks",
        format_time(profile.duration_seconds as u32),
        profile.duration_seconds,
        profile.envelope.len()
    );

    Ok(())
}
