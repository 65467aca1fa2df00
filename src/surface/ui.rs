use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use super::app::App;
use crate::clock::ColorTag;

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();
    let show_waveform = size.height > 18; // Skip the envelope on short windows

    let constraints = if show_waveform {
        vec![
            Constraint::Length(2), // Title
            Constraint::Length(4), // Clock and status label
            Constraint::Length(3), // Scores
            Constraint::Min(6),    // Waveform envelope
            Constraint::Length(3), // Cue progress
            Constraint::Length(4), // Controls (two rows)
        ]
    } else {
        vec![
            Constraint::Length(2), // Title
            Constraint::Length(4), // Clock and status label
            Constraint::Length(3), // Scores
            Constraint::Length(3), // Cue progress
            Constraint::Length(4), // Controls (two rows)
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(size);

    let title = Paragraph::new("⚽ Match Clock")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    draw_clock(f, chunks[1], app);
    draw_scores(f, chunks[2], app);

    if show_waveform {
        draw_waveform(f, chunks[3], app);
    }

    let progress_idx = if show_waveform { 4 } else { 3 };
    draw_cue_progress(f, chunks[progress_idx], app);
    draw_controls(f, chunks[progress_idx + 1], app);
}

fn clock_color(tag: ColorTag) -> Color {
    match tag {
        ColorTag::Base => Color::Blue,
        ColorTag::Critical => Color::Red,
        ColorTag::Ended => Color::Yellow,
    }
}

fn draw_clock(f: &mut Frame, area: Rect, app: &App) {
    let frame = app.display_frame();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Time
            Constraint::Length(1), // Status label
            Constraint::Length(1), // Transient status messages
        ])
        .split(area);

    let time_widget = Paragraph::new(frame.time_text)
        .style(
            Style::default()
                .fg(clock_color(frame.color))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(time_widget, chunks[0]);

    let label_widget = Paragraph::new(frame.label_text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    f.render_widget(label_widget, chunks[1]);

    if let Some(status) = &app.status {
        let status_widget = Paragraph::new(status.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(status_widget, chunks[2]);
    }
}

fn draw_scores(f: &mut Frame, area: Rect, app: &App) {
    let frame = app.display_frame();

    let score_line = vec![
        Span::styled(
            app.home_name.as_str(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} : {}", frame.home_score, frame.away_score),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            app.away_name.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    ];

    let score_widget = Paragraph::new(Line::from(score_line))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP | Borders::BOTTOM));
    f.render_widget(score_widget, area);
}

fn draw_waveform(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(match &app.current_cue {
            Some(path) => format!(
                " {} ",
                path.file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("jingle")
            ),
            None => " jingle ".to_string(),
        });
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.waveform.is_empty() || inner.width == 0 || inner.height == 0 {
        let placeholder = Paragraph::new("no jingle analyzed")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(placeholder, inner);
        return;
    }

    let envelope = &app.waveform.envelope;
    let scale = app.waveform.max_scale();
    let width = inner.width as usize;
    let height = inner.height as usize;
    let playhead_col = if app.playback.is_playing() {
        Some(((app.progress.playhead * width as f32) as usize).min(width - 1))
    } else {
        None
    };

    // One column per terminal cell; the envelope is resampled by nearest
    // index so short and long jingles both fill the panel.
    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let threshold = (height - row) as f32 / height as f32;
        let mut spans = Vec::with_capacity(width);
        for col in 0..width {
            let index = col * envelope.len() / width;
            let amplitude = envelope[index] / scale;
            let lit = amplitude >= threshold;
            let span = if Some(col) == playhead_col {
                Span::styled("│", Style::default().fg(Color::White))
            } else if lit {
                Span::styled("█", Style::default().fg(level_color(amplitude)))
            } else {
                Span::raw(" ")
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn level_color(amplitude: f32) -> Color {
    if amplitude < 0.15 {
        Color::Rgb(0, 100, 50)
    } else if amplitude < 0.3 {
        Color::Green
    } else if amplitude < 0.6 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn draw_cue_progress(f: &mut Frame, area: Rect, app: &App) {
    let fraction = app.progress.fraction;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),    // Progress bar
            Constraint::Length(16), // Time display
        ])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(f64::from(fraction.clamp(0.0, 1.0)))
        .label(format!("{:.0}%", fraction * 100.0));
    f.render_widget(gauge, chunks[0]);

    let duration = app.waveform.duration_seconds;
    let time_info = if app.playback.is_playing() && duration > 0.0 {
        let current = (duration * fraction) as u32;
        let total = duration as u32;
        format!(
            "{:02}:{:02} / {:02}:{:02}",
            current / 60,
            current % 60,
            total / 60,
            total % 60
        )
    } else {
        "00:00 / 00:00".to_string()
    };

    let time_widget = Paragraph::new(time_info)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(time_widget, chunks[1]);
}

fn draw_controls(f: &mut Frame, area: Rect, app: &App) {
    let control_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let running = app.clock.state() == crate::clock::ClockState::Running;

    let controls_row1 = vec![
        if running {
            Span::styled("[space]", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("[space]", Style::default().fg(Color::Green))
        },
        Span::raw(if running { " stop  " } else { " start  " }),
        Span::styled("[r]", Style::default().fg(Color::Magenta)),
        Span::raw(" reset  "),
        Span::styled("[n]", Style::default().fg(Color::Blue)),
        Span::raw(" next half  "),
        Span::styled("[q]", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ];

    let controls_row2 = vec![
        Span::styled("[a/z]", Style::default().fg(Color::Green)),
        Span::raw(" home ±  "),
        Span::styled("[k/m]", Style::default().fg(Color::Red)),
        Span::raw(" away ±  "),
        Span::styled("[p]", Style::default().fg(Color::Cyan)),
        Span::raw(" jingle  "),
        Span::styled("[s]", Style::default().fg(Color::Yellow)),
        Span::raw(" silence  "),
        if app.clock.auto_cue() {
            Span::styled(
                "[c]",
                Style::default().fg(Color::Magenta).bg(Color::DarkGray),
            )
        } else {
            Span::styled("[c]", Style::default().fg(Color::Magenta))
        },
        Span::raw(if app.clock.auto_cue() {
            " auto cue ●"
        } else {
            " auto cue"
        }),
    ];

    let controls_widget1 = Paragraph::new(Line::from(controls_row1)).alignment(Alignment::Center);
    let controls_widget2 = Paragraph::new(Line::from(controls_row2)).alignment(Alignment::Center);

    let border_widget = Block::default().borders(Borders::TOP);
    f.render_widget(border_widget, area);

    f.render_widget(controls_widget1, control_chunks[0]);
    f.render_widget(controls_widget2, control_chunks[1]);
}
