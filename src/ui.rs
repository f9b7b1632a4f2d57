pub mod grid;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};
use webbrowser::Browser;

use crate::app::{App, AppState, Tone};
use crate::celebration::Celebration;
use crate::spawner::TargetKind;
use crate::util::format_clock;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const CLEAN_GLYPH: &str = "💧";
const DIRTY_GLYPH: &str = "🛢";

fn tone_style(tone: Tone) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match tone {
        Tone::Info => Style::default().add_modifier(Modifier::ITALIC),
        Tone::Good => bold.fg(Color::Green),
        Tone::Bad => bold.fg(Color::Red),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let title_style = bold_style.fg(Color::Cyan);

        match self.state {
            AppState::Menu => {
                let lines = vec![
                    Line::styled("p l i n k", title_style),
                    Line::styled("tap the clean cans before they vanish", dim_style),
                    Line::from(""),
                    Line::styled(
                        format!("round length  ‹ {}s ›", self.settings.round_seconds),
                        bold_style,
                    ),
                    Line::styled(format!("{} slots", self.settings.slot_count), dim_style),
                    Line::from(""),
                    Line::styled(self.message.text.clone(), tone_style(self.message.tone)),
                ];

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Min(0),
                        Constraint::Length(lines.len() as u16),
                        Constraint::Min(0),
                        Constraint::Length(1),
                    ])
                    .split(area);

                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(chunks[1], buf);

                Paragraph::new(Line::styled(
                    "(enter) start / (←/→) round length / (esc) quit",
                    italic_style,
                ))
                .render(chunks[3], buf);
            }
            AppState::Playing => {
                let state = &self.round.state;
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Length(1), // scoreboard
                        Constraint::Length(1), // milestone gauge
                        Constraint::Length(1), // message
                        Constraint::Min(3),    // board
                        Constraint::Length(1), // legend
                    ])
                    .split(area);

                let scoreboard = format!(
                    "score {}   streak {}   time {}",
                    state.score,
                    state.streak,
                    format_clock(state.time_remaining)
                );
                Paragraph::new(Line::styled(scoreboard, bold_style))
                    .alignment(Alignment::Center)
                    .render(chunks[0], buf);

                let threshold = self.round.config.milestone_threshold;
                Gauge::default()
                    .gauge_style(Style::default().fg(Color::Cyan))
                    .ratio(state.milestone_progress(threshold))
                    .label(format!("{} / {}", state.score, threshold))
                    .use_unicode(true)
                    .render(chunks[1], buf);

                Paragraph::new(Line::styled(
                    self.message.text.clone(),
                    tone_style(self.message.tone),
                ))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);

                render_board(self, chunks[3], buf);

                Paragraph::new(Line::styled(
                    "(1-9 / qwe asd zxc) tap / (esc) end round",
                    italic_style,
                ))
                .render(chunks[4], buf);
            }
            AppState::Results => {
                let summary = self.last_summary.clone().unwrap_or_default();

                let mut lines = vec![
                    Line::styled(format!("{} points", summary.score), title_style),
                    Line::styled(
                        format!(
                            "{} clean / {} dirty / best streak {}",
                            summary.clean_taps, summary.dirty_taps, summary.best_streak
                        ),
                        bold_style,
                    ),
                ];
                if let Some(avg) = self.round.average_reaction_ms() {
                    let sd = self.round.reaction_std_dev_ms().unwrap_or(0.0);
                    lines.push(Line::styled(
                        format!("avg reaction {avg:.0} ms (sd {sd:.0})"),
                        dim_style,
                    ));
                    if let Some((fastest, slowest)) = self.round.reaction_extremes_ms() {
                        lines.push(Line::styled(
                            format!("fastest {fastest:.0} ms / slowest {slowest:.0} ms"),
                            dim_style,
                        ));
                    }
                }
                lines.push(Line::from(""));
                lines.push(Line::styled(
                    self.message.text.clone(),
                    tone_style(self.message.tone),
                ));

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Min(0),
                        Constraint::Length(lines.len() as u16),
                        Constraint::Min(0),
                        Constraint::Length(1),
                    ])
                    .split(area);

                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(chunks[1], buf);

                let legend = if Browser::is_available() {
                    "(r) again / (m) menu / (t) share / (esc) quit"
                } else {
                    "(r) again / (m) menu / (esc) quit"
                };
                Paragraph::new(Line::styled(legend, italic_style)).render(chunks[3], buf);
            }
        }

        if self.celebration.is_active {
            render_celebration(&self.celebration, area, buf);
        }
    }
}

/// Draws the slot grid: bordered cells with key hints, and the active
/// target's glyph in its cell.
fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    let slot_count = app.round.config.slot_count;
    let active = app.round.active_target();
    let board = grid::board_rect(area, slot_count);

    for slot in 0..slot_count {
        let cell = grid::cell_rect(board, slot, slot_count);
        if cell.width == 0 || cell.height == 0 {
            continue;
        }

        let (border_style, glyph) = match active {
            Some((active_slot, kind)) if active_slot == slot => {
                let (color, glyph) = match kind {
                    TargetKind::Clean => (Color::Cyan, CLEAN_GLYPH),
                    TargetKind::Dirty => (Color::Red, DIRTY_GLYPH),
                };
                (
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                    Some((glyph, Style::default().fg(color))),
                )
            }
            _ => (Style::default().add_modifier(Modifier::DIM), None),
        };

        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .render(cell, buf);

        if cell.width < 3 || cell.height < 3 {
            continue;
        }
        let inner_width = cell.width - 2;
        let y = cell.y + cell.height / 2;
        match glyph {
            Some((glyph, style)) => {
                let x = cell.x + 1 + grid::centered_pad(glyph, inner_width);
                buf.set_string(x, y, glyph, style);
            }
            None => {
                let hint = ((b'1' + slot as u8) as char).to_string();
                let x = cell.x + 1 + grid::centered_pad(&hint, inner_width);
                buf.set_string(x, y, hint, Style::default().add_modifier(Modifier::DIM));
            }
        }
    }
}

/// Banner and droplet burst drawn over whatever screen is up.
fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let banner_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let banner_x = area.x + grid::centered_pad(celebration.banner, area.width);
    let banner_y = area.y + area.height / 3;
    buf.set_string(banner_x, banner_y, celebration.banner, banner_style);

    let colors = [
        Color::Cyan,
        Color::Blue,
        Color::LightBlue,
        Color::White,
        Color::LightCyan,
        Color::Yellow,
        Color::Green,
    ];

    for droplet in &celebration.particles {
        let x = droplet.x as u16;
        let y = droplet.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[droplet.color_index % colors.len()];
        let fade = 1.0 - (droplet.age / droplet.max_age);
        let style = if fade > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if fade > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&droplet.symbol.to_string());
            cell.set_style(style);
        }
    }
}
