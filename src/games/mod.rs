pub mod cube;
pub mod genetics;
pub mod lab;
pub mod lava;
pub mod level;
pub mod platformer;
pub mod pong;
pub mod race;
pub mod runner;

use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::input::KeySet;

pub trait Game {
    /// One simulation frame, reading the keys held right now.
    fn update(&mut self, keys: &KeySet);
    /// One-shot actions on a fresh key press.
    fn handle_input(&mut self, key: KeyEvent);
    /// Mouse click, the terminal's stand-in for a touch.
    fn handle_pointer(&mut self) {}
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    /// Single-player score; versus games report 0.
    fn get_score(&self) -> u32;
    fn is_game_over(&self) -> bool;
    /// Best score on record, pushed in by the app when it changes.
    fn set_high_score(&mut self, _best: u32) {}
}

/// Draw the framed game window and split it into status, field and help rows.
pub(crate) fn chrome(frame: &mut Frame, area: Rect, title: &str, accent: Color) -> [Rect; 3] {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);
    [chunks[0], chunks[1], chunks[2]]
}

/// Help bar in the usual "KEY action │ KEY action" layout.
pub(crate) fn help_line(entries: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, action)) in entries.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))));
        }
        spans.push(Span::styled(
            format!("{} ", key),
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!("{} ", action), Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

/// Status separator.
pub(crate) fn sep() -> Span<'static> {
    Span::styled(" │ ", Style::default().fg(Color::DarkGray))
}

pub(crate) fn banner(frame: &mut Frame, area: Rect, headline: &str, color: Color, detail: &str) {
    let msg = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", headline), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(detail.to_string(), Style::default().fg(Color::Gray)),
    ]));
    frame.render_widget(msg, area);
}
