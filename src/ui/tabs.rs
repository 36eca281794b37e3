use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};

const NEON_PINK: Color = Color::Rgb(255, 0, 255);
const NEON_CYAN: Color = Color::Rgb(0, 255, 255);

/// Tab bar across the top. Game tabs carry their home shortcut digit.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let active = *t == app.current_tab;
            let style = if active {
                Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(110, 110, 140))
            };
            let mut spans = Vec::with_capacity(2);
            if *t != Tab::Home {
                spans.push(Span::styled(
                    t.index().to_string(),
                    Style::default().fg(if active { NEON_PINK } else { Color::Rgb(80, 60, 100) }),
                ));
            }
            spans.push(Span::styled(t.title(), style));
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(NEON_PINK))
                .border_type(BorderType::Rounded)
                .title(" 🕹 neoncade ")
                .title_style(Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)),
        )
        .select(app.current_tab.index())
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .divider(Span::styled("┊", Style::default().fg(Color::Rgb(70, 40, 90))));

    frame.render_widget(tabs, area);
}
