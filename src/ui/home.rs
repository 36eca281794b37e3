use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::HOME_TILES;
use crate::scores::{HighScores, LAVA, PLATFORMER, RUNNER, TRACKED};

const BANNER: &str = r#"
 ███╗   ██╗███████╗ ██████╗ ███╗   ██╗ ██████╗ █████╗ ██████╗ ███████╗
 ████╗  ██║██╔════╝██╔═══██╗████╗  ██║██╔════╝██╔══██╗██╔══██╗██╔════╝
 ██╔██╗ ██║█████╗  ██║   ██║██╔██╗ ██║██║     ███████║██║  ██║█████╗
 ██║╚██╗██║██╔══╝  ██║   ██║██║╚██╗██║██║     ██╔══██║██║  ██║██╔══╝
 ██║ ╚████║███████╗╚██████╔╝██║ ╚████║╚██████╗██║  ██║██████╔╝███████╗
 ╚═╝  ╚═══╝╚══════╝ ╚═════╝ ╚═╝  ╚═══╝ ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝
"#;

const GOLD: Color = Color::Rgb(255, 215, 0);
const KEY_COLOR: Color = Color::Rgb(0, 255, 255);
const TEXT_DIM: Color = Color::Rgb(130, 130, 150);

struct GameTile {
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    /// Score table key for single-player games
    score_key: Option<&'static str>,
    controls: &'static [(&'static str, &'static str)],
}

const GAME_TILES: [GameTile; HOME_TILES] = [
    GameTile {
        icon: "🏓",
        name: "Pong",
        desc: "Two paddles,\nfirst to 10",
        color: Color::Rgb(0, 255, 255),
        score_key: None,
        controls: &[("W / S", "Left paddle"), ("↑ / ↓", "Right paddle"), ("Space", "Serve"), ("P / R", "Pause / restart")],
    },
    GameTile {
        icon: "🏎",
        name: "Race",
        desc: "Three laps round\nthe neon ring",
        color: Color::Rgb(255, 0, 255),
        score_key: None,
        controls: &[("W A S D", "Car 1"), ("↑ ↓ ← →", "Car 2"), ("Space", "Start"), ("P / R", "Pause / restart")],
    },
    GameTile {
        icon: "🧗",
        name: "Platformer",
        desc: "Collect coins,\nbuild your own",
        color: Color::Rgb(0, 255, 0),
        score_key: Some(PLATFORMER),
        controls: &[
            ("← → / A D", "Move"),
            ("↑ / W", "Jump (fly: up/down)"),
            ("C", "Continue from checkpoint"),
            ("M", "Create / Play mode"),
            ("1-6", "Editor tool"),
            ("Space / X", "Place / delete"),
            ("E / I", "Export / import level"),
            ("P / R", "Pause / restart"),
        ],
    },
    GameTile {
        icon: "🏃",
        name: "Runner",
        desc: "Jump the blocks,\ngrab the powers",
        color: Color::Rgb(255, 255, 0),
        score_key: Some(RUNNER),
        controls: &[("Space / ↑", "Jump"), ("Click", "Jump"), ("P / R", "Pause / restart")],
    },
    GameTile {
        icon: "🧊",
        name: "Cube",
        desc: "Hold the cube\nfor 14 seconds",
        color: Color::Rgb(80, 160, 255),
        score_key: None,
        controls: &[
            ("W A S D + E", "Team 1 move / grab"),
            ("1 2 3", "Team 1 switch (passes)"),
            ("I J K L + O", "Team 2 move / grab"),
            ("8 9 0", "Team 2 switch (passes)"),
            ("P / R", "Pause / restart"),
        ],
    },
    GameTile {
        icon: "🌋",
        name: "Lava Climb",
        desc: "Outrun the\nrising lava",
        color: Color::Rgb(255, 69, 0),
        score_key: Some(LAVA),
        controls: &[("↑ ↓ ← →", "Move"), ("Space", "Start"), ("P / R", "Pause / restart")],
    },
    GameTile {
        icon: "🧬",
        name: "DNA Lab",
        desc: "Watch DNA turn\ninto protein",
        color: Color::Rgb(0, 255, 170),
        score_key: None,
        controls: &[
            ("1 2 3 4", "Pairing / transcription / translation / mutations"),
            ("N", "New strand (pairing)"),
            ("← →", "Mutation site"),
            ("↑ ↓", "Substituted base"),
            ("P / R", "Pause / replay"),
        ],
    },
    GameTile {
        icon: "🔐",
        name: "Gate",
        desc: "Unlock an\nassignment page",
        color: Color::Rgb(200, 120, 255),
        score_key: None,
        controls: &[("Type", "Assignment id, then password"), ("Enter", "Next field / submit"), ("Backspace", "Delete")],
    },
];

fn render_game_tile(frame: &mut Frame, area: Rect, key: usize, tile: &GameTile, selected: bool, best: Option<u32>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected { BorderType::Double } else { BorderType::Rounded })
        .border_style(Style::default().fg(if selected { GOLD } else { tile.color }));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", key + 1), Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::raw(format!("{} ", tile.icon)),
        Span::styled(
            tile.name,
            Style::default()
                .fg(if selected { Color::White } else { tile.color })
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    for desc_line in tile.desc.lines() {
        lines.push(Line::styled(desc_line, Style::default().fg(if selected { Color::Gray } else { TEXT_DIM })));
    }
    if let Some(best) = best.filter(|b| *b > 0) {
        lines.push(Line::styled(format!("best {}", best), Style::default().fg(GOLD)));
    }
    if selected {
        lines.push(Line::styled(
            "▶ Enter to play",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn key_line(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<16}", key), Style::default().fg(KEY_COLOR)),
        Span::styled(action.to_string(), Style::default().fg(TEXT_DIM)),
    ])
}

fn heading(text: &str, color: Color) -> Line<'static> {
    Line::styled(format!("  {}", text), Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn game_controls(tile: &GameTile) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""), heading(&format!("{} {}", tile.icon, tile.name), tile.color), Line::from("")];
    lines.extend(tile.controls.iter().map(|(k, a)| key_line(k, a)));
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize, show_high_scores: bool, high_scores: &HighScores) {
    let selected_game = selected_game.min(HOME_TILES - 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),  // Banner
            Constraint::Length(1),  // Subtitle
            Constraint::Length(14), // Game tiles (2 rows)
            Constraint::Min(8),     // Controls area
            Constraint::Length(1),  // Footer
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(BANNER)
            .style(Style::default().fg(Color::Rgb(255, 0, 255)))
            .alignment(Alignment::Center),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Line::styled(
            "░▒▓ arcade in your terminal ▓▒░",
            Style::default().fg(KEY_COLOR).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
        chunks[1],
    );

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(120, 0, 160)))
        .title(" 🎮 Games: ↑↓←→ select, Enter to play ")
        .title_style(Style::default().fg(KEY_COLOR).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let tile_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(games_inner);
    let quarters = [Constraint::Ratio(1, 4); 4];
    let top = Layout::horizontal(quarters).split(tile_rows[0]);
    let bottom = Layout::horizontal(quarters).split(tile_rows[1]);

    for (i, tile) in GAME_TILES.iter().enumerate() {
        let slot = if i < 4 { top[i] } else { bottom[i - 4] };
        let best = tile.score_key.map(|k| high_scores.best(k));
        render_game_tile(frame, slot, i, tile, selected_game == i, best);
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let nav = Paragraph::new(vec![
        Line::from(""),
        key_line("Tab / Shift+Tab", "Switch tabs"),
        key_line("1-8", "Launch game"),
        key_line("↑ ↓ ← →", "Select game"),
        key_line("Enter", "Play selected"),
        key_line("Esc", "Return to Home"),
        key_line("H", "High scores"),
        key_line("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(120, 0, 160)))
            .title(" ⌨ Navigation ")
            .title_style(Style::default().fg(KEY_COLOR).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(nav, ctrl_cols[0]);

    let tile = &GAME_TILES[selected_game];
    let game_ctrl = Paragraph::new(game_controls(tile)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tile.color))
            .title(format!(" {} Controls ", tile.name))
            .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::styled(" High Scores", Style::default().fg(TEXT_DIM)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);

    if show_high_scores {
        render_high_scores_overlay(frame, area, high_scores);
    }
}

fn render_high_scores_overlay(frame: &mut Frame, area: Rect, high_scores: &HighScores) {
    let overlay_w = 40u16.min(area.width.saturating_sub(4));
    let overlay_h = (TRACKED.len() as u16 * 2 + 5).min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(GOLD))
        .title(" 🏆 High Scores ")
        .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 5, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![Line::from("")];
    for (key, name) in TRACKED {
        let color = GAME_TILES
            .iter()
            .find(|t| t.score_key == Some(key))
            .map_or(Color::White, |t| t.color);
        let best = high_scores.best(key);
        let value = if best > 0 {
            Span::styled(best.to_string(), Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        } else {
            Span::styled("no score yet", Style::default().fg(Color::Rgb(70, 70, 90)))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", name), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            value,
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_overlay_lists_tracked_bests() {
        let mut scores = HighScores::in_memory();
        scores.submit(RUNNER, 321);
        let mut terminal = Terminal::new(TestBackend::new(100, 50)).unwrap();
        terminal.draw(|f| render_home(f, f.area(), 3, true, &scores)).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("321"));
        assert!(text.contains("no score yet"));
    }
}
