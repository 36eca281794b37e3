pub mod gate;
pub mod home;
pub mod surface;
pub mod tabs;

use ratatui::prelude::*;

use crate::app::{App, Tab};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),   // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.current_tab {
        Tab::Home => home::render_home(frame, chunks[1], app.selected_game, app.show_high_scores, &app.high_scores),
        Tab::Gate => gate::render_gate(frame, chunks[1], &app.gate),
        tab => {
            if let Some(game) = app.cabinet.get_mut(tab) {
                game.render(frame, chunks[1]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::HighScores;
    use crate::settings::Settings;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_every_tab_renders() {
        let mut app = App::with_scores(&Settings::default(), HighScores::in_memory());
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        for _ in Tab::all() {
            terminal.draw(|f| render(f, &mut app)).unwrap();
            let text = screen_text(&terminal);
            assert!(text.contains("neoncade"));
            app.on_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = App::with_scores(&Settings::default(), HighScores::in_memory());
        let mut terminal = Terminal::new(TestBackend::new(12, 5)).unwrap();
        for _ in Tab::all() {
            terminal.draw(|f| render(f, &mut app)).unwrap();
            app.on_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        }
    }
}
