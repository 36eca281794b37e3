use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::games::cube::CubeGame;
use crate::games::lab::Lab;
use crate::games::lava::LavaClimb;
use crate::games::platformer::Platformer;
use crate::games::pong::Pong;
use crate::games::race::Race;
use crate::games::runner::Runner;
use crate::games::Game;
use crate::gate::{GateForm, PasswordGate};
use crate::input::KeySet;
use crate::scores::{HighScores, LAVA, PLATFORMER, RUNNER, TRACKED};
use crate::settings::Settings;

/// Tiles on the home screen, laid out in two rows of four.
pub const HOME_TILES: usize = 8;
const TILES_PER_ROW: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Pong,
    Race,
    Platformer,
    Runner,
    Cube,
    Lava,
    Lab,
    Gate,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Home,
            Tab::Pong,
            Tab::Race,
            Tab::Platformer,
            Tab::Runner,
            Tab::Cube,
            Tab::Lava,
            Tab::Lab,
            Tab::Gate,
        ]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Pong => " Pong ",
            Tab::Race => " Race ",
            Tab::Platformer => " Platformer ",
            Tab::Runner => " Runner ",
            Tab::Cube => " Cube ",
            Tab::Lava => " Lava ",
            Tab::Lab => " Lab ",
            Tab::Gate => " Gate ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Pong => 1,
            Tab::Race => 2,
            Tab::Platformer => 3,
            Tab::Runner => 4,
            Tab::Cube => 5,
            Tab::Lava => 6,
            Tab::Lab => 7,
            Tab::Gate => 8,
        }
    }

    /// Tab launched by home tile `tile` (0-based).
    fn from_tile(tile: usize) -> Tab {
        Tab::all().get(tile + 1).copied().unwrap_or(Tab::Home)
    }
}

/// Every game instance, kept apart from the rest of the app so a game and
/// the held-key set can be borrowed at the same time.
pub struct Cabinet {
    pub pong: Pong,
    pub race: Race,
    pub platformer: Platformer,
    pub runner: Runner,
    pub cube: CubeGame,
    pub lava: LavaClimb,
    pub lab: Lab,
}

impl Cabinet {
    pub fn get_mut(&mut self, tab: Tab) -> Option<&mut dyn Game> {
        match tab {
            Tab::Home | Tab::Gate => None,
            Tab::Pong => Some(&mut self.pong),
            Tab::Race => Some(&mut self.race),
            Tab::Platformer => Some(&mut self.platformer),
            Tab::Runner => Some(&mut self.runner),
            Tab::Cube => Some(&mut self.cube),
            Tab::Lava => Some(&mut self.lava),
            Tab::Lab => Some(&mut self.lab),
        }
    }

    /// The game whose score is stored under `key`.
    fn tracked_mut(&mut self, key: &str) -> Option<&mut dyn Game> {
        match key {
            RUNNER => Some(&mut self.runner),
            PLATFORMER => Some(&mut self.platformer),
            LAVA => Some(&mut self.lava),
            _ => None,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-7 for home screen tile selection
    pub keys: KeySet,
    pub cabinet: Cabinet,
    pub gate: GateForm,
    pub high_scores: HighScores,
    pub show_high_scores: bool,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        Self::with_scores(settings, HighScores::load(settings.scores_file.clone()))
    }

    pub fn with_scores(settings: &Settings, high_scores: HighScores) -> Self {
        let mut app = Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            keys: KeySet::new(settings.key_hold_ticks),
            cabinet: Cabinet {
                pong: Pong::new(),
                race: Race::new(),
                platformer: Platformer::new(settings.level_file.clone()),
                runner: Runner::new(),
                cube: CubeGame::new(),
                lava: LavaClimb::new(),
                lab: Lab::new(),
            },
            gate: GateForm::new(PasswordGate::builtin()),
            high_scores,
            show_high_scores: false,
        };
        for (key, _) in TRACKED {
            let best = app.high_scores.best(key);
            if let Some(game) = app.cabinet.tracked_mut(key) {
                game.set_high_score(best);
            }
        }
        app
    }

    pub fn on_tick(&mut self) {
        if let Some(game) = self.cabinet.get_mut(self.current_tab) {
            game.update(&self.keys);
        }
        self.keys.advance();
        self.check_submit_scores();
    }

    /// Submit each finished single-player round once, and push new bests
    /// back into the game that set them.
    fn check_submit_scores(&mut self) {
        for (key, _) in TRACKED {
            let Some(game) = self.cabinet.tracked_mut(key) else {
                continue;
            };
            let game_over = game.is_game_over();
            if game_over && !self.high_scores.was_submitted(key) {
                self.high_scores.mark_submitted(key);
                if self.high_scores.submit(key, game.get_score()) {
                    game.set_high_score(self.high_scores.best(key));
                }
            }
            if !game_over && self.high_scores.was_submitted(key) {
                self.high_scores.clear_submitted(key);
            }
        }
    }

    pub fn on_pointer(&mut self) {
        if let Some(game) = self.cabinet.get_mut(self.current_tab) {
            game.handle_pointer();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Repeats and releases only feed the held-key set
        if !self.keys.observe(&key) {
            return;
        }

        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if self.current_tab != Tab::Home {
                    self.switch_to(Tab::Home);
                    return;
                }
            }
            _ => {}
        }

        // The gate form takes every other key as text
        if self.current_tab == Tab::Gate {
            match key.code {
                KeyCode::Char(c) => self.gate.push(c),
                KeyCode::Backspace => self.gate.backspace(),
                KeyCode::Enter => self.gate.enter(),
                _ => {}
            }
            return;
        }

        if self.current_tab == Tab::Home {
            self.on_home_key(key);
            return;
        }

        if let Some(game) = self.cabinet.get_mut(self.current_tab) {
            game.handle_input(key);
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) {
        if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_high_scores = !self.show_high_scores;
            }
            KeyCode::Char(c @ '1'..='8') => {
                let tile = c as usize - '1' as usize;
                self.selected_game = tile;
                self.switch_to(Tab::from_tile(tile));
            }
            // Arrow key navigation over the tile grid (2 rows of 4)
            KeyCode::Right => {
                self.selected_game = (self.selected_game + 1) % HOME_TILES;
            }
            KeyCode::Left => {
                self.selected_game = (self.selected_game + HOME_TILES - 1) % HOME_TILES;
            }
            KeyCode::Down | KeyCode::Up => {
                self.selected_game = (self.selected_game + TILES_PER_ROW) % HOME_TILES;
            }
            KeyCode::Enter => self.switch_to(Tab::from_tile(self.selected_game)),
            _ => {}
        }
    }

    fn switch_to(&mut self, tab: Tab) {
        if tab != self.current_tab {
            log::debug!("switching to{}tab", tab.title());
            // Keys held in one game must not leak into the next
            self.keys.clear();
            self.current_tab = tab;
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn app() -> App {
        let settings = Settings {
            level_file: std::env::temp_dir().join("neoncade-app-test-level.txt"),
            ..Settings::default()
        };
        App::with_scores(&settings, HighScores::in_memory())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_tab_cycle_wraps_both_ways() {
        let mut app = app();
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_tab, Tab::Gate);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Home);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Pong);
    }

    #[test]
    fn test_digit_shortcuts_launch_games() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.current_tab, Tab::Runner);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_tab, Tab::Home);
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.current_tab, Tab::Lab);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('8'));
        assert_eq!(app.current_tab, Tab::Gate);
    }

    #[test]
    fn test_arrow_grid_navigation() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected_game, 7);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_game, 3);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_game, 6);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.current_tab, Tab::Lab);
    }

    #[test]
    fn test_q_quits_only_from_home() {
        let mut app = app();
        press(&mut app, KeyCode::Char('8'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.gate.assignment, "q");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_gate_tab_submits_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('8'));
        for c in "bio-13.12".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        for c in "wrong".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.gate.result,
            Some(Ok("https://www.youtube.com/watch?v=oefAI2x2CQM".to_string()))
        );
    }

    #[test]
    fn test_repeats_are_held_but_not_forwarded() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        app.on_key(KeyEvent::new_with_kind(KeyCode::Char('w'), KeyModifiers::NONE, KeyEventKind::Repeat));
        assert!(app.keys.is_down(KeyCode::Char('w')));
        // A repeated Tab does not switch tabs
        app.on_key(KeyEvent::new_with_kind(KeyCode::Tab, KeyModifiers::NONE, KeyEventKind::Repeat));
        assert_eq!(app.current_tab, Tab::Pong);
    }

    #[test]
    fn test_switching_tabs_drops_held_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Up);
        assert!(app.keys.is_down(KeyCode::Up));
        press(&mut app, KeyCode::Tab);
        assert!(!app.keys.is_down(KeyCode::Up));
    }

    #[test]
    fn test_finished_run_is_submitted_once() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char(' '));
        for _ in 0..10_000 {
            app.on_tick();
            if app.cabinet.runner.is_game_over() {
                break;
            }
        }
        assert!(app.cabinet.runner.is_game_over());
        let score = app.cabinet.runner.get_score();
        assert!(score > 0);
        assert_eq!(app.high_scores.best(RUNNER), score);
        assert!(app.high_scores.was_submitted(RUNNER));

        // Sitting on the game-over screen does not resubmit
        app.high_scores.submit(RUNNER, score + 100);
        app.on_tick();
        assert_eq!(app.high_scores.best(RUNNER), score + 100);

        press(&mut app, KeyCode::Char('r'));
        app.on_tick();
        assert!(!app.high_scores.was_submitted(RUNNER));
    }

    #[test]
    fn test_ticks_only_reach_the_visible_game() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Esc);
        for _ in 0..50 {
            app.on_tick();
        }
        assert_eq!(app.cabinet.runner.get_score(), 0);
    }
}
