use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::level::{self, LevelObject, ObjectKind, PowerKind, GRID};
use crate::games::{banner, chrome, help_line, sep, Game};
use crate::input::{Controls, KeySet};
use crate::sim::{clamp_axis, Aabb, Effects, Round, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::ui::surface::Surface;

const GRAVITY: f32 = 0.5;
const MOVE_SPEED: f32 = 5.0;
const SPEED_BOOST: f32 = 3.0;
const JUMP_VELOCITY: f32 = -10.0;
const COIN_POINTS: u32 = 100;
const SPAWN: (f32, f32) = (GRID, CANVAS_HEIGHT - GRID * 2.0);

const INVINCIBLE_FRAMES: u32 = 360;
const FLY_FRAMES: u32 = 600;
const SPEED_FRAMES: u32 = 300;
const IRON_SKIN_HITS: u32 = 4;
const GRACE_FRAMES: u32 = 30;

const PLAYER_COLOR: Color = Color::Rgb(0, 255, 255);

const TOOLS: [&str; 6] = ["Platform", "Hazard", "Coin", "Checkpoint", "End Flag", "Power-Up"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Play,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Died,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boost {
    Invincible,
    Fly,
    Speed,
    /// Short immunity after Iron Skin soaks a hazard
    Grace,
}

/// What touching an object did.
enum Touch {
    Keep,
    Consume,
    Die,
    Clear,
}

/// Per-kind behaviour, looked up through [`behavior`].
struct Behavior {
    /// Blocks movement instead of being touched
    solid: bool,
    touch: fn(&mut Platformer, &LevelObject) -> Touch,
}

fn behavior(kind: ObjectKind) -> Behavior {
    match kind {
        ObjectKind::Platform => Behavior { solid: true, touch: |_, _| Touch::Keep },
        ObjectKind::Hazard => Behavior { solid: false, touch: Platformer::hit_hazard },
        ObjectKind::Coin => Behavior { solid: false, touch: Platformer::collect_coin },
        ObjectKind::Checkpoint => Behavior { solid: false, touch: Platformer::save_checkpoint },
        ObjectKind::EndFlag => Behavior { solid: false, touch: Platformer::reach_flag },
        ObjectKind::PowerUp(_) => Behavior { solid: false, touch: Platformer::pick_power },
    }
}

#[derive(Debug, Clone)]
struct Player {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    grounded: bool,
    iron_skin: u32,
}

impl Player {
    fn at((x, y): (f32, f32)) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            grounded: false,
            iron_skin: 0,
        }
    }

    fn rect(&self) -> Aabb {
        Aabb::new(self.x, self.y, GRID, GRID)
    }
}

pub struct Platformer {
    /// Level as designed in create mode
    layout: Vec<LevelObject>,
    /// Live copy for the current run; collectibles disappear from here only
    objects: Vec<LevelObject>,
    player: Player,
    effects: Effects<Boost>,
    /// Boosts granted during the current frame
    fresh: Vec<(Boost, u32)>,
    respawn: (f32, f32),
    score: u32,
    high_score: u32,
    coins: u32,
    total_coins: u32,
    mode: Mode,
    tool: usize,
    cursor: (i32, i32),
    round: Round<Finish>,
    level_file: PathBuf,
    notice: Option<String>,
    rng: StdRng,
}

impl Platformer {
    pub fn new(level_file: PathBuf) -> Self {
        Self::with_seed(rand::random(), level_file)
    }

    pub fn with_seed(seed: u64, level_file: PathBuf) -> Self {
        let mut p = Self {
            layout: level::default_level(),
            objects: Vec::new(),
            player: Player::at(SPAWN),
            effects: Effects::new(),
            fresh: Vec::new(),
            respawn: SPAWN,
            score: 0,
            high_score: 0,
            coins: 0,
            total_coins: 0,
            mode: Mode::Play,
            tool: 0,
            cursor: (5, 10),
            round: Round::new(),
            level_file,
            notice: None,
            rng: StdRng::seed_from_u64(seed),
        };
        p.reset_run();
        p
    }

    /// Fresh run over the current layout. Leaves the round phase alone.
    fn reset_run(&mut self) {
        self.objects = self.layout.clone();
        self.total_coins = self.objects.iter().filter(|o| o.kind == ObjectKind::Coin).count() as u32;
        self.coins = 0;
        self.score = 0;
        self.player = Player::at(SPAWN);
        self.respawn = SPAWN;
        self.effects.clear();
    }

    /// Back on the last checkpoint after a death, keeping what was collected.
    fn continue_run(&mut self) {
        if self.round.outcome() != Some(Finish::Died) {
            return;
        }
        log::debug!("platformer: continuing from {:?}", self.respawn);
        self.player = Player::at(self.respawn);
        self.effects.clear();
        self.round.restart();
    }

    fn toggle_mode(&mut self) {
        self.notice = None;
        self.mode = match self.mode {
            Mode::Play => Mode::Create,
            Mode::Create => Mode::Play,
        };
        self.reset_run();
        self.round.rewind();
    }

    fn step(&mut self, keys: &KeySet) {
        let flying = self.effects.is_active(Boost::Fly);
        let boost = if self.effects.is_active(Boost::Speed) { SPEED_BOOST } else { 1.0 };

        let (ax, ay) = steer(keys);
        let p = &mut self.player;
        p.vx = ax * MOVE_SPEED * boost;
        if flying {
            p.vy = ay * MOVE_SPEED;
        } else {
            if ay < 0.0 && p.grounded {
                p.vy = JUMP_VELOCITY;
                p.grounded = false;
            }
            p.vy += GRAVITY;
        }

        p.x = clamp_axis(p.x + p.vx, GRID, CANVAS_WIDTH);
        self.resolve_x();
        self.player.y += self.player.vy;
        self.resolve_y();
        self.touch_objects();

        // A boost picked up this frame counts down from the next one
        self.effects.tick();
        for (boost, frames) in self.fresh.drain(..) {
            self.effects.grant(boost, frames);
        }
    }

    fn grant(&mut self, boost: Boost, frames: u32) {
        self.effects.grant(boost, frames);
        self.fresh.push((boost, frames));
    }

    fn resolve_x(&mut self) {
        let p = &mut self.player;
        for obj in self.objects.iter().filter(|o| behavior(o.kind).solid) {
            if !p.rect().overlaps(&obj.rect) {
                continue;
            }
            if p.vx > 0.0 {
                p.x = obj.rect.x - GRID;
            } else if p.vx < 0.0 {
                p.x = obj.rect.right();
            }
        }
        p.x = clamp_axis(p.x, GRID, CANVAS_WIDTH);
    }

    fn resolve_y(&mut self) {
        let p = &mut self.player;
        p.grounded = false;
        for obj in self.objects.iter().filter(|o| behavior(o.kind).solid) {
            if !p.rect().overlaps(&obj.rect) {
                continue;
            }
            if p.vy > 0.0 {
                p.y = obj.rect.y - GRID;
                p.vy = 0.0;
                p.grounded = true;
            } else if p.vy < 0.0 {
                p.y = obj.rect.bottom();
                p.vy = 0.0;
            }
        }

        // The canvas edges act as floor and ceiling
        let floor = CANVAS_HEIGHT - GRID;
        if p.y >= floor {
            p.y = floor;
            p.vy = p.vy.min(0.0);
            p.grounded = true;
        } else if p.y <= 0.0 {
            p.y = 0.0;
            p.vy = p.vy.max(0.0);
        }
    }

    fn touch_objects(&mut self) {
        let body = self.player.rect();
        let hits: Vec<usize> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, o)| !behavior(o.kind).solid && o.rect.overlaps(&body))
            .map(|(i, _)| i)
            .collect();

        let mut spent = Vec::new();
        for i in hits {
            let obj = self.objects[i];
            match (behavior(obj.kind).touch)(self, &obj) {
                Touch::Keep => {}
                Touch::Consume => spent.push(i),
                Touch::Die => {
                    log::info!("platformer: died with {} points", self.score);
                    self.round.end(Finish::Died);
                    break;
                }
                Touch::Clear => {
                    log::info!("platformer: level cleared with {} points", self.score);
                    self.round.end(Finish::Cleared);
                    break;
                }
            }
        }
        for i in spent.into_iter().rev() {
            self.objects.remove(i);
        }
    }

    fn hit_hazard(&mut self, _obj: &LevelObject) -> Touch {
        if self.effects.is_active(Boost::Invincible) || self.effects.is_active(Boost::Grace) {
            return Touch::Keep;
        }
        if self.player.iron_skin > 0 {
            self.player.iron_skin -= 1;
            self.grant(Boost::Grace, GRACE_FRAMES);
            return Touch::Keep;
        }
        Touch::Die
    }

    fn collect_coin(&mut self, _obj: &LevelObject) -> Touch {
        self.coins += 1;
        self.score += COIN_POINTS;
        Touch::Consume
    }

    fn save_checkpoint(&mut self, obj: &LevelObject) -> Touch {
        // Stand the player on the checkpoint's base
        let spot = (obj.rect.x, obj.rect.bottom() - GRID);
        if self.respawn != spot {
            log::debug!("platformer: checkpoint at {:?}", spot);
            self.respawn = spot;
        }
        Touch::Keep
    }

    fn reach_flag(&mut self, _obj: &LevelObject) -> Touch {
        if self.coins >= self.total_coins {
            Touch::Clear
        } else {
            Touch::Keep
        }
    }

    fn pick_power(&mut self, obj: &LevelObject) -> Touch {
        if let ObjectKind::PowerUp(kind) = obj.kind {
            log::debug!("platformer: picked up {}", kind.tag());
            match kind {
                PowerKind::Invincibility => self.grant(Boost::Invincible, INVINCIBLE_FRAMES),
                PowerKind::IronSkin => self.player.iron_skin = IRON_SKIN_HITS,
                PowerKind::Fly => self.grant(Boost::Fly, FLY_FRAMES),
                PowerKind::Speed => self.grant(Boost::Speed, SPEED_FRAMES),
            }
        }
        Touch::Consume
    }

    // ── Create mode ──

    fn cursor_cell(&self) -> Aabb {
        Aabb::new(self.cursor.0 as f32 * GRID, self.cursor.1 as f32 * GRID, GRID, GRID)
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let cols = (CANVAS_WIDTH / GRID).ceil() as i32;
        let rows = (CANVAS_HEIGHT / GRID).ceil() as i32;
        self.cursor.0 = (self.cursor.0 + dx).clamp(0, cols - 1);
        self.cursor.1 = (self.cursor.1 + dy).clamp(0, rows - 1);
    }

    fn tool_kind(&mut self) -> ObjectKind {
        match self.tool {
            0 => ObjectKind::Platform,
            1 => ObjectKind::Hazard,
            2 => ObjectKind::Coin,
            3 => ObjectKind::Checkpoint,
            4 => ObjectKind::EndFlag,
            _ => {
                let pick = self.rng.gen_range(0..PowerKind::ALL.len());
                ObjectKind::PowerUp(PowerKind::ALL[pick])
            }
        }
    }

    fn place(&mut self) {
        let cell = self.cursor_cell();
        let kind = self.tool_kind();
        self.layout.push(LevelObject::at(kind, cell.x, cell.y));
        self.reset_run();
    }

    fn delete(&mut self) {
        let cell = self.cursor_cell();
        if let Some(i) = self.layout.iter().rposition(|o| o.rect.overlaps(&cell)) {
            self.layout.remove(i);
            self.reset_run();
        }
    }

    fn export(&mut self) {
        self.notice = Some(match level::write_file(&self.level_file, &self.layout) {
            Ok(()) => format!("Exported to {}", self.level_file.display()),
            Err(e) => {
                log::warn!("platformer: export failed: {}", e);
                format!("Export failed: {}", e)
            }
        });
    }

    fn import(&mut self) {
        self.notice = Some(match level::read_file(&self.level_file) {
            Ok(objects) => {
                self.layout = objects;
                self.reset_run();
                format!("Imported {} objects", self.layout.len())
            }
            Err(e) => {
                log::warn!("platformer: import failed, keeping current level: {}", e);
                format!("Import failed: {}", e)
            }
        });
    }

    fn handle_create_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.move_cursor(-1, 0),
            KeyCode::Right => self.move_cursor(1, 0),
            KeyCode::Up => self.move_cursor(0, -1),
            KeyCode::Down => self.move_cursor(0, 1),
            KeyCode::Char(c @ '1'..='6') => self.tool = c as usize - '1' as usize,
            KeyCode::Char(' ') | KeyCode::Enter => self.place(),
            KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Backspace | KeyCode::Delete => self.delete(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('i') | KeyCode::Char('I') => self.import(),
            _ => {}
        }
    }

    fn handle_play_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.round.toggle_pause(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.continue_run(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.round.is_over() {
                    self.reset();
                } else {
                    self.round.start();
                }
            }
            _ => {}
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut s = Surface::new(width, height, CANVAS_WIDTH, CANVAS_HEIGHT, Color::Black);

        let shown = match self.mode {
            Mode::Play => &self.objects,
            Mode::Create => &self.layout,
        };
        for obj in shown {
            let r = obj.rect;
            match obj.kind {
                ObjectKind::Platform => s.fill_rect(r.x, r.y, r.w, r.h, '█', Color::Rgb(255, 0, 255)),
                ObjectKind::Hazard => s.fill_rect(r.x, r.y, r.w, r.h, '▲', Color::Rgb(255, 69, 0)),
                ObjectKind::Coin => {
                    let (cx, cy) = r.center();
                    s.circle(cx, cy, r.w / 2.0, '●', Color::Rgb(255, 215, 0));
                }
                ObjectKind::Checkpoint => s.fill_rect(r.x, r.y, r.w, r.h, '▐', Color::Rgb(0, 255, 0)),
                ObjectKind::EndFlag => s.fill_rect(r.x, r.y, r.w, r.h, '▒', Color::White),
                ObjectKind::PowerUp(kind) => {
                    let (ch, color) = match kind {
                        PowerKind::Invincibility => ('◉', Color::Rgb(192, 192, 192)),
                        PowerKind::IronSkin => ('▲', Color::Rgb(60, 60, 255)),
                        PowerKind::Fly => ('S', Color::Rgb(255, 0, 0)),
                        PowerKind::Speed => ('»', Color::Rgb(255, 255, 0)),
                    };
                    s.fill_rect(r.x, r.y, r.w, r.h, ch, color);
                }
            }
        }

        let body = self.player.rect();
        let color = if self.effects.is_active(Boost::Invincible) {
            Color::Rgb(255, 255, 255)
        } else if self.player.iron_skin > 0 {
            Color::Rgb(80, 120, 255)
        } else {
            PLAYER_COLOR
        };
        s.fill_rect(body.x, body.y, body.w, body.h, '█', color);

        if self.mode == Mode::Create {
            let c = self.cursor_cell();
            s.fill_rect(c.x, c.y, c.w, c.h, '░', Color::Rgb(255, 220, 80));
        }
        s.into_lines()
    }

    fn status_line(&self) -> Line<'static> {
        let mut spans = vec![];
        match self.mode {
            Mode::Play => {
                spans.push(Span::styled(
                    format!(" Score: {} ", self.score),
                    Style::default().fg(PLAYER_COLOR).add_modifier(Modifier::BOLD),
                ));
                spans.push(sep());
                spans.push(Span::styled(
                    format!("Coins: {}/{}", self.coins, self.total_coins),
                    Style::default().fg(Color::Rgb(255, 215, 0)),
                ));
                spans.push(sep());
                spans.push(Span::styled(format!("Best: {}", self.high_score), Style::default().fg(Color::Gray)));
                for (boost, left) in self.effects.iter() {
                    let name = match boost {
                        Boost::Invincible => "Invincible",
                        Boost::Fly => "Fly",
                        Boost::Speed => "Speed",
                        Boost::Grace => continue,
                    };
                    spans.push(sep());
                    spans.push(Span::styled(
                        format!("{} {}s", name, left.div_ceil(60)),
                        Style::default().fg(Color::Rgb(255, 220, 80)),
                    ));
                }
                if self.player.iron_skin > 0 {
                    spans.push(sep());
                    spans.push(Span::styled(
                        format!("Iron Skin ×{}", self.player.iron_skin),
                        Style::default().fg(Color::Rgb(80, 120, 255)),
                    ));
                }
            }
            Mode::Create => {
                spans.push(Span::styled(" CREATE ", Style::default().fg(Color::Black).bg(Color::Rgb(255, 220, 80))));
                spans.push(sep());
                spans.push(Span::styled(
                    format!("Tool [{}] {}", self.tool + 1, TOOLS[self.tool]),
                    Style::default().fg(Color::Rgb(255, 0, 255)).add_modifier(Modifier::BOLD),
                ));
                spans.push(sep());
                spans.push(Span::styled(
                    format!("Objects: {}", self.layout.len()),
                    Style::default().fg(Color::Gray),
                ));
                if let Some(notice) = &self.notice {
                    spans.push(sep());
                    spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Rgb(0, 255, 0))));
                }
            }
        }
        Line::from(spans)
    }
}

/// Arrows and WASD both steer; W/Up doubles as jump.
fn steer(keys: &KeySet) -> (f32, f32) {
    let (ax, ay) = Controls::ARROWS.axis(keys);
    let (bx, by) = Controls::WASD_E.axis(keys);
    ((ax + bx).clamp(-1.0, 1.0), (ay + by).clamp(-1.0, 1.0))
}

impl Game for Platformer {
    fn update(&mut self, keys: &KeySet) {
        if self.mode != Mode::Play || !self.round.advancing() {
            return;
        }
        self.round.tick();
        self.step(keys);
    }

    fn handle_input(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('m') | KeyCode::Char('M')) {
            self.toggle_mode();
            return;
        }
        match self.mode {
            Mode::Play => self.handle_play_key(key.code),
            Mode::Create => self.handle_create_key(key.code),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status_area, field_area, help_area] = chrome(frame, area, "🧱 Neon Platformer", Color::Rgb(255, 0, 255));

        frame.render_widget(Paragraph::new(self.status_line()), status_area);

        let lines = self.render_field(field_area.width as usize, field_area.height as usize);
        frame.render_widget(Paragraph::new(lines), field_area);

        match (self.mode, self.round.outcome()) {
            (Mode::Create, _) => frame.render_widget(
                Paragraph::new(help_line(&[
                    ("Arrows", "Cursor"),
                    ("1-6", "Tool"),
                    ("SPACE", "Place"),
                    ("X", "Delete"),
                    ("E/I", "Export/Import"),
                    ("M", "Play"),
                ])),
                help_area,
            ),
            (Mode::Play, Some(Finish::Cleared)) => banner(
                frame,
                help_area,
                &format!("🏁 LEVEL COMPLETE! Score: {}", self.score),
                Color::Rgb(0, 255, 0),
                "Press ENTER to play again",
            ),
            (Mode::Play, Some(Finish::Died)) => banner(
                frame,
                help_area,
                "💀 YOU DIED",
                Color::Rgb(255, 69, 0),
                "C continue from checkpoint │ ENTER restart",
            ),
            (Mode::Play, None) if self.round.is_paused() => {
                banner(frame, help_area, "⏸ PAUSED", Color::Yellow, "Press P to resume")
            }
            (Mode::Play, None) if self.round.not_started() => frame.render_widget(
                Paragraph::new(help_line(&[("SPACE", "Start"), ("←→/AD", "Move"), ("↑/W", "Jump"), ("M", "Create"), ("Esc", "Menu")])),
                help_area,
            ),
            (Mode::Play, None) => frame.render_widget(
                Paragraph::new(help_line(&[("←→/AD", "Move"), ("↑/W", "Jump"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")])),
                help_area,
            ),
        }
    }

    fn reset(&mut self) {
        self.mode = Mode::Play;
        self.reset_run();
        self.round.restart();
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.round.is_over()
    }

    fn set_high_score(&mut self, best: u32) {
        self.high_score = best;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> LevelObject {
        LevelObject::new(ObjectKind::Platform, 0.0, CANVAS_HEIGHT - GRID, CANVAS_WIDTH, GRID)
    }

    fn playing(objects: Vec<LevelObject>) -> Platformer {
        let mut p = Platformer::with_seed(3, std::env::temp_dir().join("neoncade-unused-level.txt"));
        p.layout = objects;
        p.reset();
        p
    }

    fn idle() -> KeySet {
        KeySet::new(1)
    }

    fn held(codes: &[KeyCode]) -> KeySet {
        let mut keys = KeySet::new(10_000);
        for &c in codes {
            keys.press(c);
        }
        keys
    }

    fn place_player(p: &mut Platformer, x: f32, y: f32) {
        p.player = Player::at((x, y));
    }

    #[test]
    fn test_player_rests_on_floor() {
        let mut p = playing(vec![floor()]);
        for _ in 0..30 {
            p.update(&idle());
        }
        assert_eq!(p.player.y, CANVAS_HEIGHT - GRID * 2.0);
        assert!(p.player.grounded);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut p = playing(vec![floor()]);
        p.update(&idle());
        p.update(&held(&[KeyCode::Up]));
        assert!(p.player.vy < 0.0);
        let vy = p.player.vy;
        p.update(&held(&[KeyCode::Up]));
        assert_eq!(p.player.vy, vy + GRAVITY);
    }

    #[test]
    fn test_clamped_at_origin_moving_left() {
        let mut p = playing(vec![]);
        p.effects.grant(Boost::Fly, 100);
        place_player(&mut p, 0.0, 0.0);
        p.update(&held(&[KeyCode::Left, KeyCode::Up]));
        assert_eq!((p.player.x, p.player.y), (0.0, 0.0));
    }

    #[test]
    fn test_landing_on_platform_from_above() {
        let ledge = LevelObject::new(ObjectKind::Platform, 100.0, 300.0, 96.0, 32.0);
        let mut p = playing(vec![floor(), ledge]);
        place_player(&mut p, 120.0, 260.0);
        for _ in 0..20 {
            p.update(&idle());
        }
        assert_eq!(p.player.y, 300.0 - GRID);
        assert!(p.player.grounded);
    }

    #[test]
    fn test_collected_coin_never_returns() {
        let coin = LevelObject::at(ObjectKind::Coin, 40.0, 545.0);
        let mut p = playing(vec![floor(), coin]);
        place_player(&mut p, 32.0, 536.0);
        p.update(&idle());
        assert_eq!(p.score, COIN_POINTS);
        assert_eq!(p.coins, 1);
        for _ in 0..10 {
            p.update(&idle());
        }
        assert_eq!(p.score, COIN_POINTS);
        assert!(p.objects.iter().all(|o| o.kind != ObjectKind::Coin));
        // The design keeps it for the next run
        assert_eq!(p.layout.len(), 2);
    }

    #[test]
    fn test_hazard_kills_and_freezes_until_restart() {
        let spikes = LevelObject::new(ObjectKind::Hazard, 40.0, 540.0, 32.0, 28.0);
        let mut p = playing(vec![floor(), spikes]);
        p.update(&idle());
        assert_eq!(p.round.outcome(), Some(Finish::Died));

        let x = p.player.x;
        p.update(&held(&[KeyCode::Right]));
        assert_eq!(p.player.x, x);

        p.handle_input(KeyEvent::from(KeyCode::Char('r')));
        assert!(p.round.is_running());
        assert_eq!(p.player.x, SPAWN.0);
        assert_eq!(p.score, 0);
    }

    #[test]
    fn test_edge_contact_is_not_a_hit() {
        // Hazard directly right of the player, sharing an edge
        let spikes = LevelObject::new(ObjectKind::Hazard, GRID * 2.0, 536.0, 32.0, 32.0);
        let mut p = playing(vec![floor(), spikes]);
        p.update(&idle());
        assert!(p.round.is_running());
    }

    #[test]
    fn test_iron_skin_absorbs_then_grace() {
        let spikes = LevelObject::new(ObjectKind::Hazard, 40.0, 540.0, 32.0, 28.0);
        let mut p = playing(vec![floor(), spikes]);
        p.player.iron_skin = 1;
        p.update(&idle());
        assert!(p.round.is_running());
        assert_eq!(p.player.iron_skin, 0);
        for _ in 0..GRACE_FRAMES {
            p.update(&idle());
            assert!(p.round.is_running());
        }
        p.update(&idle());
        assert_eq!(p.round.outcome(), Some(Finish::Died));
    }

    #[test]
    fn test_invincibility_ignores_hazards() {
        let spikes = LevelObject::new(ObjectKind::Hazard, 40.0, 540.0, 32.0, 28.0);
        let mut p = playing(vec![floor(), spikes]);
        p.effects.grant(Boost::Invincible, INVINCIBLE_FRAMES);
        for _ in 0..10 {
            p.update(&idle());
        }
        assert!(p.round.is_running());
    }

    #[test]
    fn test_speed_boosts_exactly_its_duration_of_moves() {
        let boost = LevelObject::at(ObjectKind::PowerUp(PowerKind::Speed), 40.0, 536.0);
        let mut p = playing(vec![floor(), boost]);
        p.update(&idle());
        assert_eq!(p.effects.remaining(Boost::Speed), SPEED_FRAMES);
        assert_eq!(p.objects.len(), 1);

        let right = held(&[KeyCode::Right]);
        let mut boosted = 0;
        for _ in 0..SPEED_FRAMES + 60 {
            place_player(&mut p, 100.0, 536.0);
            p.update(&right);
            if p.player.x == 100.0 + MOVE_SPEED * SPEED_BOOST {
                boosted += 1;
            } else {
                assert_eq!(p.player.x, 100.0 + MOVE_SPEED);
            }
        }
        assert_eq!(boosted, SPEED_FRAMES);
        assert!(!p.effects.is_active(Boost::Speed));
    }

    #[test]
    fn test_flag_needs_every_coin() {
        let coin = LevelObject::at(ObjectKind::Coin, 400.0, 100.0);
        let flag = LevelObject::at(ObjectKind::EndFlag, 40.0, 504.0);
        let mut p = playing(vec![floor(), coin, flag]);
        p.update(&idle());
        assert!(p.round.is_running());

        p.coins = 1;
        p.update(&idle());
        assert_eq!(p.round.outcome(), Some(Finish::Cleared));
        assert!(p.is_game_over());
    }

    #[test]
    fn test_continue_from_checkpoint_keeps_coins() {
        let checkpoint = LevelObject::at(ObjectKind::Checkpoint, 200.0, 504.0);
        let spikes = LevelObject::new(ObjectKind::Hazard, 400.0, 540.0, 32.0, 28.0);
        let mut p = playing(vec![floor(), checkpoint, spikes]);
        place_player(&mut p, 200.0, 536.0);
        p.update(&idle());
        assert_eq!(p.respawn, (200.0, 536.0));

        p.score = 300;
        place_player(&mut p, 400.0, 536.0);
        p.update(&idle());
        assert_eq!(p.round.outcome(), Some(Finish::Died));

        p.handle_input(KeyEvent::from(KeyCode::Char('c')));
        assert!(p.round.is_running());
        assert_eq!((p.player.x, p.player.y), (200.0, 536.0));
        assert_eq!(p.score, 300);
    }

    #[test]
    fn test_editor_place_delete_and_import_failure() {
        let path = std::env::temp_dir().join(format!("neoncade-editor-{}.txt", std::process::id()));
        let mut p = Platformer::with_seed(9, path.clone());
        p.handle_input(KeyEvent::from(KeyCode::Char('m')));
        assert_eq!(p.mode, Mode::Create);

        let before = p.layout.len();
        p.handle_input(KeyEvent::from(KeyCode::Char('3')));
        p.handle_input(KeyEvent::from(KeyCode::Char(' ')));
        assert_eq!(p.layout.len(), before + 1);
        assert_eq!(p.layout[before].kind, ObjectKind::Coin);
        assert_eq!(p.total_coins, 2);

        p.handle_input(KeyEvent::from(KeyCode::Char('e')));
        p.handle_input(KeyEvent::from(KeyCode::Char('x')));
        assert_eq!(p.layout.len(), before);

        // Import restores the exported layout and recounts coins
        p.handle_input(KeyEvent::from(KeyCode::Char('i')));
        assert_eq!(p.layout.len(), before + 1);
        assert_eq!(p.total_coins, 2);

        std::fs::write(&path, "garbage!").unwrap();
        p.handle_input(KeyEvent::from(KeyCode::Char('i')));
        assert_eq!(p.layout.len(), before + 1);
        assert!(p.notice.as_deref().is_some_and(|n| n.starts_with("Import failed")));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_create_mode_does_not_simulate() {
        let mut p = playing(vec![]);
        p.handle_input(KeyEvent::from(KeyCode::Char('m')));
        place_player(&mut p, 100.0, 100.0);
        p.update(&idle());
        assert_eq!(p.player.y, 100.0);
    }
}
