use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{banner, chrome, help_line, sep, Game};
use crate::input::KeySet;
use crate::sim::{Aabb, Effects, Round, CANVAS_HEIGHT, CANVAS_WIDTH, FPS};
use crate::ui::surface::Surface;

const PLAYER_SIZE: f32 = 30.0;
const PLAYER_X: f32 = 50.0;
const GROUND_MARGIN: f32 = 10.0;
const GROUND_Y: f32 = CANVAS_HEIGHT - PLAYER_SIZE - GROUND_MARGIN;
const GRAVITY: f32 = 0.8;
const JUMP_VELOCITY: f32 = -15.0;

const OBSTACLE_WIDTH: f32 = 20.0;
const OBSTACLE_MIN_H: f32 = 20.0;
const OBSTACLE_MAX_H: f32 = 120.0;
const BASE_SCROLL: f32 = 5.0;
const OBSTACLE_INTERVAL: f32 = 100.0;
const PICKUP_INTERVAL: u32 = 2400;
const PICKUP_SIZE: f32 = 30.0;

const IRON_MAN_HITS: u32 = 4;

const PLAYER_COLOR: Color = Color::Rgb(0, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Super,
    Shield,
    IronMan,
    Flash,
}

impl Power {
    const ALL: [Power; 4] = [Power::Super, Power::Shield, Power::IronMan, Power::Flash];

    fn frames(self) -> u32 {
        match self {
            Power::Shield => 13 * FPS,
            Power::Super | Power::IronMan | Power::Flash => 11 * FPS,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Power::Super => "Super",
            Power::Shield => "Shield",
            Power::IronMan => "Iron Man",
            Power::Flash => "Flash",
        }
    }

    fn glyph(self) -> (char, Color) {
        match self {
            Power::Super => ('S', Color::Rgb(255, 0, 0)),
            Power::Shield => ('✦', Color::Rgb(192, 192, 192)),
            Power::IronMan => ('▲', Color::Rgb(0, 191, 255)),
            Power::Flash => ('ϟ', Color::Rgb(255, 255, 0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObstacleKind {
    Block,
    Spike,
}

#[derive(Debug, Clone)]
struct Obstacle {
    rect: Aabb,
    kind: ObstacleKind,
}

#[derive(Debug, Clone)]
struct Pickup {
    rect: Aabb,
    power: Power,
}

#[derive(Debug, Clone)]
struct Player {
    y: f32,
    vy: f32,
    jumps_left: u32,
}

impl Player {
    fn new() -> Self {
        Self {
            y: GROUND_Y,
            vy: 0.0,
            jumps_left: 1,
        }
    }

    fn rect(&self) -> Aabb {
        Aabb::new(PLAYER_X, self.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

pub struct Runner {
    player: Player,
    obstacles: Vec<Obstacle>,
    pickups: Vec<Pickup>,
    /// Holds at most one power at a time
    power: Effects<Power>,
    iron_hits: u32,
    score: f32,
    high_score: u32,
    obstacle_timer: u32,
    pickup_timer: u32,
    round: Round<()>,
    rng: StdRng,
}

impl Runner {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            player: Player::new(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            power: Effects::new(),
            iron_hits: 0,
            score: 0.0,
            high_score: 0,
            obstacle_timer: 0,
            pickup_timer: 0,
            round: Round::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn game_speed(&self) -> f32 {
        if self.power.is_active(Power::Flash) {
            0.5
        } else {
            1.0
        }
    }

    fn max_jumps(&self) -> u32 {
        if self.power.is_active(Power::Super) || self.power.is_active(Power::IronMan) {
            2
        } else {
            1
        }
    }

    fn jump_velocity(&self) -> f32 {
        if self.power.is_active(Power::Flash) {
            JUMP_VELOCITY * 2.0
        } else {
            JUMP_VELOCITY
        }
    }

    fn active_power(&self) -> Option<(Power, u32)> {
        self.power.iter().next()
    }

    /// Space, Up and a click all land here. Starts or restarts the run when
    /// there is nothing to jump in.
    fn jump_or_start(&mut self) {
        if self.round.is_over() {
            self.reset();
            return;
        }
        if self.round.start() {
            return;
        }
        if !self.round.advancing() {
            return;
        }
        if self.player.jumps_left > 0 {
            self.player.vy = self.jump_velocity();
            self.player.jumps_left -= 1;
        }
    }

    fn activate(&mut self, power: Power) {
        log::debug!("runner: {} picked up", power.label());
        self.power.clear();
        self.power.grant(power, power.frames());
        match power {
            Power::IronMan => {
                self.iron_hits = IRON_MAN_HITS;
                self.player.jumps_left = 2;
            }
            Power::Super => self.player.jumps_left = 2,
            Power::Shield | Power::Flash => {}
        }
    }

    fn spawn_obstacle(&mut self) {
        let h = self.rng.gen_range(OBSTACLE_MIN_H..OBSTACLE_MAX_H);
        let kind = if self.rng.gen_bool(0.5) {
            ObstacleKind::Block
        } else {
            ObstacleKind::Spike
        };
        self.obstacles.push(Obstacle {
            rect: Aabb::new(CANVAS_WIDTH, CANVAS_HEIGHT - h - GROUND_MARGIN, OBSTACLE_WIDTH, h),
            kind,
        });
    }

    fn spawn_pickup(&mut self) {
        let y = self.rng.gen_range(GROUND_MARGIN..CANVAS_HEIGHT - PICKUP_SIZE - GROUND_MARGIN);
        let power = Power::ALL[self.rng.gen_range(0..Power::ALL.len())];
        self.pickups.push(Pickup {
            rect: Aabb::new(CANVAS_WIDTH, y, PICKUP_SIZE, PICKUP_SIZE),
            power,
        });
    }

    /// Count the frame just played against the held power.
    fn wear_power(&mut self) {
        for expired in self.power.tick() {
            log::debug!("runner: {} wore off", expired.label());
            if expired == Power::IronMan {
                self.iron_hits = 0;
            }
        }
    }

    fn step(&mut self) {
        // Player
        let max_jumps = self.max_jumps();
        let p = &mut self.player;
        p.vy += GRAVITY;
        p.y += p.vy;
        if p.y > GROUND_Y {
            p.y = GROUND_Y;
            p.vy = 0.0;
            p.jumps_left = max_jumps;
        }

        // Spawning
        let speed = self.game_speed();
        self.obstacle_timer += 1;
        if self.obstacle_timer as f32 > OBSTACLE_INTERVAL / speed {
            self.spawn_obstacle();
            self.obstacle_timer = 0;
        }
        self.pickup_timer += 1;
        if self.pickup_timer > PICKUP_INTERVAL {
            self.spawn_pickup();
            self.pickup_timer = 0;
        }

        let scroll = BASE_SCROLL * speed;
        let body = self.player.rect();

        let mut crashed = false;
        let shielded = self.power.is_active(Power::Shield);
        let iron = self.power.is_active(Power::IronMan);
        let iron_hits = &mut self.iron_hits;
        self.obstacles.retain_mut(|o| {
            o.rect.x -= scroll;
            if o.rect.overlaps(&body) {
                if shielded {
                    return false;
                }
                if iron && *iron_hits > 0 {
                    *iron_hits -= 1;
                    return false;
                }
                crashed = true;
            }
            o.rect.right() > 0.0
        });

        let mut collected = None;
        self.pickups.retain_mut(|pk| {
            pk.rect.x -= scroll;
            if collected.is_none() && pk.rect.overlaps(&body) {
                collected = Some(pk.power);
                return false;
            }
            pk.rect.right() > 0.0
        });
        self.wear_power();
        if let Some(power) = collected {
            self.activate(power);
        }

        if crashed {
            log::info!("runner: crashed with score {}", self.get_score());
            self.round.end(());
            return;
        }
        self.score += speed;
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut s = Surface::new(width, height, CANVAS_WIDTH, CANVAS_HEIGHT, Color::Black);
        let ground = CANVAS_HEIGHT - GROUND_MARGIN;
        s.line(0.0, ground, CANVAS_WIDTH, ground, '━', PLAYER_COLOR);

        for o in &self.obstacles {
            let r = o.rect;
            match o.kind {
                ObstacleKind::Block => s.fill_rect(r.x, r.y, r.w, r.h, '█', Color::Rgb(255, 0, 255)),
                ObstacleKind::Spike => s.fill_rect(r.x, r.y, r.w, r.h, '▲', Color::Rgb(255, 69, 0)),
            }
        }
        for pk in &self.pickups {
            let (ch, color) = pk.power.glyph();
            s.fill_rect(pk.rect.x, pk.rect.y, pk.rect.w, pk.rect.h, ch, color);
        }

        let body = self.player.rect();
        let color = match self.active_power() {
            Some((Power::Super, _)) | Some((Power::IronMan, _)) => Color::Rgb(255, 0, 0),
            Some((Power::Flash, _)) => Color::Rgb(255, 255, 0),
            _ => PLAYER_COLOR,
        };
        s.fill_rect(body.x, body.y, body.w, body.h, '█', color);
        if self.power.is_active(Power::Shield) {
            let (cx, cy) = body.center();
            s.ring(cx, cy, PLAYER_SIZE * 0.75, '○', Color::Rgb(255, 60, 60));
        }
        s.into_lines()
    }
}

impl Game for Runner {
    fn update(&mut self, _keys: &KeySet) {
        if !self.round.advancing() {
            return;
        }
        self.round.tick();
        self.step();
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => self.jump_or_start(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.round.toggle_pause(),
            _ => {}
        }
    }

    fn handle_pointer(&mut self) {
        self.jump_or_start();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status_area, field_area, help_area] = chrome(frame, area, "🏃 Neon Runner", PLAYER_COLOR);

        let mut spans = vec![
            Span::styled(
                format!(" Score: {} ", self.get_score()),
                Style::default().fg(PLAYER_COLOR).add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(format!("Best: {}", self.high_score), Style::default().fg(Color::Gray)),
        ];
        if let Some((power, left)) = self.active_power() {
            spans.push(sep());
            let mut text = format!("{}: {}s", power.label(), left.div_ceil(FPS));
            if power == Power::IronMan {
                text.push_str(&format!(" ({})", self.iron_hits));
            }
            spans.push(Span::styled(text, Style::default().fg(power.glyph().1).add_modifier(Modifier::BOLD)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), status_area);

        let lines = self.render_field(field_area.width as usize, field_area.height as usize);
        frame.render_widget(Paragraph::new(lines), field_area);

        if self.round.is_over() {
            banner(
                frame,
                help_area,
                &format!("💥 GAME OVER! Score: {}", self.get_score()),
                Color::Rgb(255, 69, 0),
                "SPACE or click to run again",
            );
        } else if self.round.is_paused() {
            banner(frame, help_area, "⏸ PAUSED", Color::Yellow, "Press P to resume");
        } else if self.round.not_started() {
            frame.render_widget(
                Paragraph::new(help_line(&[("SPACE/click", "Start"), ("Esc", "Menu")])),
                help_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(help_line(&[("SPACE/↑/click", "Jump"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")])),
                help_area,
            );
        }
    }

    fn reset(&mut self) {
        self.player = Player::new();
        self.obstacles.clear();
        self.pickups.clear();
        self.power.clear();
        self.iron_hits = 0;
        self.score = 0.0;
        self.obstacle_timer = 0;
        self.pickup_timer = 0;
        self.round.restart();
    }

    fn get_score(&self) -> u32 {
        (self.score / 10.0).floor() as u32
    }

    fn is_game_over(&self) -> bool {
        self.round.is_over()
    }

    fn set_high_score(&mut self, best: u32) {
        self.high_score = best;
    }
}
