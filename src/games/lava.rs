use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{banner, chrome, help_line, sep, Game};
use crate::input::{Controls, KeySet};
use crate::sim::{clamp_axis, Aabb, Effects, Round, CANVAS_HEIGHT, CANVAS_WIDTH, FPS};
use crate::ui::surface::Surface;

const PLAYER_SIZE: f32 = 20.0;
const PLAYER_SPEED: f32 = 5.0;
const START: (f32, f32) = (
    CANVAS_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
    CANVAS_HEIGHT - PLAYER_SIZE - 10.0,
);
const LAVA_RISE: f32 = 0.5;
const SHIELD_FRAMES: u32 = 5 * FPS;
const MOVER_SPEED: f32 = 2.0;

/// (kind, count, width, height) of everything scattered on a new level.
const LAYOUT: [(ItemKind, usize, f32, f32); 3] = [
    (ItemKind::Wall, 10, 50.0, 10.0),
    (ItemKind::Shield, 3, 20.0, 20.0),
    (ItemKind::Mover, 5, 80.0, 10.0),
];

const LAVA_COLOR: Color = Color::Rgb(255, 51, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    Wall,
    Shield,
    Mover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Buff {
    Shield,
}

#[derive(Debug, Clone)]
struct Item {
    rect: Aabb,
    kind: ItemKind,
    dx: f32,
}

pub struct LavaClimb {
    x: f32,
    y: f32,
    items: Vec<Item>,
    buffs: Effects<Buff>,
    lava: f32,
    high_score: u32,
    round: Round<()>,
    rng: StdRng,
}

impl LavaClimb {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let items = Self::generate(&mut rng);
        Self {
            x: START.0,
            y: START.1,
            items,
            buffs: Effects::new(),
            lava: 0.0,
            high_score: 0,
            round: Round::new(),
            rng,
        }
    }

    /// Scatter a fresh level. Nothing lands on the starting spot, or the
    /// player could be boxed in before the first move.
    fn generate(rng: &mut StdRng) -> Vec<Item> {
        let spawn = Aabb::new(START.0 - 40.0, START.1 - 40.0, PLAYER_SIZE + 80.0, PLAYER_SIZE + 50.0);
        let mut items = Vec::new();
        for (kind, count, w, h) in LAYOUT {
            for _ in 0..count {
                let rect = loop {
                    let r = Aabb::new(
                        rng.gen_range(0.0..CANVAS_WIDTH - w),
                        rng.gen_range(0.0..CANVAS_HEIGHT - h.max(20.0)),
                        w,
                        h,
                    );
                    if !r.overlaps(&spawn) {
                        break r;
                    }
                };
                let dx = if kind == ItemKind::Mover { MOVER_SPEED } else { 0.0 };
                items.push(Item { rect, kind, dx });
            }
        }
        items
    }

    fn body(&self) -> Aabb {
        Aabb::new(self.x, self.y, PLAYER_SIZE, PLAYER_SIZE)
    }

    fn lava_top(&self) -> f32 {
        CANVAS_HEIGHT - self.lava
    }

    fn step(&mut self, keys: &KeySet) {
        self.buffs.tick();

        let prev = (self.x, self.y);
        let (ax, ay) = Controls::ARROWS.axis(keys);
        self.x = clamp_axis(self.x + ax * PLAYER_SPEED, PLAYER_SIZE, CANVAS_WIDTH);
        self.y = clamp_axis(self.y + ay * PLAYER_SPEED, PLAYER_SIZE, CANVAS_HEIGHT);

        for item in self.items.iter_mut().filter(|i| i.kind == ItemKind::Mover) {
            item.rect.x += item.dx;
            if item.rect.x <= 0.0 || item.rect.right() >= CANVAS_WIDTH {
                item.dx = -item.dx;
            }
            item.rect = item.rect.clamp_within(CANVAS_WIDTH, CANVAS_HEIGHT);
        }

        let body = self.body();
        let mut blocked = false;
        let mut shielded = false;
        self.items.retain(|item| {
            if !item.rect.overlaps(&body) {
                return true;
            }
            match item.kind {
                ItemKind::Shield => {
                    shielded = true;
                    false
                }
                ItemKind::Wall | ItemKind::Mover => {
                    blocked = true;
                    true
                }
            }
        });
        if shielded {
            log::debug!("lava: shield picked up");
            self.buffs.grant(Buff::Shield, SHIELD_FRAMES);
        }
        if blocked {
            (self.x, self.y) = prev;
        }

        self.lava += LAVA_RISE;
        if self.y + PLAYER_SIZE > self.lava_top() {
            if self.buffs.is_active(Buff::Shield) {
                log::debug!("lava: shield burned up");
                self.buffs.revoke(Buff::Shield);
                self.y = (self.lava_top() - PLAYER_SIZE).max(0.0);
            } else {
                log::info!("lava: caught after {} seconds", self.get_score());
                self.round.end(());
            }
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut s = Surface::new(width, height, CANVAS_WIDTH, CANVAS_HEIGHT, Color::Black);

        for item in &self.items {
            let r = item.rect;
            let (ch, color) = match item.kind {
                ItemKind::Wall => ('█', Color::White),
                ItemKind::Mover => ('▬', Color::Rgb(200, 200, 255)),
                ItemKind::Shield => ('◆', Color::Rgb(0, 255, 0)),
            };
            s.fill_rect(r.x, r.y, r.w, r.h, ch, color);
        }

        let color = if self.buffs.is_active(Buff::Shield) {
            Color::Rgb(0, 255, 255)
        } else {
            Color::Rgb(255, 0, 255)
        };
        s.fill_rect(self.x, self.y, PLAYER_SIZE, PLAYER_SIZE, '█', color);

        if self.lava > 0.0 {
            s.fill_rect(0.0, self.lava_top(), CANVAS_WIDTH, self.lava, '▓', LAVA_COLOR);
        }
        s.into_lines()
    }
}

impl Game for LavaClimb {
    fn update(&mut self, keys: &KeySet) {
        if !self.round.advancing() {
            return;
        }
        self.round.tick();
        self.step(keys);
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.round.toggle_pause(),
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

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status_area, field_area, help_area] = chrome(frame, area, "🌋 Lava Climb", LAVA_COLOR);

        let mut spans = vec![
            Span::styled(
                format!(" Score: {} ", self.get_score()),
                Style::default().fg(Color::Rgb(0, 255, 255)).add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(format!("Best: {}", self.high_score), Style::default().fg(Color::Gray)),
            sep(),
            Span::styled(format!("Lava: {:.0}px", self.lava), Style::default().fg(LAVA_COLOR)),
        ];
        let shield = self.buffs.remaining(Buff::Shield);
        if shield > 0 {
            spans.push(sep());
            spans.push(Span::styled(
                format!("Shield {}s", shield.div_ceil(FPS)),
                Style::default().fg(Color::Rgb(0, 255, 0)).add_modifier(Modifier::BOLD),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), status_area);

        let lines = self.render_field(field_area.width as usize, field_area.height as usize);
        frame.render_widget(Paragraph::new(lines), field_area);

        if self.round.is_over() {
            banner(
                frame,
                help_area,
                &format!("🔥 GAME OVER! Score: {}", self.get_score()),
                LAVA_COLOR,
                "Press ENTER to climb again",
            );
        } else if self.round.is_paused() {
            banner(frame, help_area, "⏸ PAUSED", Color::Yellow, "Press P to resume");
        } else if self.round.not_started() {
            frame.render_widget(
                Paragraph::new(help_line(&[("Arrows", "Move"), ("SPACE", "Start"), ("Esc", "Menu")])),
                help_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(help_line(&[("Arrows", "Move"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")])),
                help_area,
            );
        }
    }

    fn reset(&mut self) {
        self.x = START.0;
        self.y = START.1;
        self.items = Self::generate(&mut self.rng);
        self.buffs.clear();
        self.lava = 0.0;
        self.round.restart();
    }

    fn get_score(&self) -> u32 {
        (self.round.frames() / FPS as u64) as u32
    }

    fn is_game_over(&self) -> bool {
        self.round.is_over()
    }

    fn set_high_score(&mut self, best: u32) {
        self.high_score = best;
    }
}
