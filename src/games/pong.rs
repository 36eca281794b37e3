use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{banner, chrome, help_line, sep, Game};
use crate::input::{Controls, KeySet};
use crate::sim::{clamp_axis, Aabb, Round, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::ui::surface::Surface;

const PADDLE_W: f32 = 10.0;
const PADDLE_H: f32 = 100.0;
const PADDLE_SPEED: f32 = 5.0;
const PADDLE_MARGIN: f32 = 10.0;
const BALL_RADIUS: f32 = 10.0;
const SERVE_SPEED: f32 = 5.0;
const HIT_SPEEDUP: f32 = 1.1;
const MAX_BALL_SPEED: f32 = 20.0;
const SPIN: f32 = 2.0;
const WIN_SCORE: u32 = 10;

const LEFT_COLOR: Color = Color::Rgb(0, 255, 255);
const RIGHT_COLOR: Color = Color::Rgb(255, 0, 255);
const BALL_COLOR: Color = Color::Rgb(255, 255, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Left => "Player 1",
            Side::Right => "Player 2",
        }
    }
}

#[derive(Clone)]
struct Paddle {
    x: f32,
    y: f32,
    dy: f32,
}

impl Paddle {
    fn new(x: f32) -> Self {
        Self {
            x,
            y: CANVAS_HEIGHT / 2.0 - PADDLE_H / 2.0,
            dy: 0.0,
        }
    }

    fn rect(&self) -> Aabb {
        Aabb::new(self.x, self.y, PADDLE_W, PADDLE_H)
    }

    fn step(&mut self) {
        self.y = clamp_axis(self.y + self.dy, PADDLE_H, CANVAS_HEIGHT);
    }

    fn spans(&self, y: f32) -> bool {
        y > self.y && y < self.y + PADDLE_H
    }
}

#[derive(Clone)]
struct Ball {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
}

pub struct Pong {
    left: Paddle,
    right: Paddle,
    ball: Ball,
    score_left: u32,
    score_right: u32,
    round: Round<Side>,
    rng: StdRng,
}

impl Pong {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut p = Self {
            left: Paddle::new(PADDLE_MARGIN),
            right: Paddle::new(CANVAS_WIDTH - PADDLE_MARGIN - PADDLE_W),
            ball: Ball {
                x: CANVAS_WIDTH / 2.0,
                y: CANVAS_HEIGHT / 2.0,
                dx: SERVE_SPEED,
                dy: SERVE_SPEED,
            },
            score_left: 0,
            score_right: 0,
            round: Round::new(),
            rng: StdRng::seed_from_u64(seed),
        };
        p.serve();
        p
    }

    fn serve(&mut self) {
        let sx = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.ball = Ball {
            x: CANVAS_WIDTH / 2.0,
            y: CANVAS_HEIGHT / 2.0,
            dx: SERVE_SPEED * sx,
            dy: SERVE_SPEED * sy,
        };
    }

    fn move_ball(&mut self) {
        let b = &mut self.ball;
        b.x += b.dx;
        b.y += b.dy;

        // Top and bottom walls
        if b.y - BALL_RADIUS < 0.0 {
            b.y = BALL_RADIUS;
            b.dy = b.dy.abs();
        } else if b.y + BALL_RADIUS > CANVAS_HEIGHT {
            b.y = CANVAS_HEIGHT - BALL_RADIUS;
            b.dy = -b.dy.abs();
        }

        let left = self.left.rect();
        let right = self.right.rect();
        let hit_left = b.dx < 0.0
            && b.x - BALL_RADIUS < left.right()
            && b.x + BALL_RADIUS > left.x
            && self.left.spans(b.y);
        let hit_right = b.dx > 0.0
            && b.x + BALL_RADIUS > right.x
            && b.x - BALL_RADIUS < right.right()
            && self.right.spans(b.y);

        if hit_left || hit_right {
            b.dx = (-b.dx * HIT_SPEEDUP).clamp(-MAX_BALL_SPEED, MAX_BALL_SPEED);
            b.dy = (b.dy + self.rng.gen_range(-SPIN..SPIN)).clamp(-MAX_BALL_SPEED, MAX_BALL_SPEED);
            b.x = if hit_left {
                left.right() + BALL_RADIUS
            } else {
                right.x - BALL_RADIUS
            };
            return;
        }

        if b.x - BALL_RADIUS < 0.0 {
            self.point(Side::Right);
        } else if b.x + BALL_RADIUS > CANVAS_WIDTH {
            self.point(Side::Left);
        }
    }

    fn point(&mut self, side: Side) {
        let score = match side {
            Side::Left => &mut self.score_left,
            Side::Right => &mut self.score_right,
        };
        *score += 1;
        if *score >= WIN_SCORE {
            log::info!("pong: {} wins {}-{}", side.label(), self.score_left, self.score_right);
            self.round.end(side);
        }
        self.serve();
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut s = Surface::new(width, height, CANVAS_WIDTH, CANVAS_HEIGHT, Color::Rgb(5, 5, 15));

        // Dashed centre line
        let mut y = 0.0;
        while y < CANVAS_HEIGHT {
            s.line(CANVAS_WIDTH / 2.0, y, CANVAS_WIDTH / 2.0, y + 5.0, '┆', Color::Rgb(90, 90, 110));
            y += 20.0;
        }

        for (paddle, color) in [(&self.left, LEFT_COLOR), (&self.right, RIGHT_COLOR)] {
            let r = paddle.rect();
            s.fill_rect(r.x, r.y, r.w, r.h, '█', color);
        }
        s.circle(self.ball.x, self.ball.y, BALL_RADIUS, '●', BALL_COLOR);
        s.into_lines()
    }
}

impl Game for Pong {
    fn update(&mut self, keys: &KeySet) {
        if !self.round.advancing() {
            return;
        }
        self.round.tick();
        self.left.dy = Controls::WASD_E.axis(keys).1 * PADDLE_SPEED;
        self.right.dy = Controls::ARROWS.axis(keys).1 * PADDLE_SPEED;
        self.left.step();
        self.right.step();
        self.move_ball();
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
        let [status_area, field_area, help_area] = chrome(frame, area, "🏓 Neon Pong", LEFT_COLOR);

        let status = Line::from(vec![
            Span::styled(
                format!(" P1: {} ", self.score_left),
                Style::default().fg(LEFT_COLOR).add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(
                format!("P2: {} ", self.score_right),
                Style::default().fg(RIGHT_COLOR).add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(format!("First to {}", WIN_SCORE), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(status), status_area);

        let lines = self.render_field(field_area.width as usize, field_area.height as usize);
        frame.render_widget(Paragraph::new(lines), field_area);

        if let Some(winner) = self.round.outcome() {
            banner(frame, help_area, &format!("🏆 {} WINS!", winner.label()), BALL_COLOR, "Press ENTER to play again");
        } else if self.round.is_paused() {
            banner(frame, help_area, "⏸ PAUSED", Color::Yellow, "Press P to resume");
        } else if self.round.not_started() {
            frame.render_widget(
                Paragraph::new(help_line(&[("W/S", "P1"), ("↑/↓", "P2"), ("SPACE", "Serve"), ("Esc", "Menu")])),
                help_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(help_line(&[("W/S", "P1"), ("↑/↓", "P2"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")])),
                help_area,
            );
        }
    }

    fn reset(&mut self) {
        self.left = Paddle::new(PADDLE_MARGIN);
        self.right = Paddle::new(CANVAS_WIDTH - PADDLE_MARGIN - PADDLE_W);
        self.score_left = 0;
        self.score_right = 0;
        self.serve();
        self.round.restart();
    }

    fn get_score(&self) -> u32 {
        0
    }

    fn is_game_over(&self) -> bool {
        self.round.is_over()
    }
}
