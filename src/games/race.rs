use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{banner, chrome, help_line, sep, Game};
use crate::input::{Controls, KeySet};
use crate::sim::{distance, Round, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::ui::surface::Surface;

const CAR_WIDTH: f32 = 30.0;
const CAR_LENGTH: f32 = 50.0;
const ACCEL: f32 = 0.2;
const FRICTION: f32 = 0.1;
const MAX_SPEED: f32 = 5.0;
const TURN_RATE: f32 = 0.05;
const BOUNCE: f32 = -0.5;
const CHECKPOINTS: usize = 8;
const LAPS_TO_WIN: u32 = 3;
const GRID_GAP: f32 = 60.0;

const CAR_COLORS: [Color; 2] = [Color::Rgb(0, 255, 255), Color::Rgb(255, 0, 255)];

/// Ring-shaped track centred on the canvas.
#[derive(Debug, Clone)]
struct Track {
    cx: f32,
    cy: f32,
    outer: f32,
    inner: f32,
    checkpoints: Vec<(f32, f32)>,
}

impl Track {
    fn new() -> Self {
        let cx = CANVAS_WIDTH / 2.0;
        let cy = CANVAS_HEIGHT / 2.0;
        let outer = CANVAS_WIDTH.min(CANVAS_HEIGHT) * 0.45;
        let inner = outer * 0.7;
        let mid = (outer + inner) / 2.0;
        let checkpoints = (0..CHECKPOINTS)
            .map(|i| {
                let a = i as f32 * FRAC_PI_4;
                (cx + mid * a.cos(), cy + mid * a.sin())
            })
            .collect();
        Self {
            cx,
            cy,
            outer,
            inner,
            checkpoints,
        }
    }

    fn mid_radius(&self) -> f32 {
        (self.outer + self.inner) / 2.0
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let d = distance((self.cx, self.cy), (x, y));
        d >= self.inner && d <= self.outer
    }

    /// Checkpoint whose zone contains the point. Zones span half the track
    /// width and never overlap.
    fn checkpoint_at(&self, x: f32, y: f32) -> Option<usize> {
        let reach = (self.outer - self.inner) / 2.0;
        self.checkpoints
            .iter()
            .position(|&cp| distance(cp, (x, y)) < reach)
    }
}

#[derive(Debug, Clone)]
struct Car {
    x: f32,
    y: f32,
    angle: f32,
    speed: f32,
    laps: u32,
    visited: [bool; CHECKPOINTS],
    controls: Controls,
}

impl Car {
    fn new(x: f32, y: f32, controls: Controls) -> Self {
        Self {
            x,
            y,
            // Facing up the left straight, i.e. clockwise on screen
            angle: -FRAC_PI_2,
            speed: 0.0,
            laps: 0,
            visited: [false; CHECKPOINTS],
            controls,
        }
    }

    fn drive(&mut self, keys: &KeySet) {
        let (steer, throttle) = self.controls.axis(keys);
        if throttle < 0.0 {
            self.speed += ACCEL;
        } else if throttle > 0.0 {
            self.speed -= ACCEL;
        } else {
            self.speed *= 1.0 - FRICTION;
        }
        self.speed = self.speed.clamp(-MAX_SPEED / 2.0, MAX_SPEED);
        self.angle += steer * TURN_RATE;

        // Keep the whole car length on the canvas whichever way it faces
        let half = CAR_LENGTH / 2.0;
        self.x = (self.x + self.angle.cos() * self.speed).clamp(half, CANVAS_WIDTH - half);
        self.y = (self.y + self.angle.sin() * self.speed).clamp(half, CANVAS_HEIGHT - half);
    }

    fn corners(&self) -> [(f32, f32); 4] {
        let (sin, cos) = self.angle.sin_cos();
        let (hl, hw) = (CAR_LENGTH / 2.0, CAR_WIDTH / 2.0);
        // Forward is (cos, sin), the side axis is (-sin, cos)
        let at = |f: f32, s: f32| (self.x + f * cos - s * sin, self.y + f * sin + s * cos);
        [at(hl, -hw), at(hl, hw), at(-hl, hw), at(-hl, -hw)]
    }

    fn bump_walls(&mut self, track: &Track) {
        if self.corners().iter().any(|&(x, y)| !track.contains(x, y)) {
            self.speed *= BOUNCE;
        }
    }

    /// Returns true when this visit completed a lap.
    fn visit(&mut self, checkpoint: usize) -> bool {
        self.visited[checkpoint] = true;
        if checkpoint == 0 && self.visited.iter().all(|v| *v) {
            self.laps += 1;
            self.visited = [false; CHECKPOINTS];
            return true;
        }
        false
    }

    fn progress(&self) -> usize {
        self.visited.iter().filter(|v| **v).count()
    }
}

pub struct Race {
    track: Track,
    cars: [Car; 2],
    round: Round<usize>,
}

impl Race {
    pub fn new() -> Self {
        let track = Track::new();
        let cars = Self::grid(&track);
        Self {
            track,
            cars,
            round: Round::new(),
        }
    }

    fn grid(track: &Track) -> [Car; 2] {
        let x = track.cx - track.mid_radius();
        [
            Car::new(x, track.cy, Controls::WASD_E),
            Car::new(x, track.cy + GRID_GAP, Controls::ARROWS),
        ]
    }

    fn step(&mut self, keys: &KeySet) {
        for (i, car) in self.cars.iter_mut().enumerate() {
            car.drive(keys);
            car.bump_walls(&self.track);
            if let Some(cp) = self.track.checkpoint_at(car.x, car.y) {
                if car.visit(cp) {
                    log::debug!("race: player {} completed lap {}", i + 1, car.laps);
                }
            }
        }

        if let Some(winner) = self.cars.iter().position(|c| c.laps >= LAPS_TO_WIN) {
            log::info!("race: player {} wins", winner + 1);
            self.round.end(winner);
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut s = Surface::new(width, height, CANVAS_WIDTH, CANVAS_HEIGHT, Color::Rgb(5, 5, 15));
        let t = &self.track;

        s.ring(t.cx, t.cy, t.outer, '●', Color::Rgb(0, 255, 255));
        s.ring(t.cx, t.cy, t.inner, '●', Color::Rgb(255, 0, 255));
        for (i, &(x, y)) in t.checkpoints.iter().enumerate() {
            let ch = if i == 0 { '▚' } else { '·' };
            s.circle(x, y, 4.0, ch, Color::Rgb(80, 80, 100));
        }

        for (car, color) in self.cars.iter().zip(CAR_COLORS) {
            let c = car.corners();
            for i in 0..4 {
                let (a, b) = (c[i], c[(i + 1) % 4]);
                s.line(a.0, a.1, b.0, b.1, '▓', color);
            }
            s.circle(car.x, car.y, 8.0, '█', color);
            let nose = (car.x + car.angle.cos() * CAR_LENGTH / 2.0, car.y + car.angle.sin() * CAR_LENGTH / 2.0);
            s.circle(nose.0, nose.1, 3.0, '◆', Color::White);
        }
        s.into_lines()
    }
}

impl Game for Race {
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
        let [status_area, field_area, help_area] = chrome(frame, area, "🏎 Neon Race", CAR_COLORS[0]);

        let mut spans = vec![Span::raw(" ")];
        for (i, car) in self.cars.iter().enumerate() {
            if i > 0 {
                spans.push(sep());
            }
            spans.push(Span::styled(
                format!("P{} Laps: {}/{} ", i + 1, car.laps, LAPS_TO_WIN),
                Style::default().fg(CAR_COLORS[i]).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!("[{}/{}]", car.progress(), CHECKPOINTS),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), status_area);

        let lines = self.render_field(field_area.width as usize, field_area.height as usize);
        frame.render_widget(Paragraph::new(lines), field_area);

        if let Some(winner) = self.round.outcome() {
            banner(
                frame,
                help_area,
                &format!("🏁 PLAYER {} WINS!", winner + 1),
                CAR_COLORS[winner],
                "Press ENTER to race again",
            );
        } else if self.round.is_paused() {
            banner(frame, help_area, "⏸ PAUSED", Color::Yellow, "Press P to resume");
        } else if self.round.not_started() {
            frame.render_widget(
                Paragraph::new(help_line(&[("WASD", "P1"), ("Arrows", "P2"), ("SPACE", "Start"), ("Esc", "Menu")])),
                help_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(help_line(&[("WASD", "P1"), ("Arrows", "P2"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")])),
                help_area,
            );
        }
    }

    fn reset(&mut self) {
        self.cars = Self::grid(&self.track);
        self.round.restart();
    }

    fn get_score(&self) -> u32 {
        0
    }

    fn is_game_over(&self) -> bool {
        self.round.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> Race {
        let mut r = Race::new();
        r.round.start();
        r
    }

    fn held(codes: &[KeyCode]) -> KeySet {
        let mut keys = KeySet::new(1000);
        for &c in codes {
            keys.press(c);
        }
        keys
    }

    #[test]
    fn test_track_geometry() {
        let t = Track::new();
        assert_eq!(t.outer, 270.0);
        assert!((t.inner - 189.0).abs() < 1e-3);
        assert_eq!(t.checkpoints.len(), CHECKPOINTS);
        for &(x, y) in &t.checkpoints {
            assert!(t.contains(x, y));
        }
        assert_eq!(t.checkpoint_at(t.checkpoints[3].0, t.checkpoints[3].1), Some(3));
        assert_eq!(t.checkpoint_at(t.cx, t.cy), None);
    }

    #[test]
    fn test_starting_grid_is_on_track() {
        let r = Race::new();
        for car in &r.cars {
            assert!(car.corners().iter().all(|&(x, y)| r.track.contains(x, y)));
        }
    }

    #[test]
    fn test_speed_capped_and_coasting_slows() {
        let mut r = running();
        let keys = held(&[KeyCode::Char('w')]);
        for _ in 0..40 {
            r.update(&keys);
        }
        assert!(r.cars[0].speed <= MAX_SPEED);
        assert_eq!(r.cars[1].speed, 0.0);

        r.cars[0] = Car::new(r.cars[0].x, 300.0, Controls::WASD_E);
        r.cars[0].speed = MAX_SPEED;
        r.update(&KeySet::new(1));
        assert!((r.cars[0].speed - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_leaving_track_bounces_back() {
        let mut r = running();
        r.cars[0].x = 400.0;
        r.cars[0].y = 300.0;
        r.cars[0].speed = 4.0;
        r.update(&KeySet::new(1));
        assert!((r.cars[0].speed - -1.8).abs() < 1e-4);
    }

    #[test]
    fn test_lap_needs_every_checkpoint() {
        let mut car = Car::new(0.0, 0.0, Controls::WASD_E);
        assert!(!car.visit(0));
        for cp in 1..CHECKPOINTS {
            assert!(!car.visit(cp));
        }
        assert!(car.visit(0));
        assert_eq!(car.laps, 1);
        assert_eq!(car.progress(), 0);
    }

    #[test]
    fn test_third_lap_wins_and_freezes() {
        let mut r = running();
        let (x, y) = r.track.checkpoints[0];
        r.cars[1].x = x;
        r.cars[1].y = y;
        r.cars[1].angle = FRAC_PI_2;
        r.cars[1].laps = LAPS_TO_WIN - 1;
        r.cars[1].visited = [true; CHECKPOINTS];
        r.update(&KeySet::new(1));
        assert_eq!(r.round.outcome(), Some(1));

        let before = (r.cars[0].x, r.cars[0].y);
        r.update(&held(&[KeyCode::Char('w')]));
        assert_eq!(before, (r.cars[0].x, r.cars[0].y));

        r.reset();
        assert!(r.round.is_running());
        assert!(r.cars.iter().all(|c| c.laps == 0));
    }

    #[test]
    fn test_car_centre_stays_a_half_length_inside_canvas() {
        let half = CAR_LENGTH / 2.0;
        let mut car = Car::new(30.0, 30.0, Controls::ARROWS);
        car.angle = std::f32::consts::PI;
        car.speed = MAX_SPEED;
        car.drive(&KeySet::new(1));
        assert_eq!(car.x, half);

        let mut car = Car::new(CANVAS_WIDTH - 26.0, CANVAS_HEIGHT - 26.0, Controls::ARROWS);
        car.angle = FRAC_PI_4;
        car.speed = MAX_SPEED;
        car.drive(&KeySet::new(1));
        assert_eq!((car.x, car.y), (CANVAS_WIDTH - half, CANVAS_HEIGHT - half));
    }
}
