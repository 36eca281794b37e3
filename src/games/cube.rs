use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{banner, chrome, help_line, sep, Game};
use crate::input::{Controls, KeySet};
use crate::sim::{clamp_axis, distance, nearest_within, normalize, Round, CANVAS_HEIGHT, CANVAS_WIDTH, FPS};
use crate::ui::surface::Surface;

const PLAYER_SIZE: f32 = 40.0;
const PLAYER_SPEED: f32 = 5.0;
const TEAM_SIZE: usize = 3;
const CUBE_SIZE: f32 = 30.0;
const CUBE_DRIFT: f32 = 3.0;
const BOUNCE_JITTER: f32 = 0.2;
const PICKUP_RADIUS: f32 = 60.0;
const STEAL_RADIUS: f32 = 80.0;
const STEAL_COOLDOWN: u32 = 30;
const PASS_SPEED: f32 = 15.0;
const PASS_CATCH: f32 = 10.0;
const PASS_FRAMES: u32 = 12;
const WIN_FRAMES: u32 = 14 * FPS;
const RING_GROWTH: f32 = 3.0;
const RING_MAX: f32 = 60.0;

const TEAM_COLORS: [Color; 2] = [Color::Rgb(0, 255, 255), Color::Rgb(255, 0, 255)];
const CUBE_COLOR: Color = Color::Rgb(255, 255, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    One,
    Two,
}

impl Team {
    fn index(self) -> usize {
        match self {
            Team::One => 0,
            Team::Two => 1,
        }
    }

    fn other(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    fn controls(self) -> Controls {
        match self {
            Team::One => Controls::WASD_E,
            Team::Two => Controls::IJKL_O,
        }
    }

    fn from_index(i: usize) -> Team {
        if i == 0 {
            Team::One
        } else {
            Team::Two
        }
    }
}

/// Who has the cube. One variant at a time, so two possessors cannot exist.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CubeState {
    Loose { dx: f32, dy: f32 },
    Held { team: Team, player: usize },
    Passing { team: Team, to: usize, frames: u32 },
}

#[derive(Debug, Clone, Copy)]
struct Athlete {
    x: f32,
    y: f32,
}

impl Athlete {
    fn center(&self) -> (f32, f32) {
        (self.x + PLAYER_SIZE / 2.0, self.y + PLAYER_SIZE / 2.0)
    }
}

#[derive(Debug, Clone)]
struct Cube {
    x: f32,
    y: f32,
    state: CubeState,
}

impl Cube {
    fn center(&self) -> (f32, f32) {
        (self.x + CUBE_SIZE / 2.0, self.y + CUBE_SIZE / 2.0)
    }

    fn center_on(&mut self, (cx, cy): (f32, f32)) {
        self.x = clamp_axis(cx - CUBE_SIZE / 2.0, CUBE_SIZE, CANVAS_WIDTH);
        self.y = clamp_axis(cy - CUBE_SIZE / 2.0, CUBE_SIZE, CANVAS_HEIGHT);
    }
}

/// Expanding ring drawn where a steal happened.
#[derive(Debug, Clone)]
struct Ring {
    x: f32,
    y: f32,
    radius: f32,
}

pub struct CubeGame {
    teams: [[Athlete; TEAM_SIZE]; 2],
    active: [usize; 2],
    cube: Cube,
    /// Frames the holding team has kept the cube
    possession: u32,
    steal_cooldown: u32,
    rings: Vec<Ring>,
    round: Round<Team>,
    rng: StdRng,
}

impl CubeGame {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let cube = Self::kickoff(&mut rng);
        Self {
            teams: Self::lineup(),
            active: [0, 0],
            cube,
            possession: 0,
            steal_cooldown: 0,
            rings: Vec::new(),
            round: Round::new(),
            rng,
        }
    }

    fn lineup() -> [[Athlete; TEAM_SIZE]; 2] {
        let column = |x: f32| [200.0, 300.0, 400.0].map(|y| Athlete { x, y });
        [column(100.0), column(700.0)]
    }

    fn kickoff(rng: &mut StdRng) -> Cube {
        Cube {
            x: 400.0,
            y: 300.0,
            state: CubeState::Loose {
                dx: rng.gen_range(-CUBE_DRIFT..CUBE_DRIFT),
                dy: rng.gen_range(-CUBE_DRIFT..CUBE_DRIFT),
            },
        }
    }

    fn holder(&self) -> Option<(Team, usize)> {
        match self.cube.state {
            CubeState::Held { team, player } => Some((team, player)),
            _ => None,
        }
    }

    /// Make `player` the active one for `team`, passing the cube along if the
    /// previously active player holds it.
    fn select(&mut self, team: Team, player: usize) {
        let t = team.index();
        let old = self.active[t];
        if old == player || !self.round.advancing() {
            self.active[t] = player;
            return;
        }
        self.active[t] = player;
        if self.holder() != Some((team, old)) {
            return;
        }

        let from = self.teams[t][old].center();
        let to = self.teams[t][player].center();
        self.cube.center_on(from);
        if normalize(to.0 - from.0, to.1 - from.1).is_none() {
            self.cube.state = CubeState::Held { team, player };
            return;
        }
        log::debug!("cube: team {} passes {} -> {}", t + 1, old + 1, player + 1);
        self.cube.state = CubeState::Passing { team, to: player, frames: 0 };
    }

    fn move_players(&mut self, keys: &KeySet) {
        for team in [Team::One, Team::Two] {
            let (ax, ay) = team.controls().axis(keys);
            let t = team.index();
            let active = self.active[t];
            let p = &mut self.teams[t][active];
            p.x = clamp_axis(p.x + ax * PLAYER_SPEED, PLAYER_SIZE, CANVAS_WIDTH);
            p.y = clamp_axis(p.y + ay * PLAYER_SPEED, PLAYER_SIZE, CANVAS_HEIGHT);
        }
    }

    fn move_cube(&mut self) {
        match self.cube.state {
            CubeState::Loose { mut dx, mut dy } => {
                let c = &mut self.cube;
                c.x += dx;
                c.y += dy;
                if c.x <= 0.0 || c.x + CUBE_SIZE >= CANVAS_WIDTH {
                    dx = -dx + self.rng.gen_range(-CUBE_DRIFT..CUBE_DRIFT) * BOUNCE_JITTER;
                }
                if c.y <= 0.0 || c.y + CUBE_SIZE >= CANVAS_HEIGHT {
                    dy = -dy + self.rng.gen_range(-CUBE_DRIFT..CUBE_DRIFT) * BOUNCE_JITTER;
                }
                c.x = clamp_axis(c.x, CUBE_SIZE, CANVAS_WIDTH);
                c.y = clamp_axis(c.y, CUBE_SIZE, CANVAS_HEIGHT);
                c.state = CubeState::Loose { dx, dy };
            }
            CubeState::Passing { team, to, frames } => {
                let target = self.teams[team.index()][to].center();
                let here = self.cube.center();
                let frames = frames + 1;
                let arrived = match normalize(target.0 - here.0, target.1 - here.1) {
                    Some((ux, uy)) => {
                        let step = PASS_SPEED.min(distance(here, target));
                        self.cube.center_on((here.0 + ux * step, here.1 + uy * step));
                        distance(self.cube.center(), target) < PASS_CATCH
                    }
                    None => true,
                };
                self.cube.state = if arrived || frames >= PASS_FRAMES {
                    CubeState::Held { team, player: to }
                } else {
                    CubeState::Passing { team, to, frames }
                };
            }
            CubeState::Held { .. } => {}
        }
    }

    fn try_pickup(&mut self, keys: &KeySet) {
        let reaching: Vec<(usize, (f32, f32))> = (0..2 * TEAM_SIZE)
            .filter(|i| Team::from_index(i / TEAM_SIZE).controls().action_down(keys))
            .map(|i| (i, self.teams[i / TEAM_SIZE][i % TEAM_SIZE].center()))
            .collect();
        if let Some(i) = nearest_within(self.cube.center(), PICKUP_RADIUS, reaching) {
            let team = Team::from_index(i / TEAM_SIZE);
            log::debug!("cube: team {} picks up the cube", team.index() + 1);
            self.take(team, i % TEAM_SIZE);
        }
    }

    fn try_steal(&mut self, keys: &KeySet, holder: (Team, usize)) {
        if self.steal_cooldown > 0 {
            return;
        }
        let thief = holder.0.other();
        if !thief.controls().action_down(keys) {
            return;
        }
        let from = self.teams[holder.0.index()][holder.1].center();
        let opponents = self.teams[thief.index()].iter().map(Athlete::center).enumerate();
        if let Some(player) = nearest_within(from, STEAL_RADIUS, opponents) {
            log::debug!("cube: team {} steals", thief.index() + 1);
            let (x, y) = self.teams[thief.index()][player].center();
            self.rings.push(Ring { x, y, radius: 0.0 });
            self.take(thief, player);
        }
    }

    fn take(&mut self, team: Team, player: usize) {
        self.cube.state = CubeState::Held { team, player };
        self.possession = 0;
        self.steal_cooldown = STEAL_COOLDOWN;
    }

    fn step(&mut self, keys: &KeySet) {
        self.move_players(keys);

        self.steal_cooldown = self.steal_cooldown.saturating_sub(1);
        for ring in &mut self.rings {
            ring.radius += RING_GROWTH;
        }
        self.rings.retain(|r| r.radius < RING_MAX);

        self.move_cube();
        match self.cube.state {
            CubeState::Loose { .. } => self.try_pickup(keys),
            CubeState::Held { team, player } => self.try_steal(keys, (team, player)),
            CubeState::Passing { .. } => {}
        }

        if let Some((team, player)) = self.holder() {
            let centre = self.teams[team.index()][player].center();
            self.cube.center_on(centre);
            self.possession += 1;
            if self.possession >= WIN_FRAMES {
                log::info!("cube: team {} wins on possession", team.index() + 1);
                self.round.end(team);
            }
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut s = Surface::new(width, height, CANVAS_WIDTH, CANVAS_HEIGHT, Color::Black);

        if let Some((team, _)) = self.holder().or(match self.cube.state {
            CubeState::Passing { team, to, .. } => Some((team, to)),
            _ => None,
        }) {
            let filled = self.possession as f32 / WIN_FRAMES as f32 * CANVAS_WIDTH;
            s.fill_rect(0.0, 0.0, filled, 5.0, '▀', TEAM_COLORS[team.index()]);
        }

        for ring in &self.rings {
            s.ring(ring.x, ring.y, ring.radius, '∘', CUBE_COLOR);
        }

        for (t, team) in self.teams.iter().enumerate() {
            for (i, p) in team.iter().enumerate() {
                let ch = if self.active[t] == i { '█' } else { '▓' };
                s.fill_rect(p.x, p.y, PLAYER_SIZE, PLAYER_SIZE, ch, TEAM_COLORS[t]);
                let (cx, cy) = p.center();
                let label = char::from(b'1' + i as u8);
                if let Some((col, row)) = s.to_cell(cx, cy) {
                    s.put_styled(col, row, label, Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
                }
            }
        }

        if let CubeState::Passing { team, to, .. } = self.cube.state {
            let (tx, ty) = self.teams[team.index()][to].center();
            let (cx, cy) = self.cube.center();
            s.line(cx, cy, tx, ty, '·', CUBE_COLOR);
        }
        s.fill_rect(self.cube.x, self.cube.y, CUBE_SIZE, CUBE_SIZE, '■', CUBE_COLOR);
        s.into_lines()
    }
}

impl Game for CubeGame {
    fn update(&mut self, keys: &KeySet) {
        if !self.round.advancing() {
            return;
        }
        self.round.tick();
        self.step(keys);
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c @ '1'..='3') => self.select(Team::One, c as usize - '1' as usize),
            KeyCode::Char(c @ '8'..='9') => self.select(Team::Two, c as usize - '8' as usize),
            KeyCode::Char('0') => self.select(Team::Two, 2),
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
        let [status_area, field_area, help_area] = chrome(frame, area, "🟨 Neon Cube", CUBE_COLOR);

        let mut spans = vec![Span::raw(" ")];
        for t in 0..2 {
            if t > 0 {
                spans.push(sep());
            }
            spans.push(Span::styled(
                format!("Team {} (player {})", t + 1, self.active[t] + 1),
                Style::default().fg(TEAM_COLORS[t]).add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(sep());
        let holder = match self.cube.state {
            CubeState::Loose { .. } => "Cube loose".to_string(),
            CubeState::Held { team, player } => format!("Team {} #{} holds", team.index() + 1, player + 1),
            CubeState::Passing { team, to, .. } => format!("Team {} passing to #{}", team.index() + 1, to + 1),
        };
        spans.push(Span::styled(holder, Style::default().fg(CUBE_COLOR)));
        spans.push(sep());
        spans.push(Span::styled(
            format!("{:.1}s / {}s", self.possession as f32 / FPS as f32, WIN_FRAMES / FPS),
            Style::default().fg(Color::Gray),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), status_area);

        let lines = self.render_field(field_area.width as usize, field_area.height as usize);
        frame.render_widget(Paragraph::new(lines), field_area);

        if let Some(team) = self.round.outcome() {
            banner(
                frame,
                help_area,
                &format!("🏆 TEAM {} WINS!", team.index() + 1),
                TEAM_COLORS[team.index()],
                "Press ENTER to play again",
            );
        } else if self.round.is_paused() {
            banner(frame, help_area, "⏸ PAUSED", Color::Yellow, "Press P to resume");
        } else if self.round.not_started() {
            frame.render_widget(
                Paragraph::new(help_line(&[("WASD+E 1-3", "Team 1"), ("IJKL+O 8-0", "Team 2"), ("SPACE", "Start"), ("Esc", "Menu")])),
                help_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(help_line(&[("WASD+E 1-3", "Team 1"), ("IJKL+O 8-0", "Team 2"), ("P", "Pause"), ("R", "Restart")])),
                help_area,
            );
        }
    }

    fn reset(&mut self) {
        self.teams = Self::lineup();
        self.active = [0, 0];
        self.cube = Self::kickoff(&mut self.rng);
        self.possession = 0;
        self.steal_cooldown = 0;
        self.rings.clear();
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
    use proptest::prelude::*;

    fn running() -> CubeGame {
        let mut g = CubeGame::with_seed(5);
        g.round.start();
        g
    }

    fn held(codes: &[KeyCode]) -> KeySet {
        let mut keys = KeySet::new(10_000);
        for &c in codes {
            keys.press(c);
        }
        keys
    }

    fn park_cube(g: &mut CubeGame, x: f32, y: f32) {
        g.cube.x = x;
        g.cube.y = y;
        g.cube.state = CubeState::Loose { dx: 0.0, dy: 0.0 };
    }

    #[test]
    fn test_nearest_player_picks_up() {
        let mut g = running();
        // Team 1 #2 sits at (100, 300); put the cube right beside it
        park_cube(&mut g, 125.0, 310.0);
        g.update(&held(&[KeyCode::Char('e')]));
        assert_eq!(g.holder(), Some((Team::One, 1)));
        assert_eq!(g.cube.center(), g.teams[0][1].center());
    }

    #[test]
    fn test_pickup_needs_action_key() {
        let mut g = running();
        park_cube(&mut g, 125.0, 310.0);
        g.update(&held(&[KeyCode::Char('o')]));
        assert_eq!(g.holder(), None);
    }

    #[test]
    fn test_steal_respects_cooldown_and_resets_timer() {
        let mut g = running();
        g.take(Team::One, 0);
        g.possession = 500;
        g.teams[1][0] = Athlete { x: 150.0, y: 200.0 };
        let keys = held(&[KeyCode::Char('o')]);

        for _ in 0..STEAL_COOLDOWN - 1 {
            g.update(&keys);
            assert_eq!(g.holder(), Some((Team::One, 0)));
        }
        g.update(&keys);
        assert_eq!(g.holder(), Some((Team::Two, 0)));
        assert_eq!(g.possession, 1);
        assert_eq!(g.rings.len(), 1);
    }

    #[test]
    fn test_steal_out_of_range_fails() {
        let mut g = running();
        g.take(Team::One, 0);
        g.steal_cooldown = 0;
        g.update(&held(&[KeyCode::Char('o')]));
        assert_eq!(g.holder(), Some((Team::One, 0)));
    }

    #[test]
    fn test_pass_completes_to_new_active_player() {
        let mut g = running();
        g.take(Team::Two, 0);
        g.update(&KeySet::new(1));
        g.handle_input(KeyEvent::from(KeyCode::Char('0')));
        assert_eq!(g.active[1], 2);
        assert!(matches!(g.cube.state, CubeState::Passing { to: 2, .. }));

        let before = g.possession;
        for _ in 0..PASS_FRAMES {
            g.update(&KeySet::new(1));
            if g.holder().is_some() {
                break;
            }
        }
        assert_eq!(g.holder(), Some((Team::Two, 2)));
        assert!(g.possession <= before + 1);
    }

    #[test]
    fn test_zero_distance_pass_completes_at_once() {
        let mut g = running();
        g.teams[0][1] = g.teams[0][0];
        g.take(Team::One, 0);
        g.handle_input(KeyEvent::from(KeyCode::Char('2')));
        assert_eq!(g.holder(), Some((Team::One, 1)));
    }

    #[test]
    fn test_possession_win_and_freeze() {
        let mut g = running();
        g.take(Team::Two, 1);
        g.possession = WIN_FRAMES - 1;
        g.steal_cooldown = STEAL_COOLDOWN;
        g.update(&KeySet::new(1));
        assert_eq!(g.round.outcome(), Some(Team::Two));

        let x = g.teams[0][0].x;
        g.update(&held(&[KeyCode::Char('d')]));
        assert_eq!(g.teams[0][0].x, x);

        g.handle_input(KeyEvent::from(KeyCode::Enter));
        assert!(g.round.is_running());
        assert_eq!(g.possession, 0);
        assert_eq!(g.holder(), None);
    }

    #[test]
    fn test_players_clamped_in_corner() {
        let mut g = running();
        g.teams[0][0] = Athlete { x: 0.0, y: 0.0 };
        g.update(&held(&[KeyCode::Char('a'), KeyCode::Char('w')]));
        assert_eq!((g.teams[0][0].x, g.teams[0][0].y), (0.0, 0.0));
    }

    #[test]
    fn test_rings_expand_then_vanish() {
        let mut g = running();
        g.rings.push(Ring { x: 10.0, y: 10.0, radius: 0.0 });
        g.update(&KeySet::new(1));
        assert_eq!(g.rings[0].radius, RING_GROWTH);
        for _ in 0..20 {
            g.update(&KeySet::new(1));
        }
        assert!(g.rings.is_empty());
    }

    proptest! {
        #[test]
        fn prop_single_possessor_and_cube_on_canvas(
            seed in any::<u64>(),
            script in prop::collection::vec((any::<u8>(), 0usize..12), 1..200),
        ) {
            const HELD: [KeyCode; 8] = [
                KeyCode::Char('w'), KeyCode::Char('d'), KeyCode::Char('e'), KeyCode::Char('a'),
                KeyCode::Char('i'), KeyCode::Char('l'), KeyCode::Char('o'), KeyCode::Char('k'),
            ];
            const SWITCH: [char; 6] = ['1', '2', '3', '8', '9', '0'];
            let mut g = CubeGame::with_seed(seed);
            g.round.start();
            for (mask, switch) in script {
                let mut keys = KeySet::new(10_000);
                for (bit, &code) in HELD.iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        keys.press(code);
                    }
                }
                if let Some(&c) = SWITCH.get(switch) {
                    g.handle_input(KeyEvent::from(KeyCode::Char(c)));
                }
                g.update(&keys);

                prop_assert!(g.cube.x >= 0.0 && g.cube.x <= CANVAS_WIDTH - CUBE_SIZE);
                prop_assert!(g.cube.y >= 0.0 && g.cube.y <= CANVAS_HEIGHT - CUBE_SIZE);
                if let Some((team, player)) = g.holder() {
                    prop_assert!(player < TEAM_SIZE);
                    let holder = g.teams[team.index()][player];
                    prop_assert!(distance(g.cube.center(), holder.center()) < 1e-3);
                }
                prop_assert!(g.possession <= WIN_FRAMES);
            }
        }
    }
}
